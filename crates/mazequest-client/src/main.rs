//! MazeQuest desktop client: one window, one keyboard, up to two players.

mod input;
mod pacing;
mod renderer;
mod sprites;

use std::time::Instant;

use macroquad::prelude::{Conf, next_frame, prevent_quit};
use tracing_subscriber::EnvFilter;

use mazequest_core::skin::Skin;
use mazequest_core::{Game, MazeQuestConfig};

use pacing::FrameLimiter;
use renderer::Renderer;
use sprites::SpriteLibrary;

fn window_conf(config: &MazeQuestConfig) -> Conf {
    Conf {
        window_title: config.window.title.clone(),
        window_width: config.window.width as i32,
        window_height: config.window.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = MazeQuestConfig::load();
    if let Err(e) = config.validate() {
        tracing::error!("Invalid configuration: {e}");
        std::process::exit(1);
    }

    tracing::info!(
        width = config.window.width,
        height = config.window.height,
        tile_size = config.level.tile_size(),
        "MazeQuest starting"
    );
    macroquad::Window::from_config(window_conf(&config), run(config));
}

async fn run(config: MazeQuestConfig) {
    // Window close becomes an input like any other key.
    prevent_quit();

    let sprites = SpriteLibrary::load(&config.assets).await;
    let (width, height) = (config.window.width, config.window.height);
    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            tracing::error!("Failed to build level: {e}");
            return;
        },
    };
    // Bodies are as big as the sprite standing still.
    for skin in Skin::all() {
        if let Some(set) = sprites.set(skin) {
            let idle = set.idle();
            game.set_body_size(skin, glam::Vec2::new(idle.width, idle.height));
        }
    }
    let renderer = Renderer::new(&sprites, width, height);
    let mut limiter = FrameLimiter::new();

    loop {
        limiter.begin();

        let input = input::poll();
        let now = Instant::now();
        for event in game.tick(&input, now) {
            tracing::trace!(?event, "Game event");
        }
        let Some(screen) = game.screen(now) else {
            break;
        };
        renderer.draw(&screen);

        limiter.wait(game.frame_rate_hz());
        next_frame().await;
    }
    tracing::info!("MazeQuest exiting");
}
