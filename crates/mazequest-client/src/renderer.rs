use macroquad::prelude::{
    Color, DrawTextureParams, clear_background, draw_rectangle, draw_text, draw_texture_ex,
    measure_text, vec2,
};

use mazequest_core::scene::{Drawable, Frame, Rgb, Screen, TextLine, TextSize, Visual};
use mazequest_core::skin::{CharacterKind, Skin, VARIANTS_PER_KIND};

use crate::sprites::{Sprite, SpriteLibrary};

const HUD_MARGIN: f32 = 10.0;
const HUD_LINE_STEP: f32 = 40.0;
/// Grey square shown in a selection slot when a skin has no sprite set.
const EMPTY_SLOT: Color = Color::new(150.0 / 255.0, 150.0 / 255.0, 150.0 / 255.0, 1.0);

pub fn color(rgb: Rgb) -> Color {
    Color::from_rgba(rgb.r, rgb.g, rgb.b, 255)
}

/// Draws [`Screen`]s into a window of a fixed size.
pub struct Renderer<'a> {
    sprites: &'a SpriteLibrary,
    width: f32,
    height: f32,
}

impl<'a> Renderer<'a> {
    pub fn new(sprites: &'a SpriteLibrary, width: u32, height: u32) -> Self {
        Self {
            sprites,
            width: width as f32,
            height: height as f32,
        }
    }

    pub fn draw(&self, screen: &Screen) {
        clear_background(color(screen.background()));
        match screen {
            Screen::Playing(frame) => self.draw_frame(frame),
            Screen::SkinSelect { .. } => self.draw_skin_slots(),
            _ => {},
        }
        for line in screen.text() {
            self.draw_centered(&line);
        }
    }

    fn draw_frame(&self, frame: &Frame) {
        for drawable in &frame.drawables {
            self.draw_drawable(drawable);
        }
        draw_text_top_left(&frame.hud.time_line(), HUD_MARGIN, HUD_MARGIN, TextSize::Body);
        draw_text_top_left(
            &frame.hud.retries_line(),
            HUD_MARGIN,
            HUD_MARGIN + HUD_LINE_STEP,
            TextSize::Body,
        );
    }

    fn draw_drawable(&self, drawable: &Drawable) {
        let rect = drawable.rect;
        if let Some(fill) = drawable.visual.fill_color() {
            draw_rectangle(rect.x, rect.y, rect.w, rect.h, color(fill));
            return;
        }
        let Visual::Player { skin, pose, .. } = drawable.visual else {
            return;
        };
        let Some(set) = self.sprites.set(skin) else {
            return;
        };
        // Centered on the hitbox, feet on the hitbox bottom.
        let sprite = set.frame(pose);
        let x = rect.x + rect.w / 2.0 - sprite.width / 2.0;
        let y = rect.bottom() - sprite.height;
        draw_sprite(sprite, x, y);
    }

    /// Two rows of four previews: male skins above, female below.
    fn draw_skin_slots(&self) {
        let rows = [
            (CharacterKind::Male, "Male (1-4):", self.height / 2.0 - 50.0),
            (CharacterKind::Female, "Female (5-8):", self.height / 2.0 + 100.0),
        ];
        let slot_width = self.width / 4.0;
        for (kind, label, top) in rows {
            let dims = measure_text(label, None, TextSize::Body.points(), 1.0);
            draw_text_top_left(label, slot_width - dims.width / 2.0, top - 40.0, TextSize::Body);

            for variant in 1..=VARIANTS_PER_KIND {
                let skin = Skin { kind, variant };
                let center_x = slot_width * f32::from(variant - 1) + self.width / 8.0;
                let number = skin.slot().to_string();
                let number_dims = measure_text(&number, None, TextSize::Menu.points(), 1.0);
                let number_x = center_x - number_dims.width / 2.0;

                match self.sprites.set(skin) {
                    Some(set) => {
                        let sprite = set.idle();
                        draw_sprite(sprite, center_x - sprite.width / 2.0, top);
                        draw_text_top_left(&number, number_x, top + sprite.height + 10.0, TextSize::Menu);
                    },
                    None => {
                        draw_rectangle(center_x - 25.0, top, 50.0, 50.0, EMPTY_SLOT);
                        draw_text_top_left(&number, number_x, top + 60.0, TextSize::Menu);
                    },
                }
            }
        }
    }

    fn draw_centered(&self, line: &TextLine) {
        let size = line.size.points();
        let dims = measure_text(&line.text, None, size, 1.0);
        let x = self.width / 2.0 - dims.width / 2.0;
        let top = self.height / 2.0 + line.offset_y as f32;
        draw_text(&line.text, x, top + dims.offset_y, f32::from(size), color(line.color));
    }
}

fn draw_sprite(sprite: &Sprite, x: f32, y: f32) {
    draw_texture_ex(
        &sprite.texture,
        x,
        y,
        Color::from_rgba(255, 255, 255, 255),
        DrawTextureParams {
            dest_size: Some(vec2(sprite.width, sprite.height)),
            ..Default::default()
        },
    );
}

/// `draw_text` positions by baseline; place the glyph box's top at `top`.
fn draw_text_top_left(text: &str, x: f32, top: f32, size: TextSize) {
    let points = size.points();
    let dims = measure_text(text, None, points, 1.0);
    draw_text(text, x, top + dims.offset_y, f32::from(points), color(Rgb::BLACK));
}
