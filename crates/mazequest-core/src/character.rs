use std::fmt;

use glam::{UVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::config::PhysicsConfig;
use crate::geometry::Rect;
use crate::hazard::{MovingHazard, StaticHazard, Tile};
use crate::input::MoveInput;
use crate::skin::Skin;

/// Facing used to pick a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Left,
    Right,
    Forward,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::Forward,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Down => "Down",
            Direction::Left => "Left",
            Direction::Right => "Right",
            Direction::Forward => "Forward",
        }
    }
}

/// Sprite key: a facing plus running (`R`) or posing (`P`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub direction: Direction,
    pub running: bool,
}

impl Pose {
    /// Standing still facing the camera. Every sprite set is guaranteed to
    /// resolve this pose.
    pub const IDLE: Pose = Pose {
        direction: Direction::Down,
        running: false,
    };

    pub fn all() -> impl Iterator<Item = Pose> {
        Direction::ALL.into_iter().flat_map(|direction| {
            [false, true].into_iter().map(move |running| Pose { direction, running })
        })
    }

    /// Lookup order when this exact frame is absent: the posing frame for the
    /// same facing, then [`Pose::IDLE`].
    pub fn fallback_chain(self) -> [Pose; 3] {
        [
            self,
            Pose {
                direction: self.direction,
                running: false,
            },
            Pose::IDLE,
        ]
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.running { 'R' } else { 'P' };
        write!(f, "{}{suffix}", self.direction.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    Hazard,
    Fell,
}

/// A player-controlled body: hitbox, vertical velocity and sprite state.
#[derive(Debug, Clone)]
pub struct Character {
    skin: Skin,
    rect: Rect,
    start: Vec2,
    y_velocity: f32,
    on_ground: bool,
    dead: bool,
    direction: Direction,
    moving: bool,
    pose: Pose,
    physics: PhysicsConfig,
    world: UVec2,
}

impl Character {
    pub fn new(skin: Skin, start: Vec2, physics: PhysicsConfig, world: UVec2) -> Self {
        let size = Vec2::new(physics.character_width, physics.character_height);
        Self {
            skin,
            rect: Rect::from_top_left(start, size),
            start,
            y_velocity: 0.0,
            on_ground: false,
            dead: false,
            direction: Direction::Down,
            moving: false,
            pose: Pose::IDLE,
            physics,
            world,
        }
    }

    /// Same character with a `size` body, anchored at the start corner.
    pub fn with_size(mut self, size: Vec2) -> Self {
        self.rect = Rect::from_top_left(self.start, size);
        self
    }

    pub fn skin(&self) -> Skin {
        self.skin
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    pub fn start(&self) -> Vec2 {
        self.start
    }

    pub fn y_velocity(&self) -> f32 {
        self.y_velocity
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn kill(&mut self) {
        self.dead = true;
    }

    /// One physics tick: input, jump, gravity, horizontal move and resolve,
    /// vertical move and resolve, world bounds.
    ///
    /// Returns `Some(DeathCause::Fell)` when this tick dropped the character
    /// out of the world.
    pub fn step(&mut self, input: &MoveInput, platforms: &[Tile]) -> Option<DeathCause> {
        let mut dx = 0.0;
        self.moving = false;

        if input.left {
            dx = -self.physics.move_speed;
            self.direction = Direction::Left;
            self.moving = true;
        } else if input.right {
            dx = self.physics.move_speed;
            self.direction = Direction::Right;
            self.moving = true;
        }

        if input.jump && self.on_ground {
            self.y_velocity = self.physics.jump_strength;
            self.on_ground = false;
            self.direction = Direction::Forward;
            self.moving = false;
        }

        self.y_velocity = (self.y_velocity + self.physics.gravity).min(self.physics.terminal_velocity);

        self.rect.x += dx;
        self.resolve_horizontal(platforms);

        self.rect.y += self.y_velocity;
        self.on_ground = false;
        self.resolve_vertical(platforms);

        if self.rect.left() < 0.0 {
            self.rect.set_left(0.0);
        }
        let world_width = self.world.x as f32;
        if self.rect.right() > world_width {
            self.rect.set_right(world_width);
        }

        let mut fell = None;
        if !self.dead && self.rect.top() > self.world.y as f32 + self.physics.fall_death_margin {
            self.dead = true;
            fell = Some(DeathCause::Fell);
        }

        if dx == 0.0 && self.on_ground {
            self.direction = Direction::Down;
        }
        self.pose = Pose {
            direction: self.direction,
            running: self.moving,
        };
        fell
    }

    /// Push out of every overlapping platform along x, toward the side the
    /// character's left edge is on.
    fn resolve_horizontal(&mut self, platforms: &[Tile]) {
        for platform in platforms {
            if !self.rect.overlaps(&platform.rect) {
                continue;
            }
            if self.rect.x < platform.rect.x {
                self.rect.set_right(platform.rect.left());
            } else if self.rect.x > platform.rect.x {
                self.rect.set_left(platform.rect.right());
            }
        }
    }

    fn resolve_vertical(&mut self, platforms: &[Tile]) {
        for platform in platforms {
            if !self.rect.overlaps(&platform.rect) {
                continue;
            }
            if self.y_velocity > 0.0 {
                self.rect.set_bottom(platform.rect.top());
                self.y_velocity = 0.0;
                self.on_ground = true;
            } else if self.y_velocity < 0.0 {
                self.rect.set_top(platform.rect.bottom());
                self.y_velocity = 0.0;
            }
        }

        // A head bump leaves an airborne body at rest; start it falling.
        if self.y_velocity == 0.0 && !self.on_ground {
            self.y_velocity = self.physics.stall_nudge;
        }
    }

    /// Whether the current hitbox is lethal. Static hazards only count once
    /// the feet are `hazard_tolerance` pixels into them; any contact with a
    /// moving hazard counts.
    pub fn touches_hazard(&self, hazards: &[StaticHazard], moving: &[MovingHazard]) -> bool {
        let tolerance = self.physics.hazard_tolerance;
        let static_hit = hazards.iter().any(|h| {
            self.rect.overlaps(&h.rect)
                && self.rect.bottom() >= h.rect.top() + tolerance
                && self.rect.top() < h.rect.bottom()
        });
        static_hit || moving.iter().any(|m| self.rect.overlaps(&m.rect))
    }

    /// Back to the start marker, at rest and alive. Facing is kept.
    pub fn reset_position(&mut self) {
        self.rect.x = self.start.x;
        self.rect.y = self.start.y;
        self.y_velocity = 0.0;
        self.on_ground = false;
        self.dead = false;
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }
}
