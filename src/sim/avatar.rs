//! Player avatar motion
//!
//! Keyboard input drives acceleration/friction physics; a held pointer
//! overrides it with eased follow capped at the same top speed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{Collider, SpritePlacement};
use super::geometry::Aabb;
use super::hitmask::VisualId;
use super::input::TickInput;
use crate::direction_and_distance;
use crate::settings::Settings;

/// Velocity components below this snap to zero under friction
const REST_EPSILON: f32 = 0.1;
/// Pointer follow ignores targets closer than this
const POINTER_DEAD_ZONE: f32 = 1.0;

/// The player-controlled avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 = normal, below 1.0 while slowed
    pub speed_multiplier: f32,
    /// Inset from the field edges
    pub radius: f32,
    /// Side of the square collision box
    pub box_size: f32,
    /// Texture currently drawn for the avatar (None = vector placeholder)
    pub visual: Option<VisualId>,
    /// Pointer-follow target, kept in sync while the keyboard steers
    target: Vec2,
}

impl Avatar {
    /// Avatar at rest in the middle of the field
    pub fn new(settings: &Settings) -> Self {
        let center = Vec2::new(settings.field_width, settings.field_height) * 0.5;
        Self {
            pos: center,
            vel: Vec2::ZERO,
            speed_multiplier: 1.0,
            radius: settings.avatar_radius,
            box_size: settings.avatar_box,
            visual: Some(VisualId::Avatar),
            target: center,
        }
    }

    /// Back to the starting position and normal speed
    pub fn reset(&mut self, settings: &Settings) {
        let visual = self.visual;
        *self = Self::new(settings);
        self.visual = visual;
    }

    /// Rendering hint: slowed avatars are drawn tinted
    pub fn is_impaired(&self) -> bool {
        self.speed_multiplier < 1.0
    }

    /// Current speed in units per tick
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Effective top speed in units per tick
    pub fn max_speed(&self, settings: &Settings) -> f32 {
        settings.avatar_max_speed * self.speed_multiplier.max(0.0)
    }

    /// Advance one tick of `delta` frames
    pub fn update(&mut self, input: &TickInput, delta: f32, settings: &Settings) {
        let max_speed = self.max_speed(settings);

        if input.direction != Vec2::ZERO {
            self.vel += input.direction * settings.avatar_acceleration * delta;
            self.vel = self.vel.clamp_length_max(max_speed);
            self.target = self.pos;
        } else {
            self.vel *= settings.avatar_friction;
            if self.vel.x.abs() < REST_EPSILON {
                self.vel.x = 0.0;
            }
            if self.vel.y.abs() < REST_EPSILON {
                self.vel.y = 0.0;
            }
            // A fresh slow debuff caps coasting speed too
            self.vel = self.vel.clamp_length_max(max_speed);
        }

        self.pos += self.vel * delta;

        if input.pointer.down {
            self.target = input.pointer.position;
            self.vel = Vec2::ZERO;

            let (dir, dist) = direction_and_distance(self.pos, self.target);
            if dist > POINTER_DEAD_ZONE {
                let step = (dist * settings.pointer_lerp * delta).min(max_speed * delta);
                self.pos += dir * step;
            }
        }

        self.clamp_to_field(settings);
    }

    /// Keep the avatar inside the field; hitting a wall stops that axis
    fn clamp_to_field(&mut self, settings: &Settings) {
        let r = self.radius;
        let (max_x, max_y) = (settings.field_width - r, settings.field_height - r);

        if self.pos.x < r {
            self.pos.x = r;
            self.vel.x = 0.0;
        }
        if self.pos.x > max_x {
            self.pos.x = max_x;
            self.vel.x = 0.0;
        }
        if self.pos.y < r {
            self.pos.y = r;
            self.vel.y = 0.0;
        }
        if self.pos.y > max_y {
            self.pos.y = max_y;
            self.vel.y = 0.0;
        }
    }
}

impl Collider for Avatar {
    fn bounding_box(&self) -> Aabb {
        Aabb::centered(self.pos, Vec2::splat(self.box_size))
    }

    fn sprite(&self) -> Option<SpritePlacement> {
        self.visual.map(|visual| SpritePlacement::centered(visual, self.pos))
    }
}
