//! Fairy Drift - A dodge-and-collect arcade game
//!
//! Core modules:
//! - `sim`: Simulation (avatar physics, item pool, collisions, effect timers)
//! - `settings`: Data-driven game balance and collision quality
//! - `web`: wasm-bindgen handle for the browser renderer (wasm32 only)

pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::{QualityPreset, Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate; a tick delta of 1.0 is one frame at this rate
    pub const TARGET_FPS: f32 = 60.0;

    /// Logical play-field dimensions (9:16 portrait)
    pub const FIELD_WIDTH: f32 = 600.0;
    pub const FIELD_HEIGHT: f32 = 1066.0;

    /// Items beyond this distance past the exit edge are recycled
    pub const ITEM_EXIT_MARGIN: f32 = 100.0;

    /// Score awarded / removed per pickup
    pub const BENEFICIAL_SCORE: u32 = 10;
    pub const HARMFUL_PENALTY: u32 = 5;

    /// Score thresholds for difficulty and victory
    pub const FAST_SPAWN_SCORE: u32 = 100;
    pub const VICTORY_SCORE: u32 = 300;
    /// Spawn multiplier once the fast tier is reached
    pub const FAST_SPAWN_MULTIPLIER: f32 = 2.0;

    /// Freeze pickup pauses the item field for 180 ticks (3 s at 60 Hz)
    pub const FREEZE_DURATION_TICKS: f32 = 180.0;
    /// Slow debuff duration and avatar speed multiplier while it lasts
    pub const SLOW_DURATION_TICKS: f32 = 120.0;
    pub const SLOW_MULTIPLIER: f32 = 0.5;

    /// Ticks of avatar movement between trail sparkles
    pub const TRAIL_INTERVAL_TICKS: f32 = 5.0;
    /// Minimum avatar speed (units per tick) that counts as moving
    pub const TRAIL_MIN_SPEED: f32 = 1.0;
}

/// Convert a tick count to seconds at the nominal frame rate
#[inline]
pub fn ticks_to_secs(ticks: f32) -> f32 {
    ticks / consts::TARGET_FPS
}

/// Unit vector pointing from `from` toward `to`, with the distance between them
#[inline]
pub fn direction_and_distance(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = to - from;
    let dist = delta.length();
    (delta.normalize_or_zero(), dist)
}
