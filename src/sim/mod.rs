//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-scaled timestep supplied by the caller
//! - Seeded RNG only
//! - Stable iteration order (by pool slot)
//! - No rendering or platform dependencies

pub mod avatar;
pub mod collision;
pub mod effects;
pub mod geometry;
pub mod hitmask;
pub mod input;
pub mod item;
pub mod particles;
pub mod spawner;
pub mod state;
pub mod tick;

pub use avatar::Avatar;
pub use collision::{
    Collider, CollisionConfig, CollisionTier, SpritePlacement, broad_phase, collides,
    pixel_perfect, select_tier,
};
pub use effects::{Effect, EffectOutcome, Score, is_victory_score, spawn_multiplier_for};
pub use geometry::Aabb;
pub use hitmask::{
    HitMask, HitMaskCache, HitMaskError, MaskSource, RasterImage, Shape, ShapeRasterizer,
    VisualId,
};
pub use input::{InputState, Key, PointerState, TickInput};
pub use item::{Heading, Item, ItemKind};
pub use particles::{Particle, ParticlePool};
pub use spawner::{SpawnEdge, Spawner, SpawnerState};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::tick;
