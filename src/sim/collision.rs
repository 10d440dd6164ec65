//! Two-tier collision detection
//!
//! Broad phase: shrunken bounding boxes, always available.
//! Fine phase: sparse per-pixel alpha sampling over the overlap of two
//! textured visuals, used only when both sides have a cached hit-mask.
//! Missing masks are a normal degraded mode and never an error.

use glam::Vec2;

use super::geometry::Aabb;
use super::hitmask::{HitMaskCache, VisualId};
use crate::settings::Settings;

/// Where a textured visual sits in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpritePlacement {
    pub visual: VisualId,
    /// World position of the anchor point
    pub position: Vec2,
    /// Anchor as a fraction of the visual's size (0.5, 0.5 = center)
    pub anchor: Vec2,
    pub scale: Vec2,
    /// Rotation about the anchor, radians
    pub rotation: f32,
}

impl SpritePlacement {
    /// Unscaled, unrotated visual anchored at its center
    pub fn centered(visual: VisualId, position: Vec2) -> Self {
        Self {
            visual,
            position,
            anchor: Vec2::splat(0.5),
            scale: Vec2::ONE,
            rotation: 0.0,
        }
    }

    /// Transform a world point into the visual's local space (origin at the anchor)
    pub fn to_local(&self, world: Vec2) -> Vec2 {
        let relative = world - self.position;
        Vec2::from_angle(-self.rotation).rotate(relative) / self.scale
    }
}

/// Anything that can take part in a collision test
pub trait Collider {
    /// Current world-space bounding box
    fn bounding_box(&self) -> Aabb;

    /// Textured visual, if the entity is drawn from one (vector shapes return None)
    fn sprite(&self) -> Option<SpritePlacement> {
        None
    }
}

/// Collision tuning extracted from [`Settings`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    pub pixel_perfect: bool,
    pub sample_stride: u32,
    pub shrink: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::from(&Settings::default())
    }
}

impl From<&Settings> for CollisionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            pixel_perfect: settings.pixel_perfect,
            sample_stride: settings.sample_stride.max(1),
            shrink: settings.broad_phase_shrink,
        }
    }
}

/// Which test a pair of colliders gets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionTier {
    Broad,
    Fine,
}

/// Overlap of the two boxes after shrinking each by `shrink` of its size per side
pub fn broad_phase(a: &Aabb, b: &Aabb, shrink: f32) -> bool {
    a.shrunk(shrink).overlaps(&b.shrunk(shrink))
}

/// Per-pixel test of two textured visuals.
///
/// Rejects on strict box disjointness first. When either side lacks a
/// visual or a cached mask the boxes' overlap is taken as a hit.
pub fn pixel_perfect(
    masks: &HitMaskCache,
    a_bounds: &Aabb,
    a_sprite: Option<&SpritePlacement>,
    b_bounds: &Aabb,
    b_sprite: Option<&SpritePlacement>,
    stride: u32,
) -> bool {
    let Some(overlap) = a_bounds.intersection(b_bounds) else {
        return false;
    };

    let (Some(a_sprite), Some(b_sprite)) = (a_sprite, b_sprite) else {
        return true;
    };
    let (Some(a_mask), Some(b_mask)) = (masks.get(a_sprite.visual), masks.get(b_sprite.visual))
    else {
        return true;
    };

    let a_offset = a_sprite.anchor * Vec2::new(a_mask.width() as f32, a_mask.height() as f32);
    let b_offset = b_sprite.anchor * Vec2::new(b_mask.width() as f32, b_mask.height() as f32);
    let step = stride.max(1) as f32;

    let mut y = 0.0;
    while y < overlap.size.y {
        let mut x = 0.0;
        while x < overlap.size.x {
            let world = overlap.min + Vec2::new(x, y);
            let a_px = a_sprite.to_local(world) + a_offset;
            let b_px = b_sprite.to_local(world) + b_offset;
            if a_mask.alpha_at(a_px.x, a_px.y) > 0 && b_mask.alpha_at(b_px.x, b_px.y) > 0 {
                return true;
            }
            x += step;
        }
        y += step;
    }

    false
}

/// Pick the tier for a pair: fine only if enabled and both sides have a visual with a mask
pub fn select_tier(
    config: &CollisionConfig,
    masks: &HitMaskCache,
    a: Option<&SpritePlacement>,
    b: Option<&SpritePlacement>,
) -> CollisionTier {
    match (a, b) {
        (Some(a), Some(b))
            if config.pixel_perfect && masks.contains(a.visual) && masks.contains(b.visual) =>
        {
            CollisionTier::Fine
        }
        _ => CollisionTier::Broad,
    }
}

/// Test two colliders with the most precise tier available to them
pub fn collides<A, B>(config: &CollisionConfig, masks: &HitMaskCache, a: &A, b: &B) -> bool
where
    A: Collider + ?Sized,
    B: Collider + ?Sized,
{
    let (a_bounds, b_bounds) = (a.bounding_box(), b.bounding_box());
    let (a_sprite, b_sprite) = (a.sprite(), b.sprite());

    match select_tier(config, masks, a_sprite.as_ref(), b_sprite.as_ref()) {
        CollisionTier::Fine => pixel_perfect(
            masks,
            &a_bounds,
            a_sprite.as_ref(),
            &b_bounds,
            b_sprite.as_ref(),
            config.sample_stride,
        ),
        CollisionTier::Broad => broad_phase(&a_bounds, &b_bounds, config.shrink),
    }
}
