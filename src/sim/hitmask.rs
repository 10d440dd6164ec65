//! Per-visual opacity masks for pixel-perfect collision
//!
//! Masks are keyed by visual identity, not by entity: every item of a kind
//! shares one mask. The cache is filled once after assets load and is
//! read-only afterwards. A visual that fails to rasterize simply stays
//! unmasked, and collision falls back to bounding boxes for it.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity of a drawable visual (one texture / placeholder shape)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualId {
    /// Static avatar image
    Avatar,
    /// Avatar animation frame (1-based)
    AvatarFrame(u8),
    ItemBeneficial,
    ItemHarmful,
    ItemFreeze,
}

impl VisualId {
    /// Every visual the game loads, in load order
    pub const ALL: [VisualId; 7] = [
        VisualId::Avatar,
        VisualId::AvatarFrame(1),
        VisualId::AvatarFrame(2),
        VisualId::AvatarFrame(3),
        VisualId::ItemBeneficial,
        VisualId::ItemHarmful,
        VisualId::ItemFreeze,
    ];
}

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualId::Avatar => write!(f, "character"),
            VisualId::AvatarFrame(n) => write!(f, "character_{n}"),
            VisualId::ItemBeneficial => write!(f, "item_good"),
            VisualId::ItemHarmful => write!(f, "item_bad"),
            VisualId::ItemFreeze => write!(f, "item_freeze"),
        }
    }
}

/// Reasons a visual could not be turned into a mask
#[derive(Debug, Error)]
pub enum HitMaskError {
    #[error("no source image for `{0}`")]
    Missing(VisualId),
    #[error("`{0}` is not backed by a rasterizable image")]
    Unsupported(VisualId),
    #[error("pixel buffer has {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("image has zero area")]
    Empty,
}

/// A decoded RGBA8 image, row-major, 4 bytes per pixel
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Rasterizes visuals into offscreen RGBA buffers (supplied by the renderer)
pub trait MaskSource {
    fn rasterize(&self, visual: VisualId) -> Result<RasterImage, HitMaskError>;
}

/// Immutable opacity bitmap of one visual
#[derive(Debug, Clone)]
pub struct HitMask {
    width: u32,
    height: u32,
    alpha: Vec<u8>,
}

impl HitMask {
    /// Build from a raw alpha plane (one byte per pixel)
    pub fn from_alpha(width: u32, height: u32, alpha: Vec<u8>) -> Result<Self, HitMaskError> {
        let expected = width as usize * height as usize;
        if expected == 0 {
            return Err(HitMaskError::Empty);
        }
        if alpha.len() != expected {
            return Err(HitMaskError::SizeMismatch {
                expected,
                actual: alpha.len(),
            });
        }
        Ok(Self {
            width,
            height,
            alpha,
        })
    }

    /// Extract the alpha channel of an RGBA image
    pub fn from_image(image: &RasterImage) -> Result<Self, HitMaskError> {
        let expected = image.width as usize * image.height as usize * 4;
        if image.rgba.len() != expected {
            return Err(HitMaskError::SizeMismatch {
                expected,
                actual: image.rgba.len(),
            });
        }
        let alpha = image.rgba.chunks_exact(4).map(|px| px[3]).collect();
        Self::from_alpha(image.width, image.height, alpha)
    }

    /// Uniform mask, handy for tests and solid rectangles
    pub fn filled(width: u32, height: u32, alpha: u8) -> Result<Self, HitMaskError> {
        Self::from_alpha(width, height, vec![alpha; width as usize * height as usize])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Alpha at a mask coordinate (floored); zero outside the mask
    pub fn alpha_at(&self, x: f32, y: f32) -> u8 {
        let (ix, iy) = (x.floor(), y.floor());
        if ix < 0.0 || iy < 0.0 || ix >= self.width as f32 || iy >= self.height as f32 {
            return 0;
        }
        self.alpha[iy as usize * self.width as usize + ix as usize]
    }
}

/// Process-wide store of hit-masks keyed by visual identity
#[derive(Debug, Clone, Default)]
pub struct HitMaskCache {
    masks: HashMap<VisualId, HitMask>,
}

impl HitMaskCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mask for `visual` unless it already exists.
    ///
    /// Failures are logged and leave the visual unmasked. Returns whether a
    /// mask is present afterwards.
    pub fn generate(&mut self, visual: VisualId, source: &dyn MaskSource) -> bool {
        if self.masks.contains_key(&visual) {
            return true;
        }
        match source.rasterize(visual).and_then(|image| HitMask::from_image(&image)) {
            Ok(mask) => {
                log::info!(
                    "Generated hit-mask for '{}' ({}x{})",
                    visual,
                    mask.width(),
                    mask.height()
                );
                self.masks.insert(visual, mask);
                true
            }
            Err(e) => {
                log::warn!("Failed to generate hit-mask for '{}': {}", visual, e);
                false
            }
        }
    }

    /// Generate masks for every listed visual; returns how many are present
    pub fn generate_all(
        &mut self,
        visuals: impl IntoIterator<Item = VisualId>,
        source: &dyn MaskSource,
    ) -> usize {
        visuals
            .into_iter()
            .filter(|&visual| self.generate(visual, source))
            .count()
    }

    /// Register an already built mask (replaces nothing if one exists)
    pub fn insert(&mut self, visual: VisualId, mask: HitMask) {
        self.masks.entry(visual).or_insert(mask);
    }

    pub fn get(&self, visual: VisualId) -> Option<&HitMask> {
        self.masks.get(&visual)
    }

    pub fn contains(&self, visual: VisualId) -> bool {
        self.masks.contains_key(&visual)
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

/// Placeholder silhouettes drawn when no image assets are available
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Filled disc of the given radius, centered in a 2r x 2r image
    Circle { radius: f32 },
    /// Fully opaque rectangle
    Rect { width: u32, height: u32 },
}

impl Shape {
    fn rasterize(&self) -> RasterImage {
        match *self {
            Shape::Circle { radius } => {
                let side = (radius * 2.0).ceil().max(1.0) as u32;
                let center = side as f32 / 2.0;
                let mut rgba = vec![0u8; side as usize * side as usize * 4];
                for y in 0..side {
                    for x in 0..side {
                        let dx = x as f32 + 0.5 - center;
                        let dy = y as f32 + 0.5 - center;
                        if dx * dx + dy * dy <= radius * radius {
                            let i = (y as usize * side as usize + x as usize) * 4;
                            rgba[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
                        }
                    }
                }
                RasterImage {
                    width: side,
                    height: side,
                    rgba,
                }
            }
            Shape::Rect { width, height } => RasterImage {
                width,
                height,
                rgba: vec![255; width as usize * height as usize * 4],
            },
        }
    }
}

/// A [`MaskSource`] that draws simple shapes instead of decoding images
#[derive(Debug, Clone, Default)]
pub struct ShapeRasterizer {
    shapes: HashMap<VisualId, Shape>,
}

impl ShapeRasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Circles matching the default collision boxes (avatar r=30, items r=20)
    pub fn placeholders(avatar_box: f32, item_box: f32) -> Self {
        let mut rasterizer = Self::new();
        for visual in VisualId::ALL {
            let radius = match visual {
                VisualId::Avatar | VisualId::AvatarFrame(_) => avatar_box / 2.0,
                _ => item_box / 2.0,
            };
            rasterizer.shapes.insert(visual, Shape::Circle { radius });
        }
        rasterizer
    }

    pub fn with_shape(mut self, visual: VisualId, shape: Shape) -> Self {
        self.shapes.insert(visual, shape);
        self
    }
}

impl MaskSource for ShapeRasterizer {
    fn rasterize(&self, visual: VisualId) -> Result<RasterImage, HitMaskError> {
        self.shapes
            .get(&visual)
            .map(Shape::rasterize)
            .ok_or(HitMaskError::Missing(visual))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingSource {
        calls: Cell<u32>,
    }

    impl MaskSource for CountingSource {
        fn rasterize(&self, _visual: VisualId) -> Result<RasterImage, HitMaskError> {
            self.calls.set(self.calls.get() + 1);
            Ok(RasterImage {
                width: 2,
                height: 1,
                rgba: vec![0, 0, 0, 0, 9, 9, 9, 200],
            })
        }
    }

    struct BrokenSource;

    impl MaskSource for BrokenSource {
        fn rasterize(&self, visual: VisualId) -> Result<RasterImage, HitMaskError> {
            Err(HitMaskError::Unsupported(visual))
        }
    }

    #[test]
    fn test_generate_extracts_alpha() {
        let mut cache = HitMaskCache::new();
        let source = CountingSource { calls: Cell::new(0) };
        assert!(cache.generate(VisualId::ItemHarmful, &source));

        let mask = cache.get(VisualId::ItemHarmful).unwrap();
        assert_eq!((mask.width(), mask.height()), (2, 1));
        assert_eq!(mask.alpha_at(0.5, 0.5), 0);
        assert_eq!(mask.alpha_at(1.9, 0.0), 200);
    }

    #[test]
    fn test_generate_is_idempotent() {
        let mut cache = HitMaskCache::new();
        let source = CountingSource { calls: Cell::new(0) };
        cache.generate(VisualId::Avatar, &source);
        cache.generate(VisualId::Avatar, &source);
        assert_eq!(source.calls.get(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_failure_leaves_visual_unmasked() {
        let mut cache = HitMaskCache::new();
        assert!(!cache.generate(VisualId::ItemFreeze, &BrokenSource));
        assert!(!cache.contains(VisualId::ItemFreeze));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let image = RasterImage {
            width: 4,
            height: 4,
            rgba: vec![255; 10],
        };
        assert!(matches!(
            HitMask::from_image(&image),
            Err(HitMaskError::SizeMismatch { expected: 64, actual: 10 })
        ));
        assert!(matches!(HitMask::filled(0, 3, 255), Err(HitMaskError::Empty)));
    }

    #[test]
    fn test_alpha_out_of_bounds_is_transparent() {
        let mask = HitMask::filled(3, 3, 255).unwrap();
        assert_eq!(mask.alpha_at(-0.1, 1.0), 0);
        assert_eq!(mask.alpha_at(1.0, 3.0), 0);
        assert_eq!(mask.alpha_at(2.99, 2.99), 255);
    }

    #[test]
    fn test_placeholder_circle_is_transparent_in_corners() {
        let mut cache = HitMaskCache::new();
        let source = ShapeRasterizer::placeholders(60.0, 40.0);
        assert_eq!(cache.generate_all(VisualId::ALL, &source), VisualId::ALL.len());

        let mask = cache.get(VisualId::ItemBeneficial).unwrap();
        assert_eq!((mask.width(), mask.height()), (40, 40));
        assert_eq!(mask.alpha_at(0.0, 0.0), 0);
        assert_eq!(mask.alpha_at(20.0, 20.0), 255);
    }

    #[test]
    fn test_partial_sources_only_mask_known_visuals() {
        let mut cache = HitMaskCache::new();
        let source = ShapeRasterizer::new().with_shape(
            VisualId::ItemHarmful,
            Shape::Rect {
                width: 4,
                height: 4,
            },
        );
        assert_eq!(cache.generate_all(VisualId::ALL, &source), 1);
        assert!(cache.contains(VisualId::ItemHarmful));
        assert!(!cache.contains(VisualId::Avatar));
    }

    #[test]
    fn test_display_alias() {
        assert_eq!(VisualId::AvatarFrame(2).to_string(), "character_2");
        assert_eq!(VisualId::ItemFreeze.to_string(), "item_freeze");
    }
}
