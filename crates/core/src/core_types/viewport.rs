//! Viewport dimensions and toroidal coordinate helpers

use super::vec2::Vec2;
use serde::{Deserialize, Serialize};

/// Size of the presentation surface in device pixels
///
/// The trail field and the frame buffer both match the viewport one cell per
/// pixel. A viewport with a zero dimension is degenerate: the simulation idles
/// until a usable size arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Viewport {
    /// Create a viewport
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `true` when either dimension is zero
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of cells (pixels) covered, saturating on overflow
    #[must_use]
    pub fn cell_count(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Width as `f32`
    #[inline]
    #[must_use]
    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    /// Height as `f32`
    #[inline]
    #[must_use]
    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    /// `true` if the point lies in `[0, width) × [0, height)`
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0
            && point.y >= 0.0
            && point.x < self.width_f32()
            && point.y < self.height_f32()
    }

    /// Wrap a point onto the torus `[0, width) × [0, height)`
    #[inline]
    #[must_use]
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            wrap_coordinate(point.x, self.width_f32()),
            wrap_coordinate(point.y, self.height_f32()),
        )
    }

    /// Clamp a point into `[0, width) × [0, height)`
    #[must_use]
    pub fn clamp(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            clamp_coordinate(point.x, self.width_f32()),
            clamp_coordinate(point.y, self.height_f32()),
        )
    }
}

/// Wrap a coordinate into `[0, extent)`
///
/// Non-finite input and a zero extent both map to 0.
#[inline]
#[must_use]
pub fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    if !value.is_finite() || extent <= 0.0 {
        return 0.0;
    }
    let wrapped = value.rem_euclid(extent);
    // rem_euclid rounds tiny negative inputs up to exactly `extent`
    if wrapped >= extent {
        0.0
    } else {
        wrapped
    }
}

/// Clamp a coordinate into `[0, extent)`
#[inline]
#[must_use]
pub fn clamp_coordinate(value: f32, extent: f32) -> f32 {
    if value.is_nan() || extent <= 0.0 {
        return 0.0;
    }
    value.clamp(0.0, largest_below(extent))
}

/// Largest `f32` strictly below a positive, finite `extent`
#[inline]
fn largest_below(extent: f32) -> f32 {
    f32::from_bits(extent.to_bits() - 1)
}

/// Wrap an integer cell index into `[0, extent)`
#[inline]
#[must_use]
pub fn wrap_index(index: i64, extent: usize) -> usize {
    index.rem_euclid(extent as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_viewport() {
        assert!(Viewport::new(0, 10).is_degenerate());
        assert!(Viewport::new(10, 0).is_degenerate());
        assert!(!Viewport::new(1, 1).is_degenerate());
        assert_eq!(Viewport::new(0, 10).cell_count(), 0);
    }

    #[test]
    fn test_wrap_coordinate_boundaries() {
        assert_eq!(wrap_coordinate(0.0, 100.0), 0.0);
        assert_eq!(wrap_coordinate(100.0, 100.0), 0.0);
        assert!((wrap_coordinate(101.5, 100.0) - 1.5).abs() < 1e-4);
        assert!((wrap_coordinate(-0.5, 100.0) - 99.5).abs() < 1e-4);
        // A tiny negative value must not land on the excluded upper bound
        let wrapped = wrap_coordinate(-1e-9, 100.0);
        assert!((0.0..100.0).contains(&wrapped));
        assert_eq!(wrap_coordinate(f32::NAN, 100.0), 0.0);
        assert_eq!(wrap_coordinate(f32::INFINITY, 100.0), 0.0);
    }

    #[test]
    fn test_clamp_coordinate_excludes_upper_bound() {
        let clamped = clamp_coordinate(250.0, 200.0);
        assert!(clamped < 200.0);
        assert!(clamped > 199.99);
        assert_eq!(clamp_coordinate(-3.0, 200.0), 0.0);
        assert_eq!(clamp_coordinate(f32::NAN, 200.0), 0.0);
    }

    #[test]
    fn test_wrap_index() {
        assert_eq!(wrap_index(-1, 10), 9);
        assert_eq!(wrap_index(10, 10), 0);
        assert_eq!(wrap_index(23, 10), 3);
    }

    #[test]
    fn test_viewport_wrap_and_contains() {
        let viewport = Viewport::new(64, 32);
        let wrapped = viewport.wrap(Vec2::new(-1.0, 33.0));
        assert!(viewport.contains(wrapped));
        assert!((wrapped.x - 63.0).abs() < 1e-4);
        assert!((wrapped.y - 1.0).abs() < 1e-4);
        assert!(!viewport.contains(Vec2::new(64.0, 0.0)));
    }
}
