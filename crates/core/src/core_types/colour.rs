//! Render colours
//!
//! `Colour` is the floating-point RGBA value the control surface hands in;
//! `Rgba8` is the packed pixel the compositor writes into the frame buffer.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// RGBA colour with channels in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Colour {
    /// Fully transparent black (the original background)
    pub const TRANSPARENT: Self = Self::new(0.0, 0.0, 0.0, 0.0);
    /// Opaque black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
    /// Opaque white
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Create a colour from its four channels
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Linear blend toward `other` by `t` (clamped to `[0, 1]`)
    #[inline]
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Quantize to a packed 8-bit pixel
    #[inline]
    #[must_use]
    pub fn to_rgba8(self) -> Rgba8 {
        Rgba8 {
            r: quantize(self.r),
            g: quantize(self.g),
            b: quantize(self.b),
            a: quantize(self.a),
        }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

#[inline]
fn quantize(channel: f32) -> u8 {
    if channel.is_nan() {
        return 0;
    }
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Packed 8-bit RGBA pixel, laid out as four consecutive bytes
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// Create a pixel from its four bytes
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Expand back to a floating-point colour
    #[must_use]
    pub fn to_colour(self) -> Colour {
        Colour::new(
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        )
    }

    /// Perceived brightness in `[0, 1]` (Rec. 601 weights, alpha ignored)
    #[must_use]
    pub fn luminance(self) -> f32 {
        (0.299 * f32::from(self.r) + 0.587 * f32::from(self.g) + 0.114 * f32::from(self.b))
            / 255.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let from = Colour::BLACK;
        let to = Colour::new(1.0, 0.5, 0.25, 1.0);
        assert_eq!(from.lerp(to, 0.0), from);
        assert_eq!(from.lerp(to, 1.0), to);
        // Out-of-range factors are clamped
        assert_eq!(from.lerp(to, 4.0), to);
        assert_eq!(from.lerp(to, f32::NAN), from);
    }

    #[test]
    fn test_quantize_clamps_channels() {
        let pixel = Colour::new(2.0, -1.0, 0.5, 1.0).to_rgba8();
        assert_eq!(pixel, Rgba8::new(255, 0, 128, 255));
    }

    #[test]
    fn test_luminance_range() {
        assert_eq!(Rgba8::new(0, 0, 0, 255).luminance(), 0.0);
        assert!((Rgba8::new(255, 255, 255, 0).luminance() - 1.0).abs() < 1e-6);
    }
}
