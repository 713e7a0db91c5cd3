//! Frame compositor
//!
//! Turns the readable trail field and the committed particles into RGBA8
//! pixels: background fill, per-species trail blend, then particle markers.
//! It only reads simulation state and always writes a full frame.

use crate::config::{RenderColours, RenderFlags};
use crate::core_types::{Colour, Rgba8, Species, Viewport};
use crate::error::{try_allocate_with, SimulationError};
use crate::particles::Particle;
use crate::trail::TrailField;
use rayon::prelude::*;

/// RGBA8 frame sized to the viewport
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba8>,
}

impl FrameBuffer {
    /// Allocate a transparent frame covering a viewport
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] when the pixels cannot be
    /// allocated.
    pub fn try_new(viewport: Viewport) -> Result<Self, SimulationError> {
        let pixels = try_allocate_with(viewport.cell_count(), "frame buffer", Rgba8::default)?;
        Ok(Self {
            width: viewport.width as usize,
            height: viewport.height as usize,
            pixels,
        })
    }

    /// Reallocate to a new viewport; a no-op when the size is unchanged
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] when the new pixels cannot
    /// be allocated. The previous frame is kept in that case.
    pub fn resize(&mut self, viewport: Viewport) -> Result<(), SimulationError> {
        if viewport != self.viewport() {
            *self = Self::try_new(viewport)?;
        }
        Ok(())
    }

    /// Viewport this frame covers
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32)
    }

    /// Pixel at `(x, y)`, or `None` outside the frame
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba8> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    /// Pixels in row-major order
    #[must_use]
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA8 bytes in row-major order
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

/// Everything the compositor reads for one frame
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    /// Readable trail field
    pub trail: &'a TrailField,
    /// Committed particles
    pub particles: &'a [Particle],
    /// Colours to draw with
    pub colours: &'a RenderColours,
    /// Layers to draw
    pub flags: RenderFlags,
    /// Particle marker radius in pixels
    pub draw_radius: f32,
    /// Intensity that maps to the full trail colour
    pub max_intensity: f32,
}

/// Draw a scene into `target`
///
/// Trail cells outside the target (after a resize, before the next step) are
/// ignored; pixels without a trail cell keep the background.
pub fn composite(target: &mut FrameBuffer, scene: &Scene<'_>) {
    let width = target.width;
    if width == 0 || target.height == 0 {
        return;
    }

    let background = scene.colours.background;
    let trail = scene.trail;
    let draw_trail = scene.flags.draw_trail;
    let inv_max = if scene.max_intensity > 0.0 {
        1.0 / scene.max_intensity
    } else {
        0.0
    };

    target
        .pixels
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                let mut colour = background;
                if draw_trail && x < trail.width() && y < trail.height() {
                    let cell = trail.cell(x, y);
                    for species in Species::ALL {
                        let t = cell[species.channel()] * inv_max;
                        colour = colour.lerp(scene.colours.trail[species.channel()], t);
                    }
                }
                *pixel = colour.to_rgba8();
            }
        });

    if scene.flags.draw_particles {
        for particle in scene.particles {
            let colour = if scene.colours.tint_particles {
                scene.colours.trail[particle.species.channel()]
            } else {
                scene.colours.particle
            };
            draw_disc(target, particle, scene.draw_radius, colour.to_rgba8());
        }
    }
}

/// Set every pixel within `radius` of the particle, clipped to the frame
fn draw_disc(target: &mut FrameBuffer, particle: &Particle, radius: f32, pixel: Rgba8) {
    let cx = particle.position.x.floor() as i64;
    let cy = particle.position.y.floor() as i64;
    let r = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
    let reach = r.ceil() as i64;
    let r_sq = r * r;
    let (w, h) = (target.width as i64, target.height as i64);

    for dy in -reach..=reach {
        let y = cy + dy;
        if y < 0 || y >= h {
            continue;
        }
        for dx in -reach..=reach {
            let x = cx + dx;
            if x < 0 || x >= w || (dx * dx + dy * dy) as f32 > r_sq {
                continue;
            }
            target.pixels[(y * w + x) as usize] = pixel;
        }
    }
}

/// Fraction of pixels that differ from `background`
#[must_use]
pub fn coverage(frame: &FrameBuffer, background: Colour) -> f32 {
    if frame.pixels.is_empty() {
        return 0.0;
    }
    let bg = background.to_rgba8();
    let lit = frame.pixels.iter().filter(|p| **p != bg).count();
    lit as f32 / frame.pixels.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Vec2;

    fn scene<'a>(
        trail: &'a TrailField,
        particles: &'a [Particle],
        colours: &'a RenderColours,
        flags: RenderFlags,
    ) -> Scene<'a> {
        Scene {
            trail,
            particles,
            colours,
            flags,
            draw_radius: 1.0,
            max_intensity: 1.0,
        }
    }

    #[test]
    fn test_background_fill() {
        let mut frame = FrameBuffer::try_new(Viewport::new(4, 4)).unwrap();
        let trail = TrailField::new(4, 4);
        let colours = RenderColours {
            background: Colour::BLACK,
            ..RenderColours::default()
        };
        composite(&mut frame, &scene(&trail, &[], &colours, RenderFlags::default()));
        assert!(frame.pixels().iter().all(|p| *p == Rgba8::new(0, 0, 0, 255)));
        assert_eq!(frame.as_bytes().len(), 64);
    }

    #[test]
    fn test_full_intensity_uses_trail_colour() {
        let mut frame = FrameBuffer::try_new(Viewport::new(4, 4)).unwrap();
        let mut trail = TrailField::new(4, 4);
        trail.set(2, 1, Species::B, 1.0);
        let colours = RenderColours::default();
        composite(&mut frame, &scene(&trail, &[], &colours, RenderFlags::default()));

        assert_eq!(frame.pixel(2, 1), Some(colours.trail[1].to_rgba8()));
        assert_eq!(frame.pixel(0, 0), Some(colours.background.to_rgba8()));
    }

    #[test]
    fn test_trail_layer_can_be_disabled() {
        let mut frame = FrameBuffer::try_new(Viewport::new(4, 4)).unwrap();
        let mut trail = TrailField::new(4, 4);
        trail.set(2, 1, Species::A, 1.0);
        let colours = RenderColours::default();
        let flags = RenderFlags {
            draw_trail: false,
            draw_particles: false,
        };
        composite(&mut frame, &scene(&trail, &[], &colours, flags));
        assert_eq!(coverage(&frame, colours.background), 0.0);
    }

    #[test]
    fn test_particle_markers_are_clipped() {
        let mut frame = FrameBuffer::try_new(Viewport::new(8, 8)).unwrap();
        let trail = TrailField::new(8, 8);
        let particles = [Particle::new(Vec2::new(0.5, 0.5), 0.0, 1.0, Species::C)];
        let colours = RenderColours::default();
        let flags = RenderFlags {
            draw_trail: true,
            draw_particles: true,
        };
        composite(&mut frame, &scene(&trail, &particles, &colours, flags));

        let marker = colours.particle.to_rgba8();
        assert_eq!(frame.pixel(0, 0), Some(marker));
        assert_eq!(frame.pixel(1, 0), Some(marker));
        assert_eq!(frame.pixel(0, 1), Some(marker));
        assert_ne!(frame.pixel(1, 1), Some(marker));
        assert_eq!(frame.pixel(8, 0), None);
    }

    #[test]
    fn test_resize_keeps_frame_on_same_size() {
        let mut frame = FrameBuffer::try_new(Viewport::new(3, 2)).unwrap();
        frame.resize(Viewport::new(3, 2)).unwrap();
        assert_eq!(frame.viewport(), Viewport::new(3, 2));
        frame.resize(Viewport::new(5, 5)).unwrap();
        assert_eq!(frame.pixels().len(), 25);
    }
}
