//! Field pass: decay, box-blur diffusion and deposit merge
//!
//! Reads only the readable field and writes only the write field, so rows are
//! independent and processed in parallel.

use super::deposit::DepositLayer;
use super::field::{TrailCell, TrailField};
use crate::core_types::{wrap_index, SPECIES_COUNT};
use rayon::prelude::*;

/// Parameters for one field pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffusionParams {
    /// Multiplier applied to every read value (`1 - falloff`)
    pub decay: f32,
    /// Box blur radius in cells; 0 disables diffusion
    pub radius: u32,
    /// Upper clamp for written intensities
    pub max_intensity: f32,
}

/// Decay and diffuse `read` into `write`, then merge pending deposits
///
/// Each written cell is the mean of the `(2r+1)²` neighbourhood around it
/// (wrapping at the edges) times `decay`, plus the drained deposit for that
/// cell, clamped to `[0, max_intensity]`. With `radius == 0` the result is the
/// decayed value itself.
///
/// # Arguments
///
/// * `read` - Readable field from the previous step
/// * `write` - Field to fill; must match `read` in size
/// * `deposits` - Deposit layer to drain, if any
/// * `params` - Decay, radius and clamp
pub fn decay_and_diffuse(
    read: &TrailField,
    write: &mut TrailField,
    deposits: Option<&DepositLayer>,
    params: DiffusionParams,
) {
    debug_assert_eq!(read.viewport(), write.viewport());
    let width = read.width();
    let height = read.height();
    if width == 0 || height == 0 {
        return;
    }

    let src = read.as_slice();
    let radius = i64::from(params.radius);
    let window = (2 * radius + 1) * (2 * radius + 1);
    let scale = params.decay / window as f32;
    let max_intensity = if params.max_intensity > 0.0 {
        params.max_intensity
    } else {
        0.0
    };

    write
        .as_mut_slice()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let sum = if radius == 0 {
                    src[y * width + x]
                } else {
                    let mut acc: TrailCell = [0.0; SPECIES_COUNT];
                    for dy in -radius..=radius {
                        let row_base = wrap_index(y as i64 + dy, height) * width;
                        for dx in -radius..=radius {
                            let neighbour = &src[row_base + wrap_index(x as i64 + dx, width)];
                            for c in 0..SPECIES_COUNT {
                                acc[c] += neighbour[c];
                            }
                        }
                    }
                    acc
                };

                let deposit = deposits.map_or([0.0; SPECIES_COUNT], |d| d.take(y * width + x));
                for c in 0..SPECIES_COUNT {
                    let value = sum[c] * scale + deposit[c];
                    out[c] = if value.is_nan() {
                        0.0
                    } else {
                        value.clamp(0.0, max_intensity)
                    };
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{Species, Vec2, Viewport};
    use approx::assert_relative_eq;

    fn params(decay: f32, radius: u32) -> DiffusionParams {
        DiffusionParams {
            decay,
            radius,
            max_intensity: 1.0,
        }
    }

    #[test]
    fn test_radius_zero_is_pure_decay() {
        let mut read = TrailField::new(5, 5);
        read.set(2, 2, Species::A, 1.0);
        let mut write = TrailField::new(5, 5);
        decay_and_diffuse(&read, &mut write, None, params(0.5, 0));
        assert_eq!(write.get(2, 2, Species::A), 0.5);
        assert_eq!(write.get(1, 2, Species::A), 0.0);
    }

    #[test]
    fn test_radius_one_spreads_mass() {
        let mut read = TrailField::new(5, 5);
        read.set(2, 2, Species::A, 1.0);
        let mut write = TrailField::new(5, 5);
        decay_and_diffuse(&read, &mut write, None, params(0.5, 1));

        let centre = write.get(2, 2, Species::A);
        assert!(centre > 0.0 && centre < 0.5);
        assert_relative_eq!(centre, 0.5 / 9.0, epsilon = 1e-6);
        assert_relative_eq!(write.get(1, 1, Species::A), 0.5 / 9.0, epsilon = 1e-6);
        assert_relative_eq!(write.channel_total(Species::A), 0.5, epsilon = 1e-5);
    }

    #[test]
    fn test_diffusion_wraps_edges() {
        let mut read = TrailField::new(4, 4);
        read.set(0, 0, Species::C, 0.9);
        let mut write = TrailField::new(4, 4);
        decay_and_diffuse(&read, &mut write, None, params(1.0, 1));
        assert!(write.get(3, 3, Species::C) > 0.0);
        assert!(write.get(3, 0, Species::C) > 0.0);
        assert_eq!(write.get(2, 2, Species::C), 0.0);
    }

    #[test]
    fn test_deposits_are_drained_and_clamped() {
        let viewport = Viewport::new(4, 4);
        let read = TrailField::try_new(viewport).unwrap();
        let mut write = TrailField::try_new(viewport).unwrap();
        let deposits = DepositLayer::try_new(viewport).unwrap();
        deposits.stamp(Vec2::new(1.0, 1.0), 0.0, Species::B, 0.75);
        deposits.stamp(Vec2::new(1.0, 1.0), 0.0, Species::B, 0.75);

        decay_and_diffuse(&read, &mut write, Some(&deposits), params(0.98, 1));
        assert_eq!(write.get(1, 1, Species::B), 1.0);
        assert_eq!(deposits.pending_total(Species::B), 0.0);
    }

    #[test]
    fn test_empty_field_is_noop() {
        let read = TrailField::new(0, 0);
        let mut write = TrailField::new(0, 0);
        decay_and_diffuse(&read, &mut write, None, params(0.5, 1));
        assert!(write.as_slice().is_empty());
    }
}
