//! Concurrent deposit accumulator
//!
//! The particle phase runs in parallel and many particles may hit the same
//! cell. Each cell channel is an `AtomicU32` holding `f32` bits, updated with a
//! compare-and-swap loop so concurrent deposits sum instead of overwriting.
//! The field pass drains the layer in the same step.

use super::field::TrailCell;
use crate::core_types::{wrap_index, Species, Vec2, Viewport, SPECIES_COUNT};
use crate::error::{try_allocate_with, SimulationError};
use std::sync::atomic::{AtomicU32, Ordering};

/// Per-cell, per-species atomic deposit layer
#[derive(Debug)]
pub struct DepositLayer {
    cells: Vec<AtomicU32>,
    width: usize,
    height: usize,
}

impl DepositLayer {
    /// Layer covering no cells
    #[must_use]
    pub fn empty() -> Self {
        Self {
            cells: Vec::new(),
            width: 0,
            height: 0,
        }
    }

    /// Create a zeroed layer covering a viewport
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] when the layer cannot be
    /// allocated.
    pub fn try_new(viewport: Viewport) -> Result<Self, SimulationError> {
        let len = viewport.cell_count().saturating_mul(SPECIES_COUNT);
        let cells = try_allocate_with(len, "deposit layer", || AtomicU32::new(0))?;
        Ok(Self {
            cells,
            width: viewport.width as usize,
            height: viewport.height as usize,
        })
    }

    /// Add `amount` to one channel of one cell
    #[inline]
    pub fn add(&self, cell_index: usize, species: Species, amount: f32) {
        let slot = &self.cells[cell_index * SPECIES_COUNT + species.channel()];
        // The closure always returns Some, so the update cannot fail
        let _ = slot.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            Some((f32::from_bits(bits) + amount).to_bits())
        });
    }

    /// Deposit `amount` into every cell within `radius` of `center`
    ///
    /// The footprint is a disc on the torus: cells off one edge wrap to the
    /// other. A radius below one pixel still marks the centre cell.
    pub fn stamp(&self, center: Vec2, radius: f32, species: Species, amount: f32) {
        if self.cells.is_empty() || amount == 0.0 {
            return;
        }
        let cx = center.x.floor() as i64;
        let cy = center.y.floor() as i64;
        let r = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        let reach = r.ceil() as i64;
        let r_sq = r * r;

        for dy in -reach..=reach {
            for dx in -reach..=reach {
                if (dx * dx + dy * dy) as f32 > r_sq {
                    continue;
                }
                let x = wrap_index(cx + dx, self.width);
                let y = wrap_index(cy + dy, self.height);
                self.add(y * self.width + x, species, amount);
            }
        }
    }

    /// Read and zero all channels of one cell
    #[inline]
    pub fn take(&self, cell_index: usize) -> TrailCell {
        let base = cell_index * SPECIES_COUNT;
        std::array::from_fn(|c| f32::from_bits(self.cells[base + c].swap(0, Ordering::Relaxed)))
    }

    /// Discard every pending deposit
    pub fn reset(&self) {
        for slot in &self.cells {
            slot.store(0, Ordering::Relaxed);
        }
    }

    /// Sum of pending deposits in one channel
    #[must_use]
    pub fn pending_total(&self, species: Species) -> f64 {
        self.cells
            .iter()
            .skip(species.channel())
            .step_by(SPECIES_COUNT)
            .map(|slot| f64::from(f32::from_bits(slot.load(Ordering::Relaxed))))
            .sum()
    }
}
