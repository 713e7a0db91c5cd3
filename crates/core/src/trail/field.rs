//! Per-species trail intensity grid
//!
//! Stores one `[f32; SPECIES_COUNT]` cell per viewport pixel as a flat
//! row-major array (`y * width + x`).

use crate::core_types::{clamp_coordinate, Species, Vec2, Viewport, SPECIES_COUNT};
use crate::error::{try_allocate_with, SimulationError};

/// One trail cell: an intensity per species channel
pub type TrailCell = [f32; SPECIES_COUNT];

/// Trail intensity field matching the viewport one cell per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct TrailField {
    cells: Vec<TrailCell>,
    width: usize,
    height: usize,
}

impl TrailField {
    /// Create a zeroed field
    ///
    /// Aborts on allocation failure; use [`TrailField::try_new`] for viewport
    /// sized buffers.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: vec![[0.0; SPECIES_COUNT]; width * height],
            width,
            height,
        }
    }

    /// Create a zeroed field covering a viewport
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] when the cells cannot be
    /// allocated.
    pub fn try_new(viewport: Viewport) -> Result<Self, SimulationError> {
        let cells = try_allocate_with(viewport.cell_count(), "trail field", || {
            [0.0; SPECIES_COUNT]
        })?;
        Ok(Self {
            cells,
            width: viewport.width as usize,
            height: viewport.height as usize,
        })
    }

    /// Width in cells
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in cells
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Viewport this field covers
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.width as u32, self.height as u32)
    }

    /// Flat index of a cell
    #[inline]
    #[must_use]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Intensity of one species channel at a cell
    #[inline]
    #[must_use]
    pub fn get(&self, x: usize, y: usize, species: Species) -> f32 {
        self.cells[self.index(x, y)][species.channel()]
    }

    /// All channels of a cell
    #[inline]
    #[must_use]
    pub fn cell(&self, x: usize, y: usize) -> TrailCell {
        self.cells[self.index(x, y)]
    }

    /// Overwrite one species channel at a cell
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, species: Species, value: f32) {
        let idx = self.index(x, y);
        self.cells[idx][species.channel()] = value;
    }

    /// Add to one species channel at a cell
    #[inline]
    pub fn add(&mut self, x: usize, y: usize, species: Species, amount: f32) {
        let idx = self.index(x, y);
        self.cells[idx][species.channel()] += amount;
    }

    /// Zero every cell
    pub fn clear(&mut self) {
        self.cells.fill([0.0; SPECIES_COUNT]);
    }

    /// Nearest cell to a point, with coordinates clamped to the field
    ///
    /// Returns an all-zero cell for an empty field.
    #[must_use]
    pub fn sample_nearest(&self, point: Vec2) -> TrailCell {
        if self.cells.is_empty() {
            return [0.0; SPECIES_COUNT];
        }
        let x = clamp_coordinate(point.x, self.width as f32) as usize;
        let y = clamp_coordinate(point.y, self.height as f32) as usize;
        self.cells[self.index(x.min(self.width - 1), y.min(self.height - 1))]
    }

    /// Sum of one channel over the whole field
    #[must_use]
    pub fn channel_total(&self, species: Species) -> f64 {
        let channel = species.channel();
        self.cells.iter().map(|c| f64::from(c[channel])).sum()
    }

    /// Largest intensity in any channel
    #[must_use]
    pub fn max_intensity(&self) -> f32 {
        self.cells
            .iter()
            .flat_map(|c| c.iter().copied())
            .fold(0.0, f32::max)
    }

    /// Cells in row-major order
    #[must_use]
    pub fn as_slice(&self) -> &[TrailCell] {
        &self.cells
    }

    /// Mutable cells in row-major order
    pub fn as_mut_slice(&mut self) -> &mut [TrailCell] {
        &mut self.cells
    }
}
