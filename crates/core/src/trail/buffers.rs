//! Double-buffered trail field
//!
//! Two equally sized fields live in fixed slots. A role index names the slot
//! that is readable this frame; the step writes the other slot and flips the
//! index only after every phase finished.

use super::deposit::DepositLayer;
use super::field::TrailField;
use crate::core_types::Viewport;
use crate::error::SimulationError;

/// Read/write pair of trail fields plus the deposit layer feeding them
#[derive(Debug)]
pub struct TrailBuffers {
    slots: [TrailField; 2],
    deposits: DepositLayer,
    current: usize,
    swaps: u64,
}

impl TrailBuffers {
    /// Buffers covering no cells, used before the first viewport arrives
    #[must_use]
    pub fn empty() -> Self {
        Self {
            slots: [TrailField::new(0, 0), TrailField::new(0, 0)],
            deposits: DepositLayer::empty(),
            current: 0,
            swaps: 0,
        }
    }

    /// Allocate zeroed buffers covering a viewport
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AllocationFailed`] if any of the three
    /// allocations fails. Nothing is returned half-built.
    pub fn try_new(viewport: Viewport) -> Result<Self, SimulationError> {
        Ok(Self {
            slots: [TrailField::try_new(viewport)?, TrailField::try_new(viewport)?],
            deposits: DepositLayer::try_new(viewport)?,
            current: 0,
            swaps: 0,
        })
    }

    /// The readable field
    #[must_use]
    pub fn current(&self) -> &TrailField {
        &self.slots[self.current]
    }

    /// The readable field, mutably (seeding and tests)
    pub fn current_mut(&mut self) -> &mut TrailField {
        &mut self.slots[self.current]
    }

    /// Slot index of the readable field
    #[must_use]
    pub fn current_slot(&self) -> usize {
        self.current
    }

    /// Slot index the next step writes
    #[must_use]
    pub fn next_slot(&self) -> usize {
        1 - self.current
    }

    /// Number of completed swaps
    #[must_use]
    pub fn swap_count(&self) -> u64 {
        self.swaps
    }

    /// Viewport the buffers cover
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.slots[0].viewport()
    }

    /// Pending deposits for the step in progress
    #[must_use]
    pub fn deposits(&self) -> &DepositLayer {
        &self.deposits
    }

    /// Read field, write field and deposit layer for one step
    pub(crate) fn split(&mut self) -> (&TrailField, &mut TrailField, &DepositLayer) {
        let [a, b] = &mut self.slots;
        let (read, write) = if self.current == 0 { (a, b) } else { (b, a) };
        (read, write, &self.deposits)
    }

    /// Make the written field readable
    pub(crate) fn swap(&mut self) {
        self.current = 1 - self.current;
        self.swaps += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::Species;

    #[test]
    fn test_swap_flips_roles() {
        let mut buffers = TrailBuffers::try_new(Viewport::new(4, 4)).unwrap();
        assert_eq!(buffers.current_slot(), 0);
        assert_eq!(buffers.next_slot(), 1);

        let (_, write, _) = buffers.split();
        write.set(1, 1, Species::A, 0.5);
        assert_eq!(buffers.current().get(1, 1, Species::A), 0.0);

        buffers.swap();
        assert_eq!(buffers.current_slot(), 1);
        assert_eq!(buffers.current().get(1, 1, Species::A), 0.5);
        assert_eq!(buffers.swap_count(), 1);
    }
}
