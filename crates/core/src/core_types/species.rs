//! Particle species tags
//!
//! Every particle belongs to one of three species for its whole lifetime. The
//! species selects which trail channel the particle senses and deposits into.

use serde::{Deserialize, Serialize};

/// Number of species, and therefore of trail channels per cell
pub const SPECIES_COUNT: usize = 3;

/// Species tag assigned at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Species {
    /// First species (channel 0)
    A = 0,
    /// Second species (channel 1)
    B = 1,
    /// Third species (channel 2)
    C = 2,
}

impl Species {
    /// All species in channel order
    pub const ALL: [Self; SPECIES_COUNT] = [Self::A, Self::B, Self::C];

    /// Convert from the raw numeric tag
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::A),
            1 => Some(Self::B),
            2 => Some(Self::C),
            _ => None,
        }
    }

    /// Raw numeric tag (0, 1 or 2)
    #[must_use]
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Trail channel index for this species
    #[inline]
    #[must_use]
    pub fn channel(self) -> usize {
        self as usize
    }
}
