//! Trail field storage and the per-step field pass

mod buffers;
mod deposit;
mod diffusion;
mod field;

pub use buffers::TrailBuffers;
pub use deposit::DepositLayer;
pub use diffusion::{decay_and_diffuse, DiffusionParams};
pub use field::{TrailCell, TrailField};
