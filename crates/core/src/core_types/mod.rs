//! Core types and utilities

pub mod colour;
pub mod species;
pub mod vec2;
pub mod viewport;

pub use colour::{Colour, Rgba8};
pub use species::{Species, SPECIES_COUNT};
pub use vec2::Vec2;
pub use viewport::{clamp_coordinate, wrap_coordinate, wrap_index, Viewport};
