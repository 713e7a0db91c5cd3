//! Vector type alias for 2D positions and velocities.

use nalgebra::Vector2;

/// 2D vector type for particle positions, velocities, and sensor offsets.
///
/// This is a simple alias for `nalgebra::Vector2<f32>`. Coordinates are in
/// device pixels with the origin at the top-left corner and `y` growing
/// downward, so a positive rotation turns a heading clockwise on screen.
pub type Vec2 = Vector2<f32>;
