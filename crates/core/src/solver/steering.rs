//! Sense, steer and move for a single particle
//!
//! Pure functions of the particle, the readable trail field and the frame's
//! configuration. The CPU backend maps `update_particle` over every particle.

use crate::config::{ParticleConfig, TrailConfig};
use crate::core_types::{Species, Vec2, Viewport, SPECIES_COUNT};
use crate::particles::Particle;
use crate::trail::{TrailCell, TrailField};
use nalgebra::Rotation2;

/// Steering decision for one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    /// Keep the current heading
    Forward,
    /// Rotate by `-turn_angle`
    Left,
    /// Rotate by `+turn_angle`
    Right,
}

/// Perceived trail intensity at the three sensing points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorReadings {
    /// Reading at the left point
    pub left: f32,
    /// Reading straight ahead
    pub forward: f32,
    /// Reading at the right point
    pub right: f32,
}

#[inline]
fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Sensing points `[left, forward, right]` for a particle
///
/// For `k` in `-1, 0, +1` the candidate heading is `heading + k * turn_angle`
/// and the point sits `sensor_distance` along it, pushed sideways by
/// `k * sensor_distance * sin(sensor_angle)` along the heading's normal.
#[must_use]
pub fn sensor_points(position: Vec2, heading: f32, config: &ParticleConfig) -> [Vec2; 3] {
    let d = config.sensor_distance;
    let lateral = d * config.sensor_angle.sin();
    [-1.0_f32, 0.0, 1.0].map(|k| {
        let h = heading + k * config.turn_angle;
        let normal = direction(h + std::f32::consts::FRAC_PI_2);
        position + direction(h) * d + normal * (k * lateral)
    })
}

/// Intensity a particle of `species` perceives in a cell
///
/// Its own channel counts fully and every other channel counts with
/// `cross_weight`. Channels below `cutoff` count as zero.
#[inline]
#[must_use]
pub fn perceived_intensity(cell: &TrailCell, species: Species, cutoff: f32, cross_weight: f32) -> f32 {
    let own = species.channel();
    (0..SPECIES_COUNT)
        .map(|c| {
            let value = if cell[c] < cutoff { 0.0 } else { cell[c] };
            if c == own {
                value
            } else {
                value * cross_weight
            }
        })
        .sum()
}

/// Sample the readable field at the three sensing points
#[must_use]
pub fn sense(
    particle: &Particle,
    field: &TrailField,
    config: &ParticleConfig,
    trail: &TrailConfig,
) -> SensorReadings {
    let [left, forward, right] = sensor_points(particle.position, particle.heading(), config)
        .map(|point| {
            perceived_intensity(
                &field.sample_nearest(point),
                particle.species,
                config.cutoff,
                trail.cross_species_weight,
            )
        });
    SensorReadings {
        left,
        forward,
        right,
    }
}

/// Pick a direction from the readings
///
/// A side wins only when strictly greater than both others; every tie and any
/// NaN reading keeps the heading.
#[inline]
#[must_use]
pub fn choose_steer(readings: SensorReadings) -> Steer {
    let SensorReadings {
        left,
        forward,
        right,
    } = readings;
    if left > forward && left > right {
        Steer::Left
    } else if right > forward && right > left {
        Steer::Right
    } else {
        Steer::Forward
    }
}

/// Rotate a velocity according to a steering decision
#[inline]
#[must_use]
pub fn steer(velocity: Vec2, decision: Steer, turn_angle: f32) -> Vec2 {
    match decision {
        Steer::Forward => velocity,
        Steer::Left => Rotation2::new(-turn_angle) * velocity,
        Steer::Right => Rotation2::new(turn_angle) * velocity,
    }
}

/// Move a position by `velocity * speed_multiplier` and wrap it onto the field
#[inline]
#[must_use]
pub fn advance(position: Vec2, velocity: Vec2, speed_multiplier: f32, viewport: Viewport) -> Vec2 {
    viewport.wrap(position + velocity * speed_multiplier)
}

/// Next state of one particle: sense, steer, move
///
/// Reads only `field`; the species is carried over unchanged.
#[must_use]
pub fn update_particle(
    prev: &Particle,
    field: &TrailField,
    config: &ParticleConfig,
    trail: &TrailConfig,
    viewport: Viewport,
) -> Particle {
    let decision = choose_steer(sense(prev, field, config, trail));
    let velocity = steer(prev.velocity, decision, config.turn_angle);
    Particle {
        position: advance(prev.position, velocity, config.speed_multiplier, viewport),
        velocity,
        species: prev.species,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn readings(left: f32, forward: f32, right: f32) -> SensorReadings {
        SensorReadings {
            left,
            forward,
            right,
        }
    }

    #[test]
    fn test_choose_steer_tie_breaks() {
        assert_eq!(choose_steer(readings(1.0, 0.0, 0.0)), Steer::Left);
        assert_eq!(choose_steer(readings(0.0, 0.0, 1.0)), Steer::Right);
        assert_eq!(choose_steer(readings(0.3, 0.3, 0.3)), Steer::Forward);
        assert_eq!(choose_steer(readings(1.0, 0.0, 1.0)), Steer::Forward);
        assert_eq!(choose_steer(readings(f32::NAN, 0.0, 0.0)), Steer::Forward);
        assert_eq!(choose_steer(readings(0.5, 1.0, 0.5)), Steer::Forward);
    }

    #[test]
    fn test_sensor_points_geometry() {
        let config = ParticleConfig {
            sensor_angle: 0.0,
            sensor_distance: 10.0,
            turn_angle: 0.0,
            ..ParticleConfig::default()
        };
        let points = sensor_points(Vec2::new(50.0, 50.0), 0.0, &config);
        for point in points {
            assert_relative_eq!(point.x, 60.0, epsilon = 1e-4);
            assert_relative_eq!(point.y, 50.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_lateral_offset_separates_side_points() {
        let config = ParticleConfig {
            sensor_angle: std::f32::consts::FRAC_PI_2,
            sensor_distance: 10.0,
            turn_angle: 0.0,
            ..ParticleConfig::default()
        };
        let [left, forward, right] = sensor_points(Vec2::new(50.0, 50.0), 0.0, &config);
        assert_relative_eq!(forward.y, 50.0, epsilon = 1e-4);
        assert_relative_eq!(left.y, 40.0, epsilon = 1e-4);
        assert_relative_eq!(right.y, 60.0, epsilon = 1e-4);
    }

    #[test]
    fn test_perceived_intensity_cutoff_and_cross_weight() {
        let cell = [0.5, 0.005, 0.2];
        assert_eq!(perceived_intensity(&cell, Species::A, 0.01, 0.0), 0.5);
        assert_relative_eq!(perceived_intensity(&cell, Species::A, 0.01, 0.5), 0.6, epsilon = 1e-6);
        assert_relative_eq!(perceived_intensity(&cell, Species::C, 0.01, -1.0), -0.3, epsilon = 1e-6);
        assert_eq!(perceived_intensity(&cell, Species::B, 0.01, 0.0), 0.0);
    }

    #[test]
    fn test_steer_preserves_speed() {
        let velocity = Vec2::new(1.5, 0.0);
        let turned = steer(velocity, Steer::Right, 0.3);
        assert_relative_eq!(turned.norm(), 1.5, epsilon = 1e-5);
        assert_relative_eq!(turned.y.atan2(turned.x), 0.3, epsilon = 1e-5);
        let turned = steer(velocity, Steer::Left, 0.3);
        assert_relative_eq!(turned.y.atan2(turned.x), -0.3, epsilon = 1e-5);
    }

    #[test]
    fn test_advance_wraps_exactly() {
        let viewport = Viewport::new(100, 100);
        let moved = advance(Vec2::new(99.5, 0.25), Vec2::new(1.0, -0.5), 1.0, viewport);
        assert_relative_eq!(moved.x, 0.5, epsilon = 1e-4);
        assert_relative_eq!(moved.y, 99.75, epsilon = 1e-4);
        assert!(viewport.contains(moved));
    }

    #[test]
    fn test_update_particle_turns_toward_trail() {
        let viewport = Viewport::new(64, 64);
        let config = ParticleConfig::default();
        let trail = TrailConfig::default();
        let particle = Particle::new(Vec2::new(32.0, 32.0), 0.0, 1.0, Species::B);

        let mut field = TrailField::new(64, 64);
        let [_, _, right] = sensor_points(particle.position, 0.0, &config);
        field.set(right.x as usize, right.y as usize, Species::B, 1.0);

        let next = update_particle(&particle, &field, &config, &trail, viewport);
        assert_relative_eq!(next.heading(), config.turn_angle, epsilon = 1e-5);
        assert_eq!(next.species, Species::B);

        // Another species' trail is ignored without cross weighting
        let other = Particle::new(Vec2::new(32.0, 32.0), 0.0, 1.0, Species::A);
        let next = update_particle(&other, &field, &config, &trail, viewport);
        assert_relative_eq!(next.heading(), 0.0, epsilon = 1e-5);
    }
}
