/// Timing helpers for the step phases and the frame rate.
///
/// Provides an RAII phase timer and an FPS clock.
use std::time::{Duration, Instant};
use tracing::trace;

/// Weight of the newest sample in the smoothed frame rate
const FPS_SMOOTHING: f32 = 0.1;

/// A timing scope for one step phase.
///
/// The elapsed time is emitted as a `trace!` event when dropped.
pub struct PhaseTimer {
    start: Instant,
    name: &'static str,
}

impl PhaseTimer {
    /// Starts timing a phase.
    pub fn new(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Gets elapsed time in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for PhaseTimer {
    fn drop(&mut self) {
        trace!(phase = self.name, elapsed_ms = self.elapsed_ms(), "step phase finished");
    }
}

/// Frame rate tracker fed by the frame driver.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_frame: Duration,
    fps: f32,
    smoothed_fps: f32,
    frames: u64,
}

impl FrameClock {
    /// Creates a clock with no recorded frames.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one frame's elapsed time and returns the instantaneous FPS.
    ///
    /// A zero duration reports 0 FPS.
    pub fn record(&mut self, elapsed: Duration) -> f32 {
        let secs = elapsed.as_secs_f32();
        let fps = if secs > 0.0 { 1.0 / secs } else { 0.0 };
        self.smoothed_fps = if self.frames == 0 {
            fps
        } else {
            self.smoothed_fps + FPS_SMOOTHING * (fps - self.smoothed_fps)
        };
        self.fps = fps;
        self.last_frame = elapsed;
        self.frames += 1;
        fps
    }

    /// Gets the last instantaneous FPS.
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Gets the exponentially smoothed FPS.
    pub fn smoothed_fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Gets the last recorded frame time in milliseconds.
    pub fn last_frame_time_ms(&self) -> f64 {
        self.last_frame.as_secs_f64() * 1000.0
    }

    /// Number of recorded frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::thread;

    #[test]
    fn test_phase_timer_measures_time() {
        let timer = PhaseTimer::new("test");
        thread::sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 10.0, "Expected at least 10ms, got {elapsed}");
    }

    #[test]
    fn test_frame_clock() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.fps(), 0.0);

        let fps = clock.record(Duration::from_millis(20));
        assert_relative_eq!(fps, 50.0, epsilon = 1e-3);
        assert_relative_eq!(clock.smoothed_fps(), 50.0, epsilon = 1e-3);

        clock.record(Duration::from_millis(10));
        assert_relative_eq!(clock.fps(), 100.0, epsilon = 1e-3);
        assert_relative_eq!(clock.smoothed_fps(), 55.0, epsilon = 1e-3);
        assert_relative_eq!(clock.last_frame_time_ms(), 10.0, epsilon = 1e-6);

        assert_eq!(clock.record(Duration::ZERO), 0.0);
        assert_eq!(clock.frames(), 3);
    }
}
