//! Frame timing for hosts.
//!
//! The particle field itself moves in pixels per frame and never looks at the
//! clock; time only drives the spark layer and the fps estimate hosts log.
//! Uses `web_time::Instant`, which is `std::time::Instant` natively and
//! `performance.now()` in the browser.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // Once per frame:
//! clock.tick();
//! println!("t = {:.2}s, frame {}, {:.1} fps", clock.elapsed(), clock.frame(), clock.fps());
//! ```

use std::time::Duration;

use web_time::Instant;

const FPS_WINDOW: Duration = Duration::from_millis(500);

/// Elapsed time, frame delta, frame count and a rolling fps estimate.
#[derive(Debug, Clone)]
pub struct FrameClock {
    start: Instant,
    last_frame: Instant,
    /// Seconds since start, or the sum of fixed steps.
    elapsed_secs: f32,
    delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    /// Advance by this many seconds per tick instead of wall time.
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// A clock starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fixed_delta: None,
        }
    }

    /// A clock that advances exactly `delta` seconds per tick.
    ///
    /// Headless rendering uses this so snapshots do not depend on how fast
    /// frames are produced.
    pub fn fixed(delta: f32) -> Self {
        Self {
            fixed_delta: Some(delta),
            ..Self::new()
        }
    }

    /// Record a frame. Returns `(elapsed, delta)` in seconds.
    pub fn tick(&mut self) -> (f32, f32) {
        let now = Instant::now();

        match self.fixed_delta {
            Some(step) => {
                self.delta_secs = step;
                self.elapsed_secs += step;
            }
            None => {
                self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
            }
        }
        self.last_frame = now;
        self.frame_count += 1;

        let window = now.duration_since(self.fps_update_time);
        if window >= FPS_WINDOW {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / window.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            log::trace!("{:.1} fps over {} frames", self.fps, frames);
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Seconds since the clock started.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Seconds between the last two ticks.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Ticks so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Frames per second, refreshed every half second. Zero until then.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        assert_eq!(clock.fps(), 0.0);
    }

    #[test]
    fn test_tick_advances() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.tick();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_step_ignores_wall_time() {
        let mut clock = FrameClock::fixed(0.5);
        clock.tick();
        thread::sleep(Duration::from_millis(5));
        let (elapsed, delta) = clock.tick();

        assert_eq!(delta, 0.5);
        assert_eq!(elapsed, 1.0);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_fps_estimate_after_window() {
        let mut clock = FrameClock::new();
        for _ in 0..3 {
            clock.tick();
        }
        thread::sleep(FPS_WINDOW + Duration::from_millis(20));
        clock.tick();
        assert!(clock.fps() > 0.0);
    }
}
