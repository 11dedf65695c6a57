//! Frame timing for the render loop.
//!
//! Tracks elapsed time since the loop started, per-frame delta, and a
//! throttled frames-per-second readout. The readout is recomputed only once
//! every [`FPS_THROTTLE_TICKS`] frames, averaged over the frames since the
//! previous readout, so the displayed number doesn't flicker.
//!
//! # Example
//!
//! ```
//! use galaxy::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per frame:
//! time.update();
//!
//! println!("Elapsed: {:.2}s", time.elapsed());
//! println!("Delta: {:.4}s", time.delta());
//! println!("Frame: {}", time.frame());
//! println!("FPS: {:?}", time.fps());
//! ```

use std::time::{Duration, Instant};

/// Frames between two FPS readouts.
pub const FPS_THROTTLE_TICKS: u32 = 15;

/// Initial value of the throttle counter. The counter is checked before it
/// is bumped, so the first readout lands on frame
/// `FPS_THROTTLE_TICKS - FPS_INITIAL_TICKS + 1`.
const FPS_INITIAL_TICKS: u32 = 5;

/// Time tracking for the render loop.
#[derive(Debug, Clone)]
pub struct Time {
    /// When the loop started.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds.
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Last FPS readout, `None` until the first throttle point.
    fps: Option<u32>,
    /// Frames counted toward the next readout.
    throttle_ticks: u32,
    /// Frame count at the previous throttle point.
    fps_frame_count: u64,
    /// Wall-clock time of the previous throttle point.
    fps_update_time: Instant,
}

impl Time {
    /// Create a new time tracker starting from now.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Create a time tracker with an explicit start instant.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last_frame: start,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: None,
            throttle_ticks: FPS_INITIAL_TICKS,
            fps_frame_count: 0,
            fps_update_time: start,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        self.update_at(Instant::now())
    }

    /// Same as [`update`](Self::update) with an explicit current instant.
    pub fn update_at(&mut self, now: Instant) -> (f32, f32) {
        self.delta_secs = now.saturating_duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.elapsed_secs = now.saturating_duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        if self.throttle_ticks >= FPS_THROTTLE_TICKS {
            let window = now.saturating_duration_since(self.fps_update_time);
            if window > Duration::ZERO {
                let frames = self.frame_count - self.fps_frame_count;
                let fps = frames as f64 / window.as_secs_f64();
                self.fps = Some(fps.round() as u32);
                log::debug!("fps readout: {}", fps.round());
            }
            self.throttle_ticks = 0;
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }
        self.throttle_ticks += 1;

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Throttled frames-per-second readout.
    #[inline]
    pub fn fps(&self) -> Option<u32> {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.fps(), None);
        assert_eq!(time.elapsed(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        let (elapsed, delta) = time.update_at(start + ms(10));

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_elapsed_is_absolute() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        for i in 1..=120 {
            time.update_at(start + Duration::from_secs_f64(i as f64 / 60.0));
        }
        assert_eq!(time.elapsed(), 2.0);
    }

    #[test]
    fn test_first_readout_on_frame_eleven() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        for i in 1..=10 {
            time.update_at(start + ms(10 * i));
            assert_eq!(time.fps(), None, "frame {i}");
        }
        time.update_at(start + ms(110));
        // 11 frames in 110ms
        assert_eq!(time.fps(), Some(100));
    }

    #[test]
    fn test_readout_only_changes_at_throttle_points() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        let mut t = 0;
        for _ in 0..11 {
            t += 10;
            time.update_at(start + ms(t));
        }
        assert_eq!(time.fps(), Some(100));

        // Slow down to 20ms frames. The readout holds for 14 frames.
        for _ in 0..14 {
            t += 20;
            time.update_at(start + ms(t));
            assert_eq!(time.fps(), Some(100));
        }
        t += 20;
        time.update_at(start + ms(t));
        assert_eq!(time.fps(), Some(50));
    }

    #[test]
    fn test_zero_length_window_keeps_previous_readout() {
        let start = Instant::now();
        let mut time = Time::starting_at(start);
        for _ in 0..11 {
            time.update_at(start);
        }
        assert_eq!(time.fps(), None);
    }
}
