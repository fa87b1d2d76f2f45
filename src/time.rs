//! Time facilities for the frame loop and gesture debouncing.
//!
//! `Time` is the single source of truth for per-frame delta timing.
//! `Cooldown` is a wall-clock debounce window used to gate the pinch
//! edge-trigger. Uses `std::time` only.
//!
//! # Example
//!
//! ```ignore
//! use handmorph::time::Time;
//!
//! let mut time = Time::new();
//!
//! // In your frame loop:
//! let dt = time.update();
//! engine.step(dt);
//! ```

use std::time::{Duration, Instant};

/// Frame clock for the session loop.
///
/// Tracks elapsed time, per-frame delta, and frame count. A fixed delta
/// can be injected for deterministic stepping in tests.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds (cached for fast access).
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fixed_delta: None,
        }
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns the delta time in seconds.
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();

        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta);
        self.last_frame = now;

        self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
        self.frame_count += 1;

        self.delta_secs
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

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Reset the clock to its initial state.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock debounce window.
///
/// `try_fire` succeeds at most once per window, regardless of how often it
/// is called. The caller supplies the current instant so tests can drive
/// synthetic timelines.
#[derive(Debug, Clone)]
pub struct Cooldown {
    window: Duration,
    last_fired: Option<Instant>,
}

impl Cooldown {
    /// Create a cooldown with the given suppression window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_fired: None,
        }
    }

    /// Whether a fire would currently be allowed.
    pub fn ready(&self, now: Instant) -> bool {
        match self.last_fired {
            None => true,
            Some(at) => now.duration_since(at) >= self.window,
        }
    }

    /// Fire if the window has elapsed. Returns whether the fire happened.
    pub fn try_fire(&mut self, now: Instant) -> bool {
        if self.ready(now) {
            self.last_fired = Some(now);
            true
        } else {
            false
        }
    }

    /// Clear any previous fire, making the cooldown immediately ready.
    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let delta = time.update();

        assert!(delta > 0.0);
        assert!(time.elapsed() > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_fixed_delta() {
        let mut time = Time::new();
        time.set_fixed_delta(Some(1.0 / 60.0));

        thread::sleep(Duration::from_millis(5));
        let delta = time.update();

        // Should use fixed delta regardless of actual time
        assert!((delta - 1.0 / 60.0).abs() < 0.0001);
    }

    #[test]
    fn test_cooldown_window() {
        let mut cd = Cooldown::new(Duration::from_secs(1));
        let t0 = Instant::now();

        assert!(cd.try_fire(t0));
        // Repeated attempts inside the window are suppressed
        assert!(!cd.try_fire(t0 + Duration::from_millis(500)));
        assert!(!cd.try_fire(t0 + Duration::from_millis(999)));
        // Window elapsed
        assert!(cd.try_fire(t0 + Duration::from_millis(1000)));
    }

    #[test]
    fn test_cooldown_reset() {
        let mut cd = Cooldown::new(Duration::from_secs(1));
        let t0 = Instant::now();

        assert!(cd.try_fire(t0));
        cd.reset();
        assert!(cd.try_fire(t0));
    }
}
