//! Host-driven frame loop.
//!
//! A [`Session`] wires an [`Engine`](crate::Engine) to its external
//! collaborators: the asynchronous landmark source (through a
//! [`LatestSlot`]), the render surface (a [`FrameSink`]), and the optional
//! status display (a [`StatusSink`]). The host either calls
//! [`Session::tick`] from its own refresh callback or hands control to
//! [`Session::run_until_stopped`], which paces itself with a frame
//! interval.
//!
//! Teardown is cooperative: a [`StopHandle`] can be triggered from any
//! thread and from any state; once stopped, no further step, force
//! computation, or target regeneration runs.
//!
//! # Example
//!
//! ```ignore
//! use handmorph::prelude::*;
//! use std::time::Duration;
//!
//! let engine = Engine::builder().build()?;
//! let mut session = Session::new(engine, renderer);
//! let landmarks = session.landmark_sender();
//! let stop = session.stop_handle();
//!
//! // Estimator thread publishes at its own cadence:
//! //   landmarks.publish(Some(sample));   // hand seen
//! //   landmarks.publish(None);           // no hand this cycle
//!
//! session.run_until_stopped(Duration::from_micros(16_667));
//! ```

use crate::engine::Engine;
use crate::gesture::{HandSample, TrackingStatus};
use crate::latest::{LatestSender, LatestSlot, TakeError};
use crate::time::Time;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Receives the per-frame draw data.
///
/// Positions and colors are flat arrays, three components per particle;
/// `rotation` is the whole-system angle about the vertical axis. The sink
/// must not assume anything about camera, viewport, or pixel ratio.
pub trait FrameSink {
    /// Called once per frame with read-only views of the live buffers.
    fn frame(&mut self, positions: &[f32], colors: &[f32], rotation: f32);
}

impl<F: FnMut(&[f32], &[f32], f32)> FrameSink for F {
    fn frame(&mut self, positions: &[f32], colors: &[f32], rotation: f32) {
        self(positions, colors, rotation)
    }
}

/// Receives human-readable state notifications. Purely observational;
/// nothing flows back into the engine.
pub trait StatusSink {
    /// Tracking status changed (hand found / lost).
    fn tracking(&mut self, status: TrackingStatus);
    /// The active shape changed; `name` is its display name.
    fn shape(&mut self, name: &str);
}

/// Cooperative cancellation flag for a running session.
///
/// Clone freely and trigger from any thread; `stop` is idempotent and safe
/// to call before the loop starts or after it has already exited.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    /// Create a fresh, un-triggered handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the session to stop after the current frame.
    pub fn stop(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// Glue between an engine and its host.
pub struct Session<F: FrameSink> {
    engine: Engine,
    landmarks: LatestSlot<Option<HandSample>>,
    frame_sink: F,
    status_sink: Option<Box<dyn StatusSink + Send>>,
    stop: StopHandle,
    time: Time,
    last_status: Option<TrackingStatus>,
}

impl<F: FrameSink> Session<F> {
    /// Create a session around a built engine and a render sink.
    pub fn new(engine: Engine, frame_sink: F) -> Self {
        Self {
            engine,
            landmarks: LatestSlot::new(),
            frame_sink,
            status_sink: None,
            stop: StopHandle::new(),
            time: Time::new(),
            last_status: None,
        }
    }

    /// Attach a status/UI sink.
    pub fn with_status_sink(mut self, sink: Box<dyn StatusSink + Send>) -> Self {
        self.status_sink = Some(sink);
        self
    }

    /// Producer handle for the landmark estimator.
    ///
    /// Publish `Some(sample)` when a hand was detected this cycle and
    /// `None` when the estimator saw nothing (or failed); the engine keeps
    /// running either way. Dropping every sender counts as losing the
    /// hand: the session relaxes back to the open-hand baseline.
    pub fn landmark_sender(&self) -> LatestSender<Option<HandSample>> {
        self.landmarks.sender()
    }

    /// Handle for stopping the session from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The engine being driven. Read-only; the session is its sole driver.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run one frame: fold in the latest landmark delivery, step the
    /// engine, and publish buffers and status changes to the sinks.
    ///
    /// Returns `false` once a stop has been requested; nothing runs in
    /// that case.
    pub fn tick(&mut self) -> bool {
        if self.stop.is_stopped() {
            return false;
        }

        let dt = self.time.update();

        match self.landmarks.try_take() {
            Ok(delivery) => self.engine.observe(delivery.as_ref(), Instant::now()),
            // A quiet estimator keeps its last reading; a dead one must
            // not pin the hand in place forever
            Err(TakeError::Empty) => {}
            Err(TakeError::Disconnected) => self.engine.observe(None, Instant::now()),
        }

        let status = self.engine.interaction().status;
        if self.last_status != Some(status) {
            // First transition doubles as the initial announcement
            if self.last_status.is_none() {
                if let Some(sink) = &mut self.status_sink {
                    sink.shape(self.engine.shape().display_name());
                }
            }
            self.last_status = Some(status);
            if let Some(sink) = &mut self.status_sink {
                sink.tracking(status);
            }
        }

        if let Some(shape) = self.engine.step(dt) {
            if let Some(sink) = &mut self.status_sink {
                sink.shape(shape.display_name());
            }
        }

        self.frame_sink.frame(
            self.engine.buffer().positions_flat(),
            self.engine.buffer().colors_flat(),
            self.engine.buffer().rotation(),
        );

        true
    }

    /// Drive `tick` at roughly `frame_interval` until stopped.
    ///
    /// Blocks the calling thread. Useful for hosts without their own
    /// display callback; hosts with one should call [`tick`](Self::tick)
    /// directly.
    pub fn run_until_stopped(&mut self, frame_interval: Duration) {
        self.time.reset();
        loop {
            let frame_start = Instant::now();
            if !self.tick() {
                break;
            }
            let spent = frame_start.elapsed();
            if let Some(remaining) = frame_interval.checked_sub(spent) {
                std::thread::sleep(remaining);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::gesture::{MIDDLE_TIP, THUMB_TIP, WRIST};
    use glam::Vec2;
    use std::sync::Mutex;

    fn engine() -> Engine {
        Engine::builder()
            .with_particle_count(32)
            .with_seed(11)
            .build()
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        tracking: Vec<TrackingStatus>,
        shapes: Vec<String>,
    }

    struct SharedRecorder(Arc<Mutex<Recorder>>);

    impl StatusSink for SharedRecorder {
        fn tracking(&mut self, status: TrackingStatus) {
            self.0.lock().unwrap().tracking.push(status);
        }
        fn shape(&mut self, name: &str) {
            self.0.lock().unwrap().shapes.push(name.to_string());
        }
    }

    fn open_sample() -> HandSample {
        let mut landmarks = vec![Vec2::new(0.5, 0.5); 21];
        landmarks[WRIST] = Vec2::new(0.5, 0.8);
        landmarks[MIDDLE_TIP] = Vec2::new(0.5, 0.2);
        landmarks[THUMB_TIP] = Vec2::new(0.3, 0.5);
        HandSample::new(landmarks).unwrap()
    }

    #[test]
    fn test_tick_publishes_frames() {
        let frames = Arc::new(Mutex::new(0usize));
        let counter = Arc::clone(&frames);

        let mut session = Session::new(engine(), move |positions: &[f32], colors: &[f32], _r: f32| {
            assert_eq!(positions.len(), 32 * 3);
            assert_eq!(colors.len(), 32 * 3);
            *counter.lock().unwrap() += 1;
        });

        for _ in 0..5 {
            assert!(session.tick());
        }
        assert_eq!(*frames.lock().unwrap(), 5);
    }

    #[test]
    fn test_stop_halts_ticks() {
        let mut session = Session::new(engine(), |_: &[f32], _: &[f32], _: f32| {});
        let stop = session.stop_handle();

        assert!(session.tick());
        stop.stop();
        assert!(!session.tick());
        assert!(!session.tick());
    }

    #[test]
    fn test_run_until_stopped_exits() {
        let mut session = Session::new(engine(), |_: &[f32], _: &[f32], _: f32| {});
        let stop = session.stop_handle();

        let watchdog = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            stop.stop();
        });
        session.run_until_stopped(Duration::from_millis(1));
        watchdog.join().unwrap();
    }

    #[test]
    fn test_status_transitions_reported_once() {
        let recorder = Arc::new(Mutex::new(Recorder::default()));
        let mut session = Session::new(engine(), |_: &[f32], _: &[f32], _: f32| {})
            .with_status_sink(Box::new(SharedRecorder(Arc::clone(&recorder))));
        let sender = session.landmark_sender();

        // No delivery yet: initial status is Searching, reported once
        session.tick();
        session.tick();

        sender.publish(Some(open_sample()));
        session.tick();
        session.tick();

        sender.publish(None);
        session.tick();

        let tracking = recorder.lock().unwrap().tracking.clone();
        assert_eq!(
            tracking,
            vec![
                TrackingStatus::Searching,
                TrackingStatus::HandDetected,
                TrackingStatus::Searching,
            ]
        );
    }

    #[test]
    fn test_dead_estimator_releases_the_hand() {
        let mut session = Session::new(engine(), |_: &[f32], _: &[f32], _: f32| {});
        let sender = session.landmark_sender();

        // Closed fist: wrist and middle tip nearly touching
        let mut landmarks = vec![Vec2::new(0.5, 0.5); 21];
        landmarks[WRIST] = Vec2::new(0.5, 0.55);
        landmarks[MIDDLE_TIP] = Vec2::new(0.5, 0.45);
        sender.publish(Some(HandSample::new(landmarks).unwrap()));
        session.tick();
        assert_eq!(
            session.engine().interaction().status,
            TrackingStatus::HandDetected
        );
        assert_eq!(session.engine().interaction().openness, 0.0);

        // Estimator thread dies without a final `None`
        drop(sender);
        for _ in 0..120 {
            assert!(session.tick());
        }
        assert_eq!(
            session.engine().interaction().status,
            TrackingStatus::Searching
        );
        assert!(session.engine().interaction().openness > 0.9);
    }

    #[test]
    fn test_estimator_silence_keeps_loop_running() {
        // No landmark producer at all: the morph loop must keep going
        let mut session = Session::new(engine(), |_: &[f32], _: &[f32], _: f32| {});
        for _ in 0..10 {
            assert!(session.tick());
        }
        assert_eq!(session.engine().interaction().openness, 1.0);
    }
}
