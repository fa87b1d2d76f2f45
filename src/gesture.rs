//! Hand-landmark interpretation.
//!
//! Consumes raw normalized landmark samples from an external estimator and
//! produces a smoothed [`InteractionState`]: hand center in scene
//! coordinates, an openness scalar, and a debounced pinch edge-trigger.
//!
//! The engine reads only five landmarks of the standard 21-point hand
//! topology: wrist, thumb tip, index fingertip, middle-finger MCP (palm
//! center), and middle fingertip.
//!
//! # Example
//!
//! ```ignore
//! use handmorph::gesture::{GestureInterpreter, HandSample};
//! use std::time::Instant;
//!
//! let mut interp = GestureInterpreter::new();
//!
//! // On each detection result:
//! let state = interp.update(Some(&sample), Instant::now());
//! if state.pinch_fired {
//!     // advance the shape cycle
//! }
//! ```

use crate::error::EngineError;
use crate::time::Cooldown;
use glam::{Vec2, Vec3};
use std::time::{Duration, Instant};

// ========== Landmark indices (21-point hand topology) ==========

/// Wrist landmark index.
pub const WRIST: usize = 0;
/// Thumb-tip landmark index.
pub const THUMB_TIP: usize = 4;
/// Index-fingertip landmark index.
pub const INDEX_TIP: usize = 8;
/// Middle-finger MCP landmark index; used as the palm center.
pub const MIDDLE_MCP: usize = 9;
/// Middle-fingertip landmark index.
pub const MIDDLE_TIP: usize = 12;

/// Highest landmark index the interpreter reads.
const MAX_LANDMARK: usize = MIDDLE_TIP;

// ========== Tuning constants ==========

/// Blend factor for hand-center smoothing while tracking.
const CENTER_SMOOTHING: f32 = 0.1;
/// Blend factor for relaxation when no hand is visible.
const RELAX_RATE: f32 = 0.08;
/// Wrist-to-middle-tip distance mapped to openness 0.
const OPEN_DIST_MIN: f32 = 0.2;
/// Wrist-to-middle-tip distance mapped to openness 1.
const OPEN_DIST_MAX: f32 = 0.5;
/// Thumb-to-index distance below which a pinch qualifies.
const PINCH_DIST: f32 = 0.05;
/// Suppression window after a pinch fires.
const PINCH_COOLDOWN: Duration = Duration::from_secs(1);
/// Horizontal scene extent the image X axis maps onto.
const SCENE_WIDTH: f32 = 20.0;
/// Vertical scene extent the image Y axis maps onto.
const SCENE_HEIGHT: f32 = 15.0;

/// Whether the estimator currently sees a hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// A hand is tracked and driving the interaction state.
    HandDetected,
    /// No hand visible; the state is relaxing toward open/origin.
    Searching,
}

/// One detection result: 21 normalized image-space landmarks.
///
/// Coordinates are in [0,1] with the image origin at the top-left, X
/// growing right and Y growing down, as delivered by standard hand
/// estimators.
#[derive(Debug, Clone)]
pub struct HandSample {
    landmarks: Vec<Vec2>,
}

impl HandSample {
    /// Wrap a landmark set. Fails if the set is too short to index the
    /// middle fingertip.
    pub fn new(landmarks: Vec<Vec2>) -> Result<Self, EngineError> {
        if landmarks.len() <= MAX_LANDMARK {
            return Err(EngineError::TruncatedSample {
                got: landmarks.len(),
                need: MAX_LANDMARK + 1,
            });
        }
        Ok(Self { landmarks })
    }

    /// Landmark position by anatomical index.
    #[inline]
    pub fn landmark(&self, index: usize) -> Vec2 {
        self.landmarks[index]
    }

    /// Image-plane distance between two landmarks.
    #[inline]
    pub fn distance(&self, a: usize, b: usize) -> f32 {
        self.landmarks[a].distance(self.landmarks[b])
    }
}

/// Smoothed interaction state derived from the landmark stream.
///
/// Mutated only by [`GestureInterpreter::update`]; the stepper reads it.
#[derive(Debug, Clone, Copy)]
pub struct InteractionState {
    /// Smoothed hand center in scene coordinates.
    pub hand_center: Vec3,
    /// 1 = fully open palm, 0 = closed fist.
    pub openness: f32,
    /// True exactly once per qualifying pinch.
    pub pinch_fired: bool,
    /// Current tracking status for the UI sink.
    pub status: TrackingStatus,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self {
            hand_center: Vec3::ZERO,
            openness: 1.0,
            pinch_fired: false,
            status: TrackingStatus::Searching,
        }
    }
}

/// Stateful transform from raw landmark samples to [`InteractionState`].
///
/// Openness and hand center are always eased, never snapped, so a noisy
/// estimator cannot make the cloud jitter. The pinch trigger is
/// edge-detected and then debounced by a wall-clock cooldown: one physical
/// pinch advances the shape cycle at most once.
#[derive(Debug)]
pub struct GestureInterpreter {
    state: InteractionState,
    cooldown: Cooldown,
    /// Whether the previous sample already qualified as a pinch.
    was_pinching: bool,
}

impl GestureInterpreter {
    /// Create an interpreter in the relaxed (open hand, origin) state.
    pub fn new() -> Self {
        Self {
            state: InteractionState::default(),
            cooldown: Cooldown::new(PINCH_COOLDOWN),
            was_pinching: false,
        }
    }

    /// Current state without consuming anything.
    #[inline]
    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    /// Fold one detection result (or its absence) into the state.
    ///
    /// `now` is supplied by the caller so tests can drive a synthetic
    /// timeline through the pinch cooldown.
    pub fn update(&mut self, sample: Option<&HandSample>, now: Instant) -> &InteractionState {
        self.state.pinch_fired = false;

        match sample {
            Some(sample) => self.track(sample, now),
            None => self.relax(),
        }

        &self.state
    }

    /// Hand visible: smooth toward the mapped palm, derive openness,
    /// evaluate the pinch edge.
    fn track(&mut self, sample: &HandSample, now: Instant) {
        self.state.status = TrackingStatus::HandDetected;

        let target = map_to_scene(sample.landmark(MIDDLE_MCP));
        self.state.hand_center = self.state.hand_center.lerp(target, CENTER_SMOOTHING);

        let spread = sample.distance(WRIST, MIDDLE_TIP);
        let openness = (spread - OPEN_DIST_MIN) / (OPEN_DIST_MAX - OPEN_DIST_MIN);
        self.state.openness = openness.clamp(0.0, 1.0);

        let pinching = sample.distance(THUMB_TIP, INDEX_TIP) < PINCH_DIST;
        if pinching && !self.was_pinching && self.cooldown.try_fire(now) {
            self.state.pinch_fired = true;
        }
        self.was_pinching = pinching;
    }

    /// No hand: ease openness back toward open and the center toward the
    /// origin. Pinch state is not evaluated.
    fn relax(&mut self) {
        self.state.status = TrackingStatus::Searching;
        self.state.openness += (1.0 - self.state.openness) * RELAX_RATE;
        self.state.hand_center = self.state.hand_center.lerp(Vec3::ZERO, RELAX_RATE);
        self.was_pinching = false;
    }
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a normalized image point to scene coordinates.
///
/// X is inverted to mirror a front-facing camera; Y is inverted because
/// image Y grows downward. The hand stays in the Z=0 plane.
fn map_to_scene(p: Vec2) -> Vec3 {
    Vec3::new(
        -(p.x - 0.5) * SCENE_WIDTH,
        -(p.y - 0.5) * SCENE_HEIGHT,
        0.0,
    )
}
