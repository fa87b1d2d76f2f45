//! # handmorph - Hand-Gesture Particle Morphing Engine
//!
//! A fixed-size point cloud that continuously morphs between parametric
//! 3-D shapes and reacts in real time to a tracked hand: position drives a
//! force field, openness blends the palette, and a pinch advances the
//! shape cycle.
//!
//! handmorph is the engine only. Rendering, camera, video capture, and the
//! landmark estimator are external collaborators: the estimator pushes
//! normalized landmark samples in, and the renderer pulls flat
//! position/color arrays out each frame.
//!
//! ## Quick Start
//!
//! ```ignore
//! use handmorph::prelude::*;
//! use std::time::Duration;
//!
//! let engine = Engine::builder()
//!     .with_particle_count(15_000)
//!     .build()?;
//!
//! let mut session = Session::new(engine, |positions: &[f32], colors: &[f32], rotation: f32| {
//!     renderer.draw(positions, colors, rotation);
//! });
//!
//! // Hand estimator thread:
//! let landmarks = session.landmark_sender();
//! estimator.on_result(move |sample| landmarks.publish(sample));
//!
//! session.run_until_stopped(Duration::from_micros(16_667));
//! ```
//!
//! ## Core Concepts
//!
//! ### Shapes
//!
//! [`Shape`] is a fixed catalog (Sphere, Heart, Saturn, Torus, Galaxy).
//! Each pinch gesture advances the cycle and regenerates every particle's
//! target atomically; the live cloud then eases toward the new targets
//! with an exponential approach.
//!
//! ### Gestures
//!
//! The [`GestureInterpreter`](gesture::GestureInterpreter) smooths raw
//! landmark samples into an [`InteractionState`](gesture::InteractionState):
//! a hand center in scene coordinates, an openness scalar (1 = open palm,
//! 0 = fist), and a debounced pinch edge-trigger. A closed fist pulls the
//! cloud toward the hand - the "black hole" effect - under the default
//! [`ForcePolicy::ClosedFist`]; [`ForcePolicy::RadiusBlend`] gates the
//! force by distance and lets an open palm push particles away instead.
//!
//! ### Degradation, not failure
//!
//! A missing hand, a failed estimator, or a denied camera all surface as
//! "no hand": openness relaxes to open, the morph keeps running, and the
//! status sink reports `Searching`. Nothing in the per-frame path errors.
//!
//! ## Feature Flags
//!
//! - `rayon` - parallelize the per-particle step loop with a work-stealing
//!   thread pool. The buffer swap stays atomic per frame.

pub mod buffer;
mod engine;
mod error;
pub mod gesture;
pub mod latest;
pub mod session;
pub mod shapes;
pub mod time;

pub use buffer::ParticleBuffer;
pub use engine::{Engine, EngineBuilder, ForcePolicy};
pub use error::EngineError;
pub use gesture::{GestureInterpreter, HandSample, InteractionState, TrackingStatus};
pub use glam::{Vec2, Vec3};
pub use latest::{LatestSender, LatestSlot, TakeError};
pub use session::{FrameSink, Session, StatusSink, StopHandle};
pub use shapes::Shape;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use handmorph::prelude::*;
/// ```
pub mod prelude {
    pub use crate::buffer::ParticleBuffer;
    pub use crate::engine::{Engine, EngineBuilder, ForcePolicy};
    pub use crate::error::EngineError;
    pub use crate::gesture::{GestureInterpreter, HandSample, InteractionState, TrackingStatus};
    pub use crate::latest::{LatestSender, LatestSlot, TakeError};
    pub use crate::session::{FrameSink, Session, StatusSink, StopHandle};
    pub use crate::shapes::Shape;
    pub use crate::time::Time;
    pub use crate::{Vec2, Vec3};
}
