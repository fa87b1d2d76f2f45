//! The morph/interaction engine.
//!
//! [`Engine`] owns the particle buffer, the gesture interpreter, and the
//! shape cycle. [`Engine::step`] is the per-frame update and the sole
//! mutator of the live buffers: it eases positions toward their targets,
//! applies the gesture force field, recomputes colors, advances the global
//! rotation, and services a pending pinch by cycling to the next shape.
//!
//! # Example
//!
//! ```ignore
//! use handmorph::prelude::*;
//!
//! let mut engine = Engine::builder()
//!     .with_particle_count(15_000)
//!     .with_force_policy(ForcePolicy::ClosedFist)
//!     .build()?;
//!
//! // Per display frame:
//! engine.observe(latest_sample.as_ref(), Instant::now());
//! engine.step(dt);
//! renderer.draw(engine.buffer().positions_flat(), engine.buffer().colors_flat());
//! ```

use crate::buffer::ParticleBuffer;
use crate::error::EngineError;
use crate::gesture::{GestureInterpreter, HandSample, InteractionState};
use crate::shapes::Shape;
use glam::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
use std::time::Instant;

/// Morph rate constant. Chosen so one 60 FPS frame closes 5% of the
/// remaining distance to the target: 1 - exp(-RATE/60) = 0.05.
const MORPH_RATE: f32 = 3.0776;
/// Attraction rate constant; 12% of the displacement per 60 FPS frame.
const PULL_RATE: f32 = 7.6703;
/// Openness below this counts as a closed fist.
const CLOSED_THRESHOLD: f32 = 0.3;
/// Whole-system spin about the vertical axis, radians per second
/// (0.002 rad per frame at 60 FPS).
const ROTATION_SPEED: f32 = 0.12;
/// Range of the distance-gated force field.
const INTERACTION_RADIUS: f32 = 5.0;
/// Outward push speed for the open hand under `RadiusBlend`, units/s.
const REPEL_SPEED: f32 = 4.0;

/// Default gradient endpoint at index 0: cyan.
const GRADIENT_START: Vec3 = Vec3::new(0.0, 1.0, 1.0);
/// Default gradient endpoint at the last index: magenta.
const GRADIENT_END: Vec3 = Vec3::new(1.0, 0.0, 1.0);
/// Color the cloud blends toward as the fist closes.
const FIST_COLOR: Vec3 = Vec3::new(1.0, 0.133, 0.0);

/// How the hand's force field acts on the cloud.
///
/// The two policies are mutually exclusive by design; pick one when
/// building the engine rather than layering both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForcePolicy {
    /// The "black hole" effect: while the fist is closed, every particle
    /// is pulled toward the hand center, regardless of distance.
    #[default]
    ClosedFist,

    /// Distance-gated blend: only particles within the interaction radius
    /// react. A closed fist attracts with linear falloff; an open hand
    /// pushes particles away with force proportional to
    /// `(radius - distance) / radius`.
    RadiusBlend,
}

/// Builder for [`Engine`]. Use method chaining, then call `.build()`.
pub struct EngineBuilder {
    particle_count: usize,
    seed: Option<u64>,
    policy: ForcePolicy,
    gradient: (Vec3, Vec3),
    fist_color: Vec3,
}

impl EngineBuilder {
    fn new() -> Self {
        Self {
            particle_count: 15_000,
            seed: None,
            policy: ForcePolicy::default(),
            gradient: (GRADIENT_START, GRADIENT_END),
            fist_color: FIST_COLOR,
        }
    }

    /// Set the number of particles. Fixed for the engine's lifetime.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Seed the shape-sampling RNG for reproducible clouds.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Choose the force-field policy.
    pub fn with_force_policy(mut self, policy: ForcePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the index-gradient endpoint colors (RGB, 0-1).
    pub fn with_gradient(mut self, start: Vec3, end: Vec3) -> Self {
        self.gradient = (start, end);
        self
    }

    /// Set the closed-fist blend color (RGB, 0-1).
    pub fn with_fist_color(mut self, color: Vec3) -> Self {
        self.fist_color = color;
        self
    }

    /// Build the engine, scattering initial positions and generating
    /// targets for the first catalog shape.
    pub fn build(self) -> Result<Engine, EngineError> {
        if self.particle_count == 0 {
            return Err(EngineError::ZeroParticles);
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        let shape = Shape::CATALOG[0];
        let buffer = ParticleBuffer::new(self.particle_count, shape, &mut rng);

        Ok(Engine {
            buffer,
            interpreter: GestureInterpreter::new(),
            shape,
            rng,
            policy: self.policy,
            gradient: self.gradient,
            fist_color: self.fist_color,
            pending_pinch: false,
        })
    }
}

/// One session's particle morphing context.
///
/// Owns the buffers and all mutable interaction state; create one per
/// session and drive it with [`observe`](Engine::observe) and
/// [`step`](Engine::step).
#[derive(Debug)]
pub struct Engine {
    buffer: ParticleBuffer,
    interpreter: GestureInterpreter,
    shape: Shape,
    rng: SmallRng,
    policy: ForcePolicy,
    gradient: (Vec3, Vec3),
    fist_color: Vec3,
    /// Pinch edge seen by `observe` but not yet serviced by `step`.
    pending_pinch: bool,
}

impl Engine {
    /// Start building an engine with default settings.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Feed the most recent landmark delivery into the interpreter.
    ///
    /// `None` means the estimator reported no hand; the interaction state
    /// relaxes rather than snapping. Safe to call at any cadence relative
    /// to [`step`](Engine::step) - a pinch edge is latched until the next
    /// step services it.
    pub fn observe(&mut self, sample: Option<&HandSample>, now: Instant) {
        let state = self.interpreter.update(sample, now);
        if state.pinch_fired {
            self.pending_pinch = true;
        }
    }

    /// Advance the simulation by `dt` seconds. Call once per display frame.
    ///
    /// Returns the newly selected shape if a pinch advanced the cycle.
    pub fn step(&mut self, dt: f32) -> Option<Shape> {
        let state = *self.interpreter.state();

        // Per-frame blend fractions, frame-rate independent
        let morph = 1.0 - (-MORPH_RATE * dt).exp();
        let pull = 1.0 - (-PULL_RATE * dt).exp();

        let count = self.buffer.len() as f32;
        let policy = self.policy;
        let (grad_start, grad_end) = self.gradient;
        let fist = self.fist_color;

        let body = move |i: usize, pos: &mut Vec3, target: &Vec3, color: &mut Vec3| {
            *pos += (*target - *pos) * morph;
            apply_force(policy, &state, pull, dt, pos);

            let base = grad_start.lerp(grad_end, i as f32 / count);
            *color = fist.lerp(base, state.openness);
        };

        let (positions, targets, colors) = self.buffer.particles_mut();

        #[cfg(feature = "rayon")]
        positions
            .par_iter_mut()
            .zip(targets.par_iter())
            .zip(colors.par_iter_mut())
            .enumerate()
            .for_each(|(i, ((pos, target), color))| body(i, pos, target, color));

        #[cfg(not(feature = "rayon"))]
        for (i, ((pos, target), color)) in positions
            .iter_mut()
            .zip(targets.iter())
            .zip(colors.iter_mut())
            .enumerate()
        {
            body(i, pos, target, color);
        }

        self.buffer.rotate(ROTATION_SPEED * dt);

        if std::mem::take(&mut self.pending_pinch) {
            self.advance_shape();
            Some(self.shape)
        } else {
            None
        }
    }

    /// Advance the cycle and atomically regenerate targets.
    fn advance_shape(&mut self) {
        self.shape = self.shape.next();
        self.buffer.retarget(self.shape, &mut self.rng);
    }

    /// Force a specific shape, regenerating targets atomically.
    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
        self.buffer.retarget(shape, &mut self.rng);
    }

    /// The currently selected shape.
    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// The smoothed interaction state.
    #[inline]
    pub fn interaction(&self) -> &InteractionState {
        self.interpreter.state()
    }

    /// Read-only view of the particle buffers.
    #[inline]
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }
}

/// Apply the gesture force field to one particle position.
fn apply_force(
    policy: ForcePolicy,
    state: &InteractionState,
    pull: f32,
    dt: f32,
    pos: &mut Vec3,
) {
    match policy {
        ForcePolicy::ClosedFist => {
            if state.openness < CLOSED_THRESHOLD {
                *pos += (state.hand_center - *pos) * pull;
            }
        }
        ForcePolicy::RadiusBlend => {
            let offset = *pos - state.hand_center;
            let dist = offset.length();
            if dist >= INTERACTION_RADIUS || dist <= f32::EPSILON {
                return;
            }
            let falloff = (INTERACTION_RADIUS - dist) / INTERACTION_RADIUS;
            if state.openness < CLOSED_THRESHOLD {
                *pos -= offset * pull * falloff;
            } else {
                *pos += offset / dist * REPEL_SPEED * falloff * dt;
            }
        }
    }
}
