//! The shape catalog and target point-cloud generation.
//!
//! Each [`Shape`] maps a particle index to a 3-D target position. Generation
//! is randomized sampling, not a deterministic formula: regenerating the same
//! shape yields a new but statistically equivalent cloud. The RNG is supplied
//! by the caller so tests can seed it for reproducibility.
//!
//! # Example
//!
//! ```ignore
//! use handmorph::Shape;
//! use rand::rngs::SmallRng;
//! use rand::SeedableRng;
//!
//! let mut rng = SmallRng::seed_from_u64(7);
//! let targets = Shape::Torus.generate(15_000, &mut rng);
//! assert_eq!(targets.len(), 15_000);
//! ```

use glam::Vec3;
use rand::Rng;
use std::f32::consts::TAU;

/// Sphere radius in scene units.
const SPHERE_RADIUS: f32 = 6.0;
/// Azimuth sweep multiplier: index-proportional angle wraps 50 times.
const SPHERE_TURNS: f32 = 50.0;
/// Uniform scale applied to the parametric heart curve.
const HEART_SCALE: f32 = 0.4;
/// Half-thickness of the heart in Z.
const HEART_DEPTH: f32 = 0.6;
/// Radius of the Saturn planet core.
const SATURN_CORE_RADIUS: f32 = 4.0;
/// Inner and outer radius of the Saturn ring annulus.
const SATURN_RING: (f32, f32) = (4.0, 9.0);
/// Half-thickness of the ring.
const SATURN_RING_DEPTH: f32 = 0.3;
/// Ring tilt about the X axis, radians.
const SATURN_TILT: f32 = 0.5;
/// Fraction of particles assigned to the planet core.
const SATURN_CORE_SPLIT: f32 = 0.7;
/// Torus major radius.
const TORUS_RADIUS: f32 = 6.0;
/// Torus tube radius.
const TORUS_TUBE: f32 = 2.0;
/// Maximum galaxy radius.
const GALAXY_RADIUS: f32 = 10.0;
/// Full rotations of each spiral arm across the particle range.
const GALAXY_TURNS: f32 = 3.0;
/// Number of spiral arms.
const GALAXY_ARMS: usize = 2;
/// Extra angular twist per unit radius, bending the arms.
const GALAXY_TWIST: f32 = 0.35;
/// Maximum vertical displacement at the galactic center.
const GALAXY_HEIGHT: f32 = 1.0;

/// A named target shape for the particle cloud.
///
/// The catalog order is the cycle order: each pinch advances to the next
/// variant, wrapping at the end. Unknown or unparsable names fall back to
/// [`Shape::Sphere`] so targets are never left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shape {
    /// Uniform shell of radius 6.
    #[default]
    Sphere,
    /// Parametric heart curve, extruded slightly in Z, facing the viewer.
    Heart,
    /// Spherical core plus a tilted flat ring.
    Saturn,
    /// Standard torus, major radius 6, tube radius 2.
    Torus,
    /// Two-armed spiral with center-biased density.
    Galaxy,
}

impl Shape {
    /// All shapes in cycle order.
    pub const CATALOG: [Shape; 5] = [
        Shape::Sphere,
        Shape::Heart,
        Shape::Saturn,
        Shape::Torus,
        Shape::Galaxy,
    ];

    /// Human-readable name for the status sink.
    pub fn display_name(&self) -> &'static str {
        match self {
            Shape::Sphere => "Sphere",
            Shape::Heart => "Heart",
            Shape::Saturn => "Saturn",
            Shape::Torus => "Torus",
            Shape::Galaxy => "Galaxy",
        }
    }

    /// Parse a display name, falling back to the default shape.
    ///
    /// Unrecognized names resolve to `Sphere` rather than failing, so a
    /// stale or misspelled request can never leave targets undefined.
    pub fn from_name(name: &str) -> Shape {
        Shape::CATALOG
            .into_iter()
            .find(|s| s.display_name().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// Shape following this one in the catalog, wrapping at the end.
    pub fn next(&self) -> Shape {
        let i = Shape::CATALOG.iter().position(|s| s == self).unwrap_or(0);
        Shape::CATALOG[(i + 1) % Shape::CATALOG.len()]
    }

    /// Generate a full target cloud of `count` points.
    pub fn generate<R: Rng>(self, count: usize, rng: &mut R) -> Vec<Vec3> {
        let mut out = vec![Vec3::ZERO; count];
        self.generate_into(&mut out, rng);
        out
    }

    /// Fill `out` with target points for this shape.
    ///
    /// Every slot is written; callers rely on this to swap a fully
    /// populated buffer in one move.
    pub fn generate_into<R: Rng>(self, out: &mut [Vec3], rng: &mut R) {
        let count = out.len();
        for (i, slot) in out.iter_mut().enumerate() {
            // Index-derived angles use n in [0,1) so angular density does
            // not depend on the particle count.
            let n = i as f32 / count as f32;
            *slot = match self {
                Shape::Sphere => sphere_point(n, rng),
                Shape::Heart => heart_point(rng),
                Shape::Saturn => saturn_point(rng),
                Shape::Torus => torus_point(rng),
                Shape::Galaxy => galaxy_point(i, n, rng),
            };
        }
    }
}

/// Uniform-on-sphere sample: index-swept azimuth, arccos-distributed polar.
fn sphere_point<R: Rng>(n: f32, rng: &mut R) -> Vec3 {
    let theta = n * TAU * SPHERE_TURNS;
    let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();

    Vec3::new(
        SPHERE_RADIUS * phi.sin() * theta.cos(),
        SPHERE_RADIUS * phi.sin() * theta.sin(),
        SPHERE_RADIUS * phi.cos(),
    )
}

/// Classic parametric heart in the XY plane with random Z jitter.
fn heart_point<R: Rng>(rng: &mut R) -> Vec3 {
    let t = rng.gen_range(0.0..TAU);
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    let z = rng.gen_range(-HEART_DEPTH..HEART_DEPTH);

    Vec3::new(x * HEART_SCALE, y * HEART_SCALE, z)
}

/// Planet core or tilted ring, split 70/30 per particle.
fn saturn_point<R: Rng>(rng: &mut R) -> Vec3 {
    if rng.gen::<f32>() < SATURN_CORE_SPLIT {
        // Core: uniform shell
        let theta = rng.gen_range(0.0..TAU);
        let phi = (2.0 * rng.gen::<f32>() - 1.0).acos();
        Vec3::new(
            SATURN_CORE_RADIUS * phi.sin() * theta.cos(),
            SATURN_CORE_RADIUS * phi.sin() * theta.sin(),
            SATURN_CORE_RADIUS * phi.cos(),
        )
    } else {
        // Ring: flat annulus in XZ, tilted about X
        let (inner, outer) = SATURN_RING;
        let theta = rng.gen_range(0.0..TAU);
        let r = rng.gen_range(inner..outer);
        let flat = Vec3::new(
            r * theta.cos(),
            rng.gen_range(-SATURN_RING_DEPTH..SATURN_RING_DEPTH),
            r * theta.sin(),
        );
        rotate_x(flat, SATURN_TILT)
    }
}

/// Standard torus parametrization with independent uniform angles.
fn torus_point<R: Rng>(rng: &mut R) -> Vec3 {
    let u = rng.gen_range(0.0..TAU);
    let v = rng.gen_range(0.0..TAU);
    let ring = TORUS_RADIUS + TORUS_TUBE * v.cos();

    Vec3::new(ring * u.cos(), ring * u.sin(), TORUS_TUBE * v.sin())
}

/// Spiral arm sample: squared radius bias pulls density toward the center,
/// arm index offsets the angle, vertical scatter tapers outward.
fn galaxy_point<R: Rng>(index: usize, n: f32, rng: &mut R) -> Vec3 {
    let radius = rng.gen::<f32>().powi(2) * GALAXY_RADIUS;
    let arm = (index % GALAXY_ARMS) as f32;
    let angle = n * TAU * GALAXY_TURNS + arm * (TAU / GALAXY_ARMS as f32) + radius * GALAXY_TWIST;
    let taper = 1.0 - radius / (GALAXY_RADIUS * 1.2);
    let y = rng.gen_range(-GALAXY_HEIGHT..GALAXY_HEIGHT) * taper;

    Vec3::new(radius * angle.cos(), y, radius * angle.sin())
}

fn rotate_x(v: Vec3, angle: f32) -> Vec3 {
    let (s, c) = angle.sin_cos();
    Vec3::new(v.x, v.y * c - v.z * s, v.y * s + v.z * c)
}
