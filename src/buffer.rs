//! Fixed-size particle buffers.
//!
//! `ParticleBuffer` owns the live positions, target positions, and live
//! colors for every particle, plus the scene rotation angle. Particles are
//! never created or destroyed after construction; indices are stable
//! identities. The renderer receives zero-copy flat `&[f32]` views, three
//! components per particle.

use crate::shapes::Shape;
use glam::Vec3;
use rand::Rng;

/// Half-extent of the cube that initial live positions are scattered in.
const SPAWN_EXTENT: f32 = 10.0;

/// Live state for a fixed population of particles.
///
/// Target regeneration is atomic: new targets are written into a scratch
/// buffer and swapped in whole, so no frame ever reads a partially
/// regenerated target set.
#[derive(Debug)]
pub struct ParticleBuffer {
    positions: Vec<Vec3>,
    targets: Vec<Vec3>,
    colors: Vec<Vec3>,
    /// Regeneration scratch; only touched during retarget.
    scratch: Vec<Vec3>,
    /// Whole-system rotation about the vertical axis, radians.
    rotation: f32,
}

impl ParticleBuffer {
    /// Create a buffer of `count` particles with live positions scattered
    /// uniformly in a cube around the origin and targets set for `shape`.
    pub fn new<R: Rng>(count: usize, shape: Shape, rng: &mut R) -> Self {
        let positions = (0..count)
            .map(|_| {
                Vec3::new(
                    rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                    rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                    rng.gen_range(-SPAWN_EXTENT..SPAWN_EXTENT),
                )
            })
            .collect();

        let targets = shape.generate(count, rng);

        Self {
            positions,
            targets,
            colors: vec![Vec3::ZERO; count],
            scratch: vec![Vec3::ZERO; count],
            rotation: 0.0,
        }
    }

    /// Number of particles. Fixed for the buffer's lifetime.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffer holds no particles.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Regenerate all targets for `shape` and swap them in atomically.
    ///
    /// The live target buffer is untouched until every scratch slot has
    /// been written.
    pub fn retarget<R: Rng>(&mut self, shape: Shape, rng: &mut R) {
        shape.generate_into(&mut self.scratch, rng);
        std::mem::swap(&mut self.targets, &mut self.scratch);
    }

    /// Live positions.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Current targets.
    #[inline]
    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    /// Live colors (RGB, 0-1).
    #[inline]
    pub fn colors(&self) -> &[Vec3] {
        &self.colors
    }

    /// Mutable access to the per-particle arrays for the step loop:
    /// `(positions, targets, colors)`.
    #[inline]
    pub(crate) fn particles_mut(&mut self) -> (&mut [Vec3], &[Vec3], &mut [Vec3]) {
        (&mut self.positions, &self.targets, &mut self.colors)
    }

    /// Flat position view for the render surface: `[x0, y0, z0, x1, ...]`.
    #[inline]
    pub fn positions_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Flat color view for the render surface: `[r0, g0, b0, r1, ...]`.
    #[inline]
    pub fn colors_flat(&self) -> &[f32] {
        bytemuck::cast_slice(&self.colors)
    }

    /// Current rotation about the vertical axis, radians.
    #[inline]
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Advance the whole-system rotation.
    #[inline]
    pub(crate) fn rotate(&mut self, delta: f32) {
        self.rotation += delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn buffer(count: usize) -> ParticleBuffer {
        let mut rng = SmallRng::seed_from_u64(1);
        ParticleBuffer::new(count, Shape::Sphere, &mut rng)
    }

    #[test]
    fn test_construction() {
        let buf = buffer(100);
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.targets().len(), 100);
        assert_eq!(buf.colors().len(), 100);
        assert_eq!(buf.rotation(), 0.0);
    }

    #[test]
    fn test_flat_views() {
        let buf = buffer(64);
        assert_eq!(buf.positions_flat().len(), 64 * 3);
        assert_eq!(buf.colors_flat().len(), 64 * 3);

        let p = buf.positions()[5];
        let flat = buf.positions_flat();
        assert_eq!(flat[15], p.x);
        assert_eq!(flat[16], p.y);
        assert_eq!(flat[17], p.z);
    }

    #[test]
    fn test_retarget_replaces_all() {
        let mut buf = buffer(200);
        let before = buf.targets().to_vec();
        let mut rng = SmallRng::seed_from_u64(2);
        buf.retarget(Shape::Torus, &mut rng);

        assert_eq!(buf.targets().len(), 200);
        assert_ne!(buf.targets(), before.as_slice());
        for t in buf.targets() {
            assert!(t.is_finite());
        }
    }

    #[test]
    fn test_spawn_inside_extent() {
        let buf = buffer(500);
        for p in buf.positions() {
            assert!(p.x.abs() <= SPAWN_EXTENT);
            assert!(p.y.abs() <= SPAWN_EXTENT);
            assert!(p.z.abs() <= SPAWN_EXTENT);
        }
    }
}
