use glam::{EulerRot, Mat4, Vec2, Vec3};
use rand::Rng;

use crate::config::StarfieldConfig;

/// Background point cloud.
///
/// Positions are sampled once and never change; the whole cloud only rotates.
#[derive(Debug, Clone)]
pub struct Starfield {
    points: Box<[Vec3]>,
    /// Rotation angles about x (`.x`) and y (`.y`), in radians.
    rotation: Vec2,
    rotation_step: f32,
}

impl Starfield {
    /// Samples `config.count` points uniformly from `[-extent, extent]` on each axis.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &StarfieldConfig) -> Self {
        let e = config.extent;
        let points = (0..config.count)
            .map(|_| {
                Vec3::new(
                    rng.random_range(-e..=e),
                    rng.random_range(-e..=e),
                    rng.random_range(-e..=e),
                )
            })
            .collect();

        Self {
            points,
            rotation: Vec2::ZERO,
            rotation_step: config.rotation_step,
        }
    }

    #[inline]
    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn rotation(&self) -> Vec2 {
        self.rotation
    }

    /// Advances the x and y rotation by one frame's step.
    ///
    /// Angles grow without bound; the rotation matrix is periodic so no wrap is needed.
    pub fn advance(&mut self) {
        self.rotation += Vec2::splat(self.rotation_step);
    }

    /// Object-to-world transform (x rotation, then y, in intrinsic XYZ order).
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, 0.0)
    }
}
