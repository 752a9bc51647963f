use glam::{Mat4, Vec3};

use crate::config::CameraConfig;
use crate::viewport::ViewportSize;

/// Perspective camera looking at the origin from +Z.
///
/// The projection matrix is cached and only rebuilt on the next use after
/// the aspect ratio changes.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    fov_y: f32, // radians
    near: f32,
    far: f32,
    aspect: f32,
    position: Vec3,
    target: Vec3,

    projection: Mat4,
    projection_dirty: bool,
}

impl PerspectiveCamera {
    pub fn new(config: &CameraConfig, viewport: ViewportSize) -> Self {
        Self {
            fov_y: config.fov_y_degrees.to_radians(),
            near: config.near,
            far: config.far,
            aspect: viewport.aspect(),
            position: Vec3::new(0.0, 0.0, config.distance),
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
            projection_dirty: true,
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[inline]
    pub fn fov_y_degrees(&self) -> f32 {
        self.fov_y.to_degrees()
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn is_projection_dirty(&self) -> bool {
        self.projection_dirty
    }

    /// Sets the aspect ratio from a viewport and marks the projection dirty.
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        self.aspect = viewport.aspect();
        self.projection_dirty = true;
    }

    /// Returns the projection matrix, rebuilding it if dirty.
    pub fn projection(&mut self) -> Mat4 {
        if self.projection_dirty {
            self.projection = Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
            self.projection_dirty = false;
        }
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn view_projection(&mut self) -> Mat4 {
        self.projection() * self.view()
    }
}
