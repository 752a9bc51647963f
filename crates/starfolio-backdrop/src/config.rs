use std::ops::RangeInclusive;
use std::time::Duration;

use anyhow::{ensure, Result};
use glam::Vec3;
use starfolio_engine::paint::Color;

/// Backdrop configuration.
///
/// The defaults describe the page's ambient starfield; tests override single
/// fields (e.g. a spawn probability of 1) to make behavior deterministic.
#[derive(Debug, Clone)]
pub struct BackdropConfig {
    pub starfield: StarfieldConfig,
    pub streaks: StreakConfig,
    pub camera: CameraConfig,

    /// Clear color of the render surface. Transparent so the page shows through.
    pub clear_color: Color,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            starfield: StarfieldConfig::default(),
            streaks: StreakConfig::default(),
            camera: CameraConfig::default(),
            clear_color: Color::transparent(),
        }
    }
}

impl BackdropConfig {
    /// Rejects values the scene cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.starfield.validate()?;
        self.streaks.validate()?;
        self.camera.validate()?;
        ensure!(self.clear_color.is_finite(), "clear color must be finite");
        Ok(())
    }
}

/// Static background point cloud.
#[derive(Debug, Clone)]
pub struct StarfieldConfig {
    /// Number of points.
    pub count: usize,
    /// Half-extent of the cube points are sampled from, per axis.
    pub extent: f32,
    pub point_size: f32,
    pub opacity: f32,
    pub color: Color,
    /// Rotation added to the x and y angles every frame, in radians.
    pub rotation_step: f32,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            extent: 1000.0,
            point_size: 1.5,
            opacity: 0.8,
            color: Color::WHITE,
            rotation_step: 0.0005,
        }
    }
}

impl StarfieldConfig {
    fn validate(&self) -> Result<()> {
        ensure!(self.count > 0, "starfield needs at least one point");
        ensure!(self.extent.is_finite() && self.extent > 0.0, "starfield extent must be positive");
        ensure!(
            self.point_size.is_finite() && self.point_size > 0.0,
            "point size must be positive"
        );
        ensure!((0.0..=1.0).contains(&self.opacity), "starfield opacity must be in [0, 1]");
        ensure!(self.rotation_step.is_finite(), "rotation step must be finite");
        Ok(())
    }
}

/// Shooting-star spawn policy and per-frame motion.
#[derive(Debug, Clone)]
pub struct StreakConfig {
    /// Period of the spawn timer.
    pub spawn_interval: Duration,
    /// Chance that one timer tick spawns a streak.
    pub spawn_probability: f64,

    pub origin_x: RangeInclusive<f32>,
    pub origin_y: RangeInclusive<f32>,
    pub origin_z: RangeInclusive<f32>,

    /// Number of polyline points.
    pub segment_count: usize,
    /// Offset between consecutive polyline points.
    pub segment_step: Vec3,

    /// Translation applied every frame.
    pub velocity: Vec3,
    pub initial_opacity: f32,
    /// Opacity removed every frame.
    pub opacity_decay: f32,

    pub color: Color,
}

impl Default for StreakConfig {
    fn default() -> Self {
        Self {
            spawn_interval: Duration::from_millis(2000),
            spawn_probability: 0.1,
            origin_x: -500.0..=500.0,
            origin_y: 200.0..=700.0,
            origin_z: -250.0..=250.0,
            segment_count: 10,
            segment_step: Vec3::new(-20.0, -15.0, -10.0),
            velocity: Vec3::new(-5.0, -3.0, 0.0),
            initial_opacity: 0.8,
            opacity_decay: 0.02,
            color: Color::from_hex(0x00ffff),
        }
    }
}

impl StreakConfig {
    fn validate(&self) -> Result<()> {
        ensure!(!self.spawn_interval.is_zero(), "spawn interval must be non-zero");
        ensure!(
            (0.0..=1.0).contains(&self.spawn_probability),
            "spawn probability must be in [0, 1]"
        );
        for (axis, range) in [("x", &self.origin_x), ("y", &self.origin_y), ("z", &self.origin_z)] {
            ensure!(
                range.start().is_finite() && range.end().is_finite() && !range.is_empty(),
                "streak origin range for {axis} is empty or non-finite"
            );
        }
        ensure!(self.segment_count >= 2, "a streak needs at least two points");
        ensure!(
            self.segment_step.is_finite() && self.velocity.is_finite(),
            "streak motion must be finite"
        );
        ensure!(
            self.initial_opacity > 0.0 && self.initial_opacity <= 1.0,
            "initial streak opacity must be in (0, 1]"
        );
        ensure!(
            self.opacity_decay.is_finite() && self.opacity_decay > 0.0,
            "streak opacity decay must be positive"
        );
        Ok(())
    }
}

/// Perspective camera placement.
#[derive(Debug, Clone)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z.
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_y_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 5.0,
        }
    }
}

impl CameraConfig {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.fov_y_degrees > 0.0 && self.fov_y_degrees < 180.0,
            "field of view must be in (0, 180) degrees"
        );
        ensure!(
            self.near > 0.0 && self.far > self.near && self.far.is_finite(),
            "clip planes must satisfy 0 < near < far"
        );
        ensure!(self.distance.is_finite(), "camera distance must be finite");
        Ok(())
    }
}
