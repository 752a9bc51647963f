//! Render surface contract.
//!
//! A render surface turns one scene frame into pixels on its output element.
//! The scene manager only talks to surfaces through these traits, so the
//! wgpu implementation (`crate::gpu`) and the CPU-only [`HeadlessSurface`]
//! are interchangeable.

mod headless;

use anyhow::Result;
use glam::Mat4;
use starfolio_engine::paint::Color;

use crate::config::{StarfieldConfig, StreakConfig};
use crate::mount::OutputElement;
use crate::starfield::Starfield;
use crate::streak::Streak;
use crate::viewport::ViewportSize;

pub use headless::{HeadlessStats, HeadlessSurface, HeadlessSurfaceFactory};

/// Parameters for creating a surface.
#[derive(Debug, Clone)]
pub struct SurfaceDescriptor {
    pub size: ViewportSize,
    pub clear_color: Color,
    pub stars: StarStyle,
    pub streak_color: Color,
}

/// How the starfield point cloud is drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct StarStyle {
    pub point_size: f32,
    pub opacity: f32,
    pub color: Color,
}

impl From<&StarfieldConfig> for StarStyle {
    fn from(cfg: &StarfieldConfig) -> Self {
        Self {
            point_size: cfg.point_size,
            opacity: cfg.opacity,
            color: cfg.color,
        }
    }
}

impl SurfaceDescriptor {
    pub fn new(
        size: ViewportSize,
        clear_color: Color,
        starfield: &StarfieldConfig,
        streaks: &StreakConfig,
    ) -> Self {
        Self {
            size,
            clear_color,
            stars: StarStyle::from(starfield),
            streak_color: streaks.color,
        }
    }
}

/// Everything a surface needs to draw one frame.
pub struct SceneFrame<'a> {
    pub view_projection: Mat4,
    pub starfield: &'a Starfield,
    pub streaks: &'a [Streak],
}

pub trait RenderSurface {
    /// The element the surface draws into.
    fn output(&self) -> &OutputElement;

    fn size(&self) -> ViewportSize;

    /// Resizes the output. Re-applying the current size is a no-op.
    fn resize(&mut self, size: ViewportSize);

    fn render(&mut self, frame: &SceneFrame<'_>) -> Result<()>;

    /// Frees every graphics resource. Safe to call more than once.
    fn release(&mut self) -> Result<()>;
}

pub trait SurfaceFactory {
    fn create(&mut self, desc: &SurfaceDescriptor) -> Result<Box<dyn RenderSurface>>;
}
