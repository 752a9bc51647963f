use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, ensure, Result};

use crate::mount::OutputElement;
use crate::viewport::ViewportSize;

use super::{RenderSurface, SceneFrame, SurfaceDescriptor, SurfaceFactory};

/// Observations recorded by a [`HeadlessSurface`].
#[derive(Debug, Default, Clone, PartialEq)]
pub struct HeadlessStats {
    pub renders: u64,
    /// Size changes actually applied.
    pub resizes: u64,
    pub releases: u64,
    pub last_star_count: usize,
    pub last_streak_count: usize,
    pub last_streak_opacities: Vec<f32>,
}

/// CPU-only render surface.
///
/// Draws nothing; records what it was asked to draw. Used by tooling and
/// tests that exercise scene behavior without a GPU.
pub struct HeadlessSurface {
    output: OutputElement,
    stats: Rc<RefCell<HeadlessStats>>,
    released: bool,
}

impl HeadlessSurface {
    pub fn new(size: ViewportSize) -> Self {
        Self {
            output: OutputElement::new(size),
            stats: Rc::default(),
            released: false,
        }
    }

    /// Shared handle to the recorded stats; stays readable after the surface is dropped.
    pub fn stats(&self) -> Rc<RefCell<HeadlessStats>> {
        Rc::clone(&self.stats)
    }
}

impl RenderSurface for HeadlessSurface {
    fn output(&self) -> &OutputElement {
        &self.output
    }

    fn size(&self) -> ViewportSize {
        self.output.size()
    }

    fn resize(&mut self, size: ViewportSize) {
        if self.released || self.output.size() == size {
            return;
        }
        self.output.set_size(size);
        self.stats.borrow_mut().resizes += 1;
    }

    fn render(&mut self, frame: &SceneFrame<'_>) -> Result<()> {
        ensure!(!self.released, "render on a released surface");
        let mut stats = self.stats.borrow_mut();
        stats.renders += 1;
        stats.last_star_count = frame.starfield.len();
        stats.last_streak_count = frame.streaks.len();
        stats.last_streak_opacities = frame.streaks.iter().map(|s| s.opacity()).collect();
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        if !self.released {
            self.released = true;
            self.stats.borrow_mut().releases += 1;
        }
        Ok(())
    }
}

/// Creates [`HeadlessSurface`]s and keeps a handle on each one's stats.
#[derive(Default)]
pub struct HeadlessSurfaceFactory {
    created: Vec<Rc<RefCell<HeadlessStats>>>,
    /// When set, `create` fails with this message.
    pub fail_with: Option<String>,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// A factory whose surfaces can never be created (no graphics available).
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            created: Vec::new(),
            fail_with: Some(reason.into()),
        }
    }

    /// Stats of every surface created so far, oldest first.
    pub fn created(&self) -> &[Rc<RefCell<HeadlessStats>>] {
        &self.created
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create(&mut self, desc: &SurfaceDescriptor) -> Result<Box<dyn RenderSurface>> {
        if let Some(reason) = &self.fail_with {
            bail!("{reason}");
        }
        ensure!(desc.size.is_valid(), "surface size {:?} has a zero dimension", desc.size);

        let surface = HeadlessSurface::new(desc.size);
        self.created.push(surface.stats());
        Ok(Box::new(surface))
    }
}
