use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;

use super::ctx::{FrameCtx, StartCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by the page.
///
/// Lifecycle: `on_start` once the window and GPU exist, then any number of
/// events and frames, then `on_stop` exactly once before the window and GPU
/// are destroyed.
pub trait App {
    /// Called once after the window and its GPU context are ready.
    fn on_start(&mut self, ctx: &mut StartCtx<'_, '_>) {
        let _ = ctx;
    }

    /// Called for window events.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called after the swapchain has been reconfigured for a new size.
    fn on_resize(&mut self, size: PhysicalSize<u32>) {
        let _ = size;
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called once before the window and GPU context are dropped.
    fn on_stop(&mut self) {}

    /// Whether the runtime should schedule another frame.
    fn wants_redraw(&self) -> bool {
        true
    }
}
