//! GPU rendering helpers shared by the page and its layers.
//!
//! Each renderer owns its GPU resources (pipelines, buffers, bind groups) and
//! creates them lazily on first use.

mod ctx;
mod gradient;
mod layer;

pub use ctx::{RenderCtx, RenderTarget};
pub use gradient::{GradientFill, VerticalGradient};
pub use layer::LayerCompositor;
