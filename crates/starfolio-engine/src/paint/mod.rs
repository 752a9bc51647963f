//! Paint model shared between the page and renderers.
//!
//! Colors are linear premultiplied RGBA.

pub mod color;

pub use color::Color;
