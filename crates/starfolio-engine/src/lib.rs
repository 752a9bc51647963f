//! Starfolio engine crate.
//!
//! Owns the platform + GPU runtime pieces used by the page and its backdrop.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod paint;
pub mod render;
pub mod time;
pub mod window;
