//! Animated starfield backdrop.
//!
//! A slowly rotating point cloud with occasional shooting-star streaks,
//! rendered into an output element that the page composites behind its
//! content.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`manager`] | `SceneManager`: mount, spawn, redraw, resize, teardown |
//! | [`starfield`] | `Starfield` point cloud |
//! | [`streak`] | `Streak`, `StreakField` |
//! | [`camera`] | `PerspectiveCamera` |
//! | [`schedule`] | `Scheduler`: timers, frame requests, resize listeners |
//! | [`mount`] | `MountPoint`, `MountLayer`, `OutputElement` |
//! | [`surface`] | `RenderSurface` / `SurfaceFactory` contract, `HeadlessSurface` |
//! | [`gpu`] | wgpu `GpuSurface` / `GpuSurfaceFactory` |
//! | [`config`] | `BackdropConfig` and its parts |

pub mod camera;
pub mod config;
pub mod gpu;
pub mod manager;
pub mod mount;
pub mod schedule;
pub mod starfield;
pub mod streak;
pub mod surface;
pub mod viewport;

pub use config::BackdropConfig;
pub use manager::SceneManager;
pub use mount::{MountLayer, MountPoint, OutputElement};
pub use schedule::Scheduler;
pub use viewport::ViewportSize;
