//! The rasterizer: per-frame 2D compositing of the code canvas.
//!
//! A [`scene::RenderScene`] is built once per run (font resolution, styled
//! lines, prebuilt layouts, metrics); [`frame::FrameRasterizer`] then maps
//! each scheduled frame to a pixel buffer. Frames have no data dependency on
//! each other, so rasterizers can run in parallel over one shared scene.

/// Window chrome painters and their dispatch table.
pub mod chrome;
/// Monospace font resolution.
pub mod font;
/// Per-frame compositing.
pub mod frame;
mod paint;
/// Immutable per-run render state.
pub mod scene;
/// Parley-backed line shaping with per-token brushes.
pub mod text;
