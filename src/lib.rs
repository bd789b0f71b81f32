//! Typereel turns an ordered stream of styled text tokens into an animated,
//! palette-quantized GIF that simulates the code being typed.
//!
//! # Pipeline overview
//!
//! 1. **Schedule**: `total_chars + AnimationConfig -> Vec<ScheduledFrame>`
//!    (per-frame reveal position, cursor visibility, normalized progress)
//! 2. **Rasterize**: `RenderScene + ScheduledFrame -> FrameRgba`
//!    (shadow stack, breathing background, chrome, gutter, glyphs, cursor)
//! 3. **Encode**: frames are flattened, quantized against a shared fixed
//!    256-color palette, and streamed into a gif with a uniform `100/fps`
//!    centisecond delay, written atomically.
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: scheduling and rasterization are pure functions of
//!   the token stream and configuration; every frame of a run shares one
//!   canvas size.
//! - **Front-loaded IO**: the font is resolved and parsed before any frame is
//!   produced; the only other IO is the final artifact write.
//! - **Order-preserving parallelism**: frames may rasterize concurrently, but
//!   the encoder always consumes them in strict schedule order.
#![forbid(unsafe_code)]

mod config;
mod encode;
mod foundation;
mod pipeline;
mod render;
mod schedule;
/// Visual constants and per-theme glow tints.
pub mod theme;
mod token;

pub use config::{parse_highlight_spec, AnimationConfig, ChromeStyle};
pub use encode::gif::{frame_delay_cs, quantize, GifConfig, GifWriter, PaletteFrame};
pub use encode::palette::{flatten_to_opaque_rgba8, Palette};
pub use foundation::core::{Canvas, FrameRgba, Rgba8};
pub use foundation::error::{ReelError, ReelResult};
pub use pipeline::{
    render_frames, render_frames_with_stats, render_single_frame, render_to_gif, RenderStats,
    RenderThreading, RenderToGifOpts,
};
pub use render::font::resolve_font_path;
pub use render::frame::FrameRasterizer;
pub use render::scene::{RenderScene, SceneMetrics};
pub use schedule::{blink_interval, chars_per_frame, hold_frames, schedule, ScheduledFrame};
pub use token::{line_count, total_chars, Token};
