//! The encoder: palette quantization and animated-gif serialization.
//!
//! Frames are consumed in strict schedule order; serialization is inherently
//! order-dependent and never parallelized.

/// Gif container writing.
pub mod gif;
/// Shared fixed palette and quantization.
pub mod palette;
