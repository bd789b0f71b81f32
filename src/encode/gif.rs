use std::borrow::Cow;
use std::io::Write;
use std::path::Path;

use crate::encode::palette::{flatten_to_opaque_rgba8, Palette};
use crate::foundation::core::FrameRgba;
use crate::foundation::error::{ReelError, ReelResult};

/// Encoder configuration for one artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GifConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Background flattened under semi-transparent pixels before quantization.
    pub bg_rgba: [u8; 4],
}

impl GifConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("encode width/height must be non-zero"));
        }
        if u16::try_from(self.width).is_err() || u16::try_from(self.height).is_err() {
            return Err(ReelError::validation(
                "encode width/height must fit the gif u16 limit",
            ));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("encode fps must be non-zero"));
        }
        Ok(())
    }
}

/// Uniform per-frame delay in hundredths of a second (`100 / fps`, the gif
/// timing unit). Saturates to zero above 100 fps.
pub fn frame_delay_cs(fps: u32) -> u16 {
    (100 / fps.max(1)).min(u32::from(u16::MAX)) as u16
}

/// One quantized frame ready for serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteFrame {
    /// Per-pixel indices into the shared palette.
    pub indexed: Vec<u8>,
    /// Frame delay in hundredths of a second.
    pub delay_cs: u16,
}

/// Quantize opaque RGBA8 pixels to the shared palette.
pub fn quantize(palette: &Palette, opaque_rgba: &[u8], delay_cs: u16) -> PaletteFrame {
    let mut indexed = Vec::with_capacity(opaque_rgba.len() / 4);
    for px in opaque_rgba.chunks_exact(4) {
        indexed.push(palette.nearest(px[0], px[1], px[2]));
    }
    PaletteFrame { indexed, delay_cs }
}

/// Streams pixel buffers into an animated gif in strict input order: each
/// frame is flattened, quantized against the shared global palette, and
/// written with the uniform delay. The output loops indefinitely.
pub struct GifWriter<W: Write> {
    encoder: gif::Encoder<W>,
    cfg: GifConfig,
    palette: &'static Palette,
    delay_cs: u16,
    scratch: Vec<u8>,
}

impl<W: Write> GifWriter<W> {
    pub fn new(writer: W, cfg: GifConfig) -> ReelResult<Self> {
        cfg.validate()?;
        let palette = Palette::shared();
        let mut encoder = gif::Encoder::new(
            writer,
            cfg.width as u16,
            cfg.height as u16,
            palette.rgb_table(),
        )
        .map_err(|e| ReelError::encode(format!("failed to start gif stream: {e}")))?;
        encoder
            .set_repeat(gif::Repeat::Infinite)
            .map_err(|e| ReelError::encode(format!("failed to set gif loop flag: {e}")))?;

        Ok(Self {
            encoder,
            cfg,
            palette,
            delay_cs: frame_delay_cs(cfg.fps),
            scratch: vec![0u8; cfg.width as usize * cfg.height as usize * 4],
        })
    }

    /// Quantize and append one frame.
    pub fn write_frame(&mut self, frame: &FrameRgba) -> ReelResult<()> {
        if frame.width != self.cfg.width || frame.height != self.cfg.height {
            return Err(ReelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.cfg.width, self.cfg.height
            )));
        }
        frame.validate()?;

        flatten_to_opaque_rgba8(
            &mut self.scratch,
            &frame.data,
            frame.premultiplied,
            self.cfg.bg_rgba,
        )?;
        let paletted = quantize(self.palette, &self.scratch, self.delay_cs);

        let mut out = gif::Frame::default();
        out.width = self.cfg.width as u16;
        out.height = self.cfg.height as u16;
        out.delay = paletted.delay_cs;
        out.buffer = Cow::Owned(paletted.indexed);
        self.encoder
            .write_frame(&out)
            .map_err(|e| ReelError::encode(format!("failed to write gif frame: {e}")))
    }

    /// Finalize the stream (the gif trailer is written when the encoder is
    /// dropped); the underlying writer must still be flushed by the caller.
    pub fn finish(self) -> ReelResult<()> {
        drop(self.encoder);
        Ok(())
    }
}

/// Create the parent directory of `path` if it does not exist.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            use anyhow::Context as _;
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
    }
    Ok(())
}
