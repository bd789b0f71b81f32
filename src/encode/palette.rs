//! The shared 256-color quantization palette: a 6x6x6 color cube plus a
//! 40-step gray ramp. Nearest-color mapping is closed-form (round each channel
//! into the cube, round the channel mean onto the ramp, keep the closer), so
//! no per-pixel palette search is needed.

use std::sync::OnceLock;

use crate::foundation::error::{ReelError, ReelResult};

/// Evenly spaced cube channel levels (step 51).
const CUBE_LEVELS: [u8; 6] = [0, 51, 102, 153, 204, 255];
/// Number of gray ramp entries appended after the cube.
const GRAY_STEPS: usize = 40;

/// Fixed 256-entry RGB palette shared by every frame of a run.
pub struct Palette {
    rgb: Vec<u8>,
}

impl Palette {
    /// The process-wide shared palette.
    pub fn shared() -> &'static Palette {
        static PALETTE: OnceLock<Palette> = OnceLock::new();
        PALETTE.get_or_init(Palette::build)
    }

    fn build() -> Self {
        let mut rgb = Vec::with_capacity(256 * 3);
        for r in CUBE_LEVELS {
            for g in CUBE_LEVELS {
                for b in CUBE_LEVELS {
                    rgb.extend_from_slice(&[r, g, b]);
                }
            }
        }
        for i in 0..GRAY_STEPS {
            let v = gray_level(i);
            rgb.extend_from_slice(&[v, v, v]);
        }
        debug_assert_eq!(rgb.len(), 256 * 3);
        Self { rgb }
    }

    /// Flat `[r, g, b, r, g, b, ...]` table, 768 bytes.
    pub fn rgb_table(&self) -> &[u8] {
        &self.rgb
    }

    /// Index of the palette color nearest to `(r, g, b)`.
    pub fn nearest(&self, r: u8, g: u8, b: u8) -> u8 {
        let cube_index = 36 * cube_slot(r) + 6 * cube_slot(g) + cube_slot(b);
        let cube_dist = {
            let base = cube_index * 3;
            dist2(r, g, b, self.rgb[base], self.rgb[base + 1], self.rgb[base + 2])
        };

        let mean = (u32::from(r) + u32::from(g) + u32::from(b)) / 3;
        let gray_slot = ((mean * (GRAY_STEPS as u32 - 1) + 127) / 255) as usize;
        let v = gray_level(gray_slot);
        let gray_dist = dist2(r, g, b, v, v, v);

        if gray_dist < cube_dist {
            (216 + gray_slot) as u8
        } else {
            cube_index as u8
        }
    }
}

fn gray_level(slot: usize) -> u8 {
    ((slot * 255 + (GRAY_STEPS - 1) / 2) / (GRAY_STEPS - 1)) as u8
}

fn cube_slot(c: u8) -> usize {
    (usize::from(c) + 25) / 51
}

fn dist2(r: u8, g: u8, b: u8, pr: u8, pg: u8, pb: u8) -> u32 {
    let dr = i32::from(r) - i32::from(pr);
    let dg = i32::from(g) - i32::from(pg);
    let db = i32::from(b) - i32::from(pb);
    (dr * dr + dg * dg + db * db) as u32
}

/// Flatten RGBA8 pixels to opaque RGBA over `bg_rgba`, honoring whether the
/// source is premultiplied.
pub fn flatten_to_opaque_rgba8(
    dst: &mut [u8],
    src: &[u8],
    src_is_premul: bool,
    bg_rgba: [u8; 4],
) -> ReelResult<()> {
    if dst.len() != src.len() || dst.len() % 4 != 0 {
        return Err(ReelError::encode(
            "flatten_to_opaque_rgba8 expects equal-length rgba8 buffers",
        ));
    }

    let bg_r = u16::from(bg_rgba[0]);
    let bg_g = u16::from(bg_rgba[1]);
    let bg_b = u16::from(bg_rgba[2]);

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let a = u16::from(s[3]);
        if a == 255 {
            d.copy_from_slice(s);
            d[3] = 255;
            continue;
        }

        let inv = 255u16 - a;

        let (r, g, b) = if src_is_premul {
            (
                u16::from(s[0]) + mul_div255(bg_r, inv),
                u16::from(s[1]) + mul_div255(bg_g, inv),
                u16::from(s[2]) + mul_div255(bg_b, inv),
            )
        } else {
            (
                mul_div255(u16::from(s[0]), a) + mul_div255(bg_r, inv),
                mul_div255(u16::from(s[1]), a) + mul_div255(bg_g, inv),
                mul_div255(u16::from(s[2]), a) + mul_div255(bg_b, inv),
            )
        };

        d[0] = r.min(255) as u8;
        d[1] = g.min(255) as u8;
        d[2] = b.min(255) as u8;
        d[3] = 255;
    }

    Ok(())
}

fn mul_div255(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}
