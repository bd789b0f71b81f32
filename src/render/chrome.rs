//! Window chrome painters. Styles are dispatched through a painter table so a
//! new chrome style only adds an entry here, without touching the frame loop.

use kurbo::{Circle, Rect};

use crate::config::ChromeStyle;
use crate::foundation::core::Rgba8;
use crate::render::paint::{fill_shape, stroke_shape};
use crate::render::scene::SceneMetrics;

const MACOS_RED: Rgba8 = Rgba8::rgb(236, 106, 94);
const MACOS_YELLOW: Rgba8 = Rgba8::rgb(244, 191, 79);
const MACOS_GREEN: Rgba8 = Rgba8::rgb(97, 197, 84);
const WINDOWS_TITLE_BAR: Rgba8 = Rgba8::rgb(30, 30, 30);
const WINDOWS_CONTROL: Rgba8 = Rgba8::rgb(200, 200, 200);

pub(crate) type ChromePainter = fn(&mut vello_cpu::RenderContext, &SceneMetrics);

/// Painter for the given style; `None` draws nothing and reserves no space.
pub(crate) fn painter(style: ChromeStyle) -> Option<ChromePainter> {
    match style {
        ChromeStyle::None => None,
        ChromeStyle::MacOs => Some(draw_macos),
        ChromeStyle::Windows => Some(draw_windows),
    }
}

/// Three window-control dots, top-left.
fn draw_macos(ctx: &mut vello_cpu::RenderContext, m: &SceneMetrics) {
    let s = m.scale;
    let y = m.shadow_offset + 20.0 * s;
    let mut x = m.shadow_offset + 20.0 * s;
    let spacing = 8.0 * s;
    let dot = 12.0 * s;

    for color in [MACOS_RED, MACOS_YELLOW, MACOS_GREEN] {
        fill_shape(ctx, &Circle::new((x, y), dot / 2.0), color);
        x += dot + spacing;
    }
}

/// Dark title bar with a simplified control glyph, top-right.
fn draw_windows(ctx: &mut vello_cpu::RenderContext, m: &SceneMetrics) {
    let s = m.scale;
    let off = m.shadow_offset;
    let bar = Rect::new(off, off, off + m.content_width, off + 40.0 * s);
    fill_shape(ctx, &bar, WINDOWS_TITLE_BAR);

    let x = off + m.content_width - 40.0 * s;
    let y = off + 20.0 * s;
    let glyph = Rect::new(
        x - 30.0 * s,
        y - 6.0 * s,
        x - 30.0 * s + 12.0 * s,
        y - 6.0 * s + 12.0 * s,
    );
    stroke_shape(ctx, &glyph, 1.0 * s, WINDOWS_CONTROL);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_none_skips_painting() {
        assert!(painter(ChromeStyle::None).is_none());
        assert!(painter(ChromeStyle::MacOs).is_some());
        assert!(painter(ChromeStyle::Windows).is_some());
    }
}
