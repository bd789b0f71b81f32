//! Visual constants for the "deep space" canvas look, plus per-theme glow
//! tints. The theme name only influences the ambient glow layer; token colors
//! arrive pre-resolved from the external highlighter.

use crate::foundation::core::Rgba8;

/// Base canvas fill.
pub const CANVAS_BASE: Rgba8 = Rgba8::rgb(13, 14, 21);
/// Inner glow overlay used for the breathing gradient.
pub const CANVAS_GLOW: Rgba8 = Rgba8::rgb(22, 24, 33);
/// 1px near-transparent ring outlining the canvas edge.
pub const GHOST_OUTLINE: Rgba8 = Rgba8::new(255, 255, 255, 20);

/// Mid drop-shadow layer.
pub const SHADOW_MID: Rgba8 = Rgba8::new(0, 0, 0, 25);
/// Tight contact-shadow layer.
pub const SHADOW_CONTACT: Rgba8 = Rgba8::new(0, 0, 0, 50);

/// Cursor fill.
pub const CURSOR: Rgba8 = Rgba8::new(255, 255, 255, 220);
/// Translucent wash behind highlighted lines.
pub const HIGHLIGHT_WASH: Rgba8 = Rgba8::new(255, 255, 255, 15);
/// Solid accent bar at the left edge of highlighted lines.
pub const HIGHLIGHT_ACCENT: Rgba8 = Rgba8::rgb(0, 240, 255);

/// Muted line-number color.
pub const LINE_NUMBER: Rgba8 = Rgba8::new(255, 255, 255, 100);
/// Gutter separator line.
pub const GUTTER_SEPARATOR: Rgba8 = Rgba8::new(255, 255, 255, 15);

/// Fallback foreground for tokens without an explicit color.
pub const DEFAULT_FOREGROUND: Rgba8 = Rgba8::rgb(248, 248, 242);

/// Ambient glow tint for the outermost shadow layer, keyed by theme name.
/// Unknown themes fall back to the neon cyan default.
pub fn glow_tint(theme: &str) -> Rgba8 {
    match theme {
        "dracula" => Rgba8::new(255, 121, 198, 10),
        "monokai" => Rgba8::new(253, 151, 31, 10),
        "nord" => Rgba8::new(136, 192, 208, 10),
        _ => Rgba8::new(0, 240, 255, 10),
    }
}
