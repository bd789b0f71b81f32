use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::foundation::error::{ReelError, ReelResult};

/// Decorative window-frame overlay drawn around the code canvas.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ChromeStyle {
    /// No chrome; no vertical chrome space is reserved.
    #[default]
    None,
    /// Three colored window-control dots, top-left.
    MacOs,
    /// Dark title bar with a control glyph, top-right.
    Windows,
}

/// Animation configuration. Immutable for one run; together with the token
/// stream it fully determines frame count and visuals.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationConfig {
    /// Canvas content width in pixels, before HiDPI scaling.
    pub canvas_width: u32,
    /// Font size in (logical) pixels.
    pub font_size: f64,
    /// Typing speed multiplier; characters revealed per frame scale linearly,
    /// floor-clamped to at least one.
    pub speed: f64,
    /// Output frames per second; drives playback delay, cursor blink, and the
    /// hold-phase duration.
    pub fps: u32,
    /// Whether the typing cursor is drawn at all.
    pub cursor: bool,
    /// 1-based line numbers to highlight.
    pub highlighted_lines: BTreeSet<u32>,
    /// Window chrome style.
    pub chrome: ChromeStyle,
    /// Theme name; affects the ambient glow tint only.
    pub theme: String,
    /// Double all spatial constants and canvas dimensions.
    pub hidpi: bool,
    /// Render a line-number gutter.
    pub line_numbers: bool,
    /// Explicit monospace font file; `None` discovers a system font.
    pub font_path: Option<PathBuf>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            font_size: 16.0,
            speed: 1.0,
            fps: 30,
            cursor: true,
            highlighted_lines: BTreeSet::new(),
            chrome: ChromeStyle::None,
            theme: "dracula".to_owned(),
            hidpi: false,
            line_numbers: false,
            font_path: None,
        }
    }
}

impl AnimationConfig {
    /// Spatial scale factor applied to canvas dimensions and all offsets.
    pub fn scale_factor(&self) -> f64 {
        if self.hidpi {
            2.0
        } else {
            1.0
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.canvas_width == 0 {
            return Err(ReelError::validation("canvas_width must be > 0"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ReelError::validation("font_size must be finite and > 0"));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ReelError::validation("speed must be finite and >= 0"));
        }
        if self.fps == 0 {
            return Err(ReelError::validation("fps must be > 0"));
        }
        Ok(())
    }
}

/// Parse a highlighted-line specification such as `"5,7-9"` into the set
/// `{5,7,8,9}`. Empty input yields an empty set. A reversed range is rejected
/// rather than normalized.
pub fn parse_highlight_spec(spec: &str) -> ReelResult<BTreeSet<u32>> {
    let mut lines = BTreeSet::new();
    if spec.trim().is_empty() {
        return Ok(lines);
    }

    for part in spec.split(',') {
        let part = part.trim();
        match part.split_once('-') {
            Some((lo, hi)) => {
                let start = parse_line_number(lo)?;
                let end = parse_line_number(hi)?;
                if start > end {
                    return Err(ReelError::validation(format!(
                        "start line ({start}) must be <= end line ({end})"
                    )));
                }
                lines.extend(start..=end);
            }
            None => {
                lines.insert(parse_line_number(part)?);
            }
        }
    }

    Ok(lines)
}

fn parse_line_number(raw: &str) -> ReelResult<u32> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ReelError::validation(format!("invalid line number: '{}'", raw.trim())))
}
