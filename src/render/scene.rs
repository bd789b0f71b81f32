use std::ops::Range;
use std::sync::Arc;

use crate::config::{AnimationConfig, ChromeStyle};
use crate::foundation::core::{Canvas, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::font::load_font_bytes;
use crate::render::text::{GlyphBrush, LineLayout, TextEngine};
use crate::theme;
use crate::token::Token;

/// All spatial constants for a run, pre-multiplied by the HiDPI scale factor
/// so visual proportions are invariant to it. Logical-pixel values: 36px
/// padding, 16px corner radius, 20px shadow margin, 40px chrome bar, 50px
/// gutter, 1.5 line height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneMetrics {
    pub scale: f64,
    pub content_width: f64,
    pub content_height: f64,
    pub shadow_offset: f64,
    pub padding: f64,
    pub corner_radius: f64,
    pub chrome_height: f64,
    pub gutter_width: f64,
    pub font_size: f64,
    pub line_height: f64,
    pub cursor_width: f64,
    pub accent_width: f64,
}

impl SceneMetrics {
    fn new(config: &AnimationConfig, line_count: usize) -> Self {
        let s = config.scale_factor();
        let font_size = config.font_size * s;
        let line_height = font_size * 1.5;
        let padding = 36.0 * s;
        let chrome_height = match config.chrome {
            ChromeStyle::None => 0.0,
            ChromeStyle::MacOs | ChromeStyle::Windows => 40.0 * s,
        };
        let gutter_width = if config.line_numbers { 50.0 * s } else { 0.0 };
        let content_width = f64::from(config.canvas_width) * s;
        let content_height = padding * 2.0 + line_count as f64 * line_height + chrome_height;

        Self {
            scale: s,
            content_width,
            content_height,
            shadow_offset: 20.0 * s,
            padding,
            corner_radius: 16.0 * s,
            chrome_height,
            gutter_width,
            font_size,
            line_height,
            cursor_width: 10.0 * s,
            accent_width: 4.0 * s,
        }
    }

    /// Left text margin in canvas coordinates.
    pub fn text_x(&self) -> f64 {
        self.shadow_offset + self.padding + self.gutter_width
    }

    /// Top of the first text line in canvas coordinates.
    pub fn text_top(&self) -> f64 {
        self.shadow_offset + self.padding + self.chrome_height
    }

    /// Top of the highlight band for 0-based line `k`.
    pub fn band_top(&self, k: usize) -> f64 {
        self.text_top() - 5.0 * self.scale + k as f64 * self.line_height
    }

    /// X of the vertical gutter separator.
    pub fn separator_x(&self) -> f64 {
        self.shadow_offset + self.padding + self.gutter_width - 15.0 * self.scale
    }
}

/// One text line with its byte-ranged color spans. Newlines are not part of
/// the line text.
#[derive(Clone, Debug, Default)]
pub struct StyledLine {
    pub text: String,
    pub spans: Vec<(Range<usize>, GlyphBrush)>,
    /// Character count of `text`.
    pub chars: usize,
}

impl StyledLine {
    fn push(&mut self, ch: char, brush: GlyphBrush) {
        let start = self.text.len();
        self.text.push(ch);
        self.chars += 1;
        match self.spans.last_mut() {
            Some((range, last)) if *last == brush && range.end == start => {
                range.end = self.text.len();
            }
            _ => self.spans.push((start..self.text.len(), brush)),
        }
    }

    /// Byte offset covering the first `chars` characters.
    pub fn byte_end_for_chars(&self, chars: usize) -> usize {
        self.text
            .char_indices()
            .nth(chars)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Spans clipped to the first `byte_end` bytes.
    pub fn spans_clipped(&self, byte_end: usize) -> Vec<(Range<usize>, GlyphBrush)> {
        self.spans
            .iter()
            .filter(|(range, _)| range.start < byte_end)
            .map(|(range, brush)| (range.start..range.end.min(byte_end), *brush))
            .collect()
    }
}

/// Immutable per-run render state shared by every frame render (and, in the
/// parallel path, by every worker): resolved font, styled lines, prebuilt
/// layouts, and layout metrics. Built once before any frame is produced, so a
/// font failure aborts the run up front.
pub struct RenderScene {
    pub(crate) config: AnimationConfig,
    pub(crate) metrics: SceneMetrics,
    canvas: Canvas,
    pub(crate) glow: Rgba8,
    pub(crate) lines: Vec<StyledLine>,
    line_starts: Vec<usize>,
    total_chars: usize,
    pub(crate) line_layouts: Vec<LineLayout>,
    pub(crate) number_layouts: Vec<LineLayout>,
    pub(crate) font: vello_cpu::peniko::FontData,
    font_bytes: Arc<Vec<u8>>,
}

impl RenderScene {
    #[tracing::instrument(skip(tokens, config))]
    pub fn new(tokens: &[Token], config: &AnimationConfig) -> ReelResult<Self> {
        config.validate()?;

        let font_bytes = Arc::new(load_font_bytes(config.font_path.as_deref())?);
        let mut engine = TextEngine::new(&font_bytes)?;
        tracing::debug!(family = engine.family_name(), "resolved font");

        let lines = split_lines(tokens);
        let mut line_starts = Vec::with_capacity(lines.len());
        let mut total_chars = 0usize;
        for line in &lines {
            line_starts.push(total_chars);
            total_chars += line.chars;
        }

        let metrics = SceneMetrics::new(config, lines.len());
        let canvas = canvas_for(&metrics)?;

        let font_px = metrics.font_size as f32;
        let mut line_layouts = Vec::with_capacity(lines.len());
        for line in &lines {
            line_layouts.push(engine.layout_line(
                &line.text,
                font_px,
                theme::DEFAULT_FOREGROUND.into(),
                &line.spans,
            )?);
        }

        let mut number_layouts = Vec::new();
        if config.line_numbers {
            let number_px = font_px * 0.8;
            for index in 1..=lines.len() {
                number_layouts.push(engine.layout_line(
                    &format!("{index:>2}"),
                    number_px,
                    theme::LINE_NUMBER.into(),
                    &[],
                )?);
            }
        }

        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(font_bytes.as_ref().clone()),
            0,
        );

        Ok(Self {
            config: config.clone(),
            metrics,
            canvas,
            glow: theme::glow_tint(&config.theme),
            lines,
            line_starts,
            total_chars,
            line_layouts,
            number_layouts,
            font,
            font_bytes,
        })
    }

    /// Total glyph-producing characters across the token stream.
    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Full output canvas (content plus shadow margins), identical for every
    /// frame of the run.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn metrics(&self) -> &SceneMetrics {
        &self.metrics
    }

    pub(crate) fn font_bytes(&self) -> &Arc<Vec<u8>> {
        &self.font_bytes
    }

    /// Visible-character index at which 0-based line `k` starts.
    pub(crate) fn line_start(&self, k: usize) -> usize {
        self.line_starts[k]
    }

    /// Number of lines on screen at `reveal`. A line appears once its first
    /// glyph is revealed; the first line is always present, and a full reveal
    /// shows every line (including trailing empty ones).
    pub(crate) fn lines_revealed(&self, reveal: usize) -> usize {
        if reveal >= self.total_chars {
            return self.lines.len();
        }
        self.line_starts
            .partition_point(|&start| start < reveal)
            .max(1)
    }

    pub(crate) fn canvas_u16(&self) -> (u16, u16) {
        // Guarded at construction in canvas_for.
        (self.canvas.width as u16, self.canvas.height as u16)
    }
}

fn canvas_for(metrics: &SceneMetrics) -> ReelResult<Canvas> {
    let width = (metrics.content_width + 2.0 * metrics.shadow_offset).ceil() as u32;
    let height = (metrics.content_height + 2.0 * metrics.shadow_offset).ceil() as u32;
    if u16::try_from(width).is_err() || u16::try_from(height).is_err() {
        return Err(ReelError::validation(format!(
            "canvas {width}x{height} exceeds the u16 surface limit"
        )));
    }
    Canvas::new(width, height)
}

/// Split the token stream into per-line styled segments. Newlines terminate
/// lines and carry no span.
fn split_lines(tokens: &[Token]) -> Vec<StyledLine> {
    let mut lines = vec![StyledLine::default()];
    for token in tokens {
        let brush: GlyphBrush = token.color.unwrap_or(theme::DEFAULT_FOREGROUND).into();
        for ch in token.text.chars() {
            if ch == '\n' {
                lines.push(StyledLine::default());
            } else if let Some(line) = lines.last_mut() {
                line.push(ch, brush);
            }
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Rgba8;

    const RED: Rgba8 = Rgba8::rgb(255, 0, 0);
    const BLUE: Rgba8 = Rgba8::rgb(0, 0, 255);

    fn tokens() -> Vec<Token> {
        vec![
            Token::new("ab", Some(RED)),
            Token::new("\nc", Some(BLUE)),
        ]
    }

    #[test]
    fn split_lines_carries_spans_per_line() {
        let lines = split_lines(&tokens());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "ab");
        assert_eq!(lines[0].spans, vec![(0..2, RED.into())]);
        assert_eq!(lines[1].text, "c");
        assert_eq!(lines[1].spans, vec![(0..1, BLUE.into())]);
    }

    #[test]
    fn split_lines_merges_adjacent_same_color_tokens() {
        let t = vec![
            Token::new("fn ", Some(RED)),
            Token::new("main", Some(RED)),
            Token::new("()", Some(BLUE)),
        ];
        let lines = split_lines(&t);
        assert_eq!(lines[0].spans.len(), 2);
        assert_eq!(lines[0].spans[0], (0..7, RED.into()));
    }

    #[test]
    fn clipped_spans_respect_prefix() {
        let lines = split_lines(&tokens());
        let clipped = lines[0].spans_clipped(1);
        assert_eq!(clipped, vec![(0..1, RED.into())]);
        assert!(lines[1].spans_clipped(0).is_empty());
    }

    #[test]
    fn byte_end_handles_multibyte_chars() {
        let line = split_lines(&[Token::plain("héllo")]).remove(0);
        assert_eq!(line.byte_end_for_chars(2), 3);
        assert_eq!(line.byte_end_for_chars(99), line.text.len());
    }

    #[test]
    fn metrics_scale_uniformly_under_hidpi() {
        let base = AnimationConfig::default();
        let hidpi = AnimationConfig {
            hidpi: true,
            ..base.clone()
        };
        let m1 = SceneMetrics::new(&base, 10);
        let m2 = SceneMetrics::new(&hidpi, 10);
        assert_eq!(m2.padding, m1.padding * 2.0);
        assert_eq!(m2.corner_radius, m1.corner_radius * 2.0);
        assert_eq!(m2.content_width, m1.content_width * 2.0);
        assert_eq!(m2.content_height, m1.content_height * 2.0);
        assert_eq!(m2.line_height, m1.line_height * 2.0);
    }

    #[test]
    fn chrome_reserves_vertical_space_only_when_present() {
        let none = SceneMetrics::new(&AnimationConfig::default(), 5);
        let macos = SceneMetrics::new(
            &AnimationConfig {
                chrome: ChromeStyle::MacOs,
                ..AnimationConfig::default()
            },
            5,
        );
        assert_eq!(none.chrome_height, 0.0);
        assert_eq!(macos.chrome_height, 40.0);
        assert_eq!(
            macos.content_height - none.content_height,
            macos.chrome_height
        );
    }

    #[test]
    fn height_follows_line_count() {
        let m5 = SceneMetrics::new(&AnimationConfig::default(), 5);
        let m6 = SceneMetrics::new(&AnimationConfig::default(), 6);
        assert_eq!(m6.content_height - m5.content_height, m5.line_height);
    }
}
