use std::borrow::Cow;
use std::ops::Range;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{ReelError, ReelResult};

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GlyphBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for GlyphBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// A shaped single line of text with per-range brushes.
pub type LineLayout = parley::Layout<GlyphBrush>;

/// Stateful helper for building Parley layouts from raw font bytes.
///
/// One engine per worker; layouts it produces are immutable and safe to share.
pub struct TextEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
    family_name: String,
}

impl TextEngine {
    /// Register `font_bytes` into fresh Parley contexts.
    pub fn new(font_bytes: &[u8]) -> ReelResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::font("no font families registered from font bytes"))?;
        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::font("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    /// Primary family name resolved from the registered font.
    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape one line of text. `spans` are byte ranges into `text` with the
    /// brush to apply; uncovered ranges use `default_brush`.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        default_brush: GlyphBrush,
        spans: &[(Range<usize>, GlyphBrush)],
    ) -> ReelResult<LineLayout> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ReelError::validation("text size_px must be finite and > 0"));
        }

        let family = self.family_name.clone();
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(default_brush));
        for (range, brush) in spans {
            builder.push(parley::style::StyleProperty::Brush(*brush), range.clone());
        }

        let mut layout: LineLayout = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}
