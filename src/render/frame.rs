use std::f64::consts::TAU;

use kurbo::{Rect, RoundedRect};

use crate::foundation::core::FrameRgba;
use crate::foundation::error::ReelResult;
use crate::render::chrome;
use crate::render::paint::{fill_shape, stroke_shape, to_color};
use crate::render::scene::RenderScene;
use crate::render::text::{LineLayout, TextEngine};
use crate::schedule::ScheduledFrame;
use crate::theme;

/// Renders one frame at a time against a shared immutable [`RenderScene`].
///
/// Each worker owns one rasterizer; the scene itself is never mutated, so any
/// number of rasterizers can run concurrently over the same scene.
pub struct FrameRasterizer<'a> {
    scene: &'a RenderScene,
    engine: TextEngine,
}

impl<'a> FrameRasterizer<'a> {
    pub fn new(scene: &'a RenderScene) -> ReelResult<Self> {
        let engine = TextEngine::new(scene.font_bytes())?;
        Ok(Self { scene, engine })
    }

    /// Produce the fully composited pixel buffer for one scheduled frame.
    pub fn render(&mut self, frame: &ScheduledFrame) -> ReelResult<FrameRgba> {
        let (w, h) = self.scene.canvas_u16();
        let mut ctx = vello_cpu::RenderContext::new(w, h);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        self.draw_backdrop(&mut ctx, frame.progress);

        if let Some(paint) = chrome::painter(self.scene.config.chrome) {
            paint(&mut ctx, &self.scene.metrics);
        }

        let revealed = self.scene.lines_revealed(frame.reveal);
        if !self.scene.config.highlighted_lines.is_empty() || self.scene.config.line_numbers {
            self.draw_gutter(&mut ctx, revealed);
        }

        let cursor_advance = self.draw_glyphs(&mut ctx, frame.reveal, revealed)?;

        if frame.cursor_visible && frame.reveal <= self.scene.total_chars() {
            self.draw_cursor(&mut ctx, revealed, cursor_advance);
        }

        ctx.flush();
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut pixmap);

        let canvas = self.scene.canvas();
        Ok(FrameRgba {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    /// Shadow stack, base fill, breathing inner glow, and the ghost outline.
    fn draw_backdrop(&self, ctx: &mut vello_cpu::RenderContext, progress: f64) {
        let m = &self.scene.metrics;
        let s = m.scale;
        let off = m.shadow_offset;
        let w = m.content_width;
        let h = m.content_height;
        let r = m.corner_radius;

        // Ambient colored glow, mid shadow, tight contact shadow.
        fill_shape(
            ctx,
            &RoundedRect::new(
                off - 4.0 * s,
                off + 12.0 * s,
                off + 4.0 * s + w,
                off + 12.0 * s + h + 8.0 * s,
                r + 4.0 * s,
            ),
            self.scene.glow,
        );
        fill_shape(
            ctx,
            &RoundedRect::new(
                off - 2.0 * s,
                off + 8.0 * s,
                off + 2.0 * s + w,
                off + 8.0 * s + h + 4.0 * s,
                r + 2.0 * s,
            ),
            theme::SHADOW_MID,
        );
        fill_shape(
            ctx,
            &RoundedRect::new(off, off + 4.0 * s, off + w, off + 4.0 * s + h, r),
            theme::SHADOW_CONTACT,
        );

        fill_shape(
            ctx,
            &RoundedRect::new(off, off, off + w, off + h, r),
            theme::CANVAS_BASE,
        );

        // Breathing inner glow: a vertical oscillation of the overlay driven
        // by animation progress, not wall-clock time.
        let breath = (progress * TAU).sin() * 10.0 * s;
        let glow_top = off + h * 0.15 + breath;
        let glow_height = (h * 0.85 - breath).max(0.0);
        fill_shape(
            ctx,
            &RoundedRect::new(off, glow_top, off + w, glow_top + glow_height, r),
            theme::CANVAS_GLOW,
        );

        stroke_shape(
            ctx,
            &RoundedRect::new(
                off + 0.5,
                off + 0.5,
                off + 0.5 + w - s,
                off + 0.5 + h - s,
                r,
            ),
            1.0 * s,
            theme::GHOST_OUTLINE,
        );
    }

    /// Highlight bands, accent bars, line numbers, and the gutter separator,
    /// for every line revealed so far.
    fn draw_gutter(&self, ctx: &mut vello_cpu::RenderContext, revealed: usize) {
        let m = &self.scene.metrics;
        let config = &self.scene.config;
        let off = m.shadow_offset;

        for k in 0..revealed {
            let line_no = (k + 1) as u32;
            let band_top = m.band_top(k);

            if config.highlighted_lines.contains(&line_no) {
                fill_shape(
                    ctx,
                    &Rect::new(off, band_top, off + m.content_width, band_top + m.line_height),
                    theme::HIGHLIGHT_WASH,
                );
                fill_shape(
                    ctx,
                    &Rect::new(off, band_top, off + m.accent_width, band_top + m.line_height),
                    theme::HIGHLIGHT_ACCENT,
                );
            }

            if config.line_numbers {
                let layout = &self.scene.number_layouts[k];
                let number_size = m.font_size * 0.8;
                let x = m.separator_x() - 8.0 * m.scale - f64::from(layout.width());
                let y = band_top + 5.0 * m.scale + (m.font_size - number_size) / 2.0;
                draw_layout(ctx, &self.scene.font, layout, x, y);
            }
        }

        if config.line_numbers {
            let x = m.separator_x();
            fill_shape(
                ctx,
                &Rect::new(
                    x,
                    off + m.chrome_height + m.padding,
                    x + 1.0 * m.scale,
                    off + m.content_height - m.padding,
                ),
                theme::GUTTER_SEPARATOR,
            );
        }
    }

    /// Draw revealed glyphs line by line; fully revealed lines reuse the
    /// prebuilt layouts, the trailing partial line is shaped on the fly.
    /// Returns the advance width of the last revealed line (the cursor x
    /// offset from the text margin).
    fn draw_glyphs(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        reveal: usize,
        revealed: usize,
    ) -> ReelResult<f64> {
        let scene = self.scene;
        let m = &scene.metrics;
        let text_x = m.text_x();
        let mut advance = 0.0f64;

        for k in 0..revealed {
            let line = &scene.lines[k];
            let shown = reveal.saturating_sub(scene.line_start(k)).min(line.chars);
            if shown == 0 {
                advance = 0.0;
                continue;
            }

            let y = m.text_top() + k as f64 * m.line_height;
            if shown == line.chars {
                let layout = &scene.line_layouts[k];
                draw_layout(ctx, &scene.font, layout, text_x, y);
                advance = f64::from(layout.width());
            } else {
                let byte_end = line.byte_end_for_chars(shown);
                let layout = self.engine.layout_line(
                    &line.text[..byte_end],
                    m.font_size as f32,
                    theme::DEFAULT_FOREGROUND.into(),
                    &line.spans_clipped(byte_end),
                )?;
                draw_layout(ctx, &scene.font, &layout, text_x, y);
                advance = f64::from(layout.width());
            }
        }

        Ok(advance)
    }

    fn draw_cursor(&self, ctx: &mut vello_cpu::RenderContext, revealed: usize, advance: f64) {
        let m = &self.scene.metrics;
        let line = revealed.saturating_sub(1);
        let x = m.text_x() + advance;
        let y = m.text_top() + line as f64 * m.line_height + 5.0 * m.scale;
        fill_shape(
            ctx,
            &Rect::new(x, y, x + m.cursor_width, y + m.font_size),
            theme::CURSOR,
        );
    }
}

/// Paint a shaped layout at `(x, y)` using each glyph run's own brush.
fn draw_layout(
    ctx: &mut vello_cpu::RenderContext,
    font: &vello_cpu::peniko::FontData,
    layout: &LineLayout,
    x: f64,
    y: f64,
) {
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((x, y)));

    for line in layout.lines() {
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };

            let brush = run.style().brush;
            ctx.set_paint(to_color(crate::foundation::core::Rgba8::new(
                brush.r, brush.g, brush.b, brush.a,
            )));

            let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x,
                y: g.y,
            });
            ctx.glyph_run(font)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}
