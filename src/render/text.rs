use std::sync::Arc;

use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::slide::caption::Caption;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

/// A caption shaped for one canvas size, ready to draw.
pub(crate) struct CaptionLayout {
    layout: parley::Layout<TextBrushRgba8>,
    font: vello_cpu::peniko::FontData,
    origin: (f64, f64),
}

impl CaptionLayout {
    /// Top-left corner of the text block on the canvas.
    pub(crate) fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Size of the text block.
    pub(crate) fn size(&self) -> (f64, f64) {
        (
            f64::from(self.layout.width()),
            f64::from(self.layout.height()),
        )
    }

    /// Fill the glyphs with their brush color. Opacity is left to the caller's layer.
    pub(crate) fn draw(&self, ctx: &mut vello_cpu::RenderContext) {
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(vello_cpu::kurbo::Affine::translate(self.origin));
        for line in self.layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    }
}

struct LoadedFont {
    bytes: Arc<Vec<u8>>,
    family: String,
    paint: vello_cpu::peniko::FontData,
}

/// Shapes captions with Parley. Each distinct font is registered once.
pub(crate) struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: Vec<LoadedFont>,
}

impl TextLayoutEngine {
    pub(crate) fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: Vec::new(),
        }
    }

    fn font_index(&mut self, bytes: &Arc<Vec<u8>>) -> ReelResult<usize> {
        if let Some(i) = self
            .fonts
            .iter()
            .position(|f| Arc::ptr_eq(&f.bytes, bytes) || f.bytes == *bytes)
        {
            return Ok(i);
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes.to_vec()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| ReelError::render("no font families registered from caption font"))?;
        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| ReelError::render("registered caption font family has no name"))?
            .to_string();
        let paint =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.to_vec()), 0);

        self.fonts.push(LoadedFont {
            bytes: Arc::clone(bytes),
            family,
            paint,
        });
        Ok(self.fonts.len() - 1)
    }

    /// Shape `caption`, wrap it to the canvas width minus margins and place it centered at the
    /// bottom edge.
    pub(crate) fn layout_caption(
        &mut self,
        caption: &Caption,
        canvas: Canvas,
    ) -> ReelResult<CaptionLayout> {
        let style = &caption.style;
        let font = self.font_index(style.shared_font())?;
        let family = self.fonts[font].family.clone();
        let paint = self.fonts[font].paint.clone();

        let [r, g, b, a] = style.color();
        let brush = TextBrushRgba8 { r, g, b, a };
        let text = caption.text.as_str();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(style.size_px()));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        let margin = style.margin_px();
        let max_w = (canvas.width as f32 - 2.0 * margin).max(1.0);
        layout.break_all_lines(Some(max_w));
        layout.align(
            Some(max_w),
            parley::Alignment::Start,
            parley::AlignmentOptions::default(),
        );

        let x = (f64::from(canvas.width) - f64::from(layout.width())) * 0.5;
        let y = f64::from(canvas.height) - f64::from(margin) - f64::from(layout.height());
        Ok(CaptionLayout {
            layout,
            font: paint,
            origin: (x, y),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
