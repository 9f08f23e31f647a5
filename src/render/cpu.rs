use std::sync::Arc;

use crate::assets::image::SlideImage;
use crate::foundation::core::{Canvas, Rect};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::frame::FrameRGBA;
use crate::render::text::{CaptionLayout, TextLayoutEngine};
use crate::slide::caption::Caption;
use crate::timing::plan::{FramePlan, LayerSource};

/// A slide's image paint and shaped caption, built once at setup.
pub(crate) struct PreparedSlide {
    image: Option<vello_cpu::Image>,
    caption: Option<CaptionLayout>,
}

impl PreparedSlide {
    pub(crate) fn new(
        text: &mut TextLayoutEngine,
        canvas: Canvas,
        image: Option<&SlideImage>,
        caption: Option<&Caption>,
    ) -> ReelResult<Self> {
        let image = image
            .map(|img| {
                let pixmap =
                    image_premul_bytes_to_pixmap(img.pixels(), img.width(), img.height())?;
                Ok::<_, ReelError>(vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                })
            })
            .transpose()?;
        let caption = caption
            .map(|c| text.layout_caption(c, canvas))
            .transpose()?;
        if let Some(layout) = &caption {
            let (x, y) = layout.origin();
            let (w, h) = layout.size();
            tracing::trace!(x, y, w, h, "shaped caption");
        }
        Ok(Self { image, caption })
    }
}

/// Rasterizes frame plans on the CPU. The target pixmap is reused across frames.
pub(crate) struct FrameRenderer {
    canvas: Canvas,
    size: (u16, u16),
    pixmap: vello_cpu::Pixmap,
}

impl FrameRenderer {
    pub(crate) fn new(canvas: Canvas) -> ReelResult<Self> {
        let (w, h) = canvas_u16(canvas)?;
        Ok(Self {
            canvas,
            size: (w, h),
            pixmap: vello_cpu::Pixmap::new(w, h),
        })
    }

    /// Render `plan` into `frame`, looking slides up by index.
    ///
    /// The surface starts as opaque black, so the result never depends on what the buffer held
    /// before.
    pub(crate) fn render(
        &mut self,
        plan: &FramePlan,
        slides: &[Option<PreparedSlide>],
        frame: &mut FrameRGBA,
    ) -> ReelResult<()> {
        frame.check_matches(self.canvas)?;
        let full = vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.canvas.width),
            f64::from(self.canvas.height),
        );

        let mut ctx = vello_cpu::RenderContext::new(self.size.0, self.size.1);
        let ctx = &mut ctx;
        fill_black(ctx, full);

        for layer in &plan.layers {
            let opacity = if layer.alpha.is_nan() {
                0.0
            } else {
                layer.alpha.clamp(0.0, 1.0)
            };
            if opacity <= 0.0 {
                continue;
            }
            if opacity < 1.0 {
                ctx.push_opacity_layer(opacity);
            }
            match layer.source {
                LayerSource::Black => fill_black(ctx, full),
                LayerSource::Slide { index, crop, .. } => {
                    let slide = slides.get(index).and_then(Option::as_ref).ok_or_else(|| {
                        ReelError::render(format!("slide {index} is not loaded"))
                    })?;
                    match (&slide.image, crop) {
                        (Some(paint), Some(crop)) => {
                            draw_crop(ctx, paint, crop, self.canvas)?;
                        }
                        _ => fill_black(ctx, full),
                    }
                    if let Some(caption) = &slide.caption {
                        caption.draw(ctx);
                    }
                }
            }
            if opacity < 1.0 {
                ctx.pop_layer();
            }
        }

        ctx.flush();
        ctx.render_to_pixmap(&mut self.pixmap);
        frame.data.copy_from_slice(self.pixmap.data_as_u8_slice());
        frame.premultiplied = true;
        Ok(())
    }
}

fn fill_black(ctx: &mut vello_cpu::RenderContext, full: vello_cpu::kurbo::Rect) {
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(0, 0, 0, 255));
    ctx.fill_rect(&full);
}

/// Scale `crop` (image pixels) onto the whole canvas.
fn draw_crop(
    ctx: &mut vello_cpu::RenderContext,
    paint: &vello_cpu::Image,
    crop: Rect,
    canvas: Canvas,
) -> ReelResult<()> {
    let (cw, ch) = (crop.width(), crop.height());
    if !(cw.is_finite() && ch.is_finite() && cw > 0.0 && ch > 0.0) {
        return Err(ReelError::render(format!("crop has no area: {crop:?}")));
    }
    let sx = f64::from(canvas.width) / cw;
    let sy = f64::from(canvas.height) / ch;

    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(
        vello_cpu::kurbo::Affine::scale_non_uniform(sx, sy)
            * vello_cpu::kurbo::Affine::translate((-crop.x0, -crop.y0)),
    );
    ctx.set_paint(paint.clone());
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(crop.x0, crop.y0, crop.x1, crop.y1));
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    Ok(())
}

fn canvas_u16(canvas: Canvas) -> ReelResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| ReelError::validation("canvas width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| ReelError::validation("canvas height exceeds u16"))?;
    Ok((w, h))
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> ReelResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| ReelError::decode("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| ReelError::decode("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(ReelError::decode("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
