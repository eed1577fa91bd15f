use crate::foundation::core::{Affine, Canvas, Point};
use crate::foundation::error::{SpritecutError, SpritecutResult};
use std::sync::Arc;

/// Reusable `vello_cpu` context. Recreated only when the surface size changes.
#[derive(Default)]
pub(crate) struct CpuRaster {
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuRaster {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> SpritecutResult<R>,
    ) -> SpritecutResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(&mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    /// Fill closed polygons in white and return per-pixel coverage (0..=255).
    ///
    /// Each polygon is filled on its own so that overlapping outlines union regardless of their
    /// winding direction. Polygons with fewer than three points cover nothing.
    pub(crate) fn polygon_coverage(
        &mut self,
        canvas: Canvas,
        polygons: &[&[Point]],
    ) -> SpritecutResult<Vec<u8>> {
        let (w, h) = surface_size(canvas)?;
        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.with_ctx_mut(w, h, |ctx| {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));
            for poly in polygons.iter().filter(|p| p.len() >= 3) {
                ctx.fill_path(&polygon_to_cpu(poly));
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;
        Ok(pixmap
            .data_as_u8_slice()
            .chunks_exact(4)
            .map(|px| px[3])
            .collect())
    }
}

pub(crate) fn surface_size(canvas: Canvas) -> SpritecutResult<(u16, u16)> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| SpritecutError::render("surface width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| SpritecutError::render("surface height exceeds u16"))?;
    if w == 0 || h == 0 {
        return Err(SpritecutError::render("surface has zero size"));
    }
    Ok((w, h))
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

/// Closed polyline through `points`.
pub(crate) fn polygon_to_cpu(points: &[Point]) -> vello_cpu::kurbo::BezPath {
    let mut out = vello_cpu::kurbo::BezPath::new();
    let mut it = points.iter();
    if let Some(first) = it.next() {
        out.move_to(vello_cpu::kurbo::Point::new(first.x, first.y));
        for p in it {
            out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y));
        }
        out.close_path();
    }
    out
}

pub(crate) fn pixmap_from_premul_bytes(
    bytes: &[u8],
    canvas: Canvas,
) -> SpritecutResult<vello_cpu::Pixmap> {
    let (w, h) = surface_size(canvas)?;
    if bytes.len() != canvas.rgba_len() {
        return Err(SpritecutError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels =
        Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(canvas.pixel_count());
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels, w, h, true,
    ))
}

pub(crate) fn image_paint(bytes_premul: &[u8], canvas: Canvas) -> SpritecutResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, canvas)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
