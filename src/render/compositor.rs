use crate::effects::composite::source_atop_in_place;
use crate::foundation::core::Canvas;
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::geometry::DEFAULT_VERTEX_SPACING;
use crate::model::{AnimationParams, Document, Part, VertexGroup};
use crate::render::backend::FrameRGBA;
use crate::render::cpu::{CpuRaster, affine_to_cpu, image_paint, polygon_to_cpu, surface_size};
use crate::render::motion::PartMotion;
use crate::render::seam::{SeamContext, SeamPatch, plan_seams};
use crate::segment::{Bitmaps, Layer};
use std::collections::{BTreeMap, HashMap};

/// Everything a frame depends on besides time. Borrowed, never mutated.
#[derive(Clone, Copy)]
pub struct FrameInputs<'a> {
    pub bitmaps: &'a Bitmaps,
    pub parts: &'a BTreeMap<String, Part>,
    pub animation_params: &'a BTreeMap<String, AnimationParams>,
    /// Index 0 is the front of the stack and is drawn last.
    pub part_order: &'a [String],
    pub vertex_groups: &'a [VertexGroup],
}

impl<'a> FrameInputs<'a> {
    pub fn from_document(doc: &'a Document, bitmaps: &'a Bitmaps) -> Self {
        Self {
            bitmaps,
            parts: doc.parts(),
            animation_params: doc.animation_params(),
            part_order: doc.part_order(),
            vertex_groups: doc.vertex_groups(),
        }
    }
}

/// Deterministic frame renderer backed by `vello_cpu`.
///
/// Holds only caches (raster context, layer paints keyed by layer id); output depends solely on
/// the inputs and the time passed to [`Compositor::draw_frame`].
pub struct Compositor {
    raster: CpuRaster,
    paints: HashMap<u64, vello_cpu::Image>,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            raster: CpuRaster::new(),
            paints: HashMap::new(),
        }
    }

    /// Drop cached layer paints.
    pub fn clear_cache(&mut self) {
        self.paints.clear();
    }

    fn paint_for(&mut self, layer: &Layer) -> SpritecutResult<vello_cpu::Image> {
        if let Some(p) = self.paints.get(&layer.id()) {
            return Ok(p.clone());
        }
        let paint = image_paint(layer.data(), layer.canvas())?;
        self.paints.insert(layer.id(), paint.clone());
        Ok(paint)
    }

    fn retain_live_paints(&mut self, bitmaps: &Bitmaps) {
        let live: Vec<u64> = bitmaps
            .static_body()
            .into_iter()
            .chain(bitmaps.parts().values())
            .map(|l| l.id())
            .collect();
        self.paints.retain(|id, _| live.contains(id));
    }

    /// Plan the seam patches for `time_ms` without drawing anything.
    pub fn plan_seams(&self, inputs: &FrameInputs<'_>, time_ms: f64) -> Vec<SeamPatch> {
        let ctx = SeamContext {
            parts: inputs.parts,
            animation_params: inputs.animation_params,
            bitmaps: inputs.bitmaps,
            vertex_spacing: DEFAULT_VERTEX_SPACING,
        };
        plan_seams(&ctx, inputs.vertex_groups, time_ms)
    }

    /// Render one frame: static body, then seam patches, then parts back to front with their
    /// pulsing tint overlay.
    ///
    /// Parts lacking a layer, parameters or an anchor are skipped. Errors only come from the
    /// drawing surface itself (zero or oversized canvas, malformed layer buffers).
    #[tracing::instrument(skip(self, inputs), level = "trace")]
    pub fn draw_frame(&mut self, inputs: &FrameInputs<'_>, time_ms: f64) -> SpritecutResult<FrameRGBA> {
        let canvas = inputs.bitmaps.canvas();
        if canvas.is_empty() {
            return Err(SpritecutError::render("no image to render"));
        }
        let (w, h) = surface_size(canvas)?;
        self.retain_live_paints(inputs.bitmaps);

        let seams = self.plan_seams(inputs, time_ms);
        let body = match inputs.bitmaps.static_body() {
            Some(layer) => Some(self.paint_for(layer)?),
            None => None,
        };

        let mut draws = Vec::with_capacity(inputs.part_order.len());
        for key in inputs.part_order.iter().rev() {
            let (Some(part), Some(layer), Some(params)) = (
                inputs.parts.get(key),
                inputs.bitmaps.part(key),
                inputs.animation_params.get(key),
            ) else {
                continue;
            };
            let Some(anchor) = part.anchor else {
                continue;
            };
            let motion = PartMotion::at(params, time_ms);
            let paint = self.paint_for(layer)?;
            let tint_alpha = motion.tint_alpha(params);
            let tinted = if tint_alpha > 0.0 {
                let mut rgba = layer.data().to_vec();
                source_atop_in_place(&mut rgba, params.tint_color.to_premul(), tint_alpha as f32)?;
                Some(image_paint(&rgba, layer.canvas())?)
            } else {
                None
            };
            draws.push((
                affine_to_cpu(motion.affine(anchor)),
                layer.canvas(),
                paint,
                tinted,
            ));
        }

        let mut pixmap = vello_cpu::Pixmap::new(w, h);
        self.raster.with_ctx_mut(w, h, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

            if let Some(body) = body {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(body);
                ctx.fill_rect(&layer_rect(canvas));
            }

            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            for seam in &seams {
                let c = seam.color;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
                ctx.fill_path(&polygon_to_cpu(&seam.polygon));
            }

            for (tr, layer_canvas, paint, tinted) in draws {
                ctx.set_transform(tr);
                ctx.set_paint(paint);
                ctx.fill_rect(&layer_rect(layer_canvas));
                if let Some(tinted) = tinted {
                    ctx.set_paint(tinted);
                    ctx.fill_rect(&layer_rect(layer_canvas));
                }
            }

            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: canvas.width,
            height: canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn layer_rect(canvas: Canvas) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(0.0, 0.0, f64::from(canvas.width), f64::from(canvas.height))
}

/// One-shot convenience over [`Compositor::draw_frame`].
pub fn draw_frame(inputs: &FrameInputs<'_>, time_ms: f64) -> SpritecutResult<FrameRGBA> {
    Compositor::new().draw_frame(inputs, time_ms)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
