use crate::assets::SourceImage;
use crate::assets::decode::{decode_data_url, decode_image};
use crate::config::ProjectConfig;
use crate::editor::{LassoEditor, LassoOutcome, PointerEvent, VertexPicker};
use crate::encode::export::{ExportArtifact, ExportOpts, export_gif, export_spritesheet};
use crate::encode::guard::RenderingFlag;
use crate::foundation::core::Point;
use crate::foundation::error::SpritecutResult;
use crate::model::Document;
use crate::render::backend::FrameRGBA;
use crate::render::compositor::{Compositor, FrameInputs};
use crate::segment::{Bitmaps, SegmentOpts, Segmenter};
use std::sync::Arc;

/// Owner of the editable state: the source image, the document (source of truth) and the
/// derived bitmap cache.
///
/// Edits go through [`Session::document_mut`] and only bump document counters; part layers are
/// recomputed lazily by [`Session::refresh_bitmaps`], so a burst of edits costs one segmentation.
pub struct Session {
    image: Option<SourceImage>,
    doc: Document,
    segmenter: Segmenter,
    segment_opts: SegmentOpts,
    bitmaps: Arc<Bitmaps>,
    /// Document `paths_version` the cached bitmaps were built from.
    bitmaps_source: Option<u64>,
    next_bitmaps_version: u64,
    rendering: RenderingFlag,
    lasso: LassoEditor,
    picker: VertexPicker,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            image: None,
            doc: Document::new(),
            segmenter: Segmenter::new(),
            segment_opts: SegmentOpts::default(),
            bitmaps: Arc::new(Bitmaps::default()),
            bitmaps_source: None,
            next_bitmaps_version: 1,
            rendering: RenderingFlag::new(),
            lasso: LassoEditor::new(),
            picker: VertexPicker::new(),
        }
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn segment_opts(&self) -> &SegmentOpts {
        &self.segment_opts
    }

    /// Change the segmentation strategy; layers are rebuilt on the next refresh.
    pub fn set_segment_opts(&mut self, opts: SegmentOpts) {
        if self.segment_opts != opts {
            self.segment_opts = opts;
            self.bitmaps_source = None;
        }
    }

    /// Shared handle on the export-in-progress flag, for disabling export triggers.
    pub fn rendering_flag(&self) -> RenderingFlag {
        self.rendering.clone()
    }

    pub fn is_rendering(&self) -> bool {
        self.rendering.is_rendering()
    }

    /// Drop everything and return to the blank state.
    pub fn reset(&mut self) {
        self.image = None;
        self.doc.replace_with(Document::new());
        self.bitmaps = Arc::new(Bitmaps::default());
        self.bitmaps_source = None;
        self.lasso.cancel();
        self.picker = VertexPicker::new();
    }

    /// Start over with a new source image. Parts, parameters, order and groups are cleared.
    pub fn load_image(&mut self, image: SourceImage) {
        self.reset();
        tracing::debug!(width = image.width(), height = image.height(), "image loaded");
        self.image = Some(image);
    }

    /// Decode an encoded image (PNG, JPEG, ...) and load it. On failure the session is blank.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> SpritecutResult<()> {
        match decode_image(bytes) {
            Ok(image) => {
                self.load_image(image);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "image decode failed");
                self.reset();
                Err(e)
            }
        }
    }

    /// Bootstrap from bundled defaults: a base64 image payload and a configuration JSON.
    ///
    /// The image is decoded first; the configuration is applied only once decoding succeeded.
    /// Any failure leaves a blank session and is returned to the caller.
    #[tracing::instrument(skip_all)]
    pub fn load_defaults(&mut self, image_payload: &str, config_json: &str) -> SpritecutResult<()> {
        let loaded = decode_data_url(image_payload).and_then(|image| {
            let doc = ProjectConfig::from_json(config_json)?.into_document()?;
            Ok((image, doc))
        });
        match loaded {
            Ok((image, doc)) => {
                self.load_image(image);
                self.doc.replace_with(doc);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "default assets could not be loaded");
                self.reset();
                Err(e)
            }
        }
    }

    /// Replace the document with an imported configuration. Nothing changes on error.
    pub fn import_config(&mut self, json: &str) -> SpritecutResult<()> {
        let doc = ProjectConfig::from_json(json)?.into_document()?;
        self.doc.replace_with(doc);
        self.lasso.cancel();
        self.picker.retain_parts(self.doc.parts());
        Ok(())
    }

    pub fn export_config(&self) -> SpritecutResult<String> {
        ProjectConfig::from_document(&self.doc).to_json_pretty()
    }

    /// Cached layers, possibly older than the latest path edit.
    pub fn bitmaps(&self) -> &Arc<Bitmaps> {
        &self.bitmaps
    }

    pub fn bitmaps_stale(&self) -> bool {
        self.bitmaps_source != Some(self.doc.paths_version())
    }

    /// Re-segment if any path changed since the cached layers were built.
    ///
    /// Returns whether a recompute happened. Without an image the cache is empty.
    pub fn refresh_bitmaps(&mut self) -> SpritecutResult<bool> {
        if !self.bitmaps_stale() {
            return Ok(false);
        }
        let source = self.doc.paths_version();
        let bitmaps = match &self.image {
            Some(image) => {
                let version = self.next_bitmaps_version;
                self.segmenter
                    .segment(image, self.doc.parts(), &self.segment_opts, version)?
            }
            None => Bitmaps::default(),
        };
        self.next_bitmaps_version += 1;
        tracing::debug!(
            parts = bitmaps.parts().len(),
            version = bitmaps.version(),
            paths_version = source,
            "bitmaps refreshed"
        );
        self.bitmaps = Arc::new(bitmaps);
        self.bitmaps_source = Some(source);
        Ok(true)
    }

    pub fn frame_inputs(&self) -> FrameInputs<'_> {
        FrameInputs::from_document(&self.doc, &self.bitmaps)
    }

    /// Render one frame from the current (refreshed) state.
    pub fn draw_frame(&mut self, time_ms: f64) -> SpritecutResult<FrameRGBA> {
        self.refresh_bitmaps()?;
        Compositor::new().draw_frame(&self.frame_inputs(), time_ms)
    }

    fn export_with(
        &mut self,
        f: impl FnOnce(&FrameInputs<'_>) -> SpritecutResult<ExportArtifact>,
    ) -> SpritecutResult<ExportArtifact> {
        let _guard = self.rendering.try_begin()?;
        self.refresh_bitmaps()?;
        f(&self.frame_inputs())
    }

    pub fn export_spritesheet(&mut self, opts: &ExportOpts) -> SpritecutResult<ExportArtifact> {
        self.export_with(|inputs| export_spritesheet(inputs, opts))
    }

    pub fn export_gif(&mut self, opts: &ExportOpts) -> SpritecutResult<ExportArtifact> {
        self.export_with(|inputs| export_gif(inputs, opts))
    }

    pub fn lasso(&self) -> &LassoEditor {
        &self.lasso
    }

    pub fn picker(&self) -> &VertexPicker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut VertexPicker {
        &mut self.picker
    }

    /// Lasso press on the active part. Ignored when no part is active.
    pub fn lasso_down(&mut self, ev: PointerEvent) -> SpritecutResult<LassoOutcome> {
        if self.doc.active_part().is_none() {
            return Ok(LassoOutcome::Nothing);
        }
        let out = self.lasso.pointer_down(ev);
        self.apply_lasso(out)
    }

    pub fn lasso_move(&mut self, ev: PointerEvent) -> SpritecutResult<LassoOutcome> {
        let out = self.lasso.pointer_move(ev);
        self.apply_lasso(out)
    }

    pub fn lasso_up(&mut self, ev: PointerEvent) -> SpritecutResult<LassoOutcome> {
        let out = self.lasso.pointer_up(ev);
        self.apply_lasso(out)
    }

    pub fn lasso_tick(&mut self, now_ms: f64) -> SpritecutResult<LassoOutcome> {
        let out = self.lasso.tick(now_ms);
        self.apply_lasso(out)
    }

    fn apply_lasso(&mut self, out: LassoOutcome) -> SpritecutResult<LassoOutcome> {
        let Some(active) = self.doc.active_part().map(str::to_owned) else {
            return Ok(out);
        };
        match &out {
            LassoOutcome::PathFinished(path) => {
                self.doc.finalize_path(&active, path.clone())?;
            }
            LassoOutcome::AnchorSet(anchor) => self.doc.set_anchor(&active, *anchor)?,
            LassoOutcome::Nothing | LassoOutcome::Discarded => {}
        }
        Ok(out)
    }

    /// Pick the vertex under `pos` into the active group (`extend` is the Shift modifier).
    /// Returns whether the selection changed.
    pub fn pick_vertex(&mut self, pos: Point, extend: bool) -> SpritecutResult<bool> {
        let hit = self.picker.pick(self.doc.parts(), pos);
        self.doc.select_vertex(hit, extend)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/editor_session.rs"]
mod tests;
