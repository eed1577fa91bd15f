use crate::encode::gif::{GIF_FRAME_DELAY_MS, GifSink, gif_frame_times};
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::encode::spritesheet::{SpritesheetSink, sheet_frame_times};
use crate::foundation::core::Canvas;
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::render::backend::FrameRGBA;
use crate::render::compositor::{Compositor, FrameInputs};
use anyhow::Context as _;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

pub const SPRITESHEET_FILE_NAME: &str = "spritesheet.png";
pub const GIF_FILE_NAME: &str = "sprite-animation.gif";

/// Per-frame size of exported artifacts relative to the source image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScale {
    #[default]
    Full,
    Half,
    Quarter,
}

impl ExportScale {
    pub fn factor(self) -> f64 {
        match self {
            Self::Full => 1.0,
            Self::Half => 0.5,
            Self::Quarter => 0.25,
        }
    }

    /// Scaled frame size, floored and never below one pixel per axis.
    pub fn apply(self, canvas: Canvas) -> Canvas {
        let f = self.factor();
        let scale = |v: u32| ((f64::from(v) * f).floor() as u32).max(1);
        Canvas::new(scale(canvas.width), scale(canvas.height))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExportOpts {
    pub scale: ExportScale,
    /// Render frames on the rayon pool. Output is identical to the sequential path.
    pub parallel: bool,
}

/// A finished export, ready to be offered for download or written out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Write the artifact into `dir` under its fixed file name.
    pub fn write_to_dir(&self, dir: &Path) -> SpritecutResult<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory '{}'", dir.display()))?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("failed to write '{}'", path.display()))?;
        Ok(path)
    }
}

/// Nearest-neighbor resample of a frame to `target`.
pub fn scale_nearest(frame: &FrameRGBA, target: Canvas) -> FrameRGBA {
    if frame.canvas() == target {
        return frame.clone();
    }
    let (sw, sh) = (u64::from(frame.width), u64::from(frame.height));
    let (tw, th) = (u64::from(target.width), u64::from(target.height));
    let mut data = Vec::with_capacity(target.rgba_len());
    for y in 0..th {
        let sy = ((2 * y + 1) * sh / (2 * th)).min(sh.saturating_sub(1));
        for x in 0..tw {
            let sx = ((2 * x + 1) * sw / (2 * tw)).min(sw.saturating_sub(1));
            let i = ((sy * sw + sx) * 4) as usize;
            data.extend_from_slice(&frame.data[i..i + 4]);
        }
    }
    FrameRGBA {
        width: target.width,
        height: target.height,
        data,
        premultiplied: frame.premultiplied,
    }
}

/// Render one frame per entry of `times`, scaled to `target`, in order.
pub fn render_frames(
    inputs: &FrameInputs<'_>,
    times: &[f64],
    target: Canvas,
    parallel: bool,
) -> SpritecutResult<Vec<FrameRGBA>> {
    if !parallel {
        let mut compositor = Compositor::new();
        return times
            .iter()
            .map(|&t| Ok(scale_nearest(&compositor.draw_frame(inputs, t)?, target)))
            .collect();
    }

    let rendered = times
        .par_iter()
        .map_init(Compositor::new, |compositor, &t| -> SpritecutResult<FrameRGBA> {
            Ok(scale_nearest(&compositor.draw_frame(inputs, t)?, target))
        })
        .collect::<Vec<_>>();
    rendered.into_iter().collect()
}

fn drive_sink(sink: &mut dyn FrameSink, cfg: SinkConfig, frames: &[FrameRGBA]) -> SpritecutResult<()> {
    sink.begin(cfg)?;
    for (idx, frame) in frames.iter().enumerate() {
        sink.push_frame(idx, frame)?;
    }
    sink.end()
}

fn require_static_body(inputs: &FrameInputs<'_>) -> SpritecutResult<()> {
    if inputs.bitmaps.static_body().is_none() {
        return Err(SpritecutError::export(
            "static body layer is missing; load an image before exporting",
        ));
    }
    Ok(())
}

/// Render the 5x2 spritesheet and encode it as PNG.
#[tracing::instrument(skip(inputs))]
pub fn export_spritesheet(
    inputs: &FrameInputs<'_>,
    opts: &ExportOpts,
) -> SpritecutResult<ExportArtifact> {
    require_static_body(inputs)?;
    let cell = opts.scale.apply(inputs.bitmaps.canvas());
    let times = sheet_frame_times();
    let frames = render_frames(inputs, &times, cell, opts.parallel)?;

    let mut sink = SpritesheetSink::new();
    let cfg = SinkConfig {
        width: cell.width,
        height: cell.height,
        frame_count: frames.len(),
        frame_delay_ms: 0,
    };
    drive_sink(&mut sink, cfg, &frames)?;
    let bytes = sink
        .take_png()
        .ok_or_else(|| SpritecutError::export("spritesheet encoder produced no output"))?;

    tracing::info!(bytes = bytes.len(), frames = frames.len(), "spritesheet exported");
    Ok(ExportArtifact {
        file_name: SPRITESHEET_FILE_NAME.to_owned(),
        mime: "image/png".to_owned(),
        bytes,
    })
}

/// Render one 25 fps loop and encode it as an infinitely repeating GIF.
#[tracing::instrument(skip(inputs))]
pub fn export_gif(inputs: &FrameInputs<'_>, opts: &ExportOpts) -> SpritecutResult<ExportArtifact> {
    require_static_body(inputs)?;
    let size = opts.scale.apply(inputs.bitmaps.canvas());
    let times = gif_frame_times();
    let frames = render_frames(inputs, &times, size, opts.parallel)?;

    let mut sink = GifSink::new();
    let cfg = SinkConfig {
        width: size.width,
        height: size.height,
        frame_count: frames.len(),
        frame_delay_ms: GIF_FRAME_DELAY_MS,
    };
    drive_sink(&mut sink, cfg, &frames)?;
    let bytes = sink
        .take_gif()
        .ok_or_else(|| SpritecutError::export("gif encoder produced no output"))?;

    tracing::info!(bytes = bytes.len(), frames = frames.len(), "gif exported");
    Ok(ExportArtifact {
        file_name: GIF_FILE_NAME.to_owned(),
        mime: "image/gif".to_owned(),
        bytes,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/encode/export.rs"]
mod tests;
