use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::render::backend::FrameRGBA;
use crate::render::motion::LOOP_DURATION_MS;
use anyhow::Context as _;

pub const SHEET_COLUMNS: u32 = 5;
pub const SHEET_ROWS: u32 = 2;
pub const SHEET_FRAMES: usize = (SHEET_COLUMNS * SHEET_ROWS) as usize;

/// Sample times of the sheet cells: one full loop, both endpoints included.
pub fn sheet_frame_times() -> Vec<f64> {
    let step = LOOP_DURATION_MS / (SHEET_FRAMES - 1) as f64;
    (0..SHEET_FRAMES).map(|i| step * i as f64).collect()
}

/// Tiles frames row-major into a fixed grid and encodes the sheet as PNG on `end`.
#[derive(Debug, Default)]
pub struct SpritesheetSink {
    cfg: Option<SinkConfig>,
    sheet: Option<image::RgbaImage>,
    png: Option<Vec<u8>>,
}

impl SpritesheetSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded PNG, available after a successful `end`.
    pub fn take_png(&mut self) -> Option<Vec<u8>> {
        self.png.take()
    }
}

impl FrameSink for SpritesheetSink {
    fn begin(&mut self, cfg: SinkConfig) -> SpritecutResult<()> {
        if cfg.canvas().is_empty() {
            return Err(SpritecutError::export("spritesheet cells must be non-empty"));
        }
        if cfg.frame_count > SHEET_FRAMES {
            return Err(SpritecutError::export(format!(
                "spritesheet holds {SHEET_FRAMES} frames, got {}",
                cfg.frame_count
            )));
        }
        let w = cfg
            .width
            .checked_mul(SHEET_COLUMNS)
            .ok_or_else(|| SpritecutError::export("spritesheet width overflows"))?;
        let h = cfg
            .height
            .checked_mul(SHEET_ROWS)
            .ok_or_else(|| SpritecutError::export("spritesheet height overflows"))?;
        self.sheet = Some(image::RgbaImage::new(w, h));
        self.cfg = Some(cfg);
        self.png = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> SpritecutResult<()> {
        let cfg = check_frame(self.cfg.as_ref(), idx, frame)?;
        let sheet = self
            .sheet
            .as_mut()
            .ok_or_else(|| SpritecutError::export("push_frame called before begin"))?;
        let straight = frame.to_straight_rgba();
        let cell_x = (idx as u32 % SHEET_COLUMNS) * cfg.width;
        let cell_y = (idx as u32 / SHEET_COLUMNS) * cfg.height;
        for (y, row) in straight.chunks_exact(cfg.width as usize * 4).enumerate() {
            for (x, px) in row.chunks_exact(4).enumerate() {
                sheet.put_pixel(
                    cell_x + x as u32,
                    cell_y + y as u32,
                    image::Rgba([px[0], px[1], px[2], px[3]]),
                );
            }
        }
        Ok(())
    }

    fn end(&mut self) -> SpritecutResult<()> {
        let sheet = self
            .sheet
            .take()
            .ok_or_else(|| SpritecutError::export("end called before begin"))?;
        let mut out = std::io::Cursor::new(Vec::new());
        sheet
            .write_to(&mut out, image::ImageFormat::Png)
            .context("encode spritesheet png")?;
        self.png = Some(out.into_inner());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/spritesheet.rs"]
mod tests;
