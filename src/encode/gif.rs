use crate::encode::sink::{FrameSink, SinkConfig, check_frame};
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::render::backend::FrameRGBA;
use crate::render::motion::LOOP_DURATION_MS;
use anyhow::Context as _;
use image::codecs::gif::{GifEncoder, Repeat};

pub const GIF_FPS: u32 = 25;
pub const GIF_FRAME_DELAY_MS: u32 = 1000 / GIF_FPS;
pub const GIF_FRAME_COUNT: usize = (LOOP_DURATION_MS as u32 / GIF_FRAME_DELAY_MS) as usize;

/// Palette quantization speed handed to the encoder (1 = best, 30 = fastest).
const GIF_ENCODE_SPEED: i32 = 10;

/// Sample times of the GIF frames: one loop, end point excluded.
pub fn gif_frame_times() -> Vec<f64> {
    (0..GIF_FRAME_COUNT)
        .map(|i| (i as u32 * GIF_FRAME_DELAY_MS) as f64)
        .collect()
}

/// Collects frames and encodes a looping GIF with a transparent background on `end`.
#[derive(Default)]
pub struct GifSink {
    cfg: Option<SinkConfig>,
    frames: Vec<image::Frame>,
    gif: Option<Vec<u8>>,
}

impl GifSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded GIF, available after a successful `end`.
    pub fn take_gif(&mut self) -> Option<Vec<u8>> {
        self.gif.take()
    }
}

impl FrameSink for GifSink {
    fn begin(&mut self, cfg: SinkConfig) -> SpritecutResult<()> {
        if cfg.canvas().is_empty() {
            return Err(SpritecutError::export("gif frames must be non-empty"));
        }
        if cfg.width > u32::from(u16::MAX) || cfg.height > u32::from(u16::MAX) {
            return Err(SpritecutError::export("gif frames are limited to 65535 px"));
        }
        self.cfg = Some(cfg);
        self.frames = Vec::with_capacity(cfg.frame_count);
        self.gif = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: usize, frame: &FrameRGBA) -> SpritecutResult<()> {
        let cfg = check_frame(self.cfg.as_ref(), idx, frame)?;
        let buf = image::RgbaImage::from_raw(cfg.width, cfg.height, frame.to_straight_rgba())
            .ok_or_else(|| SpritecutError::export("gif frame buffer size mismatch"))?;
        let delay = image::Delay::from_numer_denom_ms(cfg.frame_delay_ms, 1);
        self.frames.push(image::Frame::from_parts(buf, 0, 0, delay));
        Ok(())
    }

    fn end(&mut self) -> SpritecutResult<()> {
        if self.cfg.take().is_none() {
            return Err(SpritecutError::export("end called before begin"));
        }
        let frames = std::mem::take(&mut self.frames);
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_ENCODE_SPEED);
            encoder
                .set_repeat(Repeat::Infinite)
                .context("configure gif loop")?;
            encoder.encode_frames(frames).context("encode gif frames")?;
        }
        self.gif = Some(bytes);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/gif.rs"]
mod tests;
