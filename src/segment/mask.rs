use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::{SpritecutError, SpritecutResult};
use crate::model::LassoPath;
use crate::render::cpu::CpuRaster;

/// Rasterized coverage at or above this value counts as inside.
pub const MASK_THRESHOLD: u8 = 128;

/// Binary per-pixel selection over a canvas. Stored as 0 / 255 alpha bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    canvas: Canvas,
    alpha: Vec<u8>,
}

impl Mask {
    pub fn empty(canvas: Canvas) -> Self {
        Self {
            canvas,
            alpha: vec![0; canvas.pixel_count()],
        }
    }

    /// Binarize anti-aliased coverage at [`MASK_THRESHOLD`].
    pub fn from_coverage(canvas: Canvas, coverage: &[u8]) -> SpritecutResult<Self> {
        if coverage.len() != canvas.pixel_count() {
            return Err(SpritecutError::render(
                "coverage buffer does not match canvas size",
            ));
        }
        Ok(Self {
            canvas,
            alpha: coverage
                .iter()
                .map(|&c| if c >= MASK_THRESHOLD { 255 } else { 0 })
                .collect(),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// One byte per pixel, 0 or 255.
    pub fn alpha(&self) -> &[u8] {
        &self.alpha
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.canvas.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> bool {
        x < self.canvas.width && y < self.canvas.height && self.alpha[self.index(x, y)] != 0
    }

    pub fn set(&mut self, x: u32, y: u32, inside: bool) {
        if x < self.canvas.width && y < self.canvas.height {
            let i = self.index(x, y);
            self.alpha[i] = if inside { 255 } else { 0 };
        }
    }

    pub fn count(&self) -> usize {
        self.alpha.iter().filter(|&&a| a != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.iter().all(|&a| a == 0)
    }

    pub fn union_with(&mut self, other: &Mask) {
        debug_assert_eq!(self.canvas, other.canvas);
        for (a, b) in self.alpha.iter_mut().zip(&other.alpha) {
            *a |= *b;
        }
    }

    pub fn subtract(&mut self, other: &Mask) {
        debug_assert_eq!(self.canvas, other.canvas);
        for (a, b) in self.alpha.iter_mut().zip(&other.alpha) {
            if *b != 0 {
                *a = 0;
            }
        }
    }

    /// Inside pixels with at least one orthogonal neighbor outside the mask or the canvas.
    pub fn border_pixels(&self) -> Vec<(u32, u32)> {
        let (w, h) = (self.canvas.width, self.canvas.height);
        let mut out = Vec::new();
        for y in 0..h {
            for x in 0..w {
                if !self.get(x, y) {
                    continue;
                }
                let edge = x == 0
                    || y == 0
                    || x + 1 == w
                    || y + 1 == h
                    || !self.get(x - 1, y)
                    || !self.get(x + 1, y)
                    || !self.get(x, y - 1)
                    || !self.get(x, y + 1);
                if edge {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

/// Rasterize a list of closed lasso paths into a binary mask (their union).
pub(crate) fn rasterize_paths(
    raster: &mut CpuRaster,
    canvas: Canvas,
    paths: &[LassoPath],
) -> SpritecutResult<Mask> {
    let polys: Vec<&[Point]> = paths
        .iter()
        .map(Vec::as_slice)
        .filter(|p| p.len() >= 3)
        .collect();
    if polys.is_empty() {
        return Ok(Mask::empty(canvas));
    }
    let coverage = raster.polygon_coverage(canvas, &polys)?;
    Mask::from_coverage(canvas, &coverage)
}

#[cfg(test)]
#[path = "../../tests/unit/segment/mask.rs"]
mod tests;
