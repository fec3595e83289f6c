//! Separable box blur.
//!
//! A uniform average over a `(2*radius+1)²` window, decomposed into a
//! horizontal and a vertical 1-D pass. Each pass maintains a sliding window
//! sum, so the cost is O(width × height) per pass regardless of radius —
//! the property that makes large radii affordable. A direct nested-loop
//! blur would be correctness-equivalent but O(radius²) slower and is not
//! acceptable here.
//!
//! Borders are edge-clamped: the initial window sum counts the border pixel
//! `radius` extra times, and as the window slides past the far edge it keeps
//! re-reading the clamped last pixel.

use crate::raster::{BYTES_PER_PIXEL, Raster};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-pass radius ceiling. Stronger blurs come from more passes, not wider
/// windows (see [`BlurPlan`]).
pub const MAX_RADIUS_PER_PASS: u32 = 15;

/// User-facing blur strength from the background slider.
///
/// Clamped to 5..=50 on construction, like every slider-backed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BlurIntensity(u32);

impl BlurIntensity {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 50;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BlurIntensity {
    fn default() -> Self {
        Self(20)
    }
}

impl From<u32> for BlurIntensity {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<BlurIntensity> for u32 {
    fn from(intensity: BlurIntensity) -> Self {
        intensity.0
    }
}

/// How many box-blur passes to run, and at what radius.
///
/// The intensity→(passes, radius) mapping is the documented contract between
/// the slider and the pixels; changing it changes every rendered background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlurPlan {
    pub passes: u32,
    pub radius: u32,
}

impl BlurPlan {
    /// `passes = ceil(intensity / 10)`, `radius = min(intensity / passes, 15)`.
    ///
    /// Repeated box passes approximate a stronger (and smoother) blur than a
    /// single pass at a clamped radius could.
    pub fn for_intensity(intensity: BlurIntensity) -> Self {
        let value = intensity.value();
        let passes = value.div_ceil(10);
        let radius = (value / passes).min(MAX_RADIUS_PER_PASS);
        Self { passes, radius }
    }
}

/// Blur all four channels (alpha included) with an edge-clamped box window.
///
/// `radius = 0` degenerates to a window of one pixel and returns a copy of
/// the input.
pub fn box_blur(src: &Raster, radius: u32) -> Raster {
    let width = src.width() as usize;
    let height = src.height() as usize;
    let radius = radius as usize;
    let window = 2 * radius as u64 + 1;
    let stride = src.stride();

    // Horizontal pass: rows are independent, run them in parallel.
    let mut temp = src.blank_like();
    temp.pixels_mut()
        .par_chunks_exact_mut(stride)
        .zip(src.pixels().par_chunks_exact(stride))
        .for_each(|(dst_row, src_row)| {
            blur_row(dst_row, src_row, width, radius, window);
        });

    // Vertical pass over the horizontal result, column by column. The
    // windows here run down columns, which do not split into disjoint
    // `&mut` chunks, so this pass stays sequential.
    let mut result = src.blank_like();
    let temp_px = temp.pixels();
    let result_px = result.pixels_mut();
    for x in 0..width {
        blur_column(result_px, temp_px, width, height, x, radius, window);
    }

    result
}

/// Slide a window along one row.
fn blur_row(dst_row: &mut [u8], src_row: &[u8], width: usize, radius: usize, window: u64) {
    let px = |i: usize| -> usize { i * BYTES_PER_PIXEL };

    let mut sum = [0u64; BYTES_PER_PIXEL];
    // Seed: the pixel itself plus `radius` to the right (clamped), plus
    // `radius` copies of the clamped left border.
    for d in 0..=radius {
        let idx = px(d.min(width - 1));
        for c in 0..BYTES_PER_PIXEL {
            sum[c] += src_row[idx + c] as u64;
        }
    }
    for c in 0..BYTES_PER_PIXEL {
        sum[c] += src_row[c] as u64 * radius as u64;
    }

    let half = window / 2;
    for i in 0..width {
        let out = px(i);
        for c in 0..BYTES_PER_PIXEL {
            dst_row[out + c] = ((sum[c] + half) / window) as u8;
        }

        let add = px((i + radius + 1).min(width - 1));
        let rem = px(i.saturating_sub(radius));
        for c in 0..BYTES_PER_PIXEL {
            sum[c] = sum[c] + src_row[add + c] as u64 - src_row[rem + c] as u64;
        }
    }
}

/// Vertical counterpart of [`blur_row`]: the same sliding window, walking
/// column `x` of the plane.
fn blur_column(
    dst: &mut [u8],
    src: &[u8],
    width: usize,
    height: usize,
    x: usize,
    radius: usize,
    window: u64,
) {
    let px = |y: usize| -> usize { (y * width + x) * BYTES_PER_PIXEL };

    let mut sum = [0u64; BYTES_PER_PIXEL];
    for d in 0..=radius {
        let idx = px(d.min(height - 1));
        for c in 0..BYTES_PER_PIXEL {
            sum[c] += src[idx + c] as u64;
        }
    }
    for c in 0..BYTES_PER_PIXEL {
        sum[c] += src[px(0) + c] as u64 * radius as u64;
    }

    let half = window / 2;
    for y in 0..height {
        let out = px(y);
        for c in 0..BYTES_PER_PIXEL {
            dst[out + c] = ((sum[c] + half) / window) as u8;
        }

        let add = px((y + radius + 1).min(height - 1));
        let rem = px(y.saturating_sub(radius));
        for c in 0..BYTES_PER_PIXEL {
            sum[c] = sum[c] + src[add + c] as u64 - src[rem + c] as u64;
        }
    }
}
