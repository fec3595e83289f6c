//! Bilinear resampling.
//!
//! One interpolation routine serves both directions: [`downsample`] bounds an
//! oversized raster to a maximum edge length, and the background synthesizer
//! reuses [`resample_bilinear`] for its cover-fit upscale — the interpolation
//! math is symmetric.
//!
//! Sampling is corner-aligned: destination pixel (x, y) samples the source at
//! `(x * src_w / dst_w, y * src_h / dst_h)` and blends the four bracketing
//! source pixels per channel. The two bracketing integer coordinates are
//! clamped to the source bounds, which handles the image border without a
//! separate edge path.

use crate::raster::{BYTES_PER_PIXEL, Raster, RasterError};
use rayon::prelude::*;

/// Resample `src` to exactly `dst_width` × `dst_height`.
///
/// Each destination pixel is the bilinear blend of the 4 nearest source
/// pixels, computed independently per RGBA channel, rounded to nearest and
/// clamped to 0..=255. Destination rows are independent, so they are
/// computed in parallel.
pub fn resample_bilinear(
    src: &Raster,
    dst_width: u32,
    dst_height: u32,
) -> Result<Raster, RasterError> {
    let mut dst = Raster::blank(dst_width, dst_height)?;

    let src_w = src.width() as usize;
    let src_h = src.height() as usize;
    let x_ratio = src.width() as f64 / dst_width as f64;
    let y_ratio = src.height() as f64 / dst_height as f64;
    let src_px = src.pixels();

    let stride = dst.stride();
    dst.pixels_mut()
        .par_chunks_exact_mut(stride)
        .enumerate()
        .for_each(|(y, dst_row)| {
            let src_y = y as f64 * y_ratio;
            let y_frac = src_y - src_y.floor();
            let y1 = src_y as usize;
            let y2 = (y1 + 1).min(src_h - 1);

            for x in 0..dst_width as usize {
                let src_x = x as f64 * x_ratio;
                let x_frac = src_x - src_x.floor();
                let x1 = src_x as usize;
                let x2 = (x1 + 1).min(src_w - 1);

                let tl = (y1 * src_w + x1) * BYTES_PER_PIXEL;
                let tr = (y1 * src_w + x2) * BYTES_PER_PIXEL;
                let bl = (y2 * src_w + x1) * BYTES_PER_PIXEL;
                let br = (y2 * src_w + x2) * BYTES_PER_PIXEL;
                let out = x * BYTES_PER_PIXEL;

                for c in 0..BYTES_PER_PIXEL {
                    let tl = src_px[tl + c] as f64;
                    let tr = src_px[tr + c] as f64;
                    let bl = src_px[bl + c] as f64;
                    let br = src_px[br + c] as f64;

                    let top = tl + (tr - tl) * x_frac;
                    let bottom = bl + (br - bl) * x_frac;
                    let value = (top + (bottom - top) * y_frac).round();
                    dst_row[out + c] = value.clamp(0.0, 255.0) as u8;
                }
            }
        });

    Ok(dst)
}

/// Bound a raster to `max_dimension` on its longer edge.
///
/// Already-small rasters pass through unchanged (identity, no copy). Larger
/// ones are scaled by `max_dimension / max(width, height)` with target
/// dimensions floored, minimum 1×1.
pub fn downsample(src: Raster, max_dimension: u32) -> Result<Raster, RasterError> {
    if src.max_dimension() <= max_dimension {
        return Ok(src);
    }

    let scale = max_dimension as f64 / src.max_dimension() as f64;
    let dst_w = ((src.width() as f64 * scale).floor() as u32).max(1);
    let dst_h = ((src.height() as f64 * scale).floor() as u32).max(1);
    resample_bilinear(&src, dst_w, dst_h)
}
