//! Blurred background synthesis.
//!
//! Builds the backdrop behind a framed photo: the photo itself, scaled to
//! cover the export canvas with 10% overscan, blurred in multiple passes,
//! then center-cropped to the exact canvas size. The overscan keeps the
//! blur's clamped-edge smear outside the visible crop.
//!
//! This is the most expensive operation in the engine (an upscale to larger
//! than the destination, then several full-plane blur passes), which is why
//! it is the flagship case for dispatching work off the interactive thread.

use super::blur::{BlurIntensity, BlurPlan, box_blur};
use super::calculations::{cover_scale, scaled_dimensions};
use super::resample::resample_bilinear;
use crate::raster::{BYTES_PER_PIXEL, Raster, RasterError};

/// Overscan applied on top of the cover-fit scale so blurred edges never
/// reveal a hard border inside the crop.
pub const BACKGROUND_OVERSCAN: f64 = 1.1;

/// Synthesize a blurred backdrop sized exactly `canvas_width` × `canvas_height`.
///
/// Steps: cover-fit scale ×1.1 → bilinear upscale → `BlurPlan` passes of
/// box blur → centered crop. The crop clamps source coordinates to the
/// scaled raster, so the output is fully populated even at extreme aspect
/// ratios.
pub fn synthesize_background(
    src: &Raster,
    canvas_width: u32,
    canvas_height: u32,
    intensity: BlurIntensity,
) -> Result<Raster, RasterError> {
    let mut out = Raster::blank(canvas_width, canvas_height)?;

    let scale = cover_scale(
        (src.width(), src.height()),
        (canvas_width, canvas_height),
    ) * BACKGROUND_OVERSCAN;
    let (scaled_w, scaled_h) = scaled_dimensions((src.width(), src.height()), scale);
    let scaled = resample_bilinear(src, scaled_w, scaled_h)?;

    let plan = BlurPlan::for_intensity(intensity);
    let mut blurred = scaled;
    for _ in 0..plan.passes {
        blurred = box_blur(&blurred, plan.radius);
    }

    crop_centered(&blurred, &mut out);
    Ok(out)
}

/// Copy the centered `dst`-sized window out of `src`, clamping coordinates
/// to the source plane.
fn crop_centered(src: &Raster, dst: &mut Raster) {
    let src_w = src.width() as i64;
    let src_h = src.height() as i64;
    let dst_w = dst.width() as i64;
    let dst_h = dst.height() as i64;

    // Floor division keeps the window centered even if the scaled raster
    // ever comes out smaller than the canvas.
    let offset_x = (src_w - dst_w).div_euclid(2);
    let offset_y = (src_h - dst_h).div_euclid(2);

    let src_px = src.pixels();
    let stride = dst.stride();
    let dst_px = dst.pixels_mut();

    for y in 0..dst_h {
        let src_y = (y + offset_y).clamp(0, src_h - 1);
        let row = y as usize * stride;
        for x in 0..dst_w {
            let src_x = (x + offset_x).clamp(0, src_w - 1);
            let from = (src_y * src_w + src_x) as usize * BYTES_PER_PIXEL;
            let to = row + x as usize * BYTES_PER_PIXEL;
            dst_px[to..to + BYTES_PER_PIXEL]
                .copy_from_slice(&src_px[from..from + BYTES_PER_PIXEL]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_matches_canvas_exactly() {
        let src = Raster::filled(123, 77, [10, 20, 30, 255]).unwrap();
        for (cw, ch) in [(50, 50), (200, 100), (64, 256), (1, 1)] {
            let out =
                synthesize_background(&src, cw, ch, BlurIntensity::default()).unwrap();
            assert_eq!((out.width(), out.height()), (cw, ch));
        }
    }

    #[test]
    fn uniform_source_yields_uniform_background() {
        // Resampling and blurring a flat color are both identities on the
        // values, so the cropped result must be flat too.
        let src = Raster::filled(40, 30, [200, 150, 100, 255]).unwrap();
        let out = synthesize_background(&src, 60, 60, BlurIntensity::new(30)).unwrap();
        for px in out.pixels().chunks_exact(4) {
            assert_eq!(px, [200, 150, 100, 255]);
        }
    }

    #[test]
    fn zero_canvas_is_a_contract_error() {
        let src = Raster::filled(10, 10, [0, 0, 0, 255]).unwrap();
        assert!(synthesize_background(&src, 0, 10, BlurIntensity::default()).is_err());
    }

    #[test]
    fn deterministic_across_runs() {
        let pixels: Vec<u8> = (0..24 * 18 * 4).map(|i| (i * 11 % 253) as u8).collect();
        let src = Raster::new(24, 18, pixels).unwrap();
        let a = synthesize_background(&src, 31, 29, BlurIntensity::new(25)).unwrap();
        let b = synthesize_background(&src, 31, 29, BlurIntensity::new(25)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn crop_takes_the_center_of_the_scaled_plane() {
        // A source whose left half is black and right half is white, wide
        // canvas: the crop center must land on the seam, so both colors
        // survive into the output.
        let mut src = Raster::blank(40, 40).unwrap();
        for y in 0..40usize {
            for x in 20..40usize {
                let i = (y * 40 + x) * 4;
                src.pixels_mut()[i..i + 4].copy_from_slice(&[255, 255, 255, 255]);
            }
        }
        let out = synthesize_background(&src, 20, 10, BlurIntensity::new(5)).unwrap();
        let first = out.pixels()[0];
        let last = out.pixels()[out.pixels().len() - 4];
        assert!(first < 128, "left edge should stay dark, got {first}");
        assert!(last > 128, "right edge should stay bright, got {last}");
    }
}
