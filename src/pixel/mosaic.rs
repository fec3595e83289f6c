//! Region-based mosaic pixelation.
//!
//! Each region (a brush dab, already resolved to a rectangle by the caller)
//! is clamped to the raster, tiled into `block_size` cells, and every cell
//! is flattened to its per-channel arithmetic mean. Cells are processed in
//! two passes — accumulate, then fill — so a fill never reads
//! partially-overwritten data.
//!
//! Regions are applied in caller order against the *current* pixel values:
//! overlapping dabs compound ("wet paint") rather than re-averaging the
//! original image. Tests pin this down.

use crate::raster::{BYTES_PER_PIXEL, Raster, Region};
use serde::{Deserialize, Serialize};

/// Mosaic cell edge length from the block-size slider, clamped to 5..=50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BlockSize(u32);

impl BlockSize {
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 50;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BlockSize {
    fn default() -> Self {
        Self(15)
    }
}

impl From<u32> for BlockSize {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<BlockSize> for u32 {
    fn from(size: BlockSize) -> Self {
        size.0
    }
}

/// Pixelate the listed regions of a raster.
///
/// Consumes the raster and returns it with the regions flattened; dimensions
/// are unchanged. Taking ownership pins the aliasing contract: the input
/// buffer cannot be read after the call, only the returned raster is
/// authoritative.
pub fn apply_mosaic(mut raster: Raster, regions: &[Region], block_size: BlockSize) -> Raster {
    let width = raster.width() as usize;
    let height = raster.height() as usize;
    let block = block_size.value() as usize;
    let pixels = raster.pixels_mut();

    for region in regions {
        let Some((x0, y0, x1, y1)) = clamp_region(region, width, height) else {
            continue;
        };

        for cell_y in (y0..y1).step_by(block) {
            let cell_h = block.min(y1 - cell_y);
            for cell_x in (x0..x1).step_by(block) {
                let cell_w = block.min(x1 - cell_x);
                flatten_cell(pixels, width, cell_x, cell_y, cell_w, cell_h);
            }
        }
    }

    raster
}

/// Clamp a region to pixel bounds: `floor` on the near edge, `ceil` on the
/// far edge, both limited to the plane. Returns `None` for regions that end
/// up empty (fully outside, degenerate, or non-finite).
fn clamp_region(region: &Region, width: usize, height: usize) -> Option<(usize, usize, usize, usize)> {
    if !(region.x.is_finite()
        && region.y.is_finite()
        && region.width.is_finite()
        && region.height.is_finite())
    {
        return None;
    }

    let x0 = region.x.floor().max(0.0) as usize;
    let y0 = region.y.floor().max(0.0) as usize;
    let x1 = (region.x + region.width).ceil().clamp(0.0, width as f64) as usize;
    let y1 = (region.y + region.height).ceil().clamp(0.0, height as f64) as usize;

    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

/// Average one cell, then overwrite it with the mean (flat fill).
fn flatten_cell(
    pixels: &mut [u8],
    width: usize,
    cell_x: usize,
    cell_y: usize,
    cell_w: usize,
    cell_h: usize,
) {
    let mut sum = [0u64; BYTES_PER_PIXEL];
    for y in cell_y..cell_y + cell_h {
        let start = (y * width + cell_x) * BYTES_PER_PIXEL;
        for px in pixels[start..start + cell_w * BYTES_PER_PIXEL].chunks_exact(BYTES_PER_PIXEL) {
            for c in 0..BYTES_PER_PIXEL {
                sum[c] += px[c] as u64;
            }
        }
    }

    let count = (cell_w * cell_h) as u64;
    let mut mean = [0u8; BYTES_PER_PIXEL];
    for c in 0..BYTES_PER_PIXEL {
        mean[c] = ((sum[c] + count / 2) / count) as u8;
    }

    for y in cell_y..cell_y + cell_h {
        let start = (y * width + cell_x) * BYTES_PER_PIXEL;
        for px in
            pixels[start..start + cell_w * BYTES_PER_PIXEL].chunks_exact_mut(BYTES_PER_PIXEL)
        {
            px.copy_from_slice(&mean);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_raster(width: u32, height: u32) -> Raster {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x * 10) as u8, (y * 10) as u8, 0, 255]);
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    fn full_region(raster: &Raster) -> Region {
        Region::new(0.0, 0.0, raster.width() as f64, raster.height() as f64)
    }

    // =========================================================================
    // BlockSize
    // =========================================================================

    #[test]
    fn block_size_clamps_to_slider_range() {
        assert_eq!(BlockSize::new(1).value(), 5);
        assert_eq!(BlockSize::new(15).value(), 15);
        assert_eq!(BlockSize::new(500).value(), 50);
    }

    // =========================================================================
    // averaging
    // =========================================================================

    #[test]
    fn single_block_covering_raster_averages_everything() {
        // 10x10 with blockSize 10: one cell, every pixel becomes the mean.
        let src = gradient_raster(10, 10);
        let sums: Vec<u64> = (0..4)
            .map(|c| src.pixels().iter().skip(c).step_by(4).map(|&b| b as u64).sum())
            .collect();
        let expected: Vec<u8> = sums.iter().map(|&s| ((s + 50) / 100) as u8).collect();

        let region = full_region(&src);
        let out = apply_mosaic(src, &[region], BlockSize::new(10));
        for px in out.pixels().chunks_exact(4) {
            assert_eq!(px, expected.as_slice());
        }
    }

    #[test]
    fn mosaic_is_idempotent_on_flat_cells() {
        let src = gradient_raster(20, 20);
        let region = full_region(&src);
        let once = apply_mosaic(src, &[region], BlockSize::new(5));
        let twice = apply_mosaic(once.clone(), &[region], BlockSize::new(5));
        assert_eq!(once, twice);
    }

    #[test]
    fn last_cells_may_be_smaller() {
        // 12 wide with blockSize 5 → cells of width 5, 5, 2. The 2-wide
        // remainder must be averaged over its own pixels only.
        let mut pixels = vec![0u8; 12 * 4];
        for x in 10..12 {
            pixels[x * 4] = 200;
        }
        let src = Raster::new(12, 1, pixels).unwrap();
        let out = apply_mosaic(src, &[Region::new(0.0, 0.0, 12.0, 1.0)], BlockSize::new(5));
        let red: Vec<u8> = out.pixels().chunks_exact(4).map(|p| p[0]).collect();
        assert_eq!(red, vec![0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 200, 200]);
    }

    #[test]
    fn fractional_region_expands_to_covered_pixels() {
        // x 1.4..2.6 covers pixels 1 and 2 after floor/ceil.
        let mut pixels = vec![0u8; 4 * 4];
        pixels[4] = 80; // pixel 1
        pixels[8] = 40; // pixel 2
        let src = Raster::new(4, 1, pixels).unwrap();
        let out = apply_mosaic(src, &[Region::new(1.4, 0.0, 1.2, 1.0)], BlockSize::new(5));
        let red: Vec<u8> = out.pixels().chunks_exact(4).map(|p| p[0]).collect();
        assert_eq!(red, vec![0, 60, 60, 0]);
    }

    #[test]
    fn region_outside_raster_contributes_nothing() {
        let src = gradient_raster(8, 8);
        let regions = [
            Region::new(-100.0, -100.0, 50.0, 50.0),
            Region::new(1e9, 1e9, 10.0, 10.0),
            Region::new(4.0, 4.0, -2.0, -2.0),
            Region::new(f64::NAN, 0.0, 4.0, 4.0),
        ];
        let out = apply_mosaic(src.clone(), &regions, BlockSize::default());
        assert_eq!(out, src);
    }

    #[test]
    fn region_overhanging_edge_is_clamped() {
        let src = gradient_raster(6, 6);
        let out = apply_mosaic(
            src,
            &[Region::new(3.0, 3.0, 100.0, 100.0)],
            BlockSize::new(50),
        );
        // Pixels left of / above the region are untouched gradient values.
        assert_eq!(&out.pixels()[0..4], &[0, 0, 0, 255]);
        // The clamped 3x3 corner cell is flat.
        let corner = out.offset(3, 3);
        let corner_px = out.pixels()[corner..corner + 4].to_vec();
        let other = out.offset(5, 5);
        assert_eq!(out.pixels()[other..other + 4], corner_px[..]);
    }

    // =========================================================================
    // overlap semantics
    // =========================================================================

    #[test]
    fn overlapping_regions_compound() {
        // Second dab's cells are computed against the already-mosaicked
        // values, not the original image ("wet paint").
        let src = gradient_raster(10, 10);
        let a = Region::new(0.0, 0.0, 10.0, 10.0);
        let b = Region::new(2.0, 2.0, 6.0, 6.0);

        let sequential = apply_mosaic(src.clone(), &[a, b], BlockSize::new(5));

        let after_a = apply_mosaic(src, &[a], BlockSize::new(5));
        let compounded = apply_mosaic(after_a, &[b], BlockSize::new(5));
        assert_eq!(sequential, compounded);
    }

    #[test]
    fn order_of_overlapping_regions_matters() {
        let src = gradient_raster(10, 10);
        let a = Region::new(0.0, 0.0, 7.0, 7.0);
        let b = Region::new(3.0, 3.0, 7.0, 7.0);
        let ab = apply_mosaic(src.clone(), &[a, b], BlockSize::new(5));
        let ba = apply_mosaic(src, &[b, a], BlockSize::new(5));
        assert_ne!(ab, ba);
    }

    #[test]
    fn dimensions_are_preserved() {
        let src = gradient_raster(13, 9);
        let out = apply_mosaic(
            src,
            &[Region::new(1.0, 1.0, 5.0, 5.0)],
            BlockSize::default(),
        );
        assert_eq!((out.width(), out.height()), (13, 9));
    }
}
