//! The raster buffer: the common currency between all pixel operations.
//!
//! A [`Raster`] is a width × height RGBA8 plane, row-major, no padding.
//! Its single invariant — `pixels.len() == width * height * 4` — is enforced
//! at every construction site, so the algorithm modules can index without
//! re-checking. A raster that fails validation is a contract error
//! ([`RasterError`]), never a silent no-op.
//!
//! Ownership of the pixel plane moves with the value: sending a `Raster`
//! across the worker boundary transfers the buffer rather than copying it,
//! which is a hard requirement for images near the maximum input dimension.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("raster has zero-area dimensions ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("pixel buffer length {actual} does not match {width}x{height} RGBA8 ({expected})")]
    LengthMismatch {
        width: u32,
        height: u32,
        expected: u64,
        actual: usize,
    },
    #[error("raster {width}x{height} exceeds the addressable pixel plane")]
    DimensionOverflow { width: u32, height: u32 },
}

/// An owned RGBA8 pixel grid with explicit dimensions.
///
/// Fields are private so the length invariant cannot be broken after
/// construction; algorithms read and write through the slice accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RasterParts")]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

/// Shadow struct for deserialization — routes wire data through the same
/// validation as [`Raster::new`].
#[derive(Deserialize)]
struct RasterParts {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl TryFrom<RasterParts> for Raster {
    type Error = RasterError;

    fn try_from(parts: RasterParts) -> Result<Self, RasterError> {
        Raster::new(parts.width, parts.height, parts.pixels)
    }
}

impl Raster {
    /// Wrap an existing pixel buffer, validating the length invariant.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        let expected = Self::byte_len(width, height)?;
        if pixels.len() as u64 != expected {
            return Err(RasterError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Allocate a zeroed (transparent black) raster.
    pub fn blank(width: u32, height: u32) -> Result<Self, RasterError> {
        let len = Self::byte_len(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len as usize],
        })
    }

    /// Allocate a raster filled with a single RGBA color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, RasterError> {
        let mut raster = Self::blank(width, height)?;
        for px in raster.pixels.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
        Ok(raster)
    }

    /// Validated byte length for the given dimensions, rejecting zero-area
    /// planes and sizes that cannot be addressed on this platform.
    fn byte_len(width: u32, height: u32) -> Result<u64, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimension { width, height });
        }
        (width as u64)
            .checked_mul(height as u64)
            .and_then(|px| px.checked_mul(BYTES_PER_PIXEL as u64))
            .filter(|&len| usize::try_from(len).is_ok())
            .ok_or(RasterError::DimensionOverflow { width, height })
    }

    /// Zeroed raster with this raster's dimensions. Infallible: the
    /// dimensions were validated when `self` was built.
    pub(crate) fn blank_like(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            pixels: vec![0; self.pixels.len()],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The longer edge, the quantity bounded by downsampling.
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Row length in bytes.
    pub fn stride(&self) -> usize {
        self.width as usize * BYTES_PER_PIXEL
    }

    /// Byte offset of the pixel at (x, y). Callers stay in bounds; the
    /// algorithms only produce clamped coordinates.
    #[inline]
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL
    }
}

// ---------------------------------------------------------------------------
// image crate interop
//
// Decoding is owned by the UI collaborator; these conversions are the seam
// through which decoded pixels enter the engine and results leave it.
// ---------------------------------------------------------------------------

impl TryFrom<RgbaImage> for Raster {
    type Error = RasterError;

    fn try_from(img: RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Raster::new(width, height, img.into_raw())
    }
}

impl From<Raster> for RgbaImage {
    fn from(raster: Raster) -> Self {
        // Cannot fail: the Raster invariant is exactly from_raw's requirement.
        RgbaImage::from_raw(raster.width, raster.height, raster.pixels)
            .expect("raster length invariant")
    }
}

/// An axis-aligned rectangle in raster coordinate space, targeted by mosaic
/// pixelation. May be fractional and may extend outside the raster bounds;
/// the pixelator clamps it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Region {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_accepts_matching_buffer() {
        let raster = Raster::new(2, 3, vec![0; 24]).unwrap();
        assert_eq!(raster.width(), 2);
        assert_eq!(raster.height(), 3);
        assert_eq!(raster.pixels().len(), 24);
    }

    #[test]
    fn new_rejects_length_mismatch() {
        let result = Raster::new(2, 2, vec![0; 15]);
        assert!(matches!(
            result,
            Err(RasterError::LengthMismatch {
                expected: 16,
                actual: 15,
                ..
            })
        ));
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(matches!(
            Raster::new(0, 10, Vec::new()),
            Err(RasterError::ZeroDimension { .. })
        ));
        assert!(matches!(
            Raster::blank(10, 0),
            Err(RasterError::ZeroDimension { .. })
        ));
    }

    #[test]
    fn blank_is_transparent_black() {
        let raster = Raster::blank(4, 4).unwrap();
        assert!(raster.pixels().iter().all(|&b| b == 0));
    }

    #[test]
    fn filled_repeats_color() {
        let raster = Raster::filled(3, 2, [255, 0, 0, 255]).unwrap();
        for px in raster.pixels().chunks_exact(4) {
            assert_eq!(px, [255, 0, 0, 255]);
        }
    }

    #[test]
    fn max_dimension_is_longer_edge() {
        assert_eq!(Raster::blank(800, 600).unwrap().max_dimension(), 800);
        assert_eq!(Raster::blank(600, 800).unwrap().max_dimension(), 800);
    }

    #[test]
    fn image_roundtrip_preserves_pixels() {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, image::Rgba([1, 2, 3, 4]));
        img.put_pixel(1, 1, image::Rgba([5, 6, 7, 8]));

        let raster = Raster::try_from(img.clone()).unwrap();
        assert_eq!(raster.pixels()[0..4], [1, 2, 3, 4]);

        let back = RgbaImage::from(raster);
        assert_eq!(back, img);
    }

    #[test]
    fn zero_area_image_is_rejected() {
        let img = RgbaImage::new(0, 0);
        assert!(Raster::try_from(img).is_err());
    }

    #[test]
    fn deserialization_validates_invariant() {
        let good = r#"{"width":1,"height":1,"pixels":[1,2,3,4]}"#;
        assert!(serde_json::from_str::<Raster>(good).is_ok());

        let bad = r#"{"width":2,"height":2,"pixels":[1,2,3,4]}"#;
        assert!(serde_json::from_str::<Raster>(bad).is_err());
    }
}
