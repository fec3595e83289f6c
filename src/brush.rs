//! Brush-stroke geometry for the mosaic tool.
//!
//! The interactive layer samples pointer positions into [`BrushStroke`]s;
//! this module turns them into the rectangle list the pixelator consumes —
//! one square region per sampled point, centered on it, with the stroke's
//! brush size as side length. Coordinate-space conversion (screen → raster)
//! happens before the points get here.

use crate::pixel::mosaic::BlockSize;
use crate::raster::Region;
use serde::{Deserialize, Serialize};

/// Brush diameter from the brush-size slider, clamped to 10..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct BrushSize(u32);

impl BrushSize {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 100;

    pub fn new(value: u32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BrushSize {
    fn default() -> Self {
        Self(30)
    }
}

impl From<u32> for BrushSize {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<BrushSize> for u32 {
    fn from(size: BrushSize) -> Self {
        size.0
    }
}

/// The mosaic brush controls, consumed read-only by the engine side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BrushSettings {
    pub brush_size: BrushSize,
    pub block_size: BlockSize,
}

/// One sampled pointer position in raster coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrushPoint {
    pub x: f64,
    pub y: f64,
}

/// A completed freehand stroke: sampled points plus the brush size that was
/// active when it was drawn (strokes keep their size even if the slider
/// moves afterwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrushStroke {
    pub points: Vec<BrushPoint>,
    pub size: f64,
}

impl BrushStroke {
    pub fn new(size: BrushSize) -> Self {
        Self {
            points: Vec::new(),
            size: size.value() as f64,
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.points.push(BrushPoint { x, y });
    }
}

/// Expand strokes into the pixelator's region list: one square per sampled
/// point, centered on the point, side length = the stroke's size. Order
/// follows drawing order, which the pixelator's compounding semantics
/// depend on.
pub fn stroke_regions(strokes: &[BrushStroke]) -> Vec<Region> {
    let mut regions = Vec::new();
    for stroke in strokes {
        let half = stroke.size / 2.0;
        for point in &stroke.points {
            regions.push(Region::new(
                point.x - half,
                point.y - half,
                stroke.size,
                stroke.size,
            ));
        }
    }
    regions
}
