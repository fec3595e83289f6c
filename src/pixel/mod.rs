//! Pixel processing — pure Rust, operating on raw RGBA8 planes.
//!
//! | Operation | Module / function |
//! |---|---|
//! | **Bilinear resample** | [`resample::resample_bilinear`], [`resample::downsample`] |
//! | **Separable box blur** | [`blur::box_blur`] (two 1-D sliding-window passes) |
//! | **Background synthesis** | [`background::synthesize_background`] (cover-fit upscale → blur → crop) |
//! | **Mosaic pixelation** | [`mosaic::apply_mosaic`] (region-clamped block averaging) |
//! | **Fit math** | [`calculations`] (pure, unit testable) |
//!
//! Every function here is deterministic: identical inputs produce
//! byte-identical outputs across invocations. Rayon parallelism is confined
//! to loops whose iterations are independent, so it never affects results.

pub mod background;
pub mod blur;
pub mod calculations;
pub mod mosaic;
pub mod resample;

pub use background::synthesize_background;
pub use blur::{BlurIntensity, BlurPlan, box_blur};
pub use mosaic::{BlockSize, apply_mosaic};
pub use resample::{downsample, resample_bilinear};
