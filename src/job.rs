//! The job protocol: typed requests in, typed responses out.
//!
//! [`Job`] and [`JobResponse`] are the messages that cross the worker
//! boundary. Their serde representation is tagged with a `kind` field
//! (`downsample` → `downsampleResult`, and so on, with `error` for
//! failures), which is also the engine's wire contract with any
//! out-of-process caller.
//!
//! [`run_job`] executes a job synchronously. It is the single execution
//! path: the worker thread calls it, and the no-worker fallback calls it on
//! the caller's thread, which is what guarantees pixel-identical output on
//! both paths.
//!
//! Jobs own their raster. Moving a `Job` into the engine transfers the
//! pixel buffer; nothing is copied on the way in or out.

use crate::pixel::background::synthesize_background;
use crate::pixel::blur::BlurIntensity;
use crate::pixel::mosaic::{BlockSize, apply_mosaic};
use crate::pixel::resample::downsample;
use crate::raster::{Raster, Region};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A processing request. One raster in, one raster out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Job {
    /// Bound an oversized raster to `max_dimension` on its longer edge.
    #[serde(rename_all = "camelCase")]
    Downsample { raster: Raster, max_dimension: u32 },
    /// Build the blurred cover-fit backdrop for an export canvas.
    #[serde(rename_all = "camelCase")]
    SynthesizeBackground {
        raster: Raster,
        canvas_width: u32,
        canvas_height: u32,
        blur_intensity: BlurIntensity,
    },
    /// Pixelate brush-dab regions.
    #[serde(rename_all = "camelCase")]
    Mosaic {
        raster: Raster,
        regions: Vec<Region>,
        block_size: BlockSize,
    },
}

impl Job {
    /// The request's `kind` tag, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Job::Downsample { .. } => "downsample",
            Job::SynthesizeBackground { .. } => "synthesizeBackground",
            Job::Mosaic { .. } => "mosaic",
        }
    }
}

/// The reply to a [`Job`]: the result kind matching the request kind, or
/// `error` with a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum JobResponse {
    DownsampleResult { raster: Raster },
    SynthesizeBackgroundResult { raster: Raster },
    MosaicResult { raster: Raster },
    Error { message: String },
}

impl JobResponse {
    /// The response's `kind` tag, as it appears on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            JobResponse::DownsampleResult { .. } => "downsampleResult",
            JobResponse::SynthesizeBackgroundResult { .. } => "synthesizeBackgroundResult",
            JobResponse::MosaicResult { .. } => "mosaicResult",
            JobResponse::Error { .. } => "error",
        }
    }

    /// Extract the produced raster, converting an `error` response into a
    /// typed failure.
    pub fn into_raster(self) -> Result<Raster, JobError> {
        match self {
            JobResponse::DownsampleResult { raster }
            | JobResponse::SynthesizeBackgroundResult { raster }
            | JobResponse::MosaicResult { raster } => Ok(raster),
            JobResponse::Error { message } => Err(JobError::Failed(message)),
        }
    }
}

/// An algorithmic or validation failure reported by the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    #[error("processing failed: {0}")]
    Failed(String),
}

/// Execute a job to completion on the current thread.
///
/// Failures come back as [`JobResponse::Error`] — never as a panic, so
/// nothing ever unwinds across the worker boundary.
pub fn run_job(job: Job) -> JobResponse {
    match job {
        Job::Downsample {
            raster,
            max_dimension,
        } => match downsample(raster, max_dimension) {
            Ok(raster) => JobResponse::DownsampleResult { raster },
            Err(e) => JobResponse::Error {
                message: e.to_string(),
            },
        },
        Job::SynthesizeBackground {
            raster,
            canvas_width,
            canvas_height,
            blur_intensity,
        } => match synthesize_background(&raster, canvas_width, canvas_height, blur_intensity) {
            Ok(raster) => JobResponse::SynthesizeBackgroundResult { raster },
            Err(e) => JobResponse::Error {
                message: e.to_string(),
            },
        },
        Job::Mosaic {
            raster,
            regions,
            block_size,
        } => JobResponse::MosaicResult {
            raster: apply_mosaic(raster, &regions, block_size),
        },
    }
}
