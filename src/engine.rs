//! The engine facade: one entry point, worker-backed when possible.
//!
//! [`Engine::new`] spawns the processing worker and routes jobs through it;
//! if the thread cannot be created, the engine degrades to running the same
//! algorithm functions on the caller's thread. Both paths execute
//! [`run_job`], so output is pixel-identical either way — the fallback
//! trades responsiveness, never correctness.
//!
//! The convenience methods ([`Engine::downsample`] and friends) submit,
//! block, and unwrap the response. Callers that need to stay interactive
//! submit through [`Engine::worker`] and poll the ticket instead.

use crate::job::{Job, JobError, JobResponse, run_job};
use crate::pixel::blur::BlurIntensity;
use crate::pixel::mosaic::BlockSize;
use crate::raster::{Raster, RasterError, Region};
use crate::worker::{ImageWorker, WorkerError};
use log::warn;
use std::sync::mpsc::SendError;
use thiserror::Error;

/// Longest input edge accepted before downsampling, in pixels (8K UHD).
pub const MAX_INPUT_DIMENSION: u32 = 7680;

/// Longest export-canvas edge the engine will synthesize for.
pub const MAX_CANVAS_DIMENSION: u32 = 4096;

/// Engine limits. The defaults match the editor's canvas and input caps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Inputs whose longer edge exceeds this are downsampled to it.
    pub max_input_dimension: u32,
    /// Canvas requests beyond this edge length are rejected.
    pub max_canvas_dimension: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_dimension: MAX_INPUT_DIMENSION,
            max_canvas_dimension: MAX_CANVAS_DIMENSION,
        }
    }
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Raster(#[from] RasterError),
    #[error(transparent)]
    Job(#[from] JobError),
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("canvas {width}x{height} exceeds the configured maximum edge {max}")]
    CanvasTooLarge { width: u32, height: u32, max: u32 },
}

enum Mode {
    Worker(ImageWorker),
    Sync,
}

/// The raster-processing engine.
pub struct Engine {
    config: EngineConfig,
    mode: Mode,
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mode = match ImageWorker::spawn() {
            Ok(worker) => Mode::Worker(worker),
            Err(e) => {
                warn!("worker unavailable, falling back to synchronous processing: {e}");
                Mode::Sync
            }
        };
        Self { config, mode }
    }

    /// Build an engine that always processes on the caller's thread.
    pub fn synchronous(config: EngineConfig) -> Self {
        Self {
            config,
            mode: Mode::Sync,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Whether jobs run on the dedicated worker thread.
    pub fn is_threaded(&self) -> bool {
        matches!(self.mode, Mode::Worker(_))
    }

    /// The underlying worker, for callers that want to submit a job and
    /// poll its ticket instead of blocking. `None` in fallback mode.
    pub fn worker(&self) -> Option<&ImageWorker> {
        match &self.mode {
            Mode::Worker(worker) => Some(worker),
            Mode::Sync => None,
        }
    }

    /// Run a job to completion, on the worker thread when available.
    ///
    /// A job the worker never accepted (its thread is gone) runs on the
    /// caller's thread instead — the channel hands the envelope back, so no
    /// clone is needed and the job still executes exactly once. A job that
    /// was accepted but whose reply was lost resolves to an `error`
    /// response; the engine never retries.
    pub fn run(&self, job: Job) -> JobResponse {
        match &self.mode {
            Mode::Worker(worker) => match worker.submit(job) {
                Ok(ticket) => ticket.wait().unwrap_or_else(|e| JobResponse::Error {
                    message: e.to_string(),
                }),
                Err(SendError(job)) => {
                    warn!("worker rejected {} job, running synchronously", job.kind());
                    run_job(job)
                }
            },
            Mode::Sync => run_job(job),
        }
    }

    /// Bound a decoded input to the configured maximum dimension.
    pub fn downsample(&self, raster: Raster) -> Result<Raster, EngineError> {
        self.downsample_to(raster, self.config.max_input_dimension)
    }

    /// Bound a raster to an explicit maximum dimension.
    pub fn downsample_to(
        &self,
        raster: Raster,
        max_dimension: u32,
    ) -> Result<Raster, EngineError> {
        let response = self.run(Job::Downsample {
            raster,
            max_dimension,
        });
        Ok(response.into_raster()?)
    }

    /// Synthesize the blurred backdrop for an export canvas.
    pub fn synthesize_background(
        &self,
        raster: Raster,
        canvas_width: u32,
        canvas_height: u32,
        blur_intensity: BlurIntensity,
    ) -> Result<Raster, EngineError> {
        let max = self.config.max_canvas_dimension;
        if canvas_width > max || canvas_height > max {
            return Err(EngineError::CanvasTooLarge {
                width: canvas_width,
                height: canvas_height,
                max,
            });
        }
        let response = self.run(Job::SynthesizeBackground {
            raster,
            canvas_width,
            canvas_height,
            blur_intensity,
        });
        Ok(response.into_raster()?)
    }

    /// Pixelate brush-dab regions of a raster.
    pub fn apply_mosaic(
        &self,
        raster: Raster,
        regions: Vec<Region>,
        block_size: BlockSize,
    ) -> Result<Raster, EngineError> {
        let response = self.run(Job::Mosaic {
            raster,
            regions,
            block_size,
        });
        Ok(response.into_raster()?)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
