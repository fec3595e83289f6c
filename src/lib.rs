//! # Framepress
//!
//! The raster pixel-processing engine behind a photo-framing editor: fit a
//! photo into a fixed-aspect export frame, synthesize a blurred backdrop
//! behind it, and pixelate brush-painted regions — all off the interactive
//! thread.
//!
//! The surrounding editor (decoding, canvas compositing, brush capture,
//! undo, export encoding) is a collaborator, not part of this crate. It
//! hands in decoded [`Raster`]s and resolved [`Region`] lists, and it gets
//! back rasters of exactly the dimensions it asked for.
//!
//! # Architecture: Jobs Through a Worker
//!
//! ```text
//! caller ── Job ──▶ Engine ──▶ ImageWorker (thread) ──▶ run_job ──▶ pixel::*
//!    ▲                                                      │
//!    └────────────────── JobResponse (ticket) ◀─────────────┘
//! ```
//!
//! Everything the engine can do is a [`Job`]; every job resolves to exactly
//! one [`JobResponse`]. The worker thread and the no-worker fallback run
//! the same [`run_job`] function, so both paths produce byte-identical
//! pixels — availability changes latency, never output.
//!
//! Rasters are *moved* through the pipeline, never copied: a `Job` owns its
//! pixel buffer, the response owns the result. For 7680-pixel-wide inputs
//! this halves peak memory against a copying design.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`raster`] | The RGBA8 plane type, regions, `image` crate interop |
//! | [`pixel`] | The algorithms: resample, box blur, background synthesis, mosaic |
//! | [`brush`] | Brush settings and stroke → region expansion |
//! | [`job`] | Job/response protocol types and the synchronous executor |
//! | [`worker`] | The long-lived worker thread and per-request tickets |
//! | [`engine`] | Facade: worker when available, synchronous fallback otherwise |
//!
//! # Design Decisions
//!
//! ## Per-Request Correlation
//!
//! Responses are matched to requests by a per-submission [`worker::JobId`]
//! and a dedicated reply channel, not by response kind. Two overlapping
//! requests of the same kind each get their own answer; nothing is silently
//! overwritten.
//!
//! ## Determinism
//!
//! All four algorithms are pure functions of their inputs. Parallelism
//! (rayon, over independent rows) never reorders observable writes, so
//! repeated runs are byte-identical — a property the test suite pins.
//!
//! ## Clamped Settings at the Boundary
//!
//! Slider-backed values ([`BlurIntensity`], [`BlockSize`],
//! [`brush::BrushSize`]) clamp to their documented ranges on construction
//! and on deserialization, so out-of-range values cannot reach the
//! algorithms.

pub mod brush;
pub mod engine;
pub mod job;
pub mod pixel;
pub mod raster;
pub mod worker;

pub use brush::{BrushSettings, BrushStroke, stroke_regions};
pub use engine::{Engine, EngineConfig, EngineError};
pub use job::{Job, JobError, JobResponse, run_job};
pub use pixel::{
    BlockSize, BlurIntensity, BlurPlan, apply_mosaic, box_blur, downsample, resample_bilinear,
    synthesize_background,
};
pub use raster::{Raster, RasterError, Region};
pub use worker::{ImageWorker, JobTicket, WorkerError};
