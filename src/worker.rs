//! The processing worker: one long-lived thread that runs jobs off the
//! interactive path.
//!
//! [`ImageWorker::spawn`] starts the thread; [`ImageWorker::submit`] moves a
//! [`Job`] to it and hands back a [`JobTicket`]. Every submission gets a
//! fresh [`JobId`] and its own reply channel, so responses are correlated
//! per request — two in-flight jobs of the same kind resolve independently,
//! each to its own ticket.
//!
//! The worker is an explicit resource: [`ImageWorker::shutdown`] (or drop)
//! closes the job channel and joins the thread. Jobs already queued are
//! still processed on the way out; a ticket whose worker died observes
//! [`WorkerError::Disconnected`] instead of hanging forever.
//!
//! There is no cancellation and no timeout: a submitted job runs to
//! completion exactly once, and [`JobTicket::try_wait`] gives interactive
//! callers a non-blocking poll instead.

use crate::job::{Job, JobResponse, run_job};
use log::{debug, warn};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, SendError, Sender, TryRecvError};
use std::thread::JoinHandle;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("worker thread unavailable: {0}")]
    Unavailable(#[from] std::io::Error),
    #[error("worker thread terminated before replying")]
    Disconnected,
}

/// Correlation token for one submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job#{}", self.0)
    }
}

/// A job in flight plus the reply channel it will resolve on.
struct Envelope {
    id: JobId,
    job: Job,
    reply: Sender<JobResponse>,
}

/// Receipt for a submitted job. Resolves exactly once.
pub struct JobTicket {
    id: JobId,
    receiver: Receiver<JobResponse>,
}

impl JobTicket {
    pub fn id(&self) -> JobId {
        self.id
    }

    /// Block until the worker replies.
    pub fn wait(self) -> Result<JobResponse, WorkerError> {
        self.receiver.recv().map_err(|_| WorkerError::Disconnected)
    }

    /// Poll without blocking. Returns `Ok(None)` while the job is still
    /// running. After the single response has been taken, further polls
    /// report [`WorkerError::Disconnected`].
    pub fn try_wait(&self) -> Result<Option<JobResponse>, WorkerError> {
        match self.receiver.try_recv() {
            Ok(response) => Ok(Some(response)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::Disconnected),
        }
    }
}

/// Handle to the worker thread.
///
/// The worker holds no state across requests; each job is processed
/// independently, in arrival order, and its raster lives in the worker only
/// for the span of one request/response cycle.
pub struct ImageWorker {
    sender: Option<Sender<Envelope>>,
    handle: Option<JoinHandle<()>>,
    next_id: AtomicU64,
}

impl ImageWorker {
    /// Spawn the worker thread.
    pub fn spawn() -> Result<Self, WorkerError> {
        let (sender, receiver) = mpsc::channel::<Envelope>();

        let handle = std::thread::Builder::new()
            .name("framepress-worker".into())
            .spawn(move || {
                for Envelope { id, job, reply } in receiver {
                    debug!("{id}: {} received", job.kind());
                    let response = run_job(job);
                    if let JobResponse::Error { message } = &response {
                        warn!("{id}: failed: {message}");
                    } else {
                        debug!("{id}: {} ready", response.kind());
                    }
                    if reply.send(response).is_err() {
                        debug!("{id}: ticket dropped before the response arrived");
                    }
                }
                debug!("worker thread draining complete, exiting");
            })?;

        debug!("worker thread spawned");
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
            next_id: AtomicU64::new(1),
        })
    }

    /// Move a job to the worker.
    ///
    /// On failure the job comes back inside the `SendError`, so the caller
    /// can run it on the synchronous path without having cloned it.
    pub fn submit(&self, job: Job) -> Result<JobTicket, SendError<Job>> {
        let Some(sender) = self.sender.as_ref() else {
            return Err(SendError(job));
        };

        let id = JobId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (reply, receiver) = mpsc::channel();
        match sender.send(Envelope { id, job, reply }) {
            Ok(()) => Ok(JobTicket { id, receiver }),
            Err(SendError(envelope)) => Err(SendError(envelope.job)),
        }
    }

    /// Close the job channel and join the thread. Queued jobs are still
    /// processed before the thread exits.
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        drop(self.sender.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("worker thread panicked");
            } else {
                debug!("worker thread joined");
            }
        }
    }
}

impl Drop for ImageWorker {
    fn drop(&mut self) {
        self.teardown();
    }
}
