//! Pose loggers: independent consumers that durably accumulate every frame
//! they receive, regardless of the render cadence.

pub mod csv;

use crossbeam_channel::Receiver;

use crate::error::Result;
use crate::types::PoseFrame;
use crate::worker::Worker;

/// Commands posted to a logger's accumulation worker over its private
/// channel. Loggers are never driven through shared memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LoggerCommand {
    /// Serialize the accumulated table to durable storage soon.
    Save,
    /// Drain the queue, save one final time, stop consuming.
    Close,
}

/// Stateful accumulator of received pose frames.
///
/// Lifecycle: `start` → accumulation loop → `save` (zero or more times) →
/// `close`. Frames enqueued before `close` is requested are not lost,
/// provided the loop gets enough wall-clock time to drain its queue before
/// its worker is terminated.
pub trait PoseLogger {
    /// Spawns the accumulation worker on the given queue. Called exactly
    /// once; the caller keeps the handles for forced termination.
    fn start(&mut self, frames: Receiver<PoseFrame>) -> Result<Vec<Worker>>;

    /// Requests an asynchronous write of the accumulated data. Returns as
    /// soon as the request is posted; there is no completion ack.
    fn save(&self) -> Result<()>;

    /// Requests a final save and deactivates the accumulation loop.
    fn close(&self) -> Result<()>;
}
