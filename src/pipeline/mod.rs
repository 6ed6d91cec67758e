//! Staged capture → inference pipeline with per-consumer fan-out.

#[cfg(feature = "camera-nokhwa")]
pub mod camera;

#[cfg(feature = "camera-nokhwa")]
pub use camera::NokhwaCamera;

use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::error::{Error, Result};
use crate::landmark::{DEFAULT_RENDER_SCALE, LANDMARK_COUNT};
use crate::types::{Frame, PoseFrame};
use crate::worker::{StopFlag, Worker};

/// Provides raw image frames on demand, such as a webcam or a video file.
pub trait FrameSource: Send + 'static {
    /// `None` signals no frame is available this call; a transient miss,
    /// never an error.
    fn get_frame(&mut self) -> Option<Frame>;
}

/// Turns a raw frame into pose landmarks.
///
/// When detection soft-fails on a frame, implementations should return the
/// previous successfully computed pose instead of an error, so callers never
/// observe "no pose" after the first detection, only staleness. A hard `Err`
/// makes the pipeline skip that inference cycle entirely.
pub trait PoseModel: Send + 'static {
    fn get_pose(&mut self, frame: &Frame) -> Result<PoseFrame>;

    /// Landmarks per frame, fixed for the lifetime of the model.
    fn landmark_count(&self) -> usize {
        LANDMARK_COUNT
    }

    /// Render scale mapping this model's coordinate space to the screen.
    fn default_scale(&self) -> f32 {
        DEFAULT_RENDER_SCALE
    }
}

/// Live preview surface fed by the acquisition worker.
pub trait FramePreview: Send + 'static {
    fn show(&mut self, frame: &Frame);
}

/// Produces pose frames, either continuously into consumer queues or one at
/// a time.
pub trait PoseSource {
    /// Starts the background pipeline. Each computed pose is delivered as a
    /// copy to every queue in `outputs`; each consumer owns its queue
    /// exclusively. Must be called exactly once and never blocks; the
    /// returned handles are kept for forced termination.
    fn start(&mut self, outputs: Vec<Sender<PoseFrame>>) -> Result<Vec<Worker>>;

    /// Synchronous single-shot variant: takes one frame and runs inference
    /// inline. Blocks until the source yields a frame.
    fn get_pose(&mut self) -> Result<PoseFrame>;
}

/// Pose source built from a frame source and a vision model.
///
/// `start` runs acquisition and inference as two workers connected by an
/// internal queue, so slow inference cannot drag down the capture rate. All
/// queues are unbounded: a consumer that never drains its queue lets it grow
/// without limit, so bound the flow upstream (e.g. a frame source that
/// paces itself, or a fork of the fan-out over a bounded channel that drops
/// the oldest frame) when that matters.
pub struct CameraPoseSource {
    source: Option<Box<dyn FrameSource>>,
    model: Option<Box<dyn PoseModel>>,
    preview: Option<Box<dyn FramePreview>>,
}

impl CameraPoseSource {
    pub fn new(source: impl FrameSource, model: impl PoseModel) -> Self {
        CameraPoseSource {
            source: Some(Box::new(source)),
            model: Some(Box::new(model)),
            preview: None,
        }
    }

    /// Attaches a live preview surface to the acquisition stage.
    pub fn with_preview(mut self, preview: impl FramePreview) -> Self {
        self.preview = Some(Box::new(preview));
        self
    }
}

impl PoseSource for CameraPoseSource {
    fn start(&mut self, outputs: Vec<Sender<PoseFrame>>) -> Result<Vec<Worker>> {
        let source = self.source.take().ok_or(Error::PipelineStarted)?;
        let model = self.model.take().ok_or(Error::PipelineStarted)?;
        let preview = self.preview.take();

        let (frame_tx, frame_rx) = unbounded();
        let capture = Worker::spawn("pose-capture", move |stop| {
            capture_loop(source, preview, frame_tx, stop)
        })?;
        let inference = Worker::spawn("pose-inference", move |stop| {
            inference_loop(model, frame_rx, outputs, stop)
        })?;
        Ok(vec![capture, inference])
    }

    fn get_pose(&mut self) -> Result<PoseFrame> {
        let source = self.source.as_mut().ok_or(Error::PipelineStarted)?;
        let model = self.model.as_mut().ok_or(Error::PipelineStarted)?;
        loop {
            if let Some(frame) = source.get_frame() {
                return model.get_pose(&frame);
            }
            thread::yield_now();
        }
    }
}

fn capture_loop(
    mut source: Box<dyn FrameSource>,
    mut preview: Option<Box<dyn FramePreview>>,
    frame_tx: Sender<Frame>,
    stop: StopFlag,
) {
    while !stop.is_set() {
        let Some(frame) = source.get_frame() else {
            // Transient miss; try again next iteration.
            continue;
        };
        if let Some(preview) = preview.as_mut() {
            preview.show(&frame);
        }
        if frame_tx.send(frame).is_err() {
            // Inference stage is gone.
            break;
        }
    }
}

fn inference_loop(
    mut model: Box<dyn PoseModel>,
    frame_rx: Receiver<Frame>,
    outputs: Vec<Sender<PoseFrame>>,
    stop: StopFlag,
) {
    while !stop.is_set() {
        let frame = match frame_rx.try_recv() {
            Ok(frame) => frame,
            Err(TryRecvError::Empty) => {
                thread::yield_now();
                continue;
            }
            Err(TryRecvError::Disconnected) => break,
        };
        match model.get_pose(&frame) {
            // Fan-out is all or nothing per cycle: every consumer sees this
            // frame, or on a model failure none do.
            Ok(pose) => {
                for output in &outputs {
                    let _ = output.send(pose.clone());
                }
            }
            Err(err) => log::warn!("pose inference failed: {err}"),
        }
    }
}
