use std::time::Duration;

use crossbeam_channel::unbounded;
use posestage::landmark::LANDMARK_COUNT;
use posestage::{CameraPoseSource, Frame, FrameSource, Landmark, PoseFrame, PoseModel, PoseSource};

/// Encodes a sequence number into each frame's height.
struct CountingFrames {
    next: u32,
}

impl FrameSource for CountingFrames {
    fn get_frame(&mut self) -> Option<Frame> {
        self.next += 1;
        Some(Frame::new(vec![0; 4], 1, self.next))
    }
}

/// Derives a deterministic pose from the frame's sequence number.
struct StampModel;

impl PoseModel for StampModel {
    fn get_pose(&mut self, frame: &Frame) -> posestage::Result<PoseFrame> {
        let seq = frame.height as f32;
        let landmarks = (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(seq + i as f32 * 0.25, seq * 0.5, 0.125 * i as f32, 1.0))
            .collect();
        Ok(PoseFrame::from_landmarks(landmarks))
    }
}

#[test]
fn every_queue_observes_identical_copies() {
    let (tx_a, rx_a) = unbounded();
    let (tx_b, rx_b) = unbounded();
    let mut source = CameraPoseSource::new(CountingFrames { next: 0 }, StampModel);
    let workers = source.start(vec![tx_a, tx_b]).unwrap();

    let timeout = Duration::from_secs(5);
    for _ in 0..100 {
        let a = rx_a.recv_timeout(timeout).expect("frame on queue A");
        let b = rx_b.recv_timeout(timeout).expect("frame on queue B");
        assert_eq!(a, b);
    }

    for worker in workers {
        worker.terminate();
    }
}

#[test]
fn consumers_drain_independently() {
    let (tx_a, rx_a) = unbounded();
    let (tx_b, rx_b) = unbounded();
    let mut source = CameraPoseSource::new(CountingFrames { next: 0 }, StampModel);
    let workers = source.start(vec![tx_a, tx_b]).unwrap();

    let timeout = Duration::from_secs(5);

    // Drain A far ahead of B; B still sees the same values in the same
    // order once it catches up.
    let ahead: Vec<PoseFrame> = (0..50)
        .map(|_| rx_a.recv_timeout(timeout).expect("frame on queue A"))
        .collect();
    for expected in &ahead {
        let behind = rx_b.recv_timeout(timeout).expect("frame on queue B");
        assert_eq!(*expected, behind);
    }

    for worker in workers {
        worker.terminate();
    }
}
