//! One scene plus a CSV pose logger: every computed pose frame also lands
//! in `poses.csv`, flushed on shutdown (close the window or press Escape).

use std::time::{Duration, Instant};

use anyhow::Result;
use posestage::landmark::{DEFAULT_RENDER_SCALE, LANDMARK_COUNT, LandmarkIndex};
use posestage::ui::MinifbUi;
use posestage::{
    Activity, CameraPoseSource, CsvPoseLogger, Frame, FrameSource, Landmark, PoseFrame, PoseModel,
    Scene, Skeleton, TrackingBubble,
};

const WIDTH: usize = 1280;
const HEIGHT: usize = 720;
const FPS: usize = 60;

struct SyntheticFrames;

impl FrameSource for SyntheticFrames {
    fn get_frame(&mut self) -> Option<Frame> {
        std::thread::sleep(Duration::from_millis(16));
        Some(Frame::new(vec![0; 4], 1, 1))
    }
}

/// Bobs the whole figure up and down.
struct SwayModel {
    started: Instant,
}

impl PoseModel for SwayModel {
    fn get_pose(&mut self, _frame: &Frame) -> posestage::Result<PoseFrame> {
        let t = self.started.elapsed().as_secs_f32();
        let landmarks = (0..LANDMARK_COUNT)
            .map(|i| {
                Landmark::new(
                    (i as f32 / LANDMARK_COUNT as f32 - 0.5) * 0.6,
                    0.2 * (t + i as f32 * 0.1).sin(),
                    0.0,
                    1.0,
                )
            })
            .collect();
        Ok(PoseFrame::from_landmarks(landmarks))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let pose_source = CameraPoseSource::new(
        SyntheticFrames,
        SwayModel {
            started: Instant::now(),
        },
    );
    let ui = MinifbUi::new(WIDTH, HEIGHT, FPS).with_title("pose logging");
    let mut activity = Activity::new(pose_source, ui);
    activity.add_logger(CsvPoseLogger::new("poses.csv"));

    let center = (WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);
    let mut scene = Scene::new();
    scene.add_component(Skeleton::new(center, DEFAULT_RENDER_SCALE).into_shared());
    scene.add_component(
        TrackingBubble::new(LandmarkIndex::Nose.into(), 25.0, [255, 200, 0, 255]).into_shared(),
    );
    activity.add_scene(scene);

    activity.run()?;
    println!("pose data written to poses.csv");
    Ok(())
}
