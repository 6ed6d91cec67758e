//! Two scenes whose buttons relocate each other and advance the scene,
//! with a hand bubble and skeleton overlay per scene.
//!
//! Driven by a synthetic pose source so it runs without a camera or model;
//! swap in `NokhwaCamera` plus a real `PoseModel` for live input.

use std::time::{Duration, Instant};

use anyhow::Result;
use posestage::landmark::{DEFAULT_RENDER_SCALE, LANDMARK_COUNT, LandmarkIndex};
use posestage::ui::MinifbUi;
use posestage::{
    Activity, Button, CameraPoseSource, Frame, FrameSource, Landmark, PoseFrame, PoseModel, Scene,
    Skeleton, TrackingBubble,
};

const WIDTH: usize = 1280;
const HEIGHT: usize = 720;
const FPS: usize = 60;

/// Stand-in capture device: emits tiny blank frames at a steady rate.
struct SyntheticFrames;

impl FrameSource for SyntheticFrames {
    fn get_frame(&mut self) -> Option<Frame> {
        std::thread::sleep(Duration::from_millis(16));
        Some(Frame::new(vec![0; 4], 1, 1))
    }
}

/// Stand-in model: swings both wrists around in model space so buttons get
/// hit every few seconds.
struct OrbitModel {
    started: Instant,
}

impl PoseModel for OrbitModel {
    fn get_pose(&mut self, _frame: &Frame) -> posestage::Result<PoseFrame> {
        let t = self.started.elapsed().as_secs_f32();
        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        landmarks[LandmarkIndex::LeftWrist.index()] =
            Landmark::new(0.5 * t.cos(), 0.5 * t.sin(), 0.0, 1.0);
        landmarks[LandmarkIndex::RightWrist.index()] =
            Landmark::new(0.5 * (0.7 * t).sin(), 0.5 * (0.7 * t).cos(), 0.0, 1.0);
        Ok(PoseFrame::from_landmarks(landmarks))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let pose_source = CameraPoseSource::new(
        SyntheticFrames,
        OrbitModel {
            started: Instant::now(),
        },
    );
    let ui = MinifbUi::new(WIDTH, HEIGHT, FPS).with_title("two scenes");
    let mut activity = Activity::new(pose_source, ui);
    let nav = activity.navigator();

    let center = (WIDTH as f32 / 2.0, HEIGHT as f32 / 2.0);

    let button_1 = {
        let mut button = Button::new(center, 50.0, 50.0, [255, 0, 0, 255]);
        button.targets = vec![LandmarkIndex::LeftWrist.into()];
        button.into_shared()
    };
    let button_2 = {
        let mut button = Button::new(center, 50.0, 50.0, [0, 0, 255, 255]);
        button.targets = vec![LandmarkIndex::RightWrist.into()];
        button.into_shared()
    };

    // Each button banishes the other to a new spot and flips the scene.
    const SPOTS: [(f32, f32); 3] = [(900.0, 250.0), (700.0, 500.0), (350.0, 350.0)];
    {
        let other = button_2.clone();
        let nav = nav.clone();
        let mut spots = SPOTS.into_iter().cycle();
        button_1.borrow_mut().set_callback(move || {
            other.borrow_mut().pos = spots.next().unwrap();
            nav.next_scene();
        });
    }
    {
        let other = button_1.clone();
        let nav = nav.clone();
        let mut spots = SPOTS.into_iter().cycle();
        button_2.borrow_mut().set_callback(move || {
            other.borrow_mut().pos = spots.next().unwrap();
            nav.next_scene();
        });
    }

    let bubble_1 = TrackingBubble::new(LandmarkIndex::LeftWrist.into(), 40.0, [255, 0, 0, 255]);
    let bubble_2 = TrackingBubble::new(LandmarkIndex::RightWrist.into(), 40.0, [0, 0, 255, 255]);

    let mut scene_1 = Scene::new();
    scene_1.add_component(button_1);
    scene_1.add_component(bubble_1.into_shared());
    scene_1.add_component(Skeleton::new(center, DEFAULT_RENDER_SCALE).into_shared());

    let mut scene_2 = Scene::new();
    scene_2.add_component(button_2);
    scene_2.add_component(bubble_2.into_shared());
    scene_2.add_component(Skeleton::new(center, DEFAULT_RENDER_SCALE).into_shared());

    activity.add_scene(scene_1);
    activity.add_scene(scene_2);

    activity.run()?;
    Ok(())
}
