use std::cell::Cell;
use std::rc::Rc;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, unbounded};

use crate::components::{Component, fire_callback};
use crate::error::{Error, Result};
use crate::landmark::LANDMARK_COUNT;
use crate::logger::PoseLogger;
use crate::pipeline::PoseSource;
use crate::scene::Scene;
use crate::types::PoseFrame;
use crate::ui::UserInterface;
use crate::worker::Worker;

/// Lifecycle of an [`Activity`], entered strictly left to right.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    ShuttingDown,
    Terminated,
}

/// Cloneable navigation handle over an activity's scene list.
///
/// Callbacks capture a clone to switch scenes from inside a tick. The
/// handle is `!Send`, so navigation stays on the tick-loop thread. All
/// operations are no-ops while the scene list is empty (`set_scene` reports
/// `false`).
#[derive(Clone)]
pub struct SceneNav {
    index: Rc<Cell<usize>>,
    count: Rc<Cell<usize>>,
}

impl SceneNav {
    fn new() -> Self {
        SceneNav {
            index: Rc::new(Cell::new(0)),
            count: Rc::new(Cell::new(0)),
        }
    }

    /// Index of the scene being rendered.
    pub fn index(&self) -> usize {
        self.index.get()
    }

    /// Advances to the next scene, wrapping past the last back to 0.
    pub fn next_scene(&self) {
        let count = self.count.get();
        if count == 0 {
            return;
        }
        self.index.set((self.index.get() + 1) % count);
    }

    /// Steps back to the previous scene, wrapping below 0 to the last.
    pub fn previous_scene(&self) {
        let count = self.count.get();
        if count == 0 {
            return;
        }
        self.index.set((self.index.get() + count - 1) % count);
    }

    /// Jumps to scene `index` and reports whether it was in range;
    /// out-of-range leaves the active scene unchanged.
    pub fn set_scene(&self, index: usize) -> bool {
        if index < self.count.get() {
            self.index.set(index);
            true
        } else {
            false
        }
    }
}

/// Handle for requesting shutdown from outside the tick loop, e.g. from a
/// Ctrl-C hook. Cloneable and `Send`; the loop checks it every iteration.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    fn is_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Top-level orchestrator: owns the scenes, the pose source, the frontend,
/// and the registered loggers, and drives the per-tick interaction loop.
pub struct Activity<U: UserInterface> {
    frontend: U,
    pose_source: Box<dyn PoseSource>,
    scenes: Vec<Scene>,
    nav: SceneNav,
    loggers: Vec<Box<dyn PoseLogger>>,
    workers: Vec<Worker>,
    state: State,
    grace: Duration,
    stop: StopHandle,
    /// Latest scaled landmark positions, shared by hit-testing and bubbles.
    points: PoseFrame,
}

impl<U: UserInterface> Activity<U> {
    pub fn new(pose_source: impl PoseSource + 'static, frontend: U) -> Self {
        Activity {
            frontend,
            pose_source: Box::new(pose_source),
            scenes: Vec::new(),
            nav: SceneNav::new(),
            loggers: Vec::new(),
            workers: Vec::new(),
            state: State::Idle,
            grace: Duration::from_secs(3),
            stop: StopHandle::default(),
            points: PoseFrame::zeroed(LANDMARK_COUNT),
        }
    }

    pub fn add_scene(&mut self, scene: Scene) {
        self.scenes.push(scene);
        self.nav.count.set(self.scenes.len());
    }

    pub fn add_logger(&mut self, logger: impl PoseLogger + 'static) {
        self.loggers.push(Box::new(logger));
    }

    /// How long shutdown waits for loggers to drain their queues before
    /// every worker is terminated.
    pub fn set_shutdown_grace(&mut self, grace: Duration) {
        self.grace = grace;
    }

    /// A cloneable handle for navigating scenes, e.g. from button
    /// callbacks.
    pub fn navigator(&self) -> SceneNav {
        self.nav.clone()
    }

    /// A `Send` handle that ends the run from another thread.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn active_scene(&self) -> usize {
        self.nav.index()
    }

    pub fn next_scene(&self) {
        self.nav.next_scene();
    }

    pub fn previous_scene(&self) {
        self.nav.previous_scene();
    }

    pub fn set_scene(&self, index: usize) -> bool {
        self.nav.set_scene(index)
    }

    /// Starts the pose pipeline and every registered logger, then runs the
    /// render/interaction loop until the frontend stops, a scene hook
    /// returns `false`, or shutdown is requested.
    ///
    /// Supports a single run. On the way out (error or not) every logger
    /// is asked to flush, the grace period elapses, and every spawned
    /// worker is terminated; a tick-loop error is re-raised only after that
    /// cleanup.
    pub fn run(&mut self) -> Result<()> {
        if self.state != State::Idle {
            return Err(Error::AlreadyRan);
        }
        if self.scenes.is_empty() {
            return Err(Error::NoScenes);
        }

        let result = self.start_and_loop();

        self.state = State::ShuttingDown;
        for logger in &self.loggers {
            if let Err(err) = logger.close() {
                log::warn!("logger close failed: {err}");
            }
        }
        if !self.workers.is_empty() {
            thread::sleep(self.grace);
        }
        for worker in self.workers.drain(..) {
            worker.terminate();
        }
        self.state = State::Terminated;

        result
    }

    fn start_and_loop(&mut self) -> Result<()> {
        let (pose_tx, pose_rx) = unbounded();
        let mut outputs = vec![pose_tx];
        let mut logger_queues = Vec::new();
        for _ in &self.loggers {
            let (tx, rx) = unbounded();
            outputs.push(tx);
            logger_queues.push(rx);
        }

        let workers = self.pose_source.start(outputs)?;
        self.workers.extend(workers);
        for (logger, queue) in self.loggers.iter_mut().zip(logger_queues) {
            let workers = logger.start(queue)?;
            self.workers.extend(workers);
        }

        self.frontend.new_gui()?;
        self.state = State::Running;

        loop {
            if self.stop.is_requested() {
                return Ok(());
            }
            if !self.tick(&pose_rx)? {
                return Ok(());
            }
        }
    }

    /// One render/interaction tick. Returns whether the loop should keep
    /// running.
    fn tick(&mut self, poses: &Receiver<PoseFrame>) -> Result<bool> {
        self.frontend.clear();
        let scene_index = self.nav.index();

        // The skeleton is updated first, so button hits never test a pose
        // older than what this tick renders. Without a new frame (or
        // without a skeleton) the previous snapshot stands; the frame is
        // consumed either way so this queue drains at render cadence.
        if let Ok(raw) = poses.try_recv() {
            if let Some(skeleton) = self.scenes[scene_index].skeleton() {
                let (scale, anchor) = {
                    let skeleton = skeleton.borrow();
                    (skeleton.scale, skeleton.pos)
                };
                let scaled = raw.scaled(scale, anchor);
                skeleton.borrow_mut().points = scaled.clone();
                self.points = scaled;
            }
        }

        // Buttons, in scene order, once per satisfied target.
        for component in self.scenes[scene_index].components() {
            if let Component::Button(button) = component {
                let targets = button.borrow().targets.clone();
                for target in targets {
                    let hit = self
                        .points
                        .get(target)
                        .map(|lm| button.borrow().is_clicked((lm.x, lm.y)))
                        .unwrap_or(false);
                    if hit {
                        fire_callback(button);
                    }
                }
            }
        }

        // Tracking bubbles follow their landmark.
        for component in self.scenes[scene_index].components() {
            if let Component::TrackingBubble(bubble) = component {
                let target = bubble.borrow().target;
                if let Some(lm) = self.points.get(target) {
                    bubble.borrow_mut().pos = (lm.x, lm.y);
                }
            }
        }

        // Render in scene order, which is also z-order.
        for component in self.scenes[scene_index].components() {
            component.render(&mut self.frontend);
        }

        let keep_going = (self.scenes[scene_index].on_tick)();
        let frontend_running = self.frontend.update()?;
        Ok(keep_going && frontend_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Button, Skeleton, TrackingBubble};
    use crate::types::{Color, Landmark};
    use crate::worker::Worker;
    use crossbeam_channel::Sender;

    struct NullSource;

    impl PoseSource for NullSource {
        fn start(&mut self, _outputs: Vec<Sender<PoseFrame>>) -> Result<Vec<Worker>> {
            Ok(Vec::new())
        }

        fn get_pose(&mut self) -> Result<PoseFrame> {
            Ok(PoseFrame::default())
        }
    }

    struct NullUi;

    impl UserInterface for NullUi {
        fn new_gui(&mut self) -> Result<()> {
            Ok(())
        }

        fn clear(&mut self) {}

        fn draw_circle(&mut self, _center: (f32, f32), _radius: f32, _color: Color) {}

        fn draw_line(&mut self, _from: (f32, f32), _to: (f32, f32), _t: i32, _color: Color) {}

        fn update(&mut self) -> Result<bool> {
            Ok(true)
        }
    }

    fn activity() -> Activity<NullUi> {
        Activity::new(NullSource, NullUi)
    }

    fn frame_with(index: usize, x: f32, y: f32) -> PoseFrame {
        let mut landmarks = vec![Landmark::default(); LANDMARK_COUNT];
        landmarks[index] = Landmark::new(x, y, 0.0, 1.0);
        PoseFrame::from_landmarks(landmarks)
    }

    #[test]
    fn navigation_is_cyclic() {
        let mut activity = activity();
        for _ in 0..3 {
            activity.add_scene(Scene::new());
        }

        for _ in 0..3 {
            activity.next_scene();
        }
        assert_eq!(activity.active_scene(), 0);

        activity.previous_scene();
        assert_eq!(activity.active_scene(), 2);
        for _ in 0..3 {
            activity.previous_scene();
        }
        assert_eq!(activity.active_scene(), 2);
    }

    #[test]
    fn set_scene_rejects_out_of_range() {
        let mut activity = activity();
        activity.add_scene(Scene::new());
        activity.add_scene(Scene::new());

        assert!(activity.set_scene(1));
        assert_eq!(activity.active_scene(), 1);
        assert!(!activity.set_scene(2));
        assert_eq!(activity.active_scene(), 1);
    }

    #[test]
    fn navigation_is_a_no_op_without_scenes() {
        let activity = activity();
        activity.next_scene();
        activity.previous_scene();
        assert!(!activity.set_scene(0));
        assert_eq!(activity.active_scene(), 0);
    }

    #[test]
    fn run_requires_scenes() {
        let mut activity = activity();
        assert!(matches!(activity.run(), Err(Error::NoScenes)));
    }

    #[test]
    fn button_fires_the_tick_its_frame_is_consumed() {
        let mut activity = activity();

        let skeleton = Skeleton::new((100.0, 100.0), 2.0).into_shared();
        let mut button = Button::new((120.0, 120.0), 5.0, 5.0, [255, 0, 0, 255]);
        button.targets = vec![4];
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        button.set_callback(move || counter.set(counter.get() + 1));
        let button = button.into_shared();

        let mut scene = Scene::new();
        scene.add_component(skeleton.clone());
        scene.add_component(button);
        activity.add_scene(scene);

        let (tx, rx) = unbounded();
        // Landmark 4 at raw (10, 10): scaled by 2 and anchored at (100, 100)
        // it lands exactly on the button.
        tx.send(frame_with(4, 10.0, 10.0)).unwrap();

        assert!(activity.tick(&rx).unwrap());
        assert_eq!(hits.get(), 1, "no one-tick lag");
        assert_eq!(skeleton.borrow().points.get(4).unwrap().x, 120.0);

        // No new frame: the snapshot stands and the button stays satisfied.
        assert!(activity.tick(&rx).unwrap());
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn button_fires_once_per_satisfied_target() {
        let mut activity = activity();

        let skeleton = Skeleton::new((0.0, 0.0), 1.0).into_shared();
        let mut button = Button::new((0.0, 0.0), 50.0, 50.0, [255, 0, 0, 255]);
        button.targets = vec![0, 1, 2];
        let hits = Rc::new(Cell::new(0));
        let counter = hits.clone();
        button.set_callback(move || counter.set(counter.get() + 1));

        let mut scene = Scene::new();
        scene.add_component(skeleton);
        scene.add_component(button.into_shared());
        activity.add_scene(scene);

        let (tx, rx) = unbounded();
        // Landmarks 0 and 1 are inside the radius, 2 is far outside.
        let mut landmarks = vec![Landmark::new(500.0, 500.0, 0.0, 1.0); LANDMARK_COUNT];
        landmarks[0] = Landmark::new(10.0, 0.0, 0.0, 1.0);
        landmarks[1] = Landmark::new(0.0, 10.0, 0.0, 1.0);
        tx.send(PoseFrame::from_landmarks(landmarks)).unwrap();

        activity.tick(&rx).unwrap();
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn bubbles_follow_their_landmark() {
        let mut activity = activity();

        let skeleton = Skeleton::new((0.0, 0.0), 1.0).into_shared();
        let bubble = TrackingBubble::new(6, 10.0, [0, 0, 255, 255]).into_shared();

        let mut scene = Scene::new();
        scene.add_component(skeleton);
        scene.add_component(bubble.clone());
        activity.add_scene(scene);

        let (tx, rx) = unbounded();
        tx.send(frame_with(6, 42.0, 24.0)).unwrap();

        activity.tick(&rx).unwrap();
        assert_eq!(bubble.borrow().pos, (42.0, 24.0));
    }

    #[test]
    fn callback_can_navigate_scenes() {
        let mut activity = activity();
        let nav = activity.navigator();

        let skeleton = Skeleton::new((0.0, 0.0), 1.0).into_shared();
        let mut button = Button::new((0.0, 0.0), 50.0, 50.0, [255, 0, 0, 255]);
        button.targets = vec![0];
        button.set_callback(move || nav.next_scene());

        let mut scene = Scene::new();
        scene.add_component(skeleton);
        scene.add_component(button.into_shared());
        activity.add_scene(scene);
        activity.add_scene(Scene::new());

        let (tx, rx) = unbounded();
        tx.send(frame_with(0, 0.0, 0.0)).unwrap();

        activity.tick(&rx).unwrap();
        assert_eq!(activity.active_scene(), 1);
    }

    #[test]
    fn scene_hook_can_stop_the_run() {
        let mut activity = activity();
        let mut scene = Scene::new();
        let mut remaining = 2;
        scene.set_on_tick(move || {
            remaining -= 1;
            remaining > 0
        });
        activity.add_scene(scene);

        let (_tx, rx) = unbounded::<PoseFrame>();
        assert!(activity.tick(&rx).unwrap());
        assert!(!activity.tick(&rx).unwrap());
    }
}
