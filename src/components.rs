use std::cell::RefCell;
use std::rc::Rc;

use crate::landmark::{CONNECTIONS, LANDMARK_COUNT};
use crate::types::{Color, PoseFrame};
use crate::ui::UserInterface;

pub type SharedButton = Rc<RefCell<Button>>;
pub type SharedSkeleton = Rc<RefCell<Skeleton>>;
pub type SharedTrackingBubble = Rc<RefCell<TrackingBubble>>;

const LIMB_COLOR: Color = [255, 255, 255, 255];
const LIMB_WIDTH: i32 = 2;
const LANDMARK_COLOR: Color = [0, 255, 0, 255];
const LANDMARK_RADIUS: f32 = 5.0;

/// A circular button activated when a target landmark comes close enough.
pub struct Button {
    pub pos: (f32, f32),
    /// Maximum distance between a target landmark and `pos` that still
    /// counts as a click.
    pub activation_distance: f32,
    /// Landmark indices that may activate this button.
    pub targets: Vec<usize>,
    pub color: Color,
    pub radius: f32,
    pub(crate) callback: Option<Box<dyn FnMut()>>,
}

impl Button {
    pub fn new(pos: (f32, f32), activation_distance: f32, radius: f32, color: Color) -> Self {
        Button {
            pos,
            activation_distance,
            targets: Vec::new(),
            color,
            radius,
            callback: None,
        }
    }

    pub fn set_callback(&mut self, callback: impl FnMut() + 'static) {
        self.callback = Some(Box::new(callback));
    }

    pub fn into_shared(self) -> SharedButton {
        Rc::new(RefCell::new(self))
    }

    /// Two-stage hit test: a cheap per-axis bounding-box reject, then the
    /// precise circular check. Both must accept.
    pub fn is_clicked(&self, point: (f32, f32)) -> bool {
        let dx = self.pos.0 - point.0;
        let dy = self.pos.1 - point.1;
        if dx.abs() > self.activation_distance || dy.abs() > self.activation_distance {
            return false;
        }
        (dx * dx + dy * dy).sqrt() <= self.activation_distance
    }
}

/// Invokes a button's callback once.
///
/// The callback is taken out of the cell while it runs so it may freely
/// mutate its own button, including replacing the callback itself.
pub(crate) fn fire_callback(button: &SharedButton) {
    let mut callback = button.borrow_mut().callback.take();
    if let Some(callback) = callback.as_mut() {
        callback();
    }
    let mut button = button.borrow_mut();
    if button.callback.is_none() {
        button.callback = callback;
    }
}

/// Skeletal overlay placed by anchor and scale; its `points` snapshot is
/// refreshed by the tick loop whenever a new pose frame arrives.
pub struct Skeleton {
    pub pos: (f32, f32),
    pub scale: f32,
    pub points: PoseFrame,
}

impl Skeleton {
    pub fn new(pos: (f32, f32), scale: f32) -> Self {
        Skeleton {
            pos,
            scale,
            points: PoseFrame::zeroed(LANDMARK_COUNT),
        }
    }

    pub fn into_shared(self) -> SharedSkeleton {
        Rc::new(RefCell::new(self))
    }
}

/// A dot that follows one landmark around the screen.
pub struct TrackingBubble {
    pub color: Color,
    pub radius: f32,
    /// Landmark index this bubble follows.
    pub target: usize,
    /// Derived from the latest pose each tick; never set directly.
    pub pos: (f32, f32),
}

impl TrackingBubble {
    pub fn new(target: usize, radius: f32, color: Color) -> Self {
        TrackingBubble {
            color,
            radius,
            target,
            pos: (0.0, 0.0),
        }
    }

    pub fn into_shared(self) -> SharedTrackingBubble {
        Rc::new(RefCell::new(self))
    }
}

/// Closed set of scene components.
///
/// Handles are `Rc<RefCell<_>>` so the owning application can keep one and
/// mutate the component between ticks, as can callbacks; `Rc` being `!Send`
/// pins all of that to the tick-loop thread.
pub enum Component {
    Button(SharedButton),
    Skeleton(SharedSkeleton),
    TrackingBubble(SharedTrackingBubble),
}

impl Component {
    pub fn render(&self, ui: &mut dyn UserInterface) {
        match self {
            Component::Button(button) => {
                let button = button.borrow();
                ui.draw_circle(button.pos, button.radius, button.color);
            }
            Component::TrackingBubble(bubble) => {
                let bubble = bubble.borrow();
                ui.draw_circle(bubble.pos, bubble.radius, bubble.color);
            }
            Component::Skeleton(skeleton) => {
                let skeleton = skeleton.borrow();
                for &(from, to) in CONNECTIONS {
                    if let (Some(a), Some(b)) = (skeleton.points.get(from), skeleton.points.get(to))
                    {
                        ui.draw_line((a.x, a.y), (b.x, b.y), LIMB_WIDTH, LIMB_COLOR);
                    }
                }
                for lm in skeleton.points.landmarks() {
                    ui.draw_circle((lm.x, lm.y), LANDMARK_RADIUS, LANDMARK_COLOR);
                }
            }
        }
    }
}

impl From<SharedButton> for Component {
    fn from(button: SharedButton) -> Component {
        Component::Button(button)
    }
}

impl From<SharedSkeleton> for Component {
    fn from(skeleton: SharedSkeleton) -> Component {
        Component::Skeleton(skeleton)
    }
}

impl From<SharedTrackingBubble> for Component {
    fn from(bubble: SharedTrackingBubble) -> Component {
        Component::TrackingBubble(bubble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button_at_origin(activation_distance: f32) -> Button {
        Button::new((0.0, 0.0), activation_distance, 50.0, [100, 100, 100, 255])
    }

    #[test]
    fn click_accepted_at_exact_threshold_distance() {
        let button = button_at_origin(50.0);
        assert!(button.is_clicked((50.0, 0.0)));
        assert!(!button.is_clicked((100.0, 0.0)));
    }

    #[test]
    fn bounding_box_pass_can_still_fail_the_circular_check() {
        let button = button_at_origin(50.0);
        // Axis deltas are both within 50, but the Euclidean distance is
        // about 56.6.
        assert!(!button.is_clicked((40.0, 40.0)));
    }

    #[test]
    fn callback_may_mutate_its_own_button() {
        let button = button_at_origin(50.0).into_shared();
        let handle = button.clone();
        button
            .borrow_mut()
            .set_callback(move || handle.borrow_mut().pos = (7.0, 9.0));

        fire_callback(&button);
        assert_eq!(button.borrow().pos, (7.0, 9.0));
        assert!(button.borrow().callback.is_some(), "callback is restored");
    }
}
