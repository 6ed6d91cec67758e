//! Pose-driven interactive scenes.
//!
//! A staged pipeline turns raw camera frames into pose landmarks and fans an
//! identical copy of every computed [`PoseFrame`] out to each consumer: the
//! render tick loop and any number of pose loggers. Scenes hold buttons,
//! tracking bubbles, and a skeletal overlay that react to the latest pose
//! once per tick, with the skeleton always updated before hit-testing.
//!
//! Capture devices, pose models, and render backends are pluggable through
//! the [`FrameSource`], [`PoseModel`], and [`UserInterface`] traits; optional
//! implementations ship behind the `camera-nokhwa` and `ui-minifb` features.

pub mod activity;
pub mod components;
pub mod error;
pub mod landmark;
pub mod logger;
pub mod pipeline;
pub mod scene;
pub mod types;
pub mod ui;
pub mod worker;

pub use activity::{Activity, SceneNav, StopHandle};
pub use components::{
    Button, Component, SharedButton, SharedSkeleton, SharedTrackingBubble, Skeleton,
    TrackingBubble,
};
pub use error::{Error, Result};
pub use landmark::LandmarkIndex;
pub use logger::{PoseLogger, csv::CsvPoseLogger};
pub use pipeline::{CameraPoseSource, FramePreview, FrameSource, PoseModel, PoseSource};
pub use scene::Scene;
pub use types::{Color, Frame, Landmark, PoseFrame};
pub use ui::UserInterface;
pub use worker::{StopFlag, Worker};
