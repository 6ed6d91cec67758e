//! Index conventions for 33-landmark full-body pose models.

/// Landmarks per frame produced by the conventional model.
pub const LANDMARK_COUNT: usize = 33;

/// Values carried per landmark: x, y, z, visibility.
pub const VALUES_PER_LANDMARK: usize = 4;

/// Render scale mapping the model's coordinate space to a comfortable
/// on-screen size.
pub const DEFAULT_RENDER_SCALE: f32 = 450.0;

/// Landmark indices of the conventional 33-point body model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum LandmarkIndex {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl LandmarkIndex {
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl From<LandmarkIndex> for usize {
    fn from(index: LandmarkIndex) -> usize {
        index as usize
    }
}

/// Limb connections between landmark indices, used to draw the skeleton.
pub const CONNECTIONS: &[(usize, usize)] = &[
    (16, 14),
    (16, 18),
    (16, 20),
    (16, 22),
    (18, 20),
    (14, 12),
    (12, 11),
    (12, 24),
    (11, 23),
    (11, 13),
    (15, 13),
    (15, 17),
    (15, 19),
    (15, 21),
    (17, 19),
    (24, 23),
    (26, 24),
    (26, 28),
    (25, 23),
    (25, 27),
    (10, 9),
    (8, 6),
    (5, 6),
    (5, 4),
    (0, 4),
    (0, 1),
    (2, 1),
    (2, 3),
    (3, 7),
    (28, 32),
    (28, 30),
    (27, 29),
    (27, 31),
    (32, 30),
    (29, 31),
];
