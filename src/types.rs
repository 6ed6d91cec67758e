use std::time::Instant;

use crate::landmark::{LANDMARK_COUNT, VALUES_PER_LANDMARK};

/// One captured image, RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct Frame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(rgba: Vec<u8>, width: u32, height: u32) -> Self {
        Frame {
            rgba,
            width,
            height,
            timestamp: Instant::now(),
        }
    }
}

/// RGBA color.
pub type Color = [u8; 4];

/// One tracked body point with position and confidence.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub visibility: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Landmark { x, y, z, visibility }
    }
}

/// One timestep's worth of body landmarks.
///
/// Produced wholesale by a pose model once per inference cycle, immutable
/// after creation, and copied rather than shared across queue boundaries.
/// The landmark count is fixed for the lifetime of a source/model pairing;
/// index semantics live in [`crate::landmark`].
#[derive(Clone, Debug, PartialEq)]
pub struct PoseFrame {
    landmarks: Vec<Landmark>,
}

impl PoseFrame {
    pub fn zeroed(count: usize) -> Self {
        PoseFrame {
            landmarks: vec![Landmark::default(); count],
        }
    }

    pub fn from_landmarks(landmarks: Vec<Landmark>) -> Self {
        PoseFrame { landmarks }
    }

    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied()
    }

    /// Applies `scaled = raw * scale + anchor` to the x and y axes; z and
    /// visibility pass through untouched.
    pub fn scaled(&self, scale: f32, anchor: (f32, f32)) -> PoseFrame {
        PoseFrame {
            landmarks: self
                .landmarks
                .iter()
                .map(|lm| Landmark {
                    x: lm.x * scale + anchor.0,
                    y: lm.y * scale + anchor.1,
                    ..*lm
                })
                .collect(),
        }
    }

    /// Row-major `x, y, z, visibility` per landmark, the logger's column
    /// layout.
    pub fn flatten(&self) -> Vec<f32> {
        let mut values = Vec::with_capacity(self.landmarks.len() * VALUES_PER_LANDMARK);
        for lm in &self.landmarks {
            values.extend_from_slice(&[lm.x, lm.y, lm.z, lm.visibility]);
        }
        values
    }
}

impl Default for PoseFrame {
    fn default() -> Self {
        PoseFrame::zeroed(LANDMARK_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_offsets_x_and_y_only() {
        let frame = PoseFrame::from_landmarks(vec![Landmark::new(1.0, -2.0, 3.0, 0.9)]);
        let scaled = frame.scaled(10.0, (100.0, 200.0));
        let lm = scaled.get(0).unwrap();
        assert_eq!(lm.x, 110.0);
        assert_eq!(lm.y, 180.0);
        assert_eq!(lm.z, 3.0);
        assert_eq!(lm.visibility, 0.9);
    }

    #[test]
    fn flatten_interleaves_all_four_values() {
        let frame = PoseFrame::from_landmarks(vec![
            Landmark::new(1.0, 2.0, 3.0, 4.0),
            Landmark::new(5.0, 6.0, 7.0, 8.0),
        ]);
        assert_eq!(
            frame.flatten(),
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]
        );
    }
}
