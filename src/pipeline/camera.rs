//! Webcam frame source backed by nokhwa.

use nokhwa::{
    Camera,
    pixel_format::RgbFormat,
    utils::{CameraIndex, RequestedFormat, RequestedFormatType},
};

use super::FrameSource;
use crate::error::{Error, Result};
use crate::types::Frame;

// Ask for the highest frame rate first; some drivers reject that request,
// so fall back to whatever the camera will negotiate.
fn requested_formats() -> [RequestedFormat<'static>; 2] {
    [
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::None),
    ]
}

/// Webcam-backed [`FrameSource`].
///
/// Frames are decoded to RGBA and mirrored horizontally so on-screen motion
/// matches the user's own.
pub struct NokhwaCamera {
    camera: Camera,
}

impl NokhwaCamera {
    /// Opens camera `device`. Try 0 if unsure.
    pub fn new(device: u32) -> Result<Self> {
        let camera = build_camera(CameraIndex::Index(device))?;
        Ok(NokhwaCamera { camera })
    }
}

fn build_camera(index: CameraIndex) -> Result<Camera> {
    let mut last_err = None;
    for requested in requested_formats() {
        match Camera::new(index.clone(), requested) {
            Ok(mut camera) => match camera.open_stream() {
                Ok(()) => return Ok(camera),
                Err(err) => last_err = Some(err),
            },
            Err(err) => last_err = Some(err),
        }
    }
    Err(Error::Camera(match last_err {
        Some(err) => err.to_string(),
        None => "no supported camera format".to_string(),
    }))
}

impl FrameSource for NokhwaCamera {
    fn get_frame(&mut self) -> Option<Frame> {
        let buffer = match self.camera.frame() {
            Ok(buffer) => buffer,
            Err(err) => {
                log::warn!("camera frame read failed: {err}");
                return None;
            }
        };
        let image = match buffer.decode_image::<RgbFormat>() {
            Ok(image) => image,
            Err(err) => {
                log::warn!("failed to decode camera frame: {err}");
                return None;
            }
        };

        let (width, height) = image.dimensions();
        let rgb = image.into_raw();
        let (w, h) = (width as usize, height as usize);
        let mut rgba = vec![255u8; w * h * 4];
        for y in 0..h {
            for x in 0..w {
                let src = (y * w + x) * 3;
                let dst = (y * w + (w - 1 - x)) * 4;
                rgba[dst..dst + 3].copy_from_slice(&rgb[src..src + 3]);
            }
        }
        Some(Frame::new(rgba, width, height))
    }
}
