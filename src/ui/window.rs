use minifb::{Key, Window, WindowOptions};

use super::UserInterface;
use super::draw;
use crate::error::{Error, Result};
use crate::types::Color;

/// minifb-backed frontend: one framebuffer window with a target frame rate.
pub struct MinifbUi {
    width: usize,
    height: usize,
    fps: usize,
    title: String,
    buffer: Vec<u32>,
    window: Option<Window>,
}

impl MinifbUi {
    pub fn new(width: usize, height: usize, fps: usize) -> Self {
        MinifbUi {
            width,
            height,
            fps,
            title: "posestage".to_string(),
            buffer: vec![0; width * height],
            window: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

impl UserInterface for MinifbUi {
    fn new_gui(&mut self) -> Result<()> {
        let mut window = Window::new(
            &self.title,
            self.width,
            self.height,
            WindowOptions::default(),
        )
        .map_err(|err| Error::Frontend(err.to_string()))?;
        window.set_target_fps(self.fps);
        self.window = Some(window);
        Ok(())
    }

    fn clear(&mut self) {
        self.buffer.fill(0);
    }

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Color) {
        draw::fill_circle(
            &mut self.buffer,
            self.width,
            self.height,
            (center.0 as i32, center.1 as i32),
            radius as i32,
            draw::pack(color),
        );
    }

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: i32, color: Color) {
        draw::draw_line(
            &mut self.buffer,
            self.width,
            self.height,
            (from.0 as i32, from.1 as i32),
            (to.0 as i32, to.1 as i32),
            thickness,
            draw::pack(color),
        );
    }

    fn update(&mut self) -> Result<bool> {
        let Some(window) = self.window.as_mut() else {
            return Err(Error::Frontend("window was never created".to_string()));
        };
        window
            .update_with_buffer(&self.buffer, self.width, self.height)
            .map_err(|err| Error::Frontend(err.to_string()))?;
        Ok(window.is_open() && !window.is_key_down(Key::Escape))
    }
}
