//! The seam between scene logic and a concrete render backend.

#[cfg(feature = "ui-minifb")]
mod draw;
#[cfg(feature = "ui-minifb")]
mod window;

#[cfg(feature = "ui-minifb")]
pub use window::MinifbUi;

use crate::error::Result;
use crate::types::Color;

/// An abstract user interface capable of rendering components.
///
/// The tick loop drives it clear → draw → update once per tick. `update`
/// presents the frame, advances the backend's frame limiter, and reports
/// whether the interface should keep running; a window close or Escape
/// clears that flag, and a backend fault is an `Err` that shuts the
/// activity down.
pub trait UserInterface {
    fn new_gui(&mut self) -> Result<()>;

    fn clear(&mut self);

    fn draw_circle(&mut self, center: (f32, f32), radius: f32, color: Color);

    fn draw_line(&mut self, from: (f32, f32), to: (f32, f32), thickness: i32, color: Color);

    fn update(&mut self) -> Result<bool>;
}
