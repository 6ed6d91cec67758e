//! Software rasterizers for the minifb frontend's u32 framebuffer.

use crate::types::Color;

/// minifb wants 0RGB; the alpha channel is dropped.
pub(super) fn pack(color: Color) -> u32 {
    ((color[0] as u32) << 16) | ((color[1] as u32) << 8) | color[2] as u32
}

fn put_pixel(buffer: &mut [u32], width: usize, height: usize, x: i32, y: i32, value: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= width || y >= height {
        return;
    }
    buffer[y * width + x] = value;
}

pub(super) fn fill_circle(
    buffer: &mut [u32],
    width: usize,
    height: usize,
    center: (i32, i32),
    radius: i32,
    value: u32,
) {
    let (cx, cy) = center;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                put_pixel(buffer, width, height, cx + dx, cy + dy, value);
            }
        }
    }
}

pub(super) fn draw_line(
    buffer: &mut [u32],
    width: usize,
    height: usize,
    p0: (i32, i32),
    p1: (i32, i32),
    thickness: i32,
    value: u32,
) {
    let (mut x0, mut y0) = p0;
    let (x1, y1) = p1;
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let radius = (thickness.max(1) - 1) / 2;

    loop {
        if radius > 0 {
            fill_circle(buffer, width, height, (x0, y0), radius, value);
        } else {
            put_pixel(buffer, width, height, x0, y0, value);
        }
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
