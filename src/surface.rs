//! Drawing surfaces.
//!
//! The scene never touches a graphics API directly; it draws through the
//! [`DrawSurface`] contract. [`SdlSurface`] is the windowed implementation,
//! [`BufferSurface`] renders offscreen into a pixel vector and backs the
//! scene tests.

use std::collections::HashSet;

use log::{debug, info};
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::rect::Point;
use thiserror::Error;

use crate::color::ColorRgb;

/// Errors raised while creating or driving an SDL window.
#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("SDL error: {0}")]
    Sdl(String),
}

impl From<String> for SurfaceError {
    fn from(message: String) -> Self {
        SurfaceError::Sdl(message)
    }
}

/// A 2D drawing target the scene rasterizes into.
///
/// `process_events` returning `false` signals that the window was closed by
/// the user; the scene surfaces that as a terminal return from `update` and
/// never attempts to reopen the window itself.
pub trait DrawSurface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// Fills the whole surface with a color.
    fn clear(&mut self, color: ColorRgb);
    /// Sets the color used by subsequent pixel/line draws.
    fn set_draw_color(&mut self, color: ColorRgb);
    fn draw_pixel(&mut self, x: i32, y: i32);
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32);
    /// Presents the finished frame.
    fn present(&mut self);
    /// Polls input; returns `false` once the window has been closed.
    fn process_events(&mut self) -> bool;
}

/// Keyboard state captured during event polling.
#[derive(Debug, Default)]
pub struct KeyStates {
    held: HashSet<Keycode>,
    pressed: Vec<Keycode>,
}

impl KeyStates {
    pub fn is_held(&self, key: Keycode) -> bool {
        self.held.contains(&key)
    }

    /// Keys that went down since the last poll, in press order.
    pub fn pressed(&self) -> &[Keycode] {
        &self.pressed
    }
}

/// Mouse state captured during event polling.
#[derive(Debug, Default, Clone, Copy)]
pub struct MouseState {
    pub x: i32,
    pub y: i32,
    pub dx: i32,
    pub dy: i32,
    pub left_held: bool,
    pub right_held: bool,
}

/// SDL2-backed window surface.
pub struct SdlSurface {
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    keys: KeyStates,
    mouse: MouseState,
    width: u32,
    height: u32,
    open: bool,
}

impl SdlSurface {
    /// Initializes SDL and opens a centered window.
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self, SurfaceError> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
        let event_pump = sdl_context.event_pump()?;

        info!("opened {width}x{height} window \"{title}\"");

        Ok(Self {
            canvas,
            event_pump,
            keys: KeyStates::default(),
            mouse: MouseState::default(),
            width,
            height,
            open: true,
        })
    }

    /// Keyboard state as of the most recent `process_events`.
    pub fn keys(&self) -> &KeyStates {
        &self.keys
    }

    /// Mouse state as of the most recent `process_events`.
    pub fn mouse(&self) -> MouseState {
        self.mouse
    }
}

fn to_sdl_color(color: ColorRgb) -> sdl2::pixels::Color {
    let c = color.clamped();
    sdl2::pixels::Color::RGBA(
        (c.r * 255.0) as u8,
        (c.g * 255.0) as u8,
        (c.b * 255.0) as u8,
        (c.a * 255.0) as u8,
    )
}

impl DrawSurface for SdlSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: ColorRgb) {
        self.canvas.set_draw_color(to_sdl_color(color));
        self.canvas.clear();
    }

    fn set_draw_color(&mut self, color: ColorRgb) {
        self.canvas.set_draw_color(to_sdl_color(color));
    }

    fn draw_pixel(&mut self, x: i32, y: i32) {
        let _ = self.canvas.draw_point(Point::new(x, y));
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let _ = self
            .canvas
            .draw_line(Point::new(x0, y0), Point::new(x1, y1));
    }

    fn present(&mut self) {
        self.canvas.present();
    }

    fn process_events(&mut self) -> bool {
        if !self.open {
            return false;
        }
        self.keys.pressed.clear();
        self.mouse.dx = 0;
        self.mouse.dy = 0;

        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => {
                    debug!("window close requested");
                    self.open = false;
                }
                Event::KeyDown {
                    keycode: Some(key),
                    repeat: false,
                    ..
                } => {
                    self.keys.held.insert(key);
                    self.keys.pressed.push(key);
                }
                Event::KeyUp {
                    keycode: Some(key), ..
                } => {
                    self.keys.held.remove(&key);
                }
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => {
                    debug!("window resized to {w}x{h}");
                    self.width = w as u32;
                    self.height = h as u32;
                }
                Event::MouseMotion {
                    x, y, xrel, yrel, ..
                } => {
                    self.mouse.x = x;
                    self.mouse.y = y;
                    self.mouse.dx += xrel;
                    self.mouse.dy += yrel;
                }
                Event::MouseButtonDown { mouse_btn, .. } => match mouse_btn {
                    sdl2::mouse::MouseButton::Left => self.mouse.left_held = true,
                    sdl2::mouse::MouseButton::Right => self.mouse.right_held = true,
                    _ => {}
                },
                Event::MouseButtonUp { mouse_btn, .. } => match mouse_btn {
                    sdl2::mouse::MouseButton::Left => self.mouse.left_held = false,
                    sdl2::mouse::MouseButton::Right => self.mouse.right_held = false,
                    _ => {}
                },
                _ => {}
            }
        }
        self.open
    }
}

/// Offscreen surface rendering into an ARGB8888 pixel buffer.
///
/// Lines use Bresenham traversal so the pixel coverage matches what a
/// windowed surface would draw.
pub struct BufferSurface {
    pixels: Vec<u32>,
    draw_color: u32,
    width: u32,
    height: u32,
    closed: bool,
    frames_presented: u64,
}

impl BufferSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; (width * height) as usize],
            draw_color: 0xFFFFFFFF,
            width,
            height,
            closed: false,
            frames_presented: 0,
        }
    }

    /// Pixel value at (x, y), or `None` out of bounds.
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.pixels[(y as u32 * self.width + x as u32) as usize])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn frames_presented(&self) -> u64 {
        self.frames_presented
    }

    /// Marks the surface closed; the next `process_events` reports it.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Changes the surface dimensions, discarding the current contents.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = vec![0; (width * height) as usize];
        self.width = width;
        self.height = height;
    }

    fn put(&mut self, x: i32, y: i32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.pixels[(y as u32 * self.width + x as u32) as usize] = self.draw_color;
        }
    }
}

impl DrawSurface for BufferSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn clear(&mut self, color: ColorRgb) {
        self.pixels.fill(color.to_argb8888());
    }

    fn set_draw_color(&mut self, color: ColorRgb) {
        self.draw_color = color.to_argb8888();
    }

    fn draw_pixel(&mut self, x: i32, y: i32) {
        self.put(x, y);
    }

    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let step_x = if x0 < x1 { 1 } else { -1 };
        let step_y = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);

        loop {
            self.put(x, y);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += step_x;
            }
            if e2 < dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn present(&mut self) {
        self.frames_presented += 1;
    }

    fn process_events(&mut self) -> bool {
        !self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::colors;

    #[test]
    fn buffer_clear_fills_every_pixel() {
        let mut surface = BufferSurface::new(8, 8);
        surface.clear(colors::RED);
        assert!(surface.pixels().iter().all(|&p| p == 0xFFFF0000));
    }

    #[test]
    fn buffer_line_reaches_both_endpoints() {
        let mut surface = BufferSurface::new(16, 16);
        surface.clear(colors::BLACK);
        surface.set_draw_color(colors::WHITE);
        surface.draw_line(1, 2, 12, 9);
        assert_eq!(surface.pixel(1, 2), Some(0xFFFFFFFF));
        assert_eq!(surface.pixel(12, 9), Some(0xFFFFFFFF));
    }

    #[test]
    fn buffer_ignores_out_of_bounds_draws() {
        let mut surface = BufferSurface::new(4, 4);
        surface.set_draw_color(colors::WHITE);
        surface.draw_pixel(-1, 0);
        surface.draw_pixel(0, 99);
        assert!(surface.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn closing_terminates_event_processing() {
        let mut surface = BufferSurface::new(4, 4);
        assert!(surface.process_events());
        surface.close();
        assert!(!surface.process_events());
    }
}
