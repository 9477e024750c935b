//! Drawing surfaces.
//!
//! The simulator only ever talks to a [`Canvas`]: four calls that map one to
//! one onto the HTML canvas 2D API it was designed against. Backends:
//!
//! - [`Recorder`] keeps the current frame as a list of [`DrawCommand`]s; the
//!   GPU renderer replays it, and tests inspect it.
//! - [`Framebuffer`](crate::raster::Framebuffer) rasterises on the CPU.
//! - `CanvasSurface` (feature `web`, wasm32) draws into a real `<canvas>`.

use glam::Vec2;

use crate::color::Rgba;

/// A 2D drawing surface in device pixels, origin top-left, y down.
pub trait Canvas {
    /// Set the backing store to `width x height` pixels. Clears the surface.
    fn resize(&mut self, width: u32, height: u32);

    /// Erase the whole surface to transparent.
    fn clear(&mut self);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Stroke a straight segment with butt caps.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        (**self).fill_circle(center, radius, color)
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        (**self).stroke_line(from, to, color, width)
    }
}

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgba,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
        width: f32,
    },
}

/// A canvas that records the current frame instead of drawing it.
///
/// `clear` drops the recorded commands; the running totals survive so a
/// host can tell whether anything drew at all after a given point.
#[derive(Debug, Default, Clone)]
pub struct Recorder {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    draw_calls: u64,
    clears: u64,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backing store size as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Commands issued since the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Circles in the current frame.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32, Rgba)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Circle { center, radius, color } => Some((center, radius, color)),
            DrawCommand::Line { .. } => None,
        })
    }

    /// Lines in the current frame.
    pub fn lines(&self) -> impl Iterator<Item = (Vec2, Vec2, Rgba, f32)> + '_ {
        self.commands.iter().filter_map(|c| match *c {
            DrawCommand::Line { from, to, color, width } => Some((from, to, color, width)),
            DrawCommand::Circle { .. } => None,
        })
    }

    /// Total circles and lines ever drawn on this recorder.
    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    /// Total clears ever issued.
    pub fn clears(&self) -> u64 {
        self.clears
    }
}

impl Canvas for Recorder {
    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.commands.clear();
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.clears += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.commands.push(DrawCommand::Circle { center, radius, color });
        self.draw_calls += 1;
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Rgba, width: f32) {
        self.commands.push(DrawCommand::Line { from, to, color, width });
        self.draw_calls += 1;
    }
}
