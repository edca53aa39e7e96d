//! Rectangles and solid fills
//!
//! All drawing coordinates are signed and inclusive. Anything outside the
//! screen is clipped here, once, so the rest of the driver only ever sees
//! on-screen rectangles.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::color::Color;
use crate::port::{Board, PortGuard};
use crate::protocol::Window;
use crate::revision::Revision;

/// On-screen rectangle, corners inclusive, `x1 <= x2` and `y1 <= y2`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x1: u16,
    pub y1: u16,
    pub x2: u16,
    pub y2: u16,
}

impl Rect {
    pub fn width(&self) -> u16 {
        self.x2 - self.x1 + 1
    }

    pub fn height(&self) -> u16 {
        self.y2 - self.y1 + 1
    }

    /// Number of pixels covered
    pub fn area(&self) -> u32 {
        self.width() as u32 * self.height() as u32
    }
}

/// Clamp a rectangle to the screen
///
/// Returns `None` when the corners are out of order or no part of the
/// rectangle is on screen.
pub fn clip(revision: &Revision, x1: i32, y1: i32, x2: i32, y2: i32) -> Option<Rect> {
    let (max_x, max_y) = (revision.max_x(), revision.max_y());

    if x1 > x2 || y1 > y2 {
        return None;
    }
    if x2 < 0 || y2 < 0 || x1 > max_x || y1 > max_y {
        return None;
    }

    Some(Rect {
        x1: x1.clamp(0, max_x) as u16,
        y1: y1.clamp(0, max_y) as u16,
        x2: x2.clamp(0, max_x) as u16,
        y2: y2.clamp(0, max_y) as u16,
    })
}

/// Last coordinate of a run of `len` pixels starting at `start`
///
/// Saturates instead of wrapping; anything past `i32::MAX` is off screen
/// either way. `len` must be at least 1.
pub fn span_end(start: i32, len: i32) -> i32 {
    start.saturating_add(len - 1)
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    /// Fill a rectangle given by its corners
    ///
    /// Returns the number of pixels written.
    pub fn fill_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> u32 {
        let n = self.set_output_rect(x1, y1, x2, y2);
        self.write_pixels(color, n);
        n
    }

    /// One-pixel-high line from `x1` to `x2`
    pub fn hline(&mut self, x1: i32, y: i32, x2: i32, color: Color) -> u32 {
        self.fill_rect(x1, y, x2, y, color)
    }

    /// One-pixel-wide line from `y1` to `y2`
    pub fn vline(&mut self, x: i32, y1: i32, y2: i32, color: Color) -> u32 {
        self.fill_rect(x, y1, x, y2, color)
    }

    /// Set a single pixel
    ///
    /// Pays a full window setup for one pixel; prefer a line or fill when
    /// more than one pixel is known up front. Off-screen points are dropped.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color) -> u32 {
        if x < 0 || y < 0 || x > self.revision.max_x() || y > self.revision.max_y() {
            return 0;
        }
        self.fill_rect(x, y, x, y, color)
    }

    /// Fill the whole screen
    pub fn clear(&mut self, color: Color) -> u32 {
        let (w, h) = (self.revision.max_x(), self.revision.max_y());
        self.fill_rect(0, 0, w, h, color)
    }

    /// Paint the full-screen test gradient
    ///
    /// ```text
    ///   ,----------------, y=0
    ///   |Green ...... Red|
    ///   | .            . |
    ///   |Cyan Blue Violet|
    ///   '----------------' y=max
    /// ```
    pub fn colour_gradient(&mut self) -> u32 {
        let rev = self.revision;
        let (w, h) = (rev.width as u32, rev.height as u32);
        let rect = Rect {
            x1: 0,
            y1: 0,
            x2: rev.width - 1,
            y2: rev.height - 1,
        };
        let window = Window::from_rect(rev, &rect);
        let n = self.open_window(window);

        for (x, y) in window.scan(rev) {
            let (x, y) = (x as u32, y as u32);
            let red = (x * 32 / w) as u8;
            let green = ((w - 1 - x) * 64 / w) as u8;
            let blue = (y * 32 / h) as u8;
            self.write_pixel(rev.layout.pack(red, green, blue));
        }
        n
    }
}
