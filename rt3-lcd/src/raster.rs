//! Line, circle and rectangle outlines
//!
//! Anything axis-aligned goes out as one window fill; only diagonal lines
//! and circle outlines fall back to single pixels.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::color::Color;
use crate::geometry::{self, span_end};
use crate::port::{Board, PortGuard};

/// Outer bound for rasterising
///
/// Lines reaching further out are cut at this square first, and circles
/// with a larger radius are never stepped through.
pub const FAR: i32 = 1 << 14;

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const ABOVE: u8 = 4;
const BELOW: u8 = 8;

fn outcode((x, y): (i64, i64)) -> u8 {
    let far = FAR as i64;
    let mut code = 0;
    if x < -far {
        code |= LEFT;
    } else if x > far {
        code |= RIGHT;
    }
    if y < -far {
        code |= ABOVE;
    } else if y > far {
        code |= BELOW;
    }
    code
}

/// Cut a segment down to the `[-FAR, FAR]` square (Cohen-Sutherland)
///
/// Segments already inside come back unchanged.
fn clip_far(a: (i32, i32), b: (i32, i32)) -> Option<((i32, i32), (i32, i32))> {
    let far = FAR as i64;
    let (mut a, mut b) = ((a.0 as i64, a.1 as i64), (b.0 as i64, b.1 as i64));

    loop {
        let (code_a, code_b) = (outcode(a), outcode(b));
        if code_a | code_b == 0 {
            return Some(((a.0 as i32, a.1 as i32), (b.0 as i32, b.1 as i32)));
        }
        if code_a & code_b != 0 {
            return None;
        }

        let out = if code_a != 0 { code_a } else { code_b };
        let (dx, dy) = ((b.0 - a.0) as i128, (b.1 - a.1) as i128);
        // The other end is not past the same edge, so the divisor is never 0
        let cut = if out & (LEFT | RIGHT) != 0 {
            let x = if out & LEFT != 0 { -far } else { far };
            (x, a.1 + (dy * (x - a.0) as i128 / dx) as i64)
        } else {
            let y = if out & ABOVE != 0 { -far } else { far };
            (a.0 + (dx * (y - a.1) as i128 / dy) as i64, y)
        };

        if out == code_a {
            a = cut;
        } else {
            b = cut;
        }
    }
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    /// Draw a line between two points, both ends included
    ///
    /// Horizontal and vertical lines are a single window fill. Everything
    /// else is Bresenham with one pixel per step, after cutting the line
    /// down to [`FAR`] around the origin.
    pub fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> u32 {
        if y0 == y1 {
            return self.hline(x0.min(x1), y0, x0.max(x1), color);
        }
        if x0 == x1 {
            return self.vline(x0, y0.min(y1), y0.max(y1), color);
        }

        let rev = self.revision;
        if x0.max(x1) < 0 || y0.max(y1) < 0 || x0.min(x1) > rev.max_x() || y0.min(y1) > rev.max_y() {
            return 0;
        }
        let Some(((x0, y0), (x1, y1))) = clip_far((x0, y0), (x1, y1)) else {
            return 0;
        };

        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx - dy;
        let (mut x, mut y) = (x0, y0);
        let mut n = 0;

        loop {
            n += self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += sx;
            }
            if e2 < dx {
                err += dx;
                y += sy;
            }
        }
        n
    }

    /// Draw a circle around `(cx, cy)`
    ///
    /// Midpoint algorithm over one octant, mirrored eight ways. A filled
    /// circle draws a span between each mirrored pair instead, so every
    /// outline pixel is also covered by the fill.
    ///
    /// A circle whose bounding box misses the screen draws nothing. Past a
    /// radius of [`FAR`] only one case is still drawn: a filled circle that
    /// covers the whole screen, which becomes a full-screen fill.
    pub fn draw_circle(&mut self, cx: i32, cy: i32, r: i32, color: Color, filled: bool) -> u32 {
        if r <= 0 {
            return 0;
        }
        let rev = self.revision;
        let (wide_cx, wide_cy, wide_r) = (cx as i64, cy as i64, r as i64);
        if wide_cx + wide_r < 0
            || wide_cy + wide_r < 0
            || wide_cx - wide_r > rev.max_x() as i64
            || wide_cy - wide_r > rev.max_y() as i64
        {
            return 0;
        }
        if r > FAR {
            return if filled && self.covers_screen(cx, cy, r) {
                self.clear(color)
            } else {
                0
            };
        }

        let mut d = 3 - 2 * r;
        let mut x = 0;
        let mut y = r;
        let mut n = 0;

        while x < y {
            if filled {
                n += self.hline(cx - x, cy + y, cx + x, color);
                n += self.hline(cx - x, cy - y, cx + x, color);
                n += self.hline(cx - y, cy + x, cx + y, color);
                n += self.hline(cx - y, cy - x, cx + y, color);
            } else {
                for (px, py) in [
                    (cx + x, cy + y),
                    (cx - x, cy + y),
                    (cx + x, cy - y),
                    (cx - x, cy - y),
                    (cx + y, cy + x),
                    (cx - y, cy + x),
                    (cx + y, cy - x),
                    (cx - y, cy - x),
                ] {
                    n += self.set_pixel(px, py, color);
                }
            }

            x += 1;
            if d < 0 {
                d += 4 * x + 6;
            } else {
                y -= 1;
                d += 4 * (x - y) + 10;
            }
        }
        n
    }

    /// Every screen corner lies inside the circle, with a pixel to spare
    fn covers_screen(&self, cx: i32, cy: i32, r: i32) -> bool {
        let rev = self.revision;
        let inner = (r as i128 - 2).pow(2);
        [(0, 0), (rev.max_x(), 0), (0, rev.max_y()), (rev.max_x(), rev.max_y())]
            .into_iter()
            .all(|(x, y)| {
                let (dx, dy) = (x as i128 - cx as i128, y as i128 - cy as i128);
                dx * dx + dy * dy <= inner
            })
    }

    /// Draw a rectangle from its top-left corner and size
    ///
    /// The outline draws the vertical sides only between the top and bottom
    /// edges, so no corner is written twice.
    pub fn draw_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color, filled: bool) -> u32 {
        if w <= 0 || h <= 0 {
            return 0;
        }
        let (x2, y2) = (span_end(x, w), span_end(y, h));
        if geometry::clip(self.revision, x, y, x2, y2).is_none() {
            return 0;
        }

        if filled {
            return self.fill_rect(x, y, x2, y2, color);
        }

        let mut n = self.hline(x, y, x2, color);
        if h > 2 {
            n += self.vline(x, y + 1, y2 - 1, color);
            if w > 1 {
                n += self.vline(x2, y + 1, y2 - 1, color);
            }
        }
        if h > 1 {
            n += self.hline(x, y2, x2, color);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use crate::color::Color;
    use crate::port::PortGuard;
    use crate::protocol::cmd;
    use crate::revision::MD380;
    use crate::testing::{BusEvent, RecordingBoard, Screen};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use proptest::prelude::*;

    type Guard<'a> = PortGuard<'a, NoopRawMutex, RecordingBoard>;

    fn drawn<F>(draw: F) -> (u32, Screen, usize)
    where
        F: FnOnce(&mut Guard<'_>) -> u32,
    {
        let (port, rec) = RecordingBoard::port(&MD380);
        let n = block_on(async {
            let mut guard = port.acquire().await;
            draw(&mut guard)
        });
        let rec = rec.borrow();
        let windows = rec
            .events
            .iter()
            .filter(|e| **e == BusEvent::Command(cmd::RAMWR))
            .count();
        (n, Screen::replay(&MD380, &rec.events), windows)
    }

    #[test]
    fn test_zero_length_line_sets_one_pixel() {
        let (n, screen, _) = drawn(|g| g.draw_line(40, 50, 40, 50, Color::WHITE));
        assert_eq!(n, 1);
        assert_eq!(screen.written(), [(40, 50)]);
    }

    #[test]
    fn test_axis_aligned_line_is_one_window_in_either_direction() {
        let (n, screen, windows) = drawn(|g| g.draw_line(20, 5, 10, 5, Color::WHITE));
        assert_eq!((n, windows), (11, 1));
        assert_eq!(screen.written().first(), Some(&(10, 5)));

        let (n, _, windows) = drawn(|g| g.draw_line(3, 90, 3, 80, Color::WHITE));
        assert_eq!((n, windows), (11, 1));
    }

    #[test]
    fn test_diagonal_line_includes_both_ends() {
        for (x0, y0, x1, y1) in [(0, 0, 9, 9), (9, 0, 0, 9), (5, 20, 30, 3), (30, 3, 5, 20)] {
            let (n, screen, _) = drawn(|g| g.draw_line(x0, y0, x1, y1, Color::WHITE));
            let steps = (x1 - x0).abs().max((y1 - y0).abs()) as u32 + 1;
            assert_eq!(n, steps);
            assert!(screen.pixel(x0 as u16, y0 as u16).is_some());
            assert!(screen.pixel(x1 as u16, y1 as u16).is_some());
        }
    }

    #[test]
    fn test_large_circle_terminates_on_screen() {
        let (n, screen, _) = drawn(|g| g.draw_circle(79, 63, 64, Color::WHITE, false));
        assert!(n > 0);
        assert_eq!(screen.overflow, 0);
        // The circle pokes over the top and bottom edges; those points are dropped
        assert!(screen.pixel(79, 0).is_none());
        assert!(screen.pixel(79 + 64, 63).is_some());
    }

    #[test]
    fn test_outline_rect_skips_corners_on_sides() {
        let (n, screen, windows) = drawn(|g| g.draw_rect(10, 10, 5, 4, Color::WHITE, false));
        // top 5 + bottom 5 + two sides of 2
        assert_eq!(n, 14);
        assert_eq!(windows, 4);
        assert!(screen.pixel(11, 11).is_none());

        let (n, _, windows) = drawn(|g| g.draw_rect(10, 10, 5, 2, Color::WHITE, false));
        assert_eq!((n, windows), (10, 2));

        let (n, _, windows) = drawn(|g| g.draw_rect(10, 10, 5, 4, Color::WHITE, true));
        assert_eq!((n, windows), (20, 1));

        let (n, _, windows) = drawn(|g| g.draw_rect(10, 10, 0, 4, Color::WHITE, true));
        assert_eq!((n, windows), (0, 0));
    }

    #[test]
    fn test_extreme_line_ends_are_cut_not_overflowed() {
        let (n, screen, _) = drawn(|g| g.draw_line(i32::MIN, 0, i32::MAX, 5, Color::WHITE));
        assert_eq!(n, 160);
        assert_eq!(screen.overflow, 0);
        assert!(screen.pixel(0, 2).is_some());
        assert!(screen.pixel(159, 2).is_some());

        let (n, _, windows) = drawn(|g| g.draw_line(0, i32::MIN, 0, i32::MAX, Color::WHITE));
        assert_eq!((n, windows), (128, 1));

        let (n, _, windows) = drawn(|g| g.draw_line(i32::MAX, i32::MIN, i32::MIN, i32::MIN + 1, Color::WHITE));
        assert_eq!((n, windows), (0, 0));
    }

    #[test]
    fn test_extreme_circles_never_step_through_radius() {
        let (n, _, windows) = drawn(|g| g.draw_circle(79, 63, i32::MAX, Color::WHITE, false));
        assert_eq!((n, windows), (0, 0));

        let (n, screen, windows) = drawn(|g| g.draw_circle(79, 63, i32::MAX, Color::WHITE, true));
        assert_eq!((n, windows), (160 * 128, 1));
        assert!(screen.pixel(0, 0).is_some());

        // Edge crosses the screen but the radius is too large to rasterise
        let (n, _, _) = drawn(|g| g.draw_circle(80, -20_000, 20_050, Color::WHITE, true));
        assert_eq!(n, 0);

        for (cx, cy) in [(i32::MAX, i32::MAX), (i32::MIN, 0), (0, i32::MIN)] {
            let (n, _, windows) = drawn(|g| g.draw_circle(cx, cy, 10, Color::WHITE, true));
            assert_eq!((n, windows), (0, 0));
        }
        let (n, _, _) = drawn(|g| g.draw_circle(0, 0, -3, Color::WHITE, false));
        assert_eq!(n, 0);
    }

    #[test]
    fn test_extreme_rect_sizes_clip_at_screen_edge() {
        let (n, _, windows) = drawn(|g| g.draw_rect(10, 10, i32::MAX, 5, Color::WHITE, true));
        assert_eq!((n, windows), (150 * 5, 1));

        // Top and bottom edges only; both sides are off screen
        let (n, _, windows) = drawn(|g| g.draw_rect(-5, 10, i32::MAX, 3, Color::WHITE, false));
        assert_eq!((n, windows), (2 * 160, 2));

        let (n, _, windows) = drawn(|g| g.draw_rect(i32::MAX, i32::MAX, i32::MAX, i32::MAX, Color::WHITE, false));
        assert_eq!((n, windows), (0, 0));
    }

    proptest! {
        #[test]
        fn prop_filled_circle_covers_outline(
            cx in 0i32..160, cy in 0i32..128, r in 1i32..70,
        ) {
            let (_, outline, _) = drawn(|g| g.draw_circle(cx, cy, r, Color::WHITE, false));
            let (_, fill, _) = drawn(|g| g.draw_circle(cx, cy, r, Color::WHITE, true));

            for (x, y) in outline.written() {
                prop_assert!(fill.pixel(x, y).is_some(), "({}, {}) not filled", x, y);
            }
        }
    }
}
