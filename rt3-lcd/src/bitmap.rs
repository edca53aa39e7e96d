//! Bitmap blits
//!
//! A bitmap is a borrowed row-major buffer of raw panel pixels. Opaque blits
//! stream the visible part through one window. Colour-keyed blits skip
//! transparent pixels by ending the current memory write and opening a new
//! window at the next opaque pixel, so the cost grows with the number of
//! opaque runs rather than the number of pixels.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::color::Color;
use crate::geometry::{self, span_end};
use crate::port::{Board, PortGuard};
use crate::protocol::Window;
use crate::revision::TransparencyMode;

/// Bitmap construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitmapError {
    /// Width or height is zero
    ZeroSize,
    /// Fewer than `width * height` pixels supplied
    BufferTooSmall,
}

/// Row-major pixel buffer, already in the panel's channel layout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bitmap<'a> {
    pixels: &'a [u16],
    width: u16,
    height: u16,
}

impl<'a> Bitmap<'a> {
    /// Wrap a pixel buffer
    ///
    /// Extra pixels past `width * height` are ignored.
    pub const fn new(pixels: &'a [u16], width: u16, height: u16) -> Result<Self, BitmapError> {
        if width == 0 || height == 0 {
            return Err(BitmapError::ZeroSize);
        }
        if pixels.len() < width as usize * height as usize {
            return Err(BitmapError::BufferTooSmall);
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    pub const fn width(&self) -> u16 {
        self.width
    }

    pub const fn height(&self) -> u16 {
        self.height
    }

    /// The `width * height` pixels of the image
    pub fn pixels(&self) -> &'a [u16] {
        &self.pixels[..self.width as usize * self.height as usize]
    }

    /// Pixel at bitmap-relative `(x, y)`
    pub fn pixel(&self, x: u16, y: u16) -> u16 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// State of the output window during a colour-keyed blit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    None,
    /// Rest of one controller row
    Line,
    /// Down to the bottom edge
    Full,
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    /// Draw a bitmap with its top-left corner at `(x, y)`
    ///
    /// Only the on-screen part is sent. Returns the number of pixels
    /// written.
    pub fn draw_bitmap(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32) -> u32 {
        let rev = self.revision;
        let (w, h) = (bitmap.width as i32, bitmap.height as i32);
        let Some(rect) = geometry::clip(rev, x, y, span_end(x, w), span_end(y, h)) else {
            return 0;
        };
        let window = Window::from_rect(rev, &rect);
        let n = self.open_window(window);

        if n == bitmap.width as u32 * bitmap.height as u32 && !rev.swap_axes && !rev.mirror_y {
            self.write_pixel_slice(bitmap.pixels());
        } else {
            for (lx, ly) in window.scan(rev) {
                let px = bitmap.pixel((lx as i32 - x) as u16, (ly as i32 - y) as u16);
                self.write_pixel(Color(px));
            }
        }
        n
    }

    /// Draw a bitmap, leaving pixels equal to `key` untouched on screen
    ///
    /// A bitmap made up entirely of `key` sends nothing at all. Returns the
    /// number of pixels written.
    ///
    /// Windows are tracked in controller order. A transparent pixel ends the
    /// open memory write with `NOP`. The next opaque pixel opens either the
    /// whole remaining area (first column) or, mid-row, what the revision's
    /// [`TransparencyMode`] prescribes:
    ///
    /// - `PerRun`: the rest of that row only
    /// - `RowFlag`: everything to the bottom edge; any row that contained a
    ///   transparent pixel ends the open write before the next row starts
    pub fn draw_bitmap_transparent(&mut self, bitmap: &Bitmap<'_>, x: i32, y: i32, key: Color) -> u32 {
        let rev = self.revision;
        let (w, h) = (bitmap.width as i32, bitmap.height as i32);
        let Some(rect) = geometry::clip(rev, x, y, span_end(x, w), span_end(y, h)) else {
            return 0;
        };
        let area = Window::from_rect(rev, &rect);
        let mode = rev.transparency;

        let mut open = Open::None;
        let mut row_had_key = false;
        let mut n = 0;

        for row in area.row_start..=area.row_end {
            if mode == TransparencyMode::RowFlag && row_had_key && open != Open::None {
                self.nop();
                open = Open::None;
            }
            row_had_key = false;

            for col in area.col_start..=area.col_end {
                let (lx, ly) = rev.to_logical(col, row);
                let px = bitmap.pixel((lx as i32 - x) as u16, (ly as i32 - y) as u16);

                if px == key.0 {
                    row_had_key = true;
                    if open != Open::None {
                        self.nop();
                        open = Open::None;
                    }
                    continue;
                }

                if open == Open::None {
                    let window = if col == area.col_start || mode == TransparencyMode::RowFlag {
                        open = Open::Full;
                        Window {
                            col_start: col,
                            row_start: row,
                            ..area
                        }
                    } else {
                        open = Open::Line;
                        Window {
                            col_start: col,
                            row_start: row,
                            row_end: row,
                            ..area
                        }
                    };
                    self.open_window(window);
                }
                self.write_pixel(Color(px));
                n += 1;
            }

            if open == Open::Line {
                open = Open::None;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::cmd;
    use crate::revision::{Revision, MD380, ST7735_ROTATED};
    use crate::testing::{RecordingBoard, Screen, Shared};
    use embassy_futures::block_on;

    static ROW_FLAG: Revision = Revision {
        name: "row flag",
        transparency: TransparencyMode::RowFlag,
        ..MD380
    };

    static ROTATED_PER_RUN: Revision = Revision {
        name: "rotated per run",
        transparency: TransparencyMode::PerRun,
        ..ST7735_ROTATED
    };

    const K: u16 = 0xF81F;
    const O: u16 = 0x07E0;

    fn blit(rev: &'static Revision, bitmap: &Bitmap<'_>, x: i32, y: i32, keyed: bool) -> (u32, Shared) {
        let (port, rec) = RecordingBoard::port(rev);
        let n = block_on(async {
            let mut guard = port.acquire().await;
            if keyed {
                guard.draw_bitmap_transparent(bitmap, x, y, Color(K))
            } else {
                guard.draw_bitmap(bitmap, x, y)
            }
        });
        (n, rec)
    }

    fn count(rec: &Shared, command: u8) -> usize {
        rec.borrow().commands().iter().filter(|&&c| c == command).count()
    }

    #[test]
    fn test_bitmap_new_validates() {
        let buf = [0u16; 6];
        assert_eq!(Bitmap::new(&buf, 0, 3), Err(BitmapError::ZeroSize));
        assert_eq!(Bitmap::new(&buf, 4, 2), Err(BitmapError::BufferTooSmall));
        let bmp = Bitmap::new(&buf, 3, 2).unwrap();
        assert_eq!(bmp.pixels().len(), 6);
    }

    #[test]
    fn test_opaque_blit_clips_to_screen() {
        let buf = [0x1234u16; 16];
        let bmp = Bitmap::new(&buf, 4, 4).unwrap();

        let (n, rec) = blit(&MD380, &bmp, 158, -1, false);
        assert_eq!(n, 2 * 3);
        assert_eq!(rec.borrow().pixels_written(), 6);

        let screen = Screen::replay(&MD380, &rec.borrow().events);
        assert_eq!(screen.pixel(159, 2), Some(Color(0x1234)));
        assert_eq!(screen.overflow, 0);
    }

    #[test]
    fn test_opaque_blit_on_rotated_panel() {
        let buf = [1u16, 2, 3, 4, 5, 6];
        let bmp = Bitmap::new(&buf, 3, 2).unwrap();

        let (n, rec) = blit(&ST7735_ROTATED, &bmp, 10, 20, false);
        assert_eq!(n, 6);

        let screen = Screen::replay(&ST7735_ROTATED, &rec.borrow().events);
        for (i, &px) in buf.iter().enumerate() {
            let (bx, by) = (i as u16 % 3, i as u16 / 3);
            assert_eq!(screen.pixel(10 + bx, 20 + by), Some(Color(px)));
        }
    }

    #[test]
    fn test_fully_transparent_bitmap_sends_nothing() {
        let buf = [K; 12];
        let bmp = Bitmap::new(&buf, 4, 3).unwrap();

        for rev in [&MD380, &ROW_FLAG, &ST7735_ROTATED] {
            let (n, rec) = blit(rev, &bmp, 5, 5, true);
            assert_eq!(n, 0);
            assert!(rec.borrow().commands().is_empty(), "{}", rev.name);
        }
    }

    #[test]
    fn test_opaque_rows_share_one_window() {
        let buf = [O; 12];
        let bmp = Bitmap::new(&buf, 4, 3).unwrap();

        let (n, rec) = blit(&MD380, &bmp, 0, 0, true);
        assert_eq!(n, 12);
        assert_eq!(count(&rec, cmd::RAMWR), 1);
        assert_eq!(count(&rec, cmd::NOP), 0);
    }

    #[test]
    fn test_mid_row_run_per_revision() {
        #[rustfmt::skip]
        let buf = [
            O, K, O,
            O, O, O,
        ];
        let bmp = Bitmap::new(&buf, 3, 2).unwrap();

        // Per run: full, NOP, rest-of-row, full again
        let (n, rec) = blit(&MD380, &bmp, 20, 30, true);
        assert_eq!(n, 5);
        assert_eq!(count(&rec, cmd::RAMWR), 3);
        assert_eq!(count(&rec, cmd::NOP), 1);
        let per_run = Screen::replay(&MD380, &rec.borrow().events);

        // Row flag: the mid-row window runs to the bottom and is cut at the row end
        let (n, rec) = blit(&ROW_FLAG, &bmp, 20, 30, true);
        assert_eq!(n, 5);
        assert_eq!(count(&rec, cmd::RAMWR), 3);
        assert_eq!(count(&rec, cmd::NOP), 2);
        let row_flag = Screen::replay(&ROW_FLAG, &rec.borrow().events);

        assert_eq!(per_run.written(), row_flag.written());
        assert_eq!(per_run.pixel(21, 30), None);
        assert_eq!(per_run.pixel(22, 30), Some(Color(O)));
        assert_eq!(row_flag.pixel(22, 31), Some(Color(O)));
    }

    #[test]
    fn test_keyed_blit_matches_bitmap_on_every_revision() {
        #[rustfmt::skip]
        let buf = [
            K, O, O, K,
            O, K, K, O,
            O, O, O, O,
            K, K, O, K,
        ];
        let bmp = Bitmap::new(&buf, 4, 4).unwrap();

        for rev in [&MD380, &ROW_FLAG, &ST7735_ROTATED] {
            let (n, rec) = blit(rev, &bmp, 40, 50, true);
            assert_eq!(n, 9, "{}", rev.name);

            let screen = Screen::replay(rev, &rec.borrow().events);
            assert_eq!(screen.overflow, 0, "{}", rev.name);
            for (i, &px) in buf.iter().enumerate() {
                let (bx, by) = (40 + i as u16 % 4, 50 + i as u16 / 4);
                let expected = (px != K).then_some(Color(px));
                assert_eq!(screen.pixel(bx, by), expected, "{} at ({}, {})", rev.name, bx, by);
            }
        }
    }

    #[test]
    fn test_blits_at_extreme_positions_send_nothing() {
        let buf = [O; 16];
        let bmp = Bitmap::new(&buf, 4, 4).unwrap();

        for (x, y) in [(i32::MAX, 0), (0, i32::MAX), (i32::MIN, i32::MIN), (i32::MAX - 2, i32::MAX - 2)] {
            for keyed in [false, true] {
                let (n, rec) = blit(&MD380, &bmp, x, y, keyed);
                assert_eq!(n, 0, "({}, {})", x, y);
                assert!(rec.borrow().commands().is_empty());
            }
        }

        // Last column only
        let (n, rec) = blit(&MD380, &bmp, -3, 0, false);
        assert_eq!(n, 4);
        assert_eq!(rec.borrow().pixels_written(), 4);
    }

    #[test]
    fn test_keyed_blit_clipped_at_corner_on_every_mode() {
        #[rustfmt::skip]
        let buf = [
            K, O, O, K,
            O, K, K, O,
            O, O, O, O,
            K, K, O, K,
        ];
        let bmp = Bitmap::new(&buf, 4, 4).unwrap();

        // Only bitmap columns 2..=3 of rows 0..=1 land on screen
        for rev in [&MD380, &ROW_FLAG, &ST7735_ROTATED, &ROTATED_PER_RUN] {
            let (n, rec) = blit(rev, &bmp, -2, 126, true);
            assert_eq!(n, 2, "{}", rev.name);

            let screen = Screen::replay(rev, &rec.borrow().events);
            assert_eq!(screen.overflow, 0, "{}", rev.name);
            assert_eq!(screen.pixel(0, 126), Some(Color(O)), "{}", rev.name);
            assert_eq!(screen.pixel(1, 126), None, "{}", rev.name);
            assert_eq!(screen.pixel(0, 127), None, "{}", rev.name);
            assert_eq!(screen.pixel(1, 127), Some(Color(O)), "{}", rev.name);
            assert_eq!(screen.written().len(), 2, "{}", rev.name);
        }
    }
}
