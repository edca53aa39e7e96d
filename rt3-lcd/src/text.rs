//! Text layout
//!
//! A [`DrawContext`] carries the cursor, clip rectangle, colours and font
//! options between calls. It is plain data owned by the calling task; only
//! the port it is drawn through is shared.
//!
//! Control characters inside a string:
//!
//! - `\n` moves the cursor back to the left margin one text line down
//! - `\r` first clears from the cursor to the clip's right edge, then acts
//!   like `\n`, so a status line can be redrawn without clearing the screen
//! - `\t` centres the text up to the next control character in the space
//!   left on the line
//!
//! The left margin is wherever the cursor was when the call started.

use core::fmt::{self, Write};

use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::font::{self, FontOptions, GLYPH_SIZE};
use crate::geometry::{span_end, Rect};
use crate::port::{Board, PortGuard};
use crate::protocol::Window;
use crate::revision::Revision;

/// Longest formatted string `printf` renders; anything past it is dropped
pub const PRINTF_CAPACITY: usize = 128;

/// Text clipping rectangle, corners inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClipRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ClipRect {
    /// The whole screen of `revision`
    pub const fn full(revision: &Revision) -> Self {
        Self {
            x1: 0,
            y1: 0,
            x2: revision.max_x(),
            y2: revision.max_y(),
        }
    }
}

/// Cursor, clip, colours and font for a run of text output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DrawContext {
    /// Where the next character goes
    pub x: i32,
    pub y: i32,
    pub fg: Color,
    pub bg: Color,
    pub font: FontOptions,
    pub clip: ClipRect,
}

impl DrawContext {
    /// White on black at the origin, clipped to the full screen
    pub const fn new(revision: &Revision) -> Self {
        Self {
            x: 0,
            y: 0,
            fg: Color::WHITE,
            bg: Color::BLACK,
            font: FontOptions::NORMAL,
            clip: ClipRect::full(revision),
        }
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }
}

/// `fmt::Write` sink that keeps what fits and silently drops the rest
struct Truncating<const N: usize>(String<N>);

impl<const N: usize> Write for Truncating<N> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if self.0.push(c).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// Render `args` into a bounded string
pub(crate) fn format_bounded(args: fmt::Arguments<'_>) -> String<PRINTF_CAPACITY> {
    let mut out = Truncating(String::new());
    // The sink never reports an error; a failing Display impl just ends the text early
    let _ = out.write_fmt(args);
    out.0
}

fn is_control(code: u8) -> bool {
    matches!(code, b'\n' | b'\r' | b'\t')
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    /// Draw one glyph with its top-left corner at `(x, y)`
    ///
    /// A glyph that runs past the clip rectangle's right or bottom edge (or
    /// the screen's) is cut down to the font columns and rows that still fit.
    /// Returns the x coordinate for the next character, or `x` unchanged when
    /// nothing was drawn.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_char(
        &mut self,
        code: u8,
        x: i32,
        y: i32,
        fg: Color,
        bg: Color,
        font: FontOptions,
        clip: &ClipRect,
    ) -> i32 {
        let rev = self.revision;
        let right = clip.x2.min(rev.max_x());
        let bottom = clip.y2.min(rev.max_y());
        if x < 0 || y < 0 || x > right || y > bottom {
            return x;
        }

        let (x_zoom, y_zoom) = (font.x_zoom() as i32, font.y_zoom() as i32);
        let size = GLYPH_SIZE as i32;
        let columns = size.min((right - x + 1) / x_zoom);
        let rows = size.min((bottom - y + 1) / y_zoom);
        if columns == 0 || rows == 0 {
            return x;
        }

        let x2 = x + x_zoom * columns - 1;
        let y2 = y + y_zoom * rows - 1;
        let rect = Rect {
            x1: x as u16,
            y1: y as u16,
            x2: x2 as u16,
            y2: y2 as u16,
        };
        let window = Window::from_rect(rev, &rect);
        self.open_window(window);

        let glyph = font::glyph(code);
        for (lx, ly) in window.scan(rev) {
            let gx = (lx as i32 - x) / x_zoom;
            let gy = (ly as i32 - y) / y_zoom;
            let lit = glyph[gy as usize] & (0x80 >> gx) != 0;
            self.write_pixel(if lit { fg } else { bg });
        }

        x2 + 1
    }

    /// Draw raw code page 437 bytes at the context's cursor
    ///
    /// Returns the cursor x afterwards; the context holds the full cursor.
    pub fn draw_bytes(&mut self, ctx: &mut DrawContext, bytes: &[u8]) -> i32 {
        self.draw_codes(ctx, bytes.iter().copied())
    }

    /// Draw a string at the context's cursor
    ///
    /// Characters without a code page 437 glyph show as `?`.
    pub fn draw_string(&mut self, ctx: &mut DrawContext, text: &str) -> i32 {
        self.draw_codes(ctx, text.chars().map(font::cp437))
    }

    /// Format and draw, keeping at most [`PRINTF_CAPACITY`] characters
    pub fn printf(&mut self, ctx: &mut DrawContext, args: fmt::Arguments<'_>) -> i32 {
        let text = format_bounded(args);
        self.draw_string(ctx, &text)
    }

    fn draw_codes<I>(&mut self, ctx: &mut DrawContext, codes: I) -> i32
    where
        I: Iterator<Item = u8> + Clone,
    {
        let margin = ctx.x;
        let line = ctx.font.char_height() as i32;
        let width = ctx.font.char_width() as i32;

        let mut rest = codes;
        while let Some(code) = rest.next() {
            match code {
                b'\r' | b'\n' => {
                    if code == b'\r' {
                        self.fill_rect(ctx.x, ctx.y, ctx.clip.x2, span_end(ctx.y, line), ctx.bg);
                    }
                    ctx.x = margin;
                    ctx.y = ctx.y.saturating_add(line);
                }
                b'\t' => {
                    let run = rest.clone().take_while(|&c| !is_control(c)).count() as i64;
                    let gap = (ctx.clip.x2 as i64 - ctx.x as i64 - run * width as i64) / 2;
                    if let Ok(half @ 1..) = i32::try_from(gap) {
                        self.fill_rect(ctx.x, ctx.y, span_end(ctx.x, half), span_end(ctx.y, line), ctx.bg);
                        ctx.x = ctx.x.saturating_add(half);
                    }
                }
                _ => {
                    ctx.x = self.draw_char(code, ctx.x, ctx.y, ctx.fg, ctx.bg, ctx.font, &ctx.clip);
                }
            }
        }
        ctx.x
    }
}
