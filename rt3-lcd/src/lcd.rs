//! Driver façade
//!
//! [`Lcd`] is what application tasks hold. Each method takes the port once,
//! runs its whole bus transaction and lets go, so two tasks drawing at the
//! same time never interleave their bytes. Callers that need several
//! primitives as one atomic update can take the port themselves through
//! [`Lcd::port`] and draw on the guard.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::bitmap::Bitmap;
use crate::color::Color;
use crate::font::FontOptions;
use crate::port::{Board, LcdPort, PortParts};
use crate::protocol::cmd;
use crate::revision::Revision;
use crate::text::{ClipRect, DrawContext};

/// LCD driver shared by every task that draws
pub struct Lcd<M: RawMutex, H: Board> {
    port: LcdPort<M, H>,
}

impl<M: RawMutex, H: Board> Lcd<M, H> {
    pub fn new(parts: PortParts<H>, revision: &'static Revision) -> Self {
        Self {
            port: LcdPort::new(parts, revision),
        }
    }

    /// The shared port, for the keypad scanner and multi-primitive updates
    pub fn port(&self) -> &LcdPort<M, H> {
        &self.port
    }

    pub fn revision(&self) -> &'static Revision {
        self.port.revision()
    }

    /// A text context covering the whole screen
    pub fn context(&self) -> DrawContext {
        DrawContext::new(self.revision())
    }

    /// Reset and configure the controller, then show `splash` or black
    ///
    /// The port stays locked for the whole sequence, including the delays
    /// the init table asks for. The display is switched on last so the
    /// panel never shows uninitialised frame memory.
    pub async fn init<D: DelayNs>(&self, delay: &mut D, splash: Option<&Bitmap<'_>>) {
        let rev = self.revision();
        let mut guard = self.port.acquire().await;

        #[cfg(feature = "defmt")]
        defmt::info!("LCD init: {}", rev.name);

        guard.hardware_reset(delay).await;

        for step in rev.init_sequence {
            guard.command(step.command, step.params);
            if step.delay_ms > 0 {
                delay.delay_ms(step.delay_ms as u32).await;
            }
        }

        match splash {
            Some(bitmap) => {
                guard.draw_bitmap(bitmap, 0, 0);
            }
            None => {
                guard.clear(Color::BLACK);
            }
        }

        guard.write_command(cmd::DISPON);
    }

    pub async fn fill_rect(&self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) -> u32 {
        self.port.acquire().await.fill_rect(x1, y1, x2, y2, color)
    }

    /// Fill the whole screen
    pub async fn clear(&self, color: Color) -> u32 {
        self.port.acquire().await.clear(color)
    }

    /// Set a single pixel; see [`PortGuard::set_pixel`](crate::PortGuard::set_pixel)
    pub async fn set_pixel(&self, x: i32, y: i32, color: Color) -> u32 {
        self.port.acquire().await.set_pixel(x, y, color)
    }

    pub async fn draw_line(&self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) -> u32 {
        self.port.acquire().await.draw_line(x0, y0, x1, y1, color)
    }

    pub async fn draw_circle(&self, cx: i32, cy: i32, r: i32, color: Color, filled: bool) -> u32 {
        self.port.acquire().await.draw_circle(cx, cy, r, color, filled)
    }

    pub async fn draw_rect(&self, x: i32, y: i32, w: i32, h: i32, color: Color, filled: bool) -> u32 {
        self.port.acquire().await.draw_rect(x, y, w, h, color, filled)
    }

    pub async fn draw_bitmap(&self, bitmap: &Bitmap<'_>, x: i32, y: i32) -> u32 {
        self.port.acquire().await.draw_bitmap(bitmap, x, y)
    }

    /// Draw a bitmap, skipping pixels equal to `key`
    pub async fn draw_bitmap_transparent(&self, bitmap: &Bitmap<'_>, x: i32, y: i32, key: Color) -> u32 {
        self.port.acquire().await.draw_bitmap_transparent(bitmap, x, y, key)
    }

    /// Draw one code page 437 glyph, returning the next x
    #[allow(clippy::too_many_arguments)]
    pub async fn draw_char(
        &self,
        code: u8,
        x: i32,
        y: i32,
        fg: Color,
        bg: Color,
        font: FontOptions,
        clip: &ClipRect,
    ) -> i32 {
        self.port.acquire().await.draw_char(code, x, y, fg, bg, font, clip)
    }

    pub async fn draw_string(&self, ctx: &mut DrawContext, text: &str) -> i32 {
        self.port.acquire().await.draw_string(ctx, text)
    }

    pub async fn draw_bytes(&self, ctx: &mut DrawContext, bytes: &[u8]) -> i32 {
        self.port.acquire().await.draw_bytes(ctx, bytes)
    }

    /// Formatted text, usually through `format_args!`
    pub async fn printf(&self, ctx: &mut DrawContext, args: fmt::Arguments<'_>) -> i32 {
        self.port.acquire().await.printf(ctx, args)
    }

    /// Full-screen test pattern
    pub async fn colour_gradient(&self) -> u32 {
        self.port.acquire().await.colour_gradient()
    }

    pub async fn set_backlight(&self, on: bool) {
        self.port.acquire().await.set_backlight(on);
    }

    /// Switch the panel output on or off; frame memory is kept
    pub async fn set_display_on(&self, on: bool) {
        let command = if on { cmd::DISPON } else { cmd::DISPOFF };
        self.port.acquire().await.write_command(command);
    }

    pub async fn set_inverted(&self, inverted: bool) {
        let command = if inverted { cmd::INVON } else { cmd::INVOFF };
        self.port.acquire().await.write_command(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::{MD380, MD390, ST7735_ROTATED};
    use crate::testing::{BusEvent, NoopDelay, RecordingBoard, Screen};
    use embassy_futures::join::join;
    use embassy_futures::{block_on, yield_now};

    #[test]
    fn test_init_runs_table_then_black_then_display_on() {
        for rev in [&MD380, &MD390, &ST7735_ROTATED] {
            let (lcd, rec) = RecordingBoard::lcd(rev);
            block_on(lcd.init(&mut NoopDelay, None));

            let rec = rec.borrow();
            let commands = rec.commands();
            let table: std::vec::Vec<u8> = rev.init_sequence.iter().map(|s| s.command).collect();
            assert_eq!(commands[..table.len()], table[..], "{}", rev.name);
            assert_eq!(
                commands[table.len()..],
                [cmd::CASET, cmd::RASET, cmd::RAMWR, cmd::DISPON],
                "{}",
                rev.name
            );
            assert_eq!(rec.pixels_written(), 160 * 128);

            // Reset pulse happens before any command
            let reset_low = rec.events.iter().position(|e| *e == BusEvent::Reset(false));
            let first_command = rec.events.iter().position(|e| matches!(e, BusEvent::Command(_)));
            assert!(reset_low < first_command);

            // One lock span for the whole sequence
            assert_eq!(rec.selections().len(), 1);
        }
    }

    #[test]
    fn test_init_with_splash() {
        let pixels = std::vec![0x1C1Fu16; 160 * 128];
        let splash = Bitmap::new(&pixels, 160, 128).unwrap();
        let (lcd, rec) = RecordingBoard::lcd(&MD380);

        block_on(lcd.init(&mut NoopDelay, Some(&splash)));

        let screen = Screen::replay(&MD380, &rec.borrow().events);
        assert_eq!(screen.pixel(0, 0), Some(Color(0x1C1F)));
        assert_eq!(screen.pixel(159, 127), Some(Color(0x1C1F)));
        assert_eq!(rec.borrow().commands().last(), Some(&cmd::DISPON));
    }

    #[test]
    fn test_every_call_is_one_selection() {
        let (lcd, rec) = RecordingBoard::lcd(&MD380);
        let mut ctx = lcd.context();

        block_on(async {
            lcd.fill_rect(0, 0, 9, 9, Color::WHITE).await;
            lcd.draw_line(0, 0, 20, 7, Color::WHITE).await;
            lcd.draw_circle(50, 50, 10, Color::WHITE, false).await;
            lcd.draw_string(&mut ctx, "two\nlines").await;
            lcd.printf(&mut ctx, format_args!("{}", 42)).await;
            lcd.set_inverted(true).await;
        });

        assert_eq!(rec.borrow().selections().len(), 6);
    }

    #[test]
    fn test_display_control_commands() {
        let (lcd, rec) = RecordingBoard::lcd(&MD380);

        block_on(async {
            lcd.set_display_on(false).await;
            lcd.set_display_on(true).await;
            lcd.set_inverted(true).await;
            lcd.set_inverted(false).await;
            lcd.set_backlight(true).await;
        });

        let rec = rec.borrow();
        assert_eq!(rec.commands(), [cmd::DISPOFF, cmd::DISPON, cmd::INVON, cmd::INVOFF]);
        assert!(rec.events.contains(&BusEvent::Backlight(true)));
    }

    /// Colours written by memory writes inside one chip-select span
    fn span_colours(span: &[BusEvent]) -> std::vec::Vec<u16> {
        let mut colours = std::vec::Vec::new();
        let mut in_ramwr = false;
        let mut high = None;

        for event in span {
            match *event {
                BusEvent::Command(c) => {
                    in_ramwr = c == cmd::RAMWR;
                    high = None;
                }
                BusEvent::Data(b) if in_ramwr => match high.take() {
                    None => high = Some(b),
                    Some(hi) => colours.push(u16::from_be_bytes([hi, b])),
                },
                _ => {}
            }
        }
        colours
    }

    #[test]
    fn test_concurrent_tasks_never_interleave() {
        let (lcd, rec) = RecordingBoard::lcd(&MD380);
        let red = MD380.layout.red();
        let blue = MD380.layout.blue();

        let holder = async {
            let mut guard = lcd.port().acquire().await;
            rec.borrow_mut().held_by("holder");
            guard.fill_rect(0, 0, 9, 0, red);
            // Give the other task a chance to run while the port is held
            yield_now().await;
            guard.fill_rect(0, 1, 9, 1, red);
        };
        let other = async {
            for row in 0..4 {
                let mut guard = lcd.port().acquire().await;
                rec.borrow_mut().held_by("other");
                guard.fill_rect(0, 10 + row, 9, 10 + row, blue);
                drop(guard);
                yield_now().await;
            }
        };
        block_on(join(holder, other));

        let rec = rec.borrow();
        let spans = rec.selections_by_holder();
        let holders: std::vec::Vec<_> = spans.iter().map(|(h, _)| *h).collect();
        assert_eq!(
            holders,
            [Some("holder"), Some("other"), Some("other"), Some("other"), Some("other")]
        );
        for (holder, span) in &spans {
            let expected = if *holder == Some("holder") { red.0 } else { blue.0 };
            let colours = span_colours(span);
            assert!(!colours.is_empty());
            assert!(colours.iter().all(|&c| c == expected), "{:?}", holder);
        }
        assert_eq!(span_colours(&spans[0].1).len(), 20);

        let screen = Screen::replay(&MD380, &rec.events);
        assert_eq!(screen.pixel(5, 1), Some(red));
        assert_eq!(screen.pixel(5, 13), Some(blue));
    }
}
