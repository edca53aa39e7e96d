//! Controller command protocol
//!
//! Command opcodes and the byte-level transactions every drawing primitive
//! is built from. The controller family (HX8302/HX8353, ST7735) is driven
//! through an auto-incrementing output window:
//!
//! ```text
//! CASET  c1 c2    column range
//! RASET  r1 r2    row range
//! RAMWR           start memory write at (c1, r1)
//! <pixel> * N     N = (c2 - c1 + 1) * (r2 - r1 + 1), high byte first
//! ```
//!
//! Exactly `N` pixels must follow `RAMWR` before anything else is sent,
//! otherwise the controller's write pointer and ours drift apart. A `NOP`
//! command ends a memory write early.

use embassy_sync::blocking_mutex::raw::RawMutex;
use rt3_hal::LcdBus;

use crate::color::Color;
use crate::geometry::{self, Rect};
use crate::port::{Board, PortGuard};
use crate::revision::{AddressEncoding, Revision};

/// Controller command opcodes
#[allow(dead_code)]
pub mod cmd {
    pub const NOP: u8 = 0x00;
    pub const SWRESET: u8 = 0x01;
    pub const RDDID: u8 = 0x04;
    pub const RDDST: u8 = 0x09;
    pub const SLPIN: u8 = 0x10;
    pub const SLPOUT: u8 = 0x11;
    pub const PTLON: u8 = 0x12;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const GAMSET: u8 = 0x26;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const RAMRD: u8 = 0x2E;
    pub const PTLAR: u8 = 0x30;
    pub const TEOFF: u8 = 0x34;
    pub const TEON: u8 = 0x35;
    pub const MADCTL: u8 = 0x36;
    pub const IDMOFF: u8 = 0x38;
    pub const IDMON: u8 = 0x39;
    pub const COLMOD: u8 = 0x3A;

    // HX8302/HX8353 extended set
    pub const SETOSC: u8 = 0xB0;
    pub const SETPWCTR: u8 = 0xB1;
    pub const SETDISPLAY: u8 = 0xB2;
    pub const SETCYC: u8 = 0xB4;
    pub const SETBGP: u8 = 0xB5;
    pub const SETVCOM: u8 = 0xB6;
    pub const SETEXTC: u8 = 0xB9;
    pub const SETSTBA: u8 = 0xC0;
    pub const SETPANEL: u8 = 0xCC;
    pub const SETGAMMA: u8 = 0xE0;

    // ST7735 names for the same opcode range
    pub const FRMCTR1: u8 = 0xB1;
    pub const FRMCTR2: u8 = 0xB2;
    pub const INVCTR: u8 = 0xB4;
    pub const PWCTR1: u8 = 0xC0;
    pub const VMCTR1: u8 = 0xC5;
    pub const GMCTRP1: u8 = 0xE0;
    pub const GMCTRN1: u8 = 0xE1;
}

/// An output window in controller coordinates, inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Window {
    pub col_start: u16,
    pub col_end: u16,
    pub row_start: u16,
    pub row_end: u16,
}

impl Window {
    /// Controller window covering an on-screen rectangle
    pub fn from_rect(revision: &Revision, rect: &Rect) -> Self {
        let (ca, ra) = revision.to_panel(rect.x1, rect.y1);
        let (cb, rb) = revision.to_panel(rect.x2, rect.y2);
        Self {
            col_start: ca.min(cb),
            col_end: ca.max(cb),
            row_start: ra.min(rb),
            row_end: ra.max(rb),
        }
    }

    /// Number of pixels the window holds
    pub fn area(&self) -> u32 {
        (self.col_end - self.col_start + 1) as u32 * (self.row_end - self.row_start + 1) as u32
    }

    /// Points in the order the controller fills them, as logical coordinates
    pub fn scan(self, revision: &Revision) -> impl Iterator<Item = (u16, u16)> + '_ {
        (self.row_start..=self.row_end).flat_map(move |row| {
            (self.col_start..=self.col_end).map(move |col| revision.to_logical(col, row))
        })
    }
}

fn encode_range(encoding: AddressEncoding, start: u16, end: u16) -> [u8; 4] {
    match encoding {
        // Only the low byte is latched; 160 fits
        AddressEncoding::Doubled => [start as u8, start as u8, end as u8, end as u8],
        AddressEncoding::Wide => {
            let [sh, sl] = start.to_be_bytes();
            let [eh, el] = end.to_be_bytes();
            [sh, sl, eh, el]
        }
    }
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    /// Send a command byte
    pub fn write_command(&mut self, command: u8) {
        self.bus().write_command(command);
    }

    /// Send a parameter or data byte
    pub fn write_data(&mut self, data: u8) {
        self.bus().write_data(data);
    }

    /// Send a run of parameter bytes
    pub fn write_data_all(&mut self, data: &[u8]) {
        self.bus().write_data_all(data);
    }

    /// Send a command followed by its parameters
    pub fn command(&mut self, command: u8, params: &[u8]) {
        let bus = self.bus();
        bus.write_command(command);
        bus.write_data_all(params);
    }

    /// Stream one pixel, high byte first
    pub fn write_pixel(&mut self, color: Color) {
        let [hi, lo] = color.to_be_bytes();
        let bus = self.bus();
        bus.write_data(hi);
        bus.write_data(lo);
    }

    /// Stream the same pixel `count` times
    pub fn write_pixels(&mut self, color: Color, count: u32) {
        let [hi, lo] = color.to_be_bytes();
        let bus = self.bus();
        for _ in 0..count {
            bus.write_data(hi);
            bus.write_data(lo);
        }
    }

    /// Stream a run of raw pixels
    pub fn write_pixel_slice(&mut self, pixels: &[u16]) {
        let bus = self.bus();
        for &raw in pixels {
            let [hi, lo] = raw.to_be_bytes();
            bus.write_data(hi);
            bus.write_data(lo);
        }
    }

    /// End an open memory write without sending its remaining pixels
    pub fn nop(&mut self) {
        self.write_command(cmd::NOP);
    }

    /// Open a controller window and start a memory write
    ///
    /// Returns the number of pixels that must follow.
    pub fn open_window(&mut self, window: Window) -> u32 {
        let encoding = self.revision.address_encoding;
        let columns = encode_range(encoding, window.col_start, window.col_end);
        let rows = encode_range(encoding, window.row_start, window.row_end);

        self.command(cmd::CASET, &columns);
        self.command(cmd::RASET, &rows);
        self.write_command(cmd::RAMWR);
        window.area()
    }

    /// Clip an on-screen rectangle and open it for writing
    ///
    /// Coordinates are inclusive and may lie off-screen. Returns the number
    /// of pixels that must follow, or `0` with nothing sent when no part of
    /// the rectangle is visible or its corners are out of order.
    pub fn set_output_rect(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) -> u32 {
        match geometry::clip(self.revision, x1, y1, x2, y2) {
            Some(rect) => {
                let window = Window::from_rect(self.revision, &rect);
                self.open_window(window)
            }
            None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revision::{MD380, ST7735_ROTATED};
    use crate::testing::{BusEvent, RecordingBoard};
    use embassy_futures::block_on;
    use proptest::prelude::*;

    fn rect_bytes(rev: &'static Revision, x1: i32, y1: i32, x2: i32, y2: i32) -> (u32, Vec<BusEvent>) {
        let (port, rec) = RecordingBoard::port(rev);
        let n = block_on(async {
            let mut guard = port.acquire().await;
            rec.borrow_mut().events.clear();
            guard.set_output_rect(x1, y1, x2, y2)
        });
        let events = rec
            .borrow()
            .events
            .iter()
            .filter(|e| matches!(e, BusEvent::Command(_) | BusEvent::Data(_)))
            .cloned()
            .collect();
        (n, events)
    }

    #[test]
    fn test_doubled_address_encoding() {
        let (n, events) = rect_bytes(&MD380, 10, 20, 30, 25);

        assert_eq!(n, 21 * 6);
        assert_eq!(
            events,
            [
                BusEvent::Command(cmd::CASET),
                BusEvent::Data(10),
                BusEvent::Data(10),
                BusEvent::Data(30),
                BusEvent::Data(30),
                BusEvent::Command(cmd::RASET),
                BusEvent::Data(20),
                BusEvent::Data(20),
                BusEvent::Data(25),
                BusEvent::Data(25),
                BusEvent::Command(cmd::RAMWR),
            ]
        );
    }

    #[test]
    fn test_rotated_panel_swaps_and_mirrors_window() {
        // x 10..=30 becomes the row range, y 20..=25 the mirrored column range
        let (n, events) = rect_bytes(&ST7735_ROTATED, 10, 20, 30, 25);

        assert_eq!(n, 21 * 6);
        assert_eq!(
            events,
            [
                BusEvent::Command(cmd::CASET),
                BusEvent::Data(0),
                BusEvent::Data(102),
                BusEvent::Data(0),
                BusEvent::Data(107),
                BusEvent::Command(cmd::RASET),
                BusEvent::Data(0),
                BusEvent::Data(10),
                BusEvent::Data(0),
                BusEvent::Data(30),
                BusEvent::Command(cmd::RAMWR),
            ]
        );
    }

    #[test]
    fn test_clamps_to_screen() {
        let (n, _) = rect_bytes(&MD380, -5, -5, 500, 500);
        assert_eq!(n, 160 * 128);
    }

    #[test]
    fn test_pixels_go_high_byte_first() {
        let (port, rec) = RecordingBoard::port(&MD380);
        block_on(async {
            let mut guard = port.acquire().await;
            rec.borrow_mut().events.clear();
            guard.write_pixel(Color(0x1C1F));
            guard.write_pixels(Color(0xABCD), 2);
            guard.write_pixel_slice(&[0x0102]);
        });

        let data: Vec<_> = rec
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Data(b) => Some(*b),
                _ => None,
            })
            .collect();
        assert_eq!(data, [0x1C, 0x1F, 0xAB, 0xCD, 0xAB, 0xCD, 0x01, 0x02]);
    }

    #[test]
    fn test_scan_order_follows_controller() {
        let rect = Rect {
            x1: 0,
            y1: 0,
            x2: 1,
            y2: 1,
        };

        let w = Window::from_rect(&MD380, &rect);
        let order: Vec<_> = w.scan(&MD380).collect();
        assert_eq!(order, [(0, 0), (1, 0), (0, 1), (1, 1)]);

        // Rotated: column (mirrored y) moves fastest
        let w = Window::from_rect(&ST7735_ROTATED, &rect);
        let order: Vec<_> = w.scan(&ST7735_ROTATED).collect();
        assert_eq!(order, [(0, 1), (0, 0), (1, 1), (1, 0)]);
    }

    proptest! {
        #[test]
        fn prop_out_of_order_rect_sends_nothing(
            x1 in 0i32..160, y1 in 0i32..128, dx in 1i32..50, dy in 0i32..50,
        ) {
            let (n, events) = rect_bytes(&MD380, x1, y1, x1 - dx, y1 + dy);
            prop_assert_eq!(n, 0);
            prop_assert!(events.is_empty());

            let (n, events) = rect_bytes(&MD380, x1, y1 + dx, x1 + dy, y1);
            prop_assert_eq!(n, 0);
            prop_assert!(events.is_empty());
        }

        #[test]
        fn prop_area_matches_clamped_corners(
            x1 in -20i32..180, y1 in -20i32..150, w in 1i32..200, h in 1i32..150,
        ) {
            let (x2, y2) = (x1 + w - 1, y1 + h - 1);
            let (n, _) = rect_bytes(&MD380, x1, y1, x2, y2);

            let cx = (x2.min(159) - x1.max(0) + 1).max(0);
            let cy = (y2.min(127) - y1.max(0) + 1).max(0);
            let visible = x1 <= 159 && y1 <= 127 && x2 >= 0 && y2 >= 0;
            let expected = if visible { (cx * cy) as u32 } else { 0 };
            prop_assert_eq!(n, expected);
        }
    }
}
