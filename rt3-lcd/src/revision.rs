//! Hardware-revision capability records
//!
//! The radios in this family ship with several panels that all speak the
//! same command set but differ in how they are mounted, which colour layout
//! they expect, how coordinates are encoded and how they are brought up. One
//! driver serves them all; each difference is a field here rather than a
//! branch in the drawing code.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::ChannelLayout;
use crate::protocol::cmd;

/// How column/row address parameters are sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddressEncoding {
    /// Each coordinate byte sent twice: `start, start, end, end`
    ///
    /// The HX8302 panels ignore the high byte and latch the second write.
    Doubled,
    /// 16-bit big-endian start and end: `0, start, 0, end`
    Wide,
}

/// Rectangle bookkeeping used by transparent bitmap blits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TransparencyMode {
    /// Close on every transparent pixel, reopen per opaque run
    ///
    /// Runs starting a row reopen the remaining rectangle; runs starting
    /// mid-row reopen only the rest of that row.
    PerRun,
    /// Reopen to the bottom edge and track a per-row transparency flag
    ///
    /// Any row that contained a transparent pixel forces the rectangle to
    /// be reopened at the start of the next row, whether or not that row is
    /// itself transparent.
    RowFlag,
}

/// One step of a controller initialization table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InitCommand {
    /// Command byte
    pub command: u8,
    /// Parameter bytes sent after the command
    pub params: &'static [u8],
    /// Wait after the parameters, in milliseconds
    pub delay_ms: u16,
}

impl InitCommand {
    /// Command with parameters and no delay
    pub const fn new(command: u8, params: &'static [u8]) -> Self {
        Self {
            command,
            params,
            delay_ms: 0,
        }
    }

    /// Command with parameters followed by a delay
    pub const fn with_delay(command: u8, params: &'static [u8], delay_ms: u16) -> Self {
        Self {
            command,
            params,
            delay_ms,
        }
    }
}

/// Immutable description of one panel revision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Revision {
    /// Human-readable name, for logs
    pub name: &'static str,
    /// Logical width in pixels
    pub width: u16,
    /// Logical height in pixels
    pub height: u16,
    /// Panel is mounted rotated: X goes to the row address, Y to the column
    pub swap_axes: bool,
    /// Logical Y is sent as `height - 1 - y`
    pub mirror_y: bool,
    /// Channel layout of packed colours
    pub layout: ChannelLayout,
    /// Coordinate parameter encoding
    pub address_encoding: AddressEncoding,
    /// Transparent blit strategy
    pub transparency: TransparencyMode,
    /// Minimum bus settle time around chip-select transitions, nanoseconds
    pub settle_ns: u32,
    /// Also wait `settle_ns` before deasserting chip-select
    pub settle_on_release: bool,
    /// Commands run after the hardware reset pulse
    pub init_sequence: &'static [InitCommand],
}

impl Revision {
    /// Largest valid X coordinate
    pub const fn max_x(&self) -> i32 {
        self.width as i32 - 1
    }

    /// Largest valid Y coordinate
    pub const fn max_y(&self) -> i32 {
        self.height as i32 - 1
    }

    /// Number of pixels on the panel
    pub const fn pixel_count(&self) -> u32 {
        self.width as u32 * self.height as u32
    }

    /// Number of controller columns (the fast-incrementing address)
    pub const fn panel_columns(&self) -> u16 {
        if self.swap_axes {
            self.height
        } else {
            self.width
        }
    }

    /// Number of controller rows
    pub const fn panel_rows(&self) -> u16 {
        if self.swap_axes {
            self.width
        } else {
            self.height
        }
    }

    /// Map an on-screen logical point to controller `(column, row)`
    pub const fn to_panel(&self, x: u16, y: u16) -> (u16, u16) {
        let y = if self.mirror_y {
            self.height - 1 - y
        } else {
            y
        };
        if self.swap_axes {
            (y, x)
        } else {
            (x, y)
        }
    }

    /// Map a controller `(column, row)` back to the logical point
    pub const fn to_logical(&self, column: u16, row: u16) -> (u16, u16) {
        let (x, y) = if self.swap_axes {
            (row, column)
        } else {
            (column, row)
        };
        if self.mirror_y {
            (x, self.height - 1 - y)
        } else {
            (x, y)
        }
    }
}

/// Hardware reset pulse: low time and recovery time, milliseconds
pub const RESET_PULSE_MS: u32 = 120;

/// Settle time of a few CPU cycles at 168 MHz
const FSMC_SETTLE_NS: u32 = 25;

const HX8302_MD380_INIT: &[InitCommand] = &[
    InitCommand::new(cmd::COLMOD, &[0x05]), // 16 bpp
    InitCommand::new(cmd::MADCTL, &[0xA8]),
    InitCommand::new(cmd::SETCYC, &[0x00]), // column inversion, 89 clocks per line
    InitCommand::with_delay(cmd::SLPOUT, &[], 130),
];

const HX8302_MD390_INIT: &[InitCommand] = &[
    InitCommand::new(cmd::COLMOD, &[0x05]),
    InitCommand::new(cmd::MADCTL, &[0x60]),
    InitCommand::new(cmd::SETCYC, &[0x00]),
    InitCommand::with_delay(cmd::SLPOUT, &[], 130),
];

const ST7735_ROTATED_INIT: &[InitCommand] = &[
    InitCommand::with_delay(cmd::SWRESET, &[], 150),
    InitCommand::with_delay(cmd::SLPOUT, &[], 255),
    InitCommand::new(cmd::FRMCTR1, &[0x01, 0x2C, 0x2D]),
    InitCommand::new(cmd::INVCTR, &[0x07]),
    InitCommand::with_delay(cmd::COLMOD, &[0x05], 10),
    InitCommand::new(cmd::MADCTL, &[0x08]), // BGR order, native scan direction
    InitCommand::new(cmd::INVOFF, &[]),
    InitCommand::with_delay(cmd::NORON, &[], 10),
];

/// MD-380 / RT3: HX8302-A on the FSMC bus
pub const MD380: Revision = Revision {
    name: "MD-380 HX8302",
    width: 160,
    height: 128,
    swap_axes: false,
    mirror_y: false,
    layout: ChannelLayout::RGB565,
    address_encoding: AddressEncoding::Doubled,
    transparency: TransparencyMode::PerRun,
    settle_ns: FSMC_SETTLE_NS,
    settle_on_release: false,
    init_sequence: HX8302_MD380_INIT,
};

/// MD-390: same controller, different memory access order
pub const MD390: Revision = Revision {
    name: "MD-390 HX8302",
    init_sequence: HX8302_MD390_INIT,
    ..MD380
};

/// ST7735R panel mounted rotated, on a bit-banged register-select bus
pub const ST7735_ROTATED: Revision = Revision {
    name: "ST7735R rotated",
    width: 160,
    height: 128,
    swap_axes: true,
    mirror_y: true,
    layout: ChannelLayout::BGR565,
    address_encoding: AddressEncoding::Wide,
    transparency: TransparencyMode::RowFlag,
    settle_ns: FSMC_SETTLE_NS,
    settle_on_release: true,
    init_sequence: ST7735_ROTATED_INIT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_extent() {
        assert_eq!(MD380.max_x(), 159);
        assert_eq!(MD380.max_y(), 127);
        assert_eq!(MD380.pixel_count(), 160 * 128);
    }

    #[test]
    fn test_md390_differs_only_in_init() {
        assert_eq!(MD390.layout, MD380.layout);
        assert_eq!(MD390.address_encoding, MD380.address_encoding);
        assert_ne!(MD390.init_sequence, MD380.init_sequence);

        let madctl = |rev: &Revision| {
            rev.init_sequence
                .iter()
                .find(|c| c.command == cmd::MADCTL)
                .map(|c| c.params[0])
        };
        assert_eq!(madctl(&MD380), Some(0xA8));
        assert_eq!(madctl(&MD390), Some(0x60));
    }

    #[test]
    fn test_panel_mapping_round_trips() {
        for rev in [MD380, ST7735_ROTATED] {
            for (x, y) in [(0, 0), (159, 0), (0, 127), (42, 17), (159, 127)] {
                let (col, row) = rev.to_panel(x, y);
                assert!(col < rev.panel_columns(), "{}", rev.name);
                assert!(row < rev.panel_rows(), "{}", rev.name);
                assert_eq!(rev.to_logical(col, row), (x, y), "{}", rev.name);
            }
        }
    }

    #[test]
    fn test_rotated_panel_swaps_and_mirrors() {
        // Top-left of the screen is the last column of the first row
        assert_eq!(ST7735_ROTATED.to_panel(0, 0), (127, 0));
        assert_eq!(ST7735_ROTATED.to_panel(10, 20), (107, 10));
        assert_eq!(ST7735_ROTATED.panel_columns(), 128);
        assert_eq!(ST7735_ROTATED.panel_rows(), 160);

        assert_eq!(MD380.to_panel(10, 20), (10, 20));
    }

    #[test]
    fn test_init_tables_select_16bpp() {
        for rev in [MD380, MD390, ST7735_ROTATED] {
            let colmod = rev
                .init_sequence
                .iter()
                .find(|c| c.command == cmd::COLMOD)
                .map(|c| c.params);
            assert_eq!(colmod, Some(&[0x05][..]), "{}", rev.name);
        }
    }

    #[test]
    fn test_sleep_out_waits() {
        for rev in [MD380, MD390, ST7735_ROTATED] {
            let slpout = rev
                .init_sequence
                .iter()
                .find(|c| c.command == cmd::SLPOUT)
                .map(|c| c.delay_ms);
            assert!(slpout.unwrap_or(0) >= 120, "{}", rev.name);
        }
    }
}
