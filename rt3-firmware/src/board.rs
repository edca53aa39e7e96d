//! Board wiring for the MD-380 / RT3 main board
//!
//! Every pin the firmware drives through [`RegisterPin`] is listed here
//! once. The LEDs are left to embassy's own GPIO driver.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_time::Delay;
use rt3_controls::{ChannelKnob, PushToTalk};
use rt3_hal::{ConfigurablePin, OutputPin, PinConfig, Pull, Speed};
use rt3_lcd::revision::{self, Revision};
use rt3_lcd::{Board, Lcd, PortParts};

#[cfg(not(feature = "st7735-rotated"))]
use rt3_lcd::bus::MappedBus;
#[cfg(feature = "st7735-rotated")]
use rt3_lcd::bus::ParallelBus;

use crate::gpio::{PinId, Port, RegisterGroup, RegisterPin};

/// Panel revision this image is built for
#[cfg(feature = "st7735-rotated")]
pub const REVISION: &Revision = &revision::ST7735_ROTATED;
#[cfg(all(feature = "md390", not(feature = "st7735-rotated")))]
pub const REVISION: &Revision = &revision::MD390;
#[cfg(not(any(feature = "md390", feature = "st7735-rotated")))]
pub const REVISION: &Revision = &revision::MD380;

// LCD data bus, D0..D7
pub const LCD_D0: PinId = PinId::new(Port::D, 14);
pub const LCD_D1: PinId = PinId::new(Port::D, 15);
pub const LCD_D2: PinId = PinId::new(Port::D, 0);
pub const LCD_D3: PinId = PinId::new(Port::D, 1);
pub const LCD_D4: PinId = PinId::new(Port::E, 7);
pub const LCD_D5: PinId = PinId::new(Port::E, 8);
pub const LCD_D6: PinId = PinId::new(Port::E, 9);
pub const LCD_D7: PinId = PinId::new(Port::E, 10);

// LCD strobes (FSMC NOE, NWE, A17)
pub const LCD_RD: PinId = PinId::new(Port::D, 4);
pub const LCD_WR: PinId = PinId::new(Port::D, 5);
pub const LCD_RS: PinId = PinId::new(Port::D, 12);

// LCD control
pub const LCD_CS: PinId = PinId::new(Port::D, 6);
pub const LCD_RST: PinId = PinId::new(Port::D, 13);
pub const LCD_BL: PinId = PinId::new(Port::C, 6);

/// Keypad matrix rows
pub const KEY_ROWS: [PinId; 3] = [
    PinId::new(Port::A, 6),
    PinId::new(Port::D, 2),
    PinId::new(Port::D, 3),
];

/// Channel knob encoder bits, least significant first
pub const KNOB: [PinId; 4] = [
    PinId::new(Port::B, 11),
    PinId::new(Port::E, 15),
    PinId::new(Port::E, 14),
    PinId::new(Port::B, 10),
];

/// Push-to-talk, active low
pub const PTT: PinId = PinId::new(Port::E, 11);

/// Hardware types behind the shared LCD port
pub struct Rt3Board;

#[cfg(not(feature = "st7735-rotated"))]
impl Board for Rt3Board {
    /// D0..D7 in bits 0..7, then RD, WR, RS
    type Bus = MappedBus<RegisterGroup<11>>;
    type Rows = RegisterGroup<3>;
    type Control = RegisterPin;
    type Settle = Delay;
}

#[cfg(feature = "st7735-rotated")]
impl Board for Rt3Board {
    type Bus = ParallelBus<RegisterGroup<8>, RegisterPin>;
    type Rows = RegisterGroup<3>;
    type Control = RegisterPin;
    type Settle = Delay;
}

/// The LCD driver every task shares
pub type Display = Lcd<CriticalSectionRawMutex, Rt3Board>;

/// Take a list of pins without configuring them
///
/// # Safety
///
/// See [`RegisterPin::new`].
unsafe fn take<const N: usize>(ids: [PinId; N]) -> [RegisterPin; N] {
    // SAFETY: forwarded to the caller
    ids.map(|id| unsafe { RegisterPin::new(id) })
}

const DATA_LINES: [PinId; 8] = [LCD_D0, LCD_D1, LCD_D2, LCD_D3, LCD_D4, LCD_D5, LCD_D6, LCD_D7];

#[cfg(not(feature = "st7735-rotated"))]
fn lcd_bus() -> <Rt3Board as Board>::Bus {
    let [d0, d1, d2, d3, d4, d5, d6, d7] = DATA_LINES;

    // SAFETY: the bus pins are listed once in this module and taken once,
    // from `lcd_parts`
    let lines = RegisterGroup::new(unsafe {
        take([d0, d1, d2, d3, d4, d5, d6, d7, LCD_RD, LCD_WR, LCD_RS])
    });

    // SAFETY: `fsmc::init` maps sub-bank 1 onto these lines before the
    // first write, and the bus is the only user of the window
    unsafe { MappedBus::fsmc(lines) }
}

#[cfg(feature = "st7735-rotated")]
fn lcd_bus() -> <Rt3Board as Board>::Bus {
    // SAFETY: as above; on this board RD is tied inactive and unused
    let data = RegisterGroup::new(unsafe { take(DATA_LINES) });
    // SAFETY: as above
    let [rs, wr] = unsafe { take([LCD_RS, LCD_WR]) };
    ParallelBus::new(data, rs, wr)
}

/// Assemble everything the LCD port owns
///
/// Control pins start in their idle state: chip-select high, reset high,
/// backlight off. The shared lines are configured by the port on first
/// use.
///
/// # Safety
///
/// Call once. None of the pins above may be owned elsewhere.
pub unsafe fn lcd_parts() -> PortParts<Rt3Board> {
    let out = PinConfig::output(Speed::VeryHigh);

    // SAFETY: forwarded to the caller
    let [mut chip_select, mut reset, mut backlight] =
        unsafe { take([LCD_CS, LCD_RST, LCD_BL]) };
    chip_select.set_high();
    reset.set_high();
    backlight.set_low();
    for pin in [&mut chip_select, &mut reset, &mut backlight] {
        pin.configure(out);
    }

    PortParts {
        bus: lcd_bus(),
        // SAFETY: forwarded to the caller
        rows: RegisterGroup::new(unsafe { take(KEY_ROWS) }),
        chip_select,
        reset,
        backlight,
        settle: Delay,
    }
}

/// The channel knob, inputs without pull resistors
///
/// # Safety
///
/// Call once.
pub unsafe fn channel_knob() -> ChannelKnob<RegisterPin> {
    // SAFETY: forwarded to the caller
    ChannelKnob::new(KNOB.map(|id| unsafe { RegisterPin::with_config(id, PinConfig::input(Pull::None)) }))
}

/// The PTT button
///
/// # Safety
///
/// Call once.
pub unsafe fn push_to_talk() -> PushToTalk<RegisterPin> {
    // SAFETY: forwarded to the caller
    PushToTalk::new(unsafe { RegisterPin::with_config(PTT, PinConfig::input(Pull::None)) })
}
