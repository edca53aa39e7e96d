//! FSMC bank 1 setup for the LCD
//!
//! The HX8302 sits on NOR/SRAM sub-bank 1 as a multiplexed 16-bit NOR
//! device. Only the low byte is wired; A17 is the register-select line, so
//! commands go to the bank base and data to base + 0x4_0000 (see
//! [`rt3_lcd::bus::MappedBus::fsmc`]).

use embassy_stm32::pac;

/// FSMC bank 1 control register for sub-bank 1
const BCR1: *mut u32 = 0xA000_0000 as *mut u32;
/// FSMC bank 1 timing register for sub-bank 1
const BTR1: *mut u32 = 0xA000_0004 as *mut u32;

const BCR_MBKEN: u32 = 1 << 0;
const BCR_MUXEN: u32 = 1 << 1;
const BCR_MTYP_NOR: u32 = 0b10 << 2;
const BCR_MWID_16: u32 = 0b01 << 4;
const BCR_FACCEN: u32 = 1 << 6;
const BCR_WREN: u32 = 1 << 12;

/// Asynchronous access modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[allow(dead_code)]
pub enum AccessMode {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
}

/// Read/write timing, in HCLK cycles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NorTiming {
    pub address_setup: u8,
    pub address_hold: u8,
    pub data_setup: u8,
    pub bus_turnaround: u8,
    pub clock_division: u8,
    pub data_latency: u8,
    pub access_mode: AccessMode,
}

impl NorTiming {
    /// Timing the LCD is known to work with at 168 MHz
    pub const LCD: Self = Self {
        address_setup: 3,
        address_hold: 3,
        data_setup: 4,
        bus_turnaround: 0,
        clock_division: 1,
        data_latency: 0,
        access_mode: AccessMode::B,
    };

    /// BTR register value
    pub const fn btr(&self) -> u32 {
        (self.address_setup as u32 & 0xF)
            | (self.address_hold as u32 & 0xF) << 4
            | (self.data_setup as u32) << 8
            | (self.bus_turnaround as u32 & 0xF) << 16
            | (self.clock_division as u32 & 0xF) << 20
            | (self.data_latency as u32 & 0xF) << 24
            | (self.access_mode as u32) << 28
    }
}

/// BCR value: multiplexed 16-bit NOR, writes enabled, no burst, no wait
pub const LCD_BCR: u32 = BCR_MBKEN | BCR_MUXEN | BCR_MTYP_NOR | BCR_MWID_16 | BCR_FACCEN | BCR_WREN;

const _: () = assert!(LCD_BCR == 0x105B);
const _: () = assert!(NorTiming::LCD.btr() == 0x1010_0433);

/// Clock the FSMC and program sub-bank 1 for the LCD
///
/// The FSMC pins themselves are handed over later, whenever the port
/// enters display mode.
pub fn init(timing: NorTiming) {
    pac::RCC.ahb3enr().modify(|w| w.set_fsmcen(true));

    // SAFETY: BCR1/BTR1 are the FSMC bank 1 registers, clocked above, and
    // this is their only writer
    unsafe {
        core::ptr::write_volatile(BTR1, timing.btr());
        core::ptr::write_volatile(BCR1, LCD_BCR);
    }

    #[cfg(feature = "defmt")]
    defmt::debug!("FSMC bank 1: BCR={:#010x} BTR={:#010x}", LCD_BCR, timing.btr());
}
