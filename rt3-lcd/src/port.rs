//! Shared LCD port
//!
//! The LCD data lines, chip-select and a handful of matrix rows form one
//! physical resource that two subsystems take turns using: the display
//! driver and the keypad scanner. [`LcdPort`] owns all of it behind a single
//! async mutex, plus the record of which subsystem configured the pins last.
//!
//! ```text
//!   Uninitialized ──acquire()──────────► Display
//!                                          ▲  │
//!                               acquire()  │  │ acquire_keypad()
//!                                          │  ▼
//!                                         Keypad
//! ```
//!
//! A transition reprograms the shared pins while the lock is held, so no
//! other task can observe a half-configured bus. Re-entering a mode that is
//! already configured costs nothing.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embedded_hal::delay::DelayNs;
use embedded_hal_async::delay::DelayNs as AsyncDelayNs;
use rt3_hal::{ConfigurablePin, LcdBus, OutputPin, PinConfig, PinGroup, Speed};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bus::SharedLines;
use crate::revision::{Revision, RESET_PULSE_MS};

/// The hardware types a board plugs into the port
pub trait Board {
    /// LCD bus, also owning the data lines shared with the keypad
    type Bus: LcdBus + SharedLines;
    /// Keypad matrix row drivers
    type Rows: PinGroup;
    /// Chip-select, reset and backlight outputs
    type Control: OutputPin + ConfigurablePin;
    /// Busy-wait used for the chip-select settle time
    type Settle: DelayNs;
}

/// Which subsystem the shared pins are currently configured for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PortMode {
    /// Pins not yet configured by anyone
    #[default]
    Uninitialized,
    /// Data lines drive the LCD controller
    Display,
    /// Data lines are matrix inputs, rows are driven by the scanner
    Keypad,
}

/// Everything the port owns
pub struct PortParts<H: Board> {
    /// LCD bus and shared data lines
    pub bus: H::Bus,
    /// Keypad matrix rows
    pub rows: H::Rows,
    /// LCD chip-select, active low
    pub chip_select: H::Control,
    /// LCD reset, active low
    pub reset: H::Control,
    /// Backlight enable, active high
    pub backlight: H::Control,
    /// Settle-time delay
    pub settle: H::Settle,
}

pub(crate) struct PortState<H: Board> {
    pub(crate) parts: PortParts<H>,
    pub(crate) mode: PortMode,
}

/// The mutex-guarded shared port
///
/// `M` is the raw mutex flavour: `CriticalSectionRawMutex` when the port is
/// shared between executors or interrupt priorities, `NoopRawMutex` when all
/// users run on one executor.
pub struct LcdPort<M: RawMutex, H: Board> {
    state: Mutex<M, PortState<H>>,
    revision: &'static Revision,
}

impl<M: RawMutex, H: Board> LcdPort<M, H> {
    /// Take ownership of the port hardware
    ///
    /// Nothing is touched until the first acquisition.
    pub fn new(parts: PortParts<H>, revision: &'static Revision) -> Self {
        Self {
            state: Mutex::new(PortState {
                parts,
                mode: PortMode::Uninitialized,
            }),
            revision,
        }
    }

    /// Revision the port was built for
    pub fn revision(&self) -> &'static Revision {
        self.revision
    }

    /// Acquire the port for drawing
    ///
    /// Waits for the lock without timeout, reconfigures the shared pins if
    /// the keypad (or nobody) had them, then asserts chip-select after the
    /// revision's settle time. Chip-select is released and the lock given
    /// back when the guard drops.
    pub async fn acquire(&self) -> PortGuard<'_, M, H> {
        let mut state = self.state.lock().await;

        if state.mode != PortMode::Display {
            #[cfg(feature = "defmt")]
            defmt::debug!("LCD port {} -> Display", state.mode);

            let first_use = state.mode == PortMode::Uninitialized;
            let parts = &mut state.parts;
            let out = PinConfig::output(Speed::VeryHigh);

            parts.bus.enter_display_mode();
            parts.chip_select.configure(out);
            parts.reset.configure(out);
            parts.backlight.configure(out);

            // Rows idle low so a held key cannot pull a data line
            let rows = parts.rows.all();
            parts.rows.configure(rows, out);
            parts.rows.write_bits(rows, 0);

            if first_use {
                parts.chip_select.set_high();
                parts.reset.set_high();
            }
            state.mode = PortMode::Display;
        }

        state.parts.settle.delay_ns(self.revision.settle_ns);
        state.parts.chip_select.set_low();

        PortGuard {
            state,
            revision: self.revision,
        }
    }

    /// Acquire the port for a keypad matrix scan
    ///
    /// Chip-select stays deasserted, so the controller ignores whatever the
    /// scanner does with the lines.
    pub async fn acquire_keypad(&self) -> KeypadGuard<'_, M, H> {
        let mut state = self.state.lock().await;

        if state.mode != PortMode::Keypad {
            #[cfg(feature = "defmt")]
            defmt::debug!("LCD port {} -> Keypad", state.mode);

            let first_use = state.mode == PortMode::Uninitialized;
            let parts = &mut state.parts;
            let out = PinConfig::output(Speed::VeryHigh);

            if first_use {
                parts.chip_select.configure(out);
                parts.chip_select.set_high();
            }
            let rows = parts.rows.all();
            parts.rows.configure(rows, out);
            parts.rows.write_bits(rows, 0);
            parts.bus.enter_keypad_mode();
            state.mode = PortMode::Keypad;
        }

        KeypadGuard { state }
    }
}

/// Exclusive access to the port in display mode, chip-select asserted
pub struct PortGuard<'a, M: RawMutex, H: Board> {
    pub(crate) state: MutexGuard<'a, M, PortState<H>>,
    pub(crate) revision: &'static Revision,
}

impl<M: RawMutex, H: Board> PortGuard<'_, M, H> {
    /// Revision of the panel behind this port
    pub fn revision(&self) -> &'static Revision {
        self.revision
    }

    /// Current port mode (always [`PortMode::Display`] while the guard lives)
    pub fn mode(&self) -> PortMode {
        self.state.mode
    }

    pub(crate) fn bus(&mut self) -> &mut H::Bus {
        &mut self.state.parts.bus
    }

    /// Switch the backlight
    pub fn set_backlight(&mut self, on: bool) {
        self.state.parts.backlight.set_state(on);
    }

    /// Pulse the controller's reset line
    ///
    /// Holds reset low, then waits for the controller to come out of reset.
    /// Every register is back at its power-on value afterwards.
    pub async fn hardware_reset<D: AsyncDelayNs>(&mut self, delay: &mut D) {
        self.state.parts.reset.set_low();
        delay.delay_ms(RESET_PULSE_MS).await;
        self.state.parts.reset.set_high();
        delay.delay_ms(RESET_PULSE_MS).await;
    }
}

impl<M: RawMutex, H: Board> Drop for PortGuard<'_, M, H> {
    fn drop(&mut self) {
        let parts = &mut self.state.parts;
        if self.revision.settle_on_release {
            parts.settle.delay_ns(self.revision.settle_ns);
        }
        parts.chip_select.set_high();
    }
}

/// Exclusive access to the port in keypad mode
pub struct KeypadGuard<'a, M: RawMutex, H: Board> {
    state: MutexGuard<'a, M, PortState<H>>,
}

impl<M: RawMutex, H: Board> KeypadGuard<'_, M, H> {
    /// Current port mode (always [`PortMode::Keypad`] while the guard lives)
    pub fn mode(&self) -> PortMode {
        self.state.mode
    }

    /// Mask of every matrix row this board has
    pub fn row_mask(&self) -> u16 {
        self.state.parts.rows.all()
    }

    /// Drive the matrix rows: bits set in `levels` go high, the rest low
    pub fn drive_rows(&mut self, levels: u16) {
        let rows = &mut self.state.parts.rows;
        let all = rows.all();
        rows.write_bits(all, levels);
    }

    /// Sample the shared data lines
    pub fn read_lines(&self) -> u8 {
        self.state.parts.bus.read_lines()
    }

    /// Busy-wait for the lines to settle after driving a row
    pub fn settle(&mut self, ns: u32) {
        self.state.parts.settle.delay_ns(ns);
    }
}
