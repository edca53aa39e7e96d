//! Inter-task communication
//!
//! The input task is the only producer. Each consumer gets its own signal
//! since a `Signal` hands its value to a single waiter.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use rt3_controls::KeySet;

/// Snapshot of the front-panel controls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InputState {
    /// Knob position, 1..=16
    pub channel: u8,
    /// Raw encoder bits
    pub knob_raw: u8,
    pub ptt: bool,
    pub keys: KeySet,
    /// Contacts that matched no key in the last scan
    pub keypad_fault: bool,
}

/// Latest input state for the status screen (updated by input task)
pub static SCREEN_INPUT: Signal<CriticalSectionRawMutex, InputState> = Signal::new();

/// Latest input state for the LEDs (updated by input task)
pub static LED_INPUT: Signal<CriticalSectionRawMutex, InputState> = Signal::new();
