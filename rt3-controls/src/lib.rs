//! Front-panel controls for RT3 / MD-380 family handhelds
//!
//! - [`knob`]: the 16-position channel selector
//! - [`ptt`]: the push-to-talk button
//! - [`keypad`]: the key matrix, scanned over the LCD data lines
//!
//! The knob and PTT are plain GPIO inputs. The keypad has no lines of its
//! own: its columns are the LCD data bus, so every scan borrows the shared
//! port from the display driver and hands it back when done.

#![cfg_attr(not(test), no_std)]

pub mod keypad;
pub mod knob;
pub mod ptt;

// Re-export key types
pub use keypad::{Key, KeyMap, KeySet, KeypadError, KeypadScanner};
pub use knob::ChannelKnob;
pub use ptt::PushToTalk;
