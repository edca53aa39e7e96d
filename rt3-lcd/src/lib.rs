//! LCD driver for RT3 / MD-380 family handhelds
//!
//! This crate drives the radio's 160x128 colour panel over its 8-bit parallel
//! bus and owns the discipline that lets the keypad matrix borrow the same
//! lines between frames:
//!
//! - [`revision`]: per-panel capability records (mounting, colour layout,
//!   address encoding, init table)
//! - [`bus`]: memory-mapped and bit-banged bus backends
//! - [`port`]: the mutex-guarded shared port and its mode state machine
//! - [`protocol`]: command/data encoding and rectangle transactions
//! - [`geometry`], [`raster`], [`bitmap`]: drawing primitives
//! - [`font`], [`text`]: CP437 glyphs and the text layout engine
//! - [`lcd`]: the async façade tasks draw through
//!
//! # Concurrency
//!
//! Every drawing entry point on [`Lcd`] acquires the port exactly once,
//! performs its whole bus transaction, and releases it when the guard drops.
//! The only suspension point is the lock itself; once held, a drawing call
//! runs to completion so a rectangle transaction can never be interleaved
//! with another task's bytes.

#![cfg_attr(not(test), no_std)]

#[cfg(feature = "testing")]
extern crate std;

pub mod bitmap;
pub mod bus;
pub mod color;
pub mod font;
pub mod geometry;
#[cfg(feature = "embedded-graphics")]
pub mod graphics;
pub mod lcd;
pub mod port;
pub mod protocol;
pub mod raster;
pub mod revision;
pub mod text;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export key types
pub use bitmap::{Bitmap, BitmapError};
pub use color::{ChannelLayout, Color};
pub use font::FontOptions;
pub use geometry::Rect;
pub use lcd::Lcd;
pub use port::{Board, KeypadGuard, LcdPort, PortGuard, PortMode, PortParts};
pub use revision::Revision;
pub use text::{ClipRect, DrawContext};
