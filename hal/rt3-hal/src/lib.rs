//! RT3 Hardware Abstraction Layer
//!
//! This crate defines the hardware abstraction traits the display and input
//! drivers are written against. The chip-specific side (register-level GPIO,
//! the FSMC bus window) lives in the firmware crate; host tests provide
//! recording mocks.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  rt3-firmware (tasks, board wiring)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │    rt3-lcd    │◄──────│ rt3-controls  │
//! └───────────────┘       └───────────────┘
//!         │                       │
//!         └───────────┬───────────┘
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  rt3-hal (this crate - traits)          │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - Digital I/O
//! - [`gpio::ConfigurablePin`], [`gpio::PinGroup`] - Runtime pin reconfiguration
//! - [`bus::LcdBus`] - Byte-wide command/data bus to an LCD controller

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod gpio;

// Re-export key traits at crate root for convenience
pub use bus::LcdBus;
pub use gpio::{
    ConfigurablePin, InputPin, OutputPin, OutputType, PinConfig, PinGroup, PinMode, Pull, Speed,
};
