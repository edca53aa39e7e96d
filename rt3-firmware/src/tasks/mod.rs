//! Embassy async tasks
//!
//! Each task runs independently and communicates via signals.

pub mod blink;
pub mod display;
pub mod input;

pub use blink::blink_task;
pub use display::display_task;
pub use input::input_task;
