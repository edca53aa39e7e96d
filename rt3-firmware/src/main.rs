//! RT3 - Handheld Radio UI Firmware
//!
//! Firmware for the user-facing side of STM32F405 handhelds in the
//! Retevis RT3 / Tytera MD-380 family: the colour LCD, keypad, channel
//! knob, PTT and status LEDs.
//!
//! The LCD and the keypad matrix share one set of pins. Both go through
//! the single `Lcd` instance created here, whose port lock decides who
//! owns the lines at any moment.

#![no_std]
#![no_main]

use defmt::{info, trace};
use embassy_executor::Spawner;
use embassy_stm32::gpio::{Level, Output, Speed};
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use crate::board::Display;

mod board;
mod channels;
#[cfg(not(feature = "st7735-rotated"))]
mod fsmc;
mod gpio;
mod tasks;

// The LCD lives forever so every task can borrow it
static LCD: StaticCell<Display> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("RT3 firmware starting...");

    // Also turns on every GPIO port clock
    let p = embassy_stm32::init(Default::default());
    info!("Peripherals initialized");

    #[cfg(not(feature = "st7735-rotated"))]
    fsmc::init(fsmc::NorTiming::LCD);

    // SAFETY: the board pins are taken exactly once, here, and none of them
    // is handed to an embassy driver
    let (parts, knob, ptt) = unsafe { (board::lcd_parts(), board::channel_knob(), board::push_to_talk()) };

    let lcd: &'static Display = LCD.init(Display::new(parts, board::REVISION));
    lcd.init(&mut Delay, None).await;
    lcd.set_backlight(true).await;
    info!("LCD ready: {}", board::REVISION.name);

    // Status LEDs: green PE0, red PE1
    let green = Output::new(p.PE0, Level::Low, Speed::Low);
    let red = Output::new(p.PE1, Level::Low, Speed::Low);

    // Spawn tasks
    spawner.spawn(tasks::display_task(lcd)).unwrap();
    spawner.spawn(tasks::input_task(lcd, knob, ptt)).unwrap();
    spawner.spawn(tasks::blink_task(red, green)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}
