//! LED task
//!
//! The red LED blinks with a half-period of the raw knob bits times 64 ms,
//! so turning the knob changes the rate. The green LED follows PTT.

use defmt::info;
use embassy_futures::select::{select, Either};
use embassy_stm32::gpio::Output;
use embassy_time::{Duration, Instant, Timer};

use crate::channels::LED_INPUT;

/// Half-period of the red LED for a raw knob value
///
/// Never zero, so the task still yields with the knob at 0.
pub fn half_period(knob_raw: u8) -> Duration {
    Duration::from_millis(((knob_raw as u64) << 6).max(1))
}

#[embassy_executor::task]
pub async fn blink_task(mut red: Output<'static>, mut green: Output<'static>) {
    info!("Blink task started");

    let mut period = half_period(0);

    loop {
        red.toggle();
        let deadline = Instant::now() + period;

        // Keep tracking input until this half-period is over
        loop {
            match select(Timer::at(deadline), LED_INPUT.wait()).await {
                Either::First(()) => break,
                Either::Second(state) => {
                    if state.ptt {
                        green.set_high();
                    } else {
                        green.set_low();
                    }
                    period = half_period(state.knob_raw);
                }
            }
        }
    }
}
