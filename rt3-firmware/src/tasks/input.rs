//! Front-panel input task
//!
//! Polls the knob and PTT and scans the keypad every 50 ms. A changed
//! snapshot is published to both consumers.

use defmt::{debug, info, warn};
use embassy_time::{Duration, Ticker};
use rt3_controls::{ChannelKnob, KeypadScanner, PushToTalk};

use crate::board::Display;
use crate::channels::{InputState, LED_INPUT, SCREEN_INPUT};
use crate::gpio::RegisterPin;

/// Poll period
const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[embassy_executor::task]
pub async fn input_task(
    lcd: &'static Display,
    knob: ChannelKnob<RegisterPin>,
    ptt: PushToTalk<RegisterPin>,
) {
    info!("Input task started");

    let scanner = KeypadScanner::default();
    let mut ticker = Ticker::every(POLL_INTERVAL);
    let mut last = None;

    loop {
        let (keys, keypad_fault) = match scanner.scan(lcd.port()).await {
            Ok(keys) => (keys, false),
            Err(e) => {
                warn!("Keypad scan failed: {:?}", e);
                (Default::default(), true)
            }
        };

        let raw = knob.raw();
        let state = InputState {
            channel: rt3_controls::knob::decode(raw),
            knob_raw: raw,
            ptt: ptt.is_pressed(),
            keys,
            keypad_fault,
        };

        if last != Some(state) {
            debug!("Input: {:?}", state);
            SCREEN_INPUT.signal(state);
            LED_INPUT.signal(state);
            last = Some(state);
        }

        ticker.next().await;
    }
}
