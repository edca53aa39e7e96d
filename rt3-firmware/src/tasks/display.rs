//! Status screen task
//!
//! Draws a header once, then redraws the status lines whenever the input
//! task publishes a new snapshot. Lines end in `\r` so leftovers of a
//! longer previous value are cleared to the right edge.

use defmt::info;
use rt3_lcd::{Color, DrawContext, FontOptions};

use crate::board::Display;
use crate::channels::{InputState, SCREEN_INPUT};

/// Height of the title bar
const HEADER_HEIGHT: i32 = 20;

/// First status line
const BODY_TOP: i32 = HEADER_HEIGHT + 8;

const LEFT_MARGIN: i32 = 4;

#[embassy_executor::task]
pub async fn display_task(lcd: &'static Display) {
    info!("Display task started");

    draw_header(lcd).await;
    draw_status(lcd, &InputState::default()).await;

    loop {
        let state = SCREEN_INPUT.wait().await;
        draw_status(lcd, &state).await;
    }
}

async fn draw_header(lcd: &Display) {
    let rev = lcd.revision();
    let layout = rev.layout;

    let mut guard = lcd.port().acquire().await;
    guard.clear(Color::BLACK);
    guard.fill_rect(0, 0, rev.max_x(), HEADER_HEIGHT - 1, layout.radio_blue());

    let mut ctx = DrawContext::new(rev);
    ctx.bg = layout.radio_blue();
    ctx.font = FontOptions::DOUBLE_WIDTH | FontOptions::DOUBLE_HEIGHT;
    ctx.move_to(LEFT_MARGIN, 2);
    guard.draw_string(&mut ctx, "RT3");

    // Panel name along the bottom edge
    ctx = DrawContext::new(rev);
    ctx.fg = layout.cyan();
    ctx.move_to(LEFT_MARGIN, rev.max_y() - 9);
    guard.draw_string(&mut ctx, rev.name);
}

/// Redraw every status line under one lock
async fn draw_status(lcd: &Display, state: &InputState) {
    let rev = lcd.revision();
    let layout = rev.layout;

    let mut ctx = DrawContext::new(rev);
    ctx.move_to(LEFT_MARGIN, BODY_TOP);

    let mut guard = lcd.port().acquire().await;
    guard.printf(&mut ctx, format_args!("Channel {:>2}\r", state.channel));

    ctx.fg = if state.ptt { layout.red() } else { layout.green() };
    guard.draw_string(&mut ctx, if state.ptt { "TX\r" } else { "RX\r" });

    ctx.fg = Color::WHITE;
    guard.printf(&mut ctx, format_args!("Keys {}\r", state.keys));

    ctx.fg = layout.yellow();
    guard.draw_string(&mut ctx, if state.keypad_fault { "Keypad fault\r" } else { "\r" });
}
