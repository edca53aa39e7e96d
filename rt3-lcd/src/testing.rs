//! Recording board for host-side tests
//!
//! Every bus byte, chip-select edge, pin-mode change and settle delay lands
//! in one shared event log, along with the name of whoever holds the port
//! when a test notes it with [`Recorder::held_by`]. [`Screen`] replays a log into a simulated frame
//! memory so drawing tests can assert on pixels instead of bytes.

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use rt3_hal::{ConfigurablePin, LcdBus, OutputPin, PinConfig, PinGroup};

use crate::bus::SharedLines;
use crate::color::Color;
use crate::lcd::Lcd;
use crate::port::{Board, LcdPort, PortParts};
use crate::protocol::cmd;
use crate::revision::{AddressEncoding, Revision};

/// One observable hardware action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusEvent {
    /// Command byte written
    Command(u8),
    /// Data byte written
    Data(u8),
    /// Chip-select asserted (driven low)
    Select,
    /// Chip-select deasserted (driven high)
    Deselect,
    /// Bus lines reprogrammed for the display
    DisplayMode,
    /// Data lines released for the keypad
    KeypadMode,
    /// Matrix row levels after a write
    Rows(u16),
    /// Backlight level
    Backlight(bool),
    /// Reset line level
    Reset(bool),
    /// Blocking settle delay, nanoseconds
    Settle(u32),
    /// Caller that holds the port lock from here on
    Holder(&'static str),
}

/// One command and the data bytes that followed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub command: u8,
    pub data: Vec<u8>,
}

impl Transaction {
    /// Data bytes paired up as big-endian pixels
    pub fn pixels(&self) -> impl Iterator<Item = u16> + '_ {
        self.data
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
    }
}

/// Shared event log plus simulated keypad state
#[derive(Debug, Default)]
pub struct Recorder {
    /// Everything that happened, in order
    pub events: Vec<BusEvent>,
    pressed: Vec<(u8, u8)>,
    rows: u16,
    keypad: bool,
}

impl Recorder {
    /// Hold down the key joining matrix `row` and data line `line`
    pub fn press(&mut self, row: u8, line: u8) {
        self.pressed.push((row, line));
    }

    /// Let go of every key
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    /// Note that `caller` now holds the port
    pub fn held_by(&mut self, caller: &'static str) {
        self.events.push(BusEvent::Holder(caller));
    }

    /// Command bytes in order
    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|e| match e {
                BusEvent::Command(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    /// Group the byte stream into transactions
    ///
    /// Data bytes written before any command are dropped.
    pub fn transactions(&self) -> Vec<Transaction> {
        let mut out: Vec<Transaction> = Vec::new();
        for event in &self.events {
            match *event {
                BusEvent::Command(command) => out.push(Transaction {
                    command,
                    data: Vec::new(),
                }),
                BusEvent::Data(byte) => {
                    if let Some(last) = out.last_mut() {
                        last.data.push(byte);
                    }
                }
                _ => {}
            }
        }
        out
    }

    /// Number of pixels (byte pairs) streamed after `RAMWR` commands
    pub fn pixels_written(&self) -> usize {
        self.transactions()
            .iter()
            .filter(|t| t.command == cmd::RAMWR)
            .map(|t| t.data.len() / 2)
            .sum()
    }

    /// Events between each chip-select assertion and its release
    pub fn selections(&self) -> Vec<Vec<BusEvent>> {
        let mut spans = Vec::new();
        let mut current: Option<Vec<BusEvent>> = None;
        for event in &self.events {
            match event {
                BusEvent::Select => current = Some(Vec::new()),
                BusEvent::Deselect => {
                    if let Some(span) = current.take() {
                        spans.push(span);
                    }
                }
                other => {
                    if let Some(span) = current.as_mut() {
                        span.push(*other);
                    }
                }
            }
        }
        spans
    }

    /// Chip-select spans paired with the caller noted inside each one
    pub fn selections_by_holder(&self) -> Vec<(Option<&'static str>, Vec<BusEvent>)> {
        self.selections()
            .into_iter()
            .map(|span| {
                let holder = span.iter().find_map(|e| match e {
                    BusEvent::Holder(caller) => Some(*caller),
                    _ => None,
                });
                (holder, span)
            })
            .collect()
    }

    fn lines(&self) -> u8 {
        if !self.keypad {
            return 0;
        }
        self.pressed
            .iter()
            .filter(|(row, _)| self.rows & (1u16 << *row) != 0)
            .fold(0u8, |acc, (_, line)| acc | (1u8 << *line))
    }
}

/// Handle shared by every recording part of one board
pub type Shared = Rc<RefCell<Recorder>>;

/// Recording LCD bus with simulated keypad lines
pub struct RecordingBus(Shared);

impl LcdBus for RecordingBus {
    fn write_command(&mut self, command: u8) {
        self.0.borrow_mut().events.push(BusEvent::Command(command));
    }

    fn write_data(&mut self, data: u8) {
        self.0.borrow_mut().events.push(BusEvent::Data(data));
    }
}

impl SharedLines for RecordingBus {
    fn enter_display_mode(&mut self) {
        let mut rec = self.0.borrow_mut();
        rec.keypad = false;
        rec.events.push(BusEvent::DisplayMode);
    }

    fn enter_keypad_mode(&mut self) {
        let mut rec = self.0.borrow_mut();
        rec.keypad = true;
        rec.events.push(BusEvent::KeypadMode);
    }

    fn read_lines(&self) -> u8 {
        self.0.borrow().lines()
    }
}

/// Three matrix rows, like the MD-380 board
pub struct RecordingRows(Shared);

impl PinGroup for RecordingRows {
    fn configure(&mut self, _mask: u16, _config: PinConfig) {}

    fn write_bits(&mut self, mask: u16, bits: u16) {
        let mut rec = self.0.borrow_mut();
        rec.rows = (rec.rows & !mask) | (bits & mask);
        let rows = rec.rows;
        rec.events.push(BusEvent::Rows(rows));
    }

    fn read_bits(&self) -> u16 {
        self.0.borrow().rows
    }

    fn all(&self) -> u16 {
        0b111
    }
}

/// What a recording control pin is wired to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlRole {
    ChipSelect,
    Reset,
    Backlight,
}

/// Recording chip-select, reset or backlight output
pub struct RecordingPin {
    shared: Shared,
    role: ControlRole,
    high: bool,
}

impl RecordingPin {
    fn record(&self) {
        let event = match (self.role, self.high) {
            (ControlRole::ChipSelect, false) => BusEvent::Select,
            (ControlRole::ChipSelect, true) => BusEvent::Deselect,
            (ControlRole::Reset, level) => BusEvent::Reset(level),
            (ControlRole::Backlight, level) => BusEvent::Backlight(level),
        };
        self.shared.borrow_mut().events.push(event);
    }
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) {
        self.high = true;
        self.record();
    }

    fn set_low(&mut self) {
        self.high = false;
        self.record();
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

impl ConfigurablePin for RecordingPin {
    fn configure(&mut self, _config: PinConfig) {}
}

/// Settle delay that only records its duration
pub struct RecordingDelay(Shared);

impl embedded_hal::delay::DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.0.borrow_mut().events.push(BusEvent::Settle(ns));
    }
}

/// Delay that returns immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDelay;

impl embedded_hal::delay::DelayNs for NoopDelay {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl embedded_hal_async::delay::DelayNs for NoopDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Board whose every part records into one [`Recorder`]
pub struct RecordingBoard;

impl Board for RecordingBoard {
    type Bus = RecordingBus;
    type Rows = RecordingRows;
    type Control = RecordingPin;
    type Settle = RecordingDelay;
}

impl RecordingBoard {
    /// Fresh recording parts and the log they share
    pub fn parts() -> (PortParts<Self>, Shared) {
        let shared: Shared = Rc::new(RefCell::new(Recorder::default()));
        let pin = |role| RecordingPin {
            shared: shared.clone(),
            role,
            high: false,
        };
        let parts = PortParts {
            bus: RecordingBus(shared.clone()),
            rows: RecordingRows(shared.clone()),
            chip_select: pin(ControlRole::ChipSelect),
            reset: pin(ControlRole::Reset),
            backlight: pin(ControlRole::Backlight),
            settle: RecordingDelay(shared.clone()),
        };
        (parts, shared)
    }

    /// A recording port for `revision`
    pub fn port(revision: &'static Revision) -> (LcdPort<NoopRawMutex, Self>, Shared) {
        let (parts, shared) = Self::parts();
        (LcdPort::new(parts, revision), shared)
    }

    /// A recording driver for `revision`
    pub fn lcd(revision: &'static Revision) -> (Lcd<NoopRawMutex, Self>, Shared) {
        let (parts, shared) = Self::parts();
        (Lcd::new(parts, revision), shared)
    }
}

/// Simulated controller frame memory
///
/// Replays `CASET`/`RASET`/`RAMWR` transactions the way the controller
/// executes them: the write pointer starts at the window's first column and
/// row, moves along the column address first and wraps to the next row.
pub struct Screen {
    revision: &'static Revision,
    cells: Vec<Option<u16>>,
    /// Pixels written past the end of an open window
    pub overflow: usize,
}

impl Screen {
    /// Replay a recorded event log
    pub fn replay(revision: &'static Revision, events: &[BusEvent]) -> Self {
        let columns = revision.panel_columns() as usize;
        let rows = revision.panel_rows() as usize;
        let mut screen = Self {
            revision,
            cells: std::vec![None; columns * rows],
            overflow: 0,
        };

        let mut command = cmd::NOP;
        let mut params: Vec<u8> = Vec::new();
        let mut cols = (0u16, 0u16);
        let mut rows_win = (0u16, 0u16);
        let mut cursor: Option<(u16, u16)> = None;
        let mut high: Option<u8> = None;

        for event in events {
            match *event {
                BusEvent::Command(c) => {
                    command = c;
                    params.clear();
                    high = None;
                    cursor = (c == cmd::RAMWR).then_some((cols.0, rows_win.0));
                }
                BusEvent::Data(byte) => match command {
                    cmd::CASET | cmd::RASET => {
                        params.push(byte);
                        if params.len() == 4 {
                            let range = decode_range(revision.address_encoding, &params);
                            if command == cmd::CASET {
                                cols = range;
                            } else {
                                rows_win = range;
                            }
                        }
                    }
                    cmd::RAMWR => match high.take() {
                        None => high = Some(byte),
                        Some(hi) => {
                            let value = u16::from_be_bytes([hi, byte]);
                            match cursor {
                                Some((c, r)) => {
                                    let index = r as usize * columns + c as usize;
                                    if let Some(cell) = screen.cells.get_mut(index) {
                                        *cell = Some(value);
                                    }
                                    cursor = if c < cols.1 {
                                        Some((c + 1, r))
                                    } else if r < rows_win.1 {
                                        Some((cols.0, r + 1))
                                    } else {
                                        None
                                    };
                                }
                                None => screen.overflow += 1,
                            }
                        }
                    },
                    _ => {}
                },
                _ => {}
            }
        }
        screen
    }

    /// Colour last written at logical `(x, y)`, if any
    pub fn pixel(&self, x: u16, y: u16) -> Option<Color> {
        if x >= self.revision.width || y >= self.revision.height {
            return None;
        }
        let (col, row) = self.revision.to_panel(x, y);
        let index = row as usize * self.revision.panel_columns() as usize + col as usize;
        self.cells[index].map(Color)
    }

    /// Logical coordinates of every written pixel
    pub fn written(&self) -> Vec<(u16, u16)> {
        let mut out = Vec::new();
        for y in 0..self.revision.height {
            for x in 0..self.revision.width {
                if self.pixel(x, y).is_some() {
                    out.push((x, y));
                }
            }
        }
        out
    }
}

fn decode_range(encoding: AddressEncoding, params: &[u8]) -> (u16, u16) {
    match encoding {
        AddressEncoding::Doubled => (params[1] as u16, params[3] as u16),
        AddressEncoding::Wide => (
            u16::from_be_bytes([params[0], params[1]]),
            u16::from_be_bytes([params[2], params[3]]),
        ),
    }
}
