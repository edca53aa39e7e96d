//! Keypad matrix
//!
//! The keys sit on a small matrix whose rows are dedicated GPIO outputs and
//! whose columns are the LCD data lines. A scan takes the shared port in
//! keypad mode, raises one row at a time, waits for the lines to settle and
//! reads which data lines followed. The LCD ignores all of it because
//! chip-select stays high.
//!
//! The whole scan runs under one lock span: a display task that wants the
//! port waits for every row to be read, and the next drawing call puts the
//! lines back into display mode on its own.

use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use rt3_lcd::{Board, LcdPort};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Time for a driven row to reach the data lines through a closed key
pub const ROW_SETTLE_NS: u32 = 2_000;

/// Matrix rows a [`KeyMap`] describes
pub const MATRIX_ROWS: usize = 3;

/// Data lines per matrix row
pub const MATRIX_LINES: usize = 8;

/// One front-panel key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Key {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Star,
    Hash,
    /// Green key
    Menu,
    /// Red key
    Back,
    Up,
    Down,
}

impl Key {
    /// Every key, in bit order of [`KeySet`]
    pub const ALL: [Key; 16] = [
        Key::Zero,
        Key::One,
        Key::Two,
        Key::Three,
        Key::Four,
        Key::Five,
        Key::Six,
        Key::Seven,
        Key::Eight,
        Key::Nine,
        Key::Star,
        Key::Hash,
        Key::Menu,
        Key::Back,
        Key::Up,
        Key::Down,
    ];

    /// Single-character label for status displays
    pub const fn label(self) -> char {
        match self {
            Key::Zero => '0',
            Key::One => '1',
            Key::Two => '2',
            Key::Three => '3',
            Key::Four => '4',
            Key::Five => '5',
            Key::Six => '6',
            Key::Seven => '7',
            Key::Eight => '8',
            Key::Nine => '9',
            Key::Star => '*',
            Key::Hash => '#',
            Key::Menu => 'M',
            Key::Back => 'B',
            Key::Up => '\u{18}',
            Key::Down => '\u{19}',
        }
    }

    const fn bit(self) -> u16 {
        1 << self as u8
    }
}

/// Set of pressed keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KeySet(u16);

impl KeySet {
    pub const EMPTY: Self = Self(0);

    pub fn insert(&mut self, key: Key) {
        self.0 |= key.bit();
    }

    pub fn remove(&mut self, key: Key) {
        self.0 &= !key.bit();
    }

    pub const fn contains(&self, key: Key) -> bool {
        self.0 & key.bit() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Pressed keys in [`Key::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = Key> + '_ {
        Key::ALL.into_iter().filter(|&k| self.contains(k))
    }
}

/// Key labels separated by spaces, nothing at all when empty
impl fmt::Display for KeySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Write::write_char(f, key.label())?;
        }
        Ok(())
    }
}

impl FromIterator<Key> for KeySet {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        let mut set = Self::EMPTY;
        for key in iter {
            set.insert(key);
        }
        set
    }
}

/// Keypad errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeypadError {
    /// A contact closed where the key map has no key
    UnknownKey { row: u8, line: u8 },
}

/// Which key joins each matrix row to each data line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMap {
    rows: [[Option<Key>; MATRIX_LINES]; MATRIX_ROWS],
}

impl KeyMap {
    /// MD-380 / RT3 front panel
    pub const MD380: Self = Self::new([
        [
            Some(Key::Menu),
            Some(Key::One),
            Some(Key::Four),
            Some(Key::Seven),
            Some(Key::Star),
            None,
            None,
            None,
        ],
        [
            Some(Key::Up),
            Some(Key::Two),
            Some(Key::Five),
            Some(Key::Eight),
            Some(Key::Zero),
            None,
            None,
            None,
        ],
        [
            Some(Key::Down),
            Some(Key::Three),
            Some(Key::Six),
            Some(Key::Nine),
            Some(Key::Hash),
            Some(Key::Back),
            None,
            None,
        ],
    ]);

    pub const fn new(rows: [[Option<Key>; MATRIX_LINES]; MATRIX_ROWS]) -> Self {
        Self { rows }
    }

    /// Key at matrix `row`, data line `line`
    pub fn key(&self, row: u8, line: u8) -> Option<Key> {
        self.rows.get(row as usize)?.get(line as usize).copied().flatten()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::MD380
    }
}

/// Matrix scanner sharing the LCD port
pub struct KeypadScanner {
    map: KeyMap,
    settle_ns: u32,
}

impl KeypadScanner {
    pub const fn new(map: KeyMap) -> Self {
        Self {
            map,
            settle_ns: ROW_SETTLE_NS,
        }
    }

    /// Override the per-row settle time
    pub const fn with_settle_ns(mut self, settle_ns: u32) -> Self {
        self.settle_ns = settle_ns;
        self
    }

    /// Read the whole matrix once
    ///
    /// Rows are numbered in bit order of the board's row group. All rows are
    /// left low afterwards. A closed contact with no key in the map fails
    /// the scan.
    pub async fn scan<M: RawMutex, H: Board>(&self, port: &LcdPort<M, H>) -> Result<KeySet, KeypadError> {
        let mut guard = port.acquire_keypad().await;
        let mask = guard.row_mask();

        let mut keys = KeySet::EMPTY;
        let mut unknown = None;
        let mut row = 0u8;

        for bit in (0u16..16).filter(|bit| mask & (1 << bit) != 0) {
            guard.drive_rows(1 << bit);
            guard.settle(self.settle_ns);
            let lines = guard.read_lines();

            for line in (0..MATRIX_LINES as u8).filter(|line| lines & (1 << line) != 0) {
                match self.map.key(row, line) {
                    Some(key) => keys.insert(key),
                    None => {
                        #[cfg(feature = "defmt")]
                        defmt::warn!("keypad: contact at row {} line {} not mapped", row, line);
                        unknown.get_or_insert(KeypadError::UnknownKey { row, line });
                    }
                }
            }
            row += 1;
        }
        guard.drive_rows(0);

        match unknown {
            Some(err) => Err(err),
            None => Ok(keys),
        }
    }
}

impl Default for KeypadScanner {
    fn default() -> Self {
        Self::new(KeyMap::default())
    }
}
