//! Code page 437 font
//!
//! One 8x8 glyph per byte value, eight rows top to bottom, most significant
//! bit leftmost. Zoom options double the output size without a second table.

use core::ops::{BitOr, BitOrAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Glyph width and height in font pixels
pub const GLYPH_SIZE: u16 = 8;

/// Font output options, combined with `|`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FontOptions(pub u8);

impl FontOptions {
    /// Plain 8x8 output
    pub const NORMAL: Self = Self(0x00);
    /// Every font column is written twice
    pub const DOUBLE_WIDTH: Self = Self(0x02);
    /// Every font row is written twice
    pub const DOUBLE_HEIGHT: Self = Self(0x04);
    /// 8x16 cells
    pub const FONT_8X16: Self = Self::DOUBLE_HEIGHT;
    /// 16x16 cells
    pub const FONT_16X16: Self = Self(Self::DOUBLE_WIDTH.0 | Self::DOUBLE_HEIGHT.0);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Horizontal magnification, 1 or 2
    pub const fn x_zoom(self) -> u16 {
        if self.contains(Self::DOUBLE_WIDTH) {
            2
        } else {
            1
        }
    }

    /// Vertical magnification, 1 or 2
    pub const fn y_zoom(self) -> u16 {
        if self.contains(Self::DOUBLE_HEIGHT) {
            2
        } else {
            1
        }
    }

    /// Width of one character cell on screen
    pub const fn char_width(self) -> u16 {
        GLYPH_SIZE * self.x_zoom()
    }

    /// Height of one text line on screen
    pub const fn char_height(self) -> u16 {
        GLYPH_SIZE * self.y_zoom()
    }

    /// Width of `text` on one line
    ///
    /// Line breaks and tabs take no space of their own.
    pub fn text_width(self, text: &str) -> u32 {
        let glyphs = text.chars().filter(|c| !matches!(c, '\n' | '\r' | '\t')).count();
        glyphs as u32 * self.char_width() as u32
    }
}

impl BitOr for FontOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Rows of the glyph for `code`
pub fn glyph(code: u8) -> &'static [u8; 8] {
    &FONT_8X8[code as usize]
}

/// Map a character to its code page 437 byte
///
/// ASCII maps to itself. A handful of accented letters, symbols and
/// box-drawing characters have their own glyphs; anything else shows as `?`.
pub fn cp437(c: char) -> u8 {
    if c.is_ascii() {
        return c as u8;
    }
    match c {
        '☺' => 0x01,
        '♥' => 0x03,
        '♦' => 0x04,
        '♣' => 0x05,
        '♠' => 0x06,
        '•' => 0x07,
        '►' => 0x10,
        '◄' => 0x11,
        '↕' => 0x12,
        '¶' => 0x14,
        '§' => 0x15,
        '↑' => 0x18,
        '↓' => 0x19,
        '→' => 0x1A,
        '←' => 0x1B,
        '↔' => 0x1D,
        '▲' => 0x1E,
        '▼' => 0x1F,
        'Ç' => 0x80,
        'ü' => 0x81,
        'é' => 0x82,
        'â' => 0x83,
        'ä' => 0x84,
        'à' => 0x85,
        'å' => 0x86,
        'ç' => 0x87,
        'ê' => 0x88,
        'ë' => 0x89,
        'è' => 0x8A,
        'ï' => 0x8B,
        'î' => 0x8C,
        'ì' => 0x8D,
        'Ä' => 0x8E,
        'Å' => 0x8F,
        'É' => 0x90,
        'æ' => 0x91,
        'Æ' => 0x92,
        'ô' => 0x93,
        'ö' => 0x94,
        'ò' => 0x95,
        'û' => 0x96,
        'ù' => 0x97,
        'ÿ' => 0x98,
        'Ö' => 0x99,
        'Ü' => 0x9A,
        '¢' => 0x9B,
        '£' => 0x9C,
        '¥' => 0x9D,
        'ƒ' => 0x9F,
        'á' => 0xA0,
        'í' => 0xA1,
        'ó' => 0xA2,
        'ú' => 0xA3,
        'ñ' => 0xA4,
        'Ñ' => 0xA5,
        'ª' => 0xA6,
        'º' => 0xA7,
        '¿' => 0xA8,
        '¬' => 0xAA,
        '½' => 0xAB,
        '¼' => 0xAC,
        '¡' => 0xAD,
        '«' => 0xAE,
        '»' => 0xAF,
        '░' => 0xB0,
        '▒' => 0xB1,
        '▓' => 0xB2,
        '│' => 0xB3,
        '┤' => 0xB4,
        '║' => 0xBA,
        '╗' => 0xBB,
        '╝' => 0xBC,
        '┐' => 0xBF,
        '└' => 0xC0,
        '┴' => 0xC1,
        '┬' => 0xC2,
        '├' => 0xC3,
        '─' => 0xC4,
        '┼' => 0xC5,
        '╚' => 0xC8,
        '╔' => 0xC9,
        '╩' => 0xCA,
        '╦' => 0xCB,
        '╠' => 0xCC,
        '═' => 0xCD,
        '╬' => 0xCE,
        '┘' => 0xD9,
        '┌' => 0xDA,
        '█' => 0xDB,
        '▄' => 0xDC,
        '▌' => 0xDD,
        '▐' => 0xDE,
        '▀' => 0xDF,
        'α' => 0xE0,
        'ß' => 0xE1,
        'Γ' => 0xE2,
        'π' => 0xE3,
        'Σ' => 0xE4,
        'σ' => 0xE5,
        'µ' | 'μ' => 0xE6,
        'τ' => 0xE7,
        'Φ' => 0xE8,
        'Θ' => 0xE9,
        'Ω' => 0xEA,
        'δ' => 0xEB,
        '∞' => 0xEC,
        'φ' => 0xED,
        'ε' => 0xEE,
        '∩' => 0xEF,
        '≡' => 0xF0,
        '±' => 0xF1,
        '≥' => 0xF2,
        '≤' => 0xF3,
        '÷' => 0xF6,
        '≈' => 0xF7,
        '°' => 0xF8,
        '∙' => 0xF9,
        '·' => 0xFA,
        '√' => 0xFB,
        'ⁿ' => 0xFC,
        '²' => 0xFD,
        '■' => 0xFE,
        _ => b'?',
    }
}

/// The 8x8 VGA glyphs, 256 characters of 8 rows
#[rustfmt::skip]
pub static FONT_8X8: [[u8; 8]; 256] = [
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x00
    [0x7E, 0x81, 0xA5, 0x81, 0xBD, 0x99, 0x81, 0x7E], // 0x01
    [0x7E, 0xFF, 0xDB, 0xFF, 0xC3, 0xE7, 0xFF, 0x7E], // 0x02
    [0x6C, 0xFE, 0xFE, 0xFE, 0x7C, 0x38, 0x10, 0x00], // 0x03
    [0x10, 0x38, 0x7C, 0xFE, 0x7C, 0x38, 0x10, 0x00], // 0x04
    [0x38, 0x7C, 0x38, 0xFE, 0xFE, 0x7C, 0x38, 0x7C], // 0x05
    [0x10, 0x10, 0x38, 0x7C, 0xFE, 0x7C, 0x38, 0x7C], // 0x06
    [0x00, 0x00, 0x18, 0x3C, 0x3C, 0x18, 0x00, 0x00], // 0x07
    [0xFF, 0xFF, 0xE7, 0xC3, 0xC3, 0xE7, 0xFF, 0xFF], // 0x08
    [0x00, 0x3C, 0x66, 0x42, 0x42, 0x66, 0x3C, 0x00], // 0x09
    [0xFF, 0xC3, 0x99, 0xBD, 0xBD, 0x99, 0xC3, 0xFF], // 0x0A
    [0x0F, 0x07, 0x0F, 0x7D, 0xCC, 0xCC, 0xCC, 0x78], // 0x0B
    [0x3C, 0x66, 0x66, 0x66, 0x3C, 0x18, 0x7E, 0x18], // 0x0C
    [0x3F, 0x33, 0x3F, 0x30, 0x30, 0x70, 0xF0, 0xE0], // 0x0D
    [0x7F, 0x63, 0x7F, 0x63, 0x63, 0x67, 0xE6, 0xC0], // 0x0E
    [0x99, 0x5A, 0x3C, 0xE7, 0xE7, 0x3C, 0x5A, 0x99], // 0x0F
    [0x80, 0xE0, 0xF8, 0xFE, 0xF8, 0xE0, 0x80, 0x00], // 0x10
    [0x02, 0x0E, 0x3E, 0xFE, 0x3E, 0x0E, 0x02, 0x00], // 0x11
    [0x18, 0x3C, 0x7E, 0x18, 0x18, 0x7E, 0x3C, 0x18], // 0x12
    [0x66, 0x66, 0x66, 0x66, 0x66, 0x00, 0x66, 0x00], // 0x13
    [0x7F, 0xDB, 0xDB, 0x7B, 0x1B, 0x1B, 0x1B, 0x00], // 0x14
    [0x3E, 0x63, 0x38, 0x6C, 0x6C, 0x38, 0xCC, 0x78], // 0x15
    [0x00, 0x00, 0x00, 0x00, 0x7E, 0x7E, 0x7E, 0x00], // 0x16
    [0x18, 0x3C, 0x7E, 0x18, 0x7E, 0x3C, 0x18, 0xFF], // 0x17
    [0x18, 0x3C, 0x7E, 0x18, 0x18, 0x18, 0x18, 0x00], // 0x18
    [0x18, 0x18, 0x18, 0x18, 0x7E, 0x3C, 0x18, 0x00], // 0x19
    [0x00, 0x18, 0x0C, 0xFE, 0x0C, 0x18, 0x00, 0x00], // 0x1A
    [0x00, 0x30, 0x60, 0xFE, 0x60, 0x30, 0x00, 0x00], // 0x1B
    [0x00, 0x00, 0xC0, 0xC0, 0xC0, 0xFE, 0x00, 0x00], // 0x1C
    [0x00, 0x24, 0x66, 0xFF, 0x66, 0x24, 0x00, 0x00], // 0x1D
    [0x00, 0x18, 0x3C, 0x7E, 0xFF, 0xFF, 0x00, 0x00], // 0x1E
    [0x00, 0xFF, 0xFF, 0x7E, 0x3C, 0x18, 0x00, 0x00], // 0x1F
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x20
    [0x30, 0x78, 0x78, 0x30, 0x30, 0x00, 0x30, 0x00], // 0x21 '!'
    [0x6C, 0x6C, 0x6C, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x22 '"'
    [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00], // 0x23 '#'
    [0x30, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x30, 0x00], // 0x24 '$'
    [0x00, 0xC6, 0xCC, 0x18, 0x30, 0x66, 0xC6, 0x00], // 0x25 '%'
    [0x38, 0x6C, 0x38, 0x76, 0xDC, 0xCC, 0x76, 0x00], // 0x26 '&'
    [0x60, 0x60, 0xC0, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x27 '\''
    [0x18, 0x30, 0x60, 0x60, 0x60, 0x30, 0x18, 0x00], // 0x28 '('
    [0x60, 0x30, 0x18, 0x18, 0x18, 0x30, 0x60, 0x00], // 0x29 ')'
    [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00], // 0x2A '*'
    [0x00, 0x30, 0x30, 0xFC, 0x30, 0x30, 0x00, 0x00], // 0x2B '+'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x60], // 0x2C ','
    [0x00, 0x00, 0x00, 0xFC, 0x00, 0x00, 0x00, 0x00], // 0x2D '-'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x30, 0x30, 0x00], // 0x2E '.'
    [0x06, 0x0C, 0x18, 0x30, 0x60, 0xC0, 0x80, 0x00], // 0x2F '/'
    [0x7C, 0xC6, 0xCE, 0xDE, 0xF6, 0xE6, 0x7C, 0x00], // 0x30 '0'
    [0x30, 0x70, 0x30, 0x30, 0x30, 0x30, 0xFC, 0x00], // 0x31 '1'
    [0x78, 0xCC, 0x0C, 0x38, 0x60, 0xCC, 0xFC, 0x00], // 0x32 '2'
    [0x78, 0xCC, 0x0C, 0x38, 0x0C, 0xCC, 0x78, 0x00], // 0x33 '3'
    [0x1C, 0x3C, 0x6C, 0xCC, 0xFE, 0x0C, 0x1E, 0x00], // 0x34 '4'
    [0xFC, 0xC0, 0xF8, 0x0C, 0x0C, 0xCC, 0x78, 0x00], // 0x35 '5'
    [0x38, 0x60, 0xC0, 0xF8, 0xCC, 0xCC, 0x78, 0x00], // 0x36 '6'
    [0xFC, 0xCC, 0x0C, 0x18, 0x30, 0x30, 0x30, 0x00], // 0x37 '7'
    [0x78, 0xCC, 0xCC, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 0x38 '8'
    [0x78, 0xCC, 0xCC, 0x7C, 0x0C, 0x18, 0x70, 0x00], // 0x39 '9'
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x00], // 0x3A ':'
    [0x00, 0x30, 0x30, 0x00, 0x00, 0x30, 0x30, 0x60], // 0x3B ';'
    [0x18, 0x30, 0x60, 0xC0, 0x60, 0x30, 0x18, 0x00], // 0x3C '<'
    [0x00, 0x00, 0xFC, 0x00, 0x00, 0xFC, 0x00, 0x00], // 0x3D '='
    [0x60, 0x30, 0x18, 0x0C, 0x18, 0x30, 0x60, 0x00], // 0x3E '>'
    [0x78, 0xCC, 0x0C, 0x18, 0x30, 0x00, 0x30, 0x00], // 0x3F '?'
    [0x7C, 0xC6, 0xDE, 0xDE, 0xDE, 0xC0, 0x78, 0x00], // 0x40 '@'
    [0x30, 0x78, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0x00], // 0x41 'A'
    [0xFC, 0x66, 0x66, 0x7C, 0x66, 0x66, 0xFC, 0x00], // 0x42 'B'
    [0x3C, 0x66, 0xC0, 0xC0, 0xC0, 0x66, 0x3C, 0x00], // 0x43 'C'
    [0xF8, 0x6C, 0x66, 0x66, 0x66, 0x6C, 0xF8, 0x00], // 0x44 'D'
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x62, 0xFE, 0x00], // 0x45 'E'
    [0xFE, 0x62, 0x68, 0x78, 0x68, 0x60, 0xF0, 0x00], // 0x46 'F'
    [0x3C, 0x66, 0xC0, 0xC0, 0xCE, 0x66, 0x3E, 0x00], // 0x47 'G'
    [0xCC, 0xCC, 0xCC, 0xFC, 0xCC, 0xCC, 0xCC, 0x00], // 0x48 'H'
    [0x78, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // 0x49 'I'
    [0x1E, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78, 0x00], // 0x4A 'J'
    [0xE6, 0x66, 0x6C, 0x78, 0x6C, 0x66, 0xE6, 0x00], // 0x4B 'K'
    [0xF0, 0x60, 0x60, 0x60, 0x62, 0x66, 0xFE, 0x00], // 0x4C 'L'
    [0xC6, 0xEE, 0xFE, 0xFE, 0xD6, 0xC6, 0xC6, 0x00], // 0x4D 'M'
    [0xC6, 0xE6, 0xF6, 0xDE, 0xCE, 0xC6, 0xC6, 0x00], // 0x4E 'N'
    [0x38, 0x6C, 0xC6, 0xC6, 0xC6, 0x6C, 0x38, 0x00], // 0x4F 'O'
    [0xFC, 0x66, 0x66, 0x7C, 0x60, 0x60, 0xF0, 0x00], // 0x50 'P'
    [0x78, 0xCC, 0xCC, 0xCC, 0xDC, 0x78, 0x1C, 0x00], // 0x51 'Q'
    [0xFC, 0x66, 0x66, 0x7C, 0x6C, 0x66, 0xE6, 0x00], // 0x52 'R'
    [0x78, 0xCC, 0xE0, 0x70, 0x1C, 0xCC, 0x78, 0x00], // 0x53 'S'
    [0xFC, 0xB4, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // 0x54 'T'
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xFC, 0x00], // 0x55 'U'
    [0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // 0x56 'V'
    [0xC6, 0xC6, 0xC6, 0xD6, 0xFE, 0xEE, 0xC6, 0x00], // 0x57 'W'
    [0xC6, 0xC6, 0x6C, 0x38, 0x38, 0x6C, 0xC6, 0x00], // 0x58 'X'
    [0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x30, 0x78, 0x00], // 0x59 'Y'
    [0xFE, 0xC6, 0x8C, 0x18, 0x32, 0x66, 0xFE, 0x00], // 0x5A 'Z'
    [0x78, 0x60, 0x60, 0x60, 0x60, 0x60, 0x78, 0x00], // 0x5B '['
    [0xC0, 0x60, 0x30, 0x18, 0x0C, 0x06, 0x02, 0x00], // 0x5C '\\'
    [0x78, 0x18, 0x18, 0x18, 0x18, 0x18, 0x78, 0x00], // 0x5D ']'
    [0x10, 0x38, 0x6C, 0xC6, 0x00, 0x00, 0x00, 0x00], // 0x5E '^'
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF], // 0x5F '_'
    [0x30, 0x30, 0x18, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x60 '`'
    [0x00, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x76, 0x00], // 0x61 'a'
    [0xE0, 0x60, 0x60, 0x7C, 0x66, 0x66, 0xDC, 0x00], // 0x62 'b'
    [0x00, 0x00, 0x78, 0xCC, 0xC0, 0xCC, 0x78, 0x00], // 0x63 'c'
    [0x1C, 0x0C, 0x0C, 0x7C, 0xCC, 0xCC, 0x76, 0x00], // 0x64 'd'
    [0x00, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // 0x65 'e'
    [0x38, 0x6C, 0x60, 0xF0, 0x60, 0x60, 0xF0, 0x00], // 0x66 'f'
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // 0x67 'g'
    [0xE0, 0x60, 0x6C, 0x76, 0x66, 0x66, 0xE6, 0x00], // 0x68 'h'
    [0x30, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // 0x69 'i'
    [0x0C, 0x00, 0x0C, 0x0C, 0x0C, 0xCC, 0xCC, 0x78], // 0x6A 'j'
    [0xE0, 0x60, 0x66, 0x6C, 0x78, 0x6C, 0xE6, 0x00], // 0x6B 'k'
    [0x70, 0x30, 0x30, 0x30, 0x30, 0x30, 0x78, 0x00], // 0x6C 'l'
    [0x00, 0x00, 0xCC, 0xFE, 0xFE, 0xD6, 0xC6, 0x00], // 0x6D 'm'
    [0x00, 0x00, 0xF8, 0xCC, 0xCC, 0xCC, 0xCC, 0x00], // 0x6E 'n'
    [0x00, 0x00, 0x78, 0xCC, 0xCC, 0xCC, 0x78, 0x00], // 0x6F 'o'
    [0x00, 0x00, 0xDC, 0x66, 0x66, 0x7C, 0x60, 0xF0], // 0x70 'p'
    [0x00, 0x00, 0x76, 0xCC, 0xCC, 0x7C, 0x0C, 0x1E], // 0x71 'q'
    [0x00, 0x00, 0xDC, 0x76, 0x66, 0x60, 0xF0, 0x00], // 0x72 'r'
    [0x00, 0x00, 0x7C, 0xC0, 0x78, 0x0C, 0xF8, 0x00], // 0x73 's'
    [0x10, 0x30, 0x7C, 0x30, 0x30, 0x34, 0x18, 0x00], // 0x74 't'
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0xCC, 0x76, 0x00], // 0x75 'u'
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x78, 0x30, 0x00], // 0x76 'v'
    [0x00, 0x00, 0xC6, 0xD6, 0xFE, 0xFE, 0x6C, 0x00], // 0x77 'w'
    [0x00, 0x00, 0xC6, 0x6C, 0x38, 0x6C, 0xC6, 0x00], // 0x78 'x'
    [0x00, 0x00, 0xCC, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // 0x79 'y'
    [0x00, 0x00, 0xFC, 0x98, 0x30, 0x64, 0xFC, 0x00], // 0x7A 'z'
    [0x1C, 0x30, 0x30, 0xE0, 0x30, 0x30, 0x1C, 0x00], // 0x7B '{'
    [0x18, 0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x00], // 0x7C '|'
    [0xE0, 0x30, 0x30, 0x1C, 0x30, 0x30, 0xE0, 0x00], // 0x7D '}'
    [0x76, 0xDC, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0x7E '~'
    [0x00, 0x10, 0x38, 0x6C, 0xC6, 0xC6, 0xFE, 0x00], // 0x7F
    [0x78, 0xCC, 0xC0, 0xCC, 0x78, 0x18, 0x0C, 0x78], // 0x80
    [0x00, 0xCC, 0x00, 0xCC, 0xCC, 0xCC, 0x7E, 0x00], // 0x81
    [0x1C, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // 0x82
    [0x7E, 0xC3, 0x3C, 0x06, 0x3E, 0x66, 0x3F, 0x00], // 0x83
    [0xCC, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x7E, 0x00], // 0x84
    [0xE0, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x7E, 0x00], // 0x85
    [0x30, 0x30, 0x78, 0x0C, 0x7C, 0xCC, 0x7E, 0x00], // 0x86
    [0x00, 0x00, 0x78, 0xC0, 0xC0, 0x78, 0x0C, 0x38], // 0x87
    [0x7E, 0xC3, 0x3C, 0x66, 0x7E, 0x60, 0x3C, 0x00], // 0x88
    [0xCC, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // 0x89
    [0xE0, 0x00, 0x78, 0xCC, 0xFC, 0xC0, 0x78, 0x00], // 0x8A
    [0xCC, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // 0x8B
    [0x7C, 0xC6, 0x38, 0x18, 0x18, 0x18, 0x3C, 0x00], // 0x8C
    [0xE0, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // 0x8D
    [0xC6, 0x38, 0x6C, 0xC6, 0xFE, 0xC6, 0xC6, 0x00], // 0x8E
    [0x30, 0x30, 0x00, 0x78, 0xCC, 0xFC, 0xCC, 0x00], // 0x8F
    [0x1C, 0x00, 0xFC, 0x60, 0x78, 0x60, 0xFC, 0x00], // 0x90
    [0x00, 0x00, 0x7F, 0x0C, 0x7F, 0xCC, 0x7F, 0x00], // 0x91
    [0x3E, 0x6C, 0xCC, 0xFE, 0xCC, 0xCC, 0xCE, 0x00], // 0x92
    [0x78, 0xCC, 0x00, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 0x93
    [0x00, 0xCC, 0x00, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 0x94
    [0x00, 0xE0, 0x00, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 0x95
    [0x78, 0xCC, 0x00, 0xCC, 0xCC, 0xCC, 0x7E, 0x00], // 0x96
    [0x00, 0xE0, 0x00, 0xCC, 0xCC, 0xCC, 0x7E, 0x00], // 0x97
    [0x00, 0xCC, 0x00, 0xCC, 0xCC, 0x7C, 0x0C, 0xF8], // 0x98
    [0xC3, 0x18, 0x3C, 0x66, 0x66, 0x3C, 0x18, 0x00], // 0x99
    [0xCC, 0x00, 0xCC, 0xCC, 0xCC, 0xCC, 0x78, 0x00], // 0x9A
    [0x18, 0x18, 0x7E, 0xC0, 0xC0, 0x7E, 0x18, 0x18], // 0x9B
    [0x38, 0x6C, 0x64, 0xF0, 0x60, 0xE6, 0xFC, 0x00], // 0x9C
    [0xCC, 0xCC, 0x78, 0xFC, 0x30, 0xFC, 0x30, 0x30], // 0x9D
    [0xF8, 0xCC, 0xCC, 0xFA, 0xC6, 0xCF, 0xC6, 0xC7], // 0x9E
    [0x0E, 0x1B, 0x18, 0x3C, 0x18, 0x18, 0xD8, 0x70], // 0x9F
    [0x1C, 0x00, 0x78, 0x0C, 0x7C, 0xCC, 0x7E, 0x00], // 0xA0
    [0x38, 0x00, 0x70, 0x30, 0x30, 0x30, 0x78, 0x00], // 0xA1
    [0x00, 0x1C, 0x00, 0x78, 0xCC, 0xCC, 0x78, 0x00], // 0xA2
    [0x00, 0x1C, 0x00, 0xCC, 0xCC, 0xCC, 0x7E, 0x00], // 0xA3
    [0x00, 0xF8, 0x00, 0xF8, 0xCC, 0xCC, 0xCC, 0x00], // 0xA4
    [0xFC, 0x00, 0xCC, 0xEC, 0xFC, 0xDC, 0xCC, 0x00], // 0xA5
    [0x3C, 0x6C, 0x6C, 0x3E, 0x00, 0x7E, 0x00, 0x00], // 0xA6
    [0x38, 0x6C, 0x6C, 0x38, 0x00, 0x7C, 0x00, 0x00], // 0xA7
    [0x30, 0x00, 0x30, 0x60, 0xC0, 0xCC, 0x78, 0x00], // 0xA8
    [0x00, 0x00, 0x00, 0xFC, 0xC0, 0xC0, 0x00, 0x00], // 0xA9
    [0x00, 0x00, 0x00, 0xFC, 0x0C, 0x0C, 0x00, 0x00], // 0xAA
    [0xC3, 0xC6, 0xCC, 0xDE, 0x33, 0x66, 0xCC, 0x0F], // 0xAB
    [0xC3, 0xC6, 0xCC, 0xDB, 0x37, 0x6F, 0xCF, 0x03], // 0xAC
    [0x18, 0x18, 0x00, 0x18, 0x18, 0x18, 0x18, 0x00], // 0xAD
    [0x00, 0x33, 0x66, 0xCC, 0x66, 0x33, 0x00, 0x00], // 0xAE
    [0x00, 0xCC, 0x66, 0x33, 0x66, 0xCC, 0x00, 0x00], // 0xAF
    [0x22, 0x88, 0x22, 0x88, 0x22, 0x88, 0x22, 0x88], // 0xB0
    [0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA], // 0xB1
    [0xDB, 0x77, 0xDB, 0xEE, 0xDB, 0x77, 0xDB, 0xEE], // 0xB2
    [0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18, 0x18], // 0xB3
    [0x18, 0x18, 0x18, 0x18, 0xF8, 0x18, 0x18, 0x18], // 0xB4
    [0x18, 0x18, 0xF8, 0x18, 0xF8, 0x18, 0x18, 0x18], // 0xB5
    [0x36, 0x36, 0x36, 0x36, 0xF6, 0x36, 0x36, 0x36], // 0xB6
    [0x00, 0x00, 0x00, 0x00, 0xFE, 0x36, 0x36, 0x36], // 0xB7
    [0x00, 0x00, 0xF8, 0x18, 0xF8, 0x18, 0x18, 0x18], // 0xB8
    [0x36, 0x36, 0xF6, 0x06, 0xF6, 0x36, 0x36, 0x36], // 0xB9
    [0x36, 0x36, 0x36, 0x36, 0x36, 0x36, 0x36, 0x36], // 0xBA
    [0x00, 0x00, 0xFE, 0x06, 0xF6, 0x36, 0x36, 0x36], // 0xBB
    [0x36, 0x36, 0xF6, 0x06, 0xFE, 0x00, 0x00, 0x00], // 0xBC
    [0x36, 0x36, 0x36, 0x36, 0xFE, 0x00, 0x00, 0x00], // 0xBD
    [0x18, 0x18, 0xF8, 0x18, 0xF8, 0x00, 0x00, 0x00], // 0xBE
    [0x00, 0x00, 0x00, 0x00, 0xF8, 0x18, 0x18, 0x18], // 0xBF
    [0x18, 0x18, 0x18, 0x18, 0x1F, 0x00, 0x00, 0x00], // 0xC0
    [0x18, 0x18, 0x18, 0x18, 0xFF, 0x00, 0x00, 0x00], // 0xC1
    [0x00, 0x00, 0x00, 0x00, 0xFF, 0x18, 0x18, 0x18], // 0xC2
    [0x18, 0x18, 0x18, 0x18, 0x1F, 0x18, 0x18, 0x18], // 0xC3
    [0x00, 0x00, 0x00, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xC4
    [0x18, 0x18, 0x18, 0x18, 0xFF, 0x18, 0x18, 0x18], // 0xC5
    [0x18, 0x18, 0x1F, 0x18, 0x1F, 0x18, 0x18, 0x18], // 0xC6
    [0x36, 0x36, 0x36, 0x36, 0x37, 0x36, 0x36, 0x36], // 0xC7
    [0x36, 0x36, 0x37, 0x30, 0x3F, 0x00, 0x00, 0x00], // 0xC8
    [0x00, 0x00, 0x3F, 0x30, 0x37, 0x36, 0x36, 0x36], // 0xC9
    [0x36, 0x36, 0xF7, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xCA
    [0x00, 0x00, 0xFF, 0x00, 0xF7, 0x36, 0x36, 0x36], // 0xCB
    [0x36, 0x36, 0x37, 0x30, 0x37, 0x36, 0x36, 0x36], // 0xCC
    [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xCD
    [0x36, 0x36, 0xF7, 0x00, 0xF7, 0x36, 0x36, 0x36], // 0xCE
    [0x18, 0x18, 0xFF, 0x00, 0xFF, 0x00, 0x00, 0x00], // 0xCF
    [0x36, 0x36, 0x36, 0x36, 0xFF, 0x00, 0x00, 0x00], // 0xD0
    [0x00, 0x00, 0xFF, 0x00, 0xFF, 0x18, 0x18, 0x18], // 0xD1
    [0x00, 0x00, 0x00, 0x00, 0xFF, 0x36, 0x36, 0x36], // 0xD2
    [0x36, 0x36, 0x36, 0x36, 0x3F, 0x00, 0x00, 0x00], // 0xD3
    [0x18, 0x18, 0x1F, 0x18, 0x1F, 0x00, 0x00, 0x00], // 0xD4
    [0x00, 0x00, 0x1F, 0x18, 0x1F, 0x18, 0x18, 0x18], // 0xD5
    [0x00, 0x00, 0x00, 0x00, 0x3F, 0x36, 0x36, 0x36], // 0xD6
    [0x36, 0x36, 0x36, 0x36, 0xFF, 0x36, 0x36, 0x36], // 0xD7
    [0x18, 0x18, 0xFF, 0x18, 0xFF, 0x18, 0x18, 0x18], // 0xD8
    [0x18, 0x18, 0x18, 0x18, 0xF8, 0x00, 0x00, 0x00], // 0xD9
    [0x00, 0x00, 0x00, 0x00, 0x1F, 0x18, 0x18, 0x18], // 0xDA
    [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF], // 0xDB
    [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF], // 0xDC
    [0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0, 0xF0], // 0xDD
    [0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F, 0x0F], // 0xDE
    [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00], // 0xDF
    [0x00, 0x00, 0x76, 0xDC, 0xC8, 0xDC, 0x76, 0x00], // 0xE0
    [0x00, 0x78, 0xCC, 0xF8, 0xCC, 0xF8, 0xC0, 0xC0], // 0xE1
    [0x00, 0xFC, 0xCC, 0xC0, 0xC0, 0xC0, 0xC0, 0x00], // 0xE2
    [0x00, 0xFE, 0x6C, 0x6C, 0x6C, 0x6C, 0x6C, 0x00], // 0xE3
    [0xFC, 0xCC, 0x60, 0x30, 0x60, 0xCC, 0xFC, 0x00], // 0xE4
    [0x00, 0x00, 0x7E, 0xD8, 0xD8, 0xD8, 0x70, 0x00], // 0xE5
    [0x00, 0x66, 0x66, 0x66, 0x66, 0x7C, 0x60, 0xC0], // 0xE6
    [0x00, 0x76, 0xDC, 0x18, 0x18, 0x18, 0x18, 0x00], // 0xE7
    [0xFC, 0x30, 0x78, 0xCC, 0xCC, 0x78, 0x30, 0xFC], // 0xE8
    [0x38, 0x6C, 0xC6, 0xFE, 0xC6, 0x6C, 0x38, 0x00], // 0xE9
    [0x38, 0x6C, 0xC6, 0xC6, 0x6C, 0x6C, 0xEE, 0x00], // 0xEA
    [0x1C, 0x30, 0x18, 0x7C, 0xCC, 0xCC, 0x78, 0x00], // 0xEB
    [0x00, 0x00, 0x7E, 0xDB, 0xDB, 0x7E, 0x00, 0x00], // 0xEC
    [0x06, 0x0C, 0x7E, 0xDB, 0xDB, 0x7E, 0x60, 0xC0], // 0xED
    [0x38, 0x60, 0xC0, 0xF8, 0xC0, 0x60, 0x38, 0x00], // 0xEE
    [0x78, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0xCC, 0x00], // 0xEF
    [0x00, 0xFC, 0x00, 0xFC, 0x00, 0xFC, 0x00, 0x00], // 0xF0
    [0x30, 0x30, 0xFC, 0x30, 0x30, 0x00, 0xFC, 0x00], // 0xF1
    [0x60, 0x30, 0x18, 0x30, 0x60, 0x00, 0xFC, 0x00], // 0xF2
    [0x18, 0x30, 0x60, 0x30, 0x18, 0x00, 0xFC, 0x00], // 0xF3
    [0x0E, 0x1B, 0x1B, 0x18, 0x18, 0x18, 0x18, 0x18], // 0xF4
    [0x18, 0x18, 0x18, 0x18, 0x18, 0xD8, 0xD8, 0x70], // 0xF5
    [0x30, 0x30, 0x00, 0xFC, 0x00, 0x30, 0x30, 0x00], // 0xF6
    [0x00, 0x76, 0xDC, 0x00, 0x76, 0xDC, 0x00, 0x00], // 0xF7
    [0x38, 0x6C, 0x6C, 0x38, 0x00, 0x00, 0x00, 0x00], // 0xF8
    [0x00, 0x00, 0x00, 0x18, 0x18, 0x00, 0x00, 0x00], // 0xF9
    [0x00, 0x00, 0x00, 0x00, 0x18, 0x00, 0x00, 0x00], // 0xFA
    [0x0F, 0x0C, 0x0C, 0x0C, 0xEC, 0x6C, 0x3C, 0x1C], // 0xFB
    [0x78, 0x6C, 0x6C, 0x6C, 0x6C, 0x00, 0x00, 0x00], // 0xFC
    [0x70, 0x18, 0x30, 0x60, 0x78, 0x00, 0x00, 0x00], // 0xFD
    [0x00, 0x00, 0x3C, 0x3C, 0x3C, 0x3C, 0x00, 0x00], // 0xFE
    [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00], // 0xFF
];

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(code: u8, x: usize, y: usize) -> bool {
        glyph(code)[y] & (0x80 >> x) != 0
    }

    #[test]
    fn test_space_and_nul_are_blank() {
        assert_eq!(glyph(b' '), &[0; 8]);
        assert_eq!(glyph(0), &[0; 8]);
        assert_eq!(glyph(0xFF), &[0; 8]);
    }

    #[test]
    fn test_full_block_is_solid() {
        assert_eq!(glyph(0xDB), &[0xFF; 8]);
        assert_eq!(glyph(cp437('█')), &[0xFF; 8]);
    }

    #[test]
    fn test_letter_shapes() {
        // 'A' has an open apex and a crossbar on row 4
        assert!(!pixel(b'A', 0, 0));
        assert!(pixel(b'A', 2, 0));
        assert_eq!(glyph(b'A')[4], 0xFC);
        // Underscore sits on the bottom row only
        assert_eq!(glyph(b'_')[..7], [0; 7]);
        assert_eq!(glyph(b'_')[7], 0xFF);
        // Left and right half blocks
        assert!(pixel(0xDD, 0, 3) && !pixel(0xDD, 7, 3));
        assert!(!pixel(0xDE, 0, 3) && pixel(0xDE, 7, 3));
    }

    #[test]
    fn test_cp437_mapping() {
        assert_eq!(cp437('A'), b'A');
        assert_eq!(cp437('\n'), b'\n');
        assert_eq!(cp437('°'), 0xF8);
        assert_eq!(cp437('µ'), 0xE6);
        assert_eq!(cp437('ä'), 0x84);
        assert_eq!(cp437('─'), 0xC4);
        assert_eq!(cp437('€'), b'?');
        assert_eq!(cp437('漢'), b'?');
    }

    #[test]
    fn test_font_options() {
        let normal = FontOptions::NORMAL;
        assert_eq!((normal.char_width(), normal.char_height()), (8, 8));

        let tall = FontOptions::FONT_8X16;
        assert_eq!((tall.char_width(), tall.char_height()), (8, 16));

        let big = FontOptions::DOUBLE_WIDTH | FontOptions::DOUBLE_HEIGHT;
        assert_eq!(big, FontOptions::FONT_16X16);
        assert_eq!((big.x_zoom(), big.y_zoom()), (2, 2));
        assert!(big.contains(FontOptions::DOUBLE_WIDTH));
        assert!(!tall.contains(FontOptions::DOUBLE_WIDTH));
    }

    #[test]
    fn test_text_width_ignores_control_characters() {
        assert_eq!(FontOptions::NORMAL.text_width("Hello"), 40);
        assert_eq!(FontOptions::DOUBLE_WIDTH.text_width("ab\r\n"), 32);
        assert_eq!(FontOptions::NORMAL.text_width("\t25°C"), 32);
        assert_eq!(FontOptions::NORMAL.text_width(""), 0);
    }
}
