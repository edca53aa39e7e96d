//! 16-bit packed colours
//!
//! Panels differ in where they expect each channel: the HX8302 panels take
//! RGB565 (red in the top bits), the rotated ST7735 panels take BGR565.
//! Nothing outside this module should assume either; convert through the
//! revision's [`ChannelLayout`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bit positions of the three channels inside a packed colour
///
/// Red and blue are always 5 bits wide, green is always 6 bits wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChannelLayout {
    /// Lowest bit of the 5-bit red field
    pub red_shift: u8,
    /// Lowest bit of the 6-bit green field
    pub green_shift: u8,
    /// Lowest bit of the 5-bit blue field
    pub blue_shift: u8,
}

impl ChannelLayout {
    /// Red in bits 15..11, green in 10..5, blue in 4..0
    pub const RGB565: Self = Self {
        red_shift: 11,
        green_shift: 5,
        blue_shift: 0,
    };

    /// Blue in bits 15..11, green in 10..5, red in 4..0
    pub const BGR565: Self = Self {
        red_shift: 0,
        green_shift: 5,
        blue_shift: 11,
    };

    /// Pack 5/6/5-bit channel values
    ///
    /// Out-of-range channel values are masked, not saturated.
    pub const fn pack(&self, red: u8, green: u8, blue: u8) -> Color {
        Color(
            (((red & 0x1F) as u16) << self.red_shift)
                | (((green & 0x3F) as u16) << self.green_shift)
                | (((blue & 0x1F) as u16) << self.blue_shift),
        )
    }

    /// Split a packed colour into its 5/6/5-bit channels
    pub const fn unpack(&self, color: Color) -> (u8, u8, u8) {
        (
            ((color.0 >> self.red_shift) & 0x1F) as u8,
            ((color.0 >> self.green_shift) & 0x3F) as u8,
            ((color.0 >> self.blue_shift) & 0x1F) as u8,
        )
    }

    /// Pure red
    pub const fn red(&self) -> Color {
        self.pack(0x1F, 0, 0)
    }

    /// Pure green
    pub const fn green(&self) -> Color {
        self.pack(0, 0x3F, 0)
    }

    /// Pure blue
    pub const fn blue(&self) -> Color {
        self.pack(0, 0, 0x1F)
    }

    /// Red + green
    pub const fn yellow(&self) -> Color {
        self.pack(0x1F, 0x3F, 0)
    }

    /// Green + blue
    pub const fn cyan(&self) -> Color {
        self.pack(0, 0x3F, 0x1F)
    }

    /// Red + blue
    pub const fn purple(&self) -> Color {
        self.pack(0x1F, 0, 0x1F)
    }

    /// The blue of the stock firmware's main screen
    pub const fn radio_blue(&self) -> Color {
        self.pack(3, 32, 31)
    }
}

/// A colour as the controller receives it: two bytes, high byte first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u16);

impl Color {
    /// All channels off, identical in every layout
    pub const BLACK: Self = Self(0x0000);

    /// All channels full, identical in every layout
    pub const WHITE: Self = Self(0xFFFF);

    /// Convert from 8-bit-per-channel RGB, dropping the low bits
    pub const fn from_rgb888(layout: ChannelLayout, red: u8, green: u8, blue: u8) -> Self {
        layout.pack(red >> 3, green >> 2, blue >> 3)
    }

    /// Convert to 8-bit-per-channel RGB
    ///
    /// The high bits are replicated into the low bits so full scale maps to
    /// 255 and zero maps to zero.
    pub const fn to_rgb888(self, layout: ChannelLayout) -> (u8, u8, u8) {
        let (r, g, b) = layout.unpack(self);
        ((r << 3) | (r >> 2), (g << 2) | (g >> 4), (b << 3) | (b >> 2))
    }

    /// Bus byte order: most significant byte first
    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }
}

impl From<u16> for Color {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

impl From<Color> for u16 {
    fn from(color: Color) -> Self {
        color.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb565_named_colors() {
        let layout = ChannelLayout::RGB565;
        assert_eq!(layout.red(), Color(0xF800));
        assert_eq!(layout.green(), Color(0x07E0));
        assert_eq!(layout.blue(), Color(0x001F));
        assert_eq!(layout.yellow(), Color(0xFFE0));
        assert_eq!(layout.cyan(), Color(0x07FF));
        assert_eq!(layout.purple(), Color(0xF81F));
        assert_eq!(layout.radio_blue(), Color(0x1C1F));
    }

    #[test]
    fn test_bgr565_swaps_red_and_blue() {
        let layout = ChannelLayout::BGR565;
        assert_eq!(layout.red(), Color(0x001F));
        assert_eq!(layout.blue(), Color(0xF800));
        assert_eq!(layout.green(), Color(0x07E0));
    }

    #[test]
    fn test_rgb888_conversion_consults_layout() {
        let rgb = Color::from_rgb888(ChannelLayout::RGB565, 255, 0, 0);
        let bgr = Color::from_rgb888(ChannelLayout::BGR565, 255, 0, 0);
        assert_eq!(rgb, Color(0xF800));
        assert_eq!(bgr, Color(0x001F));

        assert_eq!(rgb.to_rgb888(ChannelLayout::RGB565), (255, 0, 0));
        assert_eq!(bgr.to_rgb888(ChannelLayout::BGR565), (255, 0, 0));
        // Same bits, wrong layout: red reads back as blue
        assert_eq!(rgb.to_rgb888(ChannelLayout::BGR565), (0, 0, 255));
    }

    #[test]
    fn test_black_and_white_are_layout_independent() {
        for layout in [ChannelLayout::RGB565, ChannelLayout::BGR565] {
            assert_eq!(Color::WHITE.to_rgb888(layout), (255, 255, 255));
            assert_eq!(Color::BLACK.to_rgb888(layout), (0, 0, 0));
            assert_eq!(layout.pack(0x1F, 0x3F, 0x1F), Color::WHITE);
        }
    }

    #[test]
    fn test_bus_byte_order() {
        assert_eq!(Color(0x1C1F).to_be_bytes(), [0x1C, 0x1F]);
    }
}
