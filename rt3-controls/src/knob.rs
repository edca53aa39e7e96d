//! Channel selector knob
//!
//! A 16-position rotary switch on four GPIO inputs. The switch encodes its
//! position in a Gray-like code, so the raw 4-bit value has to go through a
//! lookup table to become a channel number.

use rt3_hal::InputPin;

/// Channel number for each raw switch code
const POSITION: [u8; 16] = [11, 12, 10, 9, 14, 13, 15, 16, 6, 5, 7, 8, 3, 4, 2, 1];

/// Number of detent positions
pub const POSITIONS: u8 = 16;

/// 16-position channel knob
pub struct ChannelKnob<P> {
    /// Encoder inputs, least significant bit first
    pins: [P; 4],
}

impl<P: InputPin> ChannelKnob<P> {
    pub fn new(pins: [P; 4]) -> Self {
        Self { pins }
    }

    /// Raw 4-bit code read from the switch
    pub fn raw(&self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0, |acc, (bit, pin)| acc | ((pin.is_high() as u8) << bit))
    }

    /// Selected channel, 1 to 16
    pub fn position(&self) -> u8 {
        decode(self.raw())
    }
}

/// Channel number for a raw switch code (only the low four bits count)
pub fn decode(raw: u8) -> u8 {
    POSITION[(raw & 0x0F) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    fn knob(raw: u8) -> ChannelKnob<Level> {
        ChannelKnob::new(core::array::from_fn(|bit| Level(raw & (1 << bit) != 0)))
    }

    #[test]
    fn test_raw_code_bit_order() {
        assert_eq!(knob(0b0001).raw(), 1);
        assert_eq!(knob(0b1000).raw(), 8);
        assert_eq!(knob(0b1010).raw(), 10);
    }

    #[test]
    fn test_known_positions() {
        assert_eq!(knob(0).position(), 11);
        assert_eq!(knob(0b0111).position(), 16);
        assert_eq!(knob(0b1111).position(), 1);
        assert_eq!(decode(0xF3), decode(0x03));
    }

    #[test]
    fn test_every_channel_reachable_once() {
        let mut seen = [false; POSITIONS as usize + 1];
        for raw in 0..16 {
            let channel = knob(raw).position();
            assert!((1..=POSITIONS).contains(&channel));
            assert!(!seen[channel as usize], "channel {} twice", channel);
            seen[channel as usize] = true;
        }
    }
}
