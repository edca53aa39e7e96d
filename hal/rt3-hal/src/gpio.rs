//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins, plus the runtime
//! reconfiguration the radio needs: the LCD data lines double as keypad
//! matrix inputs, so their mode is switched back and forth while running.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Toggle the pin state
    fn toggle(&mut self) {
        if self.is_set_high() {
            self.set_low();
        } else {
            self.set_high();
        }
    }

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;

    /// Check if the pin is currently set low
    fn is_set_low(&self) -> bool {
        !self.is_set_high()
    }
}

/// Digital input pin
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&self) -> bool {
        !self.is_high()
    }
}

/// Pin direction / function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PinMode {
    /// Digital input
    Input,
    /// Push-pull or open-drain output
    Output,
    /// Peripheral function (alternate function number)
    Alternate(u8),
    /// Analog (ADC) input
    Analog,
}

/// Internal pull resistor selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Pull {
    /// No pull resistor
    #[default]
    None,
    /// Pull-up enabled
    Up,
    /// Pull-down enabled
    Down,
}

/// Output slew rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Speed {
    /// ~2 MHz, LEDs and slow signals
    #[default]
    Low,
    /// ~25 MHz
    Medium,
    /// ~50 MHz
    High,
    /// ~100 MHz, parallel bus lines
    VeryHigh,
}

/// Output driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OutputType {
    /// Push-pull output
    #[default]
    PushPull,
    /// Open-drain output
    OpenDrain,
}

/// Complete pin configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PinConfig {
    /// Direction / function
    pub mode: PinMode,
    /// Pull resistor
    pub pull: Pull,
    /// Slew rate (ignored for inputs)
    pub speed: Speed,
    /// Driver type (ignored for inputs)
    pub output_type: OutputType,
}

impl PinConfig {
    /// Digital input with the given pull resistor
    pub const fn input(pull: Pull) -> Self {
        Self {
            mode: PinMode::Input,
            pull,
            speed: Speed::Low,
            output_type: OutputType::PushPull,
        }
    }

    /// Push-pull output, no pull resistor
    pub const fn output(speed: Speed) -> Self {
        Self {
            mode: PinMode::Output,
            pull: Pull::None,
            speed,
            output_type: OutputType::PushPull,
        }
    }

    /// Push-pull alternate function, no pull resistor
    pub const fn alternate(function: u8, speed: Speed) -> Self {
        Self {
            mode: PinMode::Alternate(function),
            pull: Pull::None,
            speed,
            output_type: OutputType::PushPull,
        }
    }

    /// Analog input
    pub const fn analog() -> Self {
        Self {
            mode: PinMode::Analog,
            pull: Pull::None,
            speed: Speed::Low,
            output_type: OutputType::PushPull,
        }
    }

    /// Is this an input-only configuration
    pub const fn is_input(&self) -> bool {
        matches!(self.mode, PinMode::Input | PinMode::Analog)
    }
}

/// Pin whose mode can be changed at runtime
pub trait ConfigurablePin {
    /// Apply a configuration to the pin
    fn configure(&mut self, config: PinConfig);
}

/// A group of up to 16 pins handled as one bit-mask
///
/// Bit `n` of every mask refers to the `n`-th pin of the group. This is the
/// multi-pin counterpart to [`ConfigurablePin`]: bus lines are reprogrammed
/// together, and the keypad reads them back as one word.
pub trait PinGroup {
    /// Apply `config` to every pin selected by `mask`
    fn configure(&mut self, mask: u16, config: PinConfig);

    /// Drive the pins selected by `mask` to the matching bits of `bits`
    ///
    /// Pins outside `mask` keep their current level.
    fn write_bits(&mut self, mask: u16, bits: u16);

    /// Read the input level of every pin in the group
    fn read_bits(&self) -> u16;

    /// Mask covering every pin in the group
    fn all(&self) -> u16;
}

impl<T: PinGroup + ?Sized> PinGroup for &mut T {
    fn configure(&mut self, mask: u16, config: PinConfig) {
        (**self).configure(mask, config);
    }

    fn write_bits(&mut self, mask: u16, bits: u16) {
        (**self).write_bits(mask, bits);
    }

    fn read_bits(&self) -> u16 {
        (**self).read_bits()
    }

    fn all(&self) -> u16 {
        (**self).all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPin {
        high: bool,
    }

    impl OutputPin for MockPin {
        fn set_high(&mut self) {
            self.high = true;
        }

        fn set_low(&mut self) {
            self.high = false;
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    struct MockGroup {
        levels: u16,
        inputs: u16,
    }

    impl PinGroup for MockGroup {
        fn configure(&mut self, mask: u16, config: PinConfig) {
            if config.is_input() {
                self.inputs |= mask;
            } else {
                self.inputs &= !mask;
            }
        }

        fn write_bits(&mut self, mask: u16, bits: u16) {
            self.levels = (self.levels & !mask) | (bits & mask);
        }

        fn read_bits(&self) -> u16 {
            self.levels
        }

        fn all(&self) -> u16 {
            0x00FF
        }
    }

    #[test]
    fn test_toggle_and_set_state() {
        let mut pin = MockPin { high: false };

        pin.toggle();
        assert!(pin.is_set_high());
        pin.toggle();
        assert!(pin.is_set_low());

        pin.set_state(true);
        assert!(pin.is_set_high());
    }

    #[test]
    fn test_pin_config_constructors() {
        assert!(PinConfig::input(Pull::Up).is_input());
        assert!(PinConfig::analog().is_input());
        assert!(!PinConfig::output(Speed::VeryHigh).is_input());

        let af = PinConfig::alternate(12, Speed::VeryHigh);
        assert_eq!(af.mode, PinMode::Alternate(12));
        assert_eq!(af.pull, Pull::None);
    }

    #[test]
    fn test_group_write_respects_mask() {
        let mut group = MockGroup {
            levels: 0,
            inputs: 0,
        };

        group.write_bits(0x0F, 0xFF);
        assert_eq!(group.read_bits(), 0x0F);

        group.write_bits(0x03, 0x00);
        assert_eq!(group.read_bits(), 0x0C);

        group.configure(0x00F0, PinConfig::input(Pull::Down));
        assert_eq!(group.inputs, 0x00F0);
    }
}
