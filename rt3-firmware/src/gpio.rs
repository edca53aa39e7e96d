//! Register-level GPIO for the STM32F4
//!
//! The LCD data lines switch between FSMC alternate function, push-pull
//! output and pulled-down input while running, and they are spread over
//! ports D and E. embassy's pin drivers fix a pin's role at construction,
//! so the shared lines are driven straight through the GPIO registers
//! instead.

use embassy_stm32::pac;
use embassy_stm32::pac::gpio::{vals, Gpio};
use rt3_hal::gpio::{OutputType, PinMode};
use rt3_hal::{ConfigurablePin, InputPin, OutputPin, PinConfig, PinGroup, Pull, Speed};

/// GPIO port letter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
}

impl Port {
    fn regs(self) -> Gpio {
        match self {
            Port::A => pac::GPIOA,
            Port::B => pac::GPIOB,
            Port::C => pac::GPIOC,
            Port::D => pac::GPIOD,
            Port::E => pac::GPIOE,
        }
    }
}

/// A pin reference: port and number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinId {
    pub port: Port,
    pub pin: u8,
}

impl PinId {
    pub const fn new(port: Port, pin: u8) -> Self {
        Self { port, pin }
    }
}

/// One GPIO pin driven through its port registers
pub struct RegisterPin {
    id: PinId,
}

impl RegisterPin {
    /// Take ownership of a pin
    ///
    /// # Safety
    ///
    /// Nothing else may own `id`: no other `RegisterPin` and no embassy pin
    /// driver. The port clock must already be running.
    pub unsafe fn new(id: PinId) -> Self {
        Self { id }
    }

    /// Take a pin and configure it in one go
    ///
    /// # Safety
    ///
    /// Same contract as [`RegisterPin::new`].
    pub unsafe fn with_config(id: PinId, config: PinConfig) -> Self {
        // SAFETY: forwarded to the caller
        let mut pin = unsafe { Self::new(id) };
        pin.configure(config);
        pin
    }

    fn regs(&self) -> Gpio {
        self.id.port.regs()
    }

    fn n(&self) -> usize {
        self.id.pin as usize
    }
}

fn pupdr(pull: Pull) -> vals::Pupdr {
    match pull {
        Pull::None => vals::Pupdr::FLOATING,
        Pull::Up => vals::Pupdr::PULL_UP,
        Pull::Down => vals::Pupdr::PULL_DOWN,
    }
}

fn ospeedr(speed: Speed) -> vals::Ospeedr {
    match speed {
        Speed::Low => vals::Ospeedr::LOW_SPEED,
        Speed::Medium => vals::Ospeedr::MEDIUM_SPEED,
        Speed::High => vals::Ospeedr::HIGH_SPEED,
        Speed::VeryHigh => vals::Ospeedr::VERY_HIGH_SPEED,
    }
}

fn ot(output_type: OutputType) -> vals::Ot {
    match output_type {
        OutputType::PushPull => vals::Ot::PUSH_PULL,
        OutputType::OpenDrain => vals::Ot::OPEN_DRAIN,
    }
}

impl ConfigurablePin for RegisterPin {
    fn configure(&mut self, config: PinConfig) {
        let r = self.regs();
        let n = self.n();

        // Other owners share these registers
        critical_section::with(|_| {
            r.pupdr().modify(|w| w.set_pupdr(n, pupdr(config.pull)));
            r.otyper().modify(|w| w.set_ot(n, ot(config.output_type)));
            r.ospeedr().modify(|w| w.set_ospeedr(n, ospeedr(config.speed)));

            let moder = match config.mode {
                PinMode::Input => vals::Moder::INPUT,
                PinMode::Output => vals::Moder::OUTPUT,
                PinMode::Alternate(af) => {
                    r.afr(n / 8).modify(|w| w.set_afr(n % 8, af));
                    vals::Moder::ALTERNATE
                }
                PinMode::Analog => vals::Moder::ANALOG,
            };
            r.moder().modify(|w| w.set_moder(n, moder));
        });
    }
}

impl OutputPin for RegisterPin {
    fn set_high(&mut self) {
        let n = self.n();
        self.regs().bsrr().write(|w| w.set_bs(n, true));
    }

    fn set_low(&mut self) {
        let n = self.n();
        self.regs().bsrr().write(|w| w.set_br(n, true));
    }

    fn is_set_high(&self) -> bool {
        self.regs().odr().read().odr(self.n()) == vals::Odr::HIGH
    }
}

impl InputPin for RegisterPin {
    fn is_high(&self) -> bool {
        self.regs().idr().read().idr(self.n()) == vals::Idr::HIGH
    }
}

/// Up to 16 pins, possibly on different ports, handled as one bit-mask
///
/// Bit `n` of every mask is `pins[n]`.
pub struct RegisterGroup<const N: usize> {
    pins: [RegisterPin; N],
}

impl<const N: usize> RegisterGroup<N> {
    pub fn new(pins: [RegisterPin; N]) -> Self {
        const { assert!(N <= 16, "a pin group holds at most 16 pins") };
        Self { pins }
    }

    fn selected(&mut self, mask: u16) -> impl Iterator<Item = (u16, &mut RegisterPin)> + '_ {
        self.pins
            .iter_mut()
            .enumerate()
            .map(|(i, pin)| (1u16 << i, pin))
            .filter(move |(bit, _)| mask & bit != 0)
    }
}

impl<const N: usize> PinGroup for RegisterGroup<N> {
    fn configure(&mut self, mask: u16, config: PinConfig) {
        for (_, pin) in self.selected(mask) {
            pin.configure(config);
        }
    }

    fn write_bits(&mut self, mask: u16, bits: u16) {
        for (bit, pin) in self.selected(mask) {
            pin.set_state(bits & bit != 0);
        }
    }

    fn read_bits(&self) -> u16 {
        self.pins
            .iter()
            .enumerate()
            .filter(|(_, pin)| pin.is_high())
            .fold(0, |bits, (i, _)| bits | 1 << i)
    }

    fn all(&self) -> u16 {
        ((1u32 << N) - 1) as u16
    }
}
