//! Bus backends
//!
//! Two wirings are in the field. The MD-380 family hangs the controller on
//! the STM32's FSMC bank 1 so a command or data byte is a single store to one
//! of two addresses. Later boards bit-bang the same 8 data lines with an
//! explicit register-select and write strobe.
//!
//! Either way the data lines are shared with the keypad matrix, so each
//! backend also knows how to hand its lines over ([`SharedLines`]).

use rt3_hal::{ConfigurablePin, LcdBus, OutputPin, PinConfig, PinGroup, Pull, Speed};

/// FSMC bank 1 address that latches a command byte (A17 low)
pub const FSMC_COMMAND_ADDR: usize = 0x6000_0000;

/// FSMC bank 1 address that latches a data byte (A17 high)
pub const FSMC_DATA_ADDR: usize = 0x6004_0000;

/// Alternate function number of the FSMC on STM32F4 ports D and E
pub const AF_FSMC: u8 = 12;

/// Mask of the eight data lines inside a bus pin group
pub const DATA_LINES: u16 = 0x00FF;

/// Lines a bus backend shares with the keypad matrix
pub trait SharedLines {
    /// Reprogram the lines for driving the LCD controller
    fn enter_display_mode(&mut self);

    /// Release the data lines as pulled-down inputs for matrix scanning
    fn enter_keypad_mode(&mut self);

    /// Sample the eight data lines (bit `n` = D`n`)
    fn read_lines(&self) -> u8;
}

impl<T: SharedLines + ?Sized> SharedLines for &mut T {
    fn enter_display_mode(&mut self) {
        (**self).enter_display_mode();
    }

    fn enter_keypad_mode(&mut self) {
        (**self).enter_keypad_mode();
    }

    fn read_lines(&self) -> u8 {
        (**self).read_lines()
    }
}

/// Memory-mapped bus through an external memory controller
///
/// `lines` holds every pin the controller drives: data lines in bits 0..7,
/// control strobes in the bits above. In display mode all of them are
/// handed to the memory controller; in keypad mode only the data lines are
/// taken back.
pub struct MappedBus<G> {
    lines: G,
    command_addr: usize,
    data_addr: usize,
}

impl<G: PinGroup> MappedBus<G> {
    /// Create a bus on the given command/data addresses
    ///
    /// # Safety
    ///
    /// Both addresses must be byte-writable locations inside a memory
    /// controller window that is configured (or will be configured before
    /// the first write) to drive the LCD, and nothing else may write them.
    pub unsafe fn new(lines: G, command_addr: usize, data_addr: usize) -> Self {
        Self {
            lines,
            command_addr,
            data_addr,
        }
    }

    /// Create a bus on the FSMC bank 1 wiring of the MD-380 family
    ///
    /// # Safety
    ///
    /// Same contract as [`MappedBus::new`] for [`FSMC_COMMAND_ADDR`] and
    /// [`FSMC_DATA_ADDR`].
    pub unsafe fn fsmc(lines: G) -> Self {
        // SAFETY: forwarded to the caller
        unsafe { Self::new(lines, FSMC_COMMAND_ADDR, FSMC_DATA_ADDR) }
    }
}

impl<G: PinGroup> LcdBus for MappedBus<G> {
    fn write_command(&mut self, command: u8) {
        // SAFETY: `new` requires the address to be a valid, exclusively
        // owned byte location in the memory controller window
        unsafe { core::ptr::write_volatile(self.command_addr as *mut u8, command) }
    }

    fn write_data(&mut self, data: u8) {
        // SAFETY: as above
        unsafe { core::ptr::write_volatile(self.data_addr as *mut u8, data) }
    }
}

impl<G: PinGroup> SharedLines for MappedBus<G> {
    fn enter_display_mode(&mut self) {
        let all = self.lines.all();
        self.lines
            .configure(all, PinConfig::alternate(AF_FSMC, Speed::VeryHigh));
    }

    fn enter_keypad_mode(&mut self) {
        self.lines.configure(DATA_LINES, PinConfig::input(Pull::Down));
    }

    fn read_lines(&self) -> u8 {
        (self.lines.read_bits() & DATA_LINES) as u8
    }
}

/// Bit-banged 8-bit bus with register-select and write strobe
///
/// The controller latches on the rising edge of WR. RS low selects the
/// command register for the duration of one byte.
pub struct ParallelBus<G, P> {
    data: G,
    register_select: P,
    write_strobe: P,
}

impl<G, P> ParallelBus<G, P>
where
    G: PinGroup,
    P: OutputPin + ConfigurablePin,
{
    /// Create a bus from its data group (bits 0..7) and strobe pins
    pub fn new(data: G, register_select: P, write_strobe: P) -> Self {
        Self {
            data,
            register_select,
            write_strobe,
        }
    }

    fn strobe(&mut self, byte: u8) {
        self.data.write_bits(DATA_LINES, byte as u16);
        self.write_strobe.set_low();
        self.write_strobe.set_high();
    }
}

impl<G, P> LcdBus for ParallelBus<G, P>
where
    G: PinGroup,
    P: OutputPin + ConfigurablePin,
{
    fn write_command(&mut self, command: u8) {
        self.register_select.set_low();
        self.strobe(command);
        self.register_select.set_high();
    }

    fn write_data(&mut self, data: u8) {
        self.strobe(data);
    }
}

impl<G, P> SharedLines for ParallelBus<G, P>
where
    G: PinGroup,
    P: OutputPin + ConfigurablePin,
{
    fn enter_display_mode(&mut self) {
        let out = PinConfig::output(Speed::VeryHigh);
        self.data.configure(DATA_LINES, out);
        self.register_select.configure(out);
        self.write_strobe.configure(out);
        self.register_select.set_high();
        self.write_strobe.set_high();
    }

    fn enter_keypad_mode(&mut self) {
        self.data.configure(DATA_LINES, PinConfig::input(Pull::Down));
    }

    fn read_lines(&self) -> u8 {
        (self.data.read_bits() & DATA_LINES) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Wire {
        Rs(bool),
        Wr(bool),
        Data(u8),
        DataDir(bool),
    }

    type Log = Rc<RefCell<Vec<Wire>>>;

    struct Lines {
        log: Log,
        levels: u16,
        inputs: u16,
    }

    impl PinGroup for Lines {
        fn configure(&mut self, mask: u16, config: PinConfig) {
            if config.is_input() {
                self.inputs |= mask;
            } else {
                self.inputs &= !mask;
            }
            self.log.borrow_mut().push(Wire::DataDir(config.is_input()));
        }

        fn write_bits(&mut self, mask: u16, bits: u16) {
            self.levels = (self.levels & !mask) | (bits & mask);
            self.log.borrow_mut().push(Wire::Data(self.levels as u8));
        }

        fn read_bits(&self) -> u16 {
            self.levels
        }

        fn all(&self) -> u16 {
            0x07FF
        }
    }

    struct Strobe {
        log: Log,
        is_rs: bool,
        high: bool,
    }

    impl OutputPin for Strobe {
        fn set_high(&mut self) {
            self.high = true;
            self.push();
        }

        fn set_low(&mut self) {
            self.high = false;
            self.push();
        }

        fn is_set_high(&self) -> bool {
            self.high
        }
    }

    impl Strobe {
        fn push(&self) {
            let wire = if self.is_rs {
                Wire::Rs(self.high)
            } else {
                Wire::Wr(self.high)
            };
            self.log.borrow_mut().push(wire);
        }
    }

    impl ConfigurablePin for Strobe {
        fn configure(&mut self, _config: PinConfig) {}
    }

    fn parallel() -> (ParallelBus<Lines, Strobe>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let lines = Lines {
            log: log.clone(),
            levels: 0,
            inputs: 0,
        };
        let rs = Strobe {
            log: log.clone(),
            is_rs: true,
            high: true,
        };
        let wr = Strobe {
            log: log.clone(),
            is_rs: false,
            high: true,
        };
        (ParallelBus::new(lines, rs, wr), log)
    }

    #[test]
    fn test_parallel_command_holds_rs_low_for_one_byte() {
        let (mut bus, log) = parallel();

        bus.write_command(0x2C);
        bus.write_data(0xA5);

        assert_eq!(
            log.borrow().as_slice(),
            &[
                Wire::Rs(false),
                Wire::Data(0x2C),
                Wire::Wr(false),
                Wire::Wr(true),
                Wire::Rs(true),
                Wire::Data(0xA5),
                Wire::Wr(false),
                Wire::Wr(true),
            ]
        );
    }

    #[test]
    fn test_parallel_keypad_mode_reads_data_lines() {
        let (mut bus, log) = parallel();

        bus.enter_keypad_mode();
        assert_eq!(bus.data.inputs, DATA_LINES);
        assert_eq!(log.borrow().last(), Some(&Wire::DataDir(true)));

        bus.data.levels = 0x0524;
        assert_eq!(bus.read_lines(), 0x24);

        bus.enter_display_mode();
        assert_eq!(bus.data.inputs, 0);
    }

    #[test]
    fn test_mapped_bus_writes_to_its_addresses() {
        let mut cells = [0u8; 2];
        let base = cells.as_mut_ptr() as usize;
        let lines = Lines {
            log: Rc::new(RefCell::new(Vec::new())),
            levels: 0,
            inputs: 0,
        };

        // SAFETY: both addresses point into `cells`, which outlives `bus`
        let mut bus = unsafe { MappedBus::new(lines, base, base + 1) };
        bus.write_command(0x29);
        bus.write_data(0x5A);
        drop(bus);

        assert_eq!(cells, [0x29, 0x5A]);
    }

    #[test]
    fn test_fsmc_addresses_differ_in_a17_only() {
        // 16-bit bank: byte address bit n + 1 drives pin An
        let diff = FSMC_DATA_ADDR ^ FSMC_COMMAND_ADDR;
        assert_eq!(diff, 1 << (17 + 1));
        assert_eq!(FSMC_COMMAND_ADDR & diff, 0);
    }

    #[test]
    fn test_mapped_bus_hands_back_only_data_lines() {
        let lines = Lines {
            log: Rc::new(RefCell::new(Vec::new())),
            levels: 0,
            inputs: 0,
        };
        // SAFETY: the bus is never written
        let mut bus = unsafe { MappedBus::fsmc(lines) };

        bus.enter_display_mode();
        assert_eq!(bus.lines.inputs, 0);

        bus.enter_keypad_mode();
        assert_eq!(bus.lines.inputs, DATA_LINES);
    }
}
