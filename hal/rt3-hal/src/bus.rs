//! LCD bus abstraction
//!
//! The LCD controllers used on these radios speak a byte protocol with two
//! kinds of transfer: command bytes (opcodes) and data bytes (parameters and
//! pixel payload). How the two are told apart is a wiring detail: a
//! memory-mapped bus uses two addresses, a bit-banged bus drives a
//! register-select line.

/// Byte-wide command/data bus to an LCD controller
///
/// Writes cannot fail: the controller offers no feedback channel, and a
/// store to a mapped bus window cannot be observed to go wrong.
pub trait LcdBus {
    /// Write one command (opcode) byte
    fn write_command(&mut self, command: u8);

    /// Write one data (parameter or pixel) byte
    fn write_data(&mut self, data: u8);

    /// Write a run of data bytes in order
    fn write_data_all(&mut self, data: &[u8]) {
        for &byte in data {
            self.write_data(byte);
        }
    }
}

impl<T: LcdBus + ?Sized> LcdBus for &mut T {
    fn write_command(&mut self, command: u8) {
        (**self).write_command(command);
    }

    fn write_data(&mut self, data: u8) {
        (**self).write_data(data);
    }
}
