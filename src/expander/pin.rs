//! APIs for interacting with I/O pins on the MCP23017 through an `embedded-hal` API.

#[cfg(feature = "unproven")]
use hal::digital::v2::InputPin;
use hal::digital::v2::OutputPin;

/// An indirection between I/O pin abstractions and the expander itself. An I/O adapter implements
/// this trait to choose how `PortPin` trait calls are turned into bus traffic.
pub trait ExpanderIO {
    /// The type of error that pin reads and writes may return.
    type Error;

    /// Write the value of an I/O pin. `pin` is a logical pin number between 0 and 15; `bit` is
    /// the value to set the pin to. If the pin is configured as an output, the value (`true` is
    /// logic high, `false` logic low) will be asserted on the corresponding pin.
    fn write_pin(&self, pin: u8, bit: bool) -> Result<(), Self::Error>;

    /// Read the value of an I/O pin. `pin` is a logical pin number between 0 and 15, and the
    /// value of that pin will be returned (`false` if logic low, `true` if logic high). If the
    /// pin is configured as an output, the driven value will be read; if it is configured as an
    /// input, the logic level of the externally applied signal will be read.
    fn read_pin(&self, pin: u8) -> Result<bool, Self::Error>;
}

/// A single I/O pin on the MCP23017. These implement the `embedded-hal` traits for GPIO pins, so
/// they can be used to transparently connect devices driven over GPIOs through the MCP23017
/// instead, using their `embedded-hal`-compatible drivers without modification.
pub struct PortPin<'io, IO: ExpanderIO> {
    io: &'io IO,
    pin: u8,
}

impl<'io, IO: ExpanderIO> PortPin<'io, IO> {
    pub(crate) fn new(io: &'io IO, pin: u8) -> Self {
        Self { io, pin }
    }
}

impl<'io, IO: ExpanderIO> OutputPin for PortPin<'io, IO> {
    type Error = IO::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.io.write_pin(self.pin, true)
    }
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.io.write_pin(self.pin, false)
    }
}

#[cfg(feature = "unproven")]
impl<'io, IO: ExpanderIO> InputPin for PortPin<'io, IO> {
    type Error = IO::Error;

    fn is_high(&self) -> Result<bool, Self::Error> {
        self.io.read_pin(self.pin)
    }
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.io.read_pin(self.pin).map(|v| !v)
    }
}
