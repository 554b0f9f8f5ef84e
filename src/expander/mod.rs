//! The port expander device API. This provides the `Expander` type which is a direct abstraction
//! of the MCP23017. It allows direct use of all operations available on the device.

use config::{Configurator, PinMode};
use expander::immediate::ImmediateIO;
use interface::{BusAddress, ExpanderInterface, DEFAULT_ADDRESS};
use mutex::IOMutex;
use registers::{pin_to_port, Port, Register};

pub mod immediate;
pub mod pin;

/// The port expander device itself. It holds the bus interface and the address of the chip that
/// all register operations target.
pub struct Expander<EI: ExpanderInterface> {
    iface: EI,
    address: BusAddress,
}

impl<EI: ExpanderInterface + Send> Expander<EI> {
    /// Create a new `Expander` targeting the default bus address 0x20.
    ///
    /// Takes ownership of the `ExpanderInterface` which it should use to communicate with the
    /// MCP23017.
    pub fn new(iface: EI) -> Self {
        Self {
            iface,
            address: DEFAULT_ADDRESS.into(),
        }
    }

    /// Select the bus address all subsequent register operations target. The MCP23017's three
    /// address straps put real devices in `0x20..=0x27`; `addr` is kept to its low 7 bits and any
    /// higher bits are silently discarded. No bus traffic is generated.
    pub fn set_address(&mut self, addr: u8) {
        self.address = addr.into();
    }

    /// Select the bus address `addr` and place the device there into a known state: every pin an
    /// input with its pull-up enabled, polarity inversion off, and the output latches cleared so
    /// that nothing unexpected is driven if pins are later switched to outputs.
    ///
    /// The writes are issued in a fixed order (direction, polarity, pull-up, latch) for
    /// reproducibility, though the registers are independent.
    pub fn init(&mut self, addr: u8) -> Result<(), EI::Error> {
        self.set_address(addr);
        self.write_register(Register::Direction(Port::A), 0xFF)?;
        self.write_register(Register::Direction(Port::B), 0xFF)?;
        self.write_register(Register::Polarity(Port::A), 0x00)?;
        self.write_register(Register::Polarity(Port::B), 0x00)?;
        self.write_register(Register::PullUp(Port::A), 0xFF)?;
        self.write_register(Register::PullUp(Port::B), 0xFF)?;
        self.write_register(Register::OutputLatch(Port::A), 0x00)?;
        self.write_register(Register::OutputLatch(Port::B), 0x00)
    }

    /// Begin (re)configuring the port expander hardware by returning a [`Configurator`].
    ///
    /// The `Configurator` is a builder-like interface that can be used to alter pin directions,
    /// pull-ups, and input polarities, batching the register traffic for the whole change set.
    pub fn configure<'e>(&'e mut self) -> Configurator<'e, EI> {
        Configurator::new(self)
    }

    /// Convert this expander into an immediate-mode I/O adapter.
    ///
    /// The I/O adapter can be used to generate individual `PortPin`s that allow
    /// `embedded-hal`-compatible access to the GPIOs on the expander directly, with every
    /// operation immediately triggering a bus operation.
    ///
    /// See [`ImmediateIO`] for detail.
    pub fn into_immediate<M: IOMutex<Self>>(self) -> ImmediateIO<M, EI> {
        ImmediateIO::new(self)
    }

    /// Write `mask` to the port's direction register. Per-bit semantics are the hardware's own:
    /// a set bit configures the corresponding pin as an input, a clear bit as an output.
    pub fn set_port_direction(&mut self, port: Port, mask: u8) -> Result<(), EI::Error> {
        self.write_register(Register::Direction(port), mask)
    }

    /// Write `mask` to the port's pull-up register. A set bit enables the weak pull-up on the
    /// corresponding pin.
    pub fn set_port_pull_ups(&mut self, port: Port, mask: u8) -> Result<(), EI::Error> {
        self.write_register(Register::PullUp(port), mask)
    }

    /// Read the port's live GPIO register. Bits for input pins reflect the logic level present on
    /// the pin; bits for output pins reflect the driven level.
    pub fn read_port(&mut self, port: Port) -> Result<u8, EI::Error> {
        self.read_register(Register::Gpio(port))
    }

    /// Write `value` to the port's output latch, setting the level driven on every pin of the
    /// port that is configured as an output. Pins configured as inputs are unaffected, though the
    /// hardware stores the latch bit for later use if their direction changes.
    pub fn write_port(&mut self, port: Port, value: u8) -> Result<(), EI::Error> {
        self.write_register(Register::OutputLatch(port), value)
    }

    /// Set the direction of a single pin, leaving the rest of the owning port's direction
    /// register untouched.
    ///
    /// This is a read-modify-write: one read and one write transaction. The pair is not atomic;
    /// callers driving the expander from several threads must serialize the whole operation
    /// externally.
    pub fn pin_mode(&mut self, pin: u8, mode: PinMode) -> Result<(), EI::Error> {
        let (port, bit) = pin_to_port(pin);
        self.update_bit(Register::Direction(port), bit, u8::from(mode) != 0)
    }

    /// Enable or disable the weak pull-up of a single pin, preserving the remaining bits of the
    /// owning port's pull-up register. Read-modify-write; see [`Expander::pin_mode`] on
    /// atomicity.
    pub fn pin_pull_up(&mut self, pin: u8, on: bool) -> Result<(), EI::Error> {
        let (port, bit) = pin_to_port(pin);
        self.update_bit(Register::PullUp(port), bit, on)
    }

    /// Read the current logic level of a single pin. One bus transaction; the whole owning port
    /// is read and the pin's bit extracted.
    pub fn read_pin(&mut self, pin: u8) -> Result<bool, EI::Error> {
        let (port, bit) = pin_to_port(pin);
        self.read_register(Register::Gpio(port))
            .map(|v| v >> bit & 1 != 0)
    }

    /// Set the level driven on a single pin, preserving the remaining bits of the owning port's
    /// output latch. The pin should already be configured as an output; the latch is updated
    /// regardless, and becomes observable once the direction is switched. Read-modify-write; see
    /// [`Expander::pin_mode`] on atomicity.
    pub fn write_pin(&mut self, pin: u8, value: bool) -> Result<(), EI::Error> {
        let (port, bit) = pin_to_port(pin);
        self.update_bit(Register::OutputLatch(port), bit, value)
    }

    /// Configure all 16 pins as inputs with pull-ups enabled, in four register writes. Unlike
    /// [`Expander::init`] this touches neither the polarity registers nor the output latches.
    pub fn all_inputs_with_pull_ups(&mut self) -> Result<(), EI::Error> {
        self.write_register(Register::Direction(Port::A), 0xFF)?;
        self.write_register(Register::Direction(Port::B), 0xFF)?;
        self.write_register(Register::PullUp(Port::A), 0xFF)?;
        self.write_register(Register::PullUp(Port::B), 0xFF)
    }

    /// Read both GPIO ports and pack them into one 16-bit value, `(port B << 8) | port A`, so
    /// that pin 0 appears in bit 0 through pin 15 in bit 15. Two bus transactions; the ports are
    /// not sampled simultaneously.
    pub fn read_word(&mut self) -> Result<u16, EI::Error> {
        let a = self.read_register(Register::Gpio(Port::A))?;
        let b = self.read_register(Register::Gpio(Port::B))?;
        Ok((b as u16) << 8 | a as u16)
    }

    pub(crate) fn write_register(&mut self, reg: Register, value: u8) -> Result<(), EI::Error> {
        self.iface.write_register(self.address, reg.into(), value)
    }

    pub(crate) fn read_register(&mut self, reg: Register) -> Result<u8, EI::Error> {
        self.iface.read_register(self.address, reg.into())
    }

    pub(crate) fn read_modify(
        &mut self,
        reg: Register,
        f: impl Fn(u8) -> u8,
    ) -> Result<(), EI::Error> {
        let addr = reg.into();
        let current = self.iface.read_register(self.address, addr)?;
        self.iface.write_register(self.address, addr, f(current))
    }

    fn update_bit(&mut self, reg: Register, bit: u8, set: bool) -> Result<(), EI::Error> {
        self.read_modify(reg, |cur| {
            if set {
                cur | 1 << bit
            } else {
                cur & !(1 << bit)
            }
        })
    }
}
