//! The register addresses within the MCP23017.

/// One of the two 8-bit I/O ports of the MCP23017. Port A carries pins 0 through 7, port B carries
/// pins 8 through 15. Each per-port hardware register exists once for each port, at adjacent
/// addresses in the BANK=0 layout.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Port {
    /// Port A, pins 0-7.
    A,
    /// Port B, pins 8-15.
    B,
}

/// A register address within the MCP23017. These are created by conversion from `Register`. It is
/// a newtype around `u8` that prevents invalid addresses from being forged and passed to
/// `ExpanderInterface` methods which may trigger UB on the device.
#[derive(PartialEq, Clone, Copy)]
pub struct RegisterAddress(pub(crate) u8);

impl From<RegisterAddress> for u8 {
    /// Convert a `RegisterAddress` into a `u8` corresponding to the hardware address.
    fn from(addr: RegisterAddress) -> u8 {
        addr.0
    }
}

/// The registers of the MCP23017, assuming the power-on BANK=0 addressing where the two ports'
/// registers interleave at adjacent addresses. Most registers exist per-port and take the `Port`
/// they belong to.
pub enum Register {
    /// I/O direction register (IODIR). A set bit configures the corresponding pin as an input, a
    /// clear bit as an output.
    Direction(Port),

    /// Input polarity inversion register (IPOL). A set bit causes the corresponding GPIO bit to
    /// reflect the inverted logic level on the pin.
    Polarity(Port),

    /// Interrupt-on-change enable register (GPINTEN). A set bit enables interrupt generation for
    /// the corresponding pin.
    InterruptEnable(Port),

    /// Default compare register for interrupt-on-change (DEFVAL). An opposite value on the
    /// corresponding pin triggers an interrupt when so configured in `InterruptControl`.
    DefaultValue(Port),

    /// Interrupt control register (INTCON). Selects whether each pin is compared against
    /// `DefaultValue` or against its own previous value.
    InterruptControl(Port),

    /// Device configuration register (IOCON). Shared between the two ports; controls register
    /// addressing mode, interrupt pin behavior, and sequential-operation mode.
    Configuration,

    /// Weak pull-up enable register (GPPU). A set bit enables the internal 100k pull-up resistor
    /// on the corresponding pin when it is configured as an input.
    PullUp(Port),

    /// Interrupt flag register (INTF, read-only). A set bit indicates the corresponding pin
    /// caused the pending interrupt.
    InterruptFlag(Port),

    /// Interrupt capture register (INTCAP, read-only). Holds the port value latched at the moment
    /// the interrupt occurred.
    InterruptCapture(Port),

    /// GPIO register. Reading returns the live logic level of every pin on the port; writing
    /// modifies the output latch.
    Gpio(Port),

    /// Output latch register (OLAT). Holds the value driven on pins configured as outputs,
    /// distinct from the live pin state visible through `Gpio`.
    OutputLatch(Port),
}

fn port_offset(port: Port) -> u8 {
    match port {
        Port::A => 0,
        Port::B => 1,
    }
}

impl From<Register> for RegisterAddress {
    /// Convert a `Register` into a `RegisterAddress`.
    fn from(reg: Register) -> RegisterAddress {
        use self::Register::*;
        match reg {
            Direction(p) => RegisterAddress(0x00 + port_offset(p)),
            Polarity(p) => RegisterAddress(0x02 + port_offset(p)),
            InterruptEnable(p) => RegisterAddress(0x04 + port_offset(p)),
            DefaultValue(p) => RegisterAddress(0x06 + port_offset(p)),
            InterruptControl(p) => RegisterAddress(0x08 + port_offset(p)),
            Configuration => RegisterAddress(0x0A),
            PullUp(p) => RegisterAddress(0x0C + port_offset(p)),
            InterruptFlag(p) => RegisterAddress(0x0E + port_offset(p)),
            InterruptCapture(p) => RegisterAddress(0x10 + port_offset(p)),
            Gpio(p) => RegisterAddress(0x12 + port_offset(p)),
            OutputLatch(p) => RegisterAddress(0x14 + port_offset(p)),
        }
    }
}

pub(crate) fn valid_pin(pin: u8) -> u8 {
    match pin {
        0..=15 => pin,
        _ => panic!("MCP23017 does not have pin {}", pin),
    }
}

/// Split a pin number into the port that owns it and the bit position of the pin within that
/// port's registers. Pins 0-7 map to bits 0-7 of port A, pins 8-15 to bits 0-7 of port B.
///
/// Panics if `pin` is greater than 15.
pub(crate) fn pin_to_port(pin: u8) -> (Port, u8) {
    match valid_pin(pin) {
        p if p < 8 => (Port::A, p),
        p => (Port::B, p - 8),
    }
}
