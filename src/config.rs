//! Abstractions used to configure the MCP23017 hardware.

use expander::Expander;
use interface::ExpanderInterface;
use registers::{pin_to_port, Port, Register};

fn port_index(port: Port) -> usize {
    match port {
        Port::A => 0,
        Port::B => 1,
    }
}

/// A `PinMode` enumerates the two directions a GPIO pin on the MCP23017 may be configured to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PinMode {
    /// High-impedance logic input.
    Input,
    /// Push-pull logic output.
    Output,
}

impl From<PinMode> for u8 {
    /// Convert a `PinMode` into the bit value the hardware direction register encodes it as: a
    /// set bit is an input, a clear bit an output. This is the one place that encoding lives;
    /// whole-port direction masks compose by shifting these values into pin positions.
    fn from(mode: PinMode) -> u8 {
        match mode {
            PinMode::Input => 1,
            PinMode::Output => 0,
        }
    }
}

/// Pending single-bit changes to one 8-bit per-port configuration register. Tracks which bits
/// have been explicitly set so that committing can decide between overwriting the register whole
/// and merging into its current hardware value.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct PortConfig {
    value: u8,
    touched: u8,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum PortConfigStatus {
    Unchanged,
    ReadModify,
    Overwrite,
}

impl PortConfig {
    fn set_bit(&mut self, bit: u8, set: bool) {
        match bit {
            0..=7 => {
                let mask = 1u8 << bit;
                let bit_value = if set { mask } else { 0 };
                self.touched |= mask;
                self.value = self.value & !mask | bit_value;
            }
            _ => panic!("Port registers hold only 8 pins"),
        }
    }

    fn keep_mask(&self) -> u8 {
        !self.touched
    }

    fn status(&self) -> PortConfigStatus {
        match self.keep_mask() {
            0x00 => PortConfigStatus::Overwrite,
            0xFF => PortConfigStatus::Unchanged,
            _ => PortConfigStatus::ReadModify,
        }
    }

    fn merge(&self, current: u8) -> u8 {
        current & self.keep_mask() | self.value
    }
}

impl From<PortConfig> for u8 {
    fn from(cfg: PortConfig) -> u8 {
        cfg.value
    }
}

/// A `Configurator` provides methods to build a list of pin configuration changes, such as
/// directions, pull-ups, and input polarities, and commit them to the device. You obtain one from
/// `Expander::configure()`, chain method calls on it to make configuration changes, and then end
/// the chain with `commit()` to transmit them to the MCP23017.
///
/// ```
/// # use mcp23017::interface::noop::NoopInterface;
/// # use mcp23017::expander::Expander;
/// # use mcp23017::config::PinMode;
/// # let ei = NoopInterface;
/// let mut expander = Expander::new(ei);
/// expander
///     .configure()
///     .pins(0..=3, PinMode::Output)
///     .pin_mode(8, PinMode::Input)
///     .pin_pull_up(8, true)
///     .commit()
///     .unwrap();
/// ```
#[must_use = "Configuration changes are not applied unless committed"]
pub struct Configurator<'e, EI: ExpanderInterface + Send> {
    expander: &'e mut Expander<EI>,
    directions: [PortConfig; 2],
    pull_ups: [PortConfig; 2],
    polarities: [PortConfig; 2],
}

impl<'e, EI: ExpanderInterface + Send> Configurator<'e, EI> {
    pub(crate) fn new(expander: &'e mut Expander<EI>) -> Self {
        Self {
            expander,
            directions: [PortConfig::default(); 2],
            pull_ups: [PortConfig::default(); 2],
            polarities: [PortConfig::default(); 2],
        }
    }

    fn set_direction(&mut self, pin: u8, mode: PinMode) {
        let (port, bit) = pin_to_port(pin);
        self.directions[port_index(port)].set_bit(bit, u8::from(mode) != 0);
    }

    /// Set the direction of a single GPIO pin on the MCP23017 to `mode`. `pin` is the logical
    /// pin number in the range `0..=15`.
    pub fn pin_mode(mut self, pin: u8, mode: PinMode) -> Self {
        self.set_direction(pin, mode);
        self
    }

    /// Set the direction of a sequence of GPIO pins to the given `PinMode`. `pins` must yield
    /// logical pin numbers in the range `0..=15`. All of the pins will be set to mode `mode`.
    pub fn pins<I>(mut self, pins: I, mode: PinMode) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        for pin in pins {
            self.set_direction(pin, mode);
        }
        self
    }

    /// Enable or disable the weak pull-up resistor on a single GPIO pin. The pull-up only has an
    /// effect while the pin is configured as an input.
    pub fn pin_pull_up(mut self, pin: u8, on: bool) -> Self {
        let (port, bit) = pin_to_port(pin);
        self.pull_ups[port_index(port)].set_bit(bit, on);
        self
    }

    /// Invert the input polarity of a single GPIO pin. While set, the GPIO register reports the
    /// opposite of the logic level present on the pin.
    pub fn pin_polarity(mut self, pin: u8, invert: bool) -> Self {
        let (port, bit) = pin_to_port(pin);
        self.polarities[port_index(port)].set_bit(bit, invert);
        self
    }

    /// Commit the configuration changes to the MCP23017. The configurator will attempt to update
    /// the device's configuration registers while minimizing bus traffic: registers whose 8 bits
    /// were all given values are overwritten in one transaction, partially-changed registers are
    /// read-modify-written, and untouched registers generate no traffic at all.
    pub fn commit(self) -> Result<(), EI::Error> {
        let Configurator {
            expander,
            directions,
            pull_ups,
            polarities,
        } = self;
        const PORTS: [Port; 2] = [Port::A, Port::B];
        for (i, &port) in PORTS.iter().enumerate() {
            apply(expander, Register::Direction(port), directions[i])?;
            apply(expander, Register::PullUp(port), pull_ups[i])?;
            apply(expander, Register::Polarity(port), polarities[i])?;
        }
        Ok(())
    }
}

fn apply<EI: ExpanderInterface + Send>(
    expander: &mut Expander<EI>,
    reg: Register,
    cfg: PortConfig,
) -> Result<(), EI::Error> {
    match cfg.status() {
        PortConfigStatus::Unchanged => Ok(()),
        PortConfigStatus::Overwrite => expander.write_register(reg, cfg.into()),
        PortConfigStatus::ReadModify => expander.read_modify(reg, |cur| cfg.merge(cur)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_mode_encodes_hardware_direction_bit() {
        assert_eq!(u8::from(PinMode::Input), 1);
        assert_eq!(u8::from(PinMode::Output), 0);
    }

    #[test]
    fn port_config_set_bit_valid() {
        let mut cfg = PortConfig::default();
        cfg.set_bit(0, true);
        cfg.set_bit(2, false);
        cfg.set_bit(5, true);
        assert_eq!(u8::from(cfg), 0b00100001);
    }

    #[test]
    #[should_panic]
    fn port_config_set_bit_invalid() {
        let mut cfg = PortConfig::default();
        cfg.set_bit(8, true);
    }

    #[test]
    fn port_config_keep_mask_unchanged() {
        let cfg = PortConfig::default();
        assert_eq!(cfg.keep_mask(), 0b11111111);
        assert_eq!(cfg.status(), PortConfigStatus::Unchanged);
    }

    #[test]
    fn port_config_keep_mask_partial() {
        let mut cfg = PortConfig::default();
        cfg.set_bit(0, true);
        cfg.set_bit(3, false);
        assert_eq!(cfg.keep_mask(), 0b11110110);
        assert_eq!(cfg.status(), PortConfigStatus::ReadModify);
    }

    #[test]
    fn port_config_keep_mask_full() {
        let mut cfg = PortConfig::default();
        for bit in 0..8 {
            cfg.set_bit(bit, bit % 2 == 0);
        }
        assert_eq!(cfg.keep_mask(), 0b00000000);
        assert_eq!(cfg.status(), PortConfigStatus::Overwrite);
    }

    #[test]
    fn port_config_clearing_a_bit_still_touches_it() {
        let mut cfg = PortConfig::default();
        cfg.set_bit(4, false);
        assert_eq!(u8::from(cfg), 0x00);
        assert_eq!(cfg.status(), PortConfigStatus::ReadModify);
        assert_eq!(cfg.merge(0xFF), 0b11101111);
    }

    #[test]
    fn port_config_merge() {
        let mut cfg = PortConfig::default();
        cfg.set_bit(0, true);
        cfg.set_bit(2, false);
        assert_eq!(cfg.merge(0b11101010), 0b11101011);
    }
}
