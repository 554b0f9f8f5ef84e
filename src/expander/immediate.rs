//! Immediate-mode I/O adapter.

use core::marker::PhantomData;

use expander::pin::{ExpanderIO, PortPin};
use expander::Expander;
use interface::ExpanderInterface;
use mutex::IOMutex;
use registers::valid_pin;

/// This I/O adapter captures the `Expander` and provides a factory for generating GPIO pins that
/// implement `InputPin` and `OutputPin` traits. Each such pin will immediately issue one or more
/// bus transactions to get or set the value every time any pin is accessed.
///
/// The mutex also supplies the serialization the expander's read-modify-write sequences need when
/// several `PortPin`s are driven from different contexts: each pin operation holds the lock for
/// both halves of the sequence.
pub struct ImmediateIO<M, EI>(M, PhantomData<EI>)
where
    M: IOMutex<Expander<EI>>,
    EI: ExpanderInterface + Send;

impl<M, EI> ImmediateIO<M, EI>
where
    M: IOMutex<Expander<EI>>,
    EI: ExpanderInterface + Send,
{
    pub(crate) fn new(expander: Expander<EI>) -> Self {
        ImmediateIO(M::new(expander), PhantomData)
    }

    /// Create a `PortPin` corresponding to one of the pins on the MCP23017. The returned
    /// `PortPin` implements `InputPin` and `OutputPin`, and using any of the methods from these
    /// traits on the returned `PortPin` will trigger a bus transaction to immediately read or
    /// write the value of that I/O pin.
    pub fn port_pin<'io>(&'io self, pin: u8) -> PortPin<'io, Self> {
        PortPin::new(self, valid_pin(pin))
    }
}

impl<M, EI> ExpanderIO for ImmediateIO<M, EI>
where
    M: IOMutex<Expander<EI>>,
    EI: ExpanderInterface + Send,
{
    type Error = EI::Error;

    fn write_pin(&self, pin: u8, bit: bool) -> Result<(), EI::Error> {
        self.0.lock(|ex| ex.write_pin(pin, bit))
    }
    fn read_pin(&self, pin: u8) -> Result<bool, EI::Error> {
        self.0.lock(|ex| ex.read_pin(pin))
    }
}

#[cfg(test)]
mod tests {
    use expander::Expander;
    use hal::digital::v2::{InputPin, OutputPin};
    use interface::test_spy::{TestRegister as TR, TestSpyInterface};
    use mutex::DefaultMutex;

    #[test]
    fn single_pin_write() {
        let ei = TestSpyInterface::new();
        let io = Expander::new(ei.split()).into_immediate::<DefaultMutex<_>>();
        let mut pin_four = io.port_pin(4);

        assert!(pin_four.set_high().is_ok());
        assert_eq!(ei.get(0x14), TR::WrittenValue(0b00010000));
    }

    #[test]
    fn single_pin_read() {
        let mut ei = TestSpyInterface::new();
        let io = Expander::new(ei.split()).into_immediate::<DefaultMutex<_>>();
        let pin_four = io.port_pin(4);

        ei.set(0x12, TR::ResetValue(0x00));
        assert_eq!(pin_four.is_high(), Ok(false));

        ei.set(0x12, TR::ResetValue(0b00010000));
        assert_eq!(pin_four.is_high(), Ok(true));
    }

    #[test]
    fn multi_pin_read_write_both_ports() {
        let mut ei = TestSpyInterface::new();
        let io = Expander::new(ei.split()).into_immediate::<DefaultMutex<_>>();
        let mut pin_two = io.port_pin(2);
        let mut pin_eleven = io.port_pin(11);
        let pin_fifteen = io.port_pin(15);

        ei.set(0x13, TR::ResetValue(0b10000000));
        assert!(pin_two.set_high().is_ok());
        assert!(pin_eleven.set_low().is_ok());
        assert_eq!(pin_fifteen.is_low(), Ok(false));
        assert_eq!(ei.get(0x14), TR::WrittenValue(0b00000100));
        assert_eq!(ei.get(0x15), TR::WrittenValue(0x00));
    }

    #[test]
    fn pin_write_preserves_port_siblings() {
        let mut ei = TestSpyInterface::new();
        let io = Expander::new(ei.split()).into_immediate::<DefaultMutex<_>>();
        let mut pin_nine = io.port_pin(9);

        ei.set(0x15, TR::ResetValue(0b01000001));
        assert!(pin_nine.set_high().is_ok());
        assert_eq!(ei.get(0x15), TR::WrittenValue(0b01000011));
    }

    #[test]
    #[should_panic]
    fn port_pin_out_of_range_panics() {
        let ei = TestSpyInterface::new();
        let io = Expander::new(ei.split()).into_immediate::<DefaultMutex<_>>();
        io.port_pin(16);
    }
}
