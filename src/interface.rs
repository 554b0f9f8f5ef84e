//! This module provide shims for the `embedded-hal` hardware correspoding to the MCP23017's
//! supported electrical/bus interfaces. It is a shim between `embedded-hal` implementations and
//! the expander's registers.

use registers::RegisterAddress;

/// The 7-bit bus address of an MCP23017. It selects which device on the shared two-wire bus
/// responds to a transaction. The hardware straps the low three bits, so addresses 0x20 through
/// 0x27 are the ones a real device can answer on.
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct BusAddress(pub(crate) u8);

/// The bus address an MCP23017 answers on with all three address pins strapped low.
pub const DEFAULT_ADDRESS: u8 = 0x20;

impl From<u8> for BusAddress {
    /// Convert a `u8` into a `BusAddress`, keeping the low 7 bits and silently discarding the
    /// rest.
    fn from(addr: u8) -> BusAddress {
        BusAddress(addr & 0x7F)
    }
}

impl From<BusAddress> for u8 {
    fn from(addr: BusAddress) -> u8 {
        addr.0
    }
}

/// An interface for the MCP23017 implements this trait, which provides the basic operations for
/// sending pre-encoded register accesses to a chip on the bus via the interface.
pub trait ExpanderInterface {
    /// The type of error that register reads and writes may return.
    type Error;
    /// Issue a write command to the expander at `addr` to write `value` into the register at
    /// `reg`.
    fn write_register(
        &mut self,
        addr: BusAddress,
        reg: RegisterAddress,
        value: u8,
    ) -> Result<(), Self::Error>;
    /// Issue a read command to the expander at `addr` to fetch the `u8` value at register `reg`.
    fn read_register(&mut self, addr: BusAddress, reg: RegisterAddress)
        -> Result<u8, Self::Error>;
}

// This is here (and has to be pub) for doctests only. It's useless otherwise.
#[doc(hidden)]
pub mod noop {
    use super::{BusAddress, ExpanderInterface};
    use registers::RegisterAddress;
    pub struct NoopInterface;
    impl ExpanderInterface for NoopInterface {
        type Error = ();
        fn write_register(
            &mut self,
            _addr: BusAddress,
            _reg: RegisterAddress,
            _value: u8,
        ) -> Result<(), Self::Error> {
            Ok(())
        }
        fn read_register(
            &mut self,
            _addr: BusAddress,
            _reg: RegisterAddress,
        ) -> Result<u8, Self::Error> {
            Ok(0u8)
        }
    }
}

pub mod i2c {
    //! The I2C interface controls an MCP23017 via a two-wire bus (SCL, SDA).

    use hal;

    use super::{BusAddress, ExpanderInterface};
    use registers::RegisterAddress;

    /// The union of all errors that may occur on the I2C interface. This consists of variants for
    /// each of the error types for bus write and bus write-read transactions.
    #[derive(Debug)]
    pub enum I2cInterfaceError<WE, RE> {
        /// An error occurred during a bus write.
        WriteError(WE),
        /// An error occurred during the write-read used to fetch a register.
        ReadError(RE),
    }

    /// A configured `ExpanderInterface` for controlling an MCP23017 via I2C.
    pub struct I2cInterface<I2C> {
        /// The I2C master device sharing a bus with the MCP23017.
        i2c: I2C,
    }

    impl<I2C, WE, RE> I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write<Error = WE> + hal::blocking::i2c::WriteRead<Error = RE>,
    {
        /// Create a new I2C interface to communicate with the port expander. `i2c` is the I2C
        /// master device on whose bus the MCP23017 is wired.
        pub fn new(i2c: I2C) -> Self {
            Self { i2c }
        }

        /// Release the underlying I2C master device, consuming the interface.
        pub fn release(self) -> I2C {
            self.i2c
        }
    }

    impl<I2C, WE, RE> ExpanderInterface for I2cInterface<I2C>
    where
        I2C: hal::blocking::i2c::Write<Error = WE> + hal::blocking::i2c::WriteRead<Error = RE>,
    {
        type Error = I2cInterfaceError<WE, RE>;

        fn write_register(
            &mut self,
            addr: BusAddress,
            reg: RegisterAddress,
            value: u8,
        ) -> Result<(), Self::Error> {
            // One transaction carrying [register, value], stop condition at the end.
            let buf = [u8::from(reg), value];
            self.i2c
                .write(addr.into(), &buf)
                .map_err(I2cInterfaceError::WriteError)
        }

        fn read_register(
            &mut self,
            addr: BusAddress,
            reg: RegisterAddress,
        ) -> Result<u8, Self::Error> {
            // Select the register without releasing the bus, then a repeated start and a one-byte
            // read with a stop. The device's address pointer is left on `reg` afterward.
            let mut buf = [0u8; 1];
            self.i2c
                .write_read(addr.into(), &[u8::from(reg)], &mut buf)
                .map_err(I2cInterfaceError::ReadError)?;
            Ok(buf[0])
        }
    }
}

#[cfg(test)]
pub(crate) mod test_spy {
    //! An interface for use in unit tests to spy on whatever was sent to it.

    use super::{BusAddress, ExpanderInterface};
    use registers::RegisterAddress;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy, Debug, PartialEq)]
    pub enum TestRegister {
        Forbidden,
        ResetValue(u8),
        WrittenValue(u8),
    }

    pub struct TestSpyInterface {
        registers: Arc<Mutex<Vec<TestRegister>>>,
        reads: Arc<Mutex<Vec<u8>>>,
        writes: Arc<Mutex<Vec<(u8, u8)>>>,
        targets: Arc<Mutex<Vec<u8>>>,
    }

    impl TestSpyInterface {
        pub fn new() -> Self {
            let mut new = Self {
                registers: Arc::new(Mutex::new(Vec::new())),
                reads: Arc::new(Mutex::new(Vec::new())),
                writes: Arc::new(Mutex::new(Vec::new())),
                targets: Arc::new(Mutex::new(Vec::new())),
            };
            new.reset();
            new
        }

        pub fn reset(&mut self) {
            use self::TestRegister::*;

            self.reads.lock().unwrap().clear();
            self.writes.lock().unwrap().clear();
            self.targets.lock().unwrap().clear();
            let mut regs = self.registers.lock().unwrap();
            regs.clear();
            regs.resize(0x16, ResetValue(0x00));

            // Both direction registers reset to all-inputs.
            regs[0x00] = ResetValue(0xFF);
            regs[0x01] = ResetValue(0xFF);

            // 0x0B mirrors IOCON in hardware; the driver must never generate it.
            regs[0x0B] = Forbidden;
        }

        pub fn split(&self) -> Self {
            Self {
                registers: self.registers.clone(),
                reads: self.reads.clone(),
                writes: self.writes.clone(),
                targets: self.targets.clone(),
            }
        }

        pub fn get(&self, addr: u8) -> TestRegister {
            self.registers.lock().unwrap()[addr as usize]
        }

        pub fn set(&mut self, addr: u8, val: TestRegister) {
            self.registers.lock().unwrap()[addr as usize] = val;
        }

        /// Register addresses of every read, in order.
        pub fn reads(&self) -> Vec<u8> {
            self.reads.lock().unwrap().clone()
        }

        /// `(register, value)` of every write, in order.
        pub fn writes(&self) -> Vec<(u8, u8)> {
            self.writes.lock().unwrap().clone()
        }

        /// The bus address targeted by every transaction, reads and writes alike, in order.
        pub fn targets(&self) -> Vec<u8> {
            self.targets.lock().unwrap().clone()
        }
    }

    impl ExpanderInterface for TestSpyInterface {
        type Error = std::convert::Infallible;

        fn write_register(
            &mut self,
            addr: BusAddress,
            reg: RegisterAddress,
            value: u8,
        ) -> Result<(), Self::Error> {
            self.targets.lock().unwrap().push(addr.into());
            let enc_reg = u8::from(reg);
            self.writes.lock().unwrap().push((enc_reg, value));
            let mut regs = self.registers.lock().unwrap();
            assert!(enc_reg <= 0x15);
            match regs[enc_reg as usize] {
                TestRegister::Forbidden => panic!("Write to forbidden register {}", enc_reg),
                ref mut m => *m = TestRegister::WrittenValue(value),
            };
            Ok(())
        }

        fn read_register(
            &mut self,
            addr: BusAddress,
            reg: RegisterAddress,
        ) -> Result<u8, Self::Error> {
            self.targets.lock().unwrap().push(addr.into());
            let enc_reg = u8::from(reg);
            self.reads.lock().unwrap().push(enc_reg);
            let regs = self.registers.lock().unwrap();
            assert!(enc_reg <= 0x15);
            match regs[enc_reg as usize] {
                TestRegister::Forbidden => panic!("Read from forbidden register {}", enc_reg),
                TestRegister::ResetValue(v) => Ok(v),
                TestRegister::WrittenValue(v) => Ok(v),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn bus_address_masked_to_seven_bits(addr in 0u8..=255) {
            prop_assert_eq!(u8::from(BusAddress::from(addr)), addr & 0x7F);
        }
    }
}
