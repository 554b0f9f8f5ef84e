//! Driver library for the Microchip MCP23017 I2C I/O expander.
//!
//! The MCP23017 is a device that provides 16 GPIO pins arranged as two 8-bit ports, A and B.
//! Each pin is software-configurable as an input or a push-pull output, with an optional weak
//! pull-up and input polarity inversion. The state of each pin can be read and written through a
//! two-wire I2C bus, on which the chip occupies one of eight strap-selectable addresses (0x20
//! through 0x27).
//!
//! This driver is intended to work on embedded platforms using any implementation of the
//! `embedded-hal` trait library. It communicates with the expander via any I2C device
//! implementing the blocking bus traits, and permits creation of new GPIO devices corresponding
//! to the I/O pins on the device, which themselves implement the HAL traits.
//!
//! Every operation is a synchronous, blocking register transaction; the driver holds no mirror of
//! the device's register state, so reads always reflect the hardware at the time of the call.
//!
//! # Construction
//!
//! To set up the driver:
//!
//! - Use your platform's `embedded-hal` implementation to obtain the I2C bus your MCP23017 is
//!   wired to.
//! - Construct an [`ExpanderInterface`] — the [`I2cInterface`] for MCP23017 — which will take
//!   ownership of the bus device.
//! - Construct an [`Expander`], which will take ownership of the `ExpanderInterface`. It targets
//!   the default bus address 0x20 until told otherwise.
//!
//! ```ignore
//! let i2c = /* construct something implementing embedded_hal::blocking::i2c::{Write, WriteRead} */
//!
//! let ei = mcp23017::I2cInterface::new(i2c);
//! let mut expander = mcp23017::Expander::new(ei);
//! ```
//!
//! # Initialization and addressing
//!
//! *See [`Expander::init`] and [`Expander::set_address`].*
//!
//! [`Expander::set_address`] selects which of the eight strapped addresses subsequent operations
//! target, without touching the bus. [`Expander::init`] selects an address and then writes the
//! canonical power-up configuration: all 16 pins inputs with pull-ups enabled, polarity inversion
//! off, output latches cleared. Inputs with pull-ups keep unwired pins from floating, and a
//! cleared latch avoids driving surprise levels when a pin is later switched to an output.
//!
//! ```
//! # fn main() -> Result<(), ()> {
//! # let ei = mcp23017::interface::noop::NoopInterface;
//! # let mut expander = mcp23017::Expander::new(ei);
//! expander.init(0x21)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Device configuration
//!
//! *See [`Expander::configure`] and [`config::Configurator`].*
//!
//! The `configure` method will produce a builder that you can use to change pin directions,
//! pull-ups, and input polarities. Committing the builder batches the register traffic: a port
//! register with all 8 bits assigned is overwritten in a single write, a partially-changed one is
//! read-modify-written, and untouched registers stay untouched.
//!
//! ```
//! # fn main() -> Result<(), ()> {
//! # let ei = mcp23017::interface::noop::NoopInterface;
//! # let mut expander = mcp23017::Expander::new(ei);
//! expander
//!     .configure()
//!     .pins(0..=7, mcp23017::PinMode::Output)
//!     .pin_mode(8, mcp23017::PinMode::Input)
//!     .pin_pull_up(8, true)
//!     .commit()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Raw mode
//!
//! *See [`Expander`].*
//!
//! With a configured device, you may use it in raw mode, accessing ports and pins directly. Port
//! operations move whole bytes; single-pin mutations are read-modify-write sequences because the
//! hardware has no single-bit register access.
//!
//! ```
//! # fn main() -> Result<(), ()> {
//! # use mcp23017::Port;
//! # let ei = mcp23017::interface::noop::NoopInterface;
//! # let mut expander = mcp23017::Expander::new(ei);
//! let port_a: u8 = expander.read_port(Port::A)?;
//! let all_sixteen: u16 = expander.read_word()?;
//! expander.write_pin(7, false)?;
//! # Ok(())
//! # }
//! ```
//!
//! # HAL mode
//!
//! *See [`Expander::into_immediate`] and [`ImmediateIO`].*
//!
//! To compose the driver with other `embedded-hal` drivers that are compatible with
//! `embedded_hal::digital::v2::{InputPin, OutputPin}`, you can convert the `Expander` into an
//! immediate-mode I/O adapter that will produce ownable `PortPin` instances for each GPIO pin on
//! the expander. Calling the GPIO trait methods on any `PortPin` immediately generates the bus
//! transactions to perform the operation on that pin.
//!
//! ```
//! # extern crate embedded_hal;
//! # struct MyTrafficLight<P>(std::marker::PhantomData<P>);
//! # impl<P> MyTrafficLight<P> where P: embedded_hal::digital::v2::OutputPin {
//! #   fn new(r: P, y: P, g: P) -> Self { Self(std::marker::PhantomData) }
//! #   fn change_to_red(&mut self) {}
//! # }
//! # fn main() -> Result<(), ()> {
//! # let ei = mcp23017::interface::noop::NoopInterface;
//! # let mut expander = mcp23017::Expander::new(ei);
//! expander.configure().pins(0..=2, mcp23017::PinMode::Output).commit()?;
//! let imm_io = expander.into_immediate::<mcp23017::DefaultMutex<_>>();
//!
//! let red_lamp = imm_io.port_pin(0);
//! let yellow_lamp = imm_io.port_pin(1);
//! let green_lamp = imm_io.port_pin(2);
//! let mut traffic_light = MyTrafficLight::new(red_lamp, yellow_lamp, green_lamp);
//!
//! traffic_light.change_to_red();
//! # Ok(())
//! # }
//! ```
//!
//! There is no write-back cached mode: the driver never caches register state across calls, so
//! bit-banged sequencing through `PortPin`s behaves exactly as written, at the cost of one or two
//! bus transactions per trait call.
//!
//! ## Mutual exclusion
//!
//! The HAL adapter requires you to provide a mutual exclusion primitive to arbitrate access to
//! the hardware from multiple `PortPin`s; it also keeps the two transactions of a single-pin
//! write from interleaving with other pins' traffic. The adapter is parameterized over a type
//! implementing the `IOMutex` trait, which is a concept borrowed from
//! [`shared-bus`](http://docs.rs/shared-bus).
//!
//! In a `std` environment you may enable the `std` Cargo feature, and `mutex::DefaultMutex<T>`
//! will be a type alias to `std::sync::Mutex<T>` with a provided impl of `IOMutex`. Similarly,
//! for Cortex-M environments using the `cortex-m` crate, enabling the `cortexm` Cargo feature
//! will alias `mutex::DefaultMutex<T>` to `cortex_m::interrupt::Mutex<core::cell::RefCell<T>>`
//! with a provided `IOMutex` impl. This arrangement should allow you to just specify
//! `DefaultMutex` as in the examples, and have the correct thing happen based on the build
//! environment.
//!
//! If you instead drive the raw `Expander` from several threads, note that the single-pin
//! mutating operations are two sequential bus transactions with no atomicity guarantee; wrap the
//! whole call in your own lock.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "std")]
extern crate core;
#[cfg(test)]
#[macro_use]
extern crate proptest;

#[cfg(feature = "cortexm")]
extern crate cortex_m;
extern crate embedded_hal as hal;

pub mod config;
pub mod expander;
pub mod interface;
pub mod mutex;
pub mod registers;

pub use config::PinMode;
pub use expander::immediate::ImmediateIO;
pub use expander::pin::{ExpanderIO, PortPin};
pub use expander::Expander;
pub use interface::i2c::I2cInterface;
pub use interface::{BusAddress, ExpanderInterface, DEFAULT_ADDRESS};
pub use mutex::{DefaultMutex, IOMutex};
pub use registers::Port;
