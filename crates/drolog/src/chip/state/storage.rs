//! Register storage backends.
//!
//! This module provides the `RegisterStorage` trait and a fixed-size array
//! implementation. Unlike a sparse map, every cell of the array exists from
//! the start and reads as the value type's default until it is written, which
//! mirrors a chip coming out of reset with all registers cleared.
//!
//! # Examples
//!
//! ```
//! use drolog::chip::state::{RegisterBank, RegisterStorage};
//!
//! let mut bank = RegisterBank::default();
//! assert_eq!(bank.read(0xC0), 0x00);
//! bank.write(0xC0, 0x01);
//! assert_eq!(bank.read(0xC0), 0x01);
//! ```

use std::fmt::Debug;

/// Trait for register storage backend
///
/// This trait abstracts the storage mechanism for chip registers. The
/// register address and value types are specified as associated types.
pub trait RegisterStorage: Default + Clone + Debug {
    /// Register address type
    type Register: Copy + Debug;

    /// Register value type
    type Value: Copy + Debug + Default;

    /// Write a value to a register
    fn write(&mut self, register: Self::Register, value: Self::Value);

    /// Read a value from a register
    ///
    /// Registers that were never written read as `Self::Value::default()`.
    fn read(&self, register: Self::Register) -> Self::Value;
}

/// Fixed-size array storage for chips with a contiguous register space
///
/// # Type Parameters
///
/// * `V` - Register value type (e.g., u8, u16)
/// * `N` - Size of the register array, at most 256 since addresses are `u8`
///
/// Writes to addresses at or beyond `N` are ignored and read back as the
/// default value.
#[derive(Debug, Clone)]
pub struct ArrayStorage<V = u8, const N: usize = 256>
where
    V: Copy + Debug + Default,
{
    registers: [V; N],
}

impl<V, const N: usize> Default for ArrayStorage<V, N>
where
    V: Copy + Debug + Default,
{
    fn default() -> Self {
        Self {
            registers: [V::default(); N],
        }
    }
}

impl<V, const N: usize> RegisterStorage for ArrayStorage<V, N>
where
    V: Copy + Debug + Default,
{
    type Register = u8;
    type Value = V;

    fn write(&mut self, register: Self::Register, value: Self::Value) {
        if let Some(cell) = self.registers.get_mut(register as usize) {
            *cell = value;
        }
    }

    fn read(&self, register: Self::Register) -> Self::Value {
        self.registers
            .get(register as usize)
            .copied()
            .unwrap_or_default()
    }
}

/// The full OPL2 register file replayed by one transcoding pass.
pub type RegisterBank = ArrayStorage<u8, 256>;
