//! Bus interface implementation for the AS7421
//!
//! This module provides an implementation of the `device-driver` register
//! interface trait for I2C communication with the AS7421.

use crate::I2C_ADDRESS;

use device_driver::RegisterInterface;

/// I2C interface for the AS7421
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Create a new I2C interface at the chip's fixed address (0x64)
    ///
    /// # Arguments
    /// * `i2c` - The I2C peripheral
    ///
    /// # Example
    /// ```ignore
    /// let interface = I2cInterface::new(i2c);
    /// let mut sensor = As7421::new(interface);
    /// ```
    pub const fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            address: I2C_ADDRESS,
        }
    }

    /// Create a new I2C interface with a non-standard device address
    ///
    /// Production parts answer at [`I2C_ADDRESS`]; this exists for bus
    /// multiplexer/translator setups that remap the device.
    pub const fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Consume the interface and return the I2C peripheral
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> RegisterInterface for I2cInterface<I2C>
where
    I2C: embedded_hal::i2c::I2c<Error = E>,
{
    type Error = E;
    type AddressType = u8;

    fn read_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        read_data: &mut [u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in read_data.len() for I2C
        self.i2c.write_read(self.address, &[address], read_data)
    }

    fn write_register(
        &mut self,
        address: Self::AddressType,
        size_bits: u32,
        write_data: &[u8],
    ) -> Result<(), Self::Error> {
        let _ = size_bits; // Size is implicit in write_data.len() for I2C
        // Create a buffer with address + data. 32 data bytes covers the
        // widest register on this chip (one 256-bit channel group).
        let mut buffer = [0u8; 33];
        buffer[0] = address;
        let len = write_data.len().min(32);
        buffer[1..=len].copy_from_slice(&write_data[..len]);

        self.i2c.write(self.address, &buffer[..=len])
    }
}
