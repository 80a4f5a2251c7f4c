//! Async implementation of the extension board driver.
//!
//! This module provides an async version of the driver that uses
//! `embedded-hal-async` traits. Enable the `async` feature to use this
//! module.
//!
//! All methods in this module are asynchronous and must be `.await`ed. The
//! register protocol, argument validation, and value encodings are identical
//! to the blocking [`IoExtensionBoard`](crate::IoExtensionBoard).
//!
//! # Example
//!
//! ```ignore
//! use io_extension_board::{async_impl::IoExtensionBoardAsync, PinMode};
//! # let i2c = todo!(); // async I2C
//!
//! async fn configure_pins() {
//!     let mut board = IoExtensionBoardAsync::new(i2c, 0x24);
//!     board.set_pin_mode(0, PinMode::OutputDigital).await.unwrap();
//!     board.digital_write(0, true).await.unwrap();
//! }
//! ```

use embedded_hal::i2c::AddressMode;
use embedded_hal_async::i2c::I2c;

use crate::{
    analog_value_register, digital_value_register, io_mode_register, pwm_duty_register,
    servo_angle_to_duty, IoExtensionError, PinMode, DEFAULT_ADDRESS, PWM_DUTY_MAX,
    PWM_FREQUENCY_MAX, PWM_FREQUENCY_MIN, REG_PWM_FREQUENCY, REG_VERSION, SERVO_ANGLE_MAX,
};

/// Async extension board driver instance
///
/// Manages asynchronous communication with the extension board over I2C.
/// All methods in this struct are async and must be `.await`ed.
///
/// # Type Parameters
///
/// * `A` - Address mode (typically `u8` for 7-bit I2C addresses)
/// * `I2C` - An async I2C implementation from `embedded-hal-async`
///
/// # Example
///
/// ```ignore
/// use io_extension_board::async_impl::IoExtensionBoardAsync;
/// # let i2c = todo!();
///
/// async fn setup() {
///     let mut board = IoExtensionBoardAsync::new(i2c, 0x24);
///     let version = board.firmware_version().await.unwrap();
/// }
/// ```
pub struct IoExtensionBoardAsync<A: AddressMode, I2C: I2c<A>> {
    i2c: I2C,
    addr: A,
}

impl<I2C: I2c<u8>> IoExtensionBoardAsync<u8, I2C> {
    /// Creates an async driver bound to the board's factory-default address
    /// ([`DEFAULT_ADDRESS`], 0x24).
    pub fn with_default_address(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }
}

impl<A, I2C> IoExtensionBoardAsync<A, I2C>
where
    A: AddressMode + Copy,
    I2C: I2c<A>,
{
    /// Creates a new async extension board driver instance.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An async I2C bus implementation
    /// * `addr` - The I2C address of the board (0x24 unless rewired)
    pub fn new(i2c: I2C, addr: A) -> Self {
        Self { i2c, addr }
    }

    /// Consumes the driver and returns the I2C bus.
    ///
    /// Useful for testing and when you need to reclaim the I2C peripheral.
    #[cfg(test)]
    pub fn destroy(self) -> I2C {
        self.i2c
    }

    /// Writes a register frame to the board asynchronously.
    async fn write_register(&mut self, frame: &[u8]) -> Result<(), IoExtensionError<I2C::Error>> {
        self.i2c
            .write(self.addr, frame)
            .await
            .map_err(IoExtensionError::WriteError)
    }

    /// Reads the board's firmware version asynchronously.
    ///
    /// # Errors
    ///
    /// Returns an error if the I2C transaction fails.
    pub async fn firmware_version(&mut self) -> Result<u8, IoExtensionError<I2C::Error>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[REG_VERSION], &mut buffer)
            .await
            .map_err(IoExtensionError::ReadError)?;
        Ok(buffer[0])
    }

    /// Configures the electrical/functional mode of a single pin
    /// asynchronously.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    /// * `mode` - One of the six [`PinMode`] variants
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    ///
    /// # Example
    ///
    /// ```ignore
    /// # use io_extension_board::{async_impl::IoExtensionBoardAsync, PinMode};
    /// # let i2c = todo!();
    /// async fn example() {
    ///     let mut board = IoExtensionBoardAsync::new(i2c, 0x24);
    ///     board.set_pin_mode(4, PinMode::InputAnalog).await.unwrap();
    /// }
    /// ```
    pub async fn set_pin_mode(
        &mut self,
        pin: u8,
        mode: PinMode,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        self.write_register(&[io_mode_register(pin), mode as u8])
            .await
    }

    /// Sets the board-global PWM carrier frequency asynchronously.
    ///
    /// # Arguments
    ///
    /// * `frequency` - Carrier frequency in Hz (1-10000)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the frequency is outside 1-10000 Hz.
    pub async fn set_pwm_frequency(
        &mut self,
        frequency: u16,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if frequency < PWM_FREQUENCY_MIN || frequency > PWM_FREQUENCY_MAX {
            return Err(IoExtensionError::InvalidArgument);
        }

        let bytes = frequency.to_le_bytes();
        self.write_register(&[REG_PWM_FREQUENCY, bytes[0], bytes[1]])
            .await
    }

    /// Sets the digital output level of a single pin asynchronously.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    /// * `level` - Output level (`true` = high, `false` = low)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    pub async fn digital_write(
        &mut self,
        pin: u8,
        level: bool,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        self.write_register(&[digital_value_register(pin), level as u8])
            .await
    }

    /// Reads the digital input level of a single pin asynchronously.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    ///
    /// # Returns
    ///
    /// `true` if the pin is high, `false` if low.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    pub async fn digital_read(&mut self, pin: u8) -> Result<bool, IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[digital_value_register(pin)], &mut buffer)
            .await
            .map_err(IoExtensionError::ReadError)?;
        Ok(buffer[0] != 0)
    }

    /// Reads the analog value of a single pin asynchronously.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    ///
    /// # Returns
    ///
    /// The 10-bit conversion result (0-1024).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    pub async fn analog_read(&mut self, pin: u8) -> Result<u16, IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        let mut buffer = [0u8; 2];
        self.i2c
            .write_read(self.addr, &[analog_value_register(pin)], &mut buffer)
            .await
            .map_err(IoExtensionError::ReadError)?;
        Ok(u16::from_le_bytes(buffer))
    }

    /// Sets the PWM duty cycle of a single pin asynchronously.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    /// * `duty` - Duty cycle value (0-4095)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7 or the
    /// duty value exceeds 4095.
    pub async fn set_pwm_duty(
        &mut self,
        pin: u8,
        duty: u16,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }
        if duty > PWM_DUTY_MAX {
            return Err(IoExtensionError::InvalidArgument);
        }

        let bytes = duty.to_le_bytes();
        self.write_register(&[pwm_duty_register(pin), bytes[0], bytes[1]])
            .await
    }

    /// Positions a hobby servo attached to a pin asynchronously.
    ///
    /// Uses the same angle-to-duty mapping as the blocking driver: the pulse
    /// is `0.5 ms + angle/90 ms` of a 20 ms frame, assuming the default
    /// 50 Hz carrier.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    /// * `angle` - Target angle in degrees (0-180)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7 or the
    /// angle is greater than 180.
    pub async fn set_servo_angle(
        &mut self,
        pin: u8,
        angle: u8,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if angle > SERVO_ANGLE_MAX {
            return Err(IoExtensionError::InvalidArgument);
        }

        self.set_pwm_duty(pin, servo_angle_to_duty(angle)).await
    }
}
