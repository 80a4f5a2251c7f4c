//! I2C I/O Extension Board Driver
//!
//! A platform-agnostic driver for an I2C-attached extension board that adds
//! eight general-purpose I/O lines to a host microcontroller.
//!
//! The board exposes its pins through a small register file. Each pin can be
//! configured for one of six modes and then driven or sampled individually:
//! - Digital input with pull-up, pull-down, or no pull resistor
//! - Digital (push-pull) output
//! - 10-bit analog input
//! - 12-bit PWM output, including hobby-servo angle control
//!
//! The PWM carrier frequency is a single board-global setting (default 50 Hz);
//! duty cycles are per pin. All multi-byte register values travel over the bus
//! little-endian, low byte first.
//!
//! # Features
//!
//! - `no_std` compatible
//! - Uses `embedded-hal` traits for portability
//! - Optional async driver via `embedded-hal-async` (`async` feature)
//! - Optional `defmt::Format` on the public types (`defmt-03` feature)
//! - Arguments are range-checked before any bus traffic: the board's firmware
//!   does not validate register writes, so the driver rejects out-of-range
//!   pins, duties, frequencies, and angles with
//!   [`IoExtensionError::InvalidArgument`] instead of forwarding them
//!
//! # Example
//!
//! ```ignore
//! use io_extension_board::{IoExtensionBoard, PinMode};
//! # let i2c = todo!();
//!
//! // Create a driver bound to the board's default address (0x24)
//! let mut board = IoExtensionBoard::with_default_address(i2c);
//!
//! // Button on pin 0, LED on pin 1, servo on pin 2
//! board.set_pin_mode(0, PinMode::InputPullUp).unwrap();
//! board.set_pin_mode(1, PinMode::OutputDigital).unwrap();
//! board.set_pin_mode(2, PinMode::OutputPwm).unwrap();
//!
//! let pressed = !board.digital_read(0).unwrap();
//! board.digital_write(1, pressed).unwrap();
//! board.set_servo_angle(2, 90).unwrap();
//! ```
//!
//! # Caller discipline
//!
//! The driver is a stateless translator from pin operations to register
//! transactions; the board itself owns all configuration state.
//!
//! - A pin's mode must be set with [`IoExtensionBoard::set_pin_mode`] before
//!   the matching read/write operation is meaningful. The driver does not
//!   track modes and will happily issue, say, an analog read on a digital
//!   pin; the board then returns whatever its firmware holds.
//! - Only one transaction may be in flight per physical I2C bus at a time.
//!   When several drivers share one bus, wrap it with something like
//!   `embedded-hal-bus` rather than handing the same bus to each driver.

#![no_std]

use embedded_hal::i2c::{AddressMode, I2c};

#[cfg(feature = "async")]
pub mod async_impl;

/// Factory-default I2C address of the extension board
pub const DEFAULT_ADDRESS: u8 = 0x24;

// Hardware register addresses. Per-pin registers sit at a fixed stride from
// their group base: one byte per pin for IO mode and digital value, two bytes
// (little-endian) per pin for analog value and PWM duty.
/// Firmware version register (read-only)
pub const REG_VERSION: u8 = 0x00;
/// IO mode register base (1 byte per pin)
pub const REG_IO_MODE: u8 = 0x01;
/// Analog value register base (2 bytes per pin, little-endian)
pub const REG_ANALOG_VALUE: u8 = 0x10;
/// Digital value register base (1 byte per pin)
pub const REG_DIGITAL_VALUE: u8 = 0x40;
/// PWM duty register base (2 bytes per pin, little-endian)
pub const REG_PWM_DUTY: u8 = 0x50;
/// PWM carrier frequency register (2 bytes, little-endian, board-global)
pub const REG_PWM_FREQUENCY: u8 = 0x60;

/// Highest PWM duty value (12-bit resolution)
pub const PWM_DUTY_MAX: u16 = 4095;
/// Lowest accepted PWM carrier frequency in Hz
pub const PWM_FREQUENCY_MIN: u16 = 1;
/// Highest accepted PWM carrier frequency in Hz
pub const PWM_FREQUENCY_MAX: u16 = 10_000;
/// Highest servo angle in degrees
pub const SERVO_ANGLE_MAX: u8 = 180;

/// Pin operating mode.
///
/// The board encodes each mode as a distinct bit in the pin's IO-mode
/// register. Exactly one mode is active per pin at a time; modeling the
/// modes as a closed enum keeps invalid combinations unrepresentable while
/// still writing the same byte on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
#[repr(u8)]
pub enum PinMode {
    /// Input with the internal pull-up resistor enabled
    InputPullUp = 1 << 0,
    /// Input with the internal pull-down resistor enabled
    InputPullDown = 1 << 1,
    /// Input with no pull resistor (high impedance)
    InputFloating = 1 << 2,
    /// Push-pull digital output
    OutputDigital = 1 << 3,
    /// 10-bit analog input
    InputAnalog = 1 << 4,
    /// 12-bit PWM output
    OutputPwm = 1 << 5,
}

impl From<PinMode> for u8 {
    /// Returns the mode's wire encoding, the byte written to the IO-mode
    /// register.
    fn from(mode: PinMode) -> Self {
        mode as u8
    }
}

/// Errors that can occur when interacting with the extension board
#[derive(Debug)]
#[cfg_attr(feature = "defmt-03", derive(defmt::Format))]
pub enum IoExtensionError<E> {
    /// Invalid argument passed to a method (e.g., pin number out of range).
    /// Raised before any bus traffic; the transaction is never issued.
    InvalidArgument,
    /// I2C read operation failed
    ReadError(E),
    /// I2C write operation failed
    WriteError(E),
}

// Per-pin register addressing, kept as pure functions so the address
// arithmetic is testable without a bus. Callers bound-check `pin` first.

pub(crate) fn io_mode_register(pin: u8) -> u8 {
    REG_IO_MODE + pin
}

pub(crate) fn digital_value_register(pin: u8) -> u8 {
    REG_DIGITAL_VALUE + pin
}

pub(crate) fn analog_value_register(pin: u8) -> u8 {
    REG_ANALOG_VALUE + 2 * pin
}

pub(crate) fn pwm_duty_register(pin: u8) -> u8 {
    REG_PWM_DUTY + 2 * pin
}

// Duty value for a hobby-servo pulse on the default 50 Hz carrier: the pulse
// is 0.5 ms + angle/90 ms of a 20 ms frame, i.e. a fraction (angle + 45)/1800
// of the 12-bit duty range, rounded to nearest with halves up. Integer form
// so no_std builds need no float rounding support.
pub(crate) fn servo_angle_to_duty(angle: u8) -> u16 {
    (((u32::from(angle) + 45) * u32::from(PWM_DUTY_MAX) + 900) / 1800) as u16
}

/// Extension board driver instance
///
/// Manages communication with the extension board over I2C. The generic
/// parameters allow flexibility in I2C implementation and addressing mode.
///
/// Beyond the held bus handle and address the driver is stateless; every
/// method is one independent register transaction against the board.
pub struct IoExtensionBoard<A: AddressMode, I2C: I2c<A>> {
    i2c: I2C,
    addr: A,
}

impl<I2C: I2c<u8>> IoExtensionBoard<u8, I2C> {
    /// Creates a driver bound to the board's factory-default address
    /// ([`DEFAULT_ADDRESS`], 0x24).
    pub fn with_default_address(i2c: I2C) -> Self {
        Self::new(i2c, DEFAULT_ADDRESS)
    }
}

impl<A, I2C> IoExtensionBoard<A, I2C>
where
    A: AddressMode + Copy,
    I2C: I2c<A>,
{
    /// Creates a new extension board driver instance.
    ///
    /// # Arguments
    ///
    /// * `i2c` - An I2C bus implementation
    /// * `addr` - The I2C address of the board (0x24 unless rewired)
    ///
    /// # Example
    ///
    /// ```ignore
    /// # use io_extension_board::IoExtensionBoard;
    /// # let i2c = todo!();
    /// let board = IoExtensionBoard::new(i2c, 0x24);
    /// ```
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

    /// Writes a register frame (register address followed by the payload
    /// bytes) to the board in one transaction.
    fn write_register(&mut self, frame: &[u8]) -> Result<(), IoExtensionError<I2C::Error>> {
        self.i2c
            .write(self.addr, frame)
            .map_err(IoExtensionError::WriteError)
    }

    /// Reads the board's firmware version.
    ///
    /// # Errors
    ///
    /// Returns an error if the I2C transaction fails.
    pub fn firmware_version(&mut self) -> Result<u8, IoExtensionError<I2C::Error>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[REG_VERSION], &mut buffer)
            .map_err(IoExtensionError::ReadError)?;
        Ok(buffer[0])
    }

    /// Configures the electrical/functional mode of a single pin.
    ///
    /// A pin must be put in the matching mode before the corresponding
    /// digital/analog/PWM operation is used on it; the board keeps the mode
    /// until it is reconfigured or power-cycled.
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
    /// # use io_extension_board::{IoExtensionBoard, PinMode};
    /// # let i2c = todo!();
    /// # let mut board = IoExtensionBoard::with_default_address(i2c);
    /// board.set_pin_mode(0, PinMode::InputPullUp).unwrap(); // button
    /// board.set_pin_mode(1, PinMode::OutputDigital).unwrap(); // LED
    /// ```
    pub fn set_pin_mode(
        &mut self,
        pin: u8,
        mode: PinMode,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        self.write_register(&[io_mode_register(pin), mode as u8])
    }

    /// Sets the PWM carrier frequency for the whole board.
    ///
    /// The carrier is a single global setting shared by every pin in
    /// [`PinMode::OutputPwm`]; the board powers up at 50 Hz.
    ///
    /// # Arguments
    ///
    /// * `frequency` - Carrier frequency in Hz (1-10000)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the frequency is outside 1-10000 Hz.
    ///
    /// # Note
    ///
    /// [`set_servo_angle`](Self::set_servo_angle) calibrates pulse widths
    /// for the default 50 Hz carrier; servo angles shift if the carrier is
    /// moved away from it.
    pub fn set_pwm_frequency(
        &mut self,
        frequency: u16,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if frequency < PWM_FREQUENCY_MIN || frequency > PWM_FREQUENCY_MAX {
            return Err(IoExtensionError::InvalidArgument);
        }

        let bytes = frequency.to_le_bytes();
        self.write_register(&[REG_PWM_FREQUENCY, bytes[0], bytes[1]])
    }

    /// Sets the digital output level of a single pin.
    ///
    /// The pin must be configured as [`PinMode::OutputDigital`] first.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    /// * `level` - Output level (`true` = high, `false` = low)
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    ///
    /// # Example
    ///
    /// ```ignore
    /// # use io_extension_board::{IoExtensionBoard, PinMode};
    /// # let i2c = todo!();
    /// # let mut board = IoExtensionBoard::with_default_address(i2c);
    /// board.set_pin_mode(3, PinMode::OutputDigital).unwrap();
    /// board.digital_write(3, true).unwrap(); // pin 3 high
    /// ```
    pub fn digital_write(
        &mut self,
        pin: u8,
        level: bool,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        self.write_register(&[digital_value_register(pin), level as u8])
    }

    /// Reads the digital input level of a single pin.
    ///
    /// The pin must be configured as one of the three input modes first.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    ///
    /// # Returns
    ///
    /// Returns `true` if the pin is high, `false` if low.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    pub fn digital_read(&mut self, pin: u8) -> Result<bool, IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.addr, &[digital_value_register(pin)], &mut buffer)
            .map_err(IoExtensionError::ReadError)?;
        Ok(buffer[0] != 0)
    }

    /// Reads the analog value of a single pin.
    ///
    /// The pin must be configured as [`PinMode::InputAnalog`] first. The
    /// board transfers the 10-bit conversion result as two little-endian
    /// bytes.
    ///
    /// # Arguments
    ///
    /// * `pin` - Pin number (0-7)
    ///
    /// # Returns
    ///
    /// The conversion result (0-1024).
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the pin number is greater than 7.
    pub fn analog_read(&mut self, pin: u8) -> Result<u16, IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }

        let mut buffer = [0u8; 2];
        self.i2c
            .write_read(self.addr, &[analog_value_register(pin)], &mut buffer)
            .map_err(IoExtensionError::ReadError)?;
        Ok(u16::from_le_bytes(buffer))
    }

    /// Sets the PWM duty cycle of a single pin.
    ///
    /// The pin must be configured as [`PinMode::OutputPwm`] first. Duty has
    /// 12-bit resolution: 0 holds the pin low, [`PWM_DUTY_MAX`] holds it
    /// high.
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
    ///
    /// # Example
    ///
    /// ```ignore
    /// # use io_extension_board::{IoExtensionBoard, PinMode};
    /// # let i2c = todo!();
    /// # let mut board = IoExtensionBoard::with_default_address(i2c);
    /// board.set_pin_mode(2, PinMode::OutputPwm).unwrap();
    /// board.set_pwm_duty(2, 2048).unwrap(); // ~50%
    /// ```
    pub fn set_pwm_duty(&mut self, pin: u8, duty: u16) -> Result<(), IoExtensionError<I2C::Error>> {
        if pin > 7 {
            return Err(IoExtensionError::InvalidArgument);
        }
        if duty > PWM_DUTY_MAX {
            return Err(IoExtensionError::InvalidArgument);
        }

        let bytes = duty.to_le_bytes();
        self.write_register(&[pwm_duty_register(pin), bytes[0], bytes[1]])
    }

    /// Positions a hobby servo attached to a pin.
    ///
    /// Translates the angle into the duty value whose pulse width is
    /// `0.5 ms + angle/90 ms` within a 20 ms frame and hands it to
    /// [`set_pwm_duty`](Self::set_pwm_duty): 0° maps to a 0.5 ms pulse,
    /// 180° to 2.5 ms.
    ///
    /// The pin must be configured as [`PinMode::OutputPwm`] and the carrier
    /// left at the default 50 Hz; at any other carrier the angle scale is
    /// off, which is inherent to duty-cycle servo control.
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
    pub fn set_servo_angle(
        &mut self,
        pin: u8,
        angle: u8,
    ) -> Result<(), IoExtensionError<I2C::Error>> {
        if angle > SERVO_ANGLE_MAX {
            return Err(IoExtensionError::InvalidArgument);
        }

        self.set_pwm_duty(pin, servo_angle_to_duty(angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    extern crate std;
    use std::vec::Vec;

    const ADDR: u8 = 0x24;

    const ALL_MODES: [PinMode; 6] = [
        PinMode::InputPullUp,
        PinMode::InputPullDown,
        PinMode::InputFloating,
        PinMode::OutputDigital,
        PinMode::InputAnalog,
        PinMode::OutputPwm,
    ];

    #[test]
    fn set_pin_mode_writes_mode_byte_for_every_pin() {
        // One write of [0x01 + pin, mode] per call, in call order.
        let mut expectations = Vec::new();
        for pin in 0..8u8 {
            for mode in ALL_MODES {
                expectations.push(I2cTransaction::write(
                    ADDR,
                    [REG_IO_MODE + pin, mode as u8].to_vec(),
                ));
            }
        }

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        for pin in 0..8u8 {
            for mode in ALL_MODES {
                dev.set_pin_mode(pin, mode).unwrap();
            }
        }

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn pwm_mode_on_pin_3_targets_register_4() {
        // Pin 3 lands on IO-mode register 0x04; OutputPwm encodes as 1 << 5.
        let expectations = [I2cTransaction::write(ADDR, [0x04, 32].to_vec())];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        dev.set_pin_mode(3, PinMode::OutputPwm).unwrap();

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn set_pwm_frequency_writes_little_endian_word() {
        let expectations = [
            I2cTransaction::write(ADDR, [REG_PWM_FREQUENCY, 0x01, 0x00].to_vec()),
            I2cTransaction::write(ADDR, [REG_PWM_FREQUENCY, 0x32, 0x00].to_vec()),
            I2cTransaction::write(ADDR, [REG_PWM_FREQUENCY, 0x10, 0x27].to_vec()),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        dev.set_pwm_frequency(1).unwrap();
        dev.set_pwm_frequency(50).unwrap();
        dev.set_pwm_frequency(10_000).unwrap();

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn digital_write_encodes_level_as_byte() {
        let expectations = [
            I2cTransaction::write(ADDR, [REG_DIGITAL_VALUE + 5, 1].to_vec()),
            I2cTransaction::write(ADDR, [REG_DIGITAL_VALUE + 5, 0].to_vec()),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        dev.digital_write(5, true).unwrap();
        dev.digital_write(5, false).unwrap();

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn digital_read_returns_last_written_level() {
        // A write of 1 followed by a read of the same register coming back 1.
        let expectations = [
            I2cTransaction::write(ADDR, [REG_DIGITAL_VALUE + 2, 1].to_vec()),
            I2cTransaction::write_read(ADDR, [REG_DIGITAL_VALUE + 2].to_vec(), [1].to_vec()),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        dev.digital_write(2, true).unwrap();
        assert!(dev.digital_read(2).unwrap());

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn analog_read_decodes_little_endian() {
        // Pin 0 reads from 0x10, pin 2 from 0x14 (two bytes per pin).
        let expectations = [
            I2cTransaction::write_read(ADDR, [REG_ANALOG_VALUE].to_vec(), [0x34, 0x01].to_vec()),
            I2cTransaction::write_read(
                ADDR,
                [REG_ANALOG_VALUE + 4].to_vec(),
                [0xFF, 0x03].to_vec(),
            ),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        assert_eq!(dev.analog_read(0).unwrap(), 308);
        assert_eq!(dev.analog_read(2).unwrap(), 1023);

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn set_pwm_duty_writes_little_endian_word_per_pin() {
        let expectations = [
            I2cTransaction::write(ADDR, [REG_PWM_DUTY, 0x00, 0x08].to_vec()),
            I2cTransaction::write(ADDR, [REG_PWM_DUTY + 14, 0xFF, 0x0F].to_vec()),
            I2cTransaction::write(ADDR, [REG_PWM_DUTY + 6, 0x00, 0x00].to_vec()),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        dev.set_pwm_duty(0, 2048).unwrap();
        dev.set_pwm_duty(7, 4095).unwrap();
        dev.set_pwm_duty(3, 0).unwrap();

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn servo_angle_end_stops_map_to_expected_duties() {
        // 0° -> 0.5 ms pulse -> duty 102; 180° -> 2.5 ms -> 512; 90° -> 307.
        let expectations = [
            I2cTransaction::write(ADDR, [REG_PWM_DUTY + 2, 102, 0x00].to_vec()),
            I2cTransaction::write(ADDR, [REG_PWM_DUTY + 2, 0x00, 0x02].to_vec()),
            I2cTransaction::write(ADDR, [REG_PWM_DUTY + 2, 0x33, 0x01].to_vec()),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        dev.set_servo_angle(1, 0).unwrap();
        dev.set_servo_angle(1, 180).unwrap();
        dev.set_servo_angle(1, 90).unwrap();

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn firmware_version_reads_version_register() {
        let expectations = [I2cTransaction::write_read(
            ADDR,
            [REG_VERSION].to_vec(),
            [3].to_vec(),
        )];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        assert_eq!(dev.firmware_version().unwrap(), 3);

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn default_address_constructor_targets_0x24() {
        let expectations = [I2cTransaction::write(
            0x24,
            [REG_IO_MODE, PinMode::OutputDigital as u8].to_vec(),
        )];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::with_default_address(i2c);

        dev.set_pin_mode(0, PinMode::OutputDigital).unwrap();

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn out_of_range_pin_is_rejected_without_bus_traffic() {
        // Empty expectation list: any transaction would fail the mock.
        let i2c = I2cMock::new(&[]);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        assert!(matches!(
            dev.set_pin_mode(8, PinMode::OutputDigital),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.digital_write(8, true),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.digital_read(9),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.analog_read(255),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_pwm_duty(9, 0),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_servo_angle(8, 90),
            Err(IoExtensionError::InvalidArgument)
        ));

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn out_of_range_values_are_rejected_without_bus_traffic() {
        let i2c = I2cMock::new(&[]);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        assert!(matches!(
            dev.set_pwm_duty(0, 4096),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_pwm_duty(0, 5000),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_pwm_frequency(0),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_pwm_frequency(10_001),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_servo_angle(0, 181),
            Err(IoExtensionError::InvalidArgument)
        ));
        assert!(matches!(
            dev.set_servo_angle(0, 200),
            Err(IoExtensionError::InvalidArgument)
        ));

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn bus_errors_surface_unchanged() {
        use embedded_hal::i2c::ErrorKind;

        let expectations = [
            I2cTransaction::write(ADDR, [REG_DIGITAL_VALUE, 1].to_vec())
                .with_error(ErrorKind::Other),
            I2cTransaction::write_read(ADDR, [REG_VERSION].to_vec(), [0].to_vec())
                .with_error(ErrorKind::Other),
        ];

        let i2c = I2cMock::new(&expectations);
        let mut dev = IoExtensionBoard::new(i2c, ADDR);

        assert!(matches!(
            dev.digital_write(0, true),
            Err(IoExtensionError::WriteError(ErrorKind::Other))
        ));
        assert!(matches!(
            dev.firmware_version(),
            Err(IoExtensionError::ReadError(ErrorKind::Other))
        ));

        let mut i2c = dev.destroy();
        i2c.done();
    }

    #[test]
    fn per_pin_register_addressing() {
        assert_eq!(io_mode_register(0), 0x01);
        assert_eq!(io_mode_register(7), 0x08);
        assert_eq!(digital_value_register(0), 0x40);
        assert_eq!(digital_value_register(7), 0x47);
        assert_eq!(analog_value_register(0), 0x10);
        assert_eq!(analog_value_register(3), 0x16);
        assert_eq!(analog_value_register(7), 0x1E);
        assert_eq!(pwm_duty_register(0), 0x50);
        assert_eq!(pwm_duty_register(7), 0x5E);
    }

    #[test]
    fn servo_duty_rounds_to_nearest() {
        assert_eq!(servo_angle_to_duty(0), 102);
        assert_eq!(servo_angle_to_duty(15), 137); // exact half rounds up
        assert_eq!(servo_angle_to_duty(90), 307);
        assert_eq!(servo_angle_to_duty(180), 512);
    }

    #[test]
    fn pin_mode_wire_encoding_is_one_distinct_bit_each() {
        let mut seen = 0u8;
        for mode in ALL_MODES {
            let bits = u8::from(mode);
            assert_eq!(bits.count_ones(), 1);
            assert_eq!(seen & bits, 0);
            seen |= bits;
        }
        assert_eq!(seen, 0b0011_1111);
    }
}
