//! HS300x humidity/temperature sensor support.
//!
//! The part has no register map: a single zero-byte write wakes it and starts
//! a conversion, and a four-byte read returns the latest sample once the
//! conversion has had time to settle. Both halves go through the blocking
//! [`Driver`](crate::bus::transaction::Driver).
//!
//! Decoding follows the datasheet: each channel is a 14-bit code inside two
//! bytes, with the remaining two bits carrying status. Humidity spans
//! 0..100 %RH across the code space; temperature spans -40..125 °C with a
//! 165-degree slope and a 40-degree offset. Values are kept as centi-unit
//! fixed point split into integer and decimal parts.

use crate::bus::BusController;
use crate::bus::error::Error;
use crate::bus::transaction::Driver;
use crate::time::DelayMs;

/// Fixed 7-bit bus address of the HS300x.
pub const SLAVE_ADDRESS: u8 = 0x44;

/// Command byte that wakes the sensor and starts a conversion.
pub const START_MEASUREMENT_COMMAND: u8 = 0x00;

/// Conversion settling time between start and retrieval, in milliseconds.
pub const STABILIZATION_DELAY_MS: u32 = 40;

/// Top two bits of the first humidity byte are status, not data.
const HUMIDITY_STATUS_MASK: u8 = 0x3f;
/// Bottom two bits of the second temperature byte are status, not data.
const TEMPERATURE_STATUS_MASK: u8 = 0xfc;
/// Full-scale value of a 14-bit channel code.
const FULL_SCALE: i32 = 16383;

/// One raw four-byte sample as read from the peripheral.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct RawSample {
    /// Humidity code, most significant byte first.
    pub humidity: [u8; 2],
    /// Temperature code, most significant byte first.
    pub temperature: [u8; 2],
}

/// A centi-unit fixed-point value: `integer_part + decimal_part / 100`.
///
/// For non-negative values `decimal_part` is in `[0, 99]`. Negative values
/// carry the sign in both parts (truncating division semantics), so -39.5 °C
/// is `(-39, -50)`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct FixedPoint {
    /// Whole units.
    pub integer_part: i16,
    /// Hundredths of a unit.
    pub decimal_part: i16,
}

impl FixedPoint {
    /// Recombine the parts into a floating-point scalar.
    pub fn to_f32(self) -> f32 {
        f32::from(self.integer_part) + f32::from(self.decimal_part) / 100.0
    }
}

/// One decoded sensor sample in engineering units.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Reading {
    /// Relative humidity, %RH.
    pub humidity: FixedPoint,
    /// Temperature, °C.
    pub temperature: FixedPoint,
}

impl Reading {
    /// Temperature as a floating-point scalar in °C.
    pub fn temperature_celsius(&self) -> f32 {
        self.temperature.to_f32()
    }

    /// Relative humidity as a floating-point scalar in %RH.
    pub fn humidity_percent(&self) -> f32 {
        self.humidity.to_f32()
    }
}

/// Decode a raw sample into engineering units.
///
/// Pure and total: every 16-bit code pair decodes to some reading, status
/// bits are masked off rather than validated.
pub fn convert(raw: &RawSample) -> Reading {
    let code = u16::from(raw.humidity[0] & HUMIDITY_STATUS_MASK) << 8 | u16::from(raw.humidity[1]);
    let scaled = i32::from(code) * 100 * 100 / FULL_SCALE;
    let humidity = split_centi(scaled);

    let code =
        (u16::from(raw.temperature[0]) << 8 | u16::from(raw.temperature[1] & TEMPERATURE_STATUS_MASK)) >> 2;
    let scaled = i32::from(code) * 165 * 100 / FULL_SCALE - 40 * 100;
    let temperature = split_centi(scaled);

    Reading {
        humidity,
        temperature,
    }
}

fn split_centi(scaled: i32) -> FixedPoint {
    FixedPoint {
        integer_part: (scaled / 100) as i16,
        decimal_part: (scaled % 100) as i16,
    }
}

/// Acquisition sequencer for one HS300x on the bus.
///
/// Wraps the transaction driver and owns the measurement choreography. Not
/// reentrant; one sequencer is the sole user of its bus binding.
pub struct Hs300x<'a, C, D> {
    driver: Driver<'a, C, D>,
}

impl<'a, C: BusController, D: DelayMs> Hs300x<'a, C, D> {
    /// Take ownership of a transaction driver bound to the sensor's address.
    pub fn new(driver: Driver<'a, C, D>) -> Self {
        Self { driver }
    }

    /// Open the bus binding. Required before the first acquisition and after
    /// any failed one.
    pub fn initialize(&mut self) -> Result<(), Error> {
        self.driver.initialize()
    }

    /// Wake the sensor and start a conversion.
    pub fn start_measurement(&mut self) -> Result<(), Error> {
        self.driver.write_command(&[START_MEASUREMENT_COMMAND])
    }

    /// Read the four sample bytes.
    ///
    /// The caller is responsible for having waited out
    /// [`STABILIZATION_DELAY_MS`] since the start command; this method does
    /// not pause.
    pub fn retrieve_raw_sample(&mut self) -> Result<RawSample, Error> {
        let mut rx = [0u8; 4];
        self.driver.read_bytes(&mut rx)?;
        Ok(RawSample {
            humidity: [rx[0], rx[1]],
            temperature: [rx[2], rx[3]],
        })
    }

    /// Run one full acquisition: start, settle, retrieve, decode.
    pub fn acquire(&mut self) -> Result<Reading, Error> {
        self.start_measurement()?;
        self.driver.pause_ms(STABILIZATION_DELAY_MS);
        let raw = self.retrieve_raw_sample()?;
        Ok(convert(&raw))
    }
}
