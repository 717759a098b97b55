use thiserror::Error;

use crate::clock::Microseconds;
use crate::timing::BIT_HIGH_THRESHOLD;

/// Number of bytes in one transmission: humidity, humidity tenths, temperature, temperature tenths, checksum.
pub const FRAME_BYTES: usize = 5;
/// Number of pulses the sensor sends after the handshake.
pub const FRAME_BITS: usize = FRAME_BYTES * 8;

/// A valid reading from the DHT11 sensor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent.
    pub humidity: f32,
}

/// The transmitted checksum byte does not match the sum of the data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("checksum mismatch: transmitted {expected:#04x}, calculated {calculated:#04x}")]
pub struct ChecksumMismatch {
    pub expected: u8,
    pub calculated: u8,
}

/// Map the measured duration of a high pulse to the bit it encodes.
///
/// Exactly the threshold still counts as 0.
#[inline]
pub fn classify(high: Microseconds) -> bool {
    high > BIT_HIGH_THRESHOLD
}

/// The five raw bytes of one transmission, in order of arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Frame([u8; FRAME_BYTES]);

impl Frame {
    pub fn new(bytes: [u8; FRAME_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn bytes(&self) -> &[u8; FRAME_BYTES] {
        &self.0
    }

    /// Shift in the next bit, most significant bit of each byte first.
    pub(crate) fn push_bit(&mut self, index: usize, bit: bool) {
        let byte = &mut self.0[index / 8];
        *byte = (*byte << 1) | u8::from(bit);
    }

    /// Low byte of the sum of the four data bytes.
    pub fn calculated_checksum(&self) -> u8 {
        self.0[..4].iter().fold(0u8, |sum, byte| sum.wrapping_add(*byte))
    }

    /// Validate the checksum and decode the reading.
    /// Both values are an integral byte plus a byte of tenths.
    pub fn decode(&self) -> Result<SensorReading, ChecksumMismatch> {
        let [humidity, humidity_tenths, temperature, temperature_tenths, expected] = self.0;
        let calculated = self.calculated_checksum();
        if calculated != expected {
            return Err(ChecksumMismatch {
                expected,
                calculated,
            });
        }
        Ok(SensorReading {
            temperature: f32::from(temperature) + f32::from(temperature_tenths) * 0.1,
            humidity: f32::from(humidity) + f32::from(humidity_tenths) * 0.1,
        })
    }
}
