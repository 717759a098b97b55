//! Protocol timing for the DHT11 single-wire exchange.
//!
//! The values are tuned against the sensor and a 1 MHz counter; keep them as they are.

use crate::clock::{Microseconds, Milliseconds};

/// How long the line is held low to request a reading (datasheet minimum is 18 ms).
pub const START_PULLDOWN: Milliseconds = Milliseconds(20);

/// Ceiling for each edge of the sensor's low/high acknowledgement.
pub const RESPONSE_TIMEOUT: Microseconds = Microseconds(100);

/// Ceiling for each of the three phases of a single data bit.
pub const BIT_WINDOW_TIMEOUT: Microseconds = Microseconds(120);

/// High pulses longer than this encode a 1. A 0 is ~28us, a 1 is ~70us.
pub const BIT_HIGH_THRESHOLD: Microseconds = Microseconds(45);

/// Default spacing between two reading requests.
pub const DEFAULT_SAMPLE_INTERVAL: Milliseconds = Milliseconds(2000);
