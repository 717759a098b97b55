use embedded_hal::digital::PinState;
use thiserror::Error;

use crate::clock::Microseconds;
use crate::frame::ChecksumMismatch;

/// The three phases of a single data bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitPhase {
    /// Waiting for the falling edge that starts the ~50us low sync pulse.
    SyncLow,
    /// Waiting for the rising edge at the end of the sync pulse.
    DataHigh,
    /// Measuring how long the data pulse stays high.
    DataWidth,
}

#[derive(Debug, Error)]
pub enum AcquisitionError<DeviceError> {
    /// A reading was requested while another one is still in progress.
    #[error("A reading is already in progress")]
    Busy,
    /// The sensor did not acknowledge the request by reaching the given level within 100us.
    #[error("Handshake failed waiting for the line to go {0:?}")]
    Handshake(PinState),
    /// One of the 40 bit windows exceeded 120us.
    #[error("Timeout in bit {bit} during {phase:?} after {elapsed}")]
    BitTimeout {
        bit: u8,
        phase: BitPhase,
        elapsed: Microseconds,
    },
    #[error(transparent)]
    Checksum(#[from] ChecksumMismatch),
    /// Switching or reading the data line failed.
    #[error("DeviceError: {0:?}")]
    Line(DeviceError),
}
