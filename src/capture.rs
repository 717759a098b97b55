//! The blocking part of a reading: sampling the 40 data pulses.
//!
//! Each bit starts with ~50us low and then ~28us high for a 0 or ~70us high for a 1.
//! Capturing pulse by pulse from the polled state machine proved unreliable at this granularity,
//! so the whole train is read in one go. Worst case is 40 bits of 120us windows, about 4.8ms.

use crate::clock::{Clock, Microseconds, WaitError, Waiter};
use crate::error::{AcquisitionError, BitPhase};
use crate::frame::{classify, Frame, FRAME_BITS};
use crate::line::DataLine;
use crate::timing::BIT_WINDOW_TIMEOUT;

/// Read all 40 bits following a successful handshake.
///
/// Expects the line to be released and high (the sensor's ~80us ready pulse).
/// The checksum is not validated here.
pub(crate) fn capture_frame<L, C>(
    line: &mut L,
    clock: &C,
) -> Result<Frame, AcquisitionError<L::Error>>
where
    L: DataLine,
    C: Clock,
{
    let waiter = Waiter::new(clock);
    let mut frame = Frame::default();
    for index in 0..FRAME_BITS {
        let high = read_bit(line, &waiter).map_err(|(phase, err)| match err {
            WaitError::Timeout(elapsed) => AcquisitionError::BitTimeout {
                // FRAME_BITS fits into a byte
                bit: index as u8,
                phase,
                elapsed,
            },
            WaitError::Line(err) => AcquisitionError::Line(err),
        })?;
        frame.push_bit(index, classify(high));
    }
    Ok(frame)
}

/// Follow one bit through its three phases and return how long the data pulse stayed high.
fn read_bit<L, C>(
    line: &mut L,
    waiter: &Waiter<'_, C>,
) -> Result<Microseconds, (BitPhase, WaitError<L::Error>)>
where
    L: DataLine,
    C: Clock,
{
    waiter
        .wait_for(|| line.is_low(), BIT_WINDOW_TIMEOUT)
        .map_err(|err| (BitPhase::SyncLow, err))?;
    waiter
        .wait_for(|| line.is_high(), BIT_WINDOW_TIMEOUT)
        .map_err(|err| (BitPhase::DataHigh, err))?;
    waiter
        .wait_for(|| line.is_low(), BIT_WINDOW_TIMEOUT)
        .map_err(|err| (BitPhase::DataWidth, err))
}
