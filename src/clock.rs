use core::fmt;

/// Represents a number of microseconds.
/// Simple Newtype to attach meaning to the contained primitive.
/// `core::time::Duration` could also be used here, but it is a much larger type in order to accomodate much
/// bigger time spans, which may impact performance, code size and stack usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Microseconds(pub u32);

/// Represents a number of milliseconds, as counted by the coarse system tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Milliseconds(pub u32);

impl fmt::Display for Microseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

impl fmt::Display for Milliseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Source of time for the driver: a fine free-running microsecond counter and a coarse millisecond tick.
///
/// Both counters are allowed to wrap at any point, including in the middle of a reading.
pub trait Clock {
    /// Width of the microsecond counter register in bits.
    /// A 16 bit hardware timer running at 1 MHz wraps every 65.5 ms and must set this to 16.
    const MICROS_BITS: u32 = 32;

    /// Current value of the microsecond counter.
    fn now_micros(&self) -> Microseconds;

    /// Current value of the millisecond tick.
    fn now_millis(&self) -> Milliseconds;

    /// Microseconds elapsed since `start`, which must be an earlier reading of [`Clock::now_micros`].
    fn micros_since(&self, start: Microseconds) -> Microseconds {
        Microseconds(wrapping_elapsed(
            self.now_micros().0,
            start.0,
            Self::MICROS_BITS,
        ))
    }

    /// Milliseconds elapsed since `start`, which must be an earlier reading of [`Clock::now_millis`].
    fn millis_since(&self, start: Milliseconds) -> Milliseconds {
        Milliseconds(self.now_millis().0.wrapping_sub(start.0))
    }
}

// Using wrapping arithmetic on unsigned integers, overflow of the timer can be
// exploited to count over the whole representable range of the register regardless of initial value.
// For example for an 8 bit register:
// (10 - 230) & 0xFF = 36
fn wrapping_elapsed(now: u32, start: u32, bits: u32) -> u32 {
    let mask = if bits >= u32::BITS {
        u32::MAX
    } else {
        (1 << bits) - 1
    };
    now.wrapping_sub(start) & mask
}

/// Why a [`Waiter::wait_for`] gave up.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WaitError<E> {
    /// The condition did not become true within the timeout.
    Timeout(Microseconds),
    /// The condition itself failed.
    Line(E),
}

/// Busy-waits on a condition against a [`Clock`].
pub(crate) struct Waiter<'clock, C>
where
    C: Clock,
{
    clock: &'clock C,
}

impl<'clock, C> Waiter<'clock, C>
where
    C: Clock,
{
    pub(crate) fn new(clock: &'clock C) -> Self {
        Self { clock }
    }

    /// Poll `condition` until it holds, returning the time it took.
    ///
    /// The elapsed time is sampled before the condition on every iteration,
    /// so the returned duration never includes the final poll.
    /// Gives up once more than `timeout` has passed.
    #[inline(always)]
    pub(crate) fn wait_for<E>(
        &self,
        mut condition: impl FnMut() -> Result<bool, E>,
        timeout: Microseconds,
    ) -> Result<Microseconds, WaitError<E>> {
        let start = self.clock.now_micros();
        loop {
            let since_start = self.clock.micros_since(start);
            if condition().map_err(WaitError::Line)? {
                return Ok(since_start);
            }
            if since_start > timeout {
                return Err(WaitError::Timeout(since_start));
            }
        }
    }
}
