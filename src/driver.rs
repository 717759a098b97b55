use core::fmt::Debug;

use embedded_hal::digital::PinState;

use crate::capture::capture_frame;
use crate::clock::{Clock, Microseconds, Milliseconds};
use crate::error::AcquisitionError;
use crate::frame::SensorReading;
use crate::line::{DataLine, Direction};
use crate::timing::{RESPONSE_TIMEOUT, START_PULLDOWN};

#[cfg(feature = "critical-section")]
use critical_section::with;
#[cfg(not(feature = "critical-section"))]
fn with<R>(f: impl FnOnce(()) -> R) -> R {
    f(())
}

/// Where the driver is in the request/response exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No reading in progress.
    Idle,
    /// The line is held low to wake the sensor.
    StartPulldown { since: Milliseconds },
    /// Line released, waiting for the sensor to pull it low.
    WaitResponseLow { since: Microseconds },
    /// Waiting for the sensor to release its acknowledgement.
    WaitResponseHigh { since: Microseconds },
    /// Handshake done, the next [`Dht11::process`] captures the data bits.
    ReadBits,
}

/// Represents a DHT11 sensor connected to a line, read by polling.
///
/// Readings are started with [`Dht11::start_reading`] and advanced by calling [`Dht11::process`]
/// from the main loop. Only the capture of the data bits blocks, for at most ~5ms.
pub struct Dht11<Line, Clk>
where
    Line: DataLine,
    Clk: Clock,
{
    line: Line,
    clock: Clk,
    state: State,
    // Some(_) is the ready flag
    fresh: Option<SensorReading>,
}

impl<Line, Clk> Dht11<Line, Clk>
where
    Line: DataLine,
    <Line as DataLine>::Error: Debug,
    Clk: Clock,
{
    /// Take ownership of the line and release it, which is the idle state of the sensor.
    pub fn new(mut line: Line, clock: Clk) -> Result<Self, Line::Error> {
        line.set_direction(Direction::Input)?;
        Ok(Self {
            line,
            clock,
            state: State::Idle,
            fresh: None,
        })
    }

    /// Give back the line and the clock.
    pub fn free(self) -> (Line, Clk) {
        (self.line, self.clock)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn clock(&self) -> &Clk {
        &self.clock
    }

    /// Request a new reading. Never blocks.
    ///
    /// Fails with [`AcquisitionError::Busy`] unless the driver is idle.
    /// Any reading not yet collected with [`Dht11::get_new_data`] is dropped.
    pub fn try_start_reading(&mut self) -> Result<(), AcquisitionError<Line::Error>> {
        if self.state != State::Idle {
            return Err(AcquisitionError::Busy);
        }
        if let Err(err) = self.line.set_direction(Direction::Output) {
            self.reset_to_idle();
            return Err(AcquisitionError::Line(err));
        }
        self.state = State::StartPulldown {
            since: self.clock.now_millis(),
        };
        self.fresh = None;
        log::debug!("reading started");
        Ok(())
    }

    /// Like [`Dht11::try_start_reading`], returning whether the request was accepted.
    pub fn start_reading(&mut self) -> bool {
        match self.try_start_reading() {
            Ok(()) => true,
            Err(err) => {
                log::debug!("reading not started: {err:?}");
                false
            }
        }
    }

    /// Advance the exchange by at most one step. Call this continuously from the main loop.
    ///
    /// Failed attempts are dropped silently and the driver returns to [`State::Idle`].
    pub fn process(&mut self) {
        if let Err(err) = self.step() {
            log::debug!("reading abandoned: {err:?}");
            // the capture phase has already cleaned up after itself
            if self.state != State::Idle {
                self.reset_to_idle();
            }
        }
    }

    pub fn is_data_ready(&self) -> bool {
        self.fresh.is_some()
    }

    /// Collect the latest reading. Each reading is handed out at most once.
    pub fn get_new_data(&mut self) -> Option<SensorReading> {
        self.fresh.take()
    }

    fn step(&mut self) -> Result<(), AcquisitionError<Line::Error>> {
        match self.state {
            State::Idle => {}
            State::StartPulldown { since } => {
                if self.clock.millis_since(since) >= START_PULLDOWN {
                    self.line
                        .set_direction(Direction::Input)
                        .map_err(AcquisitionError::Line)?;
                    self.state = State::WaitResponseLow {
                        since: self.clock.now_micros(),
                    };
                }
            }
            State::WaitResponseLow { since } => {
                let elapsed = self.clock.micros_since(since);
                if self.line.is_low().map_err(AcquisitionError::Line)? {
                    self.state = State::WaitResponseHigh {
                        since: self.clock.now_micros(),
                    };
                } else if elapsed > RESPONSE_TIMEOUT {
                    return Err(AcquisitionError::Handshake(PinState::Low));
                }
            }
            State::WaitResponseHigh { since } => {
                let elapsed = self.clock.micros_since(since);
                if self.line.is_high().map_err(AcquisitionError::Line)? {
                    self.state = State::ReadBits;
                } else if elapsed > RESPONSE_TIMEOUT {
                    return Err(AcquisitionError::Handshake(PinState::High));
                }
            }
            State::ReadBits => self.read_bits()?,
        }
        Ok(())
    }

    /// Single shot: whatever the outcome, the driver is idle afterwards.
    fn read_bits(&mut self) -> Result<(), AcquisitionError<Line::Error>> {
        let mut driver = scopeguard::guard(self, |driver| driver.reset_to_idle());
        let driver: &mut Self = &mut driver;
        let (line, clock) = (&mut driver.line, &driver.clock);
        // Disable interrupts while sampling so they don't mess up the timings
        let frame = with(|_cs| capture_frame(line, clock))?;
        let reading = frame.decode()?;
        log::trace!(
            "published {} C, {} %RH",
            reading.temperature,
            reading.humidity
        );
        driver.fresh = Some(reading);
        Ok(())
    }

    fn reset_to_idle(&mut self) {
        self.state = State::Idle;
        // Releasing keeps the line pulled up, the idle level of the sensor
        if let Err(err) = self.line.set_direction(Direction::Input) {
            log::warn!("failed to release the data line: {err:?}");
        }
    }
}
