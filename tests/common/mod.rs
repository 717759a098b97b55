//! A simulated DHT11 on a simulated bus.
//!
//! Time only moves when the clock is read, one microsecond per read, so every poll of the
//! driver costs one microsecond. The sensor answers a release of the line that followed at
//! least 18ms of pulldown by replaying a scripted list of (level, duration) segments.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use dht11_acquisition::{Clock, DataLine, Direction, Microseconds, Milliseconds};

const MIN_PULLDOWN_US: u32 = 18_000;

pub const ZERO_WIDTH_US: u32 = 26;
pub const ONE_WIDTH_US: u32 = 70;

#[derive(Default)]
pub struct Bus {
    now: Cell<u32>,
    driven_since: Cell<Option<u32>>,
    released_at: Cell<Option<u32>>,
    responding: Cell<bool>,
    response: RefCell<Vec<(bool, u32)>>,
    requests: Cell<u32>,
}

impl Bus {
    pub fn starting_at(now: u32) -> Rc<Self> {
        let bus = Self::default();
        bus.now.set(now);
        Rc::new(bus)
    }

    /// Script the sensor's answer to every following request.
    pub fn respond_with(&self, segments: Vec<(bool, u32)>) {
        *self.response.borrow_mut() = segments;
    }

    pub fn now(&self) -> u32 {
        self.now.get()
    }

    /// Number of times the line was pulled low.
    pub fn requests(&self) -> u32 {
        self.requests.get()
    }

    pub fn is_driven(&self) -> bool {
        self.driven_since.get().is_some()
    }

    fn tick(&self) -> u32 {
        let now = self.now.get();
        self.now.set(now.wrapping_add(1));
        now
    }

    fn level(&self) -> bool {
        if self.driven_since.get().is_some() {
            return false;
        }
        let Some(released_at) = self.released_at.get() else {
            return true;
        };
        if !self.responding.get() {
            return true;
        }
        let mut offset = self.now.get().wrapping_sub(released_at);
        for &(level, duration) in self.response.borrow().iter() {
            if offset < duration {
                return level;
            }
            offset -= duration;
        }
        // pull-up once the sensor lets go
        true
    }
}

pub struct SimLine(pub Rc<Bus>);

impl DataLine for SimLine {
    type Error = Infallible;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Infallible> {
        let bus = &self.0;
        match direction {
            Direction::Output => {
                if bus.driven_since.get().is_none() {
                    bus.driven_since.set(Some(bus.now()));
                    bus.released_at.set(None);
                    bus.requests.set(bus.requests.get() + 1);
                }
            }
            Direction::Input => {
                if let Some(since) = bus.driven_since.take() {
                    bus.released_at.set(Some(bus.now()));
                    bus.responding
                        .set(bus.now().wrapping_sub(since) >= MIN_PULLDOWN_US);
                }
            }
        }
        Ok(())
    }

    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.level())
    }
}

/// Microsecond counter `BITS` wide, millisecond tick derived from the same time base.
pub struct SimClock<const BITS: u32>(pub Rc<Bus>);

impl<const BITS: u32> Clock for SimClock<BITS> {
    const MICROS_BITS: u32 = BITS;

    fn now_micros(&self) -> Microseconds {
        let mask = ((1u64 << BITS) - 1) as u32;
        Microseconds(self.0.tick() & mask)
    }

    fn now_millis(&self) -> Milliseconds {
        Milliseconds(self.0.tick() / 1000)
    }
}

/// Handshake, the 40 data bits of `bytes` and the closing low pulse.
pub fn frame_response(bytes: [u8; 5]) -> Vec<(bool, u32)> {
    let mut segments = vec![(true, 30), (false, 80), (true, 80)];
    for byte in bytes {
        for shift in (0..8).rev() {
            let width = if (byte >> shift) & 1 == 1 {
                ONE_WIDTH_US
            } else {
                ZERO_WIDTH_US
            };
            segments.extend([(false, 50), (true, width)]);
        }
    }
    segments.push((false, 50));
    segments
}

/// Index of the high segment carrying data bit `bit` in a [`frame_response`].
pub fn data_segment(bit: usize) -> usize {
    3 + 2 * bit + 1
}
