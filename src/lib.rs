#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

mod capture;
pub mod climate;
pub mod clock;
mod driver;
mod error;
pub mod frame;
pub mod line;
mod sampler;
pub mod timing;

pub use climate::{ClimateController, FanLevel, TemperatureSink};
pub use clock::{Clock, Microseconds, Milliseconds};
pub use driver::{Dht11, State};
pub use error::{AcquisitionError, BitPhase};
pub use frame::{Frame, SensorReading};
pub use line::{DataLine, Direction, OpenDrainLine};
pub use sampler::{Sampler, SamplerConfig};
