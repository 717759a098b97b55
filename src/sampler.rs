use core::fmt::Debug;

use crate::climate::TemperatureSink;
use crate::clock::{Clock, Milliseconds};
use crate::driver::Dht11;
use crate::frame::SensorReading;
use crate::line::DataLine;
use crate::timing::DEFAULT_SAMPLE_INTERVAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Time between two reading requests. The DHT11 needs at least one second between reads.
    pub interval: Milliseconds,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SAMPLE_INTERVAL,
        }
    }
}

/// Drives a [`Dht11`] from the main loop: requests readings at a fixed cadence
/// and hands fresh temperatures to a [`TemperatureSink`].
///
/// A failed reading is not retried early, the next one is simply requested on schedule.
pub struct Sampler<Line, Clk>
where
    Line: DataLine,
    Clk: Clock,
{
    sensor: Dht11<Line, Clk>,
    config: SamplerConfig,
    last_request: Milliseconds,
}

impl<Line, Clk> Sampler<Line, Clk>
where
    Line: DataLine,
    <Line as DataLine>::Error: Debug,
    Clk: Clock,
{
    /// The first request is due one interval from now, which doubles as the sensor's power-up settling time.
    pub fn new(sensor: Dht11<Line, Clk>, config: SamplerConfig) -> Self {
        let last_request = sensor.clock().now_millis();
        Self {
            sensor,
            config,
            last_request,
        }
    }

    pub fn sensor(&self) -> &Dht11<Line, Clk> {
        &self.sensor
    }

    pub fn into_sensor(self) -> Dht11<Line, Clk> {
        self.sensor
    }

    /// One iteration of the main loop.
    pub fn poll(&mut self, sink: &mut impl TemperatureSink) -> Option<SensorReading> {
        if self.sensor.clock().millis_since(self.last_request) >= self.config.interval
            && self.sensor.start_reading()
        {
            self.last_request = self.sensor.clock().now_millis();
        }
        self.sensor.process();
        let reading = self.sensor.get_new_data()?;
        sink.set_temperature(reading.temperature);
        Some(reading)
    }
}
