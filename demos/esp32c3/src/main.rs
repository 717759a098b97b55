use dht11_acquisition::{
    ClimateController, DataLine, Dht11, Direction, Microseconds, Milliseconds, Sampler,
    SamplerConfig, State,
};
use esp_idf_hal::{
    delay::FreeRtos,
    gpio::{InputOutput, PinDriver},
    peripherals::Peripherals,
    sys::EspError,
};
use esp_idf_svc::{log::EspLogger, timer::EspTaskTimerService};

/// The sensor's data pin in open-drain mode, relying on the module's pull-up.
struct Line<'pin, P: esp_idf_hal::gpio::Pin>(PinDriver<'pin, P, InputOutput>);

impl<'a, P> DataLine for Line<'a, P>
where
    P: esp_idf_hal::gpio::IOPin,
{
    type Error = EspError;

    fn set_direction(&mut self, direction: Direction) -> Result<(), EspError> {
        match direction {
            Direction::Output => self.0.set_low(),
            Direction::Input => self.0.set_high(),
        }
    }

    fn is_high(&mut self) -> Result<bool, EspError> {
        Ok(self.0.is_high())
    }
}

/// The 64 bit esp_timer counts microseconds since boot, truncating it keeps a 32 bit wrapping counter.
struct Clock(EspTaskTimerService);

impl dht11_acquisition::Clock for Clock {
    fn now_micros(&self) -> Microseconds {
        Microseconds(self.0.now().as_micros() as u32)
    }

    fn now_millis(&self) -> Milliseconds {
        Milliseconds(self.0.now().as_millis() as u32)
    }
}

fn main() -> Result<(), EspError> {
    esp_idf_sys::link_patches();
    EspLogger::initialize_default();

    let peripherals = Peripherals::take()?;
    let line = Line(PinDriver::input_output_od(peripherals.pins.gpio2)?);
    let clock = Clock(EspTaskTimerService::new()?);
    let sensor = Dht11::new(line, clock)?;
    let mut sampler = Sampler::new(sensor, SamplerConfig::default());
    let mut climate = ClimateController::new();

    loop {
        let fan = climate.fan_level();
        if let Some(reading) = sampler.poll(&mut climate) {
            log::info!(
                "Humidity: {}, Temperature: {}",
                reading.humidity,
                reading.temperature
            );
        }
        if climate.fan_level() != fan {
            log::info!("Fan level now {:?}", climate.fan_level());
        }
        // The handshake windows are ~100us, only yield to the scheduler between readings
        if sampler.sensor().state() == State::Idle {
            FreeRtos::delay_ms(10);
        }
    }
}
