mod common;

use common::{frame_response, Bus, SimClock, SimLine};
use dht11_acquisition::{
    ClimateController, Dht11, FanLevel, Milliseconds, Sampler, SamplerConfig, State,
    TemperatureSink,
};

#[derive(Default)]
struct Recorder(Vec<f32>);

impl TemperatureSink for Recorder {
    fn set_temperature(&mut self, celsius: f32) {
        self.0.push(celsius);
    }
}

fn sampler(bus: &std::rc::Rc<Bus>, interval_ms: u32) -> Sampler<SimLine, SimClock<32>> {
    let sensor = Dht11::new(SimLine(bus.clone()), SimClock(bus.clone())).unwrap();
    Sampler::new(
        sensor,
        SamplerConfig {
            interval: Milliseconds(interval_ms),
        },
    )
}

#[test]
fn default_interval_is_two_seconds() {
    assert_eq!(SamplerConfig::default().interval, Milliseconds(2000));
}

#[test]
fn first_request_waits_one_interval() {
    let bus = Bus::starting_at(0);
    bus.respond_with(frame_response([0x32, 0x00, 0x18, 0x05, 0x4F]));
    let mut sampler = sampler(&bus, 25);
    let mut sink = Recorder::default();

    while bus.now() < 24_000 {
        assert_eq!(sampler.poll(&mut sink), None);
    }
    assert_eq!(sampler.sensor().state(), State::Idle);
    assert_eq!(bus.requests(), 0);
}

#[test]
fn requests_follow_the_interval_and_feed_the_sink() {
    let bus = Bus::starting_at(0);
    bus.respond_with(frame_response([0x32, 0x00, 0x18, 0x05, 0x4F]));
    let mut sampler = sampler(&bus, 25);
    let mut sink = Recorder::default();

    let mut returned = 0;
    // requests at 25, 50, 75 and 100ms, each done about 24ms later
    while bus.now() < 110_000 {
        if let Some(reading) = sampler.poll(&mut sink) {
            assert_eq!(reading.humidity, 50.0);
            returned += 1;
        }
    }
    assert_eq!(bus.requests(), 4);
    assert_eq!(returned, 3);
    assert_eq!(sink.0, [24.5, 24.5, 24.5]);
}

#[test]
fn failing_sensor_is_retried_on_schedule_only() {
    let bus = Bus::starting_at(0);
    let mut sampler = sampler(&bus, 25);
    let mut sink = Recorder::default();

    while bus.now() < 110_000 {
        assert_eq!(sampler.poll(&mut sink), None);
    }
    assert_eq!(bus.requests(), 4);
    assert!(sink.0.is_empty());
}

#[test]
fn readings_reach_the_fan_policy() {
    let bus = Bus::starting_at(0);
    // humidity 40.0, temperature 29.0
    bus.respond_with(frame_response([0x28, 0x00, 0x1D, 0x00, 0x45]));
    let mut sampler = sampler(&bus, 25);
    let mut climate = ClimateController::new();

    while sampler.poll(&mut climate).is_none() {
        assert!(bus.now() < 100_000, "no reading published");
    }
    assert_eq!(climate.temperature(), 29.0);
    assert_eq!(climate.fan_level(), FanLevel::Medium);
}
