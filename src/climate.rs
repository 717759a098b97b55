//! Fan policy of the room controller, the consumer of the temperature readings.

/// Receives fresh temperatures from the sampler.
pub trait TemperatureSink {
    fn set_temperature(&mut self, celsius: f32);
}

/// Temperatures below this keep the fan off.
pub const FAN_LOW_FROM: f32 = 25.0;
pub const FAN_MEDIUM_FROM: f32 = 28.0;
pub const FAN_HIGH_FROM: f32 = 31.0;

/// Changes smaller than or equal to this are ignored.
pub const HYSTERESIS: f32 = 0.5;

/// Room temperature assumed before the first reading arrives.
pub const INITIAL_TEMPERATURE: f32 = 22.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FanLevel {
    #[default]
    Off,
    Low,
    Medium,
    High,
}

impl FanLevel {
    pub fn for_temperature(celsius: f32) -> Self {
        if celsius < FAN_LOW_FROM {
            FanLevel::Off
        } else if celsius < FAN_MEDIUM_FROM {
            FanLevel::Low
        } else if celsius < FAN_HIGH_FROM {
            FanLevel::Medium
        } else {
            FanLevel::High
        }
    }
}

/// Tracks the room temperature and picks the fan level, unless a level was forced by hand.
#[derive(Debug, Clone)]
pub struct ClimateController {
    temperature: f32,
    fan: FanLevel,
    manual: bool,
}

impl Default for ClimateController {
    fn default() -> Self {
        Self::new()
    }
}

impl ClimateController {
    pub fn new() -> Self {
        Self {
            temperature: INITIAL_TEMPERATURE,
            fan: FanLevel::for_temperature(INITIAL_TEMPERATURE),
            manual: false,
        }
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn fan_level(&self) -> FanLevel {
        self.fan
    }

    pub fn is_manual(&self) -> bool {
        self.manual
    }

    /// Pin the fan to `level` until [`ClimateController::resume_automatic`] is called.
    pub fn force_fan_level(&mut self, level: FanLevel) {
        self.manual = true;
        self.apply(level);
    }

    /// Go back to deriving the fan level from the last accepted temperature.
    pub fn resume_automatic(&mut self) {
        self.manual = false;
        self.apply(FanLevel::for_temperature(self.temperature));
    }

    fn apply(&mut self, level: FanLevel) {
        if level != self.fan {
            log::debug!("fan {:?} -> {:?}", self.fan, level);
            self.fan = level;
        }
    }
}

impl TemperatureSink for ClimateController {
    fn set_temperature(&mut self, celsius: f32) {
        if celsius > self.temperature + HYSTERESIS || celsius < self.temperature - HYSTERESIS {
            self.temperature = celsius;
            if !self.manual {
                self.apply(FanLevel::for_temperature(celsius));
            }
        }
    }
}
