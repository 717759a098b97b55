use embedded_hal::digital::{InputPin, OutputPin};

/// Which side is driving the data line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The microcontroller drives the line low.
    Output,
    /// The line is released and held high by the pull-up unless the sensor pulls it low.
    Input,
}

/// Represents the single bidirectional data line of the sensor.
pub trait DataLine {
    type Error;

    /// Switch the line between driven-low and released.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    fn is_high(&mut self) -> Result<bool, Self::Error>;

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// [`DataLine`] for an `embedded-hal` pin configured as open-drain output with a pull-up.
///
/// Releasing an open-drain pin is done by writing it high, so no mode switching is needed
/// and the level can be read back at any time.
pub struct OpenDrainLine<P> {
    pin: P,
}

impl<P> OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> DataLine for OpenDrainLine<P>
where
    P: InputPin + OutputPin,
{
    type Error = P::Error;

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        match direction {
            Direction::Output => self.pin.set_low(),
            Direction::Input => self.pin.set_high(),
        }
    }

    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }
}
