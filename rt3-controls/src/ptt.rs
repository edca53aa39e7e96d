//! Push-to-talk button

use rt3_hal::InputPin;

/// PTT switch, pulled up and shorted to ground when pressed
pub struct PushToTalk<P> {
    pin: P,
}

impl<P: InputPin> PushToTalk<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Level(bool);

    impl InputPin for Level {
        fn is_high(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_active_low() {
        assert!(PushToTalk::new(Level(false)).is_pressed());
        assert!(!PushToTalk::new(Level(true)).is_pressed());
    }
}
