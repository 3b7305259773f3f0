//! Polled discrete inputs: the brick buttons and the back touch sensor.
//!
//! Both traits are sampled exactly once per behavior-loop tick; there is no
//! event queue or debouncing beyond the polling cadence itself.

use pupbot_types::{Button, PupError};

/// The brick button pad.
pub trait ButtonPad: Send {
    /// The set of buttons held down at this instant.
    ///
    /// # Errors
    ///
    /// Returns [`PupError::HardwareFault`] if the pad is unreachable.
    fn pressed(&mut self) -> Result<Vec<Button>, PupError>;
}

/// The touch sensor on the puppy's back.
pub trait TouchSensor: Send {
    /// `true` while the sensor is being pressed.
    fn pressed(&mut self) -> Result<bool, PupError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MockPad {
        held: Vec<Button>,
    }

    impl ButtonPad for MockPad {
        fn pressed(&mut self) -> Result<Vec<Button>, PupError> {
            Ok(self.held.clone())
        }
    }

    #[test]
    fn mock_pad_reports_held_buttons() {
        let mut pad = MockPad {
            held: vec![Button::Up, Button::Center],
        };
        let held = pad.pressed().unwrap();
        assert!(held.contains(&Button::Center));
        assert_eq!(held.len(), 2);
    }
}
