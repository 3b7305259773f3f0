//! Generic `Motor` trait for the puppy's leg and head motors.
//!
//! Drivers implement this trait and are wrapped in a
//! [`MotorChannel`][crate::channel::MotorChannel], which applies the
//! per-motor angle transform and adds the blocking wait helpers.  The rest
//! of the stack only ever talks to the channel, so drivers can be swapped
//! without touching behavior logic.

use pupbot_types::PupError;

/// A motor driver in the motor-shaft frame.
///
/// All operations are non-blocking: [`Motor::run_target`] starts a motion
/// profile and returns immediately; completion is observed by polling
/// [`Motor::motion_done`].  Blocking semantics live one layer up in
/// [`MotorChannel`][crate::channel::MotorChannel], where a clock is
/// available.
pub trait Motor: Send {
    /// Stable identifier for this motor, e.g. `"left_leg"` or `"head"`.
    fn id(&self) -> &str;

    /// Rotate continuously at `speed_deg_s` (signed, degrees per second).
    ///
    /// # Errors
    ///
    /// Returns [`PupError::HardwareFault`] if the motor is unreachable or
    /// stalled.  Faults are not retried here.
    fn run(&mut self, speed_deg_s: f32) -> Result<(), PupError>;

    /// Halt rotation immediately.  Idempotent: stopping a stopped motor is
    /// a no-op with the same observable state.
    fn stop(&mut self) -> Result<(), PupError>;

    /// Redefine the current shaft position as `angle_deg`.
    fn reset_angle(&mut self, angle_deg: f32) -> Result<(), PupError>;

    /// Start a motion profile toward the absolute angle `target_deg` at
    /// `speed_deg_s`, returning immediately.
    fn run_target(&mut self, speed_deg_s: f32, target_deg: f32) -> Result<(), PupError>;

    /// The most recently known shaft angle in degrees.
    fn angle(&self) -> f32;

    /// `true` once the motion profile started by the last
    /// [`Motor::run_target`] call has completed.  `true` when no profile
    /// is in flight.
    fn motion_done(&mut self) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal in-process motor used only for tests.
    struct MockMotor {
        id: String,
        angle: f32,
        target: Option<f32>,
    }

    impl MockMotor {
        fn new(id: &str) -> Self {
            Self {
                id: id.to_string(),
                angle: 0.0,
                target: None,
            }
        }
    }

    impl Motor for MockMotor {
        fn id(&self) -> &str {
            &self.id
        }

        fn run(&mut self, _speed_deg_s: f32) -> Result<(), PupError> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), PupError> {
            Ok(())
        }

        fn reset_angle(&mut self, angle_deg: f32) -> Result<(), PupError> {
            self.angle = angle_deg;
            Ok(())
        }

        fn run_target(&mut self, _speed_deg_s: f32, target_deg: f32) -> Result<(), PupError> {
            self.target = Some(target_deg);
            Ok(())
        }

        fn angle(&self) -> f32 {
            self.angle
        }

        fn motion_done(&mut self) -> bool {
            if let Some(target) = self.target.take() {
                self.angle = target;
            }
            true
        }
    }

    #[test]
    fn mock_motor_runs_profile_to_completion() {
        let mut motor = MockMotor::new("test_leg");
        assert_eq!(motor.id(), "test_leg");

        motor.run_target(100.0, 25.0).unwrap();
        assert!(motor.motion_done());
        assert!((motor.angle() - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn mock_motor_idle_motion_is_done() {
        let mut motor = MockMotor::new("head");
        assert!(motor.motion_done());
    }
}
