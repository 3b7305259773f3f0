//! [`MotorChannel`] – the actuator controller.
//!
//! Wraps a raw [`Motor`] driver with an explicit [`AngleTransform`] so that
//! everything above this boundary works in the output-shaft frame: commanded
//! angles and velocities are translated into motor-shaft values on the way
//! down, and reported angles are translated back on the way up.  Gear
//! trains and mount direction are a visible, per-motor parameter rather
//! than something buried inside a driver.
//!
//! The channel also owns the blocking wait helpers.  The underlying driver
//! stays non-blocking; every suspension happens here, through the injected
//! [`Clock`], on a fixed 100 ms polling cadence.

use std::sync::Arc;
use std::time::Duration;

use pupbot_types::{Direction, GearTrain, PupError};
use tracing::debug;

use crate::clock::Clock;
use crate::motor::Motor;

/// Cadence for motion-completion polling.
const MOTION_POLL: Duration = Duration::from_millis(100);

/// Linear map between the output-shaft frame and the motor-shaft frame.
///
/// `motor = output × sign × ratio`, where `sign` comes from the mount
/// [`Direction`] and `ratio` from the [`GearTrain`] (1.0 for a direct
/// drive).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngleTransform {
    sign: f32,
    ratio: f32,
}

impl AngleTransform {
    /// Build the transform for a motor mounted with `direction` and an
    /// optional gear train.
    ///
    /// # Errors
    ///
    /// Returns [`PupError::ConfigurationFault`] for a degenerate gear
    /// train.
    pub fn new(direction: Direction, gears: Option<&GearTrain>) -> Result<Self, PupError> {
        let ratio = match gears {
            Some(train) => train.ratio()?,
            None => 1.0,
        };
        Ok(Self {
            sign: direction.sign(),
            ratio,
        })
    }

    /// Direct drive, positive clockwise.
    pub fn identity() -> Self {
        Self {
            sign: 1.0,
            ratio: 1.0,
        }
    }

    fn to_motor(&self, output: f32) -> f32 {
        output * self.sign * self.ratio
    }

    fn to_output(&self, motor: f32) -> f32 {
        motor / (self.sign * self.ratio)
    }
}

/// One fully configured actuator: a raw driver, its angle transform, and a
/// clock for the blocking helpers.
///
/// Exclusively owns its [`Motor`]; no other component can issue commands to
/// the same hardware.
pub struct MotorChannel {
    motor: Box<dyn Motor>,
    transform: AngleTransform,
    clock: Arc<dyn Clock>,
}

impl MotorChannel {
    pub fn new(motor: Box<dyn Motor>, transform: AngleTransform, clock: Arc<dyn Clock>) -> Self {
        Self {
            motor,
            transform,
            clock,
        }
    }

    /// Identifier of the underlying motor.
    pub fn id(&self) -> &str {
        self.motor.id()
    }

    /// Rotate continuously at `speed_deg_s` in the output frame.
    /// Non-blocking.
    pub fn run_velocity(&mut self, speed_deg_s: f32) -> Result<(), PupError> {
        debug!(motor = self.motor.id(), speed_deg_s, "run at velocity");
        self.motor.run(self.transform.to_motor(speed_deg_s))
    }

    /// Halt immediately.  Idempotent.
    pub fn stop(&mut self) -> Result<(), PupError> {
        self.motor.stop()
    }

    /// Redefine the current position as `angle_deg` (output frame).
    pub fn reset_angle(&mut self, angle_deg: f32) -> Result<(), PupError> {
        self.motor.reset_angle(self.transform.to_motor(angle_deg))
    }

    /// Current position in the output frame.
    pub fn angle(&self) -> f32 {
        self.transform.to_output(self.motor.angle())
    }

    /// Start a motion profile toward `target_deg` (output frame) and return
    /// immediately.  Poll [`MotorChannel::is_motion_done`] for completion.
    pub fn run_to_target(&mut self, speed_deg_s: f32, target_deg: f32) -> Result<(), PupError> {
        debug!(
            motor = self.motor.id(),
            speed_deg_s, target_deg, "run to target"
        );
        self.motor.run_target(
            self.transform.to_motor(speed_deg_s).abs(),
            self.transform.to_motor(target_deg),
        )
    }

    /// `true` once the last started motion profile has completed.
    pub fn is_motion_done(&mut self) -> bool {
        self.motor.motion_done()
    }

    /// Block until the in-flight motion profile completes, polling on the
    /// 100 ms cadence.
    pub fn wait_motion_done(&mut self) {
        while !self.motor.motion_done() {
            self.clock.sleep(MOTION_POLL);
        }
    }

    /// Start a motion profile toward `target_deg` and block until it
    /// completes.
    pub fn run_to_target_blocking(
        &mut self,
        speed_deg_s: f32,
        target_deg: f32,
    ) -> Result<(), PupError> {
        self.run_to_target(speed_deg_s, target_deg)?;
        self.wait_motion_done();
        Ok(())
    }

    /// Rotate by `delta_deg` relative to the current position (output
    /// frame), blocking until done.
    pub fn run_relative(&mut self, speed_deg_s: f32, delta_deg: f32) -> Result<(), PupError> {
        let target = self.angle() + delta_deg;
        self.run_to_target_blocking(speed_deg_s, target)
    }
}
