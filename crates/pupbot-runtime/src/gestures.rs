//! Gesture routines: composed, multi-step motion sequences.
//!
//! Each routine is a fixed sequence of motor-channel commands and delays,
//! run to completion without interruption.  The behavior loop cannot
//! preempt a running gesture; the only way out is completion or a hardware
//! fault, which aborts the routine and propagates.

use std::time::Duration;

use pupbot_types::{Expression, LegTarget, PupError, SoundRef};
use tracing::info;

use crate::puppy::Puppy;

/// Cadence for the both-legs completion poll during stand-up.
const LEG_POLL: Duration = Duration::from_millis(100);

/// Speed for the first (half-up) stage of standing, deg/s.
const RAISE_SPEED: f32 = 100.0;
/// Slower speed for the final push to standing, deg/s.
const STAND_SPEED: f32 = 50.0;
/// Settle time after both legs reach the standing stop.
const STAND_SETTLE: Duration = Duration::from_millis(500);

/// Backward leg speed while sitting down, deg/s.
const SIT_SPEED: f32 = -50.0;
/// How long the legs run backward to sit.
const SIT_RUN: Duration = Duration::from_millis(1000);
const SIT_SETTLE: Duration = Duration::from_millis(100);

/// Leg-lift wiggle amplitude during the bathroom routine.
const WIGGLE_DEG: f32 = 20.0;
const WIGGLE_REPS: usize = 3;

impl Puppy {
    /// Stand up in two stages: both legs to the half-up stop at full
    /// speed, then both to the standing stop at half speed.
    ///
    /// The second stage is never commanded until **both** legs have
    /// individually reported motion completion.
    pub fn stand_up(&mut self) -> Result<(), PupError> {
        info!("gesture: stand up");
        self.left_leg
            .run_to_target(RAISE_SPEED, LegTarget::HalfUp.degrees())?;
        self.right_leg
            .run_to_target(RAISE_SPEED, LegTarget::HalfUp.degrees())?;
        self.wait_both_legs();

        self.left_leg
            .run_to_target(STAND_SPEED, LegTarget::StandUp.degrees())?;
        self.right_leg
            .run_to_target(STAND_SPEED, LegTarget::StandUp.degrees())?;
        self.wait_both_legs();

        self.clock.sleep(STAND_SETTLE);
        Ok(())
    }

    /// Sit down by running both legs backward for a fixed window.
    pub fn sit_down(&mut self) -> Result<(), PupError> {
        info!("gesture: sit down");
        self.left_leg.run_velocity(SIT_SPEED)?;
        self.right_leg.run_velocity(SIT_SPEED)?;
        self.clock.sleep(SIT_RUN);
        self.left_leg.stop()?;
        self.right_leg.stop()?;
        self.clock.sleep(SIT_SETTLE);
        Ok(())
    }

    /// The bathroom routine: squinty face, stand, stretch the right leg,
    /// horn, three leg wiggles, and back to standing.
    pub fn bathroom(&mut self) -> Result<(), PupError> {
        info!("gesture: bathroom");
        self.face.show(Expression::Squinty)?;
        self.stand_up()?;
        self.clock.sleep(Duration::from_millis(100));

        self.right_leg
            .run_to_target_blocking(RAISE_SPEED, LegTarget::Stretch.degrees())?;
        self.clock.sleep(Duration::from_millis(800));

        self.speaker.play_sound(SoundRef::Horn)?;
        self.clock.sleep(Duration::from_millis(1000));

        for _ in 0..WIGGLE_REPS {
            self.right_leg.run_relative(RAISE_SPEED, WIGGLE_DEG)?;
            self.right_leg.run_relative(RAISE_SPEED, -WIGGLE_DEG)?;
        }
        self.right_leg
            .run_to_target_blocking(RAISE_SPEED, LegTarget::StandUp.degrees())
    }

    /// Poll until both legs report motion completion.  Both sides are
    /// queried every round so neither profile is left behind.
    fn wait_both_legs(&mut self) {
        loop {
            let left_done = self.left_leg.is_motion_done();
            let right_done = self.right_leg.is_motion_done();
            if left_done && right_done {
                break;
            }
            self.clock.sleep(LEG_POLL);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use pupbot_hal::sim::{MotorCommand, SimClock, SimHandles, SimRig};
    use pupbot_hal::Clock;
    use pupbot_types::{ImageRef, PupError, SoundRef};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::puppy::Puppy;

    fn puppy_from(rig_builder: SimRig) -> (Puppy, SimHandles, Arc<SimClock>) {
        let clock = SimClock::new();
        let (rig, handles) = rig_builder.build(clock.clone());
        let puppy = Puppy::new(rig, clock.clone(), StdRng::seed_from_u64(7));
        (puppy, handles, clock)
    }

    fn targets(commands: &[MotorCommand]) -> Vec<f32> {
        commands
            .iter()
            .filter_map(|c| match c {
                MotorCommand::RunTarget { target, .. } => Some(*target),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn stand_up_stages_both_legs_through_half_up() {
        let (mut puppy, handles, _clock) =
            puppy_from(SimRig::new().with_motion_poll_latency(2));
        puppy.stand_up().unwrap();

        for leg in [&handles.left_leg, &handles.right_leg] {
            assert_eq!(
                leg.commands(),
                vec![
                    MotorCommand::RunTarget {
                        speed: 100.0,
                        target: 25.0,
                    },
                    MotorCommand::RunTarget {
                        speed: 50.0,
                        target: 65.0,
                    },
                ]
            );
            // The sim only completes a profile when it is actually polled,
            // so a leg left out of the wait would never reach the stop.
            assert!((leg.angle() - 65.0).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn stand_up_polls_on_the_100ms_cadence_then_settles() {
        let (mut puppy, _handles, clock) =
            puppy_from(SimRig::new().with_motion_poll_latency(2));
        puppy.stand_up().unwrap();

        // Two stages × two not-yet-done poll rounds × 100 ms, plus the
        // 500 ms settle.
        assert_eq!(clock.elapsed(), Duration::from_millis(900));
    }

    #[test]
    fn sit_down_runs_backward_then_stops() {
        let (mut puppy, handles, clock) = puppy_from(SimRig::new());
        puppy.sit_down().unwrap();

        for leg in [&handles.left_leg, &handles.right_leg] {
            assert_eq!(
                leg.commands(),
                vec![MotorCommand::Run(-50.0), MotorCommand::Stop]
            );
        }
        assert_eq!(clock.elapsed(), Duration::from_millis(1100));
    }

    #[test]
    fn bathroom_wiggles_exactly_three_times_and_ends_standing() {
        let (mut puppy, handles, _clock) = puppy_from(SimRig::new());
        puppy.bathroom().unwrap();

        assert_eq!(
            targets(&handles.right_leg.commands()),
            vec![
                25.0,  // half up
                65.0,  // stand
                125.0, // stretch
                145.0, 125.0, // wiggle 1
                145.0, 125.0, // wiggle 2
                145.0, 125.0, // wiggle 3
                65.0,  // back to standing
            ]
        );
        assert!((handles.right_leg.angle() - 65.0).abs() < f32::EPSILON);
        assert_eq!(handles.display.images(), vec![ImageRef::SquintyEyes]);
        assert_eq!(handles.speaker.sounds(), vec![SoundRef::Horn]);
    }

    #[test]
    fn faulted_leg_aborts_the_bathroom_routine() {
        let (mut puppy, handles, _clock) = puppy_from(SimRig::new());
        handles.right_leg.inject_fault("unreachable");

        let result = puppy.bathroom();
        assert!(matches!(
            result,
            Err(PupError::HardwareFault { component, .. }) if component == "right_leg"
        ));
        // Aborted before the horn: no partial-completion recovery.
        assert!(handles.speaker.sounds().is_empty());
    }
}
