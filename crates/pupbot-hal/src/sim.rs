//! In-process simulation rig for headless testing without physical hardware.
//!
//! Every stub driver records the commands it receives and hands back a
//! shared handle so tests can assert on the exact command sequence after a
//! run.  [`SimRig`] assembles the full simulated hardware bundle, which
//! lets the entire controller stack run in CI with no brick attached.
//!
//! # Example
//!
//! ```rust
//! use pupbot_hal::sim::{SimClock, SimRig};
//!
//! let clock = SimClock::new();
//! let (mut rig, handles) = SimRig::new().build(clock);
//!
//! rig.left_leg.run_velocity(-50.0).expect("sim motor must succeed");
//! assert_eq!(handles.left_leg.commands().len(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use pupbot_types::{Button, Color, ImageRef, PupError, SoundRef};

use crate::channel::{AngleTransform, MotorChannel};
use crate::clock::Clock;
use crate::input::{ButtonPad, TouchSensor};
use crate::motor::Motor;
use crate::panel::{Display, Speaker, StatusLight};
use crate::rig::Rig;

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    // A panicking sim test may poison the lock; the recorded state is still
    // the right thing to report.
    state.lock().unwrap_or_else(|e| e.into_inner())
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated clock
// ────────────────────────────────────────────────────────────────────────────

/// Virtual time: `sleep` advances `elapsed` instantly, so loops that would
/// take seconds on the robot run in microseconds under test.
#[derive(Default)]
pub struct SimClock {
    now: Mutex<Duration>,
}

impl SimClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Advance time without a sleeper, e.g. to expire a dwell deadline.
    pub fn advance(&self, by: Duration) {
        *lock(&self.now) += by;
    }
}

impl Clock for SimClock {
    fn elapsed(&self) -> Duration {
        *lock(&self.now)
    }

    fn sleep(&self, duration: Duration) {
        *lock(&self.now) += duration;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated motor
// ────────────────────────────────────────────────────────────────────────────

/// A command observed by a [`SimMotor`], in the motor-shaft frame.
#[derive(Debug, Clone, PartialEq)]
pub enum MotorCommand {
    Run(f32),
    Stop,
    RunTarget { speed: f32, target: f32 },
    ResetAngle(f32),
}

struct SimMotorState {
    angle: f32,
    target: Option<f32>,
    polls_remaining: u32,
    commands: Vec<MotorCommand>,
    fault: Option<String>,
}

/// A simulated motor that records every command.
///
/// A motion profile started with `run_target` completes after
/// `poll_latency` not-yet-done `motion_done` polls; on completion the angle
/// snaps to the target.  The default latency of 0 completes on the first
/// poll.
pub struct SimMotor {
    id: String,
    poll_latency: u32,
    state: Arc<Mutex<SimMotorState>>,
}

/// Shared view into a [`SimMotor`] for post-run assertions and fault
/// injection.
#[derive(Clone)]
pub struct SimMotorHandle {
    state: Arc<Mutex<SimMotorState>>,
}

impl SimMotor {
    pub fn new(id: impl Into<String>) -> (Box<Self>, SimMotorHandle) {
        Self::with_poll_latency(id, 0)
    }

    /// A motor whose motion profiles stay in flight for `polls` completion
    /// queries, for exercising the polling paths.
    pub fn with_poll_latency(id: impl Into<String>, polls: u32) -> (Box<Self>, SimMotorHandle) {
        let state = Arc::new(Mutex::new(SimMotorState {
            angle: 0.0,
            target: None,
            polls_remaining: 0,
            commands: Vec::new(),
            fault: None,
        }));
        let handle = SimMotorHandle {
            state: state.clone(),
        };
        (
            Box::new(Self {
                id: id.into(),
                poll_latency: polls,
                state,
            }),
            handle,
        )
    }

    fn check_fault(&self, state: &SimMotorState) -> Result<(), PupError> {
        match &state.fault {
            Some(details) => Err(PupError::HardwareFault {
                component: self.id.clone(),
                details: details.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl Motor for SimMotor {
    fn id(&self) -> &str {
        &self.id
    }

    fn run(&mut self, speed_deg_s: f32) -> Result<(), PupError> {
        let mut state = lock(&self.state);
        self.check_fault(&state)?;
        state.commands.push(MotorCommand::Run(speed_deg_s));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PupError> {
        let mut state = lock(&self.state);
        self.check_fault(&state)?;
        state.commands.push(MotorCommand::Stop);
        Ok(())
    }

    fn reset_angle(&mut self, angle_deg: f32) -> Result<(), PupError> {
        let mut state = lock(&self.state);
        self.check_fault(&state)?;
        state.commands.push(MotorCommand::ResetAngle(angle_deg));
        state.angle = angle_deg;
        Ok(())
    }

    fn run_target(&mut self, speed_deg_s: f32, target_deg: f32) -> Result<(), PupError> {
        let mut state = lock(&self.state);
        self.check_fault(&state)?;
        state.commands.push(MotorCommand::RunTarget {
            speed: speed_deg_s,
            target: target_deg,
        });
        state.target = Some(target_deg);
        state.polls_remaining = self.poll_latency;
        Ok(())
    }

    fn angle(&self) -> f32 {
        lock(&self.state).angle
    }

    fn motion_done(&mut self) -> bool {
        let mut state = lock(&self.state);
        match state.target {
            None => true,
            Some(target) => {
                if state.polls_remaining > 0 {
                    state.polls_remaining -= 1;
                    false
                } else {
                    state.angle = target;
                    state.target = None;
                    true
                }
            }
        }
    }
}

impl SimMotorHandle {
    /// Every command the motor has received, oldest first.
    pub fn commands(&self) -> Vec<MotorCommand> {
        lock(&self.state).commands.clone()
    }

    /// Current motor-shaft angle.
    pub fn angle(&self) -> f32 {
        lock(&self.state).angle
    }

    /// Make every subsequent command fail with a [`PupError::HardwareFault`].
    pub fn inject_fault(&self, details: impl Into<String>) {
        lock(&self.state).fault = Some(details.into());
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated panel
// ────────────────────────────────────────────────────────────────────────────

/// A simulated display that records every loaded image.  Always succeeds.
pub struct SimDisplay {
    images: Arc<Mutex<Vec<ImageRef>>>,
}

#[derive(Clone)]
pub struct SimDisplayHandle {
    images: Arc<Mutex<Vec<ImageRef>>>,
}

impl SimDisplay {
    pub fn new() -> (Box<Self>, SimDisplayHandle) {
        let images = Arc::new(Mutex::new(Vec::new()));
        let handle = SimDisplayHandle {
            images: images.clone(),
        };
        (Box::new(Self { images }), handle)
    }
}

impl Display for SimDisplay {
    fn load_image(&mut self, image: ImageRef) -> Result<(), PupError> {
        lock(&self.images).push(image);
        Ok(())
    }
}

impl SimDisplayHandle {
    /// Every image drawn, oldest first.  Redundant redraws would show up
    /// here as duplicates.
    pub fn images(&self) -> Vec<ImageRef> {
        lock(&self.images).clone()
    }
}

/// A simulated speaker that records every played sound.  Always succeeds.
pub struct SimSpeaker {
    sounds: Arc<Mutex<Vec<SoundRef>>>,
}

#[derive(Clone)]
pub struct SimSpeakerHandle {
    sounds: Arc<Mutex<Vec<SoundRef>>>,
}

impl SimSpeaker {
    pub fn new() -> (Box<Self>, SimSpeakerHandle) {
        let sounds = Arc::new(Mutex::new(Vec::new()));
        let handle = SimSpeakerHandle {
            sounds: sounds.clone(),
        };
        (Box::new(Self { sounds }), handle)
    }
}

impl Speaker for SimSpeaker {
    fn play_sound(&mut self, sound: SoundRef) -> Result<(), PupError> {
        lock(&self.sounds).push(sound);
        Ok(())
    }
}

impl SimSpeakerHandle {
    pub fn sounds(&self) -> Vec<SoundRef> {
        lock(&self.sounds).clone()
    }
}

/// A simulated status light that records every color change.
pub struct SimLight {
    colors: Arc<Mutex<Vec<Color>>>,
}

#[derive(Clone)]
pub struct SimLightHandle {
    colors: Arc<Mutex<Vec<Color>>>,
}

impl SimLight {
    pub fn new() -> (Box<Self>, SimLightHandle) {
        let colors = Arc::new(Mutex::new(Vec::new()));
        let handle = SimLightHandle {
            colors: colors.clone(),
        };
        (Box::new(Self { colors }), handle)
    }
}

impl StatusLight for SimLight {
    fn set_color(&mut self, color: Color) -> Result<(), PupError> {
        lock(&self.colors).push(color);
        Ok(())
    }
}

impl SimLightHandle {
    pub fn colors(&self) -> Vec<Color> {
        lock(&self.colors).clone()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Simulated inputs
// ────────────────────────────────────────────────────────────────────────────

/// A scripted button pad: each `pressed` call pops the next sample from the
/// tape; a drained tape reads as no buttons held.
pub struct SimButtonPad {
    tape: VecDeque<Vec<Button>>,
}

impl SimButtonPad {
    /// No buttons are ever pressed.
    pub fn idle() -> Box<Self> {
        Box::new(Self {
            tape: VecDeque::new(),
        })
    }

    pub fn scripted(samples: impl IntoIterator<Item = Vec<Button>>) -> Box<Self> {
        Box::new(Self {
            tape: samples.into_iter().collect(),
        })
    }
}

impl ButtonPad for SimButtonPad {
    fn pressed(&mut self) -> Result<Vec<Button>, PupError> {
        Ok(self.tape.pop_front().unwrap_or_default())
    }
}

/// A scripted touch sensor: each `pressed` call pops the next sample; a
/// drained tape reads as not pressed.
pub struct SimTouchSensor {
    tape: VecDeque<bool>,
}

impl SimTouchSensor {
    pub fn idle() -> Box<Self> {
        Box::new(Self {
            tape: VecDeque::new(),
        })
    }

    pub fn scripted(samples: impl IntoIterator<Item = bool>) -> Box<Self> {
        Box::new(Self {
            tape: samples.into_iter().collect(),
        })
    }
}

impl TouchSensor for SimTouchSensor {
    fn pressed(&mut self) -> Result<bool, PupError> {
        Ok(self.tape.pop_front().unwrap_or(false))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SimRig builder
// ────────────────────────────────────────────────────────────────────────────

/// Shared handles into every stub driver of a built [`SimRig`].
pub struct SimHandles {
    pub head: SimMotorHandle,
    pub left_leg: SimMotorHandle,
    pub right_leg: SimMotorHandle,
    pub display: SimDisplayHandle,
    pub speaker: SimSpeakerHandle,
    pub light: SimLightHandle,
}

/// Builder for a fully simulated [`Rig`].
///
/// Defaults: identity angle transforms, instant motion completion, no
/// scripted input.  Call the `with_*` methods to shape a scenario, then
/// [`build`][Self::build] to obtain the rig plus its [`SimHandles`].
pub struct SimRig {
    buttons: Option<Box<SimButtonPad>>,
    touch: Option<Box<SimTouchSensor>>,
    motion_poll_latency: u32,
    head_transform: AngleTransform,
    leg_transform: AngleTransform,
}

impl Default for SimRig {
    fn default() -> Self {
        Self {
            buttons: None,
            touch: None,
            motion_poll_latency: 0,
            head_transform: AngleTransform::identity(),
            leg_transform: AngleTransform::identity(),
        }
    }
}

impl SimRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the button pad, one sample per tick.
    pub fn with_button_script(mut self, samples: impl IntoIterator<Item = Vec<Button>>) -> Self {
        self.buttons = Some(SimButtonPad::scripted(samples));
        self
    }

    /// Script the touch sensor, one sample per read.
    pub fn with_touch_script(mut self, samples: impl IntoIterator<Item = bool>) -> Self {
        self.touch = Some(SimTouchSensor::scripted(samples));
        self
    }

    /// Keep motion profiles in flight for `polls` completion queries.
    pub fn with_motion_poll_latency(mut self, polls: u32) -> Self {
        self.motion_poll_latency = polls;
        self
    }

    /// Angle transform for the head channel (e.g. the geared head mount).
    pub fn with_head_transform(mut self, transform: AngleTransform) -> Self {
        self.head_transform = transform;
        self
    }

    /// Angle transform shared by both leg channels.
    pub fn with_leg_transform(mut self, transform: AngleTransform) -> Self {
        self.leg_transform = transform;
        self
    }

    /// Assemble the simulated [`Rig`] and its assertion handles.
    pub fn build(self, clock: Arc<dyn Clock>) -> (Rig, SimHandles) {
        let (head, head_handle) = SimMotor::with_poll_latency("head", self.motion_poll_latency);
        let (left, left_handle) =
            SimMotor::with_poll_latency("left_leg", self.motion_poll_latency);
        let (right, right_handle) =
            SimMotor::with_poll_latency("right_leg", self.motion_poll_latency);
        let (display, display_handle) = SimDisplay::new();
        let (speaker, speaker_handle) = SimSpeaker::new();
        let (light, light_handle) = SimLight::new();

        let rig = Rig {
            head: MotorChannel::new(head, self.head_transform, clock.clone()),
            left_leg: MotorChannel::new(left, self.leg_transform, clock.clone()),
            right_leg: MotorChannel::new(right, self.leg_transform, clock),
            buttons: self.buttons.unwrap_or_else(SimButtonPad::idle),
            touch: self.touch.unwrap_or_else(SimTouchSensor::idle),
            display,
            speaker,
            light,
        };
        let handles = SimHandles {
            head: head_handle,
            left_leg: left_handle,
            right_leg: right_handle,
            display: display_handle,
            speaker: speaker_handle,
            light: light_handle,
        };
        (rig, handles)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_clock_sleep_advances_elapsed() {
        let clock = SimClock::new();
        clock.sleep(Duration::from_millis(100));
        clock.advance(Duration::from_millis(50));
        assert_eq!(clock.elapsed(), Duration::from_millis(150));
    }

    #[test]
    fn sim_motor_records_commands_in_order() {
        let (mut motor, handle) = SimMotor::new("left_leg");
        motor.run(-50.0).unwrap();
        motor.stop().unwrap();
        motor.reset_angle(0.0).unwrap();
        assert_eq!(
            handle.commands(),
            vec![
                MotorCommand::Run(-50.0),
                MotorCommand::Stop,
                MotorCommand::ResetAngle(0.0),
            ]
        );
    }

    #[test]
    fn sim_motor_completes_profile_after_latency() {
        let (mut motor, handle) = SimMotor::with_poll_latency("right_leg", 2);
        motor.run_target(100.0, 25.0).unwrap();

        assert!(!motor.motion_done());
        assert!(!motor.motion_done());
        assert!(motor.motion_done());
        assert!((handle.angle() - 25.0).abs() < f32::EPSILON);
        // Completed profile stays done.
        assert!(motor.motion_done());
    }

    #[test]
    fn sim_motor_angle_unchanged_until_profile_completes() {
        let (mut motor, handle) = SimMotor::with_poll_latency("left_leg", 1);
        motor.run_target(100.0, 25.0).unwrap();
        assert!((handle.angle() - 0.0).abs() < f32::EPSILON);
        motor.motion_done();
        motor.motion_done();
        assert!((handle.angle() - 25.0).abs() < f32::EPSILON);
    }

    #[test]
    fn injected_fault_fails_every_command() {
        let (mut motor, handle) = SimMotor::new("head");
        handle.inject_fault("unreachable");
        assert!(motor.run(20.0).is_err());
        assert!(motor.stop().is_err());
        assert!(motor.run_target(20.0, 10.0).is_err());
    }

    #[test]
    fn scripted_button_pad_drains_to_idle() {
        let mut pad = SimButtonPad::scripted(vec![vec![Button::Up], vec![]]);
        assert_eq!(pad.pressed().unwrap(), vec![Button::Up]);
        assert_eq!(pad.pressed().unwrap(), Vec::<Button>::new());
        assert_eq!(pad.pressed().unwrap(), Vec::<Button>::new());
    }

    #[test]
    fn scripted_touch_sensor_drains_to_unpressed() {
        let mut touch = SimTouchSensor::scripted(vec![true, false, true]);
        assert!(touch.pressed().unwrap());
        assert!(!touch.pressed().unwrap());
        assert!(touch.pressed().unwrap());
        assert!(!touch.pressed().unwrap());
    }

    #[test]
    fn sim_rig_full_stack_no_hardware_required() {
        let clock = SimClock::new();
        let (mut rig, handles) = SimRig::new()
            .with_touch_script(vec![true])
            .build(clock.clone());

        rig.left_leg.run_to_target_blocking(100.0, 25.0).unwrap();
        rig.display.load_image(ImageRef::HeartEyes).unwrap();
        rig.speaker.play_sound(SoundRef::DogBark).unwrap();
        rig.light.set_color(Color::Orange).unwrap();
        assert!(rig.touch.pressed().unwrap());

        assert!((handles.left_leg.angle() - 25.0).abs() < f32::EPSILON);
        assert_eq!(handles.display.images(), vec![ImageRef::HeartEyes]);
        assert_eq!(handles.speaker.sounds(), vec![SoundRef::DogBark]);
        assert_eq!(handles.light.colors(), vec![Color::Orange]);
    }
}
