//! [`Puppy`] – the root aggregate and the main behavior loop.
//!
//! The loop samples inputs on a fixed 100 ms cadence and dispatches each
//! sample to **at most one** branch, in strict priority order:
//!
//! 1. exit button – leave the loop (terminal),
//! 2. up button – head up,
//! 3. down button – head down,
//! 4. touch sensor – bark, heart eyes, sit down, count the pet,
//! 5. pet threshold reached – bathroom routine,
//! 6. otherwise – stop the head and advance the idle face.
//!
//! Single-branch dispatch keeps one input sample from issuing conflicting
//! motor commands and makes the loop deterministic without any debouncing
//! beyond the polling cadence.  Gesture routines block the loop for their
//! duration; the exit button is only sampled between ticks, never inside a
//! gesture.

use std::sync::Arc;
use std::time::Duration;

use pupbot_hal::channel::MotorChannel;
use pupbot_hal::clock::Clock;
use pupbot_hal::input::{ButtonPad, TouchSensor};
use pupbot_hal::panel::{Speaker, StatusLight};
use pupbot_hal::rig::Rig;
use pupbot_types::{Button, Color, Expression, PupError, SoundRef};
use rand::rngs::StdRng;
use tracing::{debug, info};

use crate::expression::ExpressionEngine;
use crate::face::Face;
use crate::pats::PatCounter;

/// Polling cadence of the behavior loop.
pub const TICK: Duration = Duration::from_millis(100);

/// Head velocity commanded by the up/down buttons, output-frame deg/s.
const HEAD_SPEED_DEG_S: f32 = 20.0;

/// Which dispatch branch a tick took.  Exposed so scenarios can be driven
/// tick by tick in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Exit,
    HeadUp,
    HeadDown,
    Petted,
    Bathroom,
    Idle,
}

/// The whole robot: hardware, face, timers, and the pet counter.
///
/// Constructed once at startup, mutated only from the behavior loop's
/// single logical thread, torn down by the exit branch.
pub struct Puppy {
    pub(crate) head: MotorChannel,
    pub(crate) left_leg: MotorChannel,
    pub(crate) right_leg: MotorChannel,
    pub(crate) buttons: Box<dyn ButtonPad>,
    pub(crate) touch: Box<dyn TouchSensor>,
    pub(crate) speaker: Box<dyn Speaker>,
    pub(crate) light: Box<dyn StatusLight>,
    pub(crate) face: Face,
    pub(crate) eyes: ExpressionEngine,
    pub(crate) pats: PatCounter,
    pub(crate) clock: Arc<dyn Clock>,
}

impl Puppy {
    pub fn new(rig: Rig, clock: Arc<dyn Clock>, rng: StdRng) -> Self {
        let eyes = ExpressionEngine::new(clock.clone(), rng);
        Self {
            head: rig.head,
            left_leg: rig.left_leg,
            right_leg: rig.right_leg,
            buttons: rig.buttons,
            touch: rig.touch,
            speaker: rig.speaker,
            light: rig.light,
            face: Face::new(rig.display),
            eyes,
            pats: PatCounter::new(),
            clock,
        }
    }

    /// Pets accumulated toward the bathroom threshold.
    pub fn pat_count(&self) -> u8 {
        self.pats.count()
    }

    /// Run the behavior loop to completion: boot face and attention light,
    /// then tick until the exit button, then the shutdown sequence.
    ///
    /// # Errors
    ///
    /// The first [`PupError::HardwareFault`] from any branch aborts the
    /// loop and propagates; nothing is retried.
    pub fn run(&mut self) -> Result<(), PupError> {
        self.face.show(Expression::Icon)?;
        self.light.set_color(Color::Orange)?;
        info!("behavior loop running");

        while self.tick()? != Tick::Exit {
            self.clock.sleep(TICK);
        }
        self.shutdown()
    }

    /// One polling cycle: sample inputs, dispatch exactly one branch.
    pub fn tick(&mut self) -> Result<Tick, PupError> {
        let buttons = self.buttons.pressed()?;

        if buttons.contains(&Button::Center) {
            debug!("exit button pressed");
            return Ok(Tick::Exit);
        }
        if buttons.contains(&Button::Up) {
            self.head.run_velocity(HEAD_SPEED_DEG_S)?;
            return Ok(Tick::HeadUp);
        }
        if buttons.contains(&Button::Down) {
            self.head.run_velocity(-HEAD_SPEED_DEG_S)?;
            return Ok(Tick::HeadDown);
        }
        if self.touch.pressed()? {
            self.speaker.play_sound(SoundRef::DogBark)?;
            self.face.show(Expression::Heart)?;
            self.sit_down()?;
            self.pats.bump();
            debug!(pats = self.pats.count(), "petted");
            return Ok(Tick::Petted);
        }
        if self.pats.at_threshold() {
            self.bathroom()?;
            self.pats.consume();
            return Ok(Tick::Bathroom);
        }

        self.head.stop()?;
        let current = self.face.current().unwrap_or(Expression::Icon);
        let next = self.eyes.next(current);
        self.face.show(next)?;
        Ok(Tick::Idle)
    }

    fn shutdown(&mut self) -> Result<(), PupError> {
        info!("shutting down");
        self.head.stop()?;
        self.head.reset_angle(0.0)?;
        self.light.set_color(Color::Green)?;
        self.face.show(Expression::Sleeping)?;
        Ok(())
    }
}
