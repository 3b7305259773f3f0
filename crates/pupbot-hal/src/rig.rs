//! [`Rig`] – the assembled hardware bundle.
//!
//! Constructed once at startup (from real drivers on the robot, or from
//! [`SimRig`][crate::sim::SimRig] in tests) and handed to the behavior
//! runtime, which owns it for the life of the process.

use crate::channel::MotorChannel;
use crate::input::{ButtonPad, TouchSensor};
use crate::panel::{Display, Speaker, StatusLight};

/// Every actuator and sensor of the puppy, exclusively owned.
///
/// The motor channels are the only path to the motors; no other component
/// can alias them, so a single logical thread of control is enough to keep
/// commands conflict-free.
pub struct Rig {
    pub head: MotorChannel,
    pub left_leg: MotorChannel,
    pub right_leg: MotorChannel,
    pub buttons: Box<dyn ButtonPad>,
    pub touch: Box<dyn TouchSensor>,
    pub display: Box<dyn Display>,
    pub speaker: Box<dyn Speaker>,
    pub light: Box<dyn StatusLight>,
}
