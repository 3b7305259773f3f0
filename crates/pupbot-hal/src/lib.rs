//! `pupbot-hal` – Hardware Abstraction Layer
//!
//! Capability traits for every piece of puppy hardware, plus the glue that
//! turns raw motor drivers into well-behaved actuator channels.
//!
//! # Modules
//!
//! - [`motor`] – [`Motor`][motor::Motor]: non-blocking motor driver trait
//!   (velocity, targeted motion profiles, completion polling).
//! - [`panel`] – [`Display`][panel::Display], [`Speaker`][panel::Speaker],
//!   and [`StatusLight`][panel::StatusLight]: the brick-face peripherals.
//! - [`input`] – [`ButtonPad`][input::ButtonPad] and
//!   [`TouchSensor`][input::TouchSensor]: polled discrete inputs.
//! - [`clock`] – [`Clock`][clock::Clock]: injectable monotonic time source
//!   and sleeper, with [`Stopwatch`][clock::Stopwatch] layered on top.
//!   Every suspension point in the stack goes through this trait so tests
//!   can run the full controller without real time passing.
//! - [`channel`] – [`MotorChannel`][channel::MotorChannel]: the actuator
//!   controller.  Applies an explicit per-motor
//!   [`AngleTransform`][channel::AngleTransform] (mount direction × gear
//!   ratio) at the boundary and provides the blocking wait helpers.
//! - [`sim`] – recording stub drivers and the [`SimRig`][sim::SimRig]
//!   builder, so the full stack runs headless in tests and CI.
//! - [`rig`] – [`Rig`][rig::Rig]: the assembled hardware bundle handed to
//!   the behavior runtime.

pub mod channel;
pub mod clock;
pub mod input;
pub mod motor;
pub mod panel;
pub mod rig;
pub mod sim;

pub use channel::{AngleTransform, MotorChannel};
pub use clock::{Clock, MonotonicClock, Stopwatch};
pub use input::{ButtonPad, TouchSensor};
pub use motor::Motor;
pub use panel::{Display, Speaker, StatusLight};
pub use rig::Rig;
