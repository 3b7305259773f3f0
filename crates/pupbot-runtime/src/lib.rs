//! `pupbot-runtime` – The Behavior Engine
//!
//! Everything the puppy *does*: the fixed-rate behavior loop, the gesture
//! routines, and the timer-driven face.
//!
//! # Modules
//!
//! - [`puppy`] – [`Puppy`][puppy::Puppy]: the root aggregate.  Owns the
//!   whole [`Rig`][pupbot_hal::Rig] and runs the polling loop that
//!   dispatches each input sample to exactly one action branch per tick.
//! - [`gestures`] – the composed motion routines (stand up, sit down, the
//!   bathroom routine), built from motor-channel primitives and fixed
//!   delays.  Non-preemptible: once started, a routine runs to completion.
//! - [`expression`] – [`ExpressionEngine`][expression::ExpressionEngine]:
//!   two independent randomized dwell timers that cycle the idle face
//!   through blink and drowsiness states.  Takes a seedable RNG so tests
//!   get deterministic dwell sequences.
//! - [`face`] – [`Face`][face::Face]: change-detecting display frontend;
//!   an unchanged expression never triggers a redraw.
//! - [`pats`] – [`PatCounter`][pats::PatCounter]: the bounded interaction
//!   counter that arms the bathroom routine after three pets.

pub mod expression;
pub mod face;
pub mod gestures;
pub mod pats;
pub mod puppy;

pub use expression::ExpressionEngine;
pub use face::Face;
pub use pats::PatCounter;
pub use puppy::{Puppy, Tick};
