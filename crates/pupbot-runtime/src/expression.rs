//! [`ExpressionEngine`] – the timer-driven face state machine.
//!
//! Two independent dwell timers drive the idle face:
//!
//! - the **blink** timer closes the eyes for 250 ms and then re-opens them
//!   after a random 1–5 s dwell;
//! - the **drowse** timer alternates the tired eyes every random 1–10 s,
//!   but only while the eyes are open.
//!
//! The blink rule is evaluated first and the drowse rule second, so the
//! drowse rule sees any expression the blink rule just produced.  Both may
//! fire on the same tick.  This ordering is load-bearing: changing it
//! changes the produced expression sequence.
//!
//! The sequence is infinite and restartable; there is no terminal state.

use std::sync::Arc;
use std::time::Duration;

use pupbot_hal::clock::{Clock, Stopwatch};
use pupbot_types::Expression;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// How long the eyes stay closed during a blink.
const BLINK_CLOSED: Duration = Duration::from_millis(250);

/// Cycles the idle face through blink and drowsiness states.
///
/// The RNG is an explicit dependency: seed it for deterministic dwell
/// sequences in tests, or construct from entropy on the robot.
pub struct ExpressionEngine {
    blink: Stopwatch,
    blink_deadline: Duration,
    drowse: Stopwatch,
    drowse_deadline: Duration,
    rng: StdRng,
}

impl ExpressionEngine {
    /// Both deadlines start at zero, so both rules fire on the first tick
    /// with any elapsed time.
    pub fn new(clock: Arc<dyn Clock>, rng: StdRng) -> Self {
        Self {
            blink: Stopwatch::new(clock.clone()),
            blink_deadline: Duration::ZERO,
            drowse: Stopwatch::new(clock),
            drowse_deadline: Duration::ZERO,
            rng,
        }
    }

    pub fn seeded(clock: Arc<dyn Clock>, seed: u64) -> Self {
        Self::new(clock, StdRng::seed_from_u64(seed))
    }

    /// Advance the state machine one step and return the expression the
    /// face should show now.  Called once per idle tick of the behavior
    /// loop; returns `current` unchanged when neither timer has expired.
    pub fn next(&mut self, current: Expression) -> Expression {
        let mut expression = current;

        if self.blink.time() > self.blink_deadline {
            self.blink.reset();
            if expression == Expression::Sleeping {
                self.blink_deadline = self.random_dwell(1..=5);
                expression = Expression::TiredRight;
            } else {
                self.blink_deadline = BLINK_CLOSED;
                expression = Expression::Sleeping;
            }
        }

        if self.drowse.time() > self.drowse_deadline {
            self.drowse.reset();
            // While the eyes are closed the drowse timer restarts without
            // touching its deadline or the expression.
            if expression != Expression::Sleeping {
                self.drowse_deadline = self.random_dwell(1..=10);
                expression = if expression != Expression::TiredLeft {
                    Expression::TiredLeft
                } else {
                    Expression::TiredRight
                };
            }
        }

        expression
    }

    /// Restart both timers and zero both deadlines, as at construction.
    pub fn reset(&mut self) {
        self.blink.reset();
        self.blink_deadline = Duration::ZERO;
        self.drowse.reset();
        self.drowse_deadline = Duration::ZERO;
    }

    /// Whole-second uniform dwell in `seconds`.
    fn random_dwell(&mut self, seconds: std::ops::RangeInclusive<u64>) -> Duration {
        Duration::from_millis(self.rng.gen_range(seconds) * 1000)
    }

    /// Current blink deadline (observability for callers and tests).
    pub fn blink_deadline(&self) -> Duration {
        self.blink_deadline
    }

    /// Current drowse deadline.
    pub fn drowse_deadline(&self) -> Duration {
        self.drowse_deadline
    }
}
