//! [`PatCounter`] – bounded interaction counter.
//!
//! Each registered pet bumps the counter; at three the behavior loop runs
//! the bathroom routine and consumes the whole threshold.  The counter
//! never leaves `[0, 3]`.

/// Pets required to arm the bathroom routine.
const THRESHOLD: u8 = 3;

/// Counts pets toward the bathroom threshold, saturating at the threshold.
#[derive(Debug, Default)]
pub struct PatCounter {
    count: u8,
}

impl PatCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one pet.  Saturates at the threshold.
    pub fn bump(&mut self) {
        if self.count < THRESHOLD {
            self.count += 1;
        }
    }

    /// `true` once enough pets have accumulated to trigger the bathroom
    /// routine.
    pub fn at_threshold(&self) -> bool {
        self.count == THRESHOLD
    }

    /// Consume a full threshold's worth of pets, returning the counter to
    /// zero.
    pub fn consume(&mut self) {
        self.count = self.count.saturating_sub(THRESHOLD);
    }

    pub fn count(&self) -> u8 {
        self.count
    }
}
