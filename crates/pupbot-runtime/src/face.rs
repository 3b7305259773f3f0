//! [`Face`] – change-detecting display frontend.
//!
//! All expression changes go through [`Face::show`], which only touches the
//! display when the expression actually changes.  Callers can therefore
//! re-show the current expression every tick without redundant redraws.

use pupbot_hal::panel::Display;
use pupbot_types::{Expression, PupError};

/// The puppy's face: a display plus the expression currently on it.
///
/// Starts blank; the first [`Face::show`] always draws.
pub struct Face {
    display: Box<dyn Display>,
    current: Option<Expression>,
}

impl Face {
    pub fn new(display: Box<dyn Display>) -> Self {
        Self {
            display,
            current: None,
        }
    }

    /// Show `expression`, drawing only if it differs from what is already
    /// on the display.
    pub fn show(&mut self, expression: Expression) -> Result<(), PupError> {
        if self.current != Some(expression) {
            self.display.load_image(expression.image())?;
            self.current = Some(expression);
        }
        Ok(())
    }

    /// The expression currently on the display, if any has been shown yet.
    pub fn current(&self) -> Option<Expression> {
        self.current
    }
}
