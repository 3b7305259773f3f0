//! Brick-face peripherals: display, speaker, and status light.

use pupbot_types::{Color, ImageRef, PupError, SoundRef};

/// The face display.  Loading an image replaces whatever is currently shown.
pub trait Display: Send {
    /// Show `image`, replacing the current one.
    ///
    /// # Errors
    ///
    /// Returns [`PupError::HardwareFault`] if the display is unreachable.
    fn load_image(&mut self, image: ImageRef) -> Result<(), PupError>;
}

/// The speaker.  Playback is fire-and-forget; the call returns as soon as
/// the sound has been queued.
pub trait Speaker: Send {
    fn play_sound(&mut self, sound: SoundRef) -> Result<(), PupError>;
}

/// The brick status light.
pub trait StatusLight: Send {
    fn set_color(&mut self, color: Color) -> Result<(), PupError>;
}
