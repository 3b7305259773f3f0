use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Face artwork the puppy can show on its display.
///
/// [`Expression::Icon`] is the boot face shown before the first interaction.
/// The display is only redrawn when the expression actually changes; that
/// change detection lives in the runtime's `Face`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    /// Shown after a successful petting.
    Heart,
    /// Shown for the duration of the bathroom routine.
    Squinty,
    /// Eyes closed; the short-cycle blink timer parks here between blinks.
    Sleeping,
    TiredLeft,
    TiredRight,
    /// Boot/default face.
    Icon,
}

impl Expression {
    /// The display artwork backing this expression.
    pub fn image(self) -> ImageRef {
        match self {
            Expression::Heart => ImageRef::HeartEyes,
            Expression::Squinty => ImageRef::SquintyEyes,
            Expression::Sleeping => ImageRef::SleepingEyes,
            Expression::TiredLeft => ImageRef::TiredLeftEyes,
            Expression::TiredRight => ImageRef::TiredRightEyes,
            Expression::Icon => ImageRef::BootIcon,
        }
    }
}

/// An image asset known to the display driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageRef {
    HeartEyes,
    SquintyEyes,
    SleepingEyes,
    TiredLeftEyes,
    TiredRightEyes,
    BootIcon,
}

/// A sound asset known to the speaker driver.  Playback is fire-and-forget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundRef {
    /// Played when the touch sensor registers a pet.
    DogBark,
    /// Played during the bathroom routine.
    Horn,
}

/// Status light colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Color {
    /// Behavior loop running, attention wanted.
    Orange,
    /// Clean shutdown complete.
    Green,
}

/// Physical buttons on the brick face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Button {
    Up,
    Down,
    Left,
    Right,
    /// The designated exit button.
    Center,
}

/// Named leg-angle stops, in degrees of output-shaft rotation.
///
/// Invariant: `HalfUp < StandUp < Stretch`; each is a valid physical stop
/// for the leg mechanism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegTarget {
    HalfUp,
    StandUp,
    Stretch,
}

impl LegTarget {
    /// Output-shaft angle for this stop.
    pub fn degrees(self) -> f32 {
        match self {
            LegTarget::HalfUp => 25.0,
            LegTarget::StandUp => 65.0,
            LegTarget::Stretch => 125.0,
        }
    }
}

/// Motor output ports on the brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotorPort {
    A,
    B,
    C,
    D,
}

/// Sensor input ports on the brick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensorPort {
    S1,
    S2,
    S3,
    S4,
}

/// Positive rotation direction of a motor as mounted.
///
/// The sign is folded into the per-motor angle transform so that all
/// higher-level code works in the output-shaft frame with a consistent
/// positive direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Clockwise,
    Counterclockwise,
}

impl Direction {
    /// Multiplier applied to commanded angles and velocities.
    pub fn sign(self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::Counterclockwise => -1.0,
        }
    }
}

/// A gear train between a motor shaft and its output shaft, as a list of
/// meshed `(driver, follower)` tooth-count pairs.
///
/// The overall ratio is the product of `follower / driver` over all pairs:
/// commanding 1° of output rotation turns the motor shaft `ratio()`°.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GearTrain(pub Vec<(u32, u32)>);

impl GearTrain {
    /// Motor-shaft degrees per output-shaft degree.
    ///
    /// # Errors
    ///
    /// Returns [`PupError::ConfigurationFault`] for an empty train or a
    /// zero tooth count.
    pub fn ratio(&self) -> Result<f32, PupError> {
        if self.0.is_empty() {
            return Err(PupError::ConfigurationFault(
                "gear train has no gear pairs".to_string(),
            ));
        }
        let mut ratio = 1.0f32;
        for &(driver, follower) in &self.0 {
            if driver == 0 || follower == 0 {
                return Err(PupError::ConfigurationFault(format!(
                    "gear pair ({driver}, {follower}) has a zero tooth count"
                )));
            }
            ratio *= follower as f32 / driver as f32;
        }
        Ok(ratio)
    }
}

/// Global error type spanning hardware failures and startup misconfiguration.
///
/// Both variants are fatal: faults propagate to process exit without retry,
/// and configuration errors fail fast before the behavior loop starts.
#[derive(Error, Debug)]
pub enum PupError {
    #[error("hardware fault on {component}: {details}")]
    HardwareFault { component: String, details: String },

    #[error("invalid rig configuration: {0}")]
    ConfigurationFault(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leg_targets_are_monotonic() {
        assert!(LegTarget::HalfUp.degrees() < LegTarget::StandUp.degrees());
        assert!(LegTarget::StandUp.degrees() < LegTarget::Stretch.degrees());
    }

    #[test]
    fn every_expression_has_distinct_artwork() {
        let all = [
            Expression::Heart,
            Expression::Squinty,
            Expression::Sleeping,
            Expression::TiredLeft,
            Expression::TiredRight,
            Expression::Icon,
        ];
        for a in all {
            for b in all {
                if a != b {
                    assert_ne!(a.image(), b.image(), "{a:?} and {b:?} share artwork");
                }
            }
        }
    }

    #[test]
    fn direction_signs() {
        assert_eq!(Direction::Clockwise.sign(), 1.0);
        assert_eq!(Direction::Counterclockwise.sign(), -1.0);
    }

    #[test]
    fn head_gear_train_ratio_is_72() {
        // The head motor's double reduction: 1:24 then 12:36.
        let train = GearTrain(vec![(1, 24), (12, 36)]);
        let ratio = train.ratio().unwrap();
        assert!((ratio - 72.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_gear_train_is_a_configuration_fault() {
        let train = GearTrain(vec![]);
        assert!(matches!(
            train.ratio(),
            Err(PupError::ConfigurationFault(_))
        ));
    }

    #[test]
    fn zero_tooth_count_is_a_configuration_fault() {
        let train = GearTrain(vec![(1, 24), (0, 36)]);
        assert!(matches!(
            train.ratio(),
            Err(PupError::ConfigurationFault(_))
        ));
    }

    #[test]
    fn gear_train_toml_shape_roundtrip() {
        // Serialized transparently so config files can write gears = [[1,24],[12,36]].
        let train = GearTrain(vec![(1, 24), (12, 36)]);
        let json = serde_json::to_string(&train).unwrap();
        assert_eq!(json, "[[1,24],[12,36]]");
        let back: GearTrain = serde_json::from_str(&json).unwrap();
        assert_eq!(train, back);
    }

    #[test]
    fn direction_serializes_lowercase() {
        let json = serde_json::to_string(&Direction::Counterclockwise).unwrap();
        assert_eq!(json, "\"counterclockwise\"");
    }

    #[test]
    fn pup_error_display() {
        let err = PupError::HardwareFault {
            component: "left_leg".to_string(),
            details: "stalled".to_string(),
        };
        assert!(err.to_string().contains("left_leg"));

        let err2 = PupError::ConfigurationFault("duplicate port".to_string());
        assert!(err2.to_string().contains("duplicate port"));
    }
}
