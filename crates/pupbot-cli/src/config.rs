//! Rig configuration – reads/writes `~/.pupbot/config.toml`.
//!
//! The file describes how the puppy is physically assembled: which port
//! each motor and sensor is plugged into, the mount direction of each
//! motor, and the head's gear train.  Validation runs before the behavior
//! loop starts; a bad assignment is a
//! [`ConfigurationFault`][pupbot_types::PupError::ConfigurationFault] and
//! the process fails fast.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use pupbot_types::{Direction, GearTrain, MotorPort, PupError, SensorPort};

/// Physical assembly of one motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MotorConfig {
    pub port: MotorPort,
    pub direction: Direction,
    /// Gear train between the motor and its output shaft, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gears: Option<GearTrain>,
}

/// Persisted rig configuration stored in `~/.pupbot/config.toml`.
///
/// Defaults match the reference build: legs on ports D and A, the head on
/// port C behind a 1:24 then 12:36 reduction, all motors mounted
/// counterclockwise, touch sensor on S1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_left_leg")]
    pub left_leg: MotorConfig,

    #[serde(default = "default_right_leg")]
    pub right_leg: MotorConfig,

    #[serde(default = "default_head")]
    pub head: MotorConfig,

    /// Port of the back touch sensor.
    #[serde(default = "default_touch_port")]
    pub touch: SensorPort,

    /// Seed for the expression dwell timers.  Unset means seed from
    /// entropy; set it to make a demo run reproducible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_left_leg() -> MotorConfig {
    MotorConfig {
        port: MotorPort::D,
        direction: Direction::Counterclockwise,
        gears: None,
    }
}

fn default_right_leg() -> MotorConfig {
    MotorConfig {
        port: MotorPort::A,
        direction: Direction::Counterclockwise,
        gears: None,
    }
}

fn default_head() -> MotorConfig {
    MotorConfig {
        port: MotorPort::C,
        direction: Direction::Counterclockwise,
        gears: Some(GearTrain(vec![(1, 24), (12, 36)])),
    }
}

fn default_touch_port() -> SensorPort {
    SensorPort::S1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            left_leg: default_left_leg(),
            right_leg: default_right_leg(),
            head: default_head(),
            touch: default_touch_port(),
            seed: None,
        }
    }
}

impl Config {
    /// Check the assembly for contradictions before any hardware is
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`PupError::ConfigurationFault`] when two motors share a
    /// port or a configured gear train is degenerate.
    pub fn validate(&self) -> Result<(), PupError> {
        let ports = [
            ("left_leg", self.left_leg.port),
            ("right_leg", self.right_leg.port),
            ("head", self.head.port),
        ];
        for (i, (name_a, port_a)) in ports.iter().enumerate() {
            for (name_b, port_b) in &ports[i + 1..] {
                if port_a == port_b {
                    return Err(PupError::ConfigurationFault(format!(
                        "{name_a} and {name_b} are both assigned to port {port_a:?}"
                    )));
                }
            }
        }
        for motor in [&self.left_leg, &self.right_leg, &self.head] {
            if let Some(train) = &motor.gears {
                train.ratio()?;
            }
        }
        Ok(())
    }
}

/// Return the path to `~/.pupbot/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".pupbot").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `PUPBOT_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `PUPBOT_SEED` | `seed` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("PUPBOT_SEED")
        && let Ok(seed) = v.parse::<u64>()
    {
        cfg.seed = Some(seed);
    }
}

/// Save the config to disk, creating `~/.pupbot/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Restrict the config directory to the owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Write the file with owner-only read/write (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn config_file_has_restrictive_permissions() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        let file_meta = std::fs::metadata(&path).expect("file metadata");
        let file_mode = file_meta.permissions().mode() & 0o777;
        assert_eq!(file_mode, 0o600, "config file must have 0o600 permissions");

        let dir_meta = std::fs::metadata(path.parent().unwrap()).expect("dir metadata");
        let dir_mode = dir_meta.permissions().mode() & 0o777;
        assert_eq!(dir_mode, 0o700, "config directory must have 0o700 permissions");
    }

    #[test]
    fn roundtrip_default_config() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());

        let cfg = Config::default();
        save_to(&cfg, &path).expect("save");

        // seed is subject to env overrides in load_from; compare the
        // assembly fields.
        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.left_leg, cfg.left_leg);
        assert_eq!(loaded.right_leg, cfg.right_leg);
        assert_eq!(loaded.head, cfg.head);
        assert_eq!(loaded.touch, cfg.touch);
        assert_eq!(loaded.head.gears, Some(GearTrain(vec![(1, 24), (12, 36)])));
    }

    #[test]
    fn default_config_validates() {
        Config::default().validate().expect("defaults must be valid");
    }

    #[test]
    fn duplicate_motor_ports_fail_validation() {
        let mut cfg = Config::default();
        cfg.right_leg.port = cfg.left_leg.port;
        assert!(matches!(
            cfg.validate(),
            Err(PupError::ConfigurationFault(_))
        ));
    }

    #[test]
    fn degenerate_gear_train_fails_validation() {
        let mut cfg = Config::default();
        cfg.head.gears = Some(GearTrain(vec![(0, 24)]));
        assert!(matches!(
            cfg.validate(),
            Err(PupError::ConfigurationFault(_))
        ));
    }

    #[test]
    fn config_path_points_to_pupbot_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".pupbot"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    // Serializes the tests that mutate PUPBOT_SEED.
    static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

    #[test]
    fn apply_env_overrides_sets_seed() {
        let _guard = ENV_LOCK.lock().unwrap();
        // SAFETY: ENV_LOCK holds off the other env-mutating test.
        unsafe { std::env::set_var("PUPBOT_SEED", "1234") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.seed, Some(1234));
        unsafe { std::env::remove_var("PUPBOT_SEED") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_seed() {
        let _guard = ENV_LOCK.lock().unwrap();
        // SAFETY: ENV_LOCK holds off the other env-mutating test.
        unsafe { std::env::set_var("PUPBOT_SEED", "not-a-seed") };
        let mut cfg = Config::default();
        apply_env_overrides(&mut cfg);
        assert_eq!(cfg.seed, None);
        unsafe { std::env::remove_var("PUPBOT_SEED") };
    }

    #[test]
    fn partial_config_file_fills_in_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "touch = \"S2\"\n").unwrap();

        let loaded = load_from(&path).expect("load ok").expect("some");
        assert_eq!(loaded.touch, SensorPort::S2);
        assert_eq!(loaded.left_leg, default_left_leg());
        assert_eq!(loaded.head, default_head());
    }
}
