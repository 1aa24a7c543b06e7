//! Defines all configuration structures for Clockwork.
//!
//! These structs are designed to be deserialized from a configuration file
//! (e.g., a TOML file) using `serde`, layered with `CLOCKWORK__*`
//! environment variables through the `config` crate. Every field has a
//! default, so an empty or missing file yields the classic clock.

use crate::error::Result;
use crate::model::Rectangle;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// The top-level configuration for a `ClockApp`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockConfig {
    /// How often the timer samples the wall clock.
    #[serde(default)]
    pub resolution: ClockResolution,

    /// The timezone the timer reads the time in. Uses the IANA names
    /// (e.g., "Europe/Paris"). Defaults to UTC.
    #[serde(default = "default_timezone")]
    pub timezone: Tz,

    /// Which undo/redo storage policy the coordinator uses.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// Geometry of the three hands.
    #[serde(default)]
    pub hands: HandsConfig,
}

/// Defines the sampling speed of the `ClockTimer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockResolution {
    /// One sample per second. Enough for a seconds hand.
    #[default]
    Low,
    /// Two samples per second.
    Medium,
    /// Ten samples per second.
    High,
    /// A user-defined period.
    Custom { millis: u64 },
}

impl ClockResolution {
    pub fn period(&self) -> Duration {
        match self {
            ClockResolution::Low => Duration::from_secs(1),
            ClockResolution::Medium => Duration::from_millis(500),
            ClockResolution::High => Duration::from_millis(100),
            ClockResolution::Custom { millis } => Duration::from_millis((*millis).max(1)),
        }
    }
}

/// Selects the `UndoRedoStrategy` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Two stacks: undo and redo.
    #[default]
    Stack,
    /// A single history list with a cursor.
    List,
}

/// Bounds of the three clock hands.
#[derive(Debug, Clone, Deserialize)]
pub struct HandsConfig {
    #[serde(default = "default_hours_hand")]
    pub hours: Rectangle,
    #[serde(default = "default_minutes_hand")]
    pub minutes: Rectangle,
    #[serde(default = "default_seconds_hand")]
    pub seconds: Rectangle,
}

impl ClockConfig {
    /// Loads the configuration from an optional TOML file, then applies
    /// `CLOCKWORK__*` environment overrides (e.g. `CLOCKWORK__STRATEGY=list`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Like `load`, reading overrides from `env` instead of the process
    /// environment when it is given.
    fn load_with_env(path: Option<&Path>, env: Option<config::Map<String, String>>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let overrides = config::Environment::with_prefix("CLOCKWORK")
            .separator("__")
            .source(env);
        let settings = builder.add_source(overrides).build()?;
        Ok(settings.try_deserialize()?)
    }
}

// --- Default value functions for serde ---

fn default_timezone() -> Tz {
    Tz::UTC
}

fn default_hours_hand() -> Rectangle {
    Rectangle::new(10.0, 10.0, 20.0, 20.0)
}

fn default_minutes_hand() -> Rectangle {
    Rectangle::new(10.0, 10.0, 40.0, 20.0)
}

fn default_seconds_hand() -> Rectangle {
    Rectangle::new(10.0, 10.0, 60.0, 20.0)
}

impl Default for HandsConfig {
    fn default() -> Self {
        Self {
            hours: default_hours_hand(),
            minutes: default_minutes_hand(),
            seconds: default_seconds_hand(),
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            resolution: ClockResolution::default(),
            timezone: default_timezone(),
            strategy: StrategyKind::default(),
            hands: HandsConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(raw: &str) -> ClockConfig {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_file_gives_defaults() {
        let cfg = from_toml("");
        assert_eq!(cfg.resolution, ClockResolution::Low);
        assert_eq!(cfg.strategy, StrategyKind::Stack);
        assert_eq!(cfg.timezone, Tz::UTC);
        assert_eq!(cfg.hands.seconds, Rectangle::new(10.0, 10.0, 60.0, 20.0));
    }

    #[test]
    fn reads_every_section() {
        let cfg = from_toml(
            r#"
            strategy = "list"
            timezone = "Europe/Paris"

            [resolution.custom]
            millis = 250

            [hands.hours]
            left = 0.0
            top = 0.0
            right = 5.0
            bottom = 5.0
            "#,
        );
        assert_eq!(cfg.strategy, StrategyKind::List);
        assert_eq!(cfg.timezone, chrono_tz::Europe::Paris);
        assert_eq!(cfg.resolution.period(), Duration::from_millis(250));
        assert_eq!(cfg.hands.hours, Rectangle::new(0.0, 0.0, 5.0, 5.0));
        assert_eq!(cfg.hands.minutes, Rectangle::new(10.0, 10.0, 40.0, 20.0));
    }

    #[test]
    fn named_resolutions_map_to_periods() {
        assert_eq!(ClockResolution::Low.period(), Duration::from_secs(1));
        assert_eq!(ClockResolution::High.period(), Duration::from_millis(100));
        assert_eq!(
            ClockResolution::Custom { millis: 0 }.period(),
            Duration::from_millis(1)
        );
    }

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let cfg = ClockConfig::load_with_env(Some(Path::new("does/not/exist.toml")), env(&[])).unwrap();
        assert_eq!(cfg.strategy, StrategyKind::Stack);
    }

    #[test]
    fn environment_overrides_the_strategy() {
        let cfg = ClockConfig::load_with_env(None, env(&[("CLOCKWORK__STRATEGY", "list")])).unwrap();
        assert_eq!(cfg.strategy, StrategyKind::List);
        assert_eq!(cfg.resolution, ClockResolution::Low);
    }

    #[test]
    fn unprefixed_variables_are_ignored() {
        let cfg = ClockConfig::load_with_env(None, env(&[("STRATEGY", "list")])).unwrap();
        assert_eq!(cfg.strategy, StrategyKind::Stack);
    }
}
