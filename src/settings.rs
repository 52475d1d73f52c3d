//src/settings.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;

use crate::units::WeightUnit;

/// Default rest between sets, in seconds (3 minutes).
pub const DEFAULT_REST_TIMER_DURATION: u32 = 180;

/// Rest-timer durations offered by front ends (1 to 5 minutes).
pub const REST_TIMER_OPTIONS: [u32; 6] = [60, 90, 120, 180, 240, 300];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Rest timer duration must be greater than zero (got {0}).")]
    InvalidTimerDuration(u32),
    #[error("Invalid theme name: {0}")]
    InvalidTheme(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Light => write!(f, "light"),
            Self::Dark => write!(f, "dark"),
            Self::System => write!(f, "system"),
        }
    }
}

// Helper to parse a string into our Theme enum
pub fn parse_theme(theme_str: &str) -> Result<Theme, SettingsError> {
    for theme in Theme::iter() {
        if format!("{theme:?}").eq_ignore_ascii_case(theme_str) {
            return Ok(theme);
        }
    }
    Err(SettingsError::InvalidTheme(theme_str.to_string()))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)] // Ensure defaults are used if fields are missing
pub struct Settings {
    pub rest_timer_duration: u32,
    pub sound_enabled: bool,
    pub haptics_enabled: bool,
    pub theme: Theme,
    pub weight_unit: WeightUnit,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rest_timer_duration: DEFAULT_REST_TIMER_DURATION,
            sound_enabled: true,
            haptics_enabled: true,
            theme: Theme::default(),
            weight_unit: WeightUnit::default(),
        }
    }
}

impl Settings {
    /// Validates a rest-timer duration before it is stored.
    /// # Errors
    /// `SettingsError::InvalidTimerDuration` if `seconds` is zero.
    pub fn set_rest_timer_duration(&mut self, seconds: u32) -> Result<(), SettingsError> {
        if seconds == 0 {
            return Err(SettingsError::InvalidTimerDuration(seconds));
        }
        self.rest_timer_duration = seconds;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_merge_with_defaults() {
        // A settings blob written by an older version only knows about the
        // timer duration.
        let settings: Settings = serde_json::from_str(r#"{"rest_timer_duration": 90}"#).unwrap();
        assert_eq!(settings.rest_timer_duration, 90);
        assert!(settings.sound_enabled);
        assert!(settings.haptics_enabled);
        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.weight_unit, WeightUnit::Kg);
    }

    #[test]
    fn test_parse_theme_is_case_insensitive() {
        assert_eq!(parse_theme("dark"), Ok(Theme::Dark));
        assert_eq!(parse_theme("LIGHT"), Ok(Theme::Light));
        assert_eq!(parse_theme("System"), Ok(Theme::System));
        assert!(matches!(parse_theme("solarized"), Err(SettingsError::InvalidTheme(_))));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let mut settings = Settings::default();
        assert_eq!(
            settings.set_rest_timer_duration(0),
            Err(SettingsError::InvalidTimerDuration(0))
        );
        assert_eq!(settings.rest_timer_duration, DEFAULT_REST_TIMER_DURATION);
    }
}
