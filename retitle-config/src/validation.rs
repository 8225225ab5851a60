use thiserror::Error;

use crate::models::EngineConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{field} must be between 0 and 100, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: u32 },
    #[error("audit log path is empty")]
    EmptyAuditLog,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, Default, Clone)]
pub struct ConfigWarnings {
    pub items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push<S: Into<String>>(&mut self, message: S) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint<S: Into<String>, H: Into<String>>(
        &mut self,
        message: S,
        hint: H,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl EngineConfig {
    /// Reject unusable values and collect warnings for suspicious ones.
    ///
    /// Blank noise words are dropped in place.
    pub fn validate(&mut self) -> Result<ConfigWarnings, ConfigValidationError> {
        let mut warnings = ConfigWarnings::default();

        check_percent("auto_threshold", self.auto_threshold)?;
        check_percent("ask_threshold", self.ask_threshold)?;

        if self.audit_log.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyAuditLog);
        }

        if self.ask_threshold > self.auto_threshold {
            warnings.push_with_hint(
                format!(
                    "ask_threshold ({}) is above auto_threshold ({}); no item will ever be asked about",
                    self.ask_threshold, self.auto_threshold
                ),
                "Keep ask_threshold at or below auto_threshold",
            );
        }

        let before = self.noise_words.len();
        self.noise_words.retain(|word| !word.trim().is_empty());
        let dropped = before - self.noise_words.len();
        if dropped > 0 {
            warnings.push(format!("dropped {dropped} blank noise word(s)"));
        }

        if self.noise_words.is_empty() {
            warnings.push_with_hint(
                "noise word list is empty; quality and codec tags will lower similarity scores",
                "Remove noise_words from the config to use the built-in list",
            );
        }

        if self.year_tolerance > 5 {
            warnings.push(format!(
                "year_tolerance of {} years is unusually loose",
                self.year_tolerance
            ));
        }

        Ok(warnings)
    }
}

fn check_percent(
    field: &'static str,
    value: u32,
) -> Result<(), ConfigValidationError> {
    if value > 100 {
        return Err(ConfigValidationError::ThresholdOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_clean() {
        let warnings = EngineConfig::default().validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn out_of_range_threshold_is_an_error() {
        let mut config = EngineConfig {
            auto_threshold: 101,
            ..EngineConfig::default()
        };
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigValidationError::ThresholdOutOfRange {
                field: "auto_threshold",
                value: 101
            }
        );
    }

    #[test]
    fn inverted_thresholds_only_warn() {
        let mut config = EngineConfig {
            auto_threshold: 80,
            ask_threshold: 90,
            ..EngineConfig::default()
        };
        let warnings = config.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings.items[0].message.contains("ask_threshold (90)"));
        assert!(warnings.items[0].hint.is_some());
    }

    #[test]
    fn blank_noise_words_are_dropped() {
        let mut config = EngineConfig {
            noise_words: vec!["".into(), "  ".into()],
            ..EngineConfig::default()
        };
        let warnings = config.validate().unwrap();
        assert!(config.noise_words.is_empty());
        assert_eq!(warnings.len(), 2);
    }
}
