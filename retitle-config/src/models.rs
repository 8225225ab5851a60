use anyhow::{Context, anyhow};
use retitle_core::{DEFAULT_NOISE_WORDS, EngineSettings, NoiseWords, Thresholds};
use serde::{Deserialize, Serialize};
use std::{
    env,
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Environment variable pointing at a config file.
pub const CONFIG_PATH_ENV: &str = "RETITLE_CONFIG_PATH";
/// Environment variable holding an inline JSON config.
pub const CONFIG_JSON_ENV: &str = "RETITLE_CONFIG_JSON";

const DEFAULT_CANDIDATES: &[&str] = &[
    "retitle.toml",
    "retitle.json",
    "config/retitle.toml",
    "config/retitle.json",
];

fn default_noise_words() -> Vec<String> {
    DEFAULT_NOISE_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    #[default]
    Default,
    Explicit(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "built-in defaults"),
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::EnvPath(path) => {
                write!(f, "{} (from ${CONFIG_PATH_ENV})", path.display())
            }
            ConfigSource::EnvInline => write!(f, "${CONFIG_JSON_ENV}"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// User-facing engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quality, codec and cut labels stripped from filenames before
    /// comparison. Matched case-insensitively on word boundaries.
    #[serde(alias = "WORDS_TO_REMOVE_FROM_FILENAME")]
    pub noise_words: Vec<String>,
    /// Minimum similarity (0-100) for renaming without asking.
    #[serde(alias = "SIMILARITY_THRESHOLD_AUTO")]
    pub auto_threshold: u32,
    /// Similarity (0-100) that must be exceeded before asking.
    #[serde(alias = "SIMILARITY_THRESHOLD_ASK")]
    pub ask_threshold: u32,
    /// Largest filename/canonical year distance still counted as a match.
    #[serde(alias = "YEAR_MATCH_DIFFERENCE_AUTO")]
    pub year_tolerance: u16,
    /// Append-only rename log.
    #[serde(alias = "LOG_FILE")]
    pub audit_log: PathBuf,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            noise_words: default_noise_words(),
            auto_threshold: 100,
            ask_threshold: 85,
            year_tolerance: 1,
            audit_log: PathBuf::from("rename.log"),
        }
    }
}

impl EngineConfig {
    /// Resolve configuration from the process environment.
    ///
    /// Evaluation order:
    /// 1) `explicit` path (the `--config` flag),
    /// 2) `$RETITLE_CONFIG_PATH` (TOML or JSON file),
    /// 3) `$RETITLE_CONFIG_JSON` (inline JSON),
    /// 4) the first existing default file in the working directory,
    /// 5) defaults.
    pub fn load(
        explicit: Option<&Path>,
    ) -> anyhow::Result<(Self, ConfigSource)> {
        Self::resolve(explicit, |key| env::var(key).ok(), Path::new("."))
    }

    /// [`EngineConfig::load`] with injectable environment lookup and base
    /// directory for the default file candidates.
    pub fn resolve<E>(
        explicit: Option<&Path>,
        env_lookup: E,
        base_dir: &Path,
    ) -> anyhow::Result<(Self, ConfigSource)>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(path) = explicit {
            let config = Self::load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.to_path_buf())));
        }

        if let Some(path_str) = env_lookup(CONFIG_PATH_ENV)
            && !path_str.trim().is_empty()
        {
            let path = PathBuf::from(path_str);
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = env_lookup(CONFIG_JSON_ENV)
            && !raw.trim().is_empty()
        {
            let parsed = Self::parse_json(&raw)
                .with_context(|| format!("failed to parse {CONFIG_JSON_ENV}"))?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = Self::find_default_file(base_dir) {
            let config = Self::load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        debug!("no configuration found; using defaults");
        Ok((Self::default(), ConfigSource::Default))
    }

    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read config from {}", path.display())
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::parse_json(&contents)
                .with_context(|| format!("invalid config {}", path.display())),
            Some("toml") | Some("tml") => toml::from_str(&contents)
                .map_err(|err| anyhow!("invalid config {}: {}", path.display(), err)),
            _ => Self::parse_from_str(&contents, &path.display().to_string()),
        }
    }

    pub fn parse_from_str(contents: &str, origin: &str) -> anyhow::Result<Self> {
        toml::from_str(contents).or_else(|toml_err| {
            serde_json::from_str(contents).map_err(|json_err| {
                anyhow!(
                    "failed to parse config {}: toml error: {}; json error: {}",
                    origin,
                    toml_err,
                    json_err
                )
            })
        })
    }

    pub fn parse_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw)
            .map_err(|err| anyhow!("invalid config json: {err}"))
    }

    fn find_default_file(base_dir: &Path) -> Option<PathBuf> {
        DEFAULT_CANDIDATES
            .iter()
            .map(|candidate| base_dir.join(candidate))
            .find(|path| path.exists())
    }

    /// Engine settings for a validated configuration.
    ///
    /// Thresholds are clamped to 100; [`EngineConfig::validate`] rejects
    /// anything larger beforehand.
    pub fn to_settings(&self) -> EngineSettings {
        EngineSettings {
            noise_words: NoiseWords::new(&self.noise_words),
            thresholds: Thresholds {
                auto: clamp_percent(self.auto_threshold),
                ask: clamp_percent(self.ask_threshold),
                year_tolerance: self.year_tolerance,
            },
        }
    }
}

fn clamp_percent(value: u32) -> u8 {
    u8::try_from(value.min(100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_renamer() {
        let config = EngineConfig::default();
        assert_eq!(config.auto_threshold, 100);
        assert_eq!(config.ask_threshold, 85);
        assert_eq!(config.year_tolerance, 1);
        assert!(config.noise_words.iter().any(|w| w == "director's cut"));
        assert_eq!(config.audit_log, PathBuf::from("rename.log"));
    }

    #[test]
    fn accepts_legacy_uppercase_keys() {
        let json = r#"{
            "WORDS_TO_REMOVE_FROM_FILENAME": ["1080p", "x264"],
            "SIMILARITY_THRESHOLD_AUTO": 95,
            "SIMILARITY_THRESHOLD_ASK": 80,
            "YEAR_MATCH_DIFFERENCE_AUTO": 0,
            "PLEX_TOKEN": "ignored"
        }"#;
        let config = EngineConfig::parse_json(json).unwrap();
        assert_eq!(config.noise_words, vec!["1080p", "x264"]);
        assert_eq!(config.auto_threshold, 95);
        assert_eq!(config.ask_threshold, 80);
        assert_eq!(config.year_tolerance, 0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config =
            EngineConfig::parse_from_str("ask_threshold = 70\n", "inline").unwrap();
        assert_eq!(config.ask_threshold, 70);
        assert_eq!(config.auto_threshold, 100);
        assert_eq!(config.noise_words, default_noise_words());
    }

    #[test]
    fn settings_carry_thresholds() {
        let config = EngineConfig {
            noise_words: vec!["x264".into()],
            auto_threshold: 96,
            ask_threshold: 70,
            year_tolerance: 2,
            ..EngineConfig::default()
        };
        let settings = config.to_settings();
        assert_eq!(settings.thresholds.auto, 96);
        assert_eq!(settings.thresholds.ask, 70);
        assert_eq!(settings.thresholds.year_tolerance, 2);
        assert_eq!(settings.noise_words.words(), ["x264".to_string()]);
    }
}
