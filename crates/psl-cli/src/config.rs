use anyhow::{Context, Result};
use clap::ValueEnum;
use psl_core::Gender;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How `psl analyze` prints its report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// CLI configuration.
///
/// Sources, lowest precedence first: defaults, TOML file, `PSL_*`
/// environment variables, then command-line flags (applied by the caller).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Gender assumed when `--gender` is not given.
    pub default_gender: Gender,
    /// Age assumed when `--age` is not given.
    pub default_age: u32,
    pub format: OutputFormat,
    /// Maximum number of advice items printed (0 = all).
    pub max_advice: usize,
    /// Print gender-restricted advice regardless of the declared gender.
    pub show_restricted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_gender: Gender::Male,
            default_age: 20,
            format: OutputFormat::Text,
            max_advice: 0,
            show_restricted: false,
        }
    }
}

impl Config {
    /// Load from an explicit file, else `PSL_CONFIG`, else defaults; then
    /// apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("PSL_CONFIG").ok().map(PathBuf::from));
        let base = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        Ok(base.with_env(|key| std::env::var(key).ok()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Overlay `PSL_*` variables read through `lookup`. Unparseable values
    /// are ignored with a warning.
    pub fn with_env(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = &lookup;
        Self {
            default_gender: env_parse(get, "PSL_DEFAULT_GENDER", self.default_gender, |v| v.parse().ok()),
            default_age: env_parse(get, "PSL_DEFAULT_AGE", self.default_age, |v| v.parse().ok()),
            format: env_parse(get, "PSL_FORMAT", self.format, |v| OutputFormat::from_str(v, true).ok()),
            max_advice: env_parse(get, "PSL_MAX_ADVICE", self.max_advice, |v| v.parse().ok()),
            show_restricted: env_parse(get, "PSL_SHOW_RESTRICTED", self.show_restricted, |v| {
                Some(v != "0" && !v.eq_ignore_ascii_case("false"))
            }),
        }
    }
}

fn env_parse<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    current: T,
    parse: impl Fn(&str) -> Option<T>,
) -> T {
    match lookup(key) {
        Some(raw) => parse(raw.trim()).unwrap_or_else(|| {
            tracing::warn!(key, value = %raw, "ignoring unparseable environment override");
            current
        }),
        None => current,
    }
}
