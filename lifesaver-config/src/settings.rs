// Typed settings and the layered loader that produces them

use crate::env::EnvLoader;
use crate::validation::{ConfigValidator, Validate};
use crate::{ConfigError, ConfigLoader, FileFormat, Result};
use lifesaver_log::{Format, Level, debug, info};
use lifesaver_validation::{FieldValidator, NaiveZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::Path;

/// Largest accepted UTC offset for naive date-times, in minutes (18 hours).
pub const MAX_OFFSET_MINUTES: i32 = 18 * 60;

/// All LifeSaver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub validation: ValidationSettings,
    pub log: LogSettings,
}

impl Settings {
    /// `.env` (if present) and `LIFESAVER_*` variables over the defaults.
    pub fn from_env() -> Result<Self> {
        SettingsLoader::new().dotenv(None)?.env().load()
    }

    /// Push log settings into the logger and build the configured validator.
    pub fn install(&self) -> Result<FieldValidator> {
        self.log.apply()?;
        self.validation.field_validator()
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        self.validation.validate()?;
        self.log.validate()
    }
}

/// `[validation]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSettings {
    /// Offset for date-times without one. Absent means the host's zone.
    pub naive_utc_offset_minutes: Option<i32>,

    /// Report only the first failing check of a form.
    pub fail_fast: bool,
}

impl ValidationSettings {
    pub fn naive_zone(&self) -> Result<NaiveZone> {
        let Some(minutes) = self.naive_utc_offset_minutes else {
            return Ok(NaiveZone::Local);
        };
        ConfigValidator::in_range(
            minutes,
            -MAX_OFFSET_MINUTES,
            MAX_OFFSET_MINUTES,
            "validation.naive_utc_offset_minutes",
        )?;
        NaiveZone::fixed_minutes(minutes).ok_or_else(|| {
            ConfigError::ValidationError(format!("invalid UTC offset: {} minutes", minutes))
        })
    }

    /// Validator with the system clock and these settings.
    pub fn field_validator(&self) -> Result<FieldValidator> {
        Ok(FieldValidator::new()
            .with_naive_zone(self.naive_zone()?)
            .fail_fast(self.fail_fast))
    }
}

impl Validate for ValidationSettings {
    fn validate(&self) -> Result<()> {
        self.naive_zone().map(|_| ())
    }
}

/// `[log]` section. Unset values leave the logger's own configuration alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: Option<String>,
    pub format: Option<String>,
}

impl LogSettings {
    pub fn level(&self) -> Result<Option<Level>> {
        self.level
            .as_deref()
            .map(|s| {
                s.parse::<Level>()
                    .map_err(|e| ConfigError::ValidationError(format!("log.level: {}", e)))
            })
            .transpose()
    }

    pub fn format(&self) -> Result<Option<Format>> {
        self.format
            .as_deref()
            .map(|s| {
                s.parse::<Format>()
                    .map_err(|e| ConfigError::ValidationError(format!("log.format: {}", e)))
            })
            .transpose()
    }

    pub fn apply(&self) -> Result<()> {
        if let Some(level) = self.level()? {
            lifesaver_log::set_level(level);
        }
        if let Some(format) = self.format()? {
            lifesaver_log::set_format(format);
        }
        Ok(())
    }
}

impl Validate for LogSettings {
    fn validate(&self) -> Result<()> {
        if let Some(level) = &self.level {
            ConfigValidator::parses::<Level>(level, "log.level")?;
        }
        if let Some(format) = &self.format {
            ConfigValidator::parses::<Format>(format, "log.format")?;
        }
        Ok(())
    }
}

/// Layers settings sources; later layers override earlier ones key by key.
///
/// ```
/// use lifesaver_config::{FileFormat, SettingsLoader};
///
/// let settings = SettingsLoader::new()
///     .str("[validation]\nfail_fast = true", FileFormat::Toml)
///     .unwrap()
///     .env_vars([("LIFESAVER_LOG_LEVEL".to_string(), "warn".to_string())])
///     .load()
///     .unwrap();
///
/// assert!(settings.validation.fail_fast);
/// assert_eq!(settings.log.level.as_deref(), Some("warn"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SettingsLoader {
    layers: Vec<Value>,
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a settings tree.
    pub fn value(mut self, layer: Value) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a settings file, format taken from its extension.
    pub fn file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let layer = ConfigLoader::auto(path)?.load_file(path)?;
        info!(target: "lifesaver::config", "Loaded settings from {}", path.display());
        Ok(self.value(layer))
    }

    /// Like [`file`](Self::file), but a missing file is skipped.
    pub fn optional_file(self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            self.file(path)
        } else {
            debug!(target: "lifesaver::config", "No settings file at {}", path.display());
            Ok(self)
        }
    }

    /// Add settings given as text.
    pub fn str(self, content: &str, format: FileFormat) -> Result<Self> {
        let layer = ConfigLoader::new(format).parse(content)?;
        Ok(self.value(layer))
    }

    /// Load a `.env` file into the process environment. Call before
    /// [`env`](Self::env) so its variables are picked up.
    pub fn dotenv(self, path: Option<&Path>) -> Result<Self> {
        crate::env::load_dotenv(path)?;
        Ok(self)
    }

    /// Add `LIFESAVER_*` process variables.
    pub fn env(self) -> Self {
        let layer = EnvLoader::default().to_value();
        self.value(layer)
    }

    /// Add explicit `LIFESAVER_*` variables.
    pub fn env_vars<I>(self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let layer = EnvLoader::default().to_value_from(vars);
        self.value(layer)
    }

    /// Merge all layers, deserialize and validate.
    pub fn load(&self) -> Result<Settings> {
        let mut merged = Value::Object(Map::new());
        for layer in &self.layers {
            merge(&mut merged, layer.clone());
        }

        let settings: Settings = serde_json::from_value(merged)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        settings.validate()?;

        debug!(
            target: "lifesaver::config",
            "Settings resolved from {} layer(s): {:?}",
            self.layers.len(),
            settings
        );
        Ok(settings)
    }
}

/// Deep-merge `layer` into `base`. Objects merge by key, anything else
/// replaces.
fn merge(base: &mut Value, layer: Value) {
    match (base, layer) {
        (Value::Object(base), Value::Object(layer)) => {
            for (key, value) in layer {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, layer) => *base = layer,
    }
}
