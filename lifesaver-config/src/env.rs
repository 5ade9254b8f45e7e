// Environment variable loading

use crate::{ConfigError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::env;
use std::path::Path;

/// Prefix of every LifeSaver environment variable.
pub const ENV_PREFIX: &str = "LIFESAVER";

/// Reads prefixed environment variables.
pub struct EnvLoader {
    prefix: Option<String>,
}

impl EnvLoader {
    pub fn new(prefix: Option<String>) -> Self {
        Self { prefix }
    }

    /// Variables with the prefix stripped and the key lower-cased.
    pub fn load(&self) -> HashMap<String, String> {
        self.collect(env::vars())
    }

    /// Same as [`load`](Self::load), over an explicit set of variables.
    pub fn collect<I>(&self, vars: I) -> HashMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| match &self.prefix {
                Some(prefix) => strip_prefix(&key, prefix).map(|k| (k.to_lowercase(), value)),
                None => Some((key.to_lowercase(), value)),
            })
            .collect()
    }

    /// Prefixed process variables as a nested settings tree.
    pub fn to_value(&self) -> Value {
        self.to_value_from(env::vars())
    }

    pub fn to_value_from<I>(&self, vars: I) -> Value
    where
        I: IntoIterator<Item = (String, String)>,
    {
        nest_vars(self.collect(vars), None)
    }

    /// Load a specific variable (`key` is upper-cased and prefixed).
    pub fn load_var(&self, key: &str) -> Result<String> {
        let full_key = match &self.prefix {
            Some(prefix) => format!("{}_{}", prefix, key.to_uppercase()),
            None => key.to_uppercase(),
        };

        env::var(&full_key).map_err(ConfigError::EnvError)
    }

    pub fn load_var_or(&self, key: &str, default: &str) -> String {
        self.load_var(key).unwrap_or_else(|_| default.to_string())
    }
}

impl Default for EnvLoader {
    fn default() -> Self {
        Self::new(Some(ENV_PREFIX.to_string()))
    }
}

/// Load a `.env` file into the process environment. Without a path, a
/// missing `.env` in the working directory is not an error.
pub fn load_dotenv(path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            dotenvy::from_path(path)?;
        }
        None => {
            dotenvy::dotenv().ok();
        }
    }
    Ok(())
}

fn strip_prefix<'k>(key: &'k str, prefix: &str) -> Option<&'k str> {
    key.strip_prefix(prefix)?.strip_prefix('_')
}

/// Turn flat `SECTION_KEY=value` pairs into `{"section": {"key": value}}`.
///
/// Keys are lower-cased and split at the first underscore. `true`/`false`
/// and integers become JSON booleans and numbers.
pub fn nest_vars<I, K, V>(vars: I, prefix: Option<&str>) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = Map::new();

    for (key, value) in vars {
        let key = key.as_ref();
        let key = prefix
            .and_then(|p| strip_prefix(key, p))
            .unwrap_or(key)
            .to_lowercase();
        let value = scalar(value.as_ref());

        match key.split_once('_') {
            Some((section, rest)) => {
                let entry = root
                    .entry(section.to_string())
                    .or_insert_with(|| Value::Object(Map::new()));
                if !entry.is_object() {
                    *entry = Value::Object(Map::new());
                }
                if let Value::Object(map) = entry {
                    map.insert(rest.to_string(), value);
                }
            }
            None => {
                root.insert(key, value);
            }
        }
    }

    Value::Object(root)
}

fn scalar(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else if let Ok(n) = raw.parse::<i64>() {
        Value::from(n)
    } else {
        Value::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // std::env::set_var is unsafe in edition 2024, so these tests feed
    // variables in explicitly.

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_env_loader_with_default() {
        let loader = EnvLoader::new(None);
        let value = loader.load_var_or("NONEXISTENT_VAR_12345", "default");

        assert_eq!(value, "default");
    }

    #[test]
    fn test_env_loader_missing_var() {
        let loader = EnvLoader::default();
        assert!(loader.load_var("MISSING_VAR_67890").is_err());
    }

    #[test]
    fn test_collect_filters_prefix() {
        let loader = EnvLoader::default();
        let found = loader.collect(vars(&[
            ("LIFESAVER_LOG_LEVEL", "warn"),
            ("LIFESAVERX_LOG_LEVEL", "debug"),
            ("PATH", "/usr/bin"),
        ]));

        assert_eq!(found.len(), 1);
        assert_eq!(found["log_level"], "warn");
    }

    #[test]
    fn test_to_value_nests_sections() {
        let loader = EnvLoader::default();
        let value = loader.to_value_from(vars(&[
            ("LIFESAVER_VALIDATION_NAIVE_UTC_OFFSET_MINUTES", "-300"),
            ("LIFESAVER_VALIDATION_FAIL_FAST", "TRUE"),
            ("LIFESAVER_DEBUG", "1"),
        ]));

        assert_eq!(value["validation"]["naive_utc_offset_minutes"], -300);
        assert_eq!(value["validation"]["fail_fast"], true);
        assert_eq!(value["debug"], 1);
    }

    #[test]
    fn test_nest_vars_keeps_unprefixed_keys() {
        let value = nest_vars([("LOG_FORMAT", "pretty")], Some(ENV_PREFIX));
        assert_eq!(value["log"]["format"], "pretty");
    }
}
