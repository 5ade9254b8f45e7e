//! Settings for LifeSaver Connect
//!
//! Settings come from layered sources: defaults, settings files (JSON, TOML
//! or env-style), a `.env` file and `LIFESAVER_*` environment variables.
//! Later layers override earlier ones. The merged result is validated
//! before use.
//!
//! | Key | Env variable | Default |
//! |---|---|---|
//! | `validation.naive_utc_offset_minutes` | `LIFESAVER_VALIDATION_NAIVE_UTC_OFFSET_MINUTES` | host zone |
//! | `validation.fail_fast` | `LIFESAVER_VALIDATION_FAIL_FAST` | `false` |
//! | `log.level` | `LIFESAVER_LOG_LEVEL` | logger default |
//! | `log.format` | `LIFESAVER_LOG_FORMAT` | logger default |

pub mod env;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use env::{ENV_PREFIX, EnvLoader, load_dotenv};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use settings::{LogSettings, MAX_OFFSET_MINUTES, Settings, SettingsLoader, ValidationSettings};
pub use validation::{ConfigValidator, Validate};
