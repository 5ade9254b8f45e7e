//! LifeSaver Connect logging
//!
//! Small leveled logger writing one line per record to stderr. Output is
//! controlled by `LIFESAVER_*` environment variables and can be adjusted at
//! runtime (the configuration crate pushes its `log` settings here).
//!
//! # Usage
//!
//! ```rust
//! use lifesaver_log::{debug, info, warn};
//!
//! info!("settings loaded from {}", "lifesaver.toml");
//! debug!(target: "lifesaver::forms", "hospital_registration rejected: {} error(s)", 2);
//! warn!("falling back to host local time zone");
//! ```
//!
//! Records emitted through the [`log`] facade can be routed here as well
//! with [`install_log_bridge`].
//!
//! # Environment Variables
//!
//! - `LIFESAVER_DEBUG=1` - Enable debug logging
//! - `LIFESAVER_LOG_LEVEL=trace|debug|info|warn|error|off` - Minimum level
//! - `LIFESAVER_LOG_FORMAT=pretty|compact|json` - Output format
//! - `LIFESAVER_LOG_TIMESTAMPS=1|0` - Prefix records with a timestamp

use once_cell::sync::Lazy;
use std::env;
use std::fmt;
use std::io::Write;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

// ============================================================================
// Levels and formats
// ============================================================================

/// Severity of a log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Level {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
    /// Disables all output
    Off = 5,
}

impl Level {
    /// Upper-case name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Trace => "TRACE",
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Off => "OFF",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Level::Trace,
            1 => Level::Debug,
            2 => Level::Info,
            3 => Level::Warn,
            4 => Level::Error,
            _ => Level::Off,
        }
    }

    #[cfg(feature = "color")]
    fn colored(&self) -> colored::ColoredString {
        use colored::Colorize;
        match self {
            Level::Trace => "TRACE".magenta(),
            Level::Debug => "DEBUG".blue(),
            Level::Info => "INFO".green(),
            Level::Warn => "WARN".yellow(),
            Level::Error => "ERROR".red().bold(),
            Level::Off => "OFF".white(),
        }
    }
}

impl FromStr for Level {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "off" | "none" => Ok(Level::Off),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::Trace,
            log::Level::Debug => Level::Debug,
            log::Level::Info => Level::Info,
            log::Level::Warn => Level::Warn,
            log::Level::Error => Level::Error,
        }
    }
}

/// Line layout for log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Format {
    /// `2024-05-01 10:30:00.000 INFO  [target] message`
    Pretty = 0,
    /// `10:30:00 I target: message`
    Compact = 1,
    /// One JSON object per line
    Json = 2,
}

impl Format {
    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Format::Pretty,
            1 => Format::Compact,
            _ => Format::Json,
        }
    }
}

impl FromStr for Format {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Format::Pretty),
            "compact" => Ok(Format::Compact),
            "json" => Ok(Format::Json),
            other => Err(UnknownName(other.to_string())),
        }
    }
}

/// Returned when a level or format name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown log setting '{}'", self.0)
    }
}

impl std::error::Error for UnknownName {}

// ============================================================================
// Global state
// ============================================================================

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);
static LOG_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);
static LOG_FORMAT: AtomicU8 = AtomicU8::new(Format::Json as u8);
static TIMESTAMPS: AtomicBool = AtomicBool::new(true);

/// Environment snapshot, applied to the atomics on first use.
static ENV_CONFIG: Lazy<LogConfig> = Lazy::new(|| {
    let config = LogConfig::from_env();
    config.apply();
    config
});

/// Logger settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub debug: bool,
    pub level: Level,
    pub format: Format,
    pub timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            timestamps: true,
        }
    }
}

impl LogConfig {
    /// Read `LIFESAVER_*` variables, falling back to defaults for anything
    /// missing or unparseable.
    pub fn from_env() -> Self {
        let flag = |name: &str| {
            env::var(name)
                .ok()
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };

        let debug = flag("LIFESAVER_DEBUG").unwrap_or(false);
        let level = env::var("LIFESAVER_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(if debug { Level::Debug } else { Level::Info });
        let format = env::var("LIFESAVER_LOG_FORMAT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(Format::Json);
        let timestamps = flag("LIFESAVER_LOG_TIMESTAMPS").unwrap_or(true);

        Self {
            debug,
            level,
            format,
            timestamps,
        }
    }

    /// Make this configuration the active one.
    pub fn apply(&self) {
        DEBUG_ENABLED.store(self.debug, Ordering::SeqCst);
        LOG_LEVEL.store(self.level as u8, Ordering::SeqCst);
        LOG_FORMAT.store(self.format as u8, Ordering::SeqCst);
        TIMESTAMPS.store(self.timestamps, Ordering::SeqCst);
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Apply the environment configuration now instead of on the first record.
pub fn init() {
    Lazy::force(&ENV_CONFIG);
}

/// Whether debug mode is on.
#[inline]
pub fn is_debug_enabled() -> bool {
    init();
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether records at `level` are written.
#[inline]
pub fn is_level_enabled(level: Level) -> bool {
    init();
    level != Level::Off && level as u8 >= LOG_LEVEL.load(Ordering::Relaxed)
}

pub fn current_level() -> Level {
    init();
    Level::from_u8(LOG_LEVEL.load(Ordering::Relaxed))
}

pub fn current_format() -> Format {
    init();
    Format::from_u8(LOG_FORMAT.load(Ordering::Relaxed))
}

pub fn set_level(level: Level) {
    init();
    LOG_LEVEL.store(level as u8, Ordering::SeqCst);
}

pub fn set_format(format: Format) {
    init();
    LOG_FORMAT.store(format as u8, Ordering::SeqCst);
}

/// Turn debug mode on or off. Enabling it lowers the level to `Debug` when
/// the current level would hide debug records.
pub fn set_debug(enabled: bool) {
    init();
    DEBUG_ENABLED.store(enabled, Ordering::SeqCst);
    if enabled && current_level() > Level::Debug {
        set_level(Level::Debug);
    }
}

// ============================================================================
// Output
// ============================================================================

/// Write one record. Called by the macros.
#[doc(hidden)]
pub fn emit(level: Level, target: &str, message: &str) {
    if !is_level_enabled(level) {
        return;
    }

    let line = render(level, target, message, current_format(), TIMESTAMPS.load(Ordering::Relaxed));
    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "{}", line);
}

fn render(level: Level, target: &str, message: &str, format: Format, timestamps: bool) -> String {
    match format {
        Format::Pretty => {
            let mut line = String::new();
            if timestamps {
                line.push_str(&chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f ").to_string());
            }
            #[cfg(feature = "color")]
            line.push_str(&format!("{:5} ", level.colored()));
            #[cfg(not(feature = "color"))]
            line.push_str(&format!("{:5} ", level.as_str()));
            if !target.is_empty() {
                line.push_str(&format!("[{}] ", target));
            }
            line.push_str(message);
            line
        }
        Format::Compact => {
            let mut line = String::new();
            if timestamps {
                line.push_str(&chrono::Local::now().format("%H:%M:%S ").to_string());
            }
            line.push(level.as_str().chars().next().unwrap_or('?'));
            line.push(' ');
            if !target.is_empty() {
                line.push_str(target);
                line.push_str(": ");
            }
            line.push_str(message);
            line
        }
        Format::Json => render_json(level, target, message, timestamps),
    }
}

#[cfg(feature = "json")]
fn render_json(level: Level, target: &str, message: &str, timestamps: bool) -> String {
    use serde::Serialize;

    #[derive(Serialize)]
    struct Record<'a> {
        #[serde(skip_serializing_if = "Option::is_none")]
        timestamp: Option<String>,
        level: &'a str,
        target: &'a str,
        message: &'a str,
    }

    let record = Record {
        timestamp: timestamps.then(|| chrono::Utc::now().to_rfc3339()),
        level: level.as_str(),
        target,
        message,
    };

    serde_json::to_string(&record).unwrap_or_else(|_| message.to_string())
}

#[cfg(not(feature = "json"))]
fn render_json(level: Level, target: &str, message: &str, timestamps: bool) -> String {
    let escape = |s: &str| s.escape_default().to_string();
    let mut line = String::from("{");
    if timestamps {
        line.push_str(&format!(r#""timestamp":"{}","#, chrono::Utc::now().to_rfc3339()));
    }
    line.push_str(&format!(
        r#""level":"{}","target":"{}","message":"{}"}}"#,
        level.as_str(),
        escape(target),
        escape(message)
    ));
    line
}

// ============================================================================
// `log` facade bridge
// ============================================================================

struct LogBridge;

impl log::Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        is_level_enabled(metadata.level().into())
    }

    fn log(&self, record: &log::Record<'_>) {
        if self.enabled(record.metadata()) {
            emit(record.level().into(), record.target(), &record.args().to_string());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static BRIDGE: LogBridge = LogBridge;

/// Route records from the `log` facade through this logger.
///
/// Fails if another `log` implementation is already installed.
pub fn install_log_bridge() -> Result<(), log::SetLoggerError> {
    init();
    log::set_logger(&BRIDGE)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

// ============================================================================
// Macros
// ============================================================================

/// Log at trace level.
#[macro_export]
macro_rules! trace {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::emit($crate::Level::Trace, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Trace) {
            $crate::emit($crate::Level::Trace, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at debug level. Also written when `LIFESAVER_DEBUG=1`.
#[macro_export]
macro_rules! debug {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::emit($crate::Level::Debug, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_debug_enabled() || $crate::is_level_enabled($crate::Level::Debug) {
            $crate::emit($crate::Level::Debug, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at info level.
#[macro_export]
macro_rules! info {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::emit($crate::Level::Info, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Info) {
            $crate::emit($crate::Level::Info, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at warn level.
#[macro_export]
macro_rules! warn {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::emit($crate::Level::Warn, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Warn) {
            $crate::emit($crate::Level::Warn, module_path!(), &format!($($arg)+));
        }
    };
}

/// Log at error level.
#[macro_export]
macro_rules! error {
    (target: $target:expr, $($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::emit($crate::Level::Error, $target, &format!($($arg)+));
        }
    };
    ($($arg:tt)+) => {
        if $crate::is_level_enabled($crate::Level::Error) {
            $crate::emit($crate::Level::Error, module_path!(), &format!($($arg)+));
        }
    };
}
