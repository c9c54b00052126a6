#![forbid(unsafe_code)]

//! Surface configuration.
//!
//! # Defaults
//!
//! | Field                   | Default | Option keys                                    |
//! |-------------------------|---------|------------------------------------------------|
//! | `use_hidpi`             | `true`  | `useHiDPI`, `use_hidpi`                        |
//! | `repaint_interval_rate` | `60`    | `repaintIntervalRate`, `repaint_interval_rate` |
//! | `continuous_repaint`    | `false` | `enableContinuousRepaint`, `continuous_repaint`|
//! | `resize_poll_interval`  | 200 ms  | `resizePollInterval`, `resize_poll_interval`   |

use std::fmt;
use std::time::Duration;

/// Default interval of the resize-polling loop.
pub const DEFAULT_RESIZE_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Default target paint rate in frames per second.
pub const DEFAULT_REPAINT_RATE: u32 = 60;

/// Configuration errors raised at construction time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The option key is not recognized.
    UnknownKey(String),
    /// The value could not be parsed or is out of range.
    InvalidValue {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown surface option: {key}"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value {value:?} for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Options controlling a surface controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceConfig {
    /// Scale the backing store by the host device-pixel ratio.
    pub use_hidpi: bool,
    /// Target paint rate (frames per second). `0` disables painting.
    pub repaint_interval_rate: u32,
    /// Paint on every eligible frame whether or not the surface is dirty.
    pub continuous_repaint: bool,
    /// Interval between container size checks.
    pub resize_poll_interval: Duration,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            use_hidpi: true,
            repaint_interval_rate: DEFAULT_REPAINT_RATE,
            continuous_repaint: false,
            resize_poll_interval: DEFAULT_RESIZE_POLL_INTERVAL,
        }
    }
}

impl SurfaceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_hidpi(mut self, enabled: bool) -> Self {
        self.use_hidpi = enabled;
        self
    }

    #[must_use]
    pub fn with_repaint_rate(mut self, fps: u32) -> Self {
        self.repaint_interval_rate = fps;
        self
    }

    #[must_use]
    pub fn with_continuous_repaint(mut self, enabled: bool) -> Self {
        self.continuous_repaint = enabled;
        self
    }

    #[must_use]
    pub fn with_resize_poll_interval(mut self, interval: Duration) -> Self {
        self.resize_poll_interval = interval;
        self
    }

    /// Build a config from string key/value pairs, starting from defaults.
    ///
    /// Unknown keys and unparsable values are rejected.
    pub fn from_options<'a, I>(options: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut config = Self::default();
        for (key, value) in options {
            config.set_option(key, value)?;
        }
        Ok(config)
    }

    /// Apply a single string option.
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "useHiDPI" | "use_hidpi" => {
                self.use_hidpi = parse_bool("use_hidpi", value)?;
            }
            "repaintIntervalRate" | "repaint_interval_rate" => {
                self.repaint_interval_rate =
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue {
                            key: "repaint_interval_rate",
                            value: value.to_owned(),
                            reason: "expected a non-negative integer",
                        })?;
            }
            "enableContinuousRepaint" | "continuous_repaint" => {
                self.continuous_repaint = parse_bool("continuous_repaint", value)?;
            }
            "resizePollInterval" | "resize_poll_interval" => {
                let ms: u64 = value
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: "resize_poll_interval",
                        value: value.to_owned(),
                        reason: "expected milliseconds",
                    })?;
                if ms == 0 {
                    return Err(ConfigError::InvalidValue {
                        key: "resize_poll_interval",
                        value: value.to_owned(),
                        reason: "must be positive",
                    });
                }
                self.resize_poll_interval = Duration::from_millis(ms);
            }
            other => return Err(ConfigError::UnknownKey(other.to_owned())),
        }
        Ok(())
    }

    /// Minimum time between paints, or `None` when painting is disabled.
    #[must_use]
    pub fn paint_interval(&self) -> Option<Duration> {
        if self.repaint_interval_rate == 0 {
            None
        } else {
            Some(Duration::from_nanos(
                1_000_000_000 / u64::from(self.repaint_interval_rate),
            ))
        }
    }
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_owned(),
            reason: "expected a boolean",
        }),
    }
}
