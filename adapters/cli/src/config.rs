//! TOML configuration for the command-line adapter.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use maze_sprint_system_scheduler::SchedulerConfig;
use serde::Deserialize;
use thiserror::Error;

/// Failures raised while loading the configuration file.
#[derive(Debug, Error)]
pub(crate) enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Read {
        /// Location of the file.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The contents are not valid TOML for this schema.
    #[error("invalid configuration")]
    Parse(#[from] toml::de::Error),
    /// A delay was configured as zero.
    #[error("`timing.{field}` must be greater than zero")]
    ZeroDuration {
        /// Name of the offending key.
        field: &'static str,
    },
    /// The window has no area.
    #[error("window size {width}x{height} must be non-zero")]
    EmptyWindow {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
}

/// Complete adapter configuration.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Config {
    /// Delays for one-shot scheduled work.
    pub(crate) timing: TimingConfig,
    /// Window parameters.
    pub(crate) window: WindowConfig,
}

/// `[timing]` section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct TimingConfig {
    /// Milliseconds before a collection flag is cleared.
    pub(crate) collected_flag_ms: u64,
    /// Milliseconds before a finished round restarts.
    pub(crate) restart_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            collected_flag_ms: 3_000,
            restart_delay_ms: 3_000,
        }
    }
}

/// `[window]` section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct WindowConfig {
    /// Window title.
    pub(crate) title: String,
    /// Initial width in pixels.
    pub(crate) width: u32,
    /// Initial height in pixels.
    pub(crate) height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Maze Sprint".to_owned(),
            width: 1_056,
            height: 640,
        }
    }
}

impl Config {
    /// Reads and validates the file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parses and validates TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.timing.collected_flag_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "collected_flag_ms",
            });
        }
        if self.timing.restart_delay_ms == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "restart_delay_ms",
            });
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::EmptyWindow {
                width: self.window.width,
                height: self.window.height,
            });
        }
        Ok(())
    }

    /// Scheduler delays described by the `[timing]` section.
    pub(crate) fn scheduler(&self) -> SchedulerConfig {
        SchedulerConfig {
            collected_flag_delay: Duration::from_millis(self.timing.collected_flag_ms),
            restart_delay: Duration::from_millis(self.timing.restart_delay_ms),
        }
    }
}
