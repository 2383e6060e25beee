//! Server configuration read from the process environment.
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use channel_runtime::RuntimeConfig;

/// Configuration required to boot the channel server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    /// Directory for the log file; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
    pub tick_interval: Option<Duration>,
    pub command_buffer: usize,
    pub event_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
            tick_interval: Some(Duration::from_millis(Self::DEFAULT_TICK_MS)),
            command_buffer: 32,
            event_buffer: 256,
        }
    }
}

impl ServerConfig {
    pub const DEFAULT_TICK_MS: u64 = 100;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `CHANNEL_DATA_DIR` - Content directory (default: `crates/game/content/data`)
    /// - `CHANNEL_LOG_DIR` - Log directory, empty to disable the log file
    ///   (default: platform cache directory)
    /// - `CHANNEL_TICK_MS` - Stun countdown period, 0 to disable (default: 100)
    /// - `CHANNEL_COMMAND_BUFFER` - Commands queued per region (default: 32)
    /// - `CHANNEL_EVENT_BUFFER` - Events buffered per topic (default: 256)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(dir) = lookup("CHANNEL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(dir) = lookup("CHANNEL_LOG_DIR") {
            config.log_dir = (!dir.is_empty()).then(|| PathBuf::from(dir));
        }

        if let Some(ms) = read_env::<u64>(&lookup, "CHANNEL_TICK_MS") {
            config.tick_interval = (ms > 0).then(|| Duration::from_millis(ms));
        }

        if let Some(capacity) = read_env::<usize>(&lookup, "CHANNEL_COMMAND_BUFFER") {
            config.command_buffer = capacity.max(1);
        }

        if let Some(capacity) = read_env::<usize>(&lookup, "CHANNEL_EVENT_BUFFER") {
            config.event_buffer = capacity.max(1);
        }

        config
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            event_buffer_size: self.event_buffer,
            command_buffer_size: self.command_buffer,
            tick_interval: self.tick_interval,
            ..RuntimeConfig::default()
        }
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}

/// Content shipped in the workspace, relative to the working directory.
fn default_data_dir() -> PathBuf {
    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("crates/game/content/data")
}

fn default_log_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "channel-server")
        .map(|dirs| dirs.cache_dir().join("logs"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> ServerConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("CHANNEL_DATA_DIR", "/srv/data"),
            ("CHANNEL_LOG_DIR", "/var/log/channel"),
            ("CHANNEL_TICK_MS", "250"),
            ("CHANNEL_COMMAND_BUFFER", "0"),
            ("CHANNEL_EVENT_BUFFER", "1024"),
        ]);

        assert_eq!(config.data_dir, PathBuf::from("/srv/data"));
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/channel")));
        assert_eq!(config.tick_interval, Some(Duration::from_millis(250)));
        assert_eq!(config.command_buffer, 1);
        assert_eq!(config.event_buffer, 1024);
    }

    #[test]
    fn empty_log_dir_and_zero_tick_disable() {
        let config = config(&[("CHANNEL_LOG_DIR", ""), ("CHANNEL_TICK_MS", "0")]);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.tick_interval, None);
    }

    #[test]
    fn unparsable_values_keep_defaults() {
        let config = config(&[("CHANNEL_TICK_MS", "soon")]);
        assert_eq!(
            config.tick_interval,
            Some(Duration::from_millis(ServerConfig::DEFAULT_TICK_MS))
        );
        assert_eq!(config.runtime_config().command_buffer_size, 32);
    }
}
