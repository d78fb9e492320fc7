use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::sequencer;
use crate::sequencer::model::{Pattern, Timings};
use crate::telemetry::poller;

// YAML specific configuration

#[derive(Debug, Deserialize)]
pub struct DeviceConfig {
    pub base_url: String,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub pattern: Pattern,
    pub step_every_ms: u64,
    pub reset_every_ms: u64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        let timings = Timings::default();
        SequenceConfig {
            pattern: Pattern::default(),
            step_every_ms: timings.step_every.as_millis() as u64,
            reset_every_ms: timings.reset_every.as_millis() as u64,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// No database configured means readings stay at their defaults.
    pub database_url: Option<String>,
    pub path: String,
    pub auth: Option<String>,
    pub poll_every_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            database_url: None,
            path: "/sensorReading".to_owned(),
            auth: None,
            poll_every_ms: 5000,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LumenConfig {
    pub device: DeviceConfig,
    #[serde(default)]
    pub sequence: SequenceConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_request_timeout_ms() -> u64 {
    5000
}

// Parsed part - from configuration to application specific

impl DeviceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl From<&SequenceConfig> for sequencer::Config {
    fn from(value: &SequenceConfig) -> Self {
        sequencer::Config {
            timings: Timings {
                step_every: Duration::from_millis(value.step_every_ms),
                reset_every: Duration::from_millis(value.reset_every_ms),
            },
            pattern: value.pattern,
        }
    }
}

impl TelemetryConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl From<&TelemetryConfig> for poller::Config {
    fn from(value: &TelemetryConfig) -> Self {
        poller::Config {
            poll_every: Duration::from_millis(value.poll_every_ms),
        }
    }
}

pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> anyhow::Result<LumenConfig> {
    let path = path.as_ref();
    let conf_file = std::fs::File::open(path)
        .with_context(|| format!("Couldn't open configuration file {}.", path.display()))?;
    let yaml_value: serde_yaml::Value = serde_yaml::from_reader(conf_file)
        .with_context(|| format!("Couldn't parse {} as YAML.", path.display()))?;
    from_value(yaml_value)
}

pub fn from_str(yaml: &str) -> anyhow::Result<LumenConfig> {
    from_value(serde_yaml::from_str(yaml)?)
}

fn from_value(mut yaml_value: serde_yaml::Value) -> anyhow::Result<LumenConfig> {
    // Merge keys (`<<: *anchor`) are not resolved by serde_yaml on its own.
    yaml_value.apply_merge()?;
    serde_yaml::from_value(yaml_value).context("Invalid configuration.")
}
