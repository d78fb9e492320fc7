use async_trait::async_trait;
use serde::Deserialize;

/// One sample from the sensor node, as stored under `/sensorReading`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct Reading {
    pub temp: f64,
    pub humid: f64,
}

impl Reading {
    /// Shown whenever the store has nothing, or could not be reached.
    pub const DEFAULT: Reading = Reading {
        temp: 25.0,
        humid: 60.0,
    };
}

impl Default for Reading {
    fn default() -> Self {
        Reading::DEFAULT
    }
}

#[async_trait]
pub trait TelemetrySource {
    /// `Ok(None)` when the store holds no reading.
    async fn latest(&self) -> anyhow::Result<Option<Reading>>;
}
