use async_trait::async_trait;

use crate::telemetry::model::{Reading, TelemetrySource};

pub struct Fixed(pub Reading);

#[async_trait]
impl TelemetrySource for Fixed {
    async fn latest(&self) -> anyhow::Result<Option<Reading>> {
        Ok(Some(self.0))
    }
}

pub struct Absent;

#[async_trait]
impl TelemetrySource for Absent {
    async fn latest(&self) -> anyhow::Result<Option<Reading>> {
        Ok(None)
    }
}

pub struct AlwaysFail;

#[async_trait]
impl TelemetrySource for AlwaysFail {
    async fn latest(&self) -> anyhow::Result<Option<Reading>> {
        anyhow::bail!("sensor store unreachable")
    }
}
