use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::runtime::Runtime;
use crate::telemetry::model::{Reading, TelemetrySource};

pub type PollerSource = Arc<dyn TelemetrySource + Send + Sync + 'static>;

pub struct Config {
    pub poll_every: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            poll_every: Duration::from_millis(5000),
        }
    }
}

/// Keeps the latest reading around. Starts at `Reading::DEFAULT` and falls back to it
/// whenever the store is empty or unreachable.
pub struct TelemetryPoller;

impl TelemetryPoller {
    pub fn start<R: Runtime + Send + Sync + 'static>(
        source: PollerSource,
        runtime: Arc<R>,
        config: Config,
    ) -> TelemetryHandle {
        let (tick_s, tick_r) = async_channel::unbounded::<()>();
        let (reading_s, reading_r) = watch::channel(Reading::DEFAULT);

        runtime.clone().spawn(async move {
            // First poll goes out right away.
            let _ = tick_s.send(()).await;

            while tick_r.recv().await.is_ok() {
                let reading = match source.latest().await {
                    Ok(Some(reading)) => reading,
                    Ok(None) => {
                        tracing::debug!("No sensor reading stored, using defaults.");
                        Reading::DEFAULT
                    }
                    Err(error) => {
                        tracing::debug!(%error, "Fetching sensor reading failed, using defaults.");
                        Reading::DEFAULT
                    }
                };
                reading_s.send_replace(reading);

                let next_tick = tick_s.clone();
                runtime.schedule_once(config.poll_every, async move {
                    next_tick.send(()).await?;
                    Ok(())
                });
            }
        });

        TelemetryHandle { reading: reading_r }
    }
}

#[derive(Clone)]
pub struct TelemetryHandle {
    reading: watch::Receiver<Reading>,
}

impl TelemetryHandle {
    pub fn latest(&self) -> Reading {
        *self.reading.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Reading> {
        self.reading.clone()
    }
}
