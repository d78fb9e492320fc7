//! Integration tests for the telemetry poller.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::time::Instant;

use lumen::runtime::TokioRuntime;
use lumen::telemetry::model::{Reading, TelemetrySource};
use lumen::telemetry::poller::{Config, PollerSource, TelemetryPoller};
use lumen::telemetry::stubs::{AlwaysFail, Fixed};

/// Hands out prepared answers in order, then reports an empty store.
struct Scripted {
    start: Instant,
    answers: Mutex<VecDeque<anyhow::Result<Option<Reading>>>>,
    polled_at: Mutex<Vec<u128>>,
}

impl Scripted {
    fn new(answers: Vec<anyhow::Result<Option<Reading>>>) -> Scripted {
        Scripted {
            start: Instant::now(),
            answers: Mutex::new(answers.into()),
            polled_at: Mutex::new(Vec::new()),
        }
    }

    fn polled_at(&self) -> Vec<u128> {
        self.polled_at.lock().unwrap().clone()
    }
}

#[async_trait]
impl TelemetrySource for Scripted {
    async fn latest(&self) -> anyhow::Result<Option<Reading>> {
        self.polled_at
            .lock()
            .unwrap()
            .push(self.start.elapsed().as_millis());
        self.answers.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }
}

const WARM: Reading = Reading {
    temp: 31.5,
    humid: 42.0,
};

#[tokio::test(start_paused = true)]
async fn polls_every_five_seconds_and_falls_back_to_defaults() {
    let source = Arc::new(Scripted::new(vec![
        Ok(Some(WARM)),
        Ok(None),
        Err(anyhow::anyhow!("offline")),
        Ok(Some(WARM)),
    ]));
    let poller_source: PollerSource = source.clone();
    let telemetry = TelemetryPoller::start(
        poller_source,
        Arc::new(TokioRuntime::current()),
        Config::default(),
    );
    let mut readings = telemetry.subscribe();

    let mut seen = Vec::new();
    for _ in 0..4 {
        readings.changed().await.unwrap();
        seen.push(*readings.borrow_and_update());
    }

    assert_eq!(seen, vec![WARM, Reading::DEFAULT, Reading::DEFAULT, WARM]);
    assert_eq!(source.polled_at(), vec![0, 5000, 10000, 15000]);
    assert_eq!(telemetry.latest(), WARM);
}

#[tokio::test(start_paused = true)]
async fn starts_from_defaults() {
    let telemetry = TelemetryPoller::start(
        Arc::new(Fixed(WARM)),
        Arc::new(TokioRuntime::current()),
        Config::default(),
    );

    assert_eq!(telemetry.latest(), Reading { temp: 25.0, humid: 60.0 });

    let mut readings = telemetry.subscribe();
    readings.changed().await.unwrap();
    assert_eq!(telemetry.latest(), WARM);
}

#[tokio::test(start_paused = true)]
async fn unreachable_store_keeps_defaults() {
    let telemetry = TelemetryPoller::start(
        Arc::new(AlwaysFail),
        Arc::new(TokioRuntime::current()),
        Config::default(),
    );

    let mut readings = telemetry.subscribe();
    readings.changed().await.unwrap();
    readings.changed().await.unwrap();
    assert_eq!(*readings.borrow(), Reading::DEFAULT);
}
