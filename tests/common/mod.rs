#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use lumen::device::model::{Color, DeviceEndpoint, DeviceError, LedCommand};
use lumen::runtime::{Runtime, TokioRuntime};
use lumen::sequencer::{Config, Sequencer, SequencerDevice, SequencerHandle};

/// Board double that writes down every command as `color/action@ms`, ms counted from creation.
pub struct RecordingDevice {
    start: Instant,
    latency: Duration,
    slow: HashMap<LedCommand, Duration>,
    failing: HashSet<Color>,
    calls: Mutex<Vec<String>>,
}

impl RecordingDevice {
    pub fn new() -> RecordingDevice {
        RecordingDevice {
            start: Instant::now(),
            latency: Duration::ZERO,
            slow: HashMap::new(),
            failing: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(colors: &[Color]) -> RecordingDevice {
        RecordingDevice {
            failing: colors.iter().copied().collect(),
            ..RecordingDevice::new()
        }
    }

    pub fn with_latency(latency: Duration) -> RecordingDevice {
        RecordingDevice {
            latency,
            ..RecordingDevice::new()
        }
    }

    /// Only `command` answers after `latency`; everything else answers at once.
    pub fn slow_on(command: LedCommand, latency: Duration) -> RecordingDevice {
        RecordingDevice {
            slow: HashMap::from([(command, latency)]),
            ..RecordingDevice::new()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl DeviceEndpoint for RecordingDevice {
    async fn send(&self, command: &LedCommand) -> Result<String, DeviceError> {
        let at = self.start.elapsed().as_millis();
        self.calls.lock().unwrap().push(format!("{command}@{at}"));

        let latency = self.slow.get(command).copied().unwrap_or(self.latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        if self.failing.contains(&command.color) {
            return Err(DeviceError::Rejected {
                command: *command,
                reason: "board unreachable".to_owned(),
            });
        }
        Ok(format!("{} LED {}", command.color, command.action))
    }
}

/// Tokio runtime that also remembers the delay of every `schedule_once`.
pub struct RecordingRuntime {
    inner: TokioRuntime,
    scheduled: Mutex<Vec<Duration>>,
}

impl RecordingRuntime {
    pub fn new() -> RecordingRuntime {
        RecordingRuntime {
            inner: TokioRuntime::current(),
            scheduled: Mutex::new(Vec::new()),
        }
    }

    pub fn scheduled_ms(&self) -> Vec<u128> {
        self.scheduled
            .lock()
            .unwrap()
            .iter()
            .map(|d| d.as_millis())
            .collect()
    }
}

impl Runtime for RecordingRuntime {
    fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.inner.spawn(task)
    }

    fn schedule_once<A, F>(&self, after: Duration, action: F)
    where
        A: Send + 'static,
        F: Future<Output = anyhow::Result<A>> + Send + 'static,
    {
        self.scheduled.lock().unwrap().push(after);
        self.inner.schedule_once(after, action);
    }
}

pub fn start_sequencer(device: &Arc<RecordingDevice>, config: Config) -> SequencerHandle {
    let device: SequencerDevice = device.clone();
    Sequencer::start(device, Arc::new(TokioRuntime::current()), config)
}

/// Answers a single request with `status_line` and `body`, returning the raw request it got.
pub async fn serve_once(status_line: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; 4096];
        let n = socket.read(&mut buf).await.unwrap();
        let request = String::from_utf8_lossy(&buf[..n]).into_owned();

        let response = format!(
            "{status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        let _ = socket.shutdown().await;
        request
    });

    (format!("http://{addr}"), server)
}
