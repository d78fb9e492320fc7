use std::sync::Arc;

use async_channel::Sender;
use tokio::sync::{broadcast, oneshot, watch};

use crate::device::model::{Color, DeviceEndpoint, LedCommand};
use crate::runtime::Runtime;
use crate::sequencer::model::{
    CommandFailure, LedState, Pattern, PatternChange, PlayOutcome, PlaybackStatus, SequencerError,
    Snapshot, Timings,
};

pub type SequencerDevice = Arc<dyn DeviceEndpoint + Send + Sync + 'static>;

const FAILURE_EVENTS_CAPACITY: usize = 16;

#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    pub timings: Timings,
    pub pattern: Pattern,
}

/// Who is waiting for a device command to land.
enum Origin {
    Manual(oneshot::Sender<()>),
    Run { generation: u64 },
    Reset { pattern: Pattern, step: usize },
}

enum Request {
    SetPattern(Pattern, oneshot::Sender<PatternChange>),
    Toggle(LedCommand, Origin),
    Applied(LedCommand, Origin),
    Play(oneshot::Sender<PlayOutcome>),
    ResetStep { pattern: Pattern, step: usize },
}

/// Single owner of the LED state and the playback status.
/// Everything that mutates them arrives through `queue`, one request at a time.
struct SequencerActor<R> {
    device: SequencerDevice,
    runtime: Arc<R>,
    timings: Timings,
    queue: Sender<Request>,
    state: watch::Sender<Snapshot>,
    failures: broadcast::Sender<CommandFailure>,
    /// Bumped on every `play`; turn-ons of older runs are stale.
    generation: u64,
    /// LEDs the reset of the current run has already switched off.
    reset_done: LedState,
}

impl<R: Runtime + Send + Sync + 'static> SequencerActor<R> {
    fn handle(&mut self, request: Request) {
        match request {
            Request::SetPattern(pattern, reply) => {
                let _ = reply.send(self.set_pattern(pattern));
            }
            Request::Toggle(command, origin) => self.dispatch(command, origin),
            Request::Applied(command, origin) => self.apply(command, origin),
            Request::Play(reply) => {
                let _ = reply.send(self.play());
            }
            Request::ResetStep { pattern, step } => {
                let color = pattern.order()[step];
                self.dispatch(LedCommand::new(color, false), Origin::Reset { pattern, step });
            }
        }
    }

    fn set_pattern(&self, pattern: Pattern) -> PatternChange {
        if self.state.borrow().is_playing() {
            tracing::debug!(?pattern, "Pattern change ignored while playing.");
            return PatternChange::Ignored;
        }
        self.state.send_modify(|s| s.pattern = pattern);
        PatternChange::Applied
    }

    /// Device calls run on their own tasks so a slow board never stalls the queue.
    /// Two commands may be in flight at once; each lands back here as `Applied`.
    fn dispatch(&self, command: LedCommand, origin: Origin) {
        let device = self.device.clone();
        let queue = self.queue.clone();
        let failures = self.failures.clone();

        self.runtime.spawn(async move {
            match device.send(&command).await {
                Ok(body) => tracing::info!(%command, body = body.trim(), "LED acknowledged."),
                Err(error) => {
                    tracing::warn!(%command, %error, "Error controlling LED.");
                    let _ = failures.send(CommandFailure {
                        command,
                        reason: error.to_string(),
                    });
                }
            }
            let _ = queue.send(Request::Applied(command, origin)).await;
        });
    }

    /// Local state follows the request, whatever the device answered.
    /// A turn-on landing after the reset already reached its LED is dropped, so a run always
    /// ends all-off.
    fn apply(&mut self, command: LedCommand, origin: Origin) {
        if let Origin::Run { generation } = origin {
            let stale = generation != self.generation
                || !self.state.borrow().is_playing()
                || self.reset_done.get(command.color);
            if stale {
                tracing::debug!(%command, "Late turn-on dropped, run already reset it.");
                return;
            }
        }

        self.state
            .send_modify(|s| s.leds.set(command.color, command.action.is_on()));

        match origin {
            Origin::Manual(reply) => {
                let _ = reply.send(());
            }
            Origin::Run { .. } => {}
            Origin::Reset { pattern, step } => {
                self.reset_done.set(command.color, true);
                self.continue_reset(pattern, step);
            }
        }
    }

    fn continue_reset(&self, pattern: Pattern, step: usize) {
        let next = step + 1;
        if next < pattern.order().len() {
            let queue = self.queue.clone();
            self.runtime
                .schedule_once(self.timings.reset_every, async move {
                    queue.send(Request::ResetStep { pattern, step: next }).await?;
                    Ok(())
                });
        } else {
            self.state.send_modify(|s| s.status = PlaybackStatus::Idle);
            tracing::info!(?pattern, "Pattern finished.");
        }
    }

    fn play(&mut self) -> PlayOutcome {
        let snapshot = *self.state.borrow();
        if snapshot.is_playing() {
            tracing::debug!("Play requested while a pattern is running.");
            return PlayOutcome::AlreadyPlaying;
        }

        let pattern = snapshot.pattern;
        self.generation += 1;
        self.reset_done = LedState::default();
        let generation = self.generation;
        self.state.send_modify(|s| s.status = PlaybackStatus::Playing);
        tracing::info!(?pattern, "Playing pattern.");

        let order: [Color; 3] = pattern.order();
        for (idx, color) in order.into_iter().enumerate() {
            let queue = self.queue.clone();
            self.runtime
                .schedule_once(self.timings.step_every * idx as u32, async move {
                    queue
                        .send(Request::Toggle(
                            LedCommand::new(color, true),
                            Origin::Run { generation },
                        ))
                        .await?;
                    Ok(())
                });
        }

        let queue = self.queue.clone();
        self.runtime
            .schedule_once(self.timings.step_every * order.len() as u32, async move {
                queue.send(Request::ResetStep { pattern, step: 0 }).await?;
                Ok(())
            });

        PlayOutcome::Started
    }
}

pub struct Sequencer;

impl Sequencer {
    pub fn start<R: Runtime + Send + Sync + 'static>(
        device: SequencerDevice,
        runtime: Arc<R>,
        config: Config,
    ) -> SequencerHandle {
        let (queue_s, queue_r) = async_channel::unbounded::<Request>();
        let (state_s, state_r) = watch::channel(Snapshot {
            pattern: config.pattern,
            ..Snapshot::default()
        });
        let (failures, _) = broadcast::channel(FAILURE_EVENTS_CAPACITY);

        let mut actor = SequencerActor {
            device,
            runtime: runtime.clone(),
            timings: config.timings,
            queue: queue_s.clone(),
            state: state_s,
            failures: failures.clone(),
            generation: 0,
            reset_done: LedState::default(),
        };

        runtime.spawn(async move {
            while let Ok(request) = queue_r.recv().await {
                actor.handle(request);
            }
        });

        SequencerHandle {
            queue: queue_s,
            state: state_r,
            failures,
        }
    }
}

/// The only way in for the presentation layer. Cheap to clone.
///
/// The actor keeps a sender to its own queue, so dropping every handle does not stop it.
/// `SequencerError::Stopped` shows up only once the actor task itself is gone, which happens when
/// the runtime it was spawned on shuts down.
#[derive(Clone)]
pub struct SequencerHandle {
    queue: Sender<Request>,
    state: watch::Receiver<Snapshot>,
    failures: broadcast::Sender<CommandFailure>,
}

impl SequencerHandle {
    pub async fn set_pattern(&self, pattern: Pattern) -> Result<PatternChange, SequencerError> {
        self.ask(|reply| Request::SetPattern(pattern, reply)).await
    }

    /// Resolves once the device attempt finished and the local state was updated.
    pub async fn toggle(&self, color: Color, on: bool) -> Result<(), SequencerError> {
        self.ask(|reply| Request::Toggle(LedCommand::new(color, on), Origin::Manual(reply)))
            .await
    }

    /// Returns right after scheduling; the run goes on in the background.
    pub async fn play(&self) -> Result<PlayOutcome, SequencerError> {
        self.ask(Request::Play).await
    }

    pub fn snapshot(&self) -> Snapshot {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.state.clone()
    }

    pub fn failures(&self) -> broadcast::Receiver<CommandFailure> {
        self.failures.subscribe()
    }

    pub async fn wait_idle(&self) -> Result<Snapshot, SequencerError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|s| !s.is_playing())
            .await
            .map_err(|_| SequencerError::Stopped)?;
        Ok(*snapshot)
    }

    async fn ask<T>(
        &self,
        request: impl FnOnce(oneshot::Sender<T>) -> Request,
    ) -> Result<T, SequencerError> {
        let (reply_s, reply_r) = oneshot::channel();
        self.queue
            .send(request(reply_s))
            .await
            .map_err(|_| SequencerError::Stopped)?;
        reply_r.await.map_err(|_| SequencerError::Stopped)
    }
}
