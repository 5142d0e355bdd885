//! Per-character actor
//!
//! A `LimbicSystem` is a cheap, cloneable handle to one background task that
//! owns a [`Psyche`]. All mutations arrive over one channel and are applied
//! strictly in send order, so concurrent callers never interleave inside a
//! stimulus or a turn.

use crate::heartbeat::HeartbeatConfig;
use anima_core::{
    ExpressionHints, ImpulseMap, Psyche, PsycheSnapshot, RelationshipView, SceneContext,
    SceneStep, Stimulus,
};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Shared, read-only relationship signals for one command.
pub type SharedView = Arc<dyn RelationshipView>;

/// Result of one interaction turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub impulses: ImpulseMap,
    pub hints: ExpressionHints,
}

enum Command {
    SceneStep(SceneStep),
    Stimulus {
        stimulus: Box<Stimulus>,
        view: SharedView,
    },
    Turn {
        actor_id: String,
        view: SharedView,
        scene: SceneContext,
        reply: oneshot::Sender<Turn>,
    },
    Snapshot {
        reply: oneshot::Sender<PsycheSnapshot>,
    },
}

/// Handle to a running character
#[derive(Clone)]
pub struct LimbicSystem {
    id: Arc<str>,
    command_tx: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<PsycheSnapshot>,
}

impl std::fmt::Debug for LimbicSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimbicSystem").field("id", &self.id).finish()
    }
}

impl LimbicSystem {
    /// Spawn the actor for `psyche`. Must be called inside a tokio runtime.
    pub fn spawn(id: impl Into<String>, psyche: Psyche, heartbeat: HeartbeatConfig) -> Self {
        let id: Arc<str> = Arc::from(id.into());
        let (command_tx, command_rx) = mpsc::channel(64);
        let (snapshot_tx, snapshot_rx) = watch::channel(psyche.snapshot());

        let actor = Actor {
            id: Arc::clone(&id),
            psyche,
            heartbeat,
            snapshot_tx,
        };
        tokio::spawn(actor.run(command_rx));

        Self {
            id,
            command_tx,
            snapshot_rx,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Advance scene time.
    pub async fn apply_scene_step(&self, step: SceneStep) -> anyhow::Result<()> {
        self.send(Command::SceneStep(step)).await
    }

    pub async fn apply_stimulus(&self, stimulus: Stimulus, view: SharedView) -> anyhow::Result<()> {
        self.send(Command::Stimulus {
            stimulus: Box::new(stimulus),
            view,
        })
        .await
    }

    /// Generate impulses and expression hints toward `actor_id`.
    pub async fn turn(
        &self,
        actor_id: impl Into<String>,
        view: SharedView,
        scene: SceneContext,
    ) -> anyhow::Result<Turn> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Turn {
            actor_id: actor_id.into(),
            view,
            scene,
            reply,
        })
        .await?;
        rx.await.map_err(|_| self.stopped())
    }

    /// Snapshot taken after every previously sent command has been applied.
    pub async fn snapshot(&self) -> anyhow::Result<PsycheSnapshot> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply }).await?;
        rx.await.map_err(|_| self.stopped())
    }

    /// Most recently published snapshot, without waiting for queued commands.
    pub fn latest(&self) -> PsycheSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribe to snapshots published after each mutation
    pub fn subscribe(&self) -> watch::Receiver<PsycheSnapshot> {
        self.snapshot_rx.clone()
    }

    async fn send(&self, command: Command) -> anyhow::Result<()> {
        self.command_tx
            .send(command)
            .await
            .map_err(|_| self.stopped())
    }

    fn stopped(&self) -> anyhow::Error {
        anyhow!("Limbic actor for {} has stopped", self.id)
    }
}

struct Actor {
    id: Arc<str>,
    psyche: Psyche,
    heartbeat: HeartbeatConfig,
    snapshot_tx: watch::Sender<PsycheSnapshot>,
}

impl Actor {
    async fn run(mut self, mut command_rx: mpsc::Receiver<Command>) {
        tracing::info!("Limbic actor {} started", self.id);

        let mut ticker = self.heartbeat.interval.filter(|p| !p.is_zero()).map(|period| {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval
        });
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                command = command_rx.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                now = next_tick(&mut ticker) => {
                    let wall = now.duration_since(last_tick);
                    last_tick = now;
                    let elapsed = self.heartbeat.scene_elapsed(wall);
                    if !elapsed.is_zero() {
                        self.psyche.apply_scene_step(SceneStep {
                            elapsed,
                            decay_mode: self.heartbeat.decay_mode,
                        });
                        self.publish();
                    }
                }
            }
        }

        tracing::info!("Limbic actor {} stopped", self.id);
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SceneStep(step) => {
                self.psyche.apply_scene_step(step);
                self.publish();
            }
            Command::Stimulus { stimulus, view } => {
                self.psyche.apply_stimulus(&stimulus, &*view);
                tracing::debug!("{} received {}", self.id, stimulus.summary());
                self.publish();
            }
            Command::Turn {
                actor_id,
                view,
                scene,
                reply,
            } => {
                let impulses = self.psyche.generate_impulses(&actor_id, &*view, &scene);
                let hints = self
                    .psyche
                    .generate_expression_hints(&actor_id, &*view, &impulses, &scene);
                self.publish();
                // Caller may have given up waiting
                let _ = reply.send(Turn { impulses, hints });
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.psyche.snapshot());
            }
        }
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(self.psyche.snapshot());
    }
}

async fn next_tick(ticker: &mut Option<Interval>) -> Instant {
    match ticker {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}
