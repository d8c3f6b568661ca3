//! Simulation worker that owns the authoritative [`CombatEngine`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), applies
//! them through the engine, and publishes the resulting [`CombatEvent`]s to
//! the broadcast bus. Owning the engine in one task serializes commands and
//! ticks, so every gate check reads a consistent snapshot.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use arena_core::{
    Archetype, ArenaState, CharacterId, CombatEngine, CombatEvent, Element, GameTime, MatchPhase,
    MatchRules, TargetResolver, TeamId, WorldPoint,
};

/// Commands that can be sent to the simulation worker.
pub enum Command {
    Join {
        id: CharacterId,
        team: TeamId,
        archetype: Arc<dyn Archetype>,
        position: WorldPoint,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    Leave {
        id: CharacterId,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    Cast {
        caster: CharacterId,
        slot: usize,
        target: WorldPoint,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    SwitchStance {
        id: CharacterId,
        direction: i32,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    SetFacing {
        id: CharacterId,
        yaw: f32,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    /// High-frequency movement sync; fire-and-forget, interrupt events go
    /// out on the bus only.
    Movement {
        id: CharacterId,
        position: WorldPoint,
        speed_sq: f32,
    },
    /// Environmental or scripted damage with no casting character.
    InflictDamage {
        target: CharacterId,
        raw: f32,
        element: Element,
        instigator: Option<CharacterId>,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    SetPhase {
        phase: MatchPhase,
        reply: oneshot::Sender<()>,
    },
    RoundReset {
        reply: oneshot::Sender<Vec<CombatEvent>>,
    },
    /// Read-only snapshot of the replicated state.
    Snapshot {
        reply: oneshot::Sender<ArenaState>,
    },
}

/// Background task that processes combat commands and drives the tick.
pub struct SimulationWorker {
    engine: CombatEngine,
    rules: Box<dyn MatchRules + Send>,
    resolver: Box<dyn TargetResolver + Send + Sync>,
    command_rx: mpsc::Receiver<Command>,
    event_tx: broadcast::Sender<CombatEvent>,
    tick_interval: Duration,
    /// Simulation epoch; [`GameTime`] is seconds elapsed since this instant.
    epoch: Instant,
}

impl SimulationWorker {
    pub fn new(
        engine: CombatEngine,
        rules: Box<dyn MatchRules + Send>,
        resolver: Box<dyn TargetResolver + Send + Sync>,
        command_rx: mpsc::Receiver<Command>,
        event_tx: broadcast::Sender<CombatEvent>,
        tick_interval: Duration,
    ) -> Self {
        Self {
            engine,
            rules,
            resolver,
            command_rx,
            event_tx,
            tick_interval,
            epoch: Instant::now(),
        }
    }

    fn now(&self) -> GameTime {
        GameTime::from_secs(self.epoch.elapsed().as_secs_f64())
    }

    /// Main worker loop. Exits when every command sender is dropped.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval(self.tick_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                _ = ticker.tick() => {
                    let now = self.now();
                    let events = self.engine.tick(now, self.rules.as_mut(), self.resolver.as_ref());
                    self.publish(&events);
                }
            }
        }
        debug!(target: "arena::worker", "simulation worker shutting down");
    }

    fn handle_command(&mut self, command: Command) {
        let now = self.now();
        match command {
            Command::Join { id, team, archetype, position, reply } => {
                let events = self.engine.spawn_character(id, team, archetype, position);
                self.publish_and_reply(events, reply);
            }
            Command::Leave { id, reply } => {
                let events = self.engine.remove_character(id);
                self.publish_and_reply(events, reply);
            }
            Command::Cast { caster, slot, target, reply } => {
                let events = self.engine.request_cast(caster, slot, target, now);
                self.publish_and_reply(events, reply);
            }
            Command::SwitchStance { id, direction, reply } => {
                let events = self.engine.request_stance_switch(id, direction, now);
                self.publish_and_reply(events, reply);
            }
            Command::SetFacing { id, yaw, reply } => {
                let events = self.engine.set_facing(id, yaw);
                self.publish_and_reply(events, reply);
            }
            Command::Movement { id, position, speed_sq } => {
                let events = self.engine.report_movement(id, position, speed_sq, now);
                self.publish(&events);
            }
            Command::InflictDamage { target, raw, element, instigator, reply } => {
                let (_, events) = self.engine.inflict_damage(
                    target,
                    raw,
                    element,
                    instigator,
                    self.rules.as_mut(),
                    now,
                );
                self.publish_and_reply(events, reply);
            }
            Command::SetPhase { phase, reply } => {
                self.engine.set_phase(phase);
                if reply.send(()).is_err() {
                    debug!(target: "arena::worker", "SetPhase reply channel closed");
                }
            }
            Command::RoundReset { reply } => {
                let events = self.engine.round_reset();
                self.publish_and_reply(events, reply);
            }
            Command::Snapshot { reply } => {
                if reply.send(self.engine.state().clone()).is_err() {
                    debug!(target: "arena::worker", "Snapshot reply channel closed");
                }
            }
        }
    }

    fn publish_and_reply(
        &self,
        events: Vec<CombatEvent>,
        reply: oneshot::Sender<Vec<CombatEvent>>,
    ) {
        self.publish(&events);
        if reply.send(events).is_err() {
            debug!(target: "arena::worker", "reply channel closed (caller dropped)");
        }
    }

    fn publish(&self, events: &[CombatEvent]) {
        for event in events {
            match serde_json::to_string(event) {
                Ok(json) => trace!(target: "arena::events", event = %json, "publish"),
                Err(error) => warn!(target: "arena::events", %error, "event not serializable"),
            }
            // A send error just means nobody is subscribed right now.
            let _ = self.event_tx.send(event.clone());
        }
    }
}
