//! Client-facing handle to interact with the runtime.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};

use arena_core::{
    Archetype, ArenaState, CharacterId, CombatEvent, Element, MatchPhase, TeamId, WorldPoint,
};

use crate::error::{Result, RuntimeError};
use crate::worker::Command;

/// Cloneable facade over the simulation worker's command channel.
///
/// Every request returns the authoritative events it produced; a refused
/// request comes back as a refusal event, not an error.
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_tx: broadcast::Sender<CombatEvent>,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_tx: broadcast::Sender<CombatEvent>,
    ) -> Self {
        Self { command_tx, event_tx }
    }

    /// Subscribe to the authoritative event stream.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CombatEvent> {
        self.event_tx.subscribe()
    }

    pub async fn join(
        &self,
        id: CharacterId,
        team: TeamId,
        archetype: Arc<dyn Archetype>,
        position: WorldPoint,
    ) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::Join { id, team, archetype, position, reply })
            .await
    }

    pub async fn leave(&self, id: CharacterId) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::Leave { id, reply }).await
    }

    /// Request a cast from spell bar slot `slot` towards `target`.
    pub async fn cast(
        &self,
        caster: CharacterId,
        slot: usize,
        target: WorldPoint,
    ) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::Cast { caster, slot, target, reply })
            .await
    }

    pub async fn switch_stance(&self, id: CharacterId, direction: i32) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::SwitchStance { id, direction, reply })
            .await
    }

    pub async fn set_facing(&self, id: CharacterId, yaw: f32) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::SetFacing { id, yaw, reply }).await
    }

    /// Fire-and-forget movement sync; interruptions surface on the bus.
    pub async fn report_movement(
        &self,
        id: CharacterId,
        position: WorldPoint,
        speed_sq: f32,
    ) -> Result<()> {
        self.command_tx
            .send(Command::Movement { id, position, speed_sq })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Environmental or scripted damage.
    pub async fn inflict_damage(
        &self,
        target: CharacterId,
        raw: f32,
        element: Element,
        instigator: Option<CharacterId>,
    ) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::InflictDamage { target, raw, element, instigator, reply })
            .await
    }

    pub async fn set_phase(&self, phase: MatchPhase) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::SetPhase { phase, reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    pub async fn round_reset(&self) -> Result<Vec<CombatEvent>> {
        self.request(|reply| Command::RoundReset { reply }).await
    }

    /// Read-only snapshot of the replicated arena state.
    pub async fn snapshot(&self) -> Result<ArenaState> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply: reply_tx })
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<Vec<CombatEvent>>) -> Command,
    ) -> Result<Vec<CombatEvent>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;
        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}
