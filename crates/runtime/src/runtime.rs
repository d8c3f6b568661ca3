//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for hosts to configure rules and
//! targeting before play starts.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use arena_core::{CombatEngine, CombatEvent, MatchRules, TargetResolver};

use crate::error::{Result, RuntimeError};
use crate::handle::RuntimeHandle;
use crate::resolver::SphereOverlap;
use crate::rules::TeamRules;
use crate::worker::SimulationWorker;

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub tick_interval: Duration,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            // 30 Hz; deadlines fire on the first tick at or after expiry.
            tick_interval: Duration::from_millis(33),
            event_buffer_size: 256,
            command_buffer_size: 64,
        }
    }
}

/// Main runtime that hosts the authoritative simulation.
///
/// [`RuntimeHandle`] provides a cloneable facade for clients; the runtime
/// itself is kept only to shut the worker down.
pub struct Runtime {
    handle: RuntimeHandle,
    worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime.
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<CombatEvent> {
        self.handle.subscribe_events()
    }

    /// Shut down gracefully: the worker drains in-flight commands and exits
    /// once the last handle is gone.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    rules: Box<dyn MatchRules + Send>,
    resolver: Box<dyn TargetResolver + Send + Sync>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            rules: Box::new(TeamRules::default()),
            resolver: Box::new(SphereOverlap),
        }
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default [`TeamRules`].
    pub fn rules(mut self, rules: impl MatchRules + Send + 'static) -> Self {
        self.rules = Box::new(rules);
        self
    }

    /// Replace the default [`SphereOverlap`] targeting.
    pub fn resolver(mut self, resolver: impl TargetResolver + Send + Sync + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn build(self) -> Runtime {
        let (command_tx, command_rx) = mpsc::channel(self.config.command_buffer_size);
        let (event_tx, _event_rx) = broadcast::channel(self.config.event_buffer_size);

        let handle = RuntimeHandle::new(command_tx, event_tx.clone());

        let worker = SimulationWorker::new(
            CombatEngine::new(),
            self.rules,
            self.resolver,
            command_rx,
            event_tx,
            self.config.tick_interval,
        );
        let worker_handle = tokio::spawn(worker.run());

        Runtime { handle, worker_handle }
    }
}
