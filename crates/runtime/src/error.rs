//! Unified error types surfaced by the runtime API.
//!
//! Request validation failures (cast gates, dead targets) are not errors;
//! the engine answers those with events. Errors here mean the runtime
//! itself broke down: channels closed, workers died.

use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
