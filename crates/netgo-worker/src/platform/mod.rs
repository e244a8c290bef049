//! Worker hosting split by platform.
//!
//! The `native` module runs the bridge on a background thread with channels
//! standing in for the web worker message queues. The `wasm` module installs
//! the bridge inside a dedicated web worker and provides the main-thread
//! client that talks to it.

#[cfg(not(target_arch = "wasm32"))]
mod native;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
pub use native::{ChannelScoringApp, NativeWorker, ScoredSender, ScoringEndpoint};
#[cfg(target_arch = "wasm32")]
pub use wasm::{ConsoleLogger, JsScoringApp, ScoringClient, WorkerScope, start_worker};

/// Errors that can occur while starting a worker or exchanging messages with it.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum WorkerError {
    /// The worker script URL was missing or invalid.
    #[display("worker URL is missing")]
    WorkerUrlMissing,
    /// Failed to start the worker or install its bridge.
    #[display("worker initialization failed")]
    WorkerInitFailed,
    /// Failed to serialize an outgoing message.
    #[display("failed to serialize worker message")]
    SerializationFailed,
    /// Failed to deserialize an incoming message.
    #[display("failed to deserialize worker message")]
    DeserializationFailed,
    /// The worker stopped or its channel closed.
    #[display("worker disconnected")]
    WorkerDisconnected,
}
