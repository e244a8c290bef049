//! Web worker bridge for the netgo scoring module.
//!
//! The worker receives `{ type: "score", value }` messages from the main
//! thread, forwards each payload to the scoring application's inbound port,
//! and posts every value the application emits on its outbound port back to
//! the main thread unchanged.
//!
//! [`Bridge`] holds the routing logic and is independent of the platform. On
//! native targets [`NativeWorker`] hosts it on a background thread; on
//! `wasm32` [`start_worker`] installs it in a dedicated web worker and
//! [`ScoringClient`] drives it from the main thread.
#![allow(clippy::missing_panics_doc)]

pub mod bridge;
pub mod config;
pub mod message;
pub mod platform;
pub mod port;
pub mod version;

#[cfg(test)]
mod test_logger;

pub use self::{
    bridge::{Bridge, BridgeError, BridgeStats},
    config::{BridgeConfig, ConfigError, PortNames},
    message::{HostMessage, MessageKind, PostedData, SCORE_TAG},
    platform::*,
    port::{HostSink, PortError, ScoredGameSink, ScoringApp},
};
