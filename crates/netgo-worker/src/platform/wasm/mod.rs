//! WASM worker backend.
//!
//! The worker side installs the bridge inside a dedicated web worker, with
//! JavaScript payloads passed through untouched. The main-thread side spawns
//! that worker and exchanges typed games with it.

mod app;
mod client;
mod console;
mod scope;

pub use self::{
    app::JsScoringApp,
    client::ScoringClient,
    console::ConsoleLogger,
    scope::{WorkerScope, start_worker},
};
