//! Seams between the bridge, the scoring application and the host thread.

use std::sync::mpsc;

/// Listener registered on a scoring application's outbound port.
pub type ScoredGameSink<G> = Box<dyn FnMut(G)>;

/// A scoring application exposing one inbound and one outbound port.
///
/// The application accepts a game and emits a scored game at a time of its
/// choosing. The bridge treats it as a black box.
pub trait ScoringApp {
    /// Payload carried by both ports.
    type Game;

    /// Pushes a game into the inbound port.
    fn send_game(&self, game: Self::Game) -> Result<(), PortError>;

    /// Registers the listener for the outbound port.
    fn subscribe_scored(&mut self, sink: ScoredGameSink<Self::Game>) -> Result<(), PortError>;
}

/// Destination for messages posted back to the host thread.
pub trait HostSink<G> {
    /// Posts `game` to the host as a new message.
    fn post_message(&self, game: G) -> Result<(), PortError>;
}

impl<G> HostSink<G> for mpsc::Sender<G> {
    fn post_message(&self, game: G) -> Result<(), PortError> {
        self.send(game).map_err(|_| PortError::HostDisconnected)
    }
}

/// Failures at a port boundary.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PortError {
    /// The application does not expose the named port.
    #[display("scoring port `{port}` is missing")]
    PortMissing {
        /// Port name.
        port: String,
    },
    /// The port exists but lacks a callable `send`/`subscribe`.
    #[display("scoring port `{port}` is not callable")]
    NotCallable {
        /// Port name.
        port: String,
    },
    /// The port threw or refused the value.
    #[display("scoring port `{port}` rejected the call")]
    Rejected {
        /// Port name.
        port: String,
    },
    /// The outbound port already has a listener.
    #[display("scoring port already has a subscriber")]
    AlreadySubscribed,
    /// The host side of the channel is gone.
    #[display("host disconnected")]
    HostDisconnected,
}
