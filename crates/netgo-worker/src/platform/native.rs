//! Native worker backend using a background thread and channels.
//!
//! The thread plays the role of the web worker: it owns the bridge and
//! handles one event at a time, in the order events arrive.

use std::{
    fmt,
    sync::{Arc, mpsc},
    thread::{self, JoinHandle},
    time::Duration,
};

use super::WorkerError;
use crate::{
    bridge::{Bridge, BridgeStats},
    config::{BridgeConfig, PortNames},
    message::HostMessage,
    port::{PortError, ScoredGameSink, ScoringApp},
};

enum WorkerEvent<G> {
    Host(HostMessage<G>),
    Scored(G),
    Terminate,
}

/// Handle the scoring engine uses to emit scored games.
pub struct ScoredSender<G> {
    events: mpsc::Sender<WorkerEvent<G>>,
}

impl<G> Clone for ScoredSender<G> {
    fn clone(&self) -> Self {
        Self {
            events: self.events.clone(),
        }
    }
}

impl<G> fmt::Debug for ScoredSender<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoredSender").finish()
    }
}

impl<G> ScoredSender<G> {
    /// Emits a scored game on the outbound port.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerDisconnected`] once the worker has stopped.
    pub fn emit(&self, game: G) -> Result<(), WorkerError> {
        self.events
            .send(WorkerEvent::Scored(game))
            .map_err(|_| WorkerError::WorkerDisconnected)
    }
}

/// The scoring engine's side of a [`NativeWorker`].
///
/// `games` yields every game the bridge forwards. It closes when the worker
/// stops.
#[derive(Debug)]
pub struct ScoringEndpoint<G> {
    /// Games received on the inbound port.
    pub games: mpsc::Receiver<G>,
    /// Sender for the outbound port.
    pub scored: ScoredSender<G>,
}

/// Scoring application whose ports are channels.
pub struct ChannelScoringApp<G> {
    ports: PortNames,
    inbound: mpsc::Sender<G>,
    sink: Option<ScoredGameSink<G>>,
}

impl<G> fmt::Debug for ChannelScoringApp<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChannelScoringApp")
            .field("ports", &self.ports)
            .field("subscribed", &self.sink.is_some())
            .finish_non_exhaustive()
    }
}

impl<G> ChannelScoringApp<G> {
    /// Creates an application forwarding inbound games to `inbound`.
    #[must_use]
    pub fn new(ports: PortNames, inbound: mpsc::Sender<G>) -> Self {
        Self {
            ports,
            inbound,
            sink: None,
        }
    }

    /// Hands a scored game to the outbound subscriber.
    pub fn deliver(&mut self, game: G) {
        match self.sink.as_mut() {
            Some(sink) => sink(game),
            None => log::warn!(
                "scored game dropped: `{}` has no subscriber",
                self.ports.outbound
            ),
        }
    }
}

impl<G> ScoringApp for ChannelScoringApp<G> {
    type Game = G;

    fn send_game(&self, game: G) -> Result<(), PortError> {
        self.inbound.send(game).map_err(|_| PortError::Rejected {
            port: self.ports.inbound.clone(),
        })
    }

    fn subscribe_scored(&mut self, sink: ScoredGameSink<G>) -> Result<(), PortError> {
        if self.sink.is_some() {
            return Err(PortError::AlreadySubscribed);
        }
        self.sink = Some(sink);
        Ok(())
    }
}

/// A bridge running on its own thread.
pub struct NativeWorker<G> {
    events: mpsc::Sender<WorkerEvent<G>>,
    posted: mpsc::Receiver<G>,
    stats: Arc<BridgeStats>,
    thread: Option<JoinHandle<()>>,
}

impl<G> fmt::Debug for NativeWorker<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeWorker")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<G> NativeWorker<G>
where
    G: fmt::Debug + Send + 'static,
{
    /// Starts the worker thread and installs the bridge on it.
    ///
    /// Returns the host handle and the endpoint the scoring engine serves.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerInitFailed`] if the thread cannot be
    /// spawned or the bridge cannot be installed.
    pub fn spawn(config: BridgeConfig) -> Result<(Self, ScoringEndpoint<G>), WorkerError> {
        let (event_tx, event_rx) = mpsc::channel();
        let (posted_tx, posted_rx) = mpsc::channel();
        let (games_tx, games_rx) = mpsc::channel();
        let (init_tx, init_rx) = mpsc::channel();

        let thread = thread::Builder::new()
            .name("netgo-scoring-worker".to_owned())
            .spawn(move || {
                let app = ChannelScoringApp::new(config.ports.clone(), games_tx);
                let mut bridge = match Bridge::install(app, posted_tx, &config) {
                    Ok(bridge) => bridge,
                    Err(err) => {
                        let _ = init_tx.send(Err(err));
                        return;
                    }
                };
                let _ = init_tx.send(Ok(bridge.stats()));
                drop(init_tx);

                while let Ok(event) = event_rx.recv() {
                    match event {
                        WorkerEvent::Host(message) => bridge.on_message(message),
                        WorkerEvent::Scored(game) => bridge.app_mut().deliver(game),
                        WorkerEvent::Terminate => break,
                    }
                }
                log::debug!("scoring worker stopped");
            })
            .map_err(|_| WorkerError::WorkerInitFailed)?;

        let stats = match init_rx.recv() {
            Ok(Ok(stats)) => stats,
            Ok(Err(err)) => {
                log::error!("failed to install scoring bridge: {err}");
                let _ = thread.join();
                return Err(WorkerError::WorkerInitFailed);
            }
            Err(_) => return Err(WorkerError::WorkerInitFailed),
        };

        let endpoint = ScoringEndpoint {
            games: games_rx,
            scored: ScoredSender {
                events: event_tx.clone(),
            },
        };
        let worker = Self {
            events: event_tx,
            posted: posted_rx,
            stats,
            thread: Some(thread),
        };
        Ok((worker, endpoint))
    }
}

impl<G> NativeWorker<G> {
    /// Posts a message to the worker.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerDisconnected`] once the worker has stopped.
    pub fn post_message(&self, message: HostMessage<G>) -> Result<(), WorkerError> {
        self.events
            .send(WorkerEvent::Host(message))
            .map_err(|_| WorkerError::WorkerDisconnected)
    }

    /// Posts a `score` request for `game`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerDisconnected`] once the worker has stopped.
    pub fn score(&self, game: G) -> Result<(), WorkerError> {
        self.post_message(HostMessage::score(game))
    }

    /// Attempts to take the next scored game without blocking.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerDisconnected`] once the worker has stopped
    /// and every scored game it posted has been taken.
    pub fn poll(&mut self) -> Result<Option<G>, WorkerError> {
        use mpsc::TryRecvError;

        match self.posted.try_recv() {
            Ok(game) => Ok(Some(game)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(WorkerError::WorkerDisconnected),
        }
    }

    /// Blocks until the next scored game arrives.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerDisconnected`] if the worker stops before
    /// another scored game is available.
    pub fn recv(&self) -> Result<G, WorkerError> {
        self.posted
            .recv()
            .map_err(|_| WorkerError::WorkerDisconnected)
    }

    /// Waits up to `timeout` for the next scored game.
    ///
    /// Returns `Ok(None)` when the timeout elapses first.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerDisconnected`] if the worker stops before
    /// another scored game is available.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<G>, WorkerError> {
        use mpsc::RecvTimeoutError;

        match self.posted.recv_timeout(timeout) {
            Ok(game) => Ok(Some(game)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(WorkerError::WorkerDisconnected),
        }
    }

    /// Traffic counters of the worker's bridge.
    ///
    /// Counters are final once the worker has terminated.
    #[must_use]
    pub fn stats(&self) -> Arc<BridgeStats> {
        Arc::clone(&self.stats)
    }

    /// Stops the worker after it finishes the events already queued.
    pub fn terminate(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        let Some(thread) = self.thread.take() else {
            return;
        };
        let _ = self.events.send(WorkerEvent::Terminate);
        if thread.join().is_err() {
            log::error!("scoring worker thread panicked");
        }
    }
}

impl<G> Drop for NativeWorker<G> {
    fn drop(&mut self) {
        self.shutdown();
    }
}
