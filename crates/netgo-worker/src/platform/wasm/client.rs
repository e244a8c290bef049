//! Main-thread handle for the scoring worker.
//!
//! Scored games are queued in arrival order. The worker gives no request
//! correlation, so callers match results by the game's own id.

use std::{cell::RefCell, collections::VecDeque, rc::Rc};

use netgo_game::Game;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Event, MessageEvent, Url, Worker};

use crate::{message::HostMessage, platform::WorkerError};

/// Bootstrap script that loads the worker's wasm module.
const BOOTSTRAP_SCRIPT: &str = "netgo-scoring-worker-bootstrap.js";

/// A spawned scoring worker.
pub struct ScoringClient {
    worker: Worker,
    scored: Rc<RefCell<VecDeque<Game>>>,
    error: Rc<RefCell<Option<WorkerError>>>,
    _onmessage: Closure<dyn FnMut(MessageEvent)>,
    _onerror: Closure<dyn FnMut(Event)>,
}

impl std::fmt::Debug for ScoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringClient")
            .field("queued", &self.scored.borrow().len())
            .finish_non_exhaustive()
    }
}

impl ScoringClient {
    /// Spawns the worker from the bootstrap script next to the document.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerUrlMissing`] if the document base URI is
    /// unavailable and [`WorkerError::WorkerInitFailed`] if the worker cannot
    /// be created.
    pub fn new() -> Result<Self, WorkerError> {
        Self::with_url(&read_worker_url()?)
    }

    /// Spawns the worker from an explicit script URL.
    ///
    /// Worker settings may be appended as a query string.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::WorkerInitFailed`] if the worker cannot be created.
    pub fn with_url(url: &str) -> Result<Self, WorkerError> {
        let worker = Worker::new(url).map_err(|_| WorkerError::WorkerInitFailed)?;

        let scored = Rc::new(RefCell::new(VecDeque::new()));
        let error = Rc::new(RefCell::new(None));

        let scored_queue = Rc::clone(&scored);
        let error_cell_for_message = Rc::clone(&error);
        let error_cell_for_error = Rc::clone(&error);

        let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
            match serde_wasm_bindgen::from_value::<Game>(event.data()) {
                Ok(game) => scored_queue.borrow_mut().push_back(game),
                Err(err) => {
                    log::warn!("unreadable scored game: {err}");
                    *error_cell_for_message.borrow_mut() = Some(WorkerError::DeserializationFailed);
                }
            }
        }) as Box<dyn FnMut(MessageEvent)>);

        let onerror = Closure::wrap(Box::new(move |_event: Event| {
            *error_cell_for_error.borrow_mut() = Some(WorkerError::WorkerDisconnected);
        }) as Box<dyn FnMut(Event)>);

        worker.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
        worker.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        Ok(Self {
            worker,
            scored,
            error,
            _onmessage: onmessage,
            _onerror: onerror,
        })
    }

    /// Posts a `score` request for `game`.
    ///
    /// # Errors
    ///
    /// Returns [`WorkerError::SerializationFailed`] if the game cannot be
    /// converted or posted.
    pub fn score(&self, game: &Game) -> Result<(), WorkerError> {
        let payload = serde_wasm_bindgen::to_value(&HostMessage::score(game))
            .map_err(|_| WorkerError::SerializationFailed)?;
        self.worker
            .post_message(&payload)
            .map_err(|_| WorkerError::SerializationFailed)
    }

    /// Takes the next scored game, if one has arrived.
    ///
    /// # Errors
    ///
    /// Reports a worker error or an unreadable response once, before any
    /// further queued games.
    pub fn poll(&mut self) -> Result<Option<Game>, WorkerError> {
        if let Some(err) = self.error.borrow_mut().take() {
            return Err(err);
        }
        Ok(self.scored.borrow_mut().pop_front())
    }
}

impl Drop for ScoringClient {
    fn drop(&mut self) {
        self.worker.terminate();
    }
}

fn read_worker_url() -> Result<String, WorkerError> {
    let document = web_sys::window()
        .ok_or(WorkerError::WorkerUrlMissing)?
        .document()
        .ok_or(WorkerError::WorkerUrlMissing)?;
    let base_uri = document
        .base_uri()
        .map_err(|_| WorkerError::WorkerUrlMissing)?
        .ok_or(WorkerError::WorkerUrlMissing)?;
    let url = Url::new_with_base(BOOTSTRAP_SCRIPT, &base_uri)
        .map_err(|_| WorkerError::WorkerUrlMissing)?;
    Ok(url.href())
}
