//! The message bridge between the host thread and the scoring application.
//!
//! The bridge owns the scoring application for the worker's lifetime. It has
//! two independent listeners: [`Bridge::on_message`] handles host messages,
//! and the sink registered at install time relays scored games back to the
//! host. Neither listener queues, reorders or retries anything.

use std::{fmt, sync::Arc};

use portable_atomic::{AtomicU64, Ordering};

use crate::{
    config::BridgeConfig,
    message::{HostMessage, MessageKind},
    port::{HostSink, PortError, ScoringApp},
};

/// Errors produced while wiring or dispatching through the bridge.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum BridgeError {
    /// The host sent a message whose tag is not `score`.
    #[display("unhandled worker message type: {}", tag.as_deref().unwrap_or("<missing>"))]
    UnrecognizedMessageType {
        /// The tag as received, if any.
        tag: Option<String>,
    },
    /// A `score` message arrived without a payload.
    #[display("score message has no value")]
    MissingValue,
    /// A scoring port failed.
    #[display("{_0}")]
    #[from]
    Port(PortError),
}

/// Counters describing the traffic that went through a bridge.
#[derive(Debug, Default)]
pub struct BridgeStats {
    forwarded: AtomicU64,
    posted: AtomicU64,
    diagnostics: AtomicU64,
    post_failures: AtomicU64,
}

impl BridgeStats {
    /// Games forwarded into the scoring application.
    #[must_use]
    pub fn forwarded(&self) -> u64 {
        self.forwarded.load(Ordering::Relaxed)
    }

    /// Scored games posted to the host.
    #[must_use]
    pub fn posted(&self) -> u64 {
        self.posted.load(Ordering::Relaxed)
    }

    /// Host messages dropped with a diagnostic.
    #[must_use]
    pub fn diagnostics(&self) -> u64 {
        self.diagnostics.load(Ordering::Relaxed)
    }

    /// Scored games the host sink refused.
    #[must_use]
    pub fn post_failures(&self) -> u64 {
        self.post_failures.load(Ordering::Relaxed)
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// Relays host messages into a [`ScoringApp`] and its output back to the host.
pub struct Bridge<A> {
    app: A,
    trace_payloads: bool,
    stats: Arc<BridgeStats>,
}

impl<A> fmt::Debug for Bridge<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bridge")
            .field("trace_payloads", &self.trace_payloads)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<A> Bridge<A>
where
    A: ScoringApp,
    A::Game: fmt::Debug + 'static,
{
    /// Subscribes the application's outbound port to `host` and takes
    /// ownership of the application.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::Port`] if the outbound port cannot be subscribed.
    pub fn install<H>(mut app: A, host: H, config: &BridgeConfig) -> Result<Self, BridgeError>
    where
        H: HostSink<A::Game> + 'static,
    {
        let stats = Arc::new(BridgeStats::default());
        let trace_payloads = config.trace_payloads;

        let sink_stats = Arc::clone(&stats);
        app.subscribe_scored(Box::new(move |game: A::Game| {
            if trace_payloads {
                log::debug!("returning scored game: {game:?}");
            }
            match host.post_message(game) {
                Ok(()) => BridgeStats::bump(&sink_stats.posted),
                Err(err) => {
                    BridgeStats::bump(&sink_stats.post_failures);
                    log::warn!("dropping scored game: {err}");
                }
            }
        }))?;

        log::info!(
            "scoring bridge installed (inbound `{}`, outbound `{}`)",
            config.ports.inbound,
            config.ports.outbound
        );

        Ok(Self {
            app,
            trace_payloads,
            stats,
        })
    }

    /// Routes one host message.
    ///
    /// A `score` message forwards its payload to the inbound port exactly
    /// once. Nothing else is forwarded.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnrecognizedMessageType`] for any other tag,
    /// [`BridgeError::MissingValue`] for a `score` message without payload,
    /// and [`BridgeError::Port`] if the inbound port fails.
    pub fn dispatch(&self, message: HostMessage<A::Game>) -> Result<(), BridgeError> {
        match message.kind() {
            MessageKind::Score => {
                let game = message.value.ok_or(BridgeError::MissingValue)?;
                if self.trace_payloads {
                    log::debug!("receiving game to score: {game:?}");
                }
                self.app.send_game(game)?;
                BridgeStats::bump(&self.stats.forwarded);
                Ok(())
            }
            MessageKind::Unrecognized => Err(BridgeError::UnrecognizedMessageType {
                tag: message.tag,
            }),
        }
    }

    /// Host message handler.
    ///
    /// Failures are logged and counted as diagnostics. The message is dropped
    /// and later messages are handled normally.
    pub fn on_message(&self, message: HostMessage<A::Game>) {
        if let Err(err) = self.dispatch(message) {
            BridgeStats::bump(&self.stats.diagnostics);
            log::error!("{err}");
        }
    }

    /// Traffic counters. The handle stays valid after the bridge is dropped.
    #[must_use]
    pub fn stats(&self) -> Arc<BridgeStats> {
        Arc::clone(&self.stats)
    }

    /// Mutable access to the owned scoring application.
    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc, sync::mpsc};

    use proptest::prelude::*;
    use serde_json::{Value, json};

    use super::*;

    /// Records inbound games and lets tests emit on the outbound port.
    #[derive(Default)]
    struct RecordingApp {
        received: Rc<RefCell<Vec<Value>>>,
        sink: Option<Box<dyn FnMut(Value)>>,
        reject: bool,
    }

    impl RecordingApp {
        fn emit(&mut self, game: Value) {
            (self.sink.as_mut().expect("subscribed"))(game);
        }
    }

    impl ScoringApp for RecordingApp {
        type Game = Value;

        fn send_game(&self, game: Value) -> Result<(), PortError> {
            if self.reject {
                return Err(PortError::Rejected {
                    port: "receiveSentGame".to_owned(),
                });
            }
            self.received.borrow_mut().push(game);
            Ok(())
        }

        fn subscribe_scored(&mut self, sink: Box<dyn FnMut(Value)>) -> Result<(), PortError> {
            if self.sink.is_some() {
                return Err(PortError::AlreadySubscribed);
            }
            self.sink = Some(sink);
            Ok(())
        }
    }

    fn install() -> (Bridge<RecordingApp>, Rc<RefCell<Vec<Value>>>, mpsc::Receiver<Value>) {
        let app = RecordingApp::default();
        let received = Rc::clone(&app.received);
        let (tx, rx) = mpsc::channel();
        let bridge = Bridge::install(app, tx, &BridgeConfig::default()).unwrap();
        (bridge, received, rx)
    }

    #[test]
    fn test_score_message_is_forwarded_unchanged() {
        let (bridge, received, _rx) = install();

        bridge.on_message(HostMessage::score(json!({ "id": 1, "state": "X" })));

        assert_eq!(*received.borrow(), vec![json!({ "id": 1, "state": "X" })]);
        let stats = bridge.stats();
        assert_eq!(stats.forwarded(), 1);
        assert_eq!(stats.diagnostics(), 0);
    }

    #[test]
    fn test_null_score_value_is_forwarded() {
        let (bridge, received, _rx) = install();
        let message: HostMessage<Value> =
            serde_json::from_value(json!({ "type": "score", "value": null })).unwrap();

        bridge.on_message(message);

        assert_eq!(*received.borrow(), vec![Value::Null]);
        assert_eq!(bridge.stats().diagnostics(), 0);
    }

    #[test]
    fn test_unrecognized_message_records_one_diagnostic() {
        let (bridge, received, _rx) = install();
        crate::test_logger::start();

        bridge.on_message(HostMessage::tagged("noop"));

        let errors = crate::test_logger::take(log::Level::Error);
        assert_eq!(errors, vec!["unhandled worker message type: noop".to_owned()]);
        assert!(received.borrow().is_empty());
        assert_eq!(bridge.stats().diagnostics(), 1);
        assert_eq!(bridge.stats().forwarded(), 0);
    }

    #[test]
    fn test_dispatch_reports_tag() {
        let (bridge, _received, _rx) = install();

        assert_eq!(
            bridge.dispatch(HostMessage::tagged("noop")),
            Err(BridgeError::UnrecognizedMessageType {
                tag: Some("noop".to_owned())
            })
        );
        let untagged = HostMessage {
            tag: None,
            value: Some(json!(1)),
        };
        assert_eq!(
            bridge.dispatch(untagged),
            Err(BridgeError::UnrecognizedMessageType { tag: None })
        );
        assert_eq!(
            bridge.dispatch(HostMessage::tagged("score")),
            Err(BridgeError::MissingValue)
        );
    }

    #[test]
    fn test_processing_continues_after_diagnostic() {
        let (bridge, received, _rx) = install();

        bridge.on_message(HostMessage::tagged("noop"));
        bridge.on_message(HostMessage::score(json!(1)));
        bridge.on_message(HostMessage::score(json!(2)));

        assert_eq!(*received.borrow(), vec![json!(1), json!(2)]);
        assert_eq!(bridge.stats().diagnostics(), 1);
    }

    #[test]
    fn test_inbound_port_failure_is_a_diagnostic() {
        let app = RecordingApp {
            reject: true,
            ..RecordingApp::default()
        };
        let (tx, _rx) = mpsc::channel();
        let bridge = Bridge::install(app, tx, &BridgeConfig::default()).unwrap();

        bridge.on_message(HostMessage::score(json!({})));

        assert_eq!(bridge.stats().forwarded(), 0);
        assert_eq!(bridge.stats().diagnostics(), 1);
    }

    #[test]
    fn test_scored_game_is_posted_to_host() {
        let (mut bridge, _received, rx) = install();

        bridge.app_mut().emit(json!({ "id": 1, "score": 42 }));

        assert_eq!(rx.try_recv(), Ok(json!({ "id": 1, "score": 42 })));
        assert!(rx.try_recv().is_err());
        assert_eq!(bridge.stats().posted(), 1);
    }

    #[test]
    fn test_host_disconnect_is_counted() {
        let (mut bridge, _received, rx) = install();
        drop(rx);

        bridge.app_mut().emit(json!(0));

        assert_eq!(bridge.stats().posted(), 0);
        assert_eq!(bridge.stats().post_failures(), 1);
    }

    #[test]
    fn test_install_fails_when_already_subscribed() {
        let mut app = RecordingApp::default();
        app.subscribe_scored(Box::new(|_| {})).unwrap();
        let (tx, _rx) = mpsc::channel();

        let err = Bridge::install(app, tx, &BridgeConfig::default()).unwrap_err();
        assert_eq!(err, BridgeError::Port(PortError::AlreadySubscribed));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::from),
            any::<i64>().prop_map(Value::from),
            "[a-z]{0,8}".prop_map(Value::from),
        ];
        leaf.prop_recursive(3, 16, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..4)
                    .prop_map(|map| Value::Object(map.into_iter().collect())),
            ]
        })
    }

    proptest! {
        #[test]
        fn prop_games_pass_through_in_order(games in prop::collection::vec(arb_json(), 0..8)) {
            let (mut bridge, received, rx) = install();

            for game in &games {
                bridge.on_message(HostMessage::score(game.clone()));
            }
            prop_assert_eq!(&*received.borrow(), &games);

            for game in &games {
                bridge.app_mut().emit(game.clone());
            }
            let posted: Vec<Value> = rx.try_iter().collect();
            prop_assert_eq!(posted, games);
        }
    }
}
