//! Port access for a compiled JavaScript scoring application.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};

use crate::{
    config::PortNames,
    port::{PortError, ScoredGameSink, ScoringApp},
};

/// A scoring application object exposing `app.ports.<name>.send` and
/// `app.ports.<name>.subscribe`.
pub struct JsScoringApp {
    ports: PortNames,
    inbound: JsValue,
    outbound: JsValue,
    subscription: Option<Closure<dyn FnMut(JsValue)>>,
}

impl std::fmt::Debug for JsScoringApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsScoringApp")
            .field("ports", &self.ports)
            .field("subscribed", &self.subscription.is_some())
            .finish_non_exhaustive()
    }
}

impl JsScoringApp {
    /// Looks up both ports on an initialized application.
    ///
    /// # Errors
    ///
    /// Returns [`PortError::PortMissing`] if `app.ports` or either named port
    /// is absent.
    pub fn connect(app: &JsValue, ports: PortNames) -> Result<Self, PortError> {
        let table = property(app, "ports").ok_or_else(|| PortError::PortMissing {
            port: ports.inbound.clone(),
        })?;
        let inbound = lookup_port(&table, &ports.inbound)?;
        let outbound = lookup_port(&table, &ports.outbound)?;

        Ok(Self {
            ports,
            inbound,
            outbound,
            subscription: None,
        })
    }
}

impl ScoringApp for JsScoringApp {
    type Game = JsValue;

    fn send_game(&self, game: JsValue) -> Result<(), PortError> {
        let send = port_method(&self.inbound, "send", &self.ports.inbound)?;
        send.call1(&self.inbound, &game)
            .map(|_| ())
            .map_err(|_| PortError::Rejected {
                port: self.ports.inbound.clone(),
            })
    }

    fn subscribe_scored(&mut self, sink: ScoredGameSink<JsValue>) -> Result<(), PortError> {
        if self.subscription.is_some() {
            return Err(PortError::AlreadySubscribed);
        }
        let subscribe = port_method(&self.outbound, "subscribe", &self.ports.outbound)?;

        let listener = Closure::wrap(sink);
        subscribe
            .call1(&self.outbound, listener.as_ref())
            .map_err(|_| PortError::Rejected {
                port: self.ports.outbound.clone(),
            })?;
        self.subscription = Some(listener);
        Ok(())
    }
}

/// Reads `target[key]`, treating `undefined`, `null` and throwing getters as absent.
pub(super) fn property(target: &JsValue, key: &str) -> Option<JsValue> {
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn lookup_port(table: &JsValue, name: &str) -> Result<JsValue, PortError> {
    property(table, name).ok_or_else(|| PortError::PortMissing {
        port: name.to_owned(),
    })
}

fn port_method(port: &JsValue, method: &str, name: &str) -> Result<Function, PortError> {
    property(port, method)
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(|| PortError::NotCallable {
            port: name.to_owned(),
        })
}
