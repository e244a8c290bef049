//! Worker global scope integration.

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue, closure::Closure};
use web_sys::{DedicatedWorkerGlobalScope, MessageEvent, UrlSearchParams};

use super::{ConsoleLogger, JsScoringApp, app::property, console};
use crate::{
    bridge::{Bridge, BridgeError},
    config::BridgeConfig,
    message::{HostMessage, PostedData},
    port::{HostSink, PortError},
    version,
};

/// The dedicated worker scope, used as the host sink.
#[derive(Debug, Clone)]
pub struct WorkerScope {
    global: DedicatedWorkerGlobalScope,
}

impl WorkerScope {
    /// Returns the scope of the running worker.
    #[must_use]
    pub fn current() -> Self {
        Self {
            global: js_sys::global().unchecked_into(),
        }
    }
}

impl HostSink<JsValue> for WorkerScope {
    fn post_message(&self, game: JsValue) -> Result<(), PortError> {
        self.global
            .post_message(&game)
            .map_err(|_| PortError::Rejected {
                port: "postMessage".to_owned(),
            })
    }
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum StartError {
    #[display("failed to import `{script}`")]
    Import { script: String },
    #[display("`Elm.{path}` is not defined")]
    ModuleMissing { path: String },
    #[display("`Elm.{path}.init` failed")]
    InitFailed { path: String },
    #[display("{_0}")]
    #[from]
    Bridge(BridgeError),
}

impl From<PortError> for StartError {
    fn from(err: PortError) -> Self {
        StartError::Bridge(err.into())
    }
}

/// Starts the scoring worker in the current dedicated worker scope.
///
/// Loads the scoring script, initializes the application and installs the
/// bridge as the scope's `onmessage` handler.
///
/// # Errors
///
/// Returns the startup failure as a JavaScript error string after logging it.
pub fn start_worker() -> Result<(), JsValue> {
    console::install_panic_hook();
    if ConsoleLogger::init(log::LevelFilter::Info).is_err() {
        log::warn!("a logger was already installed");
    }

    let scope = WorkerScope::current();
    let config = read_config(&scope.global);
    log::set_max_level(config.log_level);

    log::info!(
        "starting scoring worker, version={}",
        version::build_version()
    );

    match install(scope, &config) {
        Ok(()) => {
            log::info!("scoring worker ready");
            Ok(())
        }
        Err(err) => {
            log::error!("scoring worker failed to start: {err}");
            Err(JsValue::from_str(&err.to_string()))
        }
    }
}

fn install(scope: WorkerScope, config: &BridgeConfig) -> Result<(), StartError> {
    scope
        .global
        .import_scripts_1(&config.scoring_script)
        .map_err(|_| StartError::Import {
            script: config.scoring_script.clone(),
        })?;
    log::debug!("imported scoring script `{}`", config.scoring_script);

    let app = init_module(&scope.global, &config.scoring_module)?;
    let app = JsScoringApp::connect(&app, config.ports.clone())?;

    let global = scope.global.clone();
    let bridge = Bridge::install(app, scope, config)?;

    let onmessage = Closure::wrap(Box::new(move |event: MessageEvent| {
        bridge.on_message(HostMessage::read(&Posted(&event.data())));
    }) as Box<dyn FnMut(MessageEvent)>);
    global.set_onmessage(Some(onmessage.as_ref().unchecked_ref()));
    // The handler owns the bridge for the rest of the worker's life.
    onmessage.forget();

    Ok(())
}

/// Resolves `Elm.<path>` and calls its `init()`.
fn init_module(global: &JsValue, path: &str) -> Result<JsValue, StartError> {
    let missing = || StartError::ModuleMissing {
        path: path.to_owned(),
    };

    let mut module = property(global, "Elm").ok_or_else(missing)?;
    for segment in path.split('.') {
        module = property(&module, segment).ok_or_else(missing)?;
    }

    let init = property(&module, "init")
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(missing)?;
    init.call0(&module).map_err(|_| StartError::InitFailed {
        path: path.to_owned(),
    })
}

/// Posted data is read with `Reflect`; an absent field reads as `undefined`.
struct Posted<'a>(&'a JsValue);

impl PostedData for Posted<'_> {
    type Field = JsValue;

    fn field(&self, name: &str) -> Option<JsValue> {
        Reflect::get(self.0, &JsValue::from_str(name)).ok()
    }

    fn field_string(field: &JsValue) -> Option<String> {
        field.as_string()
    }
}

fn read_config(global: &DedicatedWorkerGlobalScope) -> BridgeConfig {
    let search = global.location().search();
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        log::warn!("ignoring unreadable worker query `{search}`");
        return BridgeConfig::default();
    };
    BridgeConfig::from_lookup(|key| params.get(key))
}
