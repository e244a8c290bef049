//! netgo scoring web worker entry point.
//!
//! This binary is meant for WASM targets, where it runs inside a dedicated
//! worker next to the compiled scoring module.

#[cfg(target_arch = "wasm32")]
mod wasm32 {
    use wasm_bindgen::prelude::*;

    /// Installs the bridge when the worker's wasm module is instantiated.
    #[wasm_bindgen(start)]
    pub(crate) fn start() -> Result<(), JsValue> {
        netgo_worker::start_worker()
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    better_panic::install();
    env_logger::init();

    log::error!(
        "netgo-scoring-worker {} runs only inside a web worker; build it for wasm32",
        netgo_worker::version::build_version()
    );
    std::process::ExitCode::FAILURE
}
