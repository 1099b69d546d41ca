//! WASM entry point
//!
//! Reads the page configuration, installs the log sink and mounts [`App`].

use arbor_core::AppConfig;
use arbor_ui::App;
use arbor_ui::{logging, state};
use leptos::prelude::*;

fn main() {
    console_error_panic_hook::set_once();

    let (config, invalid) = match state::read_config() {
        Ok(config) => (config, None),
        Err(error) => (AppConfig::default(), Some(error)),
    };
    logging::init(&config.log_filter);
    if let Some(error) = invalid {
        tracing::warn!(%error, "Invalid page configuration, using defaults");
    }

    mount_to_body(move || view! { <App config=config /> });
}
