pub mod app;
pub mod domain;
pub mod routes;
pub mod shared;

use leptos::task::spawn_local;
use wasm_bindgen::prelude::wasm_bindgen;

use crate::shared::config::AppConfig;

#[wasm_bindgen]
pub fn hydrate() {
    // initializes logging using the `log` crate
    _ = console_log::init_with_level(log::Level::Debug);
    console_error_panic_hook::set_once();

    // display settings are needed before the first date is rendered
    spawn_local(async {
        let config = AppConfig::load().await;
        leptos::mount::mount_to_body(move || leptos::view! { <app::App config=config.clone() /> });
    });
}

#[wasm_bindgen(start)]
pub fn start() {
    hydrate();
}
