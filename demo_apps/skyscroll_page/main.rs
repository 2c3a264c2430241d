//! Skyscroll page
//!
//! Native: `skyscroll_page [config.json]`, scroll with the mouse wheel.
//! Web: mounts on `#skyscroll-canvas` and follows the `.page` element's
//! scroll position.

use skyscroll::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

// --- Entry point ---

#[cfg(not(target_arch = "wasm32"))]
fn main() -> skyscroll::Result<()> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            ShowcaseConfig::from_file(&path)?
        }
        None => ShowcaseConfig::default(),
    };

    App::new().with_config(config).run()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);

    // Asset locators resolve against the page's own URL.
    let mut config = ShowcaseConfig::default();
    if let Some(root) = skyscroll::app::page_href() {
        config.asset_root = root;
    }

    if let Err(e) = App::new().with_config(config).run() {
        log::error!("Showcase failed to start: {e}");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
