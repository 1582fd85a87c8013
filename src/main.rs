use log::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{window, Document, Window};

mod config;
mod dom;
mod format;
mod components {
    pub mod before_after;
    pub mod cards;
    pub mod delay_calculator;
    pub mod filters;
    pub mod reveal;
    pub mod roi_calculator;
    pub mod smooth_scroll;
}

use components::{before_after, cards, delay_calculator, filters, reveal, roi_calculator, smooth_scroll};
use config::Config;

/// `document.readyState` is `"loading"` until the parser is done.
fn still_parsing(ready_state: &str) -> bool {
    ready_state == "loading"
}

/// Wires every behavior the page markup offers. Each one is independent; a
/// missing group only disables itself.
fn attach_all(window: &Window, document: &Document) {
    let config = Config::load(document);

    let cards = cards::attach(document);
    let toggles = before_after::attach(document);
    info!("Attached {} expandable cards, {} before/after toggles", cards, toggles);

    match roi_calculator::attach(document, &config.roi) {
        Ok(()) => info!("ROI calculator ready"),
        Err(e) => debug!("ROI calculator inactive: {}", e),
    }
    match delay_calculator::attach(document, &config.delay) {
        Ok(()) => info!("Cost of delay calculator ready"),
        Err(e) => debug!("Cost of delay calculator inactive: {}", e),
    }

    for kind in [filters::VIDEO, filters::QUOTE] {
        match filters::attach(document, kind) {
            Ok(n) => info!("{} filter ready with {} controls", kind.name, n),
            Err(e) => debug!("{} filter inactive: {}", kind.name, e),
        }
    }

    let links = smooth_scroll::attach(document);
    info!("Smooth scrolling {} in-page links", links);

    if let Err(e) = reveal::attach(window, document, &config.reveal) {
        warn!("Scroll reveal disabled: {}", e);
    }
}

fn main() {
    console_error_panic_hook::set_once();

    console_log::init_with_level(config::log_level()).expect("error initializing log");

    let Some(window) = window() else {
        return;
    };
    let Some(document) = window.document() else {
        return;
    };

    if !still_parsing(&document.ready_state()) {
        attach_all(&window, &document);
        return;
    }

    let on_ready = {
        let window = window.clone();
        let document = document.clone();
        Closure::once(move || attach_all(&window, &document))
    };
    if let Err(e) = document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())
    {
        warn!("Could not wait for DOMContentLoaded: {:?}", e);
        return;
    }
    on_ready.forget();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_only_while_parsing() {
        assert!(still_parsing("loading"));
        assert!(!still_parsing("interactive"));
        assert!(!still_parsing("complete"));
    }
}
