use std::cell::Cell;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

thread_local! {
    static UNLOAD_BLOCKED: Cell<bool> = const { Cell::new(false) };
    static UNLOAD_LISTENER_INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// Whether closing or reloading the tab should prompt. The editor view
/// updates this on every render from the guard's unload decision.
pub fn set_unload_blocked(blocked: bool) {
    UNLOAD_BLOCKED.with(|flag| flag.set(blocked));
}

/// Installs the `beforeunload` listener once for the page lifetime.
pub fn install_unload_guard() {
    if UNLOAD_LISTENER_INSTALLED.with(|installed| installed.replace(true)) {
        return;
    }
    let Some(window) = web_sys::window() else {
        return;
    };

    let callback = Closure::wrap(Box::new(move |event: web_sys::BeforeUnloadEvent| {
        if UNLOAD_BLOCKED.with(Cell::get) {
            event.prevent_default();
            // Older browsers only prompt when a return value is set.
            event.set_return_value("You have unsaved changes");
        }
    }) as Box<dyn FnMut(web_sys::BeforeUnloadEvent)>);

    let _ = window
        .add_event_listener_with_callback("beforeunload", callback.as_ref().unchecked_ref());

    // Keep listener alive for app lifetime.
    callback.forget();
}
