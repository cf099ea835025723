//! Client details dialog components

use dioxus::prelude::*;

use super::styles::{PRIMARY_BUTTON_STYLE, SECONDARY_BUTTON_STYLE};

/// Shown when navigation is attempted with unsaved edits
#[component]
pub fn UnsavedChangesDialog(
    saving: bool,
    changed_fields: Vec<String>,
    on_save: Callback<()>,
    on_cancel: Callback<()>,
) -> Element {
    let changed = changed_fields.join(", ");

    rsx! {
        div {
            style: "position: fixed; top: 0; left: 0; right: 0; bottom: 0; background: rgba(0, 0, 0, 0.7); display: flex; align-items: center; justify-content: center; z-index: 1000;",
            onclick: move |_| {
                if !saving {
                    on_cancel.call(());
                }
            },
            div {
                style: "background: #1f2937; border: 1px solid #374151; border-radius: 0.5rem; padding: 1.5rem; min-width: 360px; max-width: 90vw; display: flex; flex-direction: column; gap: 1rem;",
                onclick: move |e| e.stop_propagation(),
                h3 { style: "margin: 0; font-size: 1.125rem;", "Unsaved changes" }
                p {
                    style: "margin: 0; color: #d1d5db;",
                    "You have unsaved changes. Save them before leaving?"
                }
                if !changed.is_empty() {
                    p {
                        style: "margin: 0; font-size: 0.8rem; color: #9ca3af;",
                        "Changed: {changed}"
                    }
                }
                div {
                    style: "display: flex; justify-content: flex-end; gap: 0.5rem;",
                    button {
                        style: SECONDARY_BUTTON_STYLE,
                        disabled: saving,
                        onclick: move |_| on_cancel.call(()),
                        "Keep editing"
                    }
                    button {
                        style: PRIMARY_BUTTON_STYLE,
                        disabled: saving,
                        onclick: move |_| on_save.call(()),
                        if saving { "Saving..." } else { "Save and continue" }
                    }
                }
            }
        }
    }
}
