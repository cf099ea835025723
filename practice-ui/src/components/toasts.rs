//! Transient notifications

use std::cell::Cell;

use dioxus::core::spawn_forever;
use dioxus::prelude::*;
use gloo_timers::future::TimeoutFuture;
use record_editor::{Notice, NoticeLevel, Notifier};

const TOAST_TTL_MS: u32 = 4000;

pub static TOASTS: GlobalSignal<Vec<Toast>> = GlobalSignal::new(Vec::new);

thread_local! {
    static NEXT_TOAST_ID: Cell<u64> = const { Cell::new(0) };
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub notice: Notice,
}

/// Pushes notices onto [`TOASTS`] and expires them after a few seconds.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToastNotifier;

impl Notifier for ToastNotifier {
    fn notify(&self, notice: Notice) {
        let id = NEXT_TOAST_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        dioxus_logger::tracing::info!(level = ?notice.level, message = %notice.message, "toast");
        TOASTS.write().push(Toast { id, notice });

        spawn_forever(async move {
            TimeoutFuture::new(TOAST_TTL_MS).await;
            TOASTS.write().retain(|toast| toast.id != id);
        });
    }
}

fn accent(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "#10b981",
        NoticeLevel::Warning => "#f59e0b",
        NoticeLevel::Error => "#ef4444",
    }
}

#[component]
pub fn ToastStack() -> Element {
    let toasts = TOASTS.read().clone();

    rsx! {
        div {
            style: "position: fixed; right: 1rem; bottom: 1rem; display: flex; flex-direction: column; gap: 0.5rem; z-index: 2000;",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    style: "background: #1f2937; border-left: 4px solid {accent(toast.notice.level)}; padding: 0.75rem 1rem; border-radius: 0.375rem; min-width: 260px; box-shadow: 0 4px 12px rgba(0,0,0,0.4); display: flex; justify-content: space-between; gap: 1rem;",
                    span { "{toast.notice.message}" }
                    button {
                        style: "background: none; border: none; color: #9ca3af; cursor: pointer;",
                        onclick: move |_| TOASTS.write().retain(|t| t.id != toast.id),
                        "×"
                    }
                }
            }
        }
    }
}
