//! Practice desk screens
//!
//! A single pane switches between the client list and one client's
//! details. Moving away from the details screen goes through the editor's
//! navigation guard, so the pane is driven by a signal-backed navigator
//! rather than a router.

use dioxus::prelude::*;
use record_editor::{NavTarget, Navigator};
use shared_types::ClientId;

pub mod client_details;
pub mod client_list;
pub mod toasts;

pub use client_details::{ClientDetailsView, DetailTab};
pub use client_list::ClientListView;
pub use toasts::{ToastNotifier, ToastStack, TOASTS};

pub const CLIENTS_ROUTE: &str = "/clients";

/// Which screen the pane shows
#[derive(Debug, Clone, PartialEq)]
pub enum AppView {
    ClientList,
    ClientDetails(ClientId),
}

impl AppView {
    /// `/clients` or `/clients/{id}`; anything else falls back to the list.
    pub fn from_route(route: &str) -> Self {
        let rest = route
            .trim_end_matches('/')
            .strip_prefix(CLIENTS_ROUTE)
            .unwrap_or_default();
        match rest.strip_prefix('/') {
            Some(id) if !id.is_empty() && !id.contains('/') => {
                AppView::ClientDetails(ClientId::from(id))
            }
            _ => AppView::ClientList,
        }
    }

    pub fn route(&self) -> String {
        match self {
            AppView::ClientList => CLIENTS_ROUTE.to_string(),
            AppView::ClientDetails(id) => format!("{CLIENTS_ROUTE}/{id}"),
        }
    }
}

/// Performs navigation the guard has released
#[derive(Clone, Copy, PartialEq)]
pub struct ViewNavigator {
    pub view: Signal<AppView>,
    pub tab: Signal<DetailTab>,
}

impl Navigator for ViewNavigator {
    fn navigate(&self, target: &NavTarget) {
        let mut view = self.view;
        let mut tab = self.tab;
        match target {
            NavTarget::Route(route) => {
                let next = AppView::from_route(route);
                if next != *view.peek() {
                    tab.set(DetailTab::Profile);
                }
                view.set(next);
            }
            NavTarget::Tab(name) => tab.set(DetailTab::parse(name)),
            NavTarget::Close => {
                tab.set(DetailTab::Profile);
                view.set(AppView::ClientList);
            }
        }
    }
}

#[component]
pub fn PracticeDesk() -> Element {
    let view = use_signal(|| AppView::ClientList);
    let tab = use_signal(|| DetailTab::Profile);
    let navigator = ViewNavigator { view, tab };

    rsx! {
        div {
            style: "max-width: 960px; margin: 0 auto; display: flex; flex-direction: column; gap: 1rem;",
            h1 {
                style: "font-size: 1.5rem; font-weight: 600; margin: 0;",
                "Practice Desk"
            }
            match view() {
                AppView::ClientList => rsx! {
                    ClientListView {
                        on_open: move |id: ClientId| {
                            navigator.navigate(&NavTarget::Route(AppView::ClientDetails(id).route()));
                        },
                    }
                },
                AppView::ClientDetails(client_id) => rsx! {
                    ClientDetailsView {
                        key: "{client_id}",
                        client_id: client_id.clone(),
                        navigator,
                    }
                },
            }
            ToastStack {}
        }
    }
}
