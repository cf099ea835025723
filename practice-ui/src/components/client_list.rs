use dioxus::prelude::*;
use shared_types::{ClientId, ClientSummary};

use crate::api::fetch_clients;

#[component]
pub fn ClientListView(on_open: EventHandler<ClientId>) -> Element {
    let mut clients = use_signal(|| None::<Result<Vec<ClientSummary>, String>>);
    let mut reload = use_signal(|| 0u32);

    use_effect(move || {
        let _ = reload();
        spawn(async move {
            clients.set(Some(fetch_clients().await));
        });
    });

    rsx! {
        div {
            style: "background: #1f2937; border: 1px solid #374151; border-radius: 0.5rem; padding: 1rem;",
            div {
                style: "display: flex; justify-content: space-between; align-items: center; margin-bottom: 0.75rem;",
                h2 { style: "font-size: 1.125rem; margin: 0;", "Clients" }
                button {
                    style: "background: #374151; color: white; border: none; padding: 0.375rem 0.75rem; border-radius: 0.375rem; cursor: pointer;",
                    onclick: move |_| reload += 1,
                    "Refresh"
                }
            }
            match clients() {
                None => rsx! {
                    div { style: "color: #9ca3af;", "Loading clients..." }
                },
                Some(Err(e)) => rsx! {
                    div { style: "color: #f87171;", "Failed to load clients: {e}" }
                },
                Some(Ok(list)) if list.is_empty() => rsx! {
                    div { style: "color: #9ca3af;", "No clients yet" }
                },
                Some(Ok(list)) => rsx! {
                    ul {
                        style: "list-style: none; margin: 0; padding: 0; display: flex; flex-direction: column; gap: 0.25rem;",
                        for client in list {
                            ClientRow { key: "{client.id}", client: client.clone(), on_open }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn ClientRow(client: ClientSummary, on_open: EventHandler<ClientId>) -> Element {
    let status = client
        .filing_status
        .map(|status| status.label())
        .unwrap_or("No filing status");
    let id = client.id.clone();

    rsx! {
        li {
            style: "display: flex; justify-content: space-between; align-items: center; padding: 0.5rem 0.75rem; border-radius: 0.375rem; background: #111827; cursor: pointer;",
            onclick: move |_| on_open.call(id.clone()),
            div {
                div { style: "font-weight: 500;", "{client.display_name}" }
                div { style: "font-size: 0.8rem; color: #9ca3af;", "{client.email} · {status}" }
            }
            div {
                style: "display: flex; gap: 0.375rem; align-items: center;",
                for tag in client.tags.iter() {
                    span {
                        style: "font-size: 0.75rem; background: #374151; padding: 0.125rem 0.5rem; border-radius: 9999px;",
                        "{tag}"
                    }
                }
                if client.locked_field_count > 0 {
                    span {
                        style: "font-size: 0.75rem; color: #fbbf24;",
                        "🔒 {client.locked_field_count}"
                    }
                }
            }
        }
    }
}
