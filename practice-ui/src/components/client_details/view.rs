//! Main ClientDetailsView component

use dioxus::prelude::*;
use record_editor::{
    notice_for, ClientEditor, EditMode, EditOutcome, LoadState, NavDecision, NavTarget, Navigator,
    Notice, Notifier, RecordApi, RequestScope, SaveOutcome, TagOutcome, UnloadDecision,
};
use shared_types::{
    ClientId, FilingStatus, FIELD_FILING_STATUS, FIELD_SPOUSE_EMAIL, FIELD_SPOUSE_FIRST_NAME,
    FIELD_SPOUSE_LAST_NAME, FIELD_SPOUSE_PHONE, FIELD_TAGS,
};

use crate::api::{update_locked_fields, GlooRecordApi};
use crate::components::{ToastNotifier, ViewNavigator, CLIENTS_ROUTE};
use crate::interop::{install_unload_guard, set_unload_blocked};

use super::dialogs::UnsavedChangesDialog;
use super::logic::*;
use super::styles::*;
use super::types::*;

fn start_load(mut editor: Signal<ClientEditor>, scope: RequestScope) {
    let id = match editor.write().begin_load() {
        Ok(id) => id,
        Err(e) => {
            ToastNotifier.notify(Notice::error(e.to_string()));
            return;
        }
    };

    spawn(async move {
        match scope.run(GlooRecordApi.get_record(&id)).await {
            Ok(result) => editor.write().finish_load(result),
            Err(_) => {
                dioxus_logger::tracing::debug!(client_id = %id, "load cancelled");
                editor.write().abort_load();
            }
        }
    });
}

fn report(outcome: &SaveOutcome, navigator: ViewNavigator) {
    if let Some(notice) = notice_for(outcome) {
        ToastNotifier.notify(notice);
    }
    if let Some(target) = proceed_target(outcome) {
        navigator.navigate(target);
    }
}

/// Save from the toolbar or the unsaved-changes dialog. The editor is only
/// borrowed between awaits, never across one.
fn start_save(mut editor: Signal<ClientEditor>, navigator: ViewNavigator, scope: RequestScope) {
    let start = editor.write().begin_save();
    let (id, patch) = match submission(start) {
        Ok(request) => request,
        Err(outcome) => {
            report(&outcome, navigator);
            return;
        }
    };

    spawn(async move {
        let api = GlooRecordApi;
        let result = match scope.run(api.update_record(&id, &patch)).await {
            Ok(result) => result,
            Err(_) => {
                editor.write().abort_save();
                return;
            }
        };

        let outcome = editor.write().finish_save(result);
        if matches!(outcome, SaveOutcome::Saved { .. }) {
            if let Ok(refetched) = scope.run(api.get_record(&id)).await {
                editor.write().finish_refetch(refetched);
            }
        }
        report(&outcome, navigator);
    });
}

fn tab_style(active: bool) -> &'static str {
    if active {
        TAB_ACTIVE_STYLE
    } else {
        TAB_STYLE
    }
}

fn request_navigation(
    mut editor: Signal<ClientEditor>,
    navigator: ViewNavigator,
    target: NavTarget,
) {
    let decision = editor.write().request_navigation(target);
    if let NavDecision::Proceed(target) = decision {
        navigator.navigate(&target);
    }
}

#[component]
pub fn ClientDetailsView(client_id: ClientId, navigator: ViewNavigator) -> Element {
    let editor = use_signal(|| ClientEditor::new(client_id.clone()));
    let scope = use_hook(RequestScope::new);
    let mut load_started = use_signal(|| false);

    {
        let scope = scope.clone();
        use_drop(move || {
            scope.cancel();
            set_unload_blocked(false);
        });
    }

    {
        let scope = scope.clone();
        use_effect(move || {
            if load_started() {
                return;
            }
            load_started.set(true);
            install_unload_guard();
            start_load(editor, scope.clone());
        });
    }

    use_effect(move || {
        let blocked = editor.read().unload_decision() == UnloadDecision::Block;
        set_unload_blocked(blocked);
    });

    let load_state = editor.read().load_state().clone();
    match load_state {
        LoadState::Idle if load_started() => {
            let load_scope = scope.clone();
            rsx! {
                div {
                    style: PANEL_STYLE,
                    span { style: "color: #9ca3af;", "Loading was interrupted." }
                    button {
                        style: PRIMARY_BUTTON_STYLE,
                        onclick: move |_| start_load(editor, load_scope.clone()),
                        "Load client"
                    }
                }
            }
        }
        LoadState::Idle | LoadState::Loading => rsx! {
            div { style: PANEL_STYLE, span { style: "color: #9ca3af;", "Loading client..." } }
        },
        LoadState::Failed(message) => {
            let retry_scope = scope.clone();
            rsx! {
                div {
                    style: PANEL_STYLE,
                    div { style: "color: #f87171;", "Failed to load client: {message}" }
                    div {
                        style: "display: flex; gap: 0.5rem;",
                        button {
                            style: PRIMARY_BUTTON_STYLE,
                            onclick: move |_| start_load(editor, retry_scope.clone()),
                            "Retry"
                        }
                        button {
                            style: SECONDARY_BUTTON_STYLE,
                            onclick: move |_| request_navigation(editor, navigator, NavTarget::Close),
                            "Back to clients"
                        }
                    }
                }
            }
        }
        LoadState::Ready => rsx! {
            ClientDetailsBody { editor, navigator, scope: ScopeProp(scope.clone()) }
        },
    }
}

/// Props wrapper; every clone of a scope shares one token.
#[derive(Clone)]
struct ScopeProp(RequestScope);

impl PartialEq for ScopeProp {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ClientDetailsBody(
    editor: Signal<ClientEditor>,
    navigator: ViewNavigator,
    scope: ScopeProp,
) -> Element {
    let mut editor = editor;
    let tab = (navigator.tab)();
    let (title, mode, saving, pending, changed) = {
        let state = editor.read();
        let title = state
            .record()
            .map(|record| record.compose_display_name())
            .unwrap_or_default();
        let changed = if state.guard().is_pending() {
            changed_labels(&state.diff())
        } else {
            Vec::new()
        };
        (
            title,
            state.mode(),
            state.is_saving(),
            state.guard().is_pending(),
            changed,
        )
    };
    let ScopeProp(scope) = scope;
    let toolbar_scope = scope.clone();
    let dialog_scope = scope.clone();

    rsx! {
        div {
            style: PANEL_STYLE,
            div {
                style: "display: flex; justify-content: space-between; align-items: center;",
                div {
                    style: "display: flex; align-items: center; gap: 0.75rem;",
                    button {
                        style: SECONDARY_BUTTON_STYLE,
                        onclick: move |_| {
                            request_navigation(editor, navigator, NavTarget::Route(CLIENTS_ROUTE.to_string()))
                        },
                        "← Clients"
                    }
                    h2 { style: "margin: 0; font-size: 1.25rem;", "{title}" }
                }
                if tab == DetailTab::Profile {
                    div {
                        style: "display: flex; gap: 0.5rem;",
                        if mode == EditMode::Editing {
                            button {
                                style: SECONDARY_BUTTON_STYLE,
                                disabled: saving,
                                onclick: move |_| editor.write().cancel_edit(),
                                "Cancel"
                            }
                            button {
                                style: PRIMARY_BUTTON_STYLE,
                                disabled: saving,
                                onclick: move |_| start_save(editor, navigator, toolbar_scope.clone()),
                                "{save_button_label(saving)}"
                            }
                        } else {
                            button {
                                style: PRIMARY_BUTTON_STYLE,
                                onclick: move |_| {
                                    if let Err(e) = editor.write().enter_edit() {
                                        ToastNotifier.notify(Notice::error(e.to_string()));
                                    }
                                },
                                "Edit"
                            }
                        }
                    }
                }
            }

            div {
                style: "display: flex; gap: 0.25rem; border-bottom: 1px solid #374151;",
                for candidate in [DetailTab::Profile, DetailTab::Locks] {
                    button {
                        key: "{candidate.as_str()}",
                        style: tab_style(candidate == tab),
                        onclick: move |_| {
                            request_navigation(editor, navigator, NavTarget::Tab(candidate.as_str().to_string()))
                        },
                        "{candidate.label()}"
                    }
                }
            }

            match tab {
                DetailTab::Profile => rsx! { ProfilePanel { editor } },
                DetailTab::Locks => rsx! { LocksPanel { editor } },
            }
        }

        if pending {
            UnsavedChangesDialog {
                saving,
                changed_fields: changed,
                on_save: move |_| start_save(editor, navigator, dialog_scope.clone()),
                on_cancel: move |_| {
                    editor.write().cancel_navigation();
                },
            }
        }
    }
}

#[component]
fn ProfilePanel(editor: Signal<ClientEditor>) -> Element {
    let show_spouse = {
        let state = editor.read();
        let snapshot = state.snapshot();
        let spouse_values: Vec<String> = [
            FIELD_SPOUSE_FIRST_NAME,
            FIELD_SPOUSE_LAST_NAME,
            FIELD_SPOUSE_EMAIL,
            FIELD_SPOUSE_PHONE,
        ]
        .iter()
        .map(|field| snapshot.text(field))
        .collect();
        show_spouse_section(&snapshot.text(FIELD_FILING_STATUS), &spouse_values)
    };

    rsx! {
        for section in PROFILE_SECTIONS.iter().filter(|section| !section.spouse || show_spouse) {
            div {
                key: "{section.title}",
                h3 { style: "margin: 0 0 0.5rem 0; font-size: 0.95rem; color: #d1d5db;", "{section.title}" }
                div {
                    style: SECTION_STYLE,
                    for def in section.fields.iter().copied() {
                        ProfileField { key: "{def.name}", editor, def }
                    }
                }
            }
        }
        TagEditor { editor }
    }
}

#[component]
fn ProfileField(editor: Signal<ClientEditor>, def: FieldDef) -> Element {
    let mut editor = editor;
    let (text, locked, editing) = {
        let state = editor.read();
        (
            state.snapshot().text(def.name),
            state.is_locked(def.name),
            state.mode() == EditMode::Editing,
        )
    };

    let on_input = move |evt: FormEvent| {
        let Some(value) = input_value(def.kind, &evt.value()) else {
            return;
        };
        if editor.write().edit(def.name, value) == EditOutcome::Locked {
            ToastNotifier.notify(Notice::warning(format!("{} is locked", def.label)));
        }
    };

    let input_style = if locked { INPUT_LOCKED_STYLE } else { INPUT_STYLE };
    let hint = if locked { "Locked by an administrator" } else { "" };

    rsx! {
        label {
            style: LABEL_STYLE,
            title: hint,
            span {
                "{def.label}"
                if locked { " 🔒" }
            }
            if !editing {
                span { style: VALUE_STYLE, "{display_value(def.kind, &text)}" }
            } else if def.kind == FieldKind::FilingStatus {
                select {
                    style: input_style,
                    disabled: locked,
                    value: "{text}",
                    onchange: on_input,
                    option { value: "", selected: text.is_empty(), "Not set" }
                    for status in FilingStatus::ALL {
                        option {
                            key: "{status.as_str()}",
                            value: status.as_str(),
                            selected: text == status.as_str(),
                            "{status.label()}"
                        }
                    }
                }
            } else {
                input {
                    style: input_style,
                    r#type: def.kind.input_type(),
                    disabled: locked,
                    value: "{text}",
                    oninput: on_input,
                }
            }
        }
    }
}

#[component]
fn TagEditor(editor: Signal<ClientEditor>) -> Element {
    let mut editor = editor;
    let mut draft = use_signal(String::new);
    let (tags, locked, editing) = {
        let state = editor.read();
        (
            state.snapshot().working_tags().to_vec(),
            state.is_locked(FIELD_TAGS),
            state.mode() == EditMode::Editing,
        )
    };

    let mut add_tag = move || {
        let outcome = editor.write().add_tag(&draft());
        match outcome {
            TagOutcome::Added => draft.set(String::new()),
            TagOutcome::Duplicate => ToastNotifier.notify(Notice::warning("Tag already added")),
            TagOutcome::Locked => ToastNotifier.notify(Notice::warning("Tags are locked")),
            _ => {}
        }
    };

    rsx! {
        div {
            h3 {
                style: "margin: 0 0 0.5rem 0; font-size: 0.95rem; color: #d1d5db;",
                "Tags"
                if locked { " 🔒" }
            }
            div {
                style: "display: flex; flex-wrap: wrap; gap: 0.375rem; align-items: center;",
                if tags.is_empty() {
                    span { style: "color: #6b7280; font-size: 0.85rem;", "No tags" }
                }
                for tag in tags {
                    span {
                        key: "{tag}",
                        style: TAG_STYLE,
                        "{tag}"
                        if editing && !locked {
                            button {
                                style: "background: none; border: none; color: #9ca3af; cursor: pointer; padding: 0;",
                                onclick: {
                                    let tag = tag.clone();
                                    move |_| {
                                        editor.write().remove_tag(&tag);
                                    }
                                },
                                "×"
                            }
                        }
                    }
                }
                if editing && !locked {
                    input {
                        style: INPUT_STYLE,
                        placeholder: "Add tag",
                        value: "{draft}",
                        oninput: move |evt: FormEvent| draft.set(evt.value()),
                        onkeydown: move |evt: KeyboardEvent| {
                            if evt.key() == Key::Enter {
                                add_tag();
                            }
                        },
                    }
                    button {
                        style: SECONDARY_BUTTON_STYLE,
                        onclick: move |_| add_tag(),
                        "Add"
                    }
                }
            }
        }
    }
}

#[component]
fn LocksPanel(editor: Signal<ClientEditor>) -> Element {
    let mut editor = editor;
    let rows = lock_rows(editor.read().locks());

    let toggle = move |form: &'static str| {
        let (id, names) = {
            let state = editor.read();
            (
                state.record_id().clone(),
                toggled_lock_names(state.locks(), form),
            )
        };
        spawn(async move {
            match update_locked_fields(&id, names).await {
                Ok(record) => {
                    editor.write().finish_refetch(Ok(record));
                    ToastNotifier.notify(Notice::success("Field locks updated"));
                }
                Err(e) => {
                    ToastNotifier.notify(Notice::error(format!("Failed to update field locks: {e}")))
                }
            }
        });
    };

    rsx! {
        p {
            style: "margin: 0; color: #9ca3af; font-size: 0.85rem;",
            "Locked fields are shown read-only and rejected by the server when changed."
        }
        table {
            style: "width: 100%; border-collapse: collapse; font-size: 0.9rem;",
            thead {
                tr {
                    th { style: "text-align: left; padding: 0.375rem;", "Field" }
                    th { style: "text-align: left; padding: 0.375rem; color: #9ca3af;", "API name" }
                    th { style: "text-align: right; padding: 0.375rem;", "Locked" }
                }
            }
            tbody {
                for row in rows {
                    tr {
                        key: "{row.form}",
                        td { style: "padding: 0.375rem;", "{row.label}" }
                        td { style: "padding: 0.375rem; color: #9ca3af; font-family: monospace;", "{row.api}" }
                        td {
                            style: "padding: 0.375rem; text-align: right;",
                            input {
                                r#type: "checkbox",
                                checked: row.locked,
                                onchange: move |_| toggle(row.form),
                            }
                        }
                    }
                }
            }
        }
    }
}
