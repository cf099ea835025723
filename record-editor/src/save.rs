//! Save orchestrator
//!
//! Drives the editor's load/save transitions against a `RecordApi`, turns
//! every outcome into a notification, and performs released navigation.
//! Network errors stop here; nothing is retried automatically.

use shared_types::ClientId;

use crate::api::{Notice, Notifier, Navigator, RecordApi, RecordApiError};
use crate::editor::{ClientEditor, EditorError, SaveOutcome, SaveStart};
use crate::guard::{NavDecision, NavTarget};
use crate::scope::RequestScope;

pub const SAVED_MESSAGE: &str = "Client details saved";
pub const NO_CHANGES_MESSAGE: &str = "No changes to save";
pub const LOCKED_MESSAGE: &str = "Some fields are locked and cannot be changed";

/// Notification shown for a save outcome, if any.
pub fn notice_for(outcome: &SaveOutcome) -> Option<Notice> {
    match outcome {
        SaveOutcome::Saved { .. } => Some(Notice::success(SAVED_MESSAGE)),
        SaveOutcome::NoChanges { .. } => Some(Notice::success(NO_CHANGES_MESSAGE)),
        SaveOutcome::LockConflict { fields } => Some(Notice::warning(format!(
            "{LOCKED_MESSAGE}: {}",
            fields.join(", ")
        ))),
        SaveOutcome::Failed { message } => Some(Notice::error(format!("Failed to save: {message}"))),
        SaveOutcome::Blocked(e) => Some(Notice::error(e.to_string())),
        SaveOutcome::Busy | SaveOutcome::Cancelled => None,
    }
}

pub struct SaveOrchestrator<'a, A: ?Sized, N: ?Sized> {
    api: &'a A,
    notifier: &'a N,
    scope: RequestScope,
}

impl<'a, A, N> SaveOrchestrator<'a, A, N>
where
    A: RecordApi + ?Sized,
    N: Notifier + ?Sized,
{
    pub fn new(api: &'a A, notifier: &'a N) -> Self {
        Self {
            api,
            notifier,
            scope: RequestScope::new(),
        }
    }

    pub fn with_scope(mut self, scope: RequestScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> &RequestScope {
        &self.scope
    }

    /// Initial load (and the page-level retry).
    pub async fn load(&self, editor: &mut ClientEditor) -> Result<(), EditorError> {
        let id = match editor.begin_load() {
            Ok(id) => id,
            Err(e) => {
                self.notifier.notify(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        match self.scope.run(self.api.get_record(&id)).await {
            Ok(result) => editor.finish_load(result),
            Err(_) => {
                tracing::debug!(record_id = %id, "Load cancelled");
                editor.abort_load();
            }
        }
        Ok(())
    }

    pub async fn save(&self, editor: &mut ClientEditor) -> SaveOutcome {
        let outcome = self.save_inner(editor).await;
        if let Some(notice) = notice_for(&outcome) {
            self.notifier.notify(notice);
        }
        outcome
    }

    async fn save_inner(&self, editor: &mut ClientEditor) -> SaveOutcome {
        let (id, patch) = match editor.begin_save() {
            Ok(SaveStart::Submit { id, patch }) => (id, patch),
            Ok(SaveStart::NoChanges { proceed_to }) => {
                tracing::debug!(record_id = %editor.record_id(), "Nothing changed; skipping update");
                return SaveOutcome::NoChanges { proceed_to };
            }
            Ok(SaveStart::Busy) => return SaveOutcome::Busy,
            Err(e) => return SaveOutcome::Blocked(e),
        };

        tracing::info!(
            record_id = %id,
            fields = ?patch.keys().collect::<Vec<_>>(),
            "Saving client record"
        );

        let result = match self.scope.run(self.api.update_record(&id, &patch)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::debug!(record_id = %id, "Save cancelled");
                editor.abort_save();
                return SaveOutcome::Cancelled;
            }
        };

        if let Err(e) = &result {
            tracing::warn!(record_id = %id, error = %e, "Client record update rejected");
        }

        let outcome = editor.finish_save(result);
        if matches!(outcome, SaveOutcome::Saved { .. }) {
            self.refetch(editor, &id).await;
        }
        outcome
    }

    async fn refetch(&self, editor: &mut ClientEditor, id: &ClientId) {
        match self.scope.run(self.api.get_record(id)).await {
            Ok(result) => editor.finish_refetch(result),
            Err(_) => editor.finish_refetch(Err(RecordApiError::Cancelled)),
        }
    }

    /// Route a navigation request through the guard.
    pub fn navigate<V: Navigator + ?Sized>(
        &self,
        editor: &mut ClientEditor,
        navigator: &V,
        destination: NavTarget,
    ) -> NavDecision {
        let decision = editor.request_navigation(destination);
        if let NavDecision::Proceed(target) = &decision {
            navigator.navigate(target);
        }
        decision
    }

    /// "Save and continue" from the confirmation modal. On failure the guard
    /// stays pending so the user can retry or cancel.
    pub async fn save_and_proceed<V: Navigator + ?Sized>(
        &self,
        editor: &mut ClientEditor,
        navigator: &V,
    ) -> SaveOutcome {
        let outcome = self.save(editor).await;
        match &outcome {
            SaveOutcome::Saved {
                proceed_to: Some(target),
            }
            | SaveOutcome::NoChanges {
                proceed_to: Some(target),
            } => navigator.navigate(target),
            _ => {}
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{NoticeLevel, UpdateReceipt};
    use crate::diff::RecordPatch;
    use crate::editor::{EditMode, LoadState};
    use async_trait::async_trait;
    use chrono::Utc;
    use serde_json::json;
    use shared_types::{ApiErrors, ClientId, ClientRecord, FIELD_CITY, FIELD_FIRST_NAME, FIELD_PHONE};
    use std::cell::{Cell, RefCell};

    fn jane() -> ClientRecord {
        ClientRecord {
            id: ClientId::from("c-1"),
            first_name: "Jane".to_string(),
            middle_name: String::new(),
            last_name: "Doe".to_string(),
            email: "jane@example.com".to_string(),
            phone: "555-1111".to_string(),
            filing_status: None,
            dependents: 0,
            address: String::new(),
            city: "Springfield".to_string(),
            state: String::new(),
            zip_code: String::new(),
            spouse: None,
            tags: vec!["VIP".to_string()],
            locked_fields: vec!["phone_number".to_string()],
            display_name: "Jane Doe".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    /// In-memory server double: applies patches, records calls.
    struct FakeApi {
        record: RefCell<ClientRecord>,
        next_locks: RefCell<Option<Vec<String>>>,
        reject_with: RefCell<Option<RecordApiError>>,
        hang_updates: Cell<bool>,
        gets: Cell<usize>,
        updates: RefCell<Vec<RecordPatch>>,
    }

    impl FakeApi {
        fn new(record: ClientRecord) -> Self {
            Self {
                record: RefCell::new(record),
                next_locks: RefCell::new(None),
                reject_with: RefCell::new(None),
                hang_updates: Cell::new(false),
                gets: Cell::new(0),
                updates: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl RecordApi for FakeApi {
        async fn get_record(&self, _id: &ClientId) -> Result<ClientRecord, RecordApiError> {
            self.gets.set(self.gets.get() + 1);
            Ok(self.record.borrow().clone())
        }

        async fn update_record(
            &self,
            _id: &ClientId,
            patch: &RecordPatch,
        ) -> Result<UpdateReceipt, RecordApiError> {
            self.updates.borrow_mut().push(patch.clone());
            if self.hang_updates.get() {
                std::future::pending::<()>().await;
            }
            if let Some(err) = self.reject_with.borrow_mut().take() {
                return Err(err);
            }
            let mut record = self.record.borrow_mut();
            if let Some(first) = patch.get("first_name").and_then(|v| v.as_str()) {
                record.first_name = first.to_string();
            }
            if let Some(city) = patch.get("city").and_then(|v| v.as_str()) {
                record.city = city.to_string();
            }
            if let Some(locks) = self.next_locks.borrow_mut().take() {
                record.locked_fields = locks;
            }
            Ok(UpdateReceipt {
                record: Some(record.clone()),
                locked_fields: Some(record.locked_fields.clone()),
            })
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        notices: RefCell<Vec<Notice>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }
    }

    impl RecordingNotifier {
        fn levels(&self) -> Vec<NoticeLevel> {
            self.notices.borrow().iter().map(|n| n.level).collect()
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visited: RefCell<Vec<NavTarget>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, target: &NavTarget) {
            self.visited.borrow_mut().push(target.clone());
        }
    }

    async fn loaded_editor(api: &FakeApi, notifier: &RecordingNotifier) -> ClientEditor {
        let mut editor = ClientEditor::new("c-1");
        SaveOrchestrator::new(api, notifier)
            .load(&mut editor)
            .await
            .unwrap();
        editor.enter_edit().unwrap();
        editor
    }

    #[tokio::test]
    async fn test_end_to_end_lock_reconciliation() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = loaded_editor(&api, &notifier).await;

        editor.edit(FIELD_PHONE, "555-2222");
        assert_eq!(editor.snapshot().text(FIELD_PHONE), "555-1111");

        editor.edit(FIELD_FIRST_NAME, "Janet");
        assert_eq!(
            serde_json::to_value(editor.diff()).unwrap(),
            json!({"first_name": "Janet"})
        );
        assert!(!editor.is_locked("email"));

        *api.next_locks.borrow_mut() = Some(vec!["phone_number".to_string(), "email".to_string()]);
        let outcome = SaveOrchestrator::new(&api, &notifier).save(&mut editor).await;

        assert_eq!(outcome, SaveOutcome::Saved { proceed_to: None });
        assert!(editor.is_locked("email"));
        assert!(editor.is_locked(FIELD_PHONE));
        assert_eq!(editor.snapshot().text(FIELD_FIRST_NAME), "Janet");
        assert!(!editor.is_dirty());
        assert_eq!(editor.mode(), EditMode::Viewing);
        // initial load + re-fetch after save
        assert_eq!(api.gets.get(), 2);
        assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
    }

    #[tokio::test]
    async fn test_no_op_save_skips_network() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = loaded_editor(&api, &notifier).await;

        editor.add_tag("vip");
        editor.edit(FIELD_CITY, " Springfield ");
        let outcome = SaveOrchestrator::new(&api, &notifier).save(&mut editor).await;

        assert_eq!(outcome, SaveOutcome::NoChanges { proceed_to: None });
        assert!(api.updates.borrow().is_empty());
        assert_eq!(notifier.levels(), vec![NoticeLevel::Success]);
        assert_eq!(editor.mode(), EditMode::Viewing);
    }

    #[tokio::test]
    async fn test_lock_conflict_notifies_and_keeps_editing() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = loaded_editor(&api, &notifier).await;

        *api.reject_with.borrow_mut() = Some(RecordApiError::Rejected {
            message: "Some fields are locked".to_string(),
            errors: ApiErrors::locked(vec!["city".to_string()]),
        });
        editor.edit(FIELD_CITY, "Shelbyville");
        let outcome = SaveOrchestrator::new(&api, &notifier).save(&mut editor).await;

        assert!(matches!(outcome, SaveOutcome::LockConflict { .. }));
        assert!(editor.is_locked(FIELD_CITY));
        assert_eq!(editor.mode(), EditMode::Editing);
        assert_eq!(editor.snapshot().text(FIELD_CITY), "Shelbyville");
        let notices = notifier.notices.borrow();
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].message.contains("city"));
    }

    #[tokio::test]
    async fn test_generic_failure_notifies_error() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = loaded_editor(&api, &notifier).await;

        *api.reject_with.borrow_mut() = Some(RecordApiError::Http { status: 500 });
        editor.edit(FIELD_CITY, "Shelbyville");
        let outcome = SaveOrchestrator::new(&api, &notifier).save(&mut editor).await;

        assert!(matches!(outcome, SaveOutcome::Failed { .. }));
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error]);
        assert_eq!(editor.mode(), EditMode::Editing);
        assert_eq!(api.gets.get(), 1);
    }

    #[tokio::test]
    async fn test_missing_id_never_reaches_network() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = ClientEditor::new("");
        let orchestrator = SaveOrchestrator::new(&api, &notifier);

        assert_eq!(
            orchestrator.load(&mut editor).await,
            Err(EditorError::MissingRecordId)
        );
        let outcome = orchestrator.save(&mut editor).await;
        assert_eq!(outcome, SaveOutcome::Blocked(EditorError::MissingRecordId));
        assert_eq!(api.gets.get(), 0);
        assert!(api.updates.borrow().is_empty());
        assert_eq!(notifier.levels(), vec![NoticeLevel::Error, NoticeLevel::Error]);
    }

    #[tokio::test]
    async fn test_save_and_proceed_navigates_after_success() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let navigator = RecordingNavigator::default();
        let mut editor = loaded_editor(&api, &notifier).await;
        let orchestrator = SaveOrchestrator::new(&api, &notifier);
        let target = NavTarget::Route("/clients".to_string());

        editor.edit(FIELD_CITY, "Shelbyville");
        assert_eq!(
            orchestrator.navigate(&mut editor, &navigator, target.clone()),
            NavDecision::Confirm
        );
        assert!(navigator.visited.borrow().is_empty());

        *api.reject_with.borrow_mut() = Some(RecordApiError::Http { status: 500 });
        orchestrator.save_and_proceed(&mut editor, &navigator).await;
        assert!(editor.guard().is_pending());
        assert!(navigator.visited.borrow().is_empty());

        let outcome = orchestrator.save_and_proceed(&mut editor, &navigator).await;
        assert!(matches!(outcome, SaveOutcome::Saved { .. }));
        assert_eq!(navigator.visited.borrow().as_slice(), &[target]);
        assert!(!editor.guard().is_pending());
    }

    #[tokio::test]
    async fn test_clean_navigation_goes_straight_through() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let navigator = RecordingNavigator::default();
        let mut editor = loaded_editor(&api, &notifier).await;
        let orchestrator = SaveOrchestrator::new(&api, &notifier);

        let target = NavTarget::Tab("locks".to_string());
        orchestrator.navigate(&mut editor, &navigator, target.clone());
        assert_eq!(navigator.visited.borrow().as_slice(), &[target]);
    }

    #[tokio::test]
    async fn test_cancelled_save_leaves_state_untouched() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = loaded_editor(&api, &notifier).await;
        api.hang_updates.set(true);
        editor.edit(FIELD_CITY, "Shelbyville");

        let scope = RequestScope::new();
        let canceller = scope.clone();
        let orchestrator = SaveOrchestrator::new(&api, &notifier).with_scope(scope);
        let (outcome, ()) = tokio::join!(orchestrator.save(&mut editor), async move {
            canceller.cancel();
        });

        assert_eq!(outcome, SaveOutcome::Cancelled);
        assert!(!editor.is_saving());
        assert!(editor.is_dirty());
        assert_eq!(editor.mode(), EditMode::Editing);
        assert!(notifier.notices.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_load_returns_to_idle() {
        let api = FakeApi::new(jane());
        let notifier = RecordingNotifier::default();
        let mut editor = ClientEditor::new("c-1");

        let scope = RequestScope::new();
        scope.cancel();
        SaveOrchestrator::new(&api, &notifier)
            .with_scope(scope)
            .load(&mut editor)
            .await
            .unwrap();

        assert_eq!(editor.load_state(), &LoadState::Idle);
        assert!(editor.record().is_none());
        assert_eq!(api.gets.get(), 0);
    }
}
