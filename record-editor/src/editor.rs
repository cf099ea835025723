//! Client editor state
//!
//! One explicit state object per client screen. Network work is split into
//! synchronous `begin_*` / `finish_*` transitions so callers never hold the
//! editor across an await.

use serde_json::Value;
use shared_types::{ClientId, ClientRecord, FieldMapping, CLIENT_FIELDS};

use crate::api::{RecordApiError, UpdateReceipt};
use crate::diff::{compute_diff, RecordPatch};
use crate::guard::{NavDecision, NavTarget, NavigationGuard, UnloadDecision};
use crate::locks::FieldLocks;
use crate::snapshot::{EditOutcome, FormSnapshot, SubmittedCopy, TagOutcome};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum EditorError {
    #[error("Client record id is missing")]
    MissingRecordId,

    #[error("Client record is not loaded")]
    NotLoaded,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

/// What `begin_save` decided
#[derive(Debug, Clone, PartialEq)]
pub enum SaveStart {
    /// Empty diff: treated as an immediate success.
    NoChanges { proceed_to: Option<NavTarget> },
    /// A save is already in flight.
    Busy,
    Submit { id: ClientId, patch: RecordPatch },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    NoChanges { proceed_to: Option<NavTarget> },
    Saved { proceed_to: Option<NavTarget> },
    Busy,
    LockConflict { fields: Vec<String> },
    Failed { message: String },
    Blocked(EditorError),
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct ClientEditor {
    record_id: ClientId,
    record: Option<ClientRecord>,
    load_state: LoadState,
    locks: FieldLocks,
    snapshot: FormSnapshot,
    mode: EditMode,
    in_flight: Option<SubmittedCopy>,
    guard: NavigationGuard,
    table: &'static [FieldMapping],
}

impl ClientEditor {
    pub fn new(record_id: impl Into<ClientId>) -> Self {
        Self {
            record_id: record_id.into(),
            record: None,
            load_state: LoadState::Idle,
            locks: FieldLocks::new(),
            snapshot: FormSnapshot::new(),
            mode: EditMode::Viewing,
            in_flight: None,
            guard: NavigationGuard::new(),
            table: CLIENT_FIELDS,
        }
    }

    pub fn with_field_table(mut self, table: &'static [FieldMapping]) -> Self {
        self.table = table;
        self
    }

    pub fn record_id(&self) -> &ClientId {
        &self.record_id
    }

    pub fn record(&self) -> Option<&ClientRecord> {
        self.record.as_ref()
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn locks(&self) -> &FieldLocks {
        &self.locks
    }

    pub fn snapshot(&self) -> &FormSnapshot {
        &self.snapshot
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn is_saving(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    pub fn is_locked(&self, field: &str) -> bool {
        self.locks.is_locked(field)
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    pub fn begin_load(&mut self) -> Result<ClientId, EditorError> {
        if self.record_id.is_blank() {
            return Err(EditorError::MissingRecordId);
        }
        self.load_state = LoadState::Loading;
        Ok(self.record_id.clone())
    }

    pub fn finish_load(&mut self, result: Result<ClientRecord, RecordApiError>) {
        match result {
            Ok(record) => self.load(record),
            Err(e) => {
                tracing::warn!(record_id = %self.record_id, error = %e, "Failed to load client record");
                self.record = None;
                self.snapshot = FormSnapshot::new();
                self.locks = FieldLocks::new();
                self.mode = EditMode::Viewing;
                self.load_state = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Drops an in-flight load so the screen can offer to load again.
    pub fn abort_load(&mut self) {
        if self.load_state == LoadState::Loading {
            self.load_state = LoadState::Idle;
        }
    }

    /// Re-fetch after a save. Edits still pending are carried over; a
    /// failure keeps the committed state.
    pub fn finish_refetch(&mut self, result: Result<ClientRecord, RecordApiError>) {
        match result {
            Ok(record) => {
                self.locks.replace_all(&record.locked_fields);
                self.snapshot.rebase(&record, &self.locks);
                self.record = Some(record);
                self.load_state = LoadState::Ready;
            }
            Err(e) => {
                tracing::warn!(record_id = %self.record_id, error = %e, "Re-fetch after save failed; keeping saved state");
            }
        }
    }

    fn load(&mut self, record: ClientRecord) {
        tracing::debug!(record_id = %record.id, locked = record.locked_fields.len(), "Client record loaded");
        self.snapshot.load(&record);
        self.locks.replace_all(&record.locked_fields);
        self.record = Some(record);
        self.load_state = LoadState::Ready;
    }

    // ------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------

    pub fn enter_edit(&mut self) -> Result<(), EditorError> {
        if self.record.is_none() {
            return Err(EditorError::NotLoaded);
        }
        self.mode = EditMode::Editing;
        Ok(())
    }

    /// Leaves edit mode and throws away the working copy.
    pub fn cancel_edit(&mut self) {
        self.snapshot.revert();
        self.mode = EditMode::Viewing;
    }

    pub fn edit(&mut self, field: &str, value: impl Into<Value>) -> EditOutcome {
        self.snapshot.edit(&self.locks, field, value)
    }

    pub fn add_tag(&mut self, tag: &str) -> TagOutcome {
        self.snapshot.add_tag(&self.locks, tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> TagOutcome {
        self.snapshot.remove_tag(&self.locks, tag)
    }

    pub fn diff(&self) -> RecordPatch {
        compute_diff(
            self.snapshot.original(),
            self.snapshot.working(),
            self.snapshot.original_tags(),
            self.snapshot.working_tags(),
            self.table,
        )
    }

    pub fn is_dirty(&self) -> bool {
        !self.diff().is_empty()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn request_navigation(&mut self, destination: NavTarget) -> NavDecision {
        let dirty = self.is_dirty();
        self.guard.request(destination, dirty)
    }

    /// Dismisses the confirmation; the user stays with edits intact.
    pub fn cancel_navigation(&mut self) -> Option<NavTarget> {
        self.guard.cancel()
    }

    pub fn unload_decision(&self) -> UnloadDecision {
        self.guard.unload_decision(self.is_dirty())
    }

    // ------------------------------------------------------------------
    // Saving
    // ------------------------------------------------------------------

    pub fn begin_save(&mut self) -> Result<SaveStart, EditorError> {
        if self.record_id.is_blank() {
            return Err(EditorError::MissingRecordId);
        }
        if self.record.is_none() {
            return Err(EditorError::NotLoaded);
        }
        if self.in_flight.is_some() {
            return Ok(SaveStart::Busy);
        }

        let patch = self.diff();
        if patch.is_empty() {
            self.mode = EditMode::Viewing;
            return Ok(SaveStart::NoChanges {
                proceed_to: self.guard.complete(),
            });
        }

        self.in_flight = Some(self.snapshot.submitted());
        Ok(SaveStart::Submit {
            id: self.record_id.clone(),
            patch,
        })
    }

    pub fn finish_save(&mut self, result: Result<UpdateReceipt, RecordApiError>) -> SaveOutcome {
        let submitted = self.in_flight.take();
        match result {
            Ok(receipt) => {
                match submitted {
                    Some(copy) => self.snapshot.commit(copy),
                    None => tracing::warn!(record_id = %self.record_id, "Save finished with no submission on record"),
                }
                match receipt.locked_fields {
                    Some(fields) => self.locks.replace_all(fields),
                    None => tracing::debug!("Update response did not report locks; keeping current set"),
                }
                if let Some(record) = receipt.record {
                    self.record = Some(record);
                }
                if self.is_dirty() {
                    // Edited while the request was in flight: stay put.
                    self.guard.cancel();
                    return SaveOutcome::Saved { proceed_to: None };
                }
                self.mode = EditMode::Viewing;
                SaveOutcome::Saved {
                    proceed_to: self.guard.complete(),
                }
            }
            Err(RecordApiError::Cancelled) => SaveOutcome::Cancelled,
            Err(e) => match e.locked_fields() {
                Some(fields) => {
                    let fields = fields.to_vec();
                    self.locks.add_all(&fields);
                    SaveOutcome::LockConflict { fields }
                }
                None => SaveOutcome::Failed {
                    message: e.to_string(),
                },
            },
        }
    }

    /// Drops an in-flight save without touching snapshots or locks.
    pub fn abort_save(&mut self) {
        self.in_flight = None;
    }
}
