//! Client record edit, diff and save workflow
//!
//! The pieces, leaves first:
//! - [`locks`]: which fields the server currently refuses to update
//! - [`snapshot`]: original vs working copies of the editable fields
//! - [`diff`]: minimal patch between the two copies
//! - [`guard`]: unsaved-changes interception for navigation and unload
//! - [`editor`]: the state object tying them together
//! - [`save`]: drives load/save against a [`RecordApi`] and reconciles

pub mod api;
pub mod diff;
pub mod editor;
pub mod guard;
#[cfg(feature = "http")]
pub mod http;
pub mod locks;
pub mod save;
pub mod scope;
pub mod snapshot;

pub use api::*;
pub use diff::{compute_diff, RecordPatch};
pub use editor::*;
pub use guard::*;
pub use locks::FieldLocks;
pub use save::{notice_for, SaveOrchestrator};
pub use scope::{Cancelled, RequestScope, ScopeGuard};
pub use snapshot::{EditOutcome, FieldMap, FormSnapshot, TagOutcome};
