//! Client details screen
//!
//! View and edit one client's profile, with locked fields disabled and an
//! unsaved-changes prompt on navigation. The "Field locks" tab lets an
//! administrator change which fields are locked.

mod dialogs;
mod logic;
mod styles;
mod types;
mod view;

pub use types::DetailTab;
pub use view::ClientDetailsView;
