pub mod api;
pub mod components;
pub mod interop;

pub use api::*;
pub use components::*;
pub use interop::*;
