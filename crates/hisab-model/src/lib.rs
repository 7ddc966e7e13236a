//! Domain types for hisab.
//!
//! Everything here is plain data: the data service owns persistence and the
//! flow crate owns mutable UI state.

mod contacts;
mod groups;
mod ids;
mod members;

pub use contacts::*;
pub use groups::*;
pub use ids::*;
pub use members::*;
