//! Action validation and resolution.
//!
//! [`resolve`] is the pure core of the store: old state + action → new
//! state, with only the owning entity's slice replaced.

mod action;
mod resolver;

pub use action::{validate_action, Action, PAYLOAD_FIELD, TYPE_FIELD};
pub use resolver::resolve;
pub(crate) use resolver::resolve_validated;
