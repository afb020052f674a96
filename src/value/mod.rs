//! Dynamic values and their structural kinds.
//!
//! Entity state, action payloads and entity declarations are all expressed
//! as [`Value`]s. [`classify`] maps any value to its [`Kind`], which is what
//! every boundary check in the registry and dispatcher is written against.

mod json;
mod kind;
#[allow(clippy::module_inception)]
mod value;

pub use kind::{classify, Kind};
pub use value::{Handler, Symbol, Value};
