//! The live state holder.
//!
//! A [`Store`] owns the current [`GlobalState`] snapshot, runs each action
//! through the resolver and commits the result, then notifies subscribers.

mod config;
mod state;
#[allow(clippy::module_inception)]
mod store;

pub use config::StoreConfig;
pub use state::GlobalState;
pub use store::{create_store, Dispatched, Dispatcher, Store, Subscription, Transition};
pub(crate) use store::WeakDispatcher;
