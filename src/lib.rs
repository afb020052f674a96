//! # Slicebox
//!
//! A global state container assembled from independent entities.
//!
//! Each entity declares a default slice of state and the handlers that
//! produce its next values. The entities are merged once into an immutable
//! registry, and a single store holds the resulting global state:
//!
//! - [`Registry`] - merged initial state, action → handler table, and the
//!   ownership index routing each action to one entity
//! - [`dispatch::resolve`] - the pure core: old state + action → new state,
//!   with only the owning slice replaced
//! - [`Store`] - the live holder of global state with a stable
//!   [`Dispatcher`], subscriptions and optional transition logging
//! - [`binding`] - projecting state for a consumer through a selector
//!
//! Values crossing these boundaries are dynamic [`Value`]s, checked against
//! their [`Kind`](value::Kind) at registration, dispatch and connect time.
//!
//! ```
//! use slicebox::{Action, Entity, Registry, Store, StoreConfig, Value};
//!
//! let registry = Registry::builder()
//!     .entity("counter", Entity::new(0).effect("INCREMENT", |count, by| {
//!         Value::from(count.as_f64().unwrap_or(0.0) + by.as_f64().unwrap_or(0.0))
//!     }))
//!     .build()
//!     .unwrap();
//!
//! let store = Store::new(registry, StoreConfig::default());
//! store.dispatch(&Action::new("INCREMENT", 1)).unwrap();
//! store.dispatch(&Action::new("UNKNOWN", 1)).unwrap();
//! assert_eq!(store.state().get("counter"), Some(&Value::from(1)));
//! ```

pub mod binding;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod store;
pub mod value;

// Re-export main types for convenience
pub use dispatch::Action;
pub use error::{Error, ErrorKind, Result};
pub use registry::{CollisionPolicy, Entity, Registry, RegistryBuilder};
pub use store::{
    create_store, Dispatched, Dispatcher, GlobalState, Store, StoreConfig, Subscription,
    Transition,
};
pub use value::Value;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let registry = Registry::builder()
            .entity("flag", Entity::new(false).effect("SET", |_, p| p.clone()))
            .build()
            .unwrap();
        let store = create_store(registry, StoreConfig::default());
        assert_eq!(store.state().get("flag"), Some(&Value::from(false)));
        store.dispatch(&Action::new("SET", true)).unwrap();
        assert_eq!(store.state().get("flag"), Some(&Value::from(true)));
    }
}
