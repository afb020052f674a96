//! Entity registration.
//!
//! Entities are declared independently and merged once into an immutable
//! [`Registry`]: one global initial state, one action → handler table and
//! an ownership index routing each action to the entity that declared it.

mod collision;
mod entity;
#[allow(clippy::module_inception)]
mod registry;

pub use collision::{Collision, CollisionPolicy};
pub use entity::{Entity, EFFECTS_FIELD, INITIAL_STATE_FIELD};
pub use registry::{build, validate_entity, OwnershipIndex, Registry, RegistryBuilder};
