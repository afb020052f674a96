use indexmap::IndexMap;
use tracing::{debug, warn};

use super::{Collision, CollisionPolicy, Entity, EFFECTS_FIELD, INITIAL_STATE_FIELD};
use crate::error::{Error, Result};
use crate::store::GlobalState;
use crate::value::{Handler, Kind, Value};

/// Action name → owning entity name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OwnershipIndex {
    owners: IndexMap<String, String>,
}

impl OwnershipIndex {
    pub fn owner_of(&self, action: &str) -> Option<&str> {
        self.owners.get(action).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.owners.iter().map(|(a, e)| (a.as_str(), e.as_str()))
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

/// The merged, immutable result of registering every entity.
///
/// Holds the global initial state, the global action → handler table and
/// the ownership index that routes each action to one entity's slice.
#[derive(Clone, Debug)]
pub struct Registry {
    initial_state: IndexMap<String, Value>,
    effects: IndexMap<String, Value>,
    ownership: OwnershipIndex,
    collisions: Vec<Collision>,
    policy: CollisionPolicy,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Entity name → initial slice, in registration order.
    pub fn initial_state(&self) -> &IndexMap<String, Value> {
        &self.initial_state
    }

    /// A fresh global state snapshot built from the initial slices.
    pub fn initial_global_state(&self) -> GlobalState {
        GlobalState::from_slices(&self.initial_state)
    }

    /// Action name → declared handler value.
    pub fn effects(&self) -> &IndexMap<String, Value> {
        &self.effects
    }

    pub fn ownership(&self) -> &OwnershipIndex {
        &self.ownership
    }

    pub fn owner_of(&self, action: &str) -> Option<&str> {
        self.ownership.owner_of(action)
    }

    /// The handler for `action`, if one is registered and callable.
    pub fn handler_for(&self, action: &str) -> Option<&Handler> {
        self.effects.get(action).and_then(Value::as_function)
    }

    pub fn entity_names(&self) -> impl Iterator<Item = &str> {
        self.initial_state.keys().map(String::as_str)
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    /// Action names overwritten during a [`CollisionPolicy::LastWins`] build.
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn collision_policy(&self) -> CollisionPolicy {
        self.policy
    }
}

/// Collects entity declarations and merges them into a [`Registry`].
///
/// Typed [`Entity`] values and dynamic `{initialState, effects}` mappings go
/// through the same validation. Nothing is merged until [`build`] runs, and
/// a failing build returns no registry at all.
///
/// [`build`]: RegistryBuilder::build
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    entities: IndexMap<String, Value>,
    policy: CollisionPolicy,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a dynamic entity map (`{name: {initialState, effects}}`).
    pub fn from_value(entities: &Value) -> Result<Self> {
        let map = entities
            .as_object()
            .ok_or_else(|| Error::shape("entity map", Kind::Object, entities.kind()))?;
        Ok(Self {
            entities: map.clone(),
            policy: CollisionPolicy::default(),
        })
    }

    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn entity(self, name: impl Into<String>, entity: Entity) -> Self {
        self.entity_value(name, entity.into_value())
    }

    /// Add a dynamic declaration. It is validated when the registry is built.
    pub fn entity_value(mut self, name: impl Into<String>, declaration: Value) -> Self {
        self.entities.insert(name.into(), declaration);
        self
    }

    pub fn build(self) -> Result<Registry> {
        let mut initial_state = IndexMap::with_capacity(self.entities.len());
        let mut effects: IndexMap<String, Value> = IndexMap::new();
        let mut owners: IndexMap<String, String> = IndexMap::new();
        let mut collisions = Vec::new();

        for (name, declaration) in &self.entities {
            let (state, handlers) = validate_entity(name, declaration)?;

            for (action, handler) in handlers {
                if let Some(previous) = owners.get(action) {
                    match self.policy {
                        CollisionPolicy::Reject => {
                            return Err(Error::DuplicateAction {
                                action: action.clone(),
                                first: previous.clone(),
                                second: name.clone(),
                            });
                        }
                        CollisionPolicy::LastWins => {
                            warn!(
                                action = %action,
                                previous_owner = %previous,
                                owner = %name,
                                "action declared by more than one entity; last registration wins"
                            );
                            collisions.push(Collision {
                                action: action.clone(),
                                previous_owner: previous.clone(),
                                owner: name.clone(),
                            });
                        }
                    }
                }
                effects.insert(action.clone(), handler.clone());
                owners.insert(action.clone(), name.clone());
            }

            initial_state.insert(name.clone(), state.clone());
        }

        debug!(
            entities = initial_state.len(),
            actions = effects.len(),
            collisions = collisions.len(),
            "registry built"
        );

        Ok(Registry {
            initial_state,
            effects,
            ownership: OwnershipIndex { owners },
            collisions,
            policy: self.policy,
        })
    }
}

/// Build a registry from a dynamic entity map with the default
/// [`CollisionPolicy::LastWins`].
///
/// # Examples
///
/// ```
/// use slicebox::{registry, Entity, Value};
///
/// let entities = Value::object([("counter", Entity::new(0))]);
/// let registry = registry::build(&entities).unwrap();
/// assert_eq!(registry.initial_state()["counter"], Value::from(0));
/// ```
pub fn build(entities: &Value) -> Result<Registry> {
    RegistryBuilder::from_value(entities)?.build()
}

/// Check one `{initialState, effects}` declaration and return its parts.
///
/// `effects` must be present and a plain mapping. `initialState` counts as
/// missing only when it is `undefined`; falsy states such as `0`, `""` or
/// `[]` are valid.
pub fn validate_entity<'a>(
    name: &str,
    declaration: &'a Value,
) -> Result<(&'a Value, &'a IndexMap<String, Value>)> {
    let context = || format!("entity `{name}`");

    if declaration.kind() != Kind::Object {
        return Err(Error::shape(context(), Kind::Object, declaration.kind()));
    }

    let effects = declaration.get(EFFECTS_FIELD);
    let state = declaration.get(INITIAL_STATE_FIELD);

    if !effects.is_truthy() {
        return Err(Error::missing(context(), EFFECTS_FIELD));
    }
    if state.is_undefined() {
        return Err(Error::missing(context(), INITIAL_STATE_FIELD));
    }

    let handlers = effects.as_object().ok_or_else(|| {
        Error::shape(format!("entity `{name}` effects"), Kind::Object, effects.kind())
    })?;

    if state.kind().is_restricted() {
        return Err(Error::InvalidStateType {
            entity: name.to_owned(),
            found: state.kind(),
        });
    }

    Ok((state, handlers))
}
