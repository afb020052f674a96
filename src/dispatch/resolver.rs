use tracing::{debug, trace};

use super::validate_action;
use crate::error::Result;
use crate::registry::Registry;
use crate::store::GlobalState;
use crate::value::Value;

/// Apply `action` to `state` and return the next global state.
///
/// The action is validated first; validation failures leave `state`
/// untouched. An action type with no callable handler is ignored and `state`
/// comes back unchanged (same snapshot), as does a `state` with no slice for
/// the owning entity. Otherwise only the owning entity's
/// slice is replaced; every other slice is shared with `state`.
///
/// # Examples
///
/// ```
/// use slicebox::{dispatch, Action, Entity, Registry, Value};
///
/// let registry = Registry::builder()
///     .entity("counter", Entity::new(0).effect("INCREMENT", |s, p| {
///         Value::from(s.as_f64().unwrap() + p.as_f64().unwrap())
///     }))
///     .build()
///     .unwrap();
///
/// let state = registry.initial_global_state();
/// let next = dispatch::resolve(&state, &Action::new("INCREMENT", 1), &registry).unwrap();
/// assert_eq!(next.get("counter"), Some(&Value::from(1)));
/// assert_eq!(state.get("counter"), Some(&Value::from(0)));
/// ```
pub fn resolve(state: &GlobalState, action: &Value, registry: &Registry) -> Result<GlobalState> {
    let (action_type, payload) = validate_action(action)?;
    Ok(resolve_validated(state, action_type, payload, registry))
}

/// Resolution for an action that has already passed [`validate_action`].
pub(crate) fn resolve_validated(
    state: &GlobalState,
    action_type: &str,
    payload: &Value,
    registry: &Registry,
) -> GlobalState {
    let (Some(handler), Some(owner)) = (
        registry.handler_for(action_type),
        registry.owner_of(action_type),
    ) else {
        debug!(action = action_type, "no handler registered; action ignored");
        return state.clone();
    };

    // A snapshot built from another registry has no slice for `owner`; its
    // key set is left as is.
    let Some(current) = state.get(owner) else {
        debug!(action = action_type, entity = owner, "owner has no slice; action ignored");
        return state.clone();
    };
    let next = handler(current, payload);
    trace!(action = action_type, entity = owner, "slice replaced");

    state.with_slice(owner, next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::Action;
    use crate::error::ErrorKind;
    use crate::registry::Entity;

    fn registry() -> Registry {
        Registry::builder()
            .entity(
                "counter",
                Entity::new(0).effect("INCREMENT", |s, p| {
                    Value::from(s.as_f64().unwrap_or(0.0) + p.as_f64().unwrap_or(0.0))
                }),
            )
            .entity(
                "log",
                Entity::new(Value::Array(vec![])).effect("APPEND", |s, p| {
                    let mut items = s.as_array().unwrap_or_default().to_vec();
                    items.push(p.clone());
                    Value::Array(items)
                }),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn replaces_only_the_owning_slice() {
        let registry = registry();
        let state = registry.initial_global_state();

        let next = resolve(&state, &Action::new("INCREMENT", 2), &registry).unwrap();

        assert_eq!(next.get("counter"), Some(&Value::from(2)));
        assert!(next.shares_slice(&state, "log"));
        assert!(!next.shares_slice(&state, "counter"));
    }

    #[test]
    fn unknown_type_returns_same_snapshot() {
        let registry = registry();
        let state = registry.initial_global_state();

        let next = resolve(&state, &Action::new("UNKNOWN", 1), &registry).unwrap();

        assert!(next.ptr_eq(&state));
    }

    #[test]
    fn invalid_action_leaves_state_alone() {
        let registry = registry();
        let state = registry.initial_global_state();

        let err = resolve(&state, &Action::without_payload("INCREMENT"), &registry).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::MissingField);
        assert_eq!(state.get("counter"), Some(&Value::from(0)));
    }

    #[test]
    fn missing_owner_slice_is_not_created() {
        let registry = registry();
        let state = Registry::builder()
            .entity("log", Entity::new(Value::Array(vec![])))
            .build()
            .unwrap()
            .initial_global_state();

        let next = resolve(&state, &Action::new("INCREMENT", 1), &registry).unwrap();

        assert!(next.ptr_eq(&state));
        assert_eq!(next.get("counter"), None);
        assert_eq!(next.entities().collect::<Vec<_>>(), vec!["log"]);
    }

    #[test]
    fn resolution_is_deterministic() {
        let registry = registry();
        let state = registry.initial_global_state();
        let action = Action::new("APPEND", "x");

        let a = resolve(&state, &action, &registry).unwrap();
        let b = resolve(&state, &action, &registry).unwrap();

        assert_eq!(a, b);
    }
}
