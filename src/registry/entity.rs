use indexmap::IndexMap;

use crate::value::Value;

/// Field holding an entity's initial slice in a dynamic declaration.
pub const INITIAL_STATE_FIELD: &str = "initialState";
/// Field holding an entity's action handlers in a dynamic declaration.
pub const EFFECTS_FIELD: &str = "effects";

/// A typed entity declaration: an initial slice plus the handlers that
/// produce its next values.
///
/// # Examples
///
/// ```
/// use slicebox::{Entity, Value};
///
/// let counter = Entity::new(0).effect("INCREMENT", |slice, payload| {
///     let by = payload.as_f64().unwrap_or(0.0);
///     Value::from(slice.as_f64().unwrap_or(0.0) + by)
/// });
/// assert_eq!(counter.action_names().collect::<Vec<_>>(), vec!["INCREMENT"]);
/// ```
#[derive(Clone, Debug)]
pub struct Entity {
    initial_state: Value,
    effects: IndexMap<String, Value>,
}

impl Entity {
    pub fn new(initial_state: impl Into<Value>) -> Self {
        Self {
            initial_state: initial_state.into(),
            effects: IndexMap::new(),
        }
    }

    /// Declare a handler for `action`. Declaring the same action twice keeps
    /// the later handler.
    pub fn effect<F>(mut self, action: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.effects.insert(action.into(), Value::function(handler));
        self
    }

    pub fn initial_state(&self) -> &Value {
        &self.initial_state
    }

    pub fn action_names(&self) -> impl Iterator<Item = &str> {
        self.effects.keys().map(String::as_str)
    }

    /// The dynamic `{initialState, effects}` form consumed by the registry
    /// builder.
    pub fn into_value(self) -> Value {
        Value::object([
            (INITIAL_STATE_FIELD, self.initial_state),
            (EFFECTS_FIELD, Value::Object(self.effects)),
        ])
    }
}

impl From<Entity> for Value {
    fn from(entity: Entity) -> Self {
        entity.into_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Kind;

    #[test]
    fn into_value_has_declaration_shape() {
        let value = Entity::new(Value::Array(vec![]))
            .effect("ADD", |s, _| s.clone())
            .into_value();

        assert_eq!(value.get(INITIAL_STATE_FIELD), &Value::Array(vec![]));
        assert_eq!(value.get(EFFECTS_FIELD).get("ADD").kind(), Kind::Function);
    }
}
