use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::value::Value;

/// An immutable snapshot of the global state: entity name → slice.
///
/// Cloning is cheap. Deriving a new snapshot with one slice replaced shares
/// every other slice with the original, so identity checks
/// ([`ptr_eq`](GlobalState::ptr_eq), [`shares_slice`](GlobalState::shares_slice))
/// can tell which parts changed.
#[derive(Clone)]
pub struct GlobalState {
    slices: Arc<IndexMap<String, Arc<Value>>>,
}

impl GlobalState {
    pub(crate) fn from_slices(slices: &IndexMap<String, Value>) -> Self {
        Self {
            slices: Arc::new(
                slices
                    .iter()
                    .map(|(name, value)| (name.clone(), Arc::new(value.clone())))
                    .collect(),
            ),
        }
    }

    /// A copy of `self` with `entity`'s slice replaced by `next`.
    pub(crate) fn with_slice(&self, entity: &str, next: Value) -> Self {
        let mut slices = (*self.slices).clone();
        slices.insert(entity.to_owned(), Arc::new(next));
        Self {
            slices: Arc::new(slices),
        }
    }

    pub fn get(&self, entity: &str) -> Option<&Value> {
        self.slices.get(entity).map(Arc::as_ref)
    }

    /// The shared handle to `entity`'s slice.
    pub fn slice(&self, entity: &str) -> Option<&Arc<Value>> {
        self.slices.get(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = &str> {
        self.slices.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.slices.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.slices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }

    /// Whether both handles are the same snapshot.
    pub fn ptr_eq(&self, other: &GlobalState) -> bool {
        Arc::ptr_eq(&self.slices, &other.slices)
    }

    /// Whether both snapshots hold the very same slice for `entity`.
    pub fn shares_slice(&self, other: &GlobalState, entity: &str) -> bool {
        match (self.slice(entity), other.slice(entity)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The snapshot as a plain [`Value::Object`].
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.slices
                .iter()
                .map(|(k, v)| (k.clone(), v.as_ref().clone()))
                .collect(),
        )
    }
}

impl PartialEq for GlobalState {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
            || (self.len() == other.len()
                && self
                    .slices
                    .iter()
                    .zip(other.slices.iter())
                    .all(|((ka, va), (kb, vb))| ka == kb && (Arc::ptr_eq(va, vb) || va == vb)))
    }
}

impl fmt::Debug for GlobalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl fmt::Display for GlobalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{name:?}:{value}")?;
        }
        f.write_str("}")
    }
}

impl Serialize for GlobalState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in self.iter() {
            out.serialize_entry(name, value)?;
        }
        out.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn initial() -> GlobalState {
        let mut slices = IndexMap::new();
        slices.insert("counter".to_string(), Value::from(0));
        slices.insert("todos".to_string(), Value::Array(vec![]));
        GlobalState::from_slices(&slices)
    }

    #[test]
    fn with_slice_shares_siblings() {
        let state = initial();
        let next = state.with_slice("counter", Value::from(5));

        assert_eq!(next.get("counter"), Some(&Value::from(5)));
        assert_eq!(state.get("counter"), Some(&Value::from(0)));
        assert!(next.shares_slice(&state, "todos"));
        assert!(!next.shares_slice(&state, "counter"));
        assert!(!next.ptr_eq(&state));
    }

    #[test]
    fn key_set_is_preserved() {
        let state = initial();
        let next = state.with_slice("todos", Value::Array(vec![Value::from("a")]));
        assert_eq!(
            next.entities().collect::<Vec<_>>(),
            state.entities().collect::<Vec<_>>()
        );
    }

    #[test]
    fn equality_is_structural() {
        let a = initial();
        let b = initial();
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_ne!(a, a.with_slice("counter", Value::from(1)));
    }

    #[test]
    fn serializes_as_json_object() {
        let json = serde_json::to_value(initial()).unwrap();
        assert_eq!(json, serde_json::json!({"counter": 0, "todos": []}));
    }
}
