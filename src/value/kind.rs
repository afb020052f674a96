use std::fmt;

use serde::{Deserialize, Serialize};

use super::Value;

/// The structural kind of a [`Value`].
///
/// Every value maps to exactly one kind. `Object` is reserved for plain keyed
/// mappings; sequences, `null` and `undefined` each have their own kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Object,
    Array,
    Function,
    Date,
    Pattern,
    Symbol,
    Number,
    String,
    Boolean,
    Null,
    Undefined,
}

impl Kind {
    /// Classify a value.
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Object(_) => Kind::Object,
            Value::Array(_) => Kind::Array,
            Value::Function(_) => Kind::Function,
            Value::Date(_) => Kind::Date,
            Value::Pattern(_) => Kind::Pattern,
            Value::Symbol(_) => Kind::Symbol,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Boolean(_) => Kind::Boolean,
            Value::Null => Kind::Null,
            Value::Undefined => Kind::Undefined,
        }
    }

    /// Kinds that may not be stored as entity state or carried as a payload.
    pub fn is_restricted(self) -> bool {
        matches!(self, Kind::Function | Kind::Date | Kind::Pattern | Kind::Symbol)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Object => "object",
            Kind::Array => "array",
            Kind::Function => "function",
            Kind::Date => "date",
            Kind::Pattern => "pattern",
            Kind::Symbol => "symbol",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Boolean => "boolean",
            Kind::Null => "null",
            Kind::Undefined => "undefined",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a value into its [`Kind`].
///
/// Total and side-effect free.
///
/// # Examples
///
/// ```
/// use slicebox::value::{classify, Kind, Value};
///
/// assert_eq!(classify(&Value::from(0)), Kind::Number);
/// assert_eq!(classify(&Value::Null), Kind::Null);
/// assert_eq!(classify(&Value::Array(vec![])), Kind::Array);
/// ```
pub fn classify(value: &Value) -> Kind {
    Kind::of(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Symbol;
    use chrono::Utc;
    use indexmap::IndexMap;
    use regex::Regex;

    #[test]
    fn classifies_every_kind() {
        let cases = vec![
            (Value::Object(IndexMap::new()), Kind::Object),
            (Value::Array(vec![]), Kind::Array),
            (Value::function(|s, _| s.clone()), Kind::Function),
            (Value::Date(Utc::now()), Kind::Date),
            (Value::Pattern(Regex::new("a+").unwrap()), Kind::Pattern),
            (Value::Symbol(Symbol::new(Some("tag"))), Kind::Symbol),
            (Value::from(1.5), Kind::Number),
            (Value::from("s"), Kind::String),
            (Value::from(false), Kind::Boolean),
            (Value::Null, Kind::Null),
            (Value::Undefined, Kind::Undefined),
        ];

        for (value, kind) in cases {
            assert_eq!(classify(&value), kind);
        }
    }

    #[test]
    fn null_and_undefined_are_not_objects() {
        assert_ne!(classify(&Value::Null), Kind::Object);
        assert_ne!(classify(&Value::Undefined), Kind::Object);
    }

    #[test]
    fn restricted_kinds() {
        let restricted: Vec<Kind> = [
            Kind::Object,
            Kind::Array,
            Kind::Function,
            Kind::Date,
            Kind::Pattern,
            Kind::Symbol,
            Kind::Number,
            Kind::String,
            Kind::Boolean,
            Kind::Null,
            Kind::Undefined,
        ]
        .into_iter()
        .filter(|k| k.is_restricted())
        .collect();

        assert_eq!(
            restricted,
            vec![Kind::Function, Kind::Date, Kind::Pattern, Kind::Symbol]
        );
    }
}
