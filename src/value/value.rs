use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use regex::Regex;

use super::Kind;

/// A state handler: `(current slice, payload) -> next slice`.
pub type Handler = Arc<dyn Fn(&Value, &Value) -> Value + Send + Sync>;

static UNDEFINED: Value = Value::Undefined;
static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(0);

/// A dynamically shaped value held in entity state, action payloads and
/// entity declarations.
#[derive(Clone, Default)]
pub enum Value {
    /// A plain keyed mapping. Keys keep insertion order.
    Object(IndexMap<String, Value>),
    Array(Vec<Value>),
    Function(Handler),
    Date(DateTime<Utc>),
    Pattern(Regex),
    Symbol(Symbol),
    Number(f64),
    String(String),
    Boolean(bool),
    Null,
    #[default]
    Undefined,
}

impl Value {
    /// Wrap a closure as a [`Value::Function`].
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value) -> Value + Send + Sync + 'static,
    {
        Value::Function(Arc::new(f))
    }

    /// Build an object from key/value pairs, keeping their order.
    pub fn object<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn kind(&self) -> Kind {
        Kind::of(self)
    }

    /// Truthiness: `false`, `0`, `NaN`, `""`, `null` and `undefined` are falsy.
    /// Every object, array, function, date, pattern and symbol is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Null | Value::Undefined => false,
            _ => true,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Look up a key on an object.
    ///
    /// A missing key, or any lookup on a non-object, yields
    /// [`Value::Undefined`].
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Value::Object(map) => map.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Value>> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Handler> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Arc::ptr_eq(a, b),
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Pattern(a), Value::Pattern(b)) => a.as_str() == b.as_str(),
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Undefined, Value::Undefined) => true,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(map) => f.debug_map().entries(map.iter()).finish(),
            Value::Array(items) => f.debug_list().entries(items.iter()).finish(),
            Value::Function(func) => write!(f, "Function({:p})", Arc::as_ptr(func)),
            Value::Date(date) => write!(f, "Date({date:?})"),
            Value::Pattern(re) => write!(f, "Pattern({:?})", re.as_str()),
            Value::Symbol(sym) => write!(f, "{sym:?}"),
            Value::Number(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
        }
    }
}

/// JSON-like rendering, used by transition logging.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{key:?}:{value}")?;
                }
                f.write_str("}")
            }
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, value) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
            Value::Function(_) => f.write_str("[function]"),
            Value::Date(date) => {
                write!(f, "{}", date.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            Value::Pattern(re) => write!(f, "/{}/", re.as_str()),
            Value::Symbol(sym) => write!(f, "{sym}"),
            Value::Number(n) => fmt_number(*n, f),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Null => f.write_str("null"),
            Value::Undefined => f.write_str("undefined"),
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        write!(f, "{}", n as i64)
    } else {
        write!(f, "{n}")
    }
}

/// A unique, opaque token. Two symbols are equal only if one is a clone of
/// the other, regardless of description.
#[derive(Clone)]
pub struct Symbol {
    id: u64,
    description: Option<Arc<str>>,
}

impl Symbol {
    pub fn new(description: Option<&str>) -> Self {
        Self {
            id: NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed),
            description: description.map(Arc::from),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol#{}({:?})", self.id, self.description())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description().unwrap_or_default())
    }
}

macro_rules! from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_number!(i8, i16, i32, i64, u8, u16, u32, u64, usize, isize, f32, f64);

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<IndexMap<String, Value>> for Value {
    fn from(map: IndexMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(date: DateTime<Utc>) -> Self {
        Value::Date(date)
    }
}

impl From<Regex> for Value {
    fn from(re: Regex) -> Self {
        Value::Pattern(re)
    }
}

impl From<Symbol> for Value {
    fn from(sym: Symbol) -> Self {
        Value::Symbol(sym)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness() {
        assert!(!Value::from(0).is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from(false).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Undefined.is_truthy());

        assert!(Value::from(-1).is_truthy());
        assert!(Value::from("0").is_truthy());
        assert!(Value::Array(vec![]).is_truthy());
        assert!(Value::Object(IndexMap::new()).is_truthy());
        assert!(Value::function(|s, _| s.clone()).is_truthy());
    }

    #[test]
    fn get_missing_key_is_undefined() {
        let obj = Value::object([("a", 1)]);
        assert_eq!(obj.get("a"), &Value::from(1));
        assert!(obj.get("b").is_undefined());
        assert!(Value::from(3).get("a").is_undefined());
    }

    #[test]
    fn functions_compare_by_identity() {
        let f = Value::function(|s, _| s.clone());
        let g = Value::function(|s, _| s.clone());
        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn symbols_are_unique() {
        let a = Symbol::new(Some("id"));
        let b = Symbol::new(Some("id"));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "Symbol(id)");
    }

    #[test]
    fn display_is_json_like() {
        let value = Value::object([
            ("count", Value::from(2)),
            ("ratio", Value::from(0.5)),
            ("tags", Value::from(vec![Value::from("a"), Value::Null])),
        ]);
        assert_eq!(value.to_string(), r#"{"count":2,"ratio":0.5,"tags":["a",null]}"#);
    }
}
