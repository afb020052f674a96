use crate::error::{Error, Result};
use crate::value::{Kind, Value};

pub const TYPE_FIELD: &str = "type";
pub const PAYLOAD_FIELD: &str = "payload";

/// Builders for the dynamic `{type, payload}` action mapping.
pub struct Action;

impl Action {
    /// # Examples
    ///
    /// ```
    /// use slicebox::{Action, Value};
    ///
    /// let action = Action::new("INCREMENT", 1);
    /// assert_eq!(action.get("type"), &Value::from("INCREMENT"));
    /// assert_eq!(action.get("payload"), &Value::from(1));
    /// ```
    pub fn new(action_type: impl Into<String>, payload: impl Into<Value>) -> Value {
        Value::object([
            (TYPE_FIELD, Value::String(action_type.into())),
            (PAYLOAD_FIELD, payload.into()),
        ])
    }

    /// An action carrying no payload. Dispatching it always fails with
    /// [`Error::MissingField`].
    pub fn without_payload(action_type: impl Into<String>) -> Value {
        Value::object([(TYPE_FIELD, Value::String(action_type.into()))])
    }
}

/// Check an action and return its type name and payload.
///
/// Presence of `type` and `payload` is a truthiness test: a payload of `0`,
/// `""`, `false` or `null` is reported as missing.
pub fn validate_action(action: &Value) -> Result<(&str, &Value)> {
    if action.kind() != Kind::Object {
        return Err(Error::shape("action", Kind::Object, action.kind()));
    }

    let action_type = action.get(TYPE_FIELD);
    let payload = action.get(PAYLOAD_FIELD);

    if !action_type.is_truthy() {
        return Err(Error::missing("action", TYPE_FIELD));
    }
    if !payload.is_truthy() {
        return Err(Error::missing("action", PAYLOAD_FIELD));
    }

    let Some(name) = action_type.as_str() else {
        return Err(Error::InvalidType {
            found: action_type.kind(),
        });
    };

    if payload.kind().is_restricted() {
        return Err(Error::InvalidPayloadType {
            action: name.to_owned(),
            found: payload.kind(),
        });
    }

    Ok((name, payload))
}
