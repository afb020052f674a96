//! Error types for registration, dispatch and binding.

use thiserror::Error;

use crate::value::Kind;

pub type Result<T> = std::result::Result<T, Error>;

/// Contract violations raised at registration, dispatch or connect time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A value did not have the structural kind a boundary requires.
    #[error("{context}: expected {expected}, found {found}")]
    Shape {
        context: String,
        expected: Kind,
        found: Kind,
    },

    #[error("{context}: missing required field `{field}`")]
    MissingField {
        context: String,
        field: &'static str,
    },

    #[error("entity `{entity}`: initial state may not be a {found}")]
    InvalidStateType { entity: String, found: Kind },

    #[error("action `{action}`: payload may not be a {found}")]
    InvalidPayloadType { action: String, found: Kind },

    #[error("action type must be a string, found {found}")]
    InvalidType { found: Kind },

    #[error("action `{action}` is declared by both `{first}` and `{second}`")]
    DuplicateAction {
        action: String,
        first: String,
        second: String,
    },

    #[error("selector must be a function or null, found {found}")]
    InvalidSelector { found: Kind },
}

/// Discriminant of an [`Error`], for comparing failures without their context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Shape,
    MissingField,
    InvalidStateType,
    InvalidPayloadType,
    InvalidType,
    DuplicateAction,
    InvalidSelector,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Shape { .. } => ErrorKind::Shape,
            Error::MissingField { .. } => ErrorKind::MissingField,
            Error::InvalidStateType { .. } => ErrorKind::InvalidStateType,
            Error::InvalidPayloadType { .. } => ErrorKind::InvalidPayloadType,
            Error::InvalidType { .. } => ErrorKind::InvalidType,
            Error::DuplicateAction { .. } => ErrorKind::DuplicateAction,
            Error::InvalidSelector { .. } => ErrorKind::InvalidSelector,
        }
    }

    pub(crate) fn shape(context: impl Into<String>, expected: Kind, found: Kind) -> Self {
        Error::Shape {
            context: context.into(),
            expected,
            found,
        }
    }

    pub(crate) fn missing(context: impl Into<String>, field: &'static str) -> Self {
        Error::MissingField {
            context: context.into(),
            field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        let err = Error::shape("entity `todos`", Kind::Object, Kind::Array);
        assert_eq!(err.to_string(), "entity `todos`: expected object, found array");

        let err = Error::InvalidStateType {
            entity: "clock".into(),
            found: Kind::Date,
        };
        assert_eq!(err.to_string(), "entity `clock`: initial state may not be a date");
        assert_eq!(err.kind(), ErrorKind::InvalidStateType);
    }
}
