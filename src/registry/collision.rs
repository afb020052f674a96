use serde::{Deserialize, Serialize};

/// How the builder treats an action name declared by more than one entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// The entity registered last owns the action; the earlier handler
    /// becomes unreachable.
    #[default]
    LastWins,
    /// Fail the build with [`Error::DuplicateAction`](crate::Error::DuplicateAction).
    Reject,
}

/// An action name claimed by two entities under [`CollisionPolicy::LastWins`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Collision {
    pub action: String,
    /// Entity whose handler was overwritten.
    pub previous_owner: String,
    /// Entity that owns the action after the build.
    pub owner: String,
}
