use serde::{Deserialize, Serialize};

/// Read-only snapshot of the signed-in user, handed to screens at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl User {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: None,
        }
    }
}

/// Capability for ending the current session. Owned by navigation, never by
/// the scheduling core.
pub trait SignOut: Send + Sync {
    fn sign_out(&self);
}
