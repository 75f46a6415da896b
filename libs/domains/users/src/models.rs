use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A persisted user.
///
/// `id` and `uuid` are assigned by storage on creation and never change.
/// `uuid` is the identifier used in update and delete URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    /// Internal numeric primary key
    #[schema(example = 1)]
    pub id: i64,
    /// Public identifier
    pub uuid: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "Alice A")]
    pub full_name: String,
}

/// Body accepted by create and update.
///
/// Missing fields default to empty strings. Anything else in the body,
/// including `id` and `uuid`, is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserInput {
    #[serde(default)]
    #[schema(example = "alice")]
    pub username: String,
    #[serde(default)]
    #[schema(example = "a@x.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "Alice A")]
    pub full_name: String,
}

impl UserInput {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
        }
    }
}
