use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Role;

/// The signed-in user, as seen by this session.
///
/// Produced by the authentication collaborator at sign-in, immutable for the
/// session lifetime. Contains only data fields — no auth logic.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SessionIdentity {
    pub user_id: String,
    /// Display name as stored, used for `@name` mention matching.
    pub display_name: String,
    pub role: Role,
    pub team_id: String,
}

impl SessionIdentity {
    /// Whether this session's role carries authority rights.
    #[must_use]
    pub const fn is_authority(&self) -> bool {
        self.role.is_authority()
    }
}
