//! Request/response DTOs for the user routes.

use serde::{Deserialize, Serialize};

use gatekeeper_auth::{Role, UserRecord};
use gatekeeper_core::UserId;

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub banned: bool,
    pub verified: bool,
}

impl From<UserRecord> for UserResponse {
    fn from(u: UserRecord) -> Self {
        Self {
            id: u.id,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            role: u.role,
            banned: u.banned,
            verified: u.verified,
        }
    }
}
