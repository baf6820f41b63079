use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;

/// Claims embedded in the JWT access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,    // user UUID
    pub tenant: String, // salon slug
    pub role: UserRole,
    pub staff_id: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

/// Extracted from the validated JWT by the Axum extractor.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub tenant: String,
    pub role: UserRole,
    pub staff_id: Option<Uuid>,
}

impl AuthenticatedUser {
    pub fn can_manage(&self) -> bool {
        matches!(self.role, UserRole::Owner | UserRole::Manager)
    }
}
