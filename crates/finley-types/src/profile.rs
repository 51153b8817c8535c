//! User identity and profile types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The authenticated user as reported by the hosted auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// A row of the `user_profiles` table. `id` equals the auth user id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub display_name: String,
    pub level: u32,
    pub total_points: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for `user_profiles`.
#[derive(Debug, Clone, Serialize)]
pub struct NewUserProfile {
    pub id: Uuid,
    pub display_name: String,
}

/// Partial update for `user_profiles`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_points: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request body for `PUT /api/v1/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: String,
}
