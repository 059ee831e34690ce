//! Member entity model and DTOs.

use club_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `members` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Member {
    pub id: String,
    pub email: String,
    pub name: String,
    pub bio: Option<String>,
    /// Attachment ref of the profile photo.
    pub profile_photo: Option<String>,
    pub passout_year: Option<i32>,
    pub is_approved: bool,
    pub is_manager: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The subset of member columns embedded in resource responses.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MemberSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
}

/// DTO for creating a new member.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMember {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    pub bio: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub passout_year: Option<i32>,
}

/// DTO for updating a member's profile. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateMember {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub bio: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub passout_year: Option<i32>,
}

/// Request body for approving or un-approving a member.
#[derive(Debug, Clone, Deserialize)]
pub struct SetApproval {
    pub is_approved: bool,
}
