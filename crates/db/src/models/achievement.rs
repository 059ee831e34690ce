//! Achievement entity model and DTOs.

use club_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::member::MemberSummary;

/// A row from the `achievements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Achievement {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub achieved_at: Timestamp,
    /// Attachment ref of the achievement image.
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An achievement enriched with its members.
#[derive(Debug, Clone, Serialize)]
pub struct AchievementWithMembers {
    #[serde(flatten)]
    pub achievement: Achievement,
    pub members: Vec<MemberSummary>,
}

/// DTO for creating a new achievement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAchievement {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    pub achieved_at: Timestamp,
    /// Members credited with the achievement.
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// DTO for updating an existing achievement. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAchievement {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub achieved_at: Option<Timestamp>,
}
