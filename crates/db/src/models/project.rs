//! Project entity model and DTOs.

use club_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::member::MemberSummary;

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    /// Attachment ref of the project image.
    pub image_url: Option<String>,
    pub github_url: Option<String>,
    pub deploy_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A project enriched with its members.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithMembers {
    #[serde(flatten)]
    pub project: Project,
    pub members: Vec<MemberSummary>,
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(url)]
    pub deploy_url: Option<String>,
    /// Members to associate right after creation.
    #[serde(default)]
    pub member_ids: Vec<String>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(url)]
    pub github_url: Option<String>,
    #[validate(url)]
    pub deploy_url: Option<String>,
}
