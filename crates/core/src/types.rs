//! Identifier and reference types shared by every layer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All numeric primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

// ---------------------------------------------------------------------------
// Member and question identifiers
// ---------------------------------------------------------------------------

/// Identifier of a club member. Members use opaque text keys.
///
/// Always non-empty and free of surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MemberId(String);

impl MemberId {
    /// Parse a member id, rejecting blank input.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::InvalidInput("member id is required".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MemberId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MemberId> for String {
    fn from(id: MemberId) -> Self {
        id.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a question in the question bank. Strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionId(DbId);

impl QuestionId {
    pub fn new(raw: DbId) -> Result<Self, CoreError> {
        if raw <= 0 {
            return Err(CoreError::InvalidInput(format!(
                "question id must be a positive integer, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> DbId {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Resources and owners
// ---------------------------------------------------------------------------

/// The kinds of record that aggregate members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Project,
    Achievement,
}

impl ResourceKind {
    /// Entity label used in error messages and logs.
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project",
            Self::Achievement => "Achievement",
        }
    }
}

/// A concrete resource: its kind plus its primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceRef {
    pub kind: ResourceKind,
    pub id: DbId,
}

impl ResourceRef {
    pub fn project(id: DbId) -> Self {
        Self {
            kind: ResourceKind::Project,
            id,
        }
    }

    pub fn achievement(id: DbId) -> Self {
        Self {
            kind: ResourceKind::Achievement,
            id,
        }
    }

    /// Reject non-positive keys before they reach the store.
    pub fn validate(self) -> Result<Self, CoreError> {
        if self.id <= 0 {
            return Err(CoreError::InvalidInput(format!(
                "{} id must be a positive integer, got {}",
                self.kind.label(),
                self.id
            )));
        }
        Ok(self)
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.label(), self.id)
    }
}

/// One `(resource, member)` entry of a membership set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MembershipPair {
    pub resource: ResourceRef,
    pub member_id: MemberId,
}

/// A record that may hold at most one attachment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnerRef {
    Member(MemberId),
    Project(DbId),
    Achievement(DbId),
}

impl OwnerRef {
    /// Folder under which this owner's attachments are stored.
    pub fn folder(&self) -> &'static str {
        match self {
            Self::Member(_) => "members",
            Self::Project(_) => "projects",
            Self::Achievement(_) => "achievements",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Member(_) => "Member",
            Self::Project(_) => "Project",
            Self::Achievement(_) => "Achievement",
        }
    }

    /// The owner's key rendered as a string (for errors and logs).
    pub fn key(&self) -> String {
        match self {
            Self::Member(id) => id.to_string(),
            Self::Project(id) | Self::Achievement(id) => id.to_string(),
        }
    }
}

impl OwnerRef {
    /// Build an owner from a kind label (`member`, `project`,
    /// `achievement`) and its key.
    pub fn parse(kind: &str, key: &str) -> Result<Self, CoreError> {
        let numeric = || -> Result<DbId, CoreError> {
            key.trim()
                .parse::<DbId>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| {
                    CoreError::InvalidInput(format!("{kind} id must be a positive integer, got '{key}'"))
                })
        };
        match kind.trim().to_ascii_lowercase().as_str() {
            "member" => Ok(Self::Member(MemberId::parse(key)?)),
            "project" => Ok(Self::Project(numeric()?)),
            "achievement" => Ok(Self::Achievement(numeric()?)),
            other => Err(CoreError::InvalidInput(format!("unknown owner kind '{other}'"))),
        }
    }
}

impl From<ResourceRef> for OwnerRef {
    fn from(resource: ResourceRef) -> Self {
        match resource.kind {
            ResourceKind::Project => Self::Project(resource.id),
            ResourceKind::Achievement => Self::Achievement(resource.id),
        }
    }
}

impl fmt::Display for OwnerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.label(), self.key())
    }
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Completion state of a `(member, question)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionState {
    /// No progress record: not completed.
    Absent,
    /// A progress record exists: completed.
    Present,
}

impl CompletionState {
    pub fn is_completed(self) -> bool {
        matches!(self, Self::Present)
    }
}
