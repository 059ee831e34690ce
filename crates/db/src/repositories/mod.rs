//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod achievement_repo;
pub mod attachment_ref_repo;
pub mod member_repo;
pub mod membership_repo;
pub mod progress_repo;
pub mod project_repo;
pub mod question_repo;

pub use achievement_repo::AchievementRepo;
pub use attachment_ref_repo::AttachmentRefRepo;
pub use member_repo::MemberRepo;
pub use membership_repo::MembershipRepo;
pub use progress_repo::ProgressRepo;
pub use project_repo::ProjectRepo;
pub use question_repo::QuestionRepo;
