//! Attachment store backends.
//!
//! Both backends implement [`club_core::store::AttachmentStore`] and render
//! public locators through the same [`club_core::locator::LocatorFormat`],
//! so a locator written by one deployment parses under any other that
//! shares the public base URL and bucket.

pub mod local;
pub mod s3;

pub use local::LocalAttachmentStore;
pub use s3::{S3AttachmentStore, S3Settings};
