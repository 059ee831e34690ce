//! Club backend core: association, attached-media, and progress lifecycles.
//!
//! The HTTP layer and the concrete stores live in other crates. Everything
//! here talks to storage through the [`store::AttachmentStore`] and
//! [`store::RelationStore`] traits, which are passed in explicitly.

pub mod association;
pub mod error;
pub mod locator;
pub mod media;
pub mod memory;
pub mod owner;
pub mod progress;
pub mod store;
pub mod types;
