//! HTTP handlers, one module per resource.
//!
//! Handlers stay thin: plain CRUD goes straight to the repositories, while
//! memberships, progress, and attachments always go through the core
//! components held in [`crate::state::AppState`].

pub mod achievement;
pub mod media;
pub mod member;
pub mod membership;
pub mod progress;
pub mod project;
pub mod question;
pub mod resource_image;
pub mod upload;
