//! Content module - posts, markdown rendering and slug reconciliation

pub mod markdown;
mod post;
pub mod reconcile;
pub mod seed;

pub use markdown::MarkdownRenderer;
pub use post::{DraftedPost, Post};
pub use reconcile::{is_placeholder, placeholder_slug, save, slugify, try_save, ReconcileError};
