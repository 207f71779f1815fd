//! Editing session - the post collection plus the state of the blog editor
//!
//! All editor state (current view, edit mode, the open draft, the AI
//! panel) lives in one [`Session`] value owned by the caller. The session
//! is the only writer of the post collection; every change is merged by
//! the reconciler and written back to storage in full.

mod form;

pub use form::{apply_format, EditForm, Format, FormError};

use chrono::{DateTime, Local, Utc};
use std::sync::Arc;
use thiserror::Error;

use crate::ai::DraftingService;
use crate::config::SiteConfig;
use crate::content::{self, placeholder_slug, DraftedPost, Post};
use crate::storage::{self, PostStorage};

/// Session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Edit mode is off")]
    EditModeOff,

    #[error("No post is being edited")]
    NoDraft,

    #[error("Unknown post: {0}")]
    UnknownPost(String),

    #[error(transparent)]
    Invalid(#[from] FormError),
}

/// Which page the session is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Main,
    BlogIndex,
    BlogPost(String),
}

/// The blog editor state
pub struct Session {
    config: SiteConfig,
    storage: Arc<dyn PostStorage>,
    posts: Vec<Post>,
    view: View,
    edit_mode: bool,
    draft: Option<Post>,
    ai_panel_open: bool,
}

impl Session {
    /// Open a session on the stored posts, seeding the store if it is empty
    pub fn open(config: SiteConfig, storage: Arc<dyn PostStorage>) -> Self {
        let posts = storage::load_or_seed(storage.as_ref());
        Self {
            config,
            storage,
            posts,
            view: View::Main,
            edit_mode: false,
            draft: None,
            ai_panel_open: false,
        }
    }

    /// All posts, newest first
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Posts for the home page preview
    pub fn preview_posts(&self) -> &[Post] {
        let n = self.config.preview_count.min(self.posts.len());
        &self.posts[..n]
    }

    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    /// The post shown by the current view, if any
    pub fn current_post(&self) -> Option<&Post> {
        match &self.view {
            View::BlogPost(slug) => self.find(slug),
            _ => None,
        }
    }

    pub fn select_post(&mut self, slug: &str) {
        self.view = View::BlogPost(slug.to_string());
    }

    pub fn view_blog_index(&mut self) {
        self.view = View::BlogIndex;
    }

    pub fn go_home(&mut self) {
        self.view = View::Main;
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn toggle_edit_mode(&mut self) -> bool {
        self.edit_mode = !self.edit_mode;
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
    }

    /// The post currently open in the editor
    pub fn draft(&self) -> Option<&Post> {
        self.draft.as_ref()
    }

    pub fn is_ai_panel_open(&self) -> bool {
        self.ai_panel_open
    }

    /// Open the editor on an empty post
    pub fn initiate_new_post(&mut self, now: DateTime<Local>) -> Result<&Post, SessionError> {
        self.require_edit_mode()?;
        let post = self.blank_post(now);
        Ok(self.draft.insert(post))
    }

    /// Open the editor on a copy of an existing post
    pub fn begin_edit(&mut self, slug: &str) -> Result<&Post, SessionError> {
        self.require_edit_mode()?;
        let post = self
            .find(slug)
            .cloned()
            .ok_or_else(|| SessionError::UnknownPost(slug.to_string()))?;
        Ok(self.draft.insert(post))
    }

    pub fn open_ai_panel(&mut self) -> Result<(), SessionError> {
        self.require_edit_mode()?;
        self.ai_panel_open = true;
        Ok(())
    }

    pub fn close_ai_panel(&mut self) {
        self.ai_panel_open = false;
    }

    /// Close the AI panel and open the editor on a generated draft.
    /// Missing fields fall back to an untitled, empty post.
    pub fn apply_ai_draft(&mut self, generated: DraftedPost, now: DateTime<Local>) -> &Post {
        let mut post = self.blank_post(now);
        post.title = generated
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.config.untitled_title.clone());
        post.excerpt = generated.excerpt.unwrap_or_default();
        post.content = generated.content.unwrap_or_default();
        post.tags = generated.tags.unwrap_or_default();

        self.ai_panel_open = false;
        self.draft.insert(post)
    }

    /// Write form fields into the open draft
    pub fn update_draft(&mut self, form: &EditForm) -> Result<&Post, SessionError> {
        let draft = self.draft.as_mut().ok_or(SessionError::NoDraft)?;
        *draft = form.apply_to(draft);
        Ok(draft)
    }

    /// Apply a toolbar action to the draft's content
    pub fn format_draft(
        &mut self,
        selection: std::ops::Range<usize>,
        format: Format,
    ) -> Result<std::ops::Range<usize>, SessionError> {
        let draft = self.draft.as_mut().ok_or(SessionError::NoDraft)?;
        let (content, selection) = apply_format(&draft.content, selection, format);
        draft.content = content;
        Ok(selection)
    }

    /// Replace the draft's content with a markdown-formatted version.
    /// The service hands back the original text when it fails.
    pub async fn reformat_draft(
        &mut self,
        service: &dyn DraftingService,
    ) -> Result<&Post, SessionError> {
        let content = self.draft.as_ref().ok_or(SessionError::NoDraft)?.content.clone();
        let formatted = service.reformat_markdown(&content).await;
        let draft = self.draft.as_mut().ok_or(SessionError::NoDraft)?;
        draft.content = formatted;
        Ok(draft)
    }

    /// Close the editor without saving
    pub fn discard_draft(&mut self) -> Option<Post> {
        self.draft.take()
    }

    /// Validate and save the open draft, then close the editor.
    ///
    /// Returns the slug the post was saved under. The collection is written
    /// to storage; a storage failure is logged and the in-memory posts
    /// stay authoritative.
    pub fn save_draft(&mut self) -> Result<String, SessionError> {
        let draft = self.draft.as_ref().ok_or(SessionError::NoDraft)?;
        EditForm::from_post(draft).validate()?;

        let created = content::is_placeholder(&draft.slug);
        self.posts = content::save(draft, &self.posts);
        let slug = if created {
            self.posts[0].slug.clone()
        } else {
            draft.slug.clone()
        };

        storage::persist(self.storage.as_ref(), &self.posts);
        self.draft = None;

        if created {
            tracing::info!("Created post '{}'", slug);
        } else {
            tracing::info!("Updated post '{}'", slug);
        }
        Ok(slug)
    }

    fn require_edit_mode(&self) -> Result<(), SessionError> {
        if self.edit_mode {
            Ok(())
        } else {
            Err(SessionError::EditModeOff)
        }
    }

    fn blank_post(&self, now: DateTime<Local>) -> Post {
        let utc = now.with_timezone(&Utc);
        Post {
            slug: placeholder_slug(utc),
            title: String::new(),
            excerpt: String::new(),
            date: now.format(&self.config.date_format).to_string(),
            author: Some(self.config.default_author.clone()),
            tags: Vec::new(),
            image_url: self
                .config
                .placeholder_image(&utc.timestamp_millis().to_string()),
            content: String::new(),
        }
    }
}
