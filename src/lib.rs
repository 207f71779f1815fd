//! wabisabi: marketing site and blog editor for the Wabisabi trading course
//!
//! The crate renders the course's marketing pages and blog as static HTML
//! and manages the blog's posts: a small markdown dialect for post bodies,
//! slug assignment when posts are saved, a JSON post store and an optional
//! generative drafting service.

pub mod ai;
pub mod commands;
pub mod config;
pub mod content;
pub mod editor;
pub mod generator;
pub mod server;
pub mod storage;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The main application
#[derive(Clone)]
pub struct Wabisabi {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Directory holding the post store
    pub store_dir: PathBuf,
}

impl Wabisabi {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let public_dir = base_dir.join(&config.public_dir);
        let store_dir = base_dir.join(&config.store_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            store_dir,
        })
    }

    /// Post storage for this site
    pub fn storage(&self) -> Arc<dyn storage::PostStorage> {
        Arc::new(storage::FileStorage::new(
            &self.store_dir,
            &self.config.storage_key,
        ))
    }

    /// Open an editing session on the stored posts
    pub fn session(&self) -> editor::Session {
        editor::Session::open(self.config.clone(), self.storage())
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
