//! Persistent post storage
//!
//! The whole collection lives under a single key as one JSON array. It is
//! read once at startup and rewritten in full after every change.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

use crate::content::{seed::seed_posts, Post};

/// Default key holding the post collection
pub const DEFAULT_KEY: &str = "wabisabi_posts";

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed post data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read/write contract for the stored post collection
pub trait PostStorage: Send + Sync {
    /// Load the stored collection, `None` when nothing has been stored yet
    fn load(&self) -> Result<Option<Vec<Post>>, StorageError>;

    /// Replace the stored collection
    fn store(&self, posts: &[Post]) -> Result<(), StorageError>;
}

/// Key/value storage backed by one JSON file per key
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
    key: String,
}

impl FileStorage {
    /// Create storage for `key` inside `dir`
    pub fn new<P: AsRef<Path>>(dir: P, key: &str) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            key: key.to_string(),
        }
    }

    /// Path of the file holding this key
    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}

impl PostStorage for FileStorage {
    fn load(&self) -> Result<Option<Vec<Post>>, StorageError> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let posts = serde_json::from_str(&content)?;
        Ok(Some(posts))
    }

    fn store(&self, posts: &[Post]) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(posts)?;
        // Readers only ever see a complete file
        let tmp = self.dir.join(format!(".{}.json.tmp", self.key));
        fs::write(&tmp, json)?;
        fs::rename(&tmp, self.path())?;
        tracing::debug!("Stored {} posts to {:?}", posts.len(), self.path());
        Ok(())
    }
}

/// In-memory storage, used by tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryStorage {
    posts: Mutex<Option<Vec<Post>>>,
}

impl MemoryStorage {
    /// Create empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage that already holds `posts`
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: Mutex::new(Some(posts)),
        }
    }

    /// Snapshot of what is currently stored
    pub fn snapshot(&self) -> Option<Vec<Post>> {
        self.posts.lock().ok().and_then(|p| p.clone())
    }
}

impl PostStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<Post>>, StorageError> {
        Ok(self.snapshot())
    }

    fn store(&self, posts: &[Post]) -> Result<(), StorageError> {
        if let Ok(mut guard) = self.posts.lock() {
            *guard = Some(posts.to_vec());
        }
        Ok(())
    }
}

/// Load the stored collection, falling back to the seed posts.
///
/// A read failure is logged and the seed is used without touching the
/// store. When nothing is stored yet the seed is written so later loads
/// find it.
pub fn load_or_seed(storage: &dyn PostStorage) -> Vec<Post> {
    match storage.load() {
        Ok(Some(posts)) => {
            tracing::debug!("Loaded {} stored posts", posts.len());
            posts
        }
        Ok(None) => {
            let posts = seed_posts();
            tracing::info!("No stored posts, starting from {} seed posts", posts.len());
            persist(storage, &posts);
            posts
        }
        Err(e) => {
            tracing::error!("Failed to read stored posts: {}", e);
            seed_posts()
        }
    }
}

/// Best-effort write: a failure is logged and the in-memory collection
/// stays authoritative
pub fn persist(storage: &dyn PostStorage, posts: &[Post]) -> bool {
    match storage.store(posts) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Failed to save posts: {}", e);
            false
        }
    }
}
