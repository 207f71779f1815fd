//! CLI commands

pub mod ai;
pub mod clean;
pub mod edit;
pub mod generate;
pub mod init;
pub mod list;
pub mod new;
pub mod render;

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

use crate::editor::EditForm;

/// Post fields given on the command line; unset fields are left alone
#[derive(Debug, Clone, Default)]
pub struct PostFields {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,
}

impl PostFields {
    /// Write the given fields into a form
    pub fn apply(&self, form: &mut EditForm) {
        if let Some(title) = &self.title {
            form.title = title.clone();
        }
        if let Some(excerpt) = &self.excerpt {
            form.excerpt = excerpt.clone();
        }
        if let Some(content) = &self.content {
            form.content = content.clone();
        }
        if let Some(tags) = &self.tags {
            form.tags_input = tags.clone();
        }
        if let Some(image_url) = &self.image_url {
            form.image_url = image_url.clone();
        }
    }
}

/// Read post content from a file, or from stdin when the path is `-`
pub fn read_content(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_only_touch_given_values() {
        let mut form = EditForm {
            title: "old".to_string(),
            excerpt: "keep".to_string(),
            ..EditForm::default()
        };
        PostFields {
            title: Some("new".to_string()),
            tags: Some("a, b".to_string()),
            ..PostFields::default()
        }
        .apply(&mut form);
        assert_eq!(form.title, "new");
        assert_eq!(form.excerpt, "keep");
        assert_eq!(form.tags_input, "a, b");
    }
}
