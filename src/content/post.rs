//! Post models

use serde::{Deserialize, Serialize};

/// A blog post as it is stored and displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug (URL-friendly unique name)
    pub slug: String,

    /// Post title
    pub title: String,

    /// Short summary shown in post listings
    #[serde(default)]
    pub excerpt: String,

    /// Display date, kept exactly as entered
    #[serde(default)]
    pub date: String,

    /// Post author
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Post tags, in the order they were entered
    #[serde(default)]
    pub tags: Vec<String>,

    /// Cover image, a remote URL or a data URI
    #[serde(default)]
    pub image_url: String,

    /// Raw markdown content
    #[serde(default)]
    pub content: String,
}

impl Post {
    /// Get the previous (newer) post in a list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next (older) post in a list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

/// A partial post produced by the drafting service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedPost {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: slug.to_uppercase(),
            excerpt: String::new(),
            date: "2024年5月1日".to_string(),
            author: None,
            tags: vec![],
            image_url: String::new(),
            content: String::new(),
        }
    }

    #[test]
    fn test_serializes_camel_case() {
        let mut p = post("hello");
        p.image_url = "https://example.com/a.png".to_string();
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"imageUrl\":\"https://example.com/a.png\""));
        assert!(!json.contains("author"));
    }

    #[test]
    fn test_deserializes_stored_record() {
        let json = r##"{"slug":"a","title":"A","excerpt":"e","date":"d","author":"x","tags":["t","t"],"imageUrl":"data:image/png;base64,AA==","content":"# A"}"##;
        let p: Post = serde_json::from_str(json).unwrap();
        assert_eq!(p.author.as_deref(), Some("x"));
        assert_eq!(p.tags, vec!["t", "t"]);
        assert!(p.image_url.starts_with("data:"));
        assert_eq!(p.content, "# A");
    }

    #[test]
    fn test_prev_next() {
        let posts = vec![post("a"), post("b"), post("c")];
        assert!(posts[0].prev(&posts).is_none());
        assert_eq!(posts[1].prev(&posts).unwrap().slug, "a");
        assert_eq!(posts[1].next(&posts).unwrap().slug, "c");
        assert!(posts[2].next(&posts).is_none());
    }
}
