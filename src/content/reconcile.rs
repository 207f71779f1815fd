//! Slug assignment and merging of saved drafts into the post collection

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use super::Post;

/// Prefix of the temporary slug given to a post that has not been saved yet
pub const PLACEHOLDER_PREFIX: &str = "new-post-";

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_\-]+").unwrap();
    static ref HYPHEN_RUN: Regex = Regex::new(r"--+").unwrap();
    static ref PLACEHOLDER: Regex = Regex::new(r"^new-post-[0-9]+$").unwrap();
}

/// Errors reported by [`try_save`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("No post with slug '{0}'")]
    NotFound(String),
}

/// Temporary slug for a draft created at `now`
pub fn placeholder_slug(now: DateTime<Utc>) -> String {
    format!("{}{}", PLACEHOLDER_PREFIX, now.timestamp_millis())
}

/// Whether a slug is still the temporary one given to an unsaved draft:
/// the prefix followed by the creation time in milliseconds, nothing else
pub fn is_placeholder(slug: &str) -> bool {
    PLACEHOLDER.is_match(slug)
}

/// Turn a title into a URL-safe slug.
///
/// Lowercases, joins words with `-` and drops everything that is not an
/// ASCII word character or hyphen. Titles without any such character
/// (for example Japanese-only titles) produce an empty slug.
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let hyphenated = WHITESPACE_RUN.replace_all(&lower, "-");
    let cleaned = NON_SLUG_CHARS.replace_all(&hyphenated, "");
    let collapsed = HYPHEN_RUN.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// First slug derived from `title` that no post in `existing` uses:
/// `title`, then `title-1`, `title-2`, ...
///
/// A slug shaped like a placeholder is never handed out, so a saved post
/// cannot be mistaken for an unsaved draft later.
pub fn unique_slug(title: &str, existing: &[Post]) -> String {
    let base = slugify(title);
    let taken = |candidate: &str| {
        is_placeholder(candidate) || existing.iter().any(|p| p.slug == candidate)
    };

    let mut candidate = base.clone();
    let mut counter = 1u64;
    while taken(&candidate) {
        candidate = format!("{}-{}", base, counter);
        counter += 1;
    }
    candidate
}

/// Merge a saved draft into the collection.
///
/// A draft still carrying a placeholder slug is a new post: it gets a
/// unique slug from its title and goes to the front. Any other draft
/// replaces the post with the same slug in place. A draft whose slug
/// matches nothing leaves the collection unchanged.
pub fn save(draft: &Post, existing: &[Post]) -> Vec<Post> {
    match try_save(draft, existing) {
        Ok(posts) => posts,
        Err(e) => {
            tracing::warn!("Ignoring save: {}", e);
            existing.to_vec()
        }
    }
}

/// Like [`save`], but an edit of an unknown slug is an error
pub fn try_save(draft: &Post, existing: &[Post]) -> Result<Vec<Post>, ReconcileError> {
    if is_placeholder(&draft.slug) {
        let mut post = draft.clone();
        post.slug = unique_slug(&draft.title, existing);
        tracing::debug!("Assigned slug '{}' to new post '{}'", post.slug, post.title);

        let mut posts = Vec::with_capacity(existing.len() + 1);
        posts.push(post);
        posts.extend_from_slice(existing);
        return Ok(posts);
    }

    let position = existing
        .iter()
        .position(|p| p.slug == draft.slug)
        .ok_or_else(|| ReconcileError::NotFound(draft.slug.clone()))?;

    let mut posts = existing.to_vec();
    posts[position] = draft.clone();
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, title: &str) -> Post {
        Post {
            slug: slug.to_string(),
            title: title.to_string(),
            excerpt: String::new(),
            date: String::new(),
            author: None,
            tags: vec![],
            image_url: String::new(),
            content: String::new(),
        }
    }

    fn draft(title: &str) -> Post {
        post("new-post-1717200000000", title)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Hello,   World!  "), "hello-world");
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("--x--"), "x");
        assert_eq!(slugify("snake_case Title"), "snake_case-title");
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("わびさび"), "");
        assert_eq!(slugify("RSI と MACD"), "rsi-macd");
    }

    /// Every string of up to `len` characters drawn from `alphabet`
    fn strings(alphabet: &[char], len: usize) -> Vec<String> {
        let mut all = vec![String::new()];
        let mut layer = vec![String::new()];
        for _ in 0..len {
            layer = layer
                .iter()
                .flat_map(|s| {
                    alphabet.iter().map(move |c| {
                        let mut next = s.clone();
                        next.push(*c);
                        next
                    })
                })
                .collect();
            all.extend(layer.iter().cloned());
        }
        all
    }

    #[test]
    fn test_slugify_idempotent() {
        let alphabet = [
            'A', 'z', '0', '_', '-', ' ', '\t', '\n', '!', 'İ', '\u{212A}', 'ß', 'わ', '\u{0307}',
        ];
        let mut checked = 0;
        for input in strings(&alphabet, 4) {
            let once = slugify(&input);
            assert_eq!(slugify(&once), once, "input: {:?}", input);
            assert!(
                once.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-'),
                "input: {:?} gave {:?}",
                input,
                once
            );
            assert!(!once.starts_with('-') && !once.ends_with('-') && !once.contains("--"));
            checked += 1;
        }
        assert!(checked > 40_000);

        assert_eq!(slugify("İstanbul \u{212A}elvin"), "istanbul-kelvin");
        assert_eq!(slugify("a_-_b\t\n-__-c"), "a_-_b-__-c");
    }

    #[test]
    fn test_placeholder() {
        let now = Utc.timestamp_millis_opt(1_717_200_000_000).unwrap();
        let slug = placeholder_slug(now);
        assert_eq!(slug, "new-post-1717200000000");
        assert!(is_placeholder(&slug));
        assert!(!is_placeholder("hello-world"));
        assert!(!is_placeholder("new-post-ideas"));
        assert!(!is_placeholder("new-post-"));
        assert!(!is_placeholder("new-post-12a"));
        assert!(!is_placeholder("old-new-post-12"));
    }

    #[test]
    fn test_title_with_placeholder_prefix_edits_in_place() {
        let posts = save(&draft("New Post Ideas"), &[post("a", "A")]);
        assert_eq!(posts[0].slug, "new-post-ideas");

        let mut edited = posts[0].clone();
        edited.content = "revised".to_string();
        let after = save(&edited, &posts);
        assert_eq!(after.len(), posts.len());
        assert_eq!(after[0].slug, "new-post-ideas");
        assert_eq!(after[0].content, "revised");
        assert_eq!(after[1].slug, "a");
    }

    #[test]
    fn test_placeholder_shaped_title_gets_suffix() {
        let posts = save(&draft("New Post 42"), &[]);
        assert_eq!(posts[0].slug, "new-post-42-1");

        let edited = posts[0].clone();
        assert_eq!(save(&edited, &posts).len(), 1);
    }

    #[test]
    fn test_create_prepends() {
        let existing = vec![post("a", "A"), post("b", "B")];
        let posts = save(&draft("Hello World"), &existing);
        assert_eq!(posts.len(), 3);
        assert_eq!(posts[0].slug, "hello-world");
        assert_eq!(posts[0].title, "Hello World");
        assert_eq!(posts[1].slug, "a");
        assert_eq!(posts[2].slug, "b");
    }

    #[test]
    fn test_collision_suffix_sequence() {
        let mut posts = vec![post("other", "Other")];
        let mut slugs = Vec::new();
        for _ in 0..4 {
            posts = save(&draft("Same Title"), &posts);
            slugs.push(posts[0].slug.clone());
        }
        assert_eq!(
            slugs,
            vec!["same-title", "same-title-1", "same-title-2", "same-title-3"]
        );
        assert_eq!(posts.len(), 5);
    }

    #[test]
    fn test_empty_slug_still_unique() {
        let mut posts = Vec::new();
        posts = save(&draft("わびさび"), &posts);
        posts = save(&draft("静寂"), &posts);
        posts = save(&draft("!!!"), &posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["-2", "-1", ""]);
    }

    #[test]
    fn test_edit_preserves_order_and_length() {
        let existing = vec![post("a", "A"), post("b", "B"), post("c", "C")];
        let mut edited = post("b", "B2");
        edited.content = "new body".to_string();

        let posts = save(&edited, &existing);
        assert_eq!(posts.len(), 3);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
        assert_eq!(posts[1].title, "B2");
        assert_eq!(posts[1].content, "new body");
        assert_eq!(posts[0], existing[0]);
        assert_eq!(posts[2], existing[2]);
    }

    #[test]
    fn test_edit_unknown_slug() {
        let existing = vec![post("a", "A")];
        let ghost = post("ghost", "Ghost");
        assert_eq!(save(&ghost, &existing), existing);
        assert_eq!(
            try_save(&ghost, &existing),
            Err(ReconcileError::NotFound("ghost".to_string()))
        );
    }

    #[test]
    fn test_save_does_not_mutate_input() {
        let existing = vec![post("a", "A")];
        let before = existing.clone();
        let d = draft("A");
        let _ = save(&d, &existing);
        assert_eq!(existing, before);
        assert!(is_placeholder(&d.slug));
    }
}
