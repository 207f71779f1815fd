//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::Wabisabi;

/// List posts or tags
pub fn run(app: &Wabisabi, content_type: &str) -> Result<()> {
    let session = app.session();
    let posts = session.posts();

    match content_type {
        "post" | "posts" => {
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!("  {} - {} [{}]", post.date, post.title, post.slug);
            }
        }
        "tag" | "tags" => {
            let mut tags: Vec<_> = tag_counts(posts).into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            println!("Tags ({}):", tags.len());
            for (tag, count) in tags {
                println!("  {} ({})", tag, count);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, tag", content_type);
        }
    }

    Ok(())
}

/// Number of posts per tag; a tag repeated within one post counts once
fn tag_counts(posts: &[crate::content::Post]) -> HashMap<String, usize> {
    let mut tags: HashMap<String, usize> = HashMap::new();
    for post in posts {
        let mut seen = Vec::new();
        for tag in &post.tags {
            if !seen.contains(&tag) {
                seen.push(tag);
                *tags.entry(tag.clone()).or_insert(0) += 1;
            }
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::seed::seed_posts;

    #[test]
    fn test_tag_counts() {
        let mut posts = seed_posts();
        posts[0].tags.push("思考法".to_string());
        let counts = tag_counts(&posts);
        assert_eq!(counts["思考法"], 2);
        assert_eq!(counts["EMA"], 1);
    }
}
