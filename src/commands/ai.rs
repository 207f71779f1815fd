//! Drafting assistant commands

use anyhow::Result;
use chrono::Local;

use crate::ai::{DraftingService, DRAFT_FAILED_MESSAGE, IDEAS_FAILED_MESSAGE};
use crate::content::MarkdownRenderer;
use crate::editor::EditForm;
use crate::Wabisabi;

/// Print topic suggestions
pub async fn ideas(service: &dyn DraftingService) -> Result<Vec<String>> {
    let topics = service.suggest_topics().await;
    if topics.is_empty() {
        println!("{}", IDEAS_FAILED_MESSAGE);
    } else {
        for (i, topic) in topics.iter().enumerate() {
            println!("{:>2}. {}", i + 1, topic);
        }
    }
    Ok(topics)
}

/// Draft a post on `topic`. The draft is printed, and saved as a new post
/// when `save` is set. Returns the saved slug.
pub async fn draft(
    app: &Wabisabi,
    service: &dyn DraftingService,
    topic: &str,
    save: bool,
) -> Result<Option<String>> {
    let Some(generated) = service.draft_post(topic).await else {
        println!("{}", DRAFT_FAILED_MESSAGE);
        return Ok(None);
    };

    let mut session = app.session();
    session.set_edit_mode(true);
    session.open_ai_panel()?;
    let post = session.apply_ai_draft(generated, Local::now());

    println!("# {}\n", post.title);
    if !post.excerpt.is_empty() {
        println!("{}\n", post.excerpt);
    }
    println!("{}", post.content);

    if !save {
        return Ok(None);
    }

    let mut form = EditForm::from_post(post);
    if form.excerpt.trim().is_empty() {
        form.excerpt = MarkdownRenderer::excerpt_text(&form.content, app.config.excerpt_length);
    }
    session.update_draft(&form)?;
    let slug = session.save_draft()?;
    println!("Created: {}", slug);
    Ok(Some(slug))
}

/// Reformat the content of post `slug` as markdown and save it
pub async fn format(app: &Wabisabi, service: &dyn DraftingService, slug: &str) -> Result<()> {
    let mut session = app.session();
    session.set_edit_mode(true);
    session.begin_edit(slug)?;
    session.reformat_draft(service).await?;
    let saved = session.save_draft()?;
    println!("Formatted: {}", saved);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DraftedPost;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct Canned {
        draft: Option<DraftedPost>,
    }

    #[async_trait]
    impl DraftingService for Canned {
        async fn suggest_topics(&self) -> Vec<String> {
            Vec::new()
        }

        async fn draft_post(&self, _topic: &str) -> Option<DraftedPost> {
            self.draft.clone()
        }

        async fn reformat_markdown(&self, text: &str) -> String {
            format!("## 整形済み\n\n{}", text)
        }
    }

    fn drafted() -> DraftedPost {
        DraftedPost {
            title: Some("Waiting Well".to_string()),
            excerpt: None,
            content: Some("**待つ**ことも取引です。".to_string()),
            tags: Some(vec!["思考法".to_string()]),
        }
    }

    #[tokio::test]
    async fn test_ideas_empty() {
        let service = Canned { draft: None };
        assert!(ideas(&service).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_draft_failure_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        let service = Canned { draft: None };
        assert_eq!(draft(&app, &service, "忍耐", true).await.unwrap(), None);
        assert_eq!(app.session().posts().len(), 3);
    }

    #[tokio::test]
    async fn test_draft_and_save() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        let service = Canned {
            draft: Some(drafted()),
        };

        let slug = draft(&app, &service, "忍耐", true).await.unwrap();
        assert_eq!(slug.as_deref(), Some("waiting-well"));

        let session = app.session();
        let post = &session.posts()[0];
        assert_eq!(post.slug, "waiting-well");
        assert_eq!(post.tags, vec!["思考法"]);
        assert!(!post.excerpt.is_empty());
    }

    #[tokio::test]
    async fn test_draft_without_save() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        let service = Canned {
            draft: Some(drafted()),
        };
        assert_eq!(draft(&app, &service, "忍耐", false).await.unwrap(), None);
        assert_eq!(app.session().posts().len(), 3);
    }

    #[tokio::test]
    async fn test_format_post() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        let service = Canned { draft: None };

        format(&app, &service, "silence-on-the-chart").await.unwrap();
        let session = app.session();
        let post = session.find("silence-on-the-chart").unwrap();
        assert!(post.content.starts_with("## 整形済み"));
        assert!(format(&app, &service, "missing").await.is_err());
    }
}
