//! Create a new post

use anyhow::Result;
use chrono::Local;

use super::PostFields;
use crate::content::MarkdownRenderer;
use crate::editor::EditForm;
use crate::Wabisabi;

/// Create a post from the given fields and return its slug.
///
/// When no excerpt is given one is derived from the content.
pub fn create_post(app: &Wabisabi, fields: &PostFields) -> Result<String> {
    let mut session = app.session();
    session.set_edit_mode(true);

    let mut form = EditForm::from_post(session.initiate_new_post(Local::now())?);
    fields.apply(&mut form);
    if form.excerpt.trim().is_empty() {
        form.excerpt = MarkdownRenderer::excerpt_text(&form.content, app.config.excerpt_length);
    }

    session.update_draft(&form)?;
    let slug = session.save_draft()?;

    println!("Created: {}", slug);
    Ok(slug)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fields(title: &str) -> PostFields {
        PostFields {
            title: Some(title.to_string()),
            content: Some("**Body** text".to_string()),
            tags: Some("a, b".to_string()),
            ..PostFields::default()
        }
    }

    #[test]
    fn test_create_post_twice() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();

        assert_eq!(create_post(&app, &fields("Quiet Charts")).unwrap(), "quiet-charts");
        assert_eq!(
            create_post(&app, &fields("Quiet Charts")).unwrap(),
            "quiet-charts-1"
        );

        let posts = app.session().posts().to_vec();
        assert_eq!(posts[0].slug, "quiet-charts-1");
        assert_eq!(posts[1].slug, "quiet-charts");
        assert_eq!(posts[1].excerpt, "Body text");
        assert_eq!(posts[1].tags, vec!["a", "b"]);
        // seed posts come after the new ones
        assert_eq!(posts.len(), 5);
    }

    #[test]
    fn test_create_post_requires_content() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        let only_title = PostFields {
            title: Some("T".to_string()),
            ..PostFields::default()
        };
        assert!(create_post(&app, &only_title).is_err());
    }
}
