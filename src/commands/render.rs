//! Print the rendered body of one post

use anyhow::Result;

use crate::content::MarkdownRenderer;
use crate::Wabisabi;

/// Rendered HTML body of the post `slug`
pub fn render_post(app: &Wabisabi, slug: &str) -> Result<String> {
    let session = app.session();
    let post = session
        .find(slug)
        .ok_or_else(|| anyhow::anyhow!("No post with slug '{}'", slug))?;
    Ok(MarkdownRenderer::new().render(&post.content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_post() {
        let dir = TempDir::new().unwrap();
        let app = Wabisabi::new(dir.path()).unwrap();
        let html = render_post(&app, "ema-as-a-compass").unwrap();
        assert!(html.starts_with("<h1>方向を知る</h1>"));
        assert!(render_post(&app, "missing").is_err());
    }
}
