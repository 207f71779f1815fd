//! Generator module - writes the marketing site and blog as static HTML

use anyhow::Result;
use std::fs;
use std::path::Path;

use tera::Context;

use crate::content::{MarkdownRenderer, Post};
use crate::templates::{ConfigData, NavPost, PostData, SectionsData, TemplateRenderer, STYLESHEET};
use crate::Wabisabi;

/// Static site generator using Tera templates
pub struct Generator {
    app: Wabisabi,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(app: &Wabisabi) -> Result<Self> {
        Ok(Self {
            app: app.clone(),
            renderer: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::new(),
        })
    }

    /// Generate the entire site, returning the number of pages written
    pub fn generate(&self, posts: &[Post]) -> Result<usize> {
        fs::create_dir_all(&self.app.public_dir)?;
        write_file(&self.app.public_dir.join("css/style.css"), STYLESHEET)?;

        let publishable: Vec<&Post> = posts
            .iter()
            .filter(|p| {
                let ok = is_safe_segment(&p.slug);
                if !ok {
                    tracing::warn!("Skipping post '{}' with unusable slug {:?}", p.title, p.slug);
                }
                ok
            })
            .collect();

        let post_data: Vec<PostData> = publishable.iter().map(|p| self.post_data(p)).collect();

        let mut written = 0;
        written += self.generate_home(&post_data)?;
        written += self.generate_blog_index(&post_data)?;
        written += self.generate_post_pages(&post_data)?;

        Ok(written)
    }

    /// Build template data for one post
    fn post_data(&self, post: &Post) -> PostData {
        let excerpt = if post.excerpt.trim().is_empty() {
            MarkdownRenderer::excerpt_text(&post.content, self.app.config.excerpt_length)
        } else {
            post.excerpt.clone()
        };

        PostData {
            slug: post.slug.clone(),
            title: post.title.clone(),
            excerpt,
            date: post.date.clone(),
            author: post.author.clone(),
            tags: post.tags.clone(),
            image_url: post.image_url.clone(),
            path: self.post_path(&post.slug),
            content: self.markdown.render(&post.content),
        }
    }

    fn post_path(&self, slug: &str) -> String {
        format!("{}blog/{}/", self.app.config.root, slug)
    }

    /// Build config data for templates
    fn build_config_data(&self) -> ConfigData {
        let config = &self.app.config;
        ConfigData {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
        }
    }

    fn build_sections_data(&self) -> SectionsData {
        let config = &self.app.config;
        SectionsData {
            hero: config.hero.clone(),
            pricing: config.pricing.clone(),
            schedule: config.schedule.clone(),
            testimonials: config.testimonials.clone(),
            faq: config.faq.clone(),
        }
    }

    /// Create a base context with common variables
    fn create_base_context(&self) -> Context {
        let mut context = Context::new();
        context.insert("config", &self.build_config_data());
        context.insert("current_year", &chrono::Local::now().format("%Y").to_string());
        context
    }

    /// Home page: marketing sections plus the latest posts
    fn generate_home(&self, posts: &[PostData]) -> Result<usize> {
        let sections = self.build_sections_data();
        let preview = &posts[..self.app.config.preview_count.min(posts.len())];

        let mut context = self.create_base_context();
        context.insert("hero", &sections.hero);
        context.insert("pricing", &sections.pricing);
        context.insert("schedule", &sections.schedule);
        context.insert("testimonials", &sections.testimonials);
        context.insert("faq", &sections.faq);
        context.insert("posts", preview);

        let html = self.renderer.render("home.html", &context)?;
        write_file(&self.app.public_dir.join("index.html"), &html)?;
        Ok(1)
    }

    /// Blog index listing every post, newest first
    fn generate_blog_index(&self, posts: &[PostData]) -> Result<usize> {
        let mut context = self.create_base_context();
        context.insert("posts", posts);

        let html = self.renderer.render("blog_index.html", &context)?;
        write_file(&self.app.public_dir.join("blog/index.html"), &html)?;
        Ok(1)
    }

    /// One page per post
    fn generate_post_pages(&self, posts: &[PostData]) -> Result<usize> {
        for (i, post) in posts.iter().enumerate() {
            let nav = |p: &PostData| NavPost {
                title: p.title.clone(),
                path: p.path.clone(),
            };
            let prev = i.checked_sub(1).and_then(|j| posts.get(j)).map(nav);
            let next = posts.get(i + 1).map(nav);

            let mut context = self.create_base_context();
            context.insert("post", post);
            context.insert("prev", &prev);
            context.insert("next", &next);

            let html = self.renderer.render("post.html", &context)?;
            let output = self
                .app
                .public_dir
                .join("blog")
                .join(&post.slug)
                .join("index.html");
            write_file(&output, &html)?;
            tracing::debug!("Generated: {:?}", output);
        }
        Ok(posts.len())
    }
}

/// Whether a slug can be used as a directory name under blog/
fn is_safe_segment(slug: &str) -> bool {
    !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
