//! Markdown rendering for the post body dialect
//!
//! Only a small subset of Markdown is understood: `#`/`##` headings,
//! `-`/`*` bullet lists, `**bold**`/`__bold__`, `*italic*`/`_italic_`,
//! images (standalone on a line or inline in a paragraph), paragraphs and
//! hard line breaks. Everything else is rendered as escaped text, so the
//! renderer never fails and only ever emits the tags listed here.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref STANDALONE_IMAGE: Regex = Regex::new(r"^!\[(.*?)\]\((.*?)\)$").unwrap();
    static ref INLINE_IMAGE: Regex = Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap();
    static ref BOLD_STARS: Regex = Regex::new(r"\*\*(.*?)\*\*").unwrap();
    static ref BOLD_UNDERSCORES: Regex = Regex::new(r"__(.*?)__").unwrap();
    static ref ITALIC_STAR: Regex = Regex::new(r"\*(.*?)\*").unwrap();
    static ref ITALIC_UNDERSCORE: Regex = Regex::new(r"_(.*?)_").unwrap();
    static ref LIST_MARKER: Regex = Regex::new(r"^[-*]\s*").unwrap();
    static ref MARKUP_CHARS: Regex = Regex::new(r"(?m)^(#{1,2} |[-*]\s+)|\*\*|__|[*_]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

/// A classified block of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
enum Block<'a> {
    /// An image that stood alone on its line
    Image { alt: &'a str, src: &'a str },
    Heading { level: u8, text: &'a str },
    List(Vec<&'a str>),
    Paragraph(&'a str),
}

/// Markdown renderer for post bodies
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    image_class: String,
    inline_image_class: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("post-image", "post-image-inline")
    }

    /// Create with custom CSS classes for standalone and inline images
    pub fn with_options(image_class: &str, inline_image_class: &str) -> Self {
        Self {
            image_class: image_class.to_string(),
            inline_image_class: inline_image_class.to_string(),
        }
    }

    /// Render markdown to an HTML fragment
    pub fn render(&self, markdown: &str) -> String {
        let mut html = String::with_capacity(markdown.len() + markdown.len() / 2);

        for chunk in markdown.split("\n\n") {
            if chunk.trim().is_empty() {
                continue;
            }
            for block in split_blocks(chunk) {
                self.render_block(&block, &mut html);
            }
        }

        html
    }

    fn render_block(&self, block: &Block<'_>, out: &mut String) {
        match block {
            Block::Image { alt, src } => {
                out.push_str("<p>");
                out.push_str(&self.image_tag(src, alt, &self.image_class));
                out.push_str("</p>");
            }
            Block::Heading { level, text } => {
                out.push_str(&format!("<h{level}>{}</h{level}>", html_escape(text)));
            }
            Block::List(items) => {
                out.push_str("<ul>");
                for item in items {
                    let text = LIST_MARKER.replace(item, "");
                    out.push_str("<li>");
                    out.push_str(&emphasis(&html_escape(&text)));
                    out.push_str("</li>");
                }
                out.push_str("</ul>");
            }
            Block::Paragraph(text) => {
                out.push_str("<p>");
                out.push_str(&self.render_inline(text));
                out.push_str("</p>");
            }
        }
    }

    /// Inline pass for paragraphs: images first, then emphasis over the
    /// whole paragraph, then hard line breaks.
    ///
    /// Images are parked in `<img:N>` slots while emphasis runs. Escaped
    /// text never contains `<`, so a slot cannot be forged, and image URLs
    /// never see the emphasis rules.
    fn render_inline(&self, text: &str) -> String {
        let mut escaped = String::with_capacity(text.len());
        let mut images = Vec::new();
        let mut last = 0;

        for caps in INLINE_IMAGE.captures_iter(text) {
            let Some(whole) = caps.get(0) else { continue };
            escaped.push_str(&html_escape(&text[last..whole.start()]));
            escaped.push_str(&format!("<img:{}>", images.len()));
            let alt = caps.get(1).map_or("", |m| m.as_str());
            let src = caps.get(2).map_or("", |m| m.as_str());
            images.push(self.image_tag(src, alt, &self.inline_image_class));
            last = whole.end();
        }
        escaped.push_str(&html_escape(&text[last..]));

        let mut out = emphasis(&escaped).replace('\n', "<br />");
        for (i, tag) in images.iter().enumerate() {
            out = out.replacen(&format!("<img:{}>", i), tag, 1);
        }
        out
    }

    fn image_tag(&self, src: &str, alt: &str, class: &str) -> String {
        format!(
            r#"<img src="{}" alt="{}" class="{}" />"#,
            html_escape(src),
            html_escape(alt),
            class
        )
    }

    /// Plain-text summary of a markdown body, at most `length` characters
    pub fn excerpt_text(markdown: &str, length: usize) -> String {
        let without_images = INLINE_IMAGE.replace_all(markdown, "");
        let without_markup = MARKUP_CHARS.replace_all(&without_images, "");
        let collapsed = WHITESPACE.replace_all(without_markup.trim(), " ");

        if collapsed.chars().count() <= length {
            collapsed.into_owned()
        } else {
            let truncated: String = collapsed.chars().take(length).collect();
            format!("{}…", truncated.trim_end())
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Render markdown with the default image classes
pub fn render(markdown: &str) -> String {
    MarkdownRenderer::new().render(markdown)
}

/// Split a blank-line separated chunk into blocks. Lines holding nothing
/// but an image become their own block, so they never end up inside a
/// heading, list or paragraph.
fn split_blocks(chunk: &str) -> Vec<Block<'_>> {
    let mut blocks = Vec::new();
    let mut run_start: Option<usize> = None;
    let mut offset = 0;

    for line in chunk.split('\n') {
        if let Some(caps) = STANDALONE_IMAGE.captures(line.trim()) {
            if let Some(start) = run_start.take() {
                push_text_block(&chunk[start..offset - 1], &mut blocks);
            }
            blocks.push(Block::Image {
                alt: caps.get(1).map_or("", |m| m.as_str()),
                src: caps.get(2).map_or("", |m| m.as_str()),
            });
        } else if run_start.is_none() {
            run_start = Some(offset);
        }
        offset += line.len() + 1;
    }

    if let Some(start) = run_start {
        push_text_block(&chunk[start..], &mut blocks);
    }

    blocks
}

fn push_text_block<'a>(text: &'a str, blocks: &mut Vec<Block<'a>>) {
    if text.trim().is_empty() {
        return;
    }

    let block = if let Some(rest) = text.strip_prefix("## ") {
        Block::Heading {
            level: 2,
            text: rest,
        }
    } else if let Some(rest) = text.strip_prefix("# ") {
        Block::Heading {
            level: 1,
            text: rest,
        }
    } else if text.starts_with("* ") || text.starts_with("- ") {
        Block::List(
            text.split('\n')
                .filter(|line| !line.trim().is_empty())
                .collect(),
        )
    } else {
        Block::Paragraph(text)
    };

    blocks.push(block);
}

/// Bold before italic, so `**x**` is never eaten by the single-star rule
fn emphasis(text: &str) -> String {
    let text = BOLD_STARS.replace_all(text, "<strong>${1}</strong>");
    let text = BOLD_UNDERSCORES.replace_all(&text, "<strong>${1}</strong>");
    let text = ITALIC_STAR.replace_all(&text, "<em>${1}</em>");
    let text = ITALIC_UNDERSCORE.replace_all(&text, "<em>${1}</em>");
    text.into_owned()
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
