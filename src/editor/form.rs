//! Post edit form and formatting toolbar

use std::ops::Range;
use thiserror::Error;

use crate::content::Post;

/// Form validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("Field '{0}' is required")]
    Required(&'static str),
}

/// Editable fields of a post, as entered in the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditForm {
    pub title: String,
    pub excerpt: String,
    pub image_url: String,
    /// Comma separated tags
    pub tags_input: String,
    pub content: String,
}

impl EditForm {
    /// Fill the form from a post
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            image_url: post.image_url.clone(),
            tags_input: post.tags.join(", "),
            content: post.content.clone(),
        }
    }

    /// Split the tags field on commas, dropping blank entries
    pub fn parse_tags(input: &str) -> Vec<String> {
        input
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Check the required fields
    pub fn validate(&self) -> Result<(), FormError> {
        let required = [
            ("title", &self.title),
            ("excerpt", &self.excerpt),
            ("image_url", &self.image_url),
            ("content", &self.content),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(FormError::Required(name));
            }
        }
        Ok(())
    }

    /// `post` with the form's fields written over it. Slug, date and
    /// author are kept.
    pub fn apply_to(&self, post: &Post) -> Post {
        Post {
            title: self.title.clone(),
            excerpt: self.excerpt.clone(),
            image_url: self.image_url.clone(),
            tags: Self::parse_tags(&self.tags_input),
            content: self.content.clone(),
            ..post.clone()
        }
    }
}

/// Toolbar actions of the content editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Heading,
    Bold,
    Italic,
    List,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "h2" | "heading" => Ok(Format::Heading),
            "bold" => Ok(Format::Bold),
            "italic" => Ok(Format::Italic),
            "list" => Ok(Format::List),
            _ => Err(format!(
                "Unknown format: {}. Available: h2, bold, italic, list",
                s
            )),
        }
    }
}

/// Apply a toolbar action to the selected part of `text`.
///
/// `selection` is in characters and is clamped to the text. Returns the
/// new text and the selection to show afterwards: the wrapped text when
/// something was selected, otherwise a caret after the inserted marker.
/// For lists the whole rewritten block is selected.
pub fn apply_format(text: &str, selection: Range<usize>, format: Format) -> (String, Range<usize>) {
    let len = text.chars().count();
    let (mut start, mut end) = (selection.start.min(len), selection.end.min(len));
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }

    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);
    let selected = &text[start_byte..end_byte];

    let (replacement, new_selection) = match format {
        Format::Heading => wrap(selected, start, "## ", ""),
        Format::Bold => wrap(selected, start, "**", "**"),
        Format::Italic => wrap(selected, start, "*", "*"),
        Format::List => {
            let listed = selected
                .split('\n')
                .map(|line| {
                    if line.trim().is_empty() {
                        String::new()
                    } else {
                        format!("- {}", line)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            let listed_len = listed.chars().count();
            (listed, start..start + listed_len)
        }
    };

    let mut result = String::with_capacity(text.len() + replacement.len());
    result.push_str(&text[..start_byte]);
    result.push_str(&replacement);
    result.push_str(&text[end_byte..]);
    (result, new_selection)
}

fn wrap(selected: &str, start: usize, prefix: &str, suffix: &str) -> (String, Range<usize>) {
    let inner_start = start + prefix.chars().count();
    let selected_len = selected.chars().count();
    (
        format!("{}{}{}", prefix, selected, suffix),
        inner_start..inner_start + selected_len,
    )
}

fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map_or(text.len(), |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            slug: "a".to_string(),
            title: "A".to_string(),
            excerpt: "e".to_string(),
            date: "2024年6月1日".to_string(),
            author: Some("x".to_string()),
            tags: vec!["one".to_string(), "two".to_string()],
            image_url: "https://example.com/a.png".to_string(),
            content: "body".to_string(),
        }
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            EditForm::parse_tags(" 思考法 , テクニカル分析,, ,EMA "),
            vec!["思考法", "テクニカル分析", "EMA"]
        );
        assert!(EditForm::parse_tags("").is_empty());
    }

    #[test]
    fn test_form_round_trip_keeps_identity() {
        let post = sample();
        let mut form = EditForm::from_post(&post);
        assert_eq!(form.tags_input, "one, two");

        form.title = "B".to_string();
        form.tags_input = "x, x".to_string();
        let updated = form.apply_to(&post);
        assert_eq!(updated.slug, "a");
        assert_eq!(updated.date, post.date);
        assert_eq!(updated.author, post.author);
        assert_eq!(updated.title, "B");
        assert_eq!(updated.tags, vec!["x", "x"]);
    }

    #[test]
    fn test_validate() {
        let mut form = EditForm::from_post(&sample());
        assert!(form.validate().is_ok());
        form.excerpt = "  ".to_string();
        assert_eq!(form.validate(), Err(FormError::Required("excerpt")));
    }

    #[test]
    fn test_bold_selection() {
        let (text, sel) = apply_format("make this loud", 10..14, Format::Bold);
        assert_eq!(text, "make this **loud**");
        assert_eq!(sel, 12..16);
    }

    #[test]
    fn test_italic_without_selection_places_caret() {
        let (text, sel) = apply_format("ab", 1..1, Format::Italic);
        assert_eq!(text, "a**b");
        assert_eq!(sel, 2..2);
    }

    #[test]
    fn test_heading_with_multibyte_text() {
        let (text, sel) = apply_format("静寂の手法", 0..2, Format::Heading);
        assert_eq!(text, "## 静寂の手法");
        assert_eq!(sel, 3..5);
    }

    #[test]
    fn test_list_skips_blank_lines() {
        let (text, sel) = apply_format("intro\none\n\ntwo", 6..14, Format::List);
        assert_eq!(text, "intro\n- one\n\n- two");
        assert_eq!(sel, 6..18);
    }

    #[test]
    fn test_selection_is_clamped() {
        let (text, sel) = apply_format("abc", 5..1, Format::Bold);
        assert_eq!(text, "a**bc**");
        assert_eq!(sel, 3..5);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("h2".parse::<Format>(), Ok(Format::Heading));
        assert_eq!("list".parse::<Format>(), Ok(Format::List));
        assert!("quote".parse::<Format>().is_err());
    }
}
