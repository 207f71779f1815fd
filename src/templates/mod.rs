//! Built-in site templates using the Tera template engine
//!
//! The templates are embedded in the binary; there is no theme directory.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::{FaqConfig, HeroConfig, PlanConfig, ScheduleConfig, TestimonialConfig};

const LAYOUT: &str = r#"<!DOCTYPE html>
<html lang="{{ config.language }}">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{% block title %}{{ config.title }}{% endblock title %}</title>
<meta name="description" content="{% block description %}{{ config.description }}{% endblock description %}">
<link rel="stylesheet" href="{{ config.root | safe }}css/style.css">
</head>
<body>
<header class="site-header">
  <a class="brand" href="{{ config.root | safe }}">{{ config.title }}</a>
  <nav><a href="{{ config.root | safe }}">ホーム</a> <a href="{{ config.root | safe }}blog/">ブログ</a></nav>
</header>
<main>
{% block content %}{% endblock content %}
</main>
<footer class="site-footer">&copy; {{ current_year }} {{ config.author }}</footer>
</body>
</html>
"#;

const POST_CARD: &str = r#"<article class="post-card">
  <a href="{{ post.path | safe }}"><img src="{{ post.image_url }}" alt="{{ post.title }}"></a>
  <p class="post-date">{{ post.date }}</p>
  <h3><a href="{{ post.path | safe }}">{{ post.title }}</a></h3>
  <p class="post-excerpt">{{ post.excerpt | truncate_chars(length=120) }}</p>
  <ul class="tags">{% for tag in post.tags %}<li>{{ tag }}</li>{% endfor %}</ul>
  <a class="read-more" href="{{ post.path | safe }}">続きを読む &rarr;</a>
</article>
"#;

const HOME: &str = r#"{% extends "layout.html" %}
{% block content %}
<section class="hero">
  <h1>{{ hero.headline }}</h1>
  <p>{{ hero.tagline }}</p>
  {% if hero.notice %}<p class="notice">{{ hero.notice }}</p>{% endif %}
</section>
{% if pricing %}
<section class="pricing">
  <h2>コースと料金</h2>
  {% for plan in pricing %}
  <div class="plan{% if plan.highlighted %} highlighted{% endif %}">
    <h3>{{ plan.name }}</h3>
    {% if plan.location %}<p class="location">{{ plan.location }}</p>{% endif %}
    <p>{{ plan.summary }}</p>
    <p class="price">{{ plan.price }}</p>
    <ul>{% for feature in plan.features %}<li>{{ feature }}</li>{% endfor %}</ul>
  </div>
  {% endfor %}
</section>
{% endif %}
{% if schedule %}
<section class="schedule">
  <h2>開催日程</h2>
  {% for run in schedule %}
  <div class="run">
    <h3>{{ run.location }}</h3>
    <dl>{% for d in run.dates %}<dt>{{ d.label }}</dt><dd>{{ d.date }}</dd>{% endfor %}</dl>
  </div>
  {% endfor %}
</section>
{% endif %}
{% if testimonials %}
<section class="testimonials">
  <h2>受講生の声</h2>
  {% for t in testimonials %}
  <blockquote><p>{{ t.quote }}</p><cite>{{ t.name }} / {{ t.role }}</cite></blockquote>
  {% endfor %}
</section>
{% endif %}
<section class="blog-preview">
  <h2>最新のブログ記事</h2>
  {% for post in posts %}{% include "partials/post_card.html" %}{% endfor %}
  <a class="view-all" href="{{ config.root | safe }}blog/">すべての記事を見る</a>
</section>
{% if faq %}
<section class="faq">
  <h2>よくあるご質問</h2>
  {% for item in faq %}
  <details><summary>{{ item.question }}</summary><p>{{ item.answer }}</p></details>
  {% endfor %}
</section>
{% endif %}
{% endblock content %}
"#;

const BLOG_INDEX: &str = r#"{% extends "layout.html" %}
{% block title %}ブログ | {{ config.title }}{% endblock title %}
{% block content %}
<section class="blog-index">
  <h1>ブログ</h1>
  {% if posts %}
  {% for post in posts %}{% include "partials/post_card.html" %}{% endfor %}
  {% else %}
  <p>まだ記事がありません。</p>
  {% endif %}
</section>
{% endblock content %}
"#;

const POST: &str = r#"{% extends "layout.html" %}
{% block title %}{{ post.title }} | {{ config.title }}{% endblock title %}
{% block description %}{{ post.content | strip_html | truncate_chars(length=160) }}{% endblock description %}
{% block content %}
<article class="post">
  <a class="back" href="{{ config.root | safe }}blog/">&larr; 記事一覧に戻る</a>
  <h1>{{ post.title }}</h1>
  <p class="meta">{% if post.author %}<span class="author">{{ post.author }}</span> {% endif %}<time datetime="{{ post.date }}">{{ post.date }}</time></p>
  <img class="cover" src="{{ post.image_url }}" alt="{{ post.title }}">
  <div class="post-body">{{ post.content | safe }}</div>
  <ul class="tags">{% for tag in post.tags %}<li>{{ tag }}</li>{% endfor %}</ul>
  <nav class="post-nav">
    {% if prev %}<a class="prev" href="{{ prev.path | safe }}">&larr; {{ prev.title }}</a>{% endif %}
    {% if next %}<a class="next" href="{{ next.path | safe }}">{{ next.title }} &rarr;</a>{% endif %}
  </nav>
</article>
{% endblock content %}
"#;

/// Stylesheet written next to the generated pages
pub const STYLESHEET: &str = r#"body{margin:0;background:#09090b;color:#d4d4d8;font-family:"Hiragino Sans","Noto Sans JP",sans-serif;line-height:1.8}
a{color:#2dd4bf}
main{max-width:64rem;margin:0 auto;padding:2rem 1rem}
.site-header,.site-footer{display:flex;justify-content:space-between;padding:1rem 2rem;border-color:#27272a}
.hero{text-align:center;padding:6rem 0}
.post-card{display:inline-block;vertical-align:top;width:30%;margin:1%;background:#18181b;border-radius:.5rem;overflow:hidden}
.post-card img,.cover{width:100%;object-fit:cover}
.tags li{display:inline-block;margin-right:.5rem;padding:.1rem .6rem;border-radius:1rem;background:#134e4a;list-style:none}
.post-image{display:block;margin:1.5rem auto;width:100%;max-width:42rem;border-radius:.5rem}
.post-image-inline{display:inline-block;margin:1rem 0;border-radius:.5rem}
.plan.highlighted{border:2px solid #14b8a6}
"#;

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", LAYOUT),
            ("home.html", HOME),
            ("blog_index.html", BLOG_INDEX),
            ("post.html", POST),
            ("partials/post_card.html", POST_CARD),
        ])?;

        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 100,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "…".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub image_url: String,
    pub path: String,
    /// Rendered HTML body
    pub content: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub root: String,
}

/// Marketing sections shown on the home page
#[derive(Debug, Clone, Serialize)]
pub struct SectionsData {
    pub hero: HeroConfig,
    pub pricing: Vec<PlanConfig>,
    pub schedule: Vec<ScheduleConfig>,
    pub testimonials: Vec<TestimonialConfig>,
    pub faq: Vec<FaqConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_templates_parse() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_strip_html_filter() {
        let out = strip_html_filter(&json!("<p>a <b>b</b></p>"), &HashMap::new()).unwrap();
        assert_eq!(out, json!("a b"));
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), json!(3));
        let out = truncate_chars_filter(&json!("わびさびトレード"), &args).unwrap();
        assert_eq!(out, json!("わびさ…"));
        let short = truncate_chars_filter(&json!("短い"), &args).unwrap();
        assert_eq!(short, json!("短い"));
    }

    #[test]
    fn test_post_is_escaped_but_body_is_not() {
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = Context::new();
        context.insert(
            "config",
            &ConfigData {
                title: "Site".to_string(),
                subtitle: String::new(),
                description: String::new(),
                author: "me".to_string(),
                language: "ja".to_string(),
                url: "http://example.com".to_string(),
                root: "/".to_string(),
            },
        );
        context.insert("current_year", "2024");
        context.insert(
            "post",
            &PostData {
                slug: "a".to_string(),
                title: "<b>T</b>".to_string(),
                excerpt: String::new(),
                date: "2024年6月1日".to_string(),
                author: None,
                tags: vec!["x".to_string()],
                image_url: "u.png".to_string(),
                path: "/blog/a/".to_string(),
                content: "<h1>Body</h1>".to_string(),
            },
        );
        context.insert("prev", &None::<NavPost>);
        context.insert("next", &None::<NavPost>);

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("<div class=\"post-body\"><h1>Body</h1></div>"));
        assert!(html.contains("&lt;b&gt;T&lt;&#x2F;b&gt;"));
        assert!(html.contains("<li>x</li>"));
    }
}
