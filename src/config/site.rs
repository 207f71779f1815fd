//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub public_dir: String,
    pub store_dir: String,
    pub storage_key: String,

    // Blog
    /// Number of posts shown on the home page
    pub preview_count: usize,
    /// Characters kept when an excerpt is derived from the body
    pub excerpt_length: usize,

    // Writing
    pub default_author: String,
    /// chrono format for the display date of new posts
    pub date_format: String,
    /// Cover image for new posts, `{seed}` is replaced per post
    pub image_placeholder: String,
    pub untitled_title: String,

    // Marketing sections
    #[serde(default)]
    pub hero: HeroConfig,
    #[serde(default)]
    pub pricing: Vec<PlanConfig>,
    #[serde(default)]
    pub schedule: Vec<ScheduleConfig>,
    #[serde(default)]
    pub testimonials: Vec<TestimonialConfig>,
    #[serde(default)]
    pub faq: Vec<FaqConfig>,

    // Drafting service
    #[serde(default)]
    pub gemini: GeminiConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "わびさびトレード塾".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: "クリプトモネダス".to_string(),
            language: "ja".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            public_dir: "public".to_string(),
            store_dir: "store".to_string(),
            storage_key: crate::storage::DEFAULT_KEY.to_string(),

            preview_count: 3,
            excerpt_length: 100,

            default_author: "クリプトモネダス".to_string(),
            date_format: "%Y年%-m月%-d日".to_string(),
            image_placeholder: "https://picsum.photos/seed/{seed}/600/400".to_string(),
            untitled_title: "無題の記事".to_string(),

            hero: HeroConfig::default(),
            pricing: Vec::new(),
            schedule: Vec::new(),
            testimonials: Vec::new(),
            faq: Vec::new(),

            gemini: GeminiConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Cover image URL for a new post
    pub fn placeholder_image(&self, seed: &str) -> String {
        self.image_placeholder.replace("{seed}", seed)
    }
}

/// Hero section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    pub headline: String,
    pub tagline: String,
    pub notice: String,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            headline: "チャートの静寂".to_string(),
            tagline: "ノイズを排し、本質と向き合うトレードを。".to_string(),
            notice: String::new(),
        }
    }
}

/// A course plan in the pricing section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanConfig {
    pub name: String,
    pub location: String,
    pub summary: String,
    pub price: String,
    pub features: Vec<String>,
    pub highlighted: bool,
}

/// A course run in the schedule section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub location: String,
    pub dates: Vec<ScheduleDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleDate {
    pub label: String,
    pub date: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TestimonialConfig {
    pub quote: String,
    pub name: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FaqConfig {
    pub question: String,
    pub answer: String,
}

/// Gemini drafting service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub endpoint: String,
    pub model: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
        }
    }
}
