//! Drafting service - topic ideas, full drafts and markdown cleanup from a
//! generative text API
//!
//! Every call is a single request with no retry. Failures never reach the
//! caller as errors: they are logged and turned into an empty result
//! (no topics, no draft, or the input text returned unchanged).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::GeminiConfig;
use crate::content::DraftedPost;

/// Shown to the user when topic suggestions fail
pub const IDEAS_FAILED_MESSAGE: &str =
    "記事のアイデアを取得できませんでした。時間をおいて再度お試しください。";

/// Shown to the user when a draft could not be generated
pub const DRAFT_FAILED_MESSAGE: &str =
    "記事の生成に失敗しました。時間をおいて再度お試しください。";

const IDEAS_PROMPT: &str = "あなたは「わびさびトレード塾」の講師、クリプトモネダスです。\
ノイズを削ぎ落とし、チャートの本質と向き合うミニマルなトレード手法を教えています。\
受講生や見込み客に向けたブログ記事のタイトル案を5つ挙げてください。\
思考法、トレード心理、独自理論、相場分析など、読みたくなる切り口でお願いします。";

const FORMAT_PROMPT: &str = "次の文章を、ブログ記事として読みやすいMarkdownに整えてください。\
見出し(##)、太字(**text**)、イタリック(*text*)、箇条書き(- item)を適切に使ってください。\
内容や言い回しは変えず、構造と装飾だけを加えてください。\
整形後のMarkdownのみを出力してください。";

/// Drafting service errors
#[derive(Error, Debug)]
pub enum DraftError {
    #[error("API key not set (expected in ${0})")]
    MissingApiKey(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Service returned no text")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Generative drafting operations used by the editor
#[async_trait]
pub trait DraftingService: Send + Sync {
    /// Suggested post titles, empty on failure
    async fn suggest_topics(&self) -> Vec<String>;

    /// A full draft for `topic`, `None` on failure
    async fn draft_post(&self, topic: &str) -> Option<DraftedPost>;

    /// `text` restructured as markdown, or `text` itself on failure
    async fn reformat_markdown(&self, text: &str) -> String;
}

/// Client for the Gemini `generateContent` API
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    /// Create a client with an explicit API key
    pub fn new(endpoint: &str, model: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from config, reading the key from the configured
    /// environment variable
    pub fn from_config(config: &GeminiConfig) -> Result<Self, DraftError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DraftError::MissingApiKey(config.api_key_env.clone()))?;
        Ok(Self::new(&config.endpoint, &config.model, &api_key))
    }

    fn url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }

    /// Send one prompt and return the concatenated text of the first candidate
    async fn generate(&self, prompt: &str, schema: Option<Value>) -> Result<String, DraftError> {
        let body = request_body(prompt, schema);
        tracing::debug!("Requesting {}", self.url());

        let response = self
            .client
            .post(self.url())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DraftError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.text().ok_or(DraftError::EmptyResponse)
    }

    async fn try_suggest_topics(&self) -> Result<Vec<String>, DraftError> {
        let text = self.generate(IDEAS_PROMPT, Some(ideas_schema())).await?;
        parse_ideas(&text)
    }

    async fn try_draft_post(&self, topic: &str) -> Result<DraftedPost, DraftError> {
        let text = self
            .generate(&draft_prompt(topic), Some(draft_schema()))
            .await?;
        parse_draft(&text)
    }
}

#[async_trait]
impl DraftingService for GeminiClient {
    async fn suggest_topics(&self) -> Vec<String> {
        match self.try_suggest_topics().await {
            Ok(ideas) => ideas,
            Err(e) => {
                tracing::error!("Failed to generate post ideas: {}", e);
                Vec::new()
            }
        }
    }

    async fn draft_post(&self, topic: &str) -> Option<DraftedPost> {
        match self.try_draft_post(topic).await {
            Ok(draft) => Some(draft),
            Err(e) => {
                tracing::error!("Failed to generate post for '{}': {}", topic, e);
                None
            }
        }
    }

    async fn reformat_markdown(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        let prompt = format!("{}\n\n---\n{}\n---", FORMAT_PROMPT, text);
        match self.generate(&prompt, None).await {
            Ok(formatted) => formatted,
            Err(e) => {
                tracing::error!("Failed to format text as markdown: {}", e);
                text.to_string()
            }
        }
    }
}

fn draft_prompt(topic: &str) -> String {
    format!(
        "あなたは「わびさびトレード塾」の講師、クリプトモネダスです。\
次のタイトルでブログ記事を書いてください。\n\n\
タイトル: \"{}\"\n\n\
- 読者は個人トレーダーです。専門用語に頼らず、本質的で示唆のある内容にしてください。\n\
- ミニマリズム、静けさ、本質主義という「わびさびトレード」の考え方を文体に反映してください。\n\
- 本文(content)は段落ごとに空行(\\n\\n)で区切り、500文字以上で書いてください。\n\
- excerptは記事一覧に表示する100文字程度の要約です。\n\
- tagsは内容を表すキーワードを3〜4個選んでください。",
        topic
    )
}

fn request_body(prompt: &str, schema: Option<Value>) -> Value {
    let mut body = json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
    });
    if let Some(schema) = schema {
        body["generationConfig"] = json!({
            "responseMimeType": "application/json",
            "responseSchema": schema,
        });
    }
    body
}

fn ideas_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "ideas": {
                "type": "ARRAY",
                "items": { "type": "STRING", "description": "ブログ記事のタイトル案" }
            }
        }
    })
}

fn draft_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "title": { "type": "STRING" },
            "excerpt": { "type": "STRING" },
            "content": { "type": "STRING" },
            "tags": { "type": "ARRAY", "items": { "type": "STRING" } }
        },
        "required": ["title", "excerpt", "content", "tags"]
    })
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[derive(Debug, Deserialize)]
struct Ideas {
    #[serde(default)]
    ideas: Vec<String>,
}

/// Drop a surrounding ```json fence if the model added one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn parse_ideas(text: &str) -> Result<Vec<String>, DraftError> {
    let ideas: Ideas = serde_json::from_str(strip_code_fence(text))?;
    Ok(ideas
        .ideas
        .into_iter()
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .collect())
}

fn parse_draft(text: &str) -> Result<DraftedPost, DraftError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}
