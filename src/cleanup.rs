//! Chat completion call that rewrites scraped text into `TIME|EVENT` lines.

use crate::error::{ApiError, Error, Result};
use crate::timestamp::parse_timeline_line;
use serde::{Deserialize, Serialize};

pub const MODEL: &str = "gpt-4o-mini";
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const API_BASE_VAR: &str = "TMINUS_API_BASE";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const SYSTEM_PROMPT: &str = "You reformat rocket launch timelines. \
Output one line per event and nothing else, in the form TIME|EVENT. \
TIME is the offset from liftoff as HH:MM:SS, prefixed with '-' for events \
before liftoff. EVENT is the event description on a single line. \
Do not add commentary, headers, numbering or code fences.";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct CleanupClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
}

impl CleanupClient {
    pub fn new(api_base: &str, api_key: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("tminus/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Client for `api_base` authenticated with the key in `OPENAI_API_KEY`.
    pub fn from_env(api_base: &str) -> Result<Self, ApiError> {
        let key = std::env::var(API_KEY_VAR)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ApiError::MissingKey(API_KEY_VAR))?;
        Self::new(api_base, key.trim())
    }

    /// Raw model answer for `text`.
    pub async fn complete(&self, text: &str) -> Result<String> {
        let request = ChatRequest {
            model: MODEL,
            temperature: 0.0,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
        };

        let url = format!("{}/chat/completions", self.api_base);
        debug!("posting {} bytes to {url}", text.len());
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body }.into());
        }

        let body = response.text().await.map_err(ApiError::from)?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Malformed(format!("response is not a chat completion: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .ok_or_else(|| Error::Malformed("response has no message content".into()))
    }

    /// Ask the model for the timeline and keep only the lines that parse.
    pub async fn clean_timeline(&self, text: &str) -> Result<Vec<String>> {
        let content = self.complete(text).await?;
        normalize(&content)
    }
}

/// Strip code fences and chatter, keeping the `TIME|EVENT` lines.
pub fn normalize(content: &str) -> Result<Vec<String>> {
    let lines: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with("```"))
        .filter(|l| {
            let ok = parse_timeline_line(l).is_some();
            if !ok {
                debug!("dropping model line {l:?}");
            }
            ok
        })
        .map(str::to_string)
        .collect();

    if lines.is_empty() {
        return Err(Error::Malformed(
            "no TIME|EVENT lines in the model answer".into(),
        ));
    }
    Ok(lines)
}
