use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, warn};

use crate::config::GeminiConfig;

/// Longest slice of the notes sent to the model, in characters.
pub const MAX_PROMPT_CHARS: usize = 15_000;

const EMPTY_SUMMARY: &str = "AI was unable to generate a summary.";

#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Raw model output for `text`; may be empty.
    async fn summarize(&self, text: &str) -> anyhow::Result<String>;
}

/// Summarize, folding failures into the text shown to the user.
pub async fn summarize_or_explain(summarizer: &dyn Summarizer, text: &str) -> String {
    match summarizer.summarize(text).await {
        Ok(summary) if summary.trim().is_empty() => EMPTY_SUMMARY.to_string(),
        Ok(summary) => summary,
        Err(e) => {
            warn!(error = %e, "summarization failed");
            format!("Error: {e}")
        }
    }
}

pub fn build_prompt(text: &str) -> String {
    let notes = match text.char_indices().nth(MAX_PROMPT_CHARS) {
        Some((cut, _)) => &text[..cut],
        None => text,
    };
    format!(
        "You are an expert academic assistant. Summarize the following study notes. \
         Use a clear, professional tone. Include a high-level overview and \
         then list key points in bullet points.\n\nNOTES:\n{notes}"
    )
}

/// Google Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiSummarizer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl GeminiSummarizer {
    pub fn new(cfg: &GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!(
                "{}/models/{}:generateContent",
                cfg.endpoint.trim_end_matches('/'),
                cfg.model
            ),
            api_key: cfg.api_key.clone(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    async fn summarize(&self, text: &str) -> anyhow::Result<String> {
        let payload = json!({
            "contents": [{
                "parts": [{ "text": build_prompt(text) }]
            }]
        });

        let resp = self
            .client
            .post(&self.endpoint)
            .query(&[("key", &self.api_key)])
            .json(&payload)
            .timeout(Duration::from_secs(120))
            .send()
            .await
            .context("gemini request")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error {}: {}", status, body);
        }

        let body: serde_json::Value = resp.json().await.context("gemini response body")?;
        let summary = extract_text(&body);
        debug!(chars = summary.len(), "gemini summary received");
        Ok(summary)
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(body: &serde_json::Value) -> String {
    body["candidates"][0]["content"]["parts"]
        .as_array()
        .map(|parts| {
            parts
                .iter()
                .filter_map(|p| p["text"].as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}
