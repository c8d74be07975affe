use std::{path::Path, time::Duration};

use anyhow::Context;
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use tracing::debug;
use uuid::Uuid;

use crate::config::SpeechConfig;

/// The translate TTS endpoint rejects requests longer than this.
pub const MAX_CHUNK_CHARS: usize = 100;

#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// MP3 audio for `text`.
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes>;
}

/// Synthesize `text` into `<dir>/<uuid>.mp3` and return the file name.
pub async fn render_to_file(
    synth: &dyn SpeechSynthesizer,
    dir: &Path,
    text: &str,
) -> anyhow::Result<String> {
    let audio = synth.synthesize(text).await?;
    let filename = format!("{}.mp3", Uuid::new_v4().simple());
    let path = dir.join(&filename);
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("create audio dir {}", dir.display()))?;
    tokio::fs::write(&path, &audio)
        .await
        .with_context(|| format!("write audio {}", path.display()))?;
    debug!(file = %filename, bytes = audio.len(), "audio written");
    Ok(filename)
}

/// Splits text on whitespace into pieces of at most `max` characters.
/// Words longer than `max` are cut.
pub fn chunk_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Google Translate speech endpoint, fetched chunk by chunk.
#[derive(Clone)]
pub struct GoogleTranslateTts {
    client: reqwest::Client,
    endpoint: String,
    lang: String,
}

impl GoogleTranslateTts {
    pub fn new(cfg: &SpeechConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: cfg.endpoint.clone(),
            lang: cfg.lang.clone(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str) -> anyhow::Result<Bytes> {
        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        anyhow::ensure!(!chunks.is_empty(), "no text to synthesize");

        let total = chunks.len().to_string();
        let mut audio = BytesMut::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            let resp = self
                .client
                .get(&self.endpoint)
                .query(&[
                    ("ie", "UTF-8"),
                    ("q", chunk.as_str()),
                    ("tl", self.lang.as_str()),
                    ("client", "tw-ob"),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .timeout(Duration::from_secs(30))
                .send()
                .await
                .context("tts request")?;

            if !resp.status().is_success() {
                anyhow::bail!("TTS API error {} on chunk {}", resp.status(), idx);
            }
            audio.extend_from_slice(&resp.bytes().await.context("tts response body")?);
        }
        Ok(audio.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::FakeSpeech;

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(chunk_text("hello   world", 100), vec!["hello world"]);
        assert!(chunk_text("   ", 100).is_empty());
    }

    #[test]
    fn chunks_respect_limit_and_keep_words() {
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let chunks = chunk_text(&text, MAX_CHUNK_CHARS);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.chars().count() <= MAX_CHUNK_CHARS));
        assert_eq!(chunks.join(" "), text.trim());
    }

    #[test]
    fn oversized_words_are_cut() {
        let word = "a".repeat(250);
        let chunks = chunk_text(&format!("hi {word} there"), 100);
        assert_eq!(chunks, vec!["hi".to_string(), "a".repeat(100), "a".repeat(100), "a".repeat(50), "there".to_string()]);
    }

    #[tokio::test]
    async fn render_writes_mp3_into_dir() {
        let dir = std::env::temp_dir().join(format!("studynotes-audio-{}", Uuid::new_v4()));
        let name = render_to_file(&FakeSpeech, &dir, "read this aloud").await.unwrap();
        assert!(name.ends_with(".mp3"));
        assert_eq!(name.len(), 32 + 4);
        let written = tokio::fs::read(dir.join(&name)).await.unwrap();
        assert!(!written.is_empty());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
