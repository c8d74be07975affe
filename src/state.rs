use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::{
    auth::repo::{CredentialStore, PgCredentialStore},
    config::AppConfig,
    history::repo::{HistoryLog, PgHistoryLog},
    speech::{GoogleTranslateTts, SpeechSynthesizer},
    summarizer::{GeminiSummarizer, Summarizer},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn CredentialStore>,
    pub history: Arc<dyn HistoryLog>,
    pub summarizer: Arc<dyn Summarizer>,
    pub speech: Arc<dyn SpeechSynthesizer>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        // The migration set is embedded at build time; a failure means a broken schema.
        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;

        for dir in [&config.upload_dir, &config.audio_dir] {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create {}", dir.display()))?;
        }

        let summarizer = Arc::new(GeminiSummarizer::new(&config.gemini)) as Arc<dyn Summarizer>;
        let speech = Arc::new(GoogleTranslateTts::new(&config.speech)) as Arc<dyn SpeechSynthesizer>;

        Ok(Self::from_parts(
            config,
            Arc::new(PgCredentialStore::new(db.clone())),
            Arc::new(PgHistoryLog::new(db)),
            summarizer,
            speech,
        ))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn CredentialStore>,
        history: Arc<dyn HistoryLog>,
        summarizer: Arc<dyn Summarizer>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            config,
            users,
            history,
            summarizer,
            speech,
        }
    }
}
