use axum::{extract::State, http::StatusCode, routing::post, Extension, Form, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::{auth::session::CurrentUser, error::AppError, speech::render_to_file, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SpeechForm {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SpeechResponse {
    Audio { audio_url: String },
    Error { error: String },
}

pub fn speech_routes() -> Router<AppState> {
    Router::new().route("/text-to-speech", post(text_to_speech))
}

#[instrument(skip(state, user, form), fields(username = %user.username))]
pub async fn text_to_speech(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<SpeechForm>,
) -> (StatusCode, Json<SpeechResponse>) {
    let text = form.text.trim();
    if text.is_empty() {
        let err = AppError::EmptyInput("No text provided");
        return (err.status(), Json(SpeechResponse::Error { error: err.to_string() }));
    }

    match render_to_file(state.speech.as_ref(), &state.config.audio_dir, text).await {
        Ok(filename) => {
            info!(file = %filename, "speech generated");
            (
                StatusCode::OK,
                Json(SpeechResponse::Audio { audio_url: format!("/static/audio/{filename}") }),
            )
        }
        Err(e) => {
            error!(error = %e, "speech synthesis failed");
            let err = AppError::ExternalService(e.to_string());
            (err.status(), Json(SpeechResponse::Error { error: err.to_string() }))
        }
    }
}
