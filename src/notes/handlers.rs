use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    routing::get,
    Extension, Form, Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::session::CurrentUser,
    error::AppError,
    history::repo_types::{HistoryAction, TEXT_INPUT_SOURCE},
    notes::{
        dto::{NotesPage, SummaryForm},
        services::{extract_text, safe_filename, save_upload, UploadItem},
    },
    state::AppState,
    summarizer::summarize_or_explain,
};

const UPLOAD_FIELD: &str = "notes_file";

pub fn summary_routes() -> Router<AppState> {
    Router::new().route("/summary", get(summary_page).post(summarize_text))
}

pub fn upload_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/upload", get(upload_page).post(upload_and_summarize))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

pub async fn summary_page() -> Json<NotesPage> {
    Json(NotesPage::empty("Summary"))
}

pub async fn upload_page() -> Json<NotesPage> {
    Json(NotesPage::empty("Upload Notes"))
}

#[instrument(skip(state, user, form), fields(username = %user.username))]
pub async fn summarize_text(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<SummaryForm>,
) -> Result<Json<NotesPage>, AppError> {
    let mut page = NotesPage::empty("Summary");
    let text = form.text.trim();
    if text.is_empty() {
        page.message = AppError::EmptyInput("No text provided.").to_string();
        return Ok(Json(page));
    }

    let summary = summarize_or_explain(state.summarizer.as_ref(), text).await;
    state
        .history
        .record(HistoryAction::TextSummarize, TEXT_INPUT_SOURCE, &summary)
        .await?;
    info!(chars = text.len(), "text summarized");

    page.original_text = text.to_string();
    page.summary = summary;
    Ok(Json(page))
}

#[instrument(skip(state, user, mp), fields(username = %user.username))]
pub async fn upload_and_summarize(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    mut mp: Multipart,
) -> Result<Json<NotesPage>, AppError> {
    let mut page = NotesPage::empty("Upload Notes");

    let mut upload: Option<UploadItem> = None;
    while let Some(field) = mp.next_field().await.map_err(rejected_upload)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(filename) = field.file_name().and_then(safe_filename) else {
            continue;
        };
        let body = field.bytes().await.map_err(rejected_upload)?;
        upload = Some(UploadItem { filename, body });
    }

    let Some(item) = upload else {
        page.message = AppError::EmptyInput("No file selected.").to_string();
        return Ok(Json(page));
    };

    save_upload(&state.config.upload_dir, &item).await?;

    let text = match extract_text(&item).await {
        Ok(text) => text,
        Err(e @ AppError::UnreadableFile) => {
            warn!(file = %item.filename, "could not read text from upload");
            page.message = e.to_string();
            return Ok(Json(page));
        }
        Err(e) => return Err(e),
    };

    let summary = summarize_or_explain(state.summarizer.as_ref(), &text).await;
    state
        .history
        .record(HistoryAction::UploadSummarize, &item.filename, &summary)
        .await?;
    info!(file = %item.filename, "upload summarized");

    page.original_text = text;
    page.summary = summary;
    page.message = "File summarized successfully!".into();
    Ok(Json(page))
}

fn rejected_upload(e: MultipartError) -> AppError {
    warn!(status = %e.status(), error = %e.body_text(), "multipart upload rejected");
    AppError::Upload(e)
}
