use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

/// What produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAction {
    TextSummarize,
    UploadSummarize,
}

impl HistoryAction {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryAction::TextSummarize => "Text Summarize",
            HistoryAction::UploadSummarize => "Upload & Summarize",
        }
    }
}

/// Source label used for pasted text.
pub const TEXT_INPUT_SOURCE: &str = "Text Input";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub action: String,
    pub filename: String,
    pub summary: String,
    pub timestamp: OffsetDateTime,
}
