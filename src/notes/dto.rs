use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SummaryForm {
    #[serde(default)]
    pub text: String,
}

/// View model shared by the summary and upload pages.
#[derive(Debug, Default, Serialize)]
pub struct NotesPage {
    pub title: &'static str,
    pub original_text: String,
    pub summary: String,
    pub message: String,
}

impl NotesPage {
    pub fn empty(title: &'static str) -> Self {
        Self { title, ..Default::default() }
    }
}
