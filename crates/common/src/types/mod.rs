use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

/// Explanation of an exam question as returned to the student.
///
/// Transient response shape; nothing here is persisted.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AIExplanation {
    /// Why the correct option is correct.
    pub why_correct: Vec<String>,
    /// Why the remaining options are wrong.
    #[serde(default)]
    pub why_others_wrong: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    /// Set when the explanation may be unreliable (ambiguous question, missing context).
    #[serde(default)]
    pub uncertainty_note: Option<String>,
}

/// Summary row for an exam, as listed by the admin endpoints.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExamSummary {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub level: Option<String>,
    pub question_count: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, ToSchema)]
pub struct ExamsFromMarkdown {
    pub success: bool,
    pub exams: Vec<ExamSummary>,
    pub message: String,
}
