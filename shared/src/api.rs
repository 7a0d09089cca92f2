use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// One entry of the clothing catalog, as listed by `GET /catalog`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CatalogItem {
    pub filename: String,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Default)]
pub struct Catalog {
    pub items: Vec<CatalogItem>,
}

/// `POST /upload` response. `session_id` is present iff `success` is true.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TryOnRequest {
    pub session_id: String,
    pub clothing_item: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TryOnResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub result_filename: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TryAllRequest {
    pub session_id: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TryAllResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub error: Option<String>,
}

/// Server-side batch state tag. The backend reports `processing` while the
/// job runs; `pending` is accepted as a synonym.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BatchState {
    #[default]
    #[serde(alias = "pending")]
    Processing,
    Completed,
}

/// `GET /try-all-status/{session_id}` payload, re-fetched on every poll tick.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct BatchStatus {
    #[serde(default)]
    pub status: BatchState,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub total_processed: u32,
    #[serde(default)]
    pub completed_items: u32,
    #[serde(default)]
    pub failed_items: u32,
    #[serde(default)]
    pub progress_percentage: f32,
    #[serde(default)]
    pub error: Option<String>,
}

impl BatchStatus {
    pub fn is_completed(&self) -> bool {
        self.status == BatchState::Completed
    }
}

/// One successful try-on produced by a batch job.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BatchResult {
    pub clothing_item: CatalogItem,
    pub result_filename: String,
}

/// One item the batch job could not process.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct BatchFailure {
    pub clothing_item: CatalogItem,
    pub error: String,
}

/// `GET /try-all-results/{session_id}` payload backing the results page.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
pub struct BatchResults {
    #[serde(default)]
    pub session_id: String,
    #[serde(default)]
    pub status: BatchState,
    #[serde(default)]
    pub total_items: u32,
    #[serde(default)]
    pub completed_items: u32,
    #[serde(default)]
    pub failed_items: u32,
    #[serde(default)]
    pub results: Vec<BatchResult>,
    #[serde(default)]
    pub errors: Vec<BatchFailure>,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_state_accepts_pending_alias() {
        let status: BatchStatus =
            serde_json::from_str(r#"{"status":"pending","total_items":4}"#).unwrap();
        assert_eq!(status.status, BatchState::Processing);
        assert_eq!(status.total_items, 4);
    }

    #[test]
    fn completed_status_round_trips() {
        let status: BatchStatus = serde_json::from_str(
            r#"{"status":"completed","progress_percentage":100.0,"total_items":7,
                "total_processed":7,"completed_items":6,"failed_items":1}"#,
        )
        .unwrap();
        assert!(status.is_completed());
        assert_eq!(status.completed_items, 6);
        assert_eq!(status.failed_items, 1);
    }

    #[test]
    fn upload_failure_carries_error_only() {
        let resp: UploadResponse =
            serde_json::from_str(r#"{"success":false,"error":"bad file"}"#).unwrap();
        assert!(!resp.success);
        assert_eq!(resp.session_id, None);
        assert_eq!(resp.error.as_deref(), Some("bad file"));
    }

    #[test]
    fn results_document_tolerates_missing_fields() {
        let results: BatchResults =
            serde_json::from_str(r#"{"session_id":"abc","status":"completed"}"#).unwrap();
        assert!(results.results.is_empty());
        assert!(results.errors.is_empty());
    }
}
