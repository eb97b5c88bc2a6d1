use serde::{Deserialize, Serialize};

use super::media::MediaType;

/// Metadata written as a JSON sidecar when a finished artifact is imported
/// into a library directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingMetadata {
    pub id: String,
    pub created_at: String,
    pub artifact_path: String,
    pub checksum: String,
    pub tracks: Vec<MediaType>,
}

impl RecordingMetadata {
    pub fn new(artifact_path: &str, checksum: &str, tracks: Vec<MediaType>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            artifact_path: artifact_path.to_string(),
            checksum: checksum.to_string(),
            tracks,
        }
    }
}
