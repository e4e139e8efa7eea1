use serde::{Deserialize, Serialize};

pub const UPLOADED_STATUS: &str = "uploaded ✅";

#[derive(Debug, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    pub file: String,
}

impl UploadResponse {
    pub fn uploaded(file: impl Into<String>) -> Self {
        Self {
            status: UPLOADED_STATUS.to_string(),
            file: file.into(),
        }
    }
}
