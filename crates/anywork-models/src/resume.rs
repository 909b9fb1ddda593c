//! Resume models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::UserId;

/// Unique identifier for a resume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResumeId(pub String);

impl ResumeId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResumeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ResumeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ResumeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// An uploaded resume record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resume {
    pub resume_id: ResumeId,
    pub file_path: String,
    pub checksum: String,
    pub uploaded_at: DateTime<Utc>,
    pub job_seeker: UserId,
}

/// A resume file staged for upload.
///
/// Validate with [`crate::validate::validate_resume_upload`] before handing
/// it to the upload endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size of the staged file in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
