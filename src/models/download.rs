use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comment::Comment;
use super::file_type::FileType;

/// Caller-supplied fields for creating a download.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DownloadInput {
    pub title: String,
    pub image_url: String,
    pub file_type: FileType,
    pub download_url: String,
    pub description: Option<String>,
}

/// Partial update for a download. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct DownloadUpdate {
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub file_type: Option<FileType>,
    pub download_url: Option<String>,
    pub description: Option<String>,
}

/// A curated download entry with its embedded comment sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Download {
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub file_type: FileType,
    pub download_url: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub comments: Vec<Comment>,
}

impl DownloadInput {
    pub fn new(
        title: impl Into<String>,
        image_url: impl Into<String>,
        file_type: FileType,
        download_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            image_url: image_url.into(),
            file_type,
            download_url: download_url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
