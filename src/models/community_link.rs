use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::comment::{AuthorRef, Comment};
use super::file_type::FileType;

/// Caller-supplied fields for posting a community link.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityLinkInput {
    pub title: String,
    pub url: String,
    pub file_type: FileType,
    pub description: Option<String>,
}

/// A user-submitted link with the poster's identity snapshot embedded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommunityLink {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub file_type: FileType,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub author: AuthorRef,
    pub comments: Vec<Comment>,
}

impl CommunityLinkInput {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        file_type: FileType,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            file_type,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
