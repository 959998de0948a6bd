use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::User;

/// Denormalized author identity captured at write time.
///
/// Snapshots are never updated when the source user later changes their name
/// or avatar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AuthorRef {
    pub id: Uuid,
    pub name: String,
    pub avatar_url: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

/// A comment embedded in a download or community link.
///
/// Comments are owned by exactly one parent entity and are never addressable
/// on their own.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Comment {
    pub id: Uuid,
    pub author: AuthorRef,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    /// Builds a comment for `author` with a fresh id and the current time.
    pub fn new(content: impl Into<String>, author: &User) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: AuthorRef::from(author),
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

/// A comment joined with the download it belongs to, for the activity feed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommentActivity {
    #[serde(flatten)]
    pub comment: Comment,
    pub link_id: Uuid,
    pub link_title: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_author_ref_snapshots_identity() {
        let user = User::new("Mara", "mara@example.com", "pw", Role::User)
            .with_avatar_url("https://example.com/mara.png");
        let author = AuthorRef::from(&user);
        assert_eq!(author.id, user.id);
        assert_eq!(author.name, "Mara");
        assert_eq!(author.avatar_url, "https://example.com/mara.png");
    }

    #[test]
    fn test_new_comment_has_unique_ids() {
        let user = User::new("Mara", "mara@example.com", "pw", Role::User);
        let a = Comment::new("first", &user);
        let b = Comment::new("second", &user);
        assert_ne!(a.id, b.id);
        assert_eq!(a.author.id, b.author.id);
    }

    #[test]
    fn test_comment_json_roundtrip() {
        let user = User::new("Mara", "mara@example.com", "pw", Role::User);
        let comment = Comment::new("hola", &user);
        let json = serde_json::to_string(&comment).unwrap();
        let parsed: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, comment);
    }
}
