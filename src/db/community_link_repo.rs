use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_timestamp;
use crate::error::StoreError;
use crate::models::{AuthorRef, Comment, CommunityLink, CommunityLinkInput, User};

pub struct CommunityLinkRepository {
    pool: SqlitePool,
}

// Row type for database queries
#[derive(sqlx::FromRow)]
struct CommunityLinkRow {
    id: String,
    title: String,
    url: String,
    file_type: String,
    description: Option<String>,
    author: String,
    comments: String,
    created_at: String,
}

impl CommunityLinkRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All community links, newest first.
    pub async fn list(&self) -> Result<Vec<CommunityLink>, StoreError> {
        let rows: Vec<CommunityLinkRow> =
            sqlx::query_as("SELECT * FROM community_links ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(hydrate_link).collect()
    }

    /// A single link, or `None` if the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Option<CommunityLink>, StoreError> {
        let row: Option<CommunityLinkRow> =
            sqlx::query_as("SELECT * FROM community_links WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(hydrate_link).transpose()
    }

    /// Persists a new link with the poster's identity snapshot embedded, an
    /// empty comment sequence, and a store-assigned creation timestamp.
    pub async fn create(
        &self,
        input: &CommunityLinkInput,
        user: &User,
    ) -> Result<CommunityLink, StoreError> {
        let id = Uuid::new_v4();
        let author = AuthorRef::from(user);
        let author_json = serde_json::to_string(&author)?;
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO community_links (id, title, url, file_type, description, author, comments, created_at)
            VALUES (?, ?, ?, ?, ?, ?, '[]', ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.title)
        .bind(&input.url)
        .bind(input.file_type.as_str())
        .bind(&input.description)
        .bind(&author_json)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.get(id).await?.ok_or(StoreError::NotFound)
    }

    /// Removes a link. Deleting an absent id is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM community_links WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Appends a comment to a link and awards one point to the link's
    /// original author.
    ///
    /// The append and the points update are two independent statements with
    /// no transaction: a failure after the append leaves the comment recorded
    /// without the point awarded. Callers accept this window.
    pub async fn add_comment(
        &self,
        link_id: Uuid,
        content: &str,
        user: &User,
    ) -> Result<CommunityLink, StoreError> {
        let link = self.get(link_id).await?.ok_or(StoreError::NotFound)?;

        let comment = Comment::new(content, user);
        let comment_json = serde_json::to_string(&comment)?;

        sqlx::query(
            "UPDATE community_links SET comments = json_insert(comments, '$[#]', json(?)) WHERE id = ?",
        )
        .bind(&comment_json)
        .bind(link_id.to_string())
        .execute(&self.pool)
        .await?;

        let result =
            sqlx::query("UPDATE users SET points = COALESCE(points, 0) + 1 WHERE id = ?")
                .bind(link.author.id.to_string())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            tracing::warn!(
                author_id = %link.author.id,
                link_id = %link_id,
                "Comment appended but link author no longer exists; no point awarded"
            );
            return Err(StoreError::NotFound);
        }

        self.get(link_id).await?.ok_or(StoreError::NotFound)
    }
}

fn hydrate_link(row: CommunityLinkRow) -> Result<CommunityLink, StoreError> {
    let author: AuthorRef = serde_json::from_str(&row.author)?;
    let comments: Vec<Comment> = if row.comments.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&row.comments)?
    };

    Ok(CommunityLink {
        id: Uuid::parse_str(&row.id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        title: row.title,
        url: row.url,
        file_type: row.file_type.parse().map_err(StoreError::Corrupt)?,
        description: row.description,
        created_at: parse_timestamp(&row.created_at),
        author,
        comments,
    })
}
