use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_timestamp;
use crate::error::StoreError;
use crate::models::{Comment, CommentActivity, Download, DownloadInput, DownloadUpdate, User};

pub struct DownloadRepository {
    pool: SqlitePool,
}

// Row type for database queries
#[derive(sqlx::FromRow)]
struct DownloadRow {
    id: String,
    title: String,
    image_url: String,
    file_type: String,
    download_url: String,
    description: Option<String>,
    comments: String,
    created_at: String,
}

impl DownloadRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All downloads, ordered by title ascending.
    pub async fn list(&self) -> Result<Vec<Download>, StoreError> {
        let rows: Vec<DownloadRow> = sqlx::query_as("SELECT * FROM downloads ORDER BY title")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(hydrate_download).collect()
    }

    /// A single download, or `None` if the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Option<Download>, StoreError> {
        let row: Option<DownloadRow> = sqlx::query_as("SELECT * FROM downloads WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(hydrate_download).transpose()
    }

    /// Persists a new download with an empty comment sequence and a
    /// store-assigned creation timestamp. Returns the hydrated entity.
    pub async fn create(&self, input: &DownloadInput) -> Result<Download, StoreError> {
        let id = Uuid::new_v4();
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO downloads (id, title, image_url, file_type, download_url, description, comments, created_at)
            VALUES (?, ?, ?, ?, ?, ?, '[]', ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&input.title)
        .bind(&input.image_url)
        .bind(input.file_type.as_str())
        .bind(&input.download_url)
        .bind(&input.description)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.get(id).await?.ok_or(StoreError::NotFound)
    }

    /// Merges only the supplied fields into an existing download and returns
    /// the post-update entity. Fails with `NotFound` on an absent id.
    pub async fn update(&self, id: Uuid, update: &DownloadUpdate) -> Result<Download, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE downloads
            SET title = COALESCE(?, title),
                image_url = COALESCE(?, image_url),
                file_type = COALESCE(?, file_type),
                download_url = COALESCE(?, download_url),
                description = COALESCE(?, description)
            WHERE id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.image_url)
        .bind(update.file_type.map(|f| f.as_str()))
        .bind(&update.download_url)
        .bind(&update.description)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.get(id).await?.ok_or(StoreError::NotFound)
    }

    /// Removes a download. Deleting an absent id is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM downloads WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Appends a freshly synthesized comment and returns the reloaded
    /// download.
    ///
    /// The append is a single json_insert statement, so two concurrent
    /// additions cannot overwrite each other.
    pub async fn add_comment(
        &self,
        download_id: Uuid,
        content: &str,
        author: &User,
    ) -> Result<Download, StoreError> {
        let comment = Comment::new(content, author);
        let comment_json = serde_json::to_string(&comment)?;

        let result = sqlx::query(
            "UPDATE downloads SET comments = json_insert(comments, '$[#]', json(?)) WHERE id = ?",
        )
        .bind(&comment_json)
        .bind(download_id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.get(download_id).await?.ok_or(StoreError::NotFound)
    }

    /// Removes the comment with the given id from a download's sequence.
    ///
    /// The whole sequence is read, filtered, and written back. An unknown
    /// comment id filters out nothing and the write still happens.
    pub async fn delete_comment(
        &self,
        download_id: Uuid,
        comment_id: Uuid,
    ) -> Result<(), StoreError> {
        let download = self.get(download_id).await?.ok_or(StoreError::NotFound)?;

        let remaining: Vec<&Comment> = download
            .comments
            .iter()
            .filter(|c| c.id != comment_id)
            .collect();
        let comments_json = serde_json::to_string(&remaining)?;

        sqlx::query("UPDATE downloads SET comments = ? WHERE id = ?")
            .bind(&comments_json)
            .bind(download_id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Every comment across every download with its parent's id and title
    /// attached, most recent first.
    ///
    /// Fans out over all download documents on every call; fine for the
    /// document counts this deployment sees.
    pub async fn all_comments(&self) -> Result<Vec<CommentActivity>, StoreError> {
        let downloads = self.list().await?;

        let mut activity: Vec<CommentActivity> = Vec::new();
        for download in downloads {
            for comment in download.comments {
                activity.push(CommentActivity {
                    comment,
                    link_id: download.id,
                    link_title: download.title.clone(),
                });
            }
        }

        activity.sort_by(|a, b| b.comment.created_at.cmp(&a.comment.created_at));

        Ok(activity)
    }
}

fn hydrate_download(row: DownloadRow) -> Result<Download, StoreError> {
    let comments: Vec<Comment> = if row.comments.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(&row.comments)?
    };

    Ok(Download {
        id: Uuid::parse_str(&row.id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        title: row.title,
        image_url: row.image_url,
        file_type: row.file_type.parse().map_err(StoreError::Corrupt)?,
        download_url: row.download_url,
        description: row.description,
        created_at: parse_timestamp(&row.created_at),
        comments,
    })
}
