use sqlx::SqlitePool;

use crate::error::StoreError;
use crate::models::Settings;

/// Fixed identifier of the singleton settings document.
const SETTINGS_DOC_ID: &str = "app-settings";

pub struct SettingsRepository {
    pool: SqlitePool,
}

// Row type for database queries
#[derive(sqlx::FromRow)]
struct SettingsRow {
    registration_open: Option<i64>,
    announcement: Option<String>,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The global settings, with defaults synthesized for an absent row or
    /// absent fields.
    pub async fn get(&self) -> Result<Settings, StoreError> {
        let row: Option<SettingsRow> = sqlx::query_as(
            "SELECT registration_open, announcement FROM settings WHERE id = ?",
        )
        .bind(SETTINGS_DOC_ID)
        .fetch_optional(&self.pool)
        .await?;

        let defaults = Settings::default();
        Ok(match row {
            Some(row) => Settings {
                registration_open: row
                    .registration_open
                    .map(|v| v != 0)
                    .unwrap_or(defaults.registration_open),
                announcement: row.announcement.unwrap_or(defaults.announcement),
            },
            None => defaults,
        })
    }

    pub async fn registration_open(&self) -> Result<bool, StoreError> {
        Ok(self.get().await?.registration_open)
    }

    /// Writes only the registration flag, preserving the announcement.
    pub async fn set_registration_open(&self, open: bool) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO settings (id, registration_open) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET registration_open = excluded.registration_open
            "#,
        )
        .bind(SETTINGS_DOC_ID)
        .bind(open as i64)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn announcement(&self) -> Result<String, StoreError> {
        Ok(self.get().await?.announcement)
    }

    /// Writes only the announcement, preserving the registration flag.
    pub async fn set_announcement(&self, message: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO settings (id, announcement) VALUES (?, ?)
            ON CONFLICT(id) DO UPDATE SET announcement = excluded.announcement
            "#,
        )
        .bind(SETTINGS_DOC_ID)
        .bind(message)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use tempfile::TempDir;

    struct TestContext {
        repo: SettingsRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(db_path).await.unwrap();
        TestContext {
            repo: SettingsRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_defaults_when_no_document() {
        let ctx = setup_repo().await;

        let settings = ctx.repo.get().await.unwrap();
        assert!(settings.registration_open);
        assert_eq!(settings.announcement, "");
    }

    #[tokio::test]
    async fn test_set_registration_preserves_announcement() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.set_announcement("Maintenance tonight").await.unwrap();
        repo.set_registration_open(false).await.unwrap();

        let settings = repo.get().await.unwrap();
        assert!(!settings.registration_open);
        assert_eq!(settings.announcement, "Maintenance tonight");
    }

    #[tokio::test]
    async fn test_set_announcement_preserves_registration() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.set_registration_open(false).await.unwrap();
        repo.set_announcement("Welcome back").await.unwrap();

        let settings = repo.get().await.unwrap();
        assert!(!settings.registration_open);
        assert_eq!(settings.announcement, "Welcome back");
    }

    #[tokio::test]
    async fn test_partial_row_synthesizes_missing_field() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        // Only the announcement has ever been written; the flag column is
        // NULL and reads as the default.
        repo.set_announcement("hola").await.unwrap();

        assert!(repo.registration_open().await.unwrap());
        assert_eq!(repo.announcement().await.unwrap(), "hola");
    }

    #[tokio::test]
    async fn test_accessors_match_get() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.set_registration_open(false).await.unwrap();
        repo.set_announcement("News").await.unwrap();

        assert_eq!(
            repo.registration_open().await.unwrap(),
            repo.get().await.unwrap().registration_open
        );
        assert_eq!(repo.announcement().await.unwrap(), "News");
    }
}
