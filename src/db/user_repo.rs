use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_timestamp;
use crate::error::StoreError;
use crate::models::User;

pub struct UserRepository {
    pool: SqlitePool,
}

// Row type for database queries
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    avatar_url: String,
    password: String,
    points: Option<i64>,
    created_at: Option<String>,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// All users, ordered by creation time ascending.
    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows: Vec<UserRow> = sqlx::query_as("SELECT * FROM users ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(hydrate_user).collect()
    }

    /// A single user, or `None` if the id does not exist.
    pub async fn get(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(hydrate_user).transpose()
    }

    /// Looks up a user by exact email match.
    ///
    /// Email uniqueness is only ever enforced by the registration pre-check,
    /// so if duplicates exist this returns the earliest-created one.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> =
            sqlx::query_as("SELECT * FROM users WHERE email = ? ORDER BY created_at LIMIT 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        row.map(hydrate_user).transpose()
    }

    /// Persists a new user with a store-assigned creation timestamp and
    /// returns the hydrated entity.
    pub async fn create(&self, user: &User) -> Result<User, StoreError> {
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO users (id, name, email, role, avatar_url, password, points, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.name)
        .bind(&user.email)
        .bind(user.role.to_string())
        .bind(&user.avatar_url)
        .bind(&user.password)
        .bind(user.points.map(|p| p as i64))
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        self.get(user.id).await?.ok_or(StoreError::NotFound)
    }

    /// Removes a user. Deleting an absent id is not an error.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Replaces a user's avatar and returns the post-update entity.
    pub async fn update_avatar(&self, id: Uuid, avatar_url: &str) -> Result<User, StoreError> {
        let result = sqlx::query("UPDATE users SET avatar_url = ? WHERE id = ?")
            .bind(avatar_url)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        self.get(id).await?.ok_or(StoreError::NotFound)
    }

    /// Adds one to a user's engagement points. Absent points count as zero.
    pub async fn increment_points(&self, id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET points = COALESCE(points, 0) + 1 WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}

fn hydrate_user(row: UserRow) -> Result<User, StoreError> {
    Ok(User {
        id: Uuid::parse_str(&row.id).map_err(|e| StoreError::Corrupt(e.to_string()))?,
        name: row.name,
        email: row.email,
        role: row.role.parse().map_err(StoreError::Corrupt)?,
        avatar_url: row.avatar_url,
        password: row.password,
        created_at: row.created_at.as_deref().map(parse_timestamp),
        points: row.points.map(|p| p.max(0) as u32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::models::{Role, PLACEHOLDER_AVATAR_URL};
    use tempfile::TempDir;

    struct TestContext {
        repo: UserRepository,
        _temp_dir: TempDir, // Keep alive for duration of test
    }

    async fn setup_repo() -> TestContext {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let pool = init_db(db_path).await.unwrap();
        TestContext {
            repo: UserRepository::new(pool),
            _temp_dir: temp_dir,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_timestamp() {
        let ctx = setup_repo().await;

        let user = User::new("Ana", "ana@example.com", "secret", Role::User);
        assert!(user.created_at.is_none());

        let created = ctx.repo.create(&user).await.unwrap();
        assert!(created.created_at.is_some());
        assert_eq!(created.points, Some(0));
        assert_eq!(created.avatar_url, PLACEHOLDER_AVATAR_URL);
    }

    #[tokio::test]
    async fn test_find_by_email() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let user = User::new("Ana", "ana@example.com", "secret", Role::User);
        repo.create(&user).await.unwrap();

        let found = repo.find_by_email("ana@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, user.id);

        // Exact match only
        assert!(repo.find_by_email("ANA@example.com").await.unwrap().is_none());
        assert!(repo.find_by_email("bob@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordered_by_creation() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        repo.create(&User::new("First", "a@example.com", "pw", Role::User))
            .await
            .unwrap();
        repo.create(&User::new("Second", "b@example.com", "pw", Role::User))
            .await
            .unwrap();
        repo.create(&User::new("Third", "c@example.com", "pw", Role::Admin))
            .await
            .unwrap();

        let users = repo.list().await.unwrap();
        let names: Vec<&str> = users.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[tokio::test]
    async fn test_update_avatar() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let user = User::new("Ana", "ana@example.com", "secret", Role::User);
        repo.create(&user).await.unwrap();

        let updated = repo
            .update_avatar(user.id, "https://example.com/ana.png")
            .await
            .unwrap();
        assert_eq!(updated.avatar_url, "https://example.com/ana.png");
        // Nothing else changes
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(updated.password, "secret");
    }

    #[tokio::test]
    async fn test_update_avatar_absent_user() {
        let ctx = setup_repo().await;

        let result = ctx
            .repo
            .update_avatar(Uuid::new_v4(), "https://example.com/x.png")
            .await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_increment_points() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let user = User::new("Ana", "ana@example.com", "secret", Role::User);
        repo.create(&user).await.unwrap();

        repo.increment_points(user.id).await.unwrap();
        repo.increment_points(user.id).await.unwrap();

        let fetched = repo.get(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.points, Some(2));
    }

    #[tokio::test]
    async fn test_increment_points_treats_null_as_zero() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let mut user = User::new("Old", "old@example.com", "pw", Role::User);
        user.points = None;
        repo.create(&user).await.unwrap();

        repo.increment_points(user.id).await.unwrap();

        let fetched = repo.get(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.points, Some(1));
    }

    #[tokio::test]
    async fn test_increment_points_absent_user() {
        let ctx = setup_repo().await;

        let result = ctx.repo.increment_points(Uuid::new_v4()).await;
        assert!(matches!(result, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let user = User::new("Ana", "ana@example.com", "secret", Role::User);
        repo.create(&user).await.unwrap();

        repo.delete(user.id).await.unwrap();
        assert!(repo.get(user.id).await.unwrap().is_none());

        repo.delete(user.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_unknown_role_is_corruption_not_absence() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        let user = User::new("Ana", "ana@example.com", "secret", Role::User);
        repo.create(&user).await.unwrap();

        sqlx::query("UPDATE users SET role = 'SUPERUSER' WHERE id = ?")
            .bind(user.id.to_string())
            .execute(&repo.pool)
            .await
            .unwrap();

        let result = repo.get(user.id).await;
        assert!(matches!(result, Err(StoreError::Corrupt(_))));
    }

    #[tokio::test]
    async fn test_no_unique_constraint_on_email() {
        let ctx = setup_repo().await;
        let repo = &ctx.repo;

        // The schema allows duplicates; only the auth pre-check prevents them.
        repo.create(&User::new("One", "same@example.com", "pw1", Role::User))
            .await
            .unwrap();
        repo.create(&User::new("Two", "same@example.com", "pw2", Role::User))
            .await
            .unwrap();

        let found = repo.find_by_email("same@example.com").await.unwrap();
        assert_eq!(found.unwrap().name, "One");
    }
}
