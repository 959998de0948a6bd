//! LinkLocker Data & Auth Layer
//!
//! Data access and authentication for the LinkLocker link-sharing app:
//! CRUD repositories over the downloads, users, community links, and
//! settings collections, plus the locally persisted login session the UI
//! hangs off of.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use auth::{AuthSession, SessionStorage};
pub use config::{Config, ConfigError};
pub use db::{
    init_db, CommunityLinkRepository, DownloadRepository, SettingsRepository, UserRepository,
};
pub use error::StoreError;
pub use models::{
    AuthorRef, Comment, CommentActivity, CommunityLink, CommunityLinkInput, Download,
    DownloadInput, DownloadUpdate, FileType, Role, Settings, User, PLACEHOLDER_AVATAR_URL,
};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
