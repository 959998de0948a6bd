mod comment;
mod community_link;
mod download;
mod file_type;
mod settings;
mod user;

pub use comment::{AuthorRef, Comment, CommentActivity};
pub use community_link::{CommunityLink, CommunityLinkInput};
pub use download::{Download, DownloadInput, DownloadUpdate};
pub use file_type::FileType;
pub use settings::Settings;
pub use user::{Role, User, PLACEHOLDER_AVATAR_URL};
