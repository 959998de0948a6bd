mod session;
mod storage;

pub use session::AuthSession;
pub use storage::SessionStorage;
