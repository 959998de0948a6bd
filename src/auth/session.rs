//! The authentication session.
//!
//! `AuthSession` holds the single current-user slot for one execution
//! context. It is an explicit value the caller constructs and passes around,
//! not process-global state, so tests and UIs control its lifetime.
//!
//! Expected negative outcomes (unknown email, wrong password, duplicate
//! registration) come back as `None`. Store failures are logged and also
//! surfaced as `None`; auth callers never see a raw store error.

use crate::db::UserRepository;
use crate::models::{Role, User};

use super::storage::SessionStorage;

pub struct AuthSession {
    storage: SessionStorage,
    current_user: Option<User>,
    loading: bool,
}

impl AuthSession {
    /// Initializes a session from the persisted snapshot.
    ///
    /// A valid snapshot becomes the current user; a missing or corrupt one
    /// leaves the session logged out. `loading` is false once this returns.
    pub fn load(storage: SessionStorage) -> Self {
        let mut session = Self {
            storage,
            current_user: None,
            loading: true,
        };

        session.current_user = session.storage.load();
        session.loading = false;
        session
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Attempts a login with an exact email match and a plaintext password
    /// comparison (the documented behavior of the system this layer backs).
    ///
    /// Returns the logged-in user, or `None` for unknown email, wrong
    /// password, or a store failure. Session state only changes on success.
    pub async fn login(
        &mut self,
        users: &UserRepository,
        email: &str,
        password: &str,
    ) -> Option<User> {
        self.loading = true;
        let result = self.try_login(users, email, password).await;
        self.loading = false;
        result
    }

    async fn try_login(
        &mut self,
        users: &UserRepository,
        email: &str,
        password: &str,
    ) -> Option<User> {
        let found = match users.find_by_email(email).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Login query failed: {}", e);
                return None;
            }
        };

        let user = match found {
            Some(user) => user,
            None => {
                tracing::debug!("No user found with this email");
                return None;
            }
        };

        if user.password != password {
            tracing::debug!("Password does not match");
            return None;
        }

        self.current_user = Some(user.clone());
        self.storage.save(&user);
        Some(user)
    }

    /// Clears the current user and the persisted snapshot. No store I/O.
    pub fn logout(&mut self) {
        self.current_user = None;
        self.storage.clear();
    }

    /// Creates a new account with zero points and the placeholder avatar.
    ///
    /// Returns `None` if a user with the email already exists or the store
    /// fails. The created user is returned but NOT logged in; the caller is
    /// expected to prompt for a login.
    pub async fn register(
        &mut self,
        users: &UserRepository,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Option<User> {
        self.loading = true;
        let result = self.try_register(users, name, email, password, role).await;
        self.loading = false;
        result
    }

    async fn try_register(
        &mut self,
        users: &UserRepository,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Option<User> {
        match users.find_by_email(email).await {
            Ok(Some(_)) => {
                tracing::debug!("An account with this email already exists");
                return None;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Registration pre-check failed: {}", e);
                return None;
            }
        }

        let user = User::new(name, email, password, role);
        match users.create(&user).await {
            Ok(created) => Some(created),
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                None
            }
        }
    }

    /// Replaces the current user and its snapshot with the supplied value.
    ///
    /// Refreshes local session state only; the caller is responsible for
    /// having already persisted the change through the data access layer.
    pub fn update_user(&mut self, user: User) {
        self.storage.save(&user);
        self.current_user = Some(user);
    }
}
