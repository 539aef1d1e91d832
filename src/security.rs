//! Credential authority: users, passwords, identities
//!
//! The login flow talks to a [`SecuritySystem`]; the crate ships an
//! in-memory [`UserDb`] implementation. Provisioning a user also creates the
//! home directory when a namespace is attached. On-disk credential storage
//! is out of scope.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::fs::Namespace;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LEN: usize = 3;

/// Default preferred shell name assigned to new users.
pub const DEFAULT_SHELL: &str = "tsh";

/// Errors from the credential authority.
#[derive(Debug, thiserror::Error)]
pub enum SecurityError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("User already exists: {0}")]
    UserExists(String),

    #[error("Invalid password for user: {0}")]
    WrongPassword(String),

    #[error("Password must be at least {MIN_PASSWORD_LEN} characters long")]
    PasswordTooShort,
}

/// Authenticated-user handle produced by a successful credential check.
///
/// Immutable after creation; carries everything the session layer needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    username: String,
    home_dir: String,
    shell: String,
}

impl Identity {
    /// Create an identity handle.
    pub fn new(
        username: impl Into<String>,
        home_dir: impl Into<String>,
        shell: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            home_dir: home_dir.into(),
            shell: shell.into(),
        }
    }

    /// Login name.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Home directory path.
    pub fn home_dir(&self) -> &str {
        &self.home_dir
    }

    /// Preferred shell (command set) name.
    pub fn shell(&self) -> &str {
        &self.shell
    }
}

/// Contract the login flow consumes.
pub trait SecuritySystem: Send + Sync {
    /// Whether the user exists but has no password set yet.
    fn needs_password(&self, username: &str) -> Result<bool, SecurityError>;

    /// Store a new password for the user, enforcing the password rules.
    fn set_password(&self, username: &str, password: &str) -> Result<(), SecurityError>;

    /// Verify username and password, yielding the user's identity.
    fn authenticate(&self, username: &str, password: &str) -> Result<Identity, SecurityError>;
}

#[derive(Debug, Clone)]
struct User {
    password: String,
    home_dir: String,
    shell: String,
}

/// In-memory user table.
///
/// New users start with an empty password and set one on first login.
#[derive(Default)]
pub struct UserDb {
    users: Mutex<HashMap<String, User>>,
    namespace: Option<Arc<Namespace>>,
}

impl UserDb {
    /// Create an empty user table with no namespace attached.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a user table that provisions home directories in `namespace`.
    pub fn with_namespace(namespace: Arc<Namespace>) -> Self {
        Self {
            users: Mutex::new(HashMap::new()),
            namespace: Some(namespace),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Provision a new user with an empty password, a home directory of
    /// `/users/<name>`, and the default shell.
    ///
    /// Creates the home directory when a namespace is attached.
    pub fn add_user(&self, username: &str) -> Result<Identity, SecurityError> {
        let mut users = self.lock();
        if users.contains_key(username) {
            return Err(SecurityError::UserExists(username.to_string()));
        }

        let home_dir = format!("/users/{username}");
        users.insert(
            username.to_string(),
            User {
                password: String::new(),
                home_dir: home_dir.clone(),
                shell: DEFAULT_SHELL.to_string(),
            },
        );
        drop(users);

        if let Some(ns) = &self.namespace {
            if let Err(e) = ns.make_dirs(&home_dir) {
                warn!(user = username, error = %e, "failed to create home directory");
            }
        }

        info!(user = username, home = %home_dir, "user provisioned");
        Ok(Identity::new(username, home_dir, DEFAULT_SHELL))
    }

    fn identity_of(username: &str, user: &User) -> Identity {
        Identity::new(username, user.home_dir.clone(), user.shell.clone())
    }
}

impl SecuritySystem for UserDb {
    fn needs_password(&self, username: &str) -> Result<bool, SecurityError> {
        let users = self.lock();
        let user = users
            .get(username)
            .ok_or_else(|| SecurityError::UnknownUser(username.to_string()))?;
        Ok(user.password.is_empty())
    }

    fn set_password(&self, username: &str, password: &str) -> Result<(), SecurityError> {
        let mut users = self.lock();
        let user = users
            .get_mut(username)
            .ok_or_else(|| SecurityError::UnknownUser(username.to_string()))?;

        if password.trim().is_empty() || password.len() < MIN_PASSWORD_LEN {
            return Err(SecurityError::PasswordTooShort);
        }

        user.password = password.to_string();
        info!(user = username, "password set");
        Ok(())
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<Identity, SecurityError> {
        let users = self.lock();
        let user = users
            .get(username)
            .ok_or_else(|| SecurityError::UnknownUser(username.to_string()))?;

        if user.password != password {
            debug!(user = username, "authentication rejected");
            return Err(SecurityError::WrongPassword(username.to_string()));
        }

        Ok(Self::identity_of(username, user))
    }
}

impl std::fmt::Debug for UserDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDb")
            .field("users", &self.lock().len())
            .finish_non_exhaustive()
    }
}
