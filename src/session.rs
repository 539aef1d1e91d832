//! Login flow and authenticated sessions
//!
//! `SessionManager::new_session` drives the bounded-retry username/password
//! exchange over a terminal. Success yields a [`Session`] pairing the
//! authenticated identity with the terminal and the shared collaborators;
//! exhausting the allowed attempts yields `None`, never a half-authenticated
//! state.

use std::sync::Arc;

use uuid::Uuid;
use zeroize::Zeroize;

use crate::config::LoginConfig;
use crate::fs::Namespace;
use crate::security::{Identity, SecurityError, SecuritySystem};
use crate::shell::Shell;
use crate::terminal::Terminal;

/// Gate in front of the shell: owns the retry policy and the collaborator
/// handles every session shares.
pub struct SessionManager {
    security: Arc<dyn SecuritySystem>,
    namespace: Arc<Namespace>,
    config: LoginConfig,
}

impl SessionManager {
    /// Create a session manager with the default login policy.
    pub fn new(security: Arc<dyn SecuritySystem>, namespace: Arc<Namespace>) -> Self {
        Self::with_config(security, namespace, LoginConfig::default())
    }

    /// Create a session manager with an explicit login policy.
    pub fn with_config(
        security: Arc<dyn SecuritySystem>,
        namespace: Arc<Namespace>,
        config: LoginConfig,
    ) -> Self {
        Self {
            security,
            namespace,
            config,
        }
    }

    /// Run the login exchange on the given terminal.
    ///
    /// Each attempt prompts for a username (echo on), then either a new
    /// password (for a user without one) or the password, both with echo
    /// off. Echo is restored and a newline emitted before the credential
    /// authority is consulted, so follow-up messages render normally even
    /// on failure. Setting a new password does not authenticate; the user
    /// logs in with it on a later attempt.
    ///
    /// Returns `None` after the configured number of failed attempts.
    pub fn new_session(&self, terminal: Arc<Terminal>) -> Option<Session> {
        let mut tries = 0;
        while tries < self.config.max_attempts {
            match self.login_attempt(&terminal) {
                Ok(Some(identity)) => {
                    let session = Session::new(
                        identity,
                        terminal.clone(),
                        self.security.clone(),
                        self.namespace.clone(),
                    );
                    info!(
                        session = %session.id(),
                        user = session.identity().username(),
                        "session established"
                    );
                    return Some(session);
                }
                // New password stored; back to the login prompt.
                Ok(None) => continue,
                Err(e) => {
                    tries += 1;
                    terminal.write_line(&e.to_string());
                    if tries < self.config.max_attempts {
                        terminal.write_line("Try again...");
                    } else {
                        terminal.write_line("Too many failed attempts, goodbye!");
                    }
                }
            }
        }

        info!(attempts = tries, "login abandoned");
        None
    }

    /// One pass through the state machine: `Ok(Some)` on authentication,
    /// `Ok(None)` after a successful new-password set, `Err` on any failure.
    fn login_attempt(&self, terminal: &Terminal) -> Result<Option<Identity>, SecurityError> {
        terminal.set_echo(true);
        terminal.write("username: ");
        let username = terminal.read_line();

        if self.security.needs_password(&username)? {
            let mut password = self.read_secret(terminal, "new password: ");
            let result = self.security.set_password(&username, &password);
            password.zeroize();
            result.map(|()| None)
        } else {
            let mut password = self.read_secret(terminal, "password: ");
            let result = self.security.authenticate(&username, &password);
            password.zeroize();
            result.map(Some)
        }
    }

    /// Prompt with echo suppressed; echo is back on before this returns.
    fn read_secret(&self, terminal: &Terminal, prompt: &str) -> String {
        terminal.write(prompt);
        terminal.set_echo(false);
        let secret = terminal.read_line();
        terminal.set_echo(true);
        terminal.write_line("");
        secret
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("max_attempts", &self.config.max_attempts)
            .finish_non_exhaustive()
    }
}

/// One authenticated shell run: identity, terminal, and collaborators.
///
/// Discarded when the command loop exits.
pub struct Session {
    id: Uuid,
    identity: Identity,
    terminal: Arc<Terminal>,
    security: Arc<dyn SecuritySystem>,
    namespace: Arc<Namespace>,
}

impl Session {
    fn new(
        identity: Identity,
        terminal: Arc<Terminal>,
        security: Arc<dyn SecuritySystem>,
        namespace: Arc<Namespace>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            identity,
            terminal,
            security,
            namespace,
        }
    }

    /// Unique id for this session, used in log correlation.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The authenticated user.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// The terminal this session runs on.
    pub fn terminal(&self) -> &Terminal {
        &self.terminal
    }

    /// The namespace commands operate on.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// The credential authority behind this session.
    pub fn security(&self) -> &dyn SecuritySystem {
        &*self.security
    }

    /// Build the user's preferred shell and run it to completion.
    ///
    /// Takes over the calling thread; returns when the user exits.
    pub fn run(&self) {
        let shell = Shell::for_name(self.identity.shell());
        self.run_with(&shell);
    }

    /// Run a caller-configured shell for this session.
    pub fn run_with(&self, shell: &Shell) {
        shell.run(self);
        info!(session = %self.id, "session ended");
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user", &self.identity.username())
            .finish_non_exhaustive()
    }
}
