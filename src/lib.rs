//! ttyshell - a line-disciplined terminal front end with login and shell
//!
//! This library provides an interactive text-terminal stack for a
//! line-oriented command shell: a raw character device feeds interrupts to
//! a line discipline, completed lines cross a blocking queue to the session
//! thread, a bounded-retry login gates access, and a registry-driven
//! dispatch loop executes commands against a hierarchical namespace.
//!
//! ## Module Organization
//!
//! - [`device`] - Raw device contract: interrupts in, characters out
//! - [`terminal`] - Line discipline, completed-line queue, terminal façade
//! - [`session`] - Bounded-retry login flow and authenticated sessions
//! - [`security`] - Credential authority trait and in-memory user table
//! - [`shell`] - Command registry, dispatch loop, path canonicalization
//! - [`fs`] - In-memory hierarchical namespace
//! - [`config`] - TOML configuration (login policy, prompt)
//! - [`mod@error`] - Error types and Result alias
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use ttyshell::{Namespace, SessionManager, Terminal, UserDb};
//!
//! # fn demo(device: Arc<dyn ttyshell::TerminalDevice>) {
//! let namespace = Arc::new(Namespace::new());
//! let users = Arc::new(UserDb::with_namespace(namespace.clone()));
//! users.add_user("alice").expect("provisioning failed");
//!
//! let terminal = Arc::new(Terminal::new(device));
//! terminal.connect();
//!
//! let manager = SessionManager::new(users, namespace);
//! if let Some(session) = manager.new_session(terminal) {
//!     session.run(); // returns when the user exits
//! }
//! # }
//! ```
//!
//! ## Threading Model
//!
//! The device's interrupt source runs on its own thread and is the sole
//! writer into the completed-line queue; the session thread is the sole
//! reader, blocking in `Terminal::read_line` with no polling. Echo state is
//! visible to the very next interrupt after a store. Disconnecting a
//! terminal discards buffered lines but does not unblock a pending reader.

#[macro_use]
extern crate tracing;

pub mod config;
pub mod device;
pub mod error;
pub mod fs;
pub mod security;
pub mod session;
pub mod shell;
pub mod terminal;

// Re-exports for core functionality
pub use config::Config;
pub use device::{Interrupt, InterruptHandler, TerminalDevice};
pub use error::{Error, Result};
pub use fs::{EntryKind, Namespace};
pub use security::{Identity, SecuritySystem, UserDb};
pub use session::{Session, SessionManager};
pub use shell::{Command, CommandRegistry, Shell, ShellContext};
pub use terminal::{LineDiscipline, LineQueue, Terminal};

// Version information
/// The current version of ttyshell from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The crate name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Initialize ttyshell with default settings
///
/// Loads configuration from the platform config directory, falling back to
/// defaults when no file is present.
///
/// # Errors
///
/// Returns an error if a configuration file exists but fails to load or
/// validate.
pub fn init() -> Result<Config> {
    info!("Initializing {} v{}", NAME, VERSION);
    let config = Config::load_default()?;
    Ok(config)
}
