//! Command shell: registry, session context, and the dispatch loop
//!
//! A [`Shell`] owns a read-only [`CommandRegistry`] built at construction
//! and drives the prompt/read/dispatch loop over a [`ShellContext`]. Command
//! failures are reported on the terminal together with the command's usage
//! line; the loop itself only ends when a command requests termination.

pub mod commands;
pub mod path;

pub use path::{resolve_path, PathError};

use std::collections::BTreeMap;

use crate::fs::{FsError, Namespace};
use crate::security::{Identity, SecuritySystem};
use crate::session::Session;
use crate::terminal::Terminal;

/// Errors a command handler can surface.
///
/// Rendered on the terminal as `Error: <message>` followed by the failing
/// command's usage line. Never fatal to the dispatch loop.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("Expect only 1 argument!")]
    ExpectOneArg,

    #[error("Expect at least 1 argument!")]
    ExpectAtLeastOneArg,

    #[error("Expect 2 arguments!")]
    ExpectTwoArgs,

    #[error("Invalid count: {0}")]
    InvalidCount(String),

    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    #[error("Path must be a directory: {0}")]
    NotADirectory(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Directory already exists: {0}")]
    DirectoryExists(String),

    #[error("Source entry not found: {0}")]
    SourceNotFound(String),

    #[error("Destination entry not found: {0}")]
    DestinationNotFound(String),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// Per-session state handed to every command invocation.
///
/// The current directory is the only mutable field commands are expected to
/// touch, and `cd` is its only writer.
pub struct ShellContext<'a> {
    /// Terminal for prompting and reporting.
    pub terminal: &'a Terminal,
    /// Namespace all path arguments resolve into.
    pub namespace: &'a Namespace,
    /// Credential authority behind the session.
    pub security: &'a dyn SecuritySystem,
    /// The authenticated user.
    pub identity: &'a Identity,
    /// Registry snapshot, for `help`.
    pub registry: &'a CommandRegistry,
    /// Current working directory, always an absolute path.
    pub cwd: String,
    running: bool,
}

impl ShellContext<'_> {
    /// Signal the dispatch loop to terminate after this command returns.
    pub fn request_exit(&mut self) {
        self.running = false;
    }
}

/// A single shell command behind the registry.
///
/// Handlers receive the full token array, their own name at index 0. On
/// failure they return a [`ShellError`]; the dispatch loop reports it and
/// prints [`usage`](Command::usage) on their behalf.
pub trait Command: Send + Sync {
    /// Registry key, case-sensitive.
    fn name(&self) -> &'static str;

    /// One-line description shown by `help`.
    fn help_text(&self) -> &'static str;

    /// Usage line printed after a failed invocation.
    fn usage(&self) -> &'static str;

    /// Run the command.
    fn execute(&self, args: &[&str], ctx: &mut ShellContext<'_>) -> Result<(), ShellError>;
}

/// Name-keyed command table, built once and read-only afterwards.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<&'static str, Box<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command under its own name, replacing any previous holder.
    pub fn register(&mut self, command: Box<dyn Command>) {
        self.commands.insert(command.name(), command);
    }

    /// Look up a command by exact name.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }

    /// All commands in name order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Command> {
        self.commands.values().map(|c| c.as_ref())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl std::fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// The dispatch loop plus its registry and prompt settings.
pub struct Shell {
    registry: CommandRegistry,
    prompt_suffix: String,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}

impl Shell {
    /// Shell with the full built-in command set.
    pub fn new() -> Self {
        Self::with_registry(commands::builtin_registry())
    }

    /// Shell for a user's preferred command-set name.
    ///
    /// Unrecognized names fall back to the built-in set.
    pub fn for_name(name: &str) -> Self {
        if name != crate::security::DEFAULT_SHELL {
            debug!(shell = name, "unknown shell name, using built-in command set");
        }
        Self::new()
    }

    /// Shell over a caller-assembled registry.
    pub fn with_registry(registry: CommandRegistry) -> Self {
        Self {
            registry,
            prompt_suffix: ">".to_string(),
        }
    }

    /// Registered commands.
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Text appended to the current directory in the prompt.
    pub fn set_prompt_suffix(&mut self, suffix: impl Into<String>) {
        self.prompt_suffix = suffix.into();
    }

    /// Run the read-eval loop for a session. Takes over the calling thread
    /// and returns only when a command requests termination.
    pub fn run(&self, session: &Session) {
        let mut ctx = ShellContext {
            terminal: session.terminal(),
            namespace: session.namespace(),
            security: session.security(),
            identity: session.identity(),
            registry: &self.registry,
            cwd: session.identity().home_dir().to_string(),
            running: true,
        };

        while ctx.running {
            ctx.terminal
                .write(&format!("{}{}", ctx.cwd, self.prompt_suffix));

            let line = ctx.terminal.read_line();
            let line = line.trim();

            // Single-space tokenization, no quoting. Multi-word arguments
            // are unsupported; downstream commands assume single tokens.
            let tokens: Vec<&str> = line.split(' ').collect();
            let name = tokens[0];

            match self.registry.get(name) {
                Some(command) => {
                    debug!(command = name, "dispatching");
                    if let Err(e) = command.execute(&tokens, &mut ctx) {
                        ctx.terminal.write_line(&format!("Error: {e}"));
                        ctx.terminal.write_line(command.usage());
                    }
                }
                None => {
                    ctx.terminal.write_line(&format!("Unknown command: {name}"));
                }
            }
        }
    }
}

impl std::fmt::Debug for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.registry.len())
            .field("prompt_suffix", &self.prompt_suffix)
            .finish()
    }
}
