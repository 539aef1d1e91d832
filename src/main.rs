//! ttyshell demo binary
//!
//! Runs the full stack against standard input/output: stdin bytes become
//! device interrupts, the login flow gates access, and the shell runs over
//! a seeded in-memory namespace. Note that a cooked tty echoes locally, so
//! password echo suppression is only fully visible on a raw device.

use std::collections::VecDeque;
use std::env;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

use anyhow::Context;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use ttyshell::config::Config;
use ttyshell::device::{Interrupt, InterruptHandler, TerminalDevice};
use ttyshell::shell::Shell;
use ttyshell::{Namespace, SecuritySystem, SessionManager, Terminal, UserDb};

/// Command line arguments
#[derive(Debug, Default)]
struct AppArgs {
    /// Configuration file path
    config_path: Option<PathBuf>,
    /// Enable debug logging
    debug: bool,
}

impl AppArgs {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut app_args = AppArgs::default();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args.len() {
                        app_args.config_path = Some(PathBuf::from(&args[i + 1]));
                        i += 1;
                    } else {
                        eprintln!("--config requires a path");
                        process::exit(2);
                    }
                }
                "--debug" | "-d" => app_args.debug = true,
                "--help" | "-h" => {
                    println!("usage: ttyshell [--config <path>] [--debug]");
                    process::exit(0);
                }
                other => {
                    eprintln!("unknown argument: {other}");
                    process::exit(2);
                }
            }
            i += 1;
        }

        app_args
    }
}

#[derive(Default)]
struct StdioInner {
    handler: Mutex<Option<Arc<dyn InterruptHandler>>>,
    pending: Mutex<VecDeque<char>>,
    connected: AtomicBool,
}

/// Terminal device over stdin/stdout.
///
/// A reader thread turns each stdin line into CHAR interrupts plus an
/// ENTER; EOF is delivered as a final `exit` line so the shell can wind
/// down instead of blocking forever.
#[derive(Clone, Default)]
struct StdioDevice {
    inner: Arc<StdioInner>,
}

impl StdioDevice {
    fn new() -> Self {
        Self::default()
    }

    fn raise(&self, interrupt: Interrupt) {
        let handler = self
            .inner
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(handler) = handler {
            handler.handle_interrupt(self, interrupt);
        }
    }

    fn deliver_line(&self, line: &str) {
        for c in line.chars() {
            self.inner
                .pending
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(c);
            self.raise(Interrupt::Char);
        }
        self.raise(Interrupt::Enter);
    }
}

impl TerminalDevice for StdioDevice {
    fn connect(&self) {
        if self.inner.connected.swap(true, Ordering::SeqCst) {
            return;
        }

        let device = self.clone();
        thread::spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                if !device.inner.connected.load(Ordering::SeqCst) {
                    break;
                }
                match line {
                    Ok(line) => device.deliver_line(&line),
                    Err(_) => break,
                }
            }
            debug!("stdin closed, delivering exit");
            device.deliver_line("exit");
        });
    }

    fn disconnect(&self) {
        self.inner.connected.store(false, Ordering::SeqCst);
    }

    fn install_handler(&self, handler: Arc<dyn InterruptHandler>) {
        *self
            .inner
            .handler
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handler);
    }

    fn recv_char(&self) -> Option<char> {
        self.inner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
    }

    fn send_char(&self, c: char) {
        print!("{c}");
        let _ = std::io::stdout().flush();
    }

    fn send_newline(&self) {
        println!();
    }
}

/// Seed a namespace and user table the demo can log into.
fn seed(namespace: &Arc<Namespace>, users: &UserDb) -> anyhow::Result<()> {
    namespace.make_dirs("/etc").context("seeding /etc")?;
    namespace
        .write_file("/etc/motd", b"Welcome to ttyshell.\nType 'help' to begin.\n")
        .context("seeding /etc/motd")?;

    users.add_user("alice").context("provisioning alice")?;
    users.add_user("bob").context("provisioning bob")?;
    users
        .set_password("bob", "builder")
        .context("setting bob's password")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = AppArgs::parse();

    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &args.config_path {
        Some(path) => Config::load(path).context("loading configuration")?,
        None => ttyshell::init().context("initializing")?,
    };

    let namespace = Arc::new(Namespace::new());
    let users = Arc::new(UserDb::with_namespace(namespace.clone()));
    seed(&namespace, &users)?;

    let device = Arc::new(StdioDevice::new());
    let terminal = Arc::new(Terminal::new(device));
    terminal.connect();

    let manager =
        SessionManager::with_config(users, namespace, config.login.clone());

    match manager.new_session(terminal.clone()) {
        Some(session) => {
            info!(user = session.identity().username(), "login complete");
            if let Some(greeting) = &config.shell.greeting {
                session.terminal().write_line(greeting);
            }
            let mut shell = Shell::for_name(session.identity().shell());
            shell.set_prompt_suffix(config.shell.prompt_suffix.clone());
            session.run_with(&shell);
        }
        None => {
            info!("access denied");
        }
    }

    terminal.disconnect();
    Ok(())
}
