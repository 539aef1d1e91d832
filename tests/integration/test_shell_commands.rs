//! Integration tests for the command dispatch loop
//!
//! Each test logs in as a seeded user, queues a command script, runs the
//! shell to completion, and inspects the recorded device output. Login
//! chatter is cleared so assertions see only shell output.

#[path = "../test_utils/mock_device.rs"]
mod mock_device;

use std::sync::Arc;

use mock_device::MockDevice;
use ttyshell::{Namespace, SecuritySystem, SessionManager, Terminal, UserDb};

/// Log in as `alice`, run `commands` through the shell, return device output.
fn run_session(commands: &[&str]) -> String {
    let namespace = Arc::new(Namespace::new());
    namespace.make_dirs("/etc").expect("seeding /etc failed");
    namespace
        .write_file("/etc/motd", b"Welcome to ttyshell.\n")
        .expect("seeding motd failed");

    let users = Arc::new(UserDb::with_namespace(namespace.clone()));
    users.add_user("alice").expect("add_user failed");
    users.set_password("alice", "secret").expect("set failed");

    let device = MockDevice::new();
    let terminal = Arc::new(Terminal::new(device.clone()));
    terminal.connect();

    device.type_line("alice");
    device.type_line("secret");
    for command in commands {
        device.type_line(command);
    }
    device.type_line("exit");

    let manager = SessionManager::new(users, namespace);
    let session = manager
        .new_session(terminal)
        .expect("scripted login failed");

    device.clear_output();
    session.run();
    device.output()
}

#[test]
fn prompt_shows_the_home_directory() {
    let output = run_session(&[]);
    assert!(output.starts_with("/users/alice>"));
    assert!(output.contains("Bye!"));
}

#[test]
fn pwd_prints_the_current_directory() {
    let output = run_session(&["pwd"]);
    assert!(output.contains("/users/alice\n"));
}

#[test]
fn cd_moves_and_updates_the_prompt() {
    let output = run_session(&["cd ..", "pwd"]);
    assert!(output.contains("/users>"));
    assert!(output.contains("/users\n"));
}

#[test]
fn cd_accepts_absolute_paths() {
    let output = run_session(&["cd /etc", "pwd"]);
    assert!(output.contains("/etc\n"));
}

#[test]
fn cd_rejects_missing_directories() {
    let output = run_session(&["cd nowhere", "pwd"]);
    assert!(output.contains("Error: Directory not found: nowhere"));
    assert!(output.contains("usage: cd <directory>"));
    // Failed cd leaves the current directory unchanged.
    assert!(output.contains("/users/alice\n"));
}

#[test]
fn cd_rejects_files() {
    let output = run_session(&["cd /etc/motd"]);
    assert!(output.contains("Error: Path must be a directory: /etc/motd"));
}

#[test]
fn cd_cannot_escape_the_root() {
    let output = run_session(&["cd ../..", "pwd"]);
    assert!(output.contains("Error: No parent directory!"));
    assert!(output.contains("/users/alice\n"));
}

#[test]
fn cd_with_wrong_arity_reports_usage() {
    let output = run_session(&["cd"]);
    assert!(output.contains("Error: Expect only 1 argument!"));
    assert!(output.contains("usage: cd <directory>"));
}

#[test]
fn unknown_command_keeps_the_loop_alive() {
    let output = run_session(&["bogus", "pwd"]);
    assert!(output.contains("Unknown command: bogus"));
    // The loop kept running and the directory is untouched.
    assert!(output.contains("/users/alice\n"));
}

#[test]
fn mkdir_then_ls_shows_the_directory() {
    let output = run_session(&["mkdir docs", "ls"]);
    assert!(output.contains("\t/docs/"));
}

#[test]
fn mkdir_rejects_existing_entries() {
    let output = run_session(&["mkdir docs", "mkdir docs"]);
    assert!(output.contains("Error: Directory already exists: docs"));
    assert!(output.contains("usage: mkdir <directory>"));
}

#[test]
fn rmdir_removes_a_directory() {
    let output = run_session(&["mkdir docs", "rmdir docs", "ls"]);
    assert!(!output.contains("\t/docs/"));
}

#[test]
fn rmdir_rejects_files() {
    let output = run_session(&["rmdir /etc/motd"]);
    assert!(output.contains("Error: Path must be a directory: /etc/motd"));
}

#[test]
fn ls_lists_an_explicit_directory() {
    let output = run_session(&["ls /etc"]);
    assert!(output.contains("\tmotd"));
}

#[test]
fn head_prints_leading_bytes() {
    let output = run_session(&["head /etc/motd 7"]);
    assert!(output.contains("Welcome"));
    assert!(!output.contains("Welcome to"));
}

#[test]
fn tail_prints_trailing_bytes() {
    let output = run_session(&["tail /etc/motd 9"]);
    assert!(output.contains("tyshell."));
    assert!(!output.contains("Welcome"));
}

#[test]
fn head_rejects_a_bad_count() {
    let output = run_session(&["head /etc/motd ten"]);
    assert!(output.contains("Error: Invalid count: ten"));
    assert!(output.contains("usage: head <file> [count]"));
}

#[test]
fn head_requires_a_file() {
    let output = run_session(&["head /etc"]);
    assert!(output.contains("Error: File not found: /etc"));
}

#[test]
fn wc_counts_lines_words_and_characters() {
    let output = run_session(&["wc /etc/motd"]);
    assert!(output.contains("1 lines  3 words  21 characters\tmotd"));
}

#[test]
fn mv_relocates_an_entry() {
    let output = run_session(&["mv /etc/motd .", "ls"]);
    assert!(output.contains("\tmotd"));
}

#[test]
fn mv_requires_an_existing_destination() {
    let output = run_session(&["mv /etc/motd /nowhere"]);
    assert!(output.contains("Error: Destination entry not found: /nowhere"));
    assert!(output.contains("usage: mv <entry> <directory>"));
}

#[test]
fn help_lists_all_commands() {
    let output = run_session(&["help"]);
    for name in [
        "cd", "exit", "head", "help", "ls", "mkdir", "mv", "pwd", "rmdir", "tail", "wc",
    ] {
        assert!(
            output.contains(&format!("{name} - ")),
            "help should list {name}"
        );
    }
}

#[test]
fn help_describes_a_single_command() {
    let output = run_session(&["help pwd"]);
    assert!(output.contains("pwd - Prints the current working directory"));
}

#[test]
fn help_reports_unknown_names() {
    let output = run_session(&["help bogus"]);
    assert!(output.contains("Unknown command: bogus"));
}

#[test]
fn exit_ends_the_loop() {
    let output = run_session(&[]);
    assert_eq!(
        output.matches("Bye!").count(),
        1,
        "exit should run exactly once"
    );
}
