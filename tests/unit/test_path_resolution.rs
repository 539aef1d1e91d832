//! Unit tests for path canonicalization
//!
//! Exercises the resolution rules commands rely on: absolute pass-through,
//! `.` and `..` handling, and root-escape rejection.

use ttyshell::shell::{resolve_path, PathError};

#[test]
fn dot_dot_yields_the_parent() {
    assert_eq!(resolve_path("/users/alice", "..").as_deref(), Ok("/users"));
}

#[test]
fn escaping_the_root_is_an_explicit_error() {
    assert_eq!(
        resolve_path("/users/alice", "../../x"),
        Err(PathError::NoParent)
    );
}

#[test]
fn dot_prefix_resolves_in_place() {
    assert_eq!(
        resolve_path("/users/alice", "./sub").as_deref(),
        Ok("/users/alice/sub")
    );
}

#[test]
fn absolute_input_ignores_the_current_directory() {
    assert_eq!(resolve_path("/users/alice", "/etc").as_deref(), Ok("/etc"));
    assert_eq!(resolve_path("/x/y/z", "/etc").as_deref(), Ok("/etc"));
}

#[test]
fn mixed_traversal_resolves_segment_by_segment() {
    assert_eq!(
        resolve_path("/users/alice", "../bob/./projects").as_deref(),
        Ok("/users/bob/projects")
    );
}

#[test]
fn resolution_from_the_root() {
    assert_eq!(resolve_path("/", "etc").as_deref(), Ok("/etc"));
    assert_eq!(resolve_path("/", ".").as_deref(), Ok("/"));
    assert_eq!(resolve_path("/", ".."), Err(PathError::NoParent));
}

#[test]
fn trailing_dot_dot_chains() {
    assert_eq!(
        resolve_path("/a/b/c/d", "../../..").as_deref(),
        Ok("/a")
    );
    assert_eq!(resolve_path("/a/b/c/d", "../../../.."), Err(PathError::NoParent));
}
