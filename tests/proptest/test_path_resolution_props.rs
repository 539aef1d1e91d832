//! Property-based tests for path canonicalization

use proptest::prelude::*;

use ttyshell::shell::resolve_path;

/// Path segments that are plain names (no separators or traversal tokens).
fn name_segment() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.-]{1,12}".prop_filter("not a traversal token", |s| {
        !matches!(s.as_str(), "." | "..")
    })
}

/// Absolute directory paths like `/a/b/c`, depth 1..=6.
fn abs_dir() -> impl Strategy<Value = String> {
    prop::collection::vec(name_segment(), 1..6).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #[test]
    fn absolute_inputs_pass_through(cwd in abs_dir(), input in abs_dir()) {
        prop_assert_eq!(resolve_path(&cwd, &input), Ok(input));
    }

    #[test]
    fn results_are_absolute_and_normalized(cwd in abs_dir(), input in prop::collection::vec(
        prop_oneof![Just(".".to_string()), Just("..".to_string()), name_segment()], 0..8
    )) {
        let input = input.join("/");
        if let Ok(resolved) = resolve_path(&cwd, &input) {
            prop_assert!(resolved.starts_with('/'));
            for segment in resolved.split('/').skip(1) {
                prop_assert!(segment != "." && segment != "..", "unnormalized: {}", resolved);
                if resolved != "/" {
                    prop_assert!(!segment.is_empty(), "empty segment in {}", resolved);
                }
            }
        }
    }

    #[test]
    fn plain_descent_appends(cwd in abs_dir(), name in name_segment()) {
        let expected = format!("{}/{}", cwd, name);
        prop_assert_eq!(resolve_path(&cwd, &name), Ok(expected));
    }

    #[test]
    fn dot_is_identity(cwd in abs_dir()) {
        prop_assert_eq!(resolve_path(&cwd, "."), Ok(cwd));
    }

    #[test]
    fn descend_then_ascend_is_identity(cwd in abs_dir(), name in name_segment()) {
        let round_trip = format!("{}/..", name);
        prop_assert_eq!(resolve_path(&cwd, &round_trip), Ok(cwd));
    }

    #[test]
    fn enough_dot_dots_always_fail(cwd in abs_dir()) {
        let depth = cwd.split('/').filter(|s| !s.is_empty()).count();
        let escape = vec![".."; depth].join("/");
        prop_assert!(resolve_path(&cwd, &escape).is_err());
    }
}
