//! Path canonicalization shared by every command that takes a path
//!
//! Absolute inputs pass through untouched. Relative inputs are resolved
//! against the current directory segment by segment: `.` is skipped, `..`
//! ascends, anything else descends. Ascending past the last directory above
//! the root is an error, never a silent clamp.

/// Failure to canonicalize a relative path.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("No parent directory!")]
    NoParent,
}

/// Resolve `path` against the absolute directory `cwd`.
///
/// Returns an absolute `/`-separated path. Empty segments from doubled
/// separators are skipped; an input that resolves to nothing yields `/`.
pub fn resolve_path(cwd: &str, path: &str) -> Result<String, PathError> {
    if path.starts_with('/') {
        return Ok(path.to_string());
    }

    let mut parts: Vec<&str> = cwd.split('/').filter(|s| !s.is_empty()).collect();
    for part in path.split('/') {
        match part {
            "" | "." => continue,
            ".." => {
                if parts.len() <= 1 {
                    return Err(PathError::NoParent);
                }
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(format!("/{}", parts.join("/")))
    }
}
