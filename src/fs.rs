//! In-memory hierarchical namespace
//!
//! The shell commands consume this interface: path lookup yielding
//! directory-like or file-like entries, directory enumeration and
//! create/delete, entry moves, and byte-range file reads. Paths are
//! absolute, `/`-separated strings; persistence is out of scope.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Errors from namespace operations.
#[derive(Debug, thiserror::Error)]
pub enum FsError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Entry already exists: {0}")]
    AlreadyExists(String),

    #[error("The root directory cannot be removed or moved")]
    RootImmutable,
}

/// What a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File,
}

#[derive(Debug)]
enum Node {
    Dir(BTreeMap<String, Node>),
    File(Vec<u8>),
}

impl Node {
    fn kind(&self) -> EntryKind {
        match self {
            Node::Dir(_) => EntryKind::Directory,
            Node::File(_) => EntryKind::File,
        }
    }
}

/// Thread-safe in-memory directory tree rooted at `/`.
#[derive(Debug)]
pub struct Namespace {
    root: Mutex<Node>,
}

impl Default for Namespace {
    fn default() -> Self {
        Self::new()
    }
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Split an absolute path into its parent's segments and the final name.
fn split_parent(path: &str) -> Result<(Vec<&str>, &str), FsError> {
    let mut parts = segments(path);
    let name = parts.pop().ok_or(FsError::RootImmutable)?;
    Ok((parts, name))
}

impl Namespace {
    /// Create a namespace containing only the root directory.
    pub fn new() -> Self {
        Self {
            root: Mutex::new(Node::Dir(BTreeMap::new())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Node> {
        self.root.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn node<'a>(root: &'a Node, parts: &[&str]) -> Option<&'a Node> {
        let mut current = root;
        for part in parts {
            match current {
                Node::Dir(children) => current = children.get(*part)?,
                Node::File(_) => return None,
            }
        }
        Some(current)
    }

    fn dir_mut<'a>(
        root: &'a mut Node,
        parts: &[&str],
        path: &str,
    ) -> Result<&'a mut BTreeMap<String, Node>, FsError> {
        let mut current = root;
        for part in parts {
            match current {
                Node::Dir(children) => {
                    current = children
                        .get_mut(*part)
                        .ok_or_else(|| FsError::NotFound(path.to_string()))?;
                }
                Node::File(_) => return Err(FsError::NotADirectory(path.to_string())),
            }
        }
        match current {
            Node::Dir(children) => Ok(children),
            Node::File(_) => Err(FsError::NotADirectory(path.to_string())),
        }
    }

    /// Look up a path. `None` when no entry exists there.
    pub fn find(&self, path: &str) -> Option<EntryKind> {
        let root = self.lock();
        Self::node(&root, &segments(path)).map(Node::kind)
    }

    /// Enumerate a directory: subdirectory names, then file names.
    pub fn list(&self, path: &str) -> Result<(Vec<String>, Vec<String>), FsError> {
        let root = self.lock();
        let node =
            Self::node(&root, &segments(path)).ok_or_else(|| FsError::NotFound(path.to_string()))?;
        let Node::Dir(children) = node else {
            return Err(FsError::NotADirectory(path.to_string()));
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for (name, child) in children {
            match child.kind() {
                EntryKind::Directory => dirs.push(name.clone()),
                EntryKind::File => files.push(name.clone()),
            }
        }
        Ok((dirs, files))
    }

    /// Create a directory; the parent must already exist.
    pub fn create_dir(&self, path: &str) -> Result<(), FsError> {
        let (parent, name) = split_parent(path)?;
        let mut root = self.lock();
        let children = Self::dir_mut(&mut root, &parent, path)?;
        if children.contains_key(name) {
            return Err(FsError::AlreadyExists(path.to_string()));
        }
        children.insert(name.to_string(), Node::Dir(BTreeMap::new()));
        Ok(())
    }

    /// Create a directory and any missing ancestors. Used by provisioning.
    pub fn make_dirs(&self, path: &str) -> Result<(), FsError> {
        let mut root = self.lock();
        let mut current = &mut *root;
        for part in segments(path) {
            match current {
                Node::Dir(children) => {
                    current = children
                        .entry(part.to_string())
                        .or_insert_with(|| Node::Dir(BTreeMap::new()));
                }
                Node::File(_) => return Err(FsError::NotADirectory(path.to_string())),
            }
        }
        match current {
            Node::Dir(_) => Ok(()),
            Node::File(_) => Err(FsError::NotADirectory(path.to_string())),
        }
    }

    /// Remove a directory and its entire subtree.
    pub fn remove_dir(&self, path: &str) -> Result<(), FsError> {
        let (parent, name) = split_parent(path)?;
        let mut root = self.lock();
        let children = Self::dir_mut(&mut root, &parent, path)?;
        match children.get(name) {
            None => Err(FsError::NotFound(path.to_string())),
            Some(Node::File(_)) => Err(FsError::NotADirectory(path.to_string())),
            Some(Node::Dir(_)) => {
                children.remove(name);
                Ok(())
            }
        }
    }

    /// Move an entry into an existing destination directory, keeping its name.
    pub fn move_entry(&self, src: &str, dest_dir: &str) -> Result<(), FsError> {
        let (src_parent, name) = split_parent(src)?;
        let mut root = self.lock();

        // Destination must resolve to a directory before the source is detached.
        match Self::node(&root, &segments(dest_dir)) {
            None => return Err(FsError::NotFound(dest_dir.to_string())),
            Some(Node::File(_)) => return Err(FsError::NotADirectory(dest_dir.to_string())),
            Some(Node::Dir(_)) => {}
        }

        let src_children = Self::dir_mut(&mut root, &src_parent, src)?;
        let node = src_children
            .remove(name)
            .ok_or_else(|| FsError::NotFound(src.to_string()))?;

        // Re-resolve the destination after detaching: moving a directory
        // into its own subtree must fail without losing the entry.
        match Self::dir_mut(&mut root, &segments(dest_dir), dest_dir) {
            Ok(dest_children) => {
                dest_children.insert(name.to_string(), node);
                Ok(())
            }
            Err(e) => {
                if let Ok(src_children) = Self::dir_mut(&mut root, &src_parent, src) {
                    src_children.insert(name.to_string(), node);
                }
                Err(e)
            }
        }
    }

    /// Create or replace a file with the given contents.
    pub fn write_file(&self, path: &str, data: &[u8]) -> Result<(), FsError> {
        let (parent, name) = split_parent(path)?;
        let mut root = self.lock();
        let children = Self::dir_mut(&mut root, &parent, path)?;
        if let Some(Node::Dir(_)) = children.get(name) {
            return Err(FsError::NotAFile(path.to_string()));
        }
        children.insert(name.to_string(), Node::File(data.to_vec()));
        Ok(())
    }

    /// Byte length of a file.
    pub fn file_len(&self, path: &str) -> Result<u64, FsError> {
        let root = self.lock();
        match Self::node(&root, &segments(path)) {
            None => Err(FsError::NotFound(path.to_string())),
            Some(Node::Dir(_)) => Err(FsError::NotAFile(path.to_string())),
            Some(Node::File(data)) => Ok(data.len() as u64),
        }
    }

    /// Open a file for byte-range reads.
    pub fn open<'a>(&'a self, path: &str) -> Result<FileStream<'a>, FsError> {
        let root = self.lock();
        match Self::node(&root, &segments(path)) {
            None => Err(FsError::NotFound(path.to_string())),
            Some(Node::Dir(_)) => Err(FsError::NotAFile(path.to_string())),
            Some(Node::File(_)) => Ok(FileStream {
                ns: self,
                path: path.to_string(),
            }),
        }
    }
}

/// Open handle on a file-like entry.
///
/// Reads re-resolve the path, so a concurrently deleted entry fails with
/// [`FsError::NotFound`] instead of yielding stale bytes.
#[derive(Debug)]
pub struct FileStream<'a> {
    ns: &'a Namespace,
    path: String,
}

impl FileStream<'_> {
    /// Read up to `count` bytes starting at `offset`, clamped to the file end.
    pub fn read(&self, offset: u64, count: usize) -> Result<Vec<u8>, FsError> {
        let root = self.ns.lock();
        match Namespace::node(&root, &segments(&self.path)) {
            None => Err(FsError::NotFound(self.path.clone())),
            Some(Node::Dir(_)) => Err(FsError::NotAFile(self.path.clone())),
            Some(Node::File(data)) => {
                let start = (offset as usize).min(data.len());
                let end = start.saturating_add(count).min(data.len());
                Ok(data[start..end].to_vec())
            }
        }
    }
}
