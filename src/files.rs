//! Executable-path discovery and file search.
//!
//! The search functions look for a file by exact name, either in a single
//! directory, in a directory searched depth-first, or across an ordered list
//! of directories; the first match wins. Recursion is driven by an explicit
//! work-list, so deeply nested trees cannot overflow the stack.
//!
//! "Not found" is a normal outcome (`Option`/`None`) everywhere except
//! [`locate_file`], the convenience variant that raises
//! [`FindFileError::NotFound`] instead. Unreadable directories are not
//! errors either: a flat search of a missing directory is simply `None`, and
//! the recursive walk skips subtrees it cannot open.
//!
//! ```no_run
//! use syskit::files;
//!
//! let dir = files::executable_dir()?;
//! if let Some(config) = files::find_file_recursive("config.toml", &dir) {
//!     println!("found {}", config.display());
//! }
//! # Ok::<(), std::io::Error>(())
//! ```

use std::ffi::{OsStr, OsString};
use std::io;
use std::path::{Path, PathBuf};

/// Error raised by [`locate_file`] when no searched directory contains the
/// file.
#[derive(Debug, thiserror::Error)]
pub enum FindFileError {
    #[error("file not found in specified locations")]
    NotFound,
}

/// Full path of the current executable.
pub fn executable_path() -> io::Result<PathBuf> {
    std::env::current_exe()
}

/// Directory containing the current executable.
pub fn executable_dir() -> io::Result<PathBuf> {
    let mut path = executable_path()?;
    path.pop();
    Ok(path)
}

/// File name of the current executable.
pub fn executable_name() -> io::Result<OsString> {
    let path = executable_path()?;
    path.file_name()
        .map(OsStr::to_os_string)
        .ok_or_else(|| io::Error::other("executable path has no file name"))
}

/// Absolute form of `path`, resolved against the current directory.
///
/// Purely lexical apart from reading the current directory; symlinks are not
/// resolved and the path need not exist.
pub fn full_path(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Absolute form of the directory containing `path`.
pub fn full_dir(path: impl AsRef<Path>) -> io::Result<PathBuf> {
    let mut absolute = full_path(path)?;
    absolute.pop();
    Ok(absolute)
}

/// Searches `directory` (flat, no descent) for a file named exactly `name`.
///
/// Returns the full path of the first match. A missing or unreadable
/// directory yields `None`.
pub fn find_file(name: impl AsRef<OsStr>, directory: impl AsRef<Path>) -> Option<PathBuf> {
    let name = name.as_ref();
    let entries = std::fs::read_dir(directory.as_ref()).ok()?;
    for entry in entries.flatten() {
        if entry.file_name() != name {
            continue;
        }
        let path = entry.path();
        if path.is_file() {
            return Some(path);
        }
    }
    None
}

/// Searches `directory` and its subdirectories, depth-first, for a file
/// named exactly `name`.
///
/// The walk uses an explicit work-list rather than call recursion.
/// Subdirectories that cannot be read are logged and skipped.
pub fn find_file_recursive(name: impl AsRef<OsStr>, directory: impl AsRef<Path>) -> Option<PathBuf> {
    let name = name.as_ref();
    let mut pending = vec![directory.as_ref().to_path_buf()];

    while let Some(next) = pending.pop() {
        let entries = match std::fs::read_dir(&next) {
            Ok(entries) => entries,
            Err(e) => {
                crate::logging::log(&format!(
                    "find_file: skipping unreadable directory {}: {e}",
                    next.display()
                ));
                continue;
            }
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                pending.push(path);
            } else if entry.file_name() == name && path.is_file() {
                return Some(path);
            }
        }
    }
    None
}

/// Searches a list of directories, in order, for a file named exactly
/// `name`; the first match wins.
pub fn find_file_in<I, P>(name: impl AsRef<OsStr>, directories: I, recursive: bool) -> Option<PathBuf>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let name = name.as_ref();
    for directory in directories {
        let found = if recursive {
            find_file_recursive(name, directory)
        } else {
            find_file(name, directory)
        };
        if found.is_some() {
            return found;
        }
    }
    None
}

/// Like [`find_file_in`], but raises [`FindFileError::NotFound`] when no
/// searched directory contains the file.
pub fn locate_file<I, P>(
    name: impl AsRef<OsStr>,
    directories: I,
    recursive: bool,
) -> Result<PathBuf, FindFileError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let name = name.as_ref();
    find_file_in(name, directories, recursive).ok_or_else(|| {
        crate::logging::log(&format!(
            "locate_file: {} not found in any searched directory",
            name.to_string_lossy()
        ));
        FindFileError::NotFound
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    // A throwaway directory tree:
    //   <tmp>/syskit-files-<pid>-<n>/
    //     decoy/
    //     nested/inner/needle.txt
    //     surface.txt
    struct TestTree {
        root: PathBuf,
    }

    impl TestTree {
        fn create() -> Self {
            static UNIQUE: AtomicU32 = AtomicU32::new(0);
            let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
            let root = std::env::temp_dir().join(format!(
                "syskit-files-{}-{n}",
                std::process::id()
            ));
            fs::create_dir_all(root.join("decoy")).unwrap();
            fs::create_dir_all(root.join("nested/inner")).unwrap();
            fs::write(root.join("nested/inner/needle.txt"), b"x").unwrap();
            fs::write(root.join("surface.txt"), b"y").unwrap();
            TestTree { root }
        }
    }

    impl Drop for TestTree {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.root);
        }
    }

    #[test]
    fn flat_search_finds_files_at_the_surface() {
        let tree = TestTree::create();
        let found = find_file("surface.txt", &tree.root).unwrap();
        assert_eq!(found, tree.root.join("surface.txt"));
    }

    #[test]
    fn flat_search_does_not_descend() {
        let tree = TestTree::create();
        assert_eq!(find_file("needle.txt", &tree.root), None);
    }

    #[test]
    fn recursive_search_descends() {
        let tree = TestTree::create();
        let found = find_file_recursive("needle.txt", &tree.root).unwrap();
        assert_eq!(found, tree.root.join("nested/inner/needle.txt"));
    }

    #[test]
    fn directory_entries_are_not_matches() {
        let tree = TestTree::create();
        assert_eq!(find_file("decoy", &tree.root), None);
        assert_eq!(find_file_recursive("decoy", &tree.root), None);
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tree = TestTree::create();
        let gone = tree.root.join("no-such-dir");
        assert_eq!(find_file("surface.txt", &gone), None);
        assert_eq!(find_file_recursive("surface.txt", &gone), None);
    }

    #[test]
    fn ordered_list_returns_the_first_match() {
        let tree = TestTree::create();
        let dirs = [tree.root.join("decoy"), tree.root.clone()];
        let found = find_file_in("surface.txt", &dirs, false).unwrap();
        assert_eq!(found, tree.root.join("surface.txt"));
    }

    #[test]
    fn locate_raises_not_found() {
        let tree = TestTree::create();
        let err = locate_file("no-such-file.bin", [&tree.root], true).unwrap_err();
        assert!(matches!(err, FindFileError::NotFound));
        assert_eq!(
            err.to_string(),
            "file not found in specified locations"
        );

        let found = locate_file("needle.txt", [&tree.root], true).unwrap();
        assert_eq!(found, tree.root.join("nested/inner/needle.txt"));
    }

    #[test]
    fn executable_path_points_at_a_real_file() {
        let path = executable_path().unwrap();
        assert!(path.is_file());
        assert!(executable_dir().unwrap().is_dir());
        let name = executable_name().unwrap();
        assert_eq!(path.file_name().unwrap(), name.as_os_str());
    }

    #[test]
    fn full_path_resolves_relative_names() {
        let absolute = full_path("some-relative-name.txt").unwrap();
        assert!(absolute.is_absolute());
        assert!(absolute.ends_with("some-relative-name.txt"));

        let dir = full_dir("some-relative-name.txt").unwrap();
        assert_eq!(Some(dir.as_path()), absolute.parent());
    }
}
