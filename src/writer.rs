use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

pub const POST_EXTENSION: &str = "md";

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Output path {0} exists but is not a directory")]
    NotADirectory(PathBuf),

    #[error("Failed to create output directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {path}: {source}")]
    WriteFile { path: PathBuf, source: io::Error },
}

/// Ensure output directory exists; create it and any parents if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), WriteError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(WriteError::NotADirectory(dir.to_path_buf()));
        }
        return Ok(());
    }

    debug!("Creating output directory {}", dir.display());
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Path of the post file for `slug` inside `dir`.
pub fn post_path(dir: &Path, slug: &str) -> PathBuf {
    dir.join(format!("{}.{}", slug, POST_EXTENSION))
}

/// Write `content` to `{dir}/{slug}.md`, replacing any existing file.
pub fn write_post(dir: &Path, slug: &str, content: &str) -> Result<PathBuf, WriteError> {
    let path = post_path(dir, slug);
    fs::write(&path, content).map_err(|source| WriteError::WriteFile {
        path: path.clone(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_creates_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("content").join("posts");
        ensure_output_dir(&target).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn test_ensure_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("posts");
        ensure_output_dir(&target).unwrap();
        std::fs::write(target.join("keep.md"), "x").unwrap();
        ensure_output_dir(&target).unwrap();
        assert!(target.join("keep.md").exists());
    }

    #[test]
    fn test_ensure_rejects_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("posts");
        std::fs::write(&target, "not a dir").unwrap();
        let err = ensure_output_dir(&target).unwrap_err();
        assert!(matches!(err, WriteError::NotADirectory(_)));
    }

    #[test]
    fn test_write_post_path_and_content() {
        let dir = TempDir::new().unwrap();
        let path = write_post(dir.path(), "hello-world", "content").unwrap();
        assert_eq!(path, dir.path().join("hello-world.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }

    #[test]
    fn test_write_post_overwrites() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "dup", "a much longer first version").unwrap();
        let path = write_post(dir.path(), "dup", "second").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[test]
    fn test_write_post_missing_dir_errors() {
        let dir = TempDir::new().unwrap();
        let err = write_post(&dir.path().join("missing"), "x", "y").unwrap_err();
        assert!(err.to_string().contains("Failed to write"));
    }
}
