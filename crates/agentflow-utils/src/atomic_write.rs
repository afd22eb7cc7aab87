//! Atomic file writes for run-log persistence.
//!
//! Content is fully built in memory and written via temp file + fsync +
//! rename, so a writer that fails partway never leaves a valid-looking but
//! truncated file at the target path.

use anyhow::{Context, Result};
use camino::Utf8Path;
use std::fs;
use std::io::Write;

use tempfile::NamedTempFile;

/// Atomically write `content` to `path`.
///
/// The temporary file is created in the target's parent directory so the
/// final rename stays on one filesystem.
pub fn write_file_atomic(path: &Utf8Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {parent}"))?;
    }

    let temp_dir = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    let mut temp_file = NamedTempFile::new_in(temp_dir)
        .with_context(|| format!("Failed to create temporary file in: {temp_dir}"))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write content to temporary file")?;

    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;

    temp_file
        .persist(path.as_std_path())
        .with_context(|| format!("Failed to atomically rename into place: {path}"))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn writes_content_to_target() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("out.json")).unwrap();

        write_file_atomic(&path, "{\"ok\": true}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"ok\": true}");
    }

    #[test]
    fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("a/b/out.json")).unwrap();

        write_file_atomic(&path, "x").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("out.json")).unwrap();

        write_file_atomic(&path, "first").unwrap();
        write_file_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }
}
