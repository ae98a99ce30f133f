//! Puts the editor's in-memory text on disk for the linter.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::LinterError;

/// A file on disk holding the document's current content.
///
/// When the content differs from the saved file, it lives in a sibling
/// temporary file which is removed when this value is dropped.
#[derive(Debug)]
pub struct MaterializedFile {
    project_root: PathBuf,
    path: PathBuf,
    temp: Option<NamedTempFile>,
}

/// Materializes `content` for the file at `file_path`.
///
/// The original file is reused when its content is identical. Otherwise a
/// temporary `.<stem>.<random>.<ext>` file is created in the same directory
/// so the linter resolves its configuration exactly as for the original.
pub fn materialize(
    project_root: impl AsRef<Path>,
    file_path: impl AsRef<Path>,
    content: &str,
) -> Result<MaterializedFile, LinterError> {
    let project_root = project_root.as_ref().to_path_buf();
    let file_path = file_path.as_ref();

    if let Ok(on_disk) = fs::read(file_path)
        && on_disk == content.as_bytes()
    {
        debug!("Linting saved file {}", file_path.display());
        return Ok(MaterializedFile {
            project_root,
            path: file_path.to_path_buf(),
            temp: None,
        });
    }

    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => project_root.clone(),
    };
    let stem = file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = file_path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(&suffix)
        .tempfile_in(&dir)?;
    temp.write_all(content.as_bytes())?;
    temp.flush()?;

    debug!(
        "Materialized {} as {}",
        file_path.display(),
        temp.path().display()
    );

    Ok(MaterializedFile {
        project_root,
        path: temp.path().to_path_buf(),
        temp: Some(temp),
    })
}

impl MaterializedFile {
    /// Path of the file the linter should read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if this is a temporary copy.
    pub fn is_temporary(&self) -> bool {
        self.temp.is_some()
    }

    /// Path relative to the project root, as passed to the linter.
    pub fn relative_path(&self) -> Result<String, LinterError> {
        if let Ok(relative) = self.path.strip_prefix(&self.project_root) {
            return Ok(relative.to_string_lossy().into_owned());
        }

        let root = fs::canonicalize(&self.project_root)?;
        let path = fs::canonicalize(&self.path)?;
        path.strip_prefix(&root)
            .map(|relative| relative.to_string_lossy().into_owned())
            .map_err(|_| {
                LinterError::internal(format!(
                    "{} is not inside the project root {}",
                    self.path.display(),
                    self.project_root.display()
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_unchanged_file_is_used_directly() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("app.coffee");
        fs::write(&file, "x = 1\n").unwrap();

        let materialized = materialize(dir.path(), &file, "x = 1\n").unwrap();
        assert!(!materialized.is_temporary());
        assert_eq!(materialized.path(), file.as_path());
        assert_eq!(materialized.relative_path().unwrap(), "app.coffee");

        drop(materialized);
        assert!(file.exists());
    }

    #[test]
    fn test_modified_content_goes_to_sibling_temp_file() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("src");
        fs::create_dir(&sub).unwrap();
        let file = sub.join("app.coffee");
        fs::write(&file, "x = 1\n").unwrap();

        let materialized = materialize(dir.path(), &file, "x = (2)\n").unwrap();
        let temp_path = materialized.path().to_path_buf();

        assert!(materialized.is_temporary());
        assert_eq!(temp_path.parent(), Some(sub.as_path()));
        let name = temp_path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(".app."), "{}", name);
        assert!(name.ends_with(".coffee"), "{}", name);
        assert_eq!(fs::read_to_string(&temp_path).unwrap(), "x = (2)\n");
        assert!(materialized.relative_path().unwrap().starts_with("src"));

        drop(materialized);
        assert!(!temp_path.exists());
        assert_eq!(fs::read_to_string(&file).unwrap(), "x = 1\n");
    }

    #[test]
    fn test_unsaved_file_without_extension() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("Cakefile");

        let materialized = materialize(dir.path(), &file, "task 'x', ->\n").unwrap();
        let name = materialized
            .path()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        assert!(materialized.is_temporary());
        assert!(name.starts_with(".Cakefile."), "{}", name);
    }

    #[test]
    fn test_relative_path_outside_root_fails() {
        let root = tempdir().unwrap();
        let elsewhere = tempdir().unwrap();
        let file = elsewhere.path().join("a.coffee");

        let materialized = materialize(root.path(), &file, "x = 1").unwrap();
        let err = materialized.relative_path().unwrap_err();
        assert!(matches!(err, LinterError::Internal(_)), "{:?}", err);
    }
}
