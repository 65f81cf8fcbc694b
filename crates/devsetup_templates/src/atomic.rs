//! Write-then-rename file output.
//!
//! Every file lands through a temp file in the destination directory, so a
//! reader never observes a half-written file.

use std::fs::{self, Permissions};
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{TemplateError, TemplateResult};

/// Atomically replace `path` with `content`.
///
/// Without explicit `permissions` an existing file keeps its mode and a new
/// one gets the usual `0644`.
pub(crate) fn write(path: &Path, content: &[u8], permissions: Option<Permissions>) -> TemplateResult<()> {
    let mut tmp = temp_beside(path)?;
    tmp.write_all(content)
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| TemplateError::io(path, e))?;
    if let Some(permissions) = permissions.or_else(|| default_permissions(path)) {
        fs::set_permissions(tmp.path(), permissions).map_err(|e| TemplateError::io(path, e))?;
    }
    persist(tmp, path)
}

/// Atomically replace `dest` with a byte copy of `source`, keeping its permissions.
pub(crate) fn copy(source: &Path, dest: &Path) -> TemplateResult<()> {
    let tmp = temp_beside(dest)?;
    fs::copy(source, tmp.path()).map_err(|e| TemplateError::io(source, e))?;
    persist(tmp, dest)
}

fn temp_beside(path: &Path) -> TemplateResult<NamedTempFile> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent).map_err(|e| TemplateError::io(parent, e))?;
    NamedTempFile::new_in(parent).map_err(|e| TemplateError::io(parent, e))
}

fn persist(tmp: NamedTempFile, path: &Path) -> TemplateResult<()> {
    tmp.persist(path).map_err(|e| TemplateError::io(path, e.error))?;
    Ok(())
}

fn default_permissions(path: &Path) -> Option<Permissions> {
    if let Ok(meta) = fs::metadata(path) {
        return Some(meta.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(Permissions::from_mode(0o644))
    }
    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_replaces_existing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("out.txt");
        fs::write(&path, "old contents that are longer").unwrap();

        write(&path, b"new", None).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let temp = tempdir().unwrap();
        write(&temp.path().join("a.txt"), b"a", None).unwrap();

        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_new_file_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yml");
        write(&path, b"a: 1\n", None).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_copy_creates_parents() {
        let temp = tempdir().unwrap();
        let source = temp.path().join("source.bin");
        fs::write(&source, [0u8, 159, 146, 150]).unwrap();
        let dest = temp.path().join("deep").join("dir").join("dest.bin");

        copy(&source, &dest).unwrap();
        assert_eq!(fs::read(&dest).unwrap(), vec![0u8, 159, 146, 150]);
    }
}
