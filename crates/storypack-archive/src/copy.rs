//! Bulk file copy.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ArchiveError, ArchiveResult};

/// Copy one file, creating `dst`'s parent directories and replacing any
/// existing file. Returns the number of bytes copied.
pub fn copy_file(src: &Path, dst: &Path) -> ArchiveResult<u64> {
    let failed = |source| ArchiveError::CopyFailed {
        from: src.to_path_buf(),
        to: dst.to_path_buf(),
        source,
    };
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(failed)?;
    }
    let bytes = fs::copy(src, dst).map_err(failed)?;
    debug!(from = %src.display(), to = %dst.display(), bytes, "file copied");
    Ok(bytes)
}

/// Mirror the tree under `src` into `dst`. Returns the number of files
/// copied.
///
/// Walks with an explicit worklist so depth is bounded by heap, not stack.
pub fn mirror_dir(src: &Path, dst: &Path) -> ArchiveResult<usize> {
    if !src.is_dir() {
        return Err(ArchiveError::SourceMissing(src.to_path_buf()));
    }

    let mut files = 0usize;
    let mut pending: Vec<(PathBuf, PathBuf)> = vec![(src.to_path_buf(), dst.to_path_buf())];
    while let Some((from_dir, to_dir)) = pending.pop() {
        fs::create_dir_all(&to_dir)?;
        for entry in fs::read_dir(&from_dir)? {
            let entry = entry?;
            let from = entry.path();
            let to = to_dir.join(entry.file_name());
            let file_type = entry.file_type()?;
            if file_type.is_dir() {
                pending.push((from, to));
            } else if file_type.is_file() {
                copy_file(&from, &to)?;
                files += 1;
            }
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, b"new").unwrap();
        let dst = dir.path().join("x/y/a.txt");

        assert_eq!(copy_file(&src, &dst).unwrap(), 3);
        fs::write(&src, b"newer").unwrap();
        copy_file(&src, &dst).unwrap();
        assert_eq!(fs::read(&dst).unwrap(), b"newer");
    }

    #[test]
    fn copy_missing_source_names_paths() {
        let dir = tempfile::tempdir().unwrap();
        let err = copy_file(&dir.path().join("gone.png"), &dir.path().join("out.png")).unwrap_err();
        match err {
            ArchiveError::CopyFailed { from, .. } => assert!(from.ends_with("gone.png")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn mirror_deep_tree() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        let mut deep = src.clone();
        for i in 0..40 {
            deep = deep.join(format!("d{i}"));
        }
        fs::create_dir_all(&deep).unwrap();
        fs::write(deep.join("leaf.txt"), b"leaf").unwrap();
        fs::write(src.join("root.txt"), b"root").unwrap();
        fs::create_dir_all(src.join("empty")).unwrap();

        let dst = dir.path().join("dst");
        assert_eq!(mirror_dir(&src, &dst).unwrap(), 2);

        let rel = deep.strip_prefix(&src).unwrap();
        assert_eq!(fs::read(dst.join(rel).join("leaf.txt")).unwrap(), b"leaf");
        assert!(dst.join("empty").is_dir());
    }

    #[test]
    fn mirror_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let err = mirror_dir(&dir.path().join("nope"), dir.path()).unwrap_err();
        assert!(matches!(err, ArchiveError::SourceMissing(_)));
    }
}
