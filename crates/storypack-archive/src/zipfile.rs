use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Component, Path};

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::archiver::{Archiver, Compression};
use crate::error::{ArchiveError, ArchiveResult};

/// [`Archiver`] producing standard zip files.
#[derive(Clone, Copy, Debug, Default)]
pub struct ZipArchiver {
    compression: Compression,
}

impl ZipArchiver {
    pub fn new(compression: Compression) -> Self {
        Self { compression }
    }

    fn options(&self) -> SimpleFileOptions {
        let method = match self.compression {
            Compression::Deflated => CompressionMethod::Deflated,
            Compression::Stored => CompressionMethod::Stored,
        };
        SimpleFileOptions::default().compression_method(method)
    }
}

/// Zip entry name for `rel`: forward slashes regardless of platform.
fn entry_name(prefix: Option<&str>, rel: &Path) -> String {
    let mut parts: Vec<String> = prefix.map(str::to_string).into_iter().collect();
    parts.extend(rel.components().filter_map(|c| match c {
        Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
        _ => None,
    }));
    parts.join("/")
}

impl Archiver for ZipArchiver {
    fn compress(
        &self,
        source_dir: &Path,
        archive_path: &Path,
        include_root_folder: bool,
    ) -> ArchiveResult<usize> {
        if !source_dir.is_dir() {
            return Err(ArchiveError::SourceMissing(source_dir.to_path_buf()));
        }
        if let Some(parent) = archive_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let root_name = source_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        let prefix = if include_root_folder {
            root_name.as_deref()
        } else {
            None
        };
        let options = self.options();

        let mut zip = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
        if let Some(prefix) = prefix {
            zip.add_directory(prefix, options)?;
        }

        let mut files = 0usize;
        for entry in WalkDir::new(source_dir).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if path == archive_path {
                continue;
            }
            let rel = path
                .strip_prefix(source_dir)
                .map_err(|_| ArchiveError::UnsafeEntry(path.display().to_string()))?;
            let name = entry_name(prefix, rel);

            if entry.file_type().is_dir() {
                zip.add_directory(name, options)?;
            } else if entry.file_type().is_file() {
                zip.start_file(name, options)?;
                let mut reader = BufReader::new(File::open(path)?);
                io::copy(&mut reader, &mut zip)?;
                files += 1;
            }
        }
        zip.finish()?.flush()?;

        debug!(
            source = %source_dir.display(),
            archive = %archive_path.display(),
            files,
            "directory compressed"
        );
        Ok(files)
    }

    fn decompress(
        &self,
        archive_path: &Path,
        dest_dir: &Path,
        overwrite: bool,
    ) -> ArchiveResult<usize> {
        if !archive_path.is_file() {
            return Err(ArchiveError::ArchiveMissing(archive_path.to_path_buf()));
        }
        fs::create_dir_all(dest_dir)?;

        let mut archive = ZipArchive::new(BufReader::new(File::open(archive_path)?))?;
        let mut files = 0usize;
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            let rel = entry
                .enclosed_name()
                .map(|p| p.to_path_buf())
                .ok_or_else(|| ArchiveError::UnsafeEntry(entry.name().to_string()))?;
            let out = dest_dir.join(rel);

            if entry.is_dir() {
                fs::create_dir_all(&out)?;
                continue;
            }
            if !overwrite && out.exists() {
                return Err(ArchiveError::DestinationExists(out));
            }
            if let Some(parent) = out.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut writer = BufWriter::new(File::create(&out)?);
            io::copy(&mut entry, &mut writer)?;
            writer.flush()?;
            files += 1;
        }

        debug!(
            archive = %archive_path.display(),
            dest = %dest_dir.display(),
            files,
            "archive extracted"
        );
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(root: &Path) {
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::create_dir_all(root.join("empty")).unwrap();
        fs::write(root.join("top.txt"), b"top").unwrap();
        fs::write(root.join("sub/deeper/leaf.bin"), [0u8, 1, 2, 255]).unwrap();
    }

    #[test]
    fn roundtrip_without_root_folder() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("stage");
        fixture(&src);
        let archive = dir.path().join("out/stage.zip");

        let written = ZipArchiver::default().compress(&src, &archive, false).unwrap();
        assert_eq!(written, 2);

        let dest = dir.path().join("restored");
        let extracted = ZipArchiver::default().decompress(&archive, &dest, false).unwrap();
        assert_eq!(extracted, 2);
        assert_eq!(fs::read(dest.join("top.txt")).unwrap(), b"top");
        assert_eq!(fs::read(dest.join("sub/deeper/leaf.bin")).unwrap(), [0u8, 1, 2, 255]);
        assert!(dest.join("empty").is_dir());
    }

    #[test]
    fn include_root_folder_nests_entries() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("stage");
        fixture(&src);
        let archive = dir.path().join("stage.zip");
        ZipArchiver::new(Compression::Stored).compress(&src, &archive, true).unwrap();

        let dest = dir.path().join("restored");
        ZipArchiver::default().decompress(&archive, &dest, false).unwrap();
        assert!(dest.join("stage/top.txt").is_file());
        assert!(!dest.join("top.txt").exists());
    }

    #[test]
    fn overwrite_flag_controls_clobbering() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("stage");
        fixture(&src);
        let archive = dir.path().join("stage.zip");
        ZipArchiver::default().compress(&src, &archive, false).unwrap();

        let dest = dir.path().join("restored");
        fs::create_dir_all(&dest).unwrap();
        fs::write(dest.join("top.txt"), b"stale").unwrap();

        let err = ZipArchiver::default().decompress(&archive, &dest, false).unwrap_err();
        assert!(matches!(err, ArchiveError::DestinationExists(_)));

        ZipArchiver::default().decompress(&archive, &dest, true).unwrap();
        assert_eq!(fs::read(dest.join("top.txt")).unwrap(), b"top");
    }

    #[test]
    fn missing_source_and_archive() {
        let dir = tempfile::tempdir().unwrap();
        let err = ZipArchiver::default()
            .compress(&dir.path().join("nope"), &dir.path().join("x.zip"), false)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::SourceMissing(_)));

        let err = ZipArchiver::default()
            .decompress(&dir.path().join("x.zip"), dir.path(), true)
            .unwrap_err();
        assert!(matches!(err, ArchiveError::ArchiveMissing(_)));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn compress_reports_failed_final_write() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("stage");
        fixture(&src);
        let err = ZipArchiver::default().compress(&src, full, false).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_) | ArchiveError::Zip(_)), "{err}");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn decompress_reports_failed_entry_write() {
        let full = Path::new("/dev/full");
        if !full.exists() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("stage");
        fixture(&src);
        let archive = dir.path().join("stage.zip");
        ZipArchiver::default().compress(&src, &archive, false).unwrap();

        let dest = dir.path().join("restored");
        fs::create_dir_all(&dest).unwrap();
        std::os::unix::fs::symlink(full, dest.join("top.txt")).unwrap();
        let err = ZipArchiver::default().decompress(&archive, &dest, true).unwrap_err();
        assert!(matches!(err, ArchiveError::Io(_)), "{err}");
    }

    #[test]
    fn entry_names_use_forward_slashes() {
        let rel = Path::new("a").join("b").join("c.txt");
        assert_eq!(entry_name(None, &rel), "a/b/c.txt");
        assert_eq!(entry_name(Some("root"), &rel), "root/a/b/c.txt");
    }
}
