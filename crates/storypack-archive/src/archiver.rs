use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ArchiveResult;

/// Compresses one directory into one archive file, and back.
///
/// Implementations are blocking and `Send + Sync` so a single archiver can
/// be shared by every export task.
pub trait Archiver: Send + Sync {
    /// Compress the contents of `source_dir` into `archive_path`.
    ///
    /// With `include_root_folder`, entries are nested under the source
    /// directory's own name. Returns the number of files written.
    fn compress(
        &self,
        source_dir: &Path,
        archive_path: &Path,
        include_root_folder: bool,
    ) -> ArchiveResult<usize>;

    /// Extract `archive_path` into `dest_dir`, creating it if needed.
    ///
    /// With `overwrite`, existing files are replaced; otherwise an existing
    /// file is an error. Returns the number of files extracted.
    fn decompress(&self, archive_path: &Path, dest_dir: &Path, overwrite: bool)
        -> ArchiveResult<usize>;
}

/// How file entries are stored in an archive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    Deflated,
    Stored,
}
