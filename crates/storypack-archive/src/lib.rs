//! Archiving collaborators for storypack.
//!
//! - [`Archiver`] -- compress a directory to a single file and back
//! - [`ZipArchiver`] -- the zip implementation used for `.zip` packages
//! - [`copy_file`] / [`mirror_dir`] -- bulk copy that creates destination
//!   directories and overwrites existing files
//!
//! Everything here is synchronous. Async callers run it on the blocking pool.

pub mod archiver;
pub mod copy;
pub mod error;
pub mod zipfile;

pub use archiver::{Archiver, Compression};
pub use copy::{copy_file, mirror_dir};
pub use error::{ArchiveError, ArchiveResult};
pub use zipfile::ZipArchiver;
