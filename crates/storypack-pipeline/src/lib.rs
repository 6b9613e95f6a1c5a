//! Export and import pipelines for storypack.
//!
//! # Export
//!
//! [`Exporter::export_resources`] packages a story into `Export/`:
//!
//! 1. Every chapter's flow document is parsed and its referenced resources
//!    extracted, concurrently.
//! 2. Chapter bundles are folded into a run-wide accumulator strictly in
//!    declared order. Each chapter ships only the resources no earlier
//!    chapter shipped.
//! 3. Each chapter's new files are staged, zipped to `<chapterId>.zip`, and
//!    the staging folder removed.
//! 4. Story-wide documents and raw chapter folders are zipped to
//!    `<storyId>.zip`, and the header document `content.elp` is written.
//!
//! # Import
//!
//! [`Importer::import_story`] unpacks the story archive named by a header
//! document; [`Importer::restore_chapter`] unpacks a single chapter archive.

pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod import;

pub use config::ExportConfig;
pub use document::load_story;
pub use error::{PipelineError, PipelineResult};
pub use export::{ChapterReport, ExportReport, Exporter};
pub use import::Importer;
