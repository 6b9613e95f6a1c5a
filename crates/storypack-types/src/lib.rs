//! Foundation types for storypack.
//!
//! Every other storypack crate depends on `storypack-types`.
//!
//! # Key Types
//!
//! - [`ResourceCategory`] -- Partition of the resource namespace (backgrounds, items, characters, sounds)
//! - [`ResourceSet`] -- Set of resource identifiers for one category
//! - [`ResourceBundle`] -- One set per category; supports `diff_and_merge` against an accumulator
//! - [`Story`] / [`Chapter`] -- Read-only project metadata
//! - [`ExportHeader`] -- The `content.elp` document written at the end of an export

pub mod bundle;
pub mod category;
pub mod error;
pub mod header;
pub mod story;

pub use bundle::{ResourceBundle, ResourceSet};
pub use category::ResourceCategory;
pub use error::{TypeError, TypeResult};
pub use header::ExportHeader;
pub use story::{is_valid_id, Chapter, ChapterEntry, Story, StoryIndex};
