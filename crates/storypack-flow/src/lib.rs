//! Flow documents and reference extraction for storypack.
//!
//! A chapter's flow document is a sequence of blocks, each holding a
//! sequence of commands. Every command carries a `kind` tag and a JSON
//! payload. The [`ReferenceExtractor`] walks the document and asks the
//! [`ResolverRegistry`] for a resolver per kind; resolvers add the resource
//! identifiers their payload references to a fresh
//! [`ResourceBundle`](storypack_types::ResourceBundle).
//!
//! Kinds with no registered resolver are skipped, so documents written by
//! newer tools still extract.
//!
//! The [`Blackboard`] maps identifiers to the files backing them.

pub mod blackboard;
pub mod document;
pub mod error;
pub mod extractor;
pub mod resolver;
pub mod resolvers;

pub use blackboard::{Blackboard, Resolution, ResolvedFile};
pub use document::{Block, Command, FlowDocument};
pub use error::{FlowError, FlowResult};
pub use extractor::ReferenceExtractor;
pub use resolver::{ResolverRegistry, ResourceResolver};
