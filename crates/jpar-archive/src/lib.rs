//! Gzip-compressed tar archives disguised as JPEG files.
//!
//! Layers, outermost first:
//! - [`tar`] records (header + body per entry)
//! - gzip compression, with the framing version stamped in the header's extra field
//! - APP0 segment framing from [`jpar_segment`], after a bare `FF D8` start marker
//!
//! [`ArchiveWriter`] assembles the stack on a sink, [`ArchiveReader`] takes it
//! apart again and refuses streams it did not write.

pub mod config;
pub mod entry;
pub mod envelope;
pub mod error;
mod owner;
pub mod reader;
pub mod writer;

pub use config::{ArchiveConfig, DEFAULT_LEVEL, MAX_LEVEL};
pub use entry::{EntryInfo, EntryKind};
pub use envelope::{FRAMING_VERSION, START_MARKER};
pub use error::{ArchiveError, Result};
pub use reader::{ArchiveEntries, ArchiveEntry, ArchiveReader};
pub use writer::ArchiveWriter;
