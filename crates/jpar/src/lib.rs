//! Joint Photographic Archiver.
//!
//! jpar writes gzip-compressed tar archives that parse as JPEG files: a
//! start-of-image marker followed by APP0 segments whose payloads, joined
//! together, are the compressed archive.
//!
//! # Crate Structure
//!
//! - [`segment`]: APP0 segment framing over any `Read`/`Write`
//! - [`archive`]: the framing, gzip and tar layers assembled

/// Re-export segment framing types.
pub mod segment {
    pub use jpar_segment::*;
}

/// Re-export archive types.
pub mod archive {
    pub use jpar_archive::*;
}

pub use jpar_archive::{ArchiveError, ArchiveReader, ArchiveWriter, EntryInfo};
