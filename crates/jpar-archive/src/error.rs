use std::io;

use jpar_segment::SegmentError;

/// Errors that can occur while writing or reading a disguised archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// The stream does not start with the JPEG start-of-image marker.
    #[error("missing JPEG start-of-image marker")]
    MissingStartMarker,

    /// The gzip header does not carry the expected framing version.
    #[error("unrecognized framing version {found:02x?}")]
    UnsupportedFramingVersion { found: Vec<u8> },

    /// Compression level outside 0-9.
    #[error("invalid compression level {0} (expected 0-9)")]
    InvalidLevel(u32),

    /// Segment framing was violated.
    #[error("segment error: {0}")]
    Segment(SegmentError),

    /// I/O failure on the sink or source, or a gzip/tar codec failure.
    #[error("archive I/O error: {0}")]
    Io(io::Error),
}

impl From<SegmentError> for ArchiveError {
    fn from(err: SegmentError) -> Self {
        match err {
            SegmentError::Io(io) => ArchiveError::Io(io),
            other => ArchiveError::Segment(other),
        }
    }
}

/// Framing errors raised under the gzip and tar layers arrive as
/// `io::Error`s; they are unwrapped back into [`ArchiveError::Segment`].
impl From<io::Error> for ArchiveError {
    fn from(err: io::Error) -> Self {
        SegmentError::from_io(err).into()
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
