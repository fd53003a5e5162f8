use std::io;

/// Errors that can occur during segment framing and unframing.
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// The next segment is not an APP0 segment carrying the jpar signature.
    ///
    /// Either the stream has reached content jpar did not write, or it is
    /// corrupt.
    #[error("unrecognized segment (marker {marker:02X?}, signature {signature:02X?})")]
    UnrecognizedSegment {
        marker: [u8; 2],
        signature: Option<[u8; 5]>,
    },

    /// The length field is too small to cover the segment prefix.
    #[error("invalid segment length {length} (minimum 7)")]
    InvalidLength { length: u16 },

    /// A configured payload cap exceeds what the 16-bit length field can express.
    #[error("segment payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred on the underlying sink or source.
    #[error("segment I/O error: {0}")]
    Io(#[from] io::Error),
}

impl SegmentError {
    /// Recover a framing error that crossed an `io::Read`/`io::Write` boundary.
    ///
    /// Plain I/O errors come back as [`SegmentError::Io`].
    pub fn from_io(err: io::Error) -> Self {
        let is_framing = err
            .get_ref()
            .is_some_and(|inner| inner.is::<SegmentError>());
        if !is_framing {
            return SegmentError::Io(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<SegmentError>()) {
            Some(Ok(framing)) => *framing,
            Some(Err(other)) => SegmentError::Io(io::Error::new(io::ErrorKind::InvalidData, other)),
            None => SegmentError::Io(io::Error::from(io::ErrorKind::InvalidData)),
        }
    }

    /// True when the error means "this is not a jpar segment".
    pub fn is_unrecognized(&self) -> bool {
        matches!(self, SegmentError::UnrecognizedSegment { .. })
    }
}

impl From<SegmentError> for io::Error {
    fn from(err: SegmentError) -> Self {
        match err {
            SegmentError::Io(io) => io,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

pub type Result<T> = std::result::Result<T, SegmentError>;
