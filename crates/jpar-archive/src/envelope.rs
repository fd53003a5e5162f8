//! The bare JPEG start marker and the framing version stamp.

use std::io::{ErrorKind, Read, Write};

use tracing::warn;

use crate::error::{ArchiveError, Result};

/// JPEG start-of-image marker. Written unframed at offset 0.
pub const START_MARKER: [u8; 2] = [0xFF, 0xD8];

/// Framing version stored as the whole gzip header extra field.
pub const FRAMING_VERSION: u8 = 0x01;

pub(crate) fn write_start_marker<W: Write>(sink: &mut W) -> Result<()> {
    sink.write_all(&START_MARKER)?;
    Ok(())
}

pub(crate) fn read_start_marker<R: Read>(source: &mut R) -> Result<()> {
    let mut marker = [0u8; 2];
    match source.read_exact(&mut marker) {
        Ok(()) => {}
        Err(err) if err.kind() == ErrorKind::UnexpectedEof => {
            warn!("stream ended before start marker");
            return Err(ArchiveError::MissingStartMarker);
        }
        Err(err) => return Err(err.into()),
    }

    if marker != START_MARKER {
        warn!(found = ?marker, "missing start marker");
        return Err(ArchiveError::MissingStartMarker);
    }
    Ok(())
}

/// Check the gzip extra field carries exactly the supported framing version.
pub(crate) fn check_framing_version(extra: Option<&[u8]>) -> Result<()> {
    let extra = extra.unwrap_or_default();
    if extra != [FRAMING_VERSION].as_slice() {
        warn!(found = ?extra, "unsupported framing version");
        return Err(ArchiveError::UnsupportedFramingVersion {
            found: extra.to_vec(),
        });
    }
    Ok(())
}
