use std::io::{self, ErrorKind, Read};

use flate2::read::GzDecoder;
use jpar_segment::SegmentReader;
use tar::{Archive, Entries, Entry};
use tracing::debug;

use crate::envelope::{check_framing_version, read_start_marker};
use crate::error::{ArchiveError, Result};

type Decoder<R> = GzDecoder<SegmentReader<R>>;

/// Lazy, single-pass iterator over the records of an archive.
pub type ArchiveEntries<'a, R> = Entries<'a, Decoder<R>>;

/// One record: header accessors plus a `Read` for the body.
pub type ArchiveEntry<'a, R> = Entry<'a, Decoder<R>>;

/// Reads archives written by [`ArchiveWriter`](crate::ArchiveWriter).
///
/// Construction validates the start marker and the framing version before
/// any record is decoded.
pub struct ArchiveReader<R: Read> {
    archive: Archive<Decoder<R>>,
    mtime: u32,
}

impl<R: Read> ArchiveReader<R> {
    /// Open an archive on `inner`, checking the envelope and the gzip header.
    pub fn new(mut inner: R) -> Result<Self> {
        read_start_marker(&mut inner)?;

        let mut decoder = GzDecoder::new(SegmentReader::new(inner));
        let (mtime, extra) = match decoder.header() {
            Some(header) => (header.mtime(), header.extra().map(<[u8]>::to_vec)),
            None => {
                // The decoder keeps the header error until the first read.
                decoder.read(&mut [])?;
                return Err(ArchiveError::Io(io::Error::new(
                    ErrorKind::InvalidData,
                    "missing gzip header",
                )));
            }
        };
        check_framing_version(extra.as_deref())?;
        debug!(mtime, "opened archive");

        Ok(Self {
            archive: Archive::new(decoder),
            mtime,
        })
    }

    /// Iterate the records. The sequence is finite and cannot be restarted.
    pub fn entries(&mut self) -> Result<ArchiveEntries<'_, R>> {
        Ok(self.archive.entries()?)
    }

    /// Timestamp from the gzip header, in Unix seconds.
    pub fn header_mtime(&self) -> u32 {
        self.mtime
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.archive.into_inner().into_inner().into_inner()
    }
}
