use std::io::{self, ErrorKind, Read};

use bytes::{Buf, BytesMut};
use tracing::trace;

use crate::codec::{decode_prefix, APP0_MARKER, MAX_SEGMENT_PAYLOAD, PREFIX_SIZE};
use crate::error::{Result, SegmentError};

/// Presents the concatenated payloads of APP0 segments as one byte stream.
///
/// Segments are fetched lazily: a new one is read only when a call finds the
/// buffered payload empty. Running out of input exactly at a segment
/// boundary reads as end-of-stream (`Ok(0)`); running out inside a segment
/// is an `UnexpectedEof` error. Framing errors are returned as `InvalidData`
/// I/O errors wrapping a [`SegmentError`], see [`SegmentError::from_io`].
pub struct SegmentReader<R> {
    inner: R,
    buf: BytesMut,
    segments_read: u64,
}

impl<R: Read> SegmentReader<R> {
    /// Create a new segment reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(MAX_SEGMENT_PAYLOAD),
            segments_read: 0,
        }
    }

    /// Payload bytes of the current segment not yet handed out.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Number of segments fetched so far.
    pub fn segments_read(&self) -> u64 {
        self.segments_read
    }

    /// Borrow the underlying source.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Mutably borrow the underlying source.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Consume the reader and return the underlying source.
    ///
    /// Any unread payload of the current segment is dropped.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Read the next segment into the buffer. Returns `false` at a clean end.
    fn fetch_segment(&mut self) -> Result<bool> {
        let mut marker = [0u8; 2];
        if !read_marker(&mut self.inner, &mut marker)? {
            return Ok(false);
        }
        if marker != APP0_MARKER {
            return Err(SegmentError::UnrecognizedSegment {
                marker,
                signature: None,
            });
        }

        let mut prefix = [0u8; PREFIX_SIZE];
        self.inner.read_exact(&mut prefix)?;
        let payload_len = decode_prefix(&prefix)?;

        self.buf.clear();
        self.buf.resize(payload_len, 0);
        self.inner.read_exact(&mut self.buf)?;

        self.segments_read += 1;
        trace!(
            payload = payload_len,
            segment = self.segments_read,
            "fetched segment"
        );
        Ok(true)
    }
}

impl<R: Read> Read for SegmentReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() {
            return Ok(0);
        }

        // Zero-length segments are legal; keep going until there is payload.
        while self.buf.is_empty() {
            if !self.fetch_segment()? {
                return Ok(0);
            }
        }

        let n = out.len().min(self.buf.len());
        self.buf.copy_to_slice(&mut out[..n]);
        Ok(n)
    }
}

/// Fill `marker`, returning `false` if the source was already exhausted.
fn read_marker<R: Read>(src: &mut R, marker: &mut [u8; 2]) -> io::Result<bool> {
    let mut filled = 0usize;
    while filled < marker.len() {
        match src.read(&mut marker[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::UnexpectedEof,
                    "truncated segment marker",
                ))
            }
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(true)
}
