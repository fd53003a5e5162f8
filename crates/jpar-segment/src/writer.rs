use std::io::{self, Write};

use bytes::BytesMut;
use tracing::trace;

use crate::codec::{encode_prefix, SegmentConfig, APP0_MARKER, PREFIX_SIZE};
use crate::error::Result;

/// Frames everything written to it as APP0 segments on any `Write` sink.
///
/// At most one segment payload is buffered. A segment goes out as soon as
/// the buffer reaches the configured cap; a trailing short segment only goes
/// out on [`flush_boundary`](Self::flush_boundary) or [`finish`](Self::finish).
///
/// When the sink fails after some of a `write` call's input has been
/// buffered, the call returns that count and the error surfaces on the next
/// call. After an I/O error the writer must not be used again.
pub struct SegmentWriter<W> {
    inner: W,
    buf: BytesMut,
    prefix: BytesMut,
    config: SegmentConfig,
    segments_written: u64,
}

impl<W: Write> SegmentWriter<W> {
    /// Create a new segment writer with full-size segments.
    pub fn new(inner: W) -> Self {
        Self::from_parts(inner, SegmentConfig::default())
    }

    /// Create a new segment writer with explicit configuration.
    pub fn with_config(inner: W, config: SegmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(inner, config))
    }

    fn from_parts(inner: W, config: SegmentConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.max_payload_size),
            prefix: BytesMut::with_capacity(APP0_MARKER.len() + PREFIX_SIZE),
            config,
            segments_written: 0,
        }
    }

    /// End the current segment without ending the stream.
    ///
    /// Buffered bytes, if any, go out as one (possibly short) segment and the
    /// sink is flushed. Later writes start a fresh segment.
    pub fn flush_boundary(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.emit_segment()?;
        }
        self.inner.flush()?;
        Ok(())
    }

    /// Emit any trailing partial segment and return the sink.
    ///
    /// The sink itself is not closed; its lifecycle belongs to the caller.
    pub fn finish(mut self) -> Result<W> {
        self.flush_boundary()?;
        Ok(self.inner)
    }

    /// Bytes waiting for the next segment.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Number of segments emitted so far.
    pub fn segments_written(&self) -> u64 {
        self.segments_written
    }

    /// Borrow the underlying sink.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Mutably borrow the underlying sink.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Current segment writer configuration.
    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    fn emit_segment(&mut self) -> io::Result<()> {
        self.prefix.clear();
        encode_prefix(self.buf.len(), &mut self.prefix)?;
        self.inner.write_all(&self.prefix)?;
        self.inner.write_all(&self.buf)?;

        self.segments_written += 1;
        trace!(
            payload = self.buf.len(),
            segment = self.segments_written,
            "emitted segment"
        );
        self.buf.clear();
        Ok(())
    }
}

impl<W: Write> Write for SegmentWriter<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let cap = self.config.max_payload_size;
        let mut accepted = 0usize;

        while accepted < data.len() {
            let space = cap - self.buf.len();
            let take = space.min(data.len() - accepted);
            self.buf.extend_from_slice(&data[accepted..accepted + take]);
            accepted += take;

            if self.buf.len() == cap {
                // Bytes taken by this call are kept; a full buffer makes the
                // next call retry the emit and report the error.
                if let Err(err) = self.emit_segment() {
                    if accepted == 0 {
                        return Err(err);
                    }
                    return Ok(accepted);
                }
            }
        }

        Ok(accepted)
    }

    /// Flushes the sink only; the current segment stays open.
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
