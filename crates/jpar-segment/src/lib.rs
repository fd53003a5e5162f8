//! JPEG marker-segment framing for arbitrary byte streams.
//!
//! This is the core layer of jpar. An outbound byte stream is cut into APP0
//! segments, each carrying:
//! - A 2-byte marker (`FF E0`)
//! - A 2-byte big-endian length covering itself, the signature and the payload
//! - A 5-byte signature (`"JPAR\0"`) identifying segments written by jpar
//!
//! Segment boundaries are invisible to the layers above: the writer and
//! reader are plain `std::io::Write` / `std::io::Read` adapters.

pub mod codec;
pub mod error;
pub mod reader;
pub mod writer;

pub use codec::{
    decode_prefix, encode_prefix, SegmentConfig, APP0_MARKER, MAX_SEGMENT_PAYLOAD, PREFIX_SIZE,
    SIGNATURE,
};
pub use error::{Result, SegmentError};
pub use reader::SegmentReader;
pub use writer::SegmentWriter;
