use std::fs::{self, File, Metadata};
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::{Compression, GzBuilder};
use jpar_segment::SegmentWriter;
use tar::{Builder, Header};
use tracing::debug;

use crate::config::ArchiveConfig;
use crate::envelope::{write_start_marker, FRAMING_VERSION};
use crate::error::Result;
use crate::owner::set_owner_names;

type Stack<W> = Builder<GzEncoder<SegmentWriter<W>>>;

/// Writes a tar archive, gzip-compressed, framed as JPEG APP0 segments.
///
/// The first segment holds the gzip header alone. Call
/// [`finish`](Self::finish) to write the trailers; dropping the writer
/// leaves the archive incomplete.
pub struct ArchiveWriter<W: Write> {
    builder: Stack<W>,
}

impl<W: Write> ArchiveWriter<W> {
    /// Start an archive on `inner` with default configuration.
    pub fn new(inner: W) -> Result<Self> {
        Self::with_config(inner, ArchiveConfig::default())
    }

    /// Start an archive on `inner` with explicit configuration.
    pub fn with_config(mut inner: W, config: ArchiveConfig) -> Result<Self> {
        config.validate()?;

        write_start_marker(&mut inner)?;
        let segments = SegmentWriter::with_config(inner, config.segment.clone())?;

        let mut encoder = GzBuilder::new()
            .mtime(config.header_mtime())
            .extra(vec![FRAMING_VERSION])
            .write(segments, Compression::new(config.level));

        // The gzip header gets a segment of its own; payload starts fresh.
        encoder.flush()?;
        encoder.get_mut().flush_boundary()?;
        debug!(level = config.level, "wrote archive header segment");

        let mut builder = Builder::new(encoder);
        builder.follow_symlinks(false);
        Ok(Self { builder })
    }

    /// Append one record with an explicit header, reading the body from `data`.
    ///
    /// The header's size must match the bytes `data` yields; the path is
    /// set from `path` and the checksum is computed here.
    pub fn append_data<P: AsRef<Path>, R: Read>(
        &mut self,
        header: &mut Header,
        path: P,
        data: R,
    ) -> Result<()> {
        let path = path.as_ref();
        debug!(path = %path.display(), size = header.size().unwrap_or(0), "append");
        self.builder.append_data(header, path, data)?;
        Ok(())
    }

    /// Append an open file under `name`.
    ///
    /// Size, mode, mtime, numeric owner ids and owner names come from the
    /// file's metadata.
    pub fn append_file<P: AsRef<Path>>(&mut self, name: P, file: &mut File) -> Result<()> {
        let name = name.as_ref();
        let metadata = file.metadata()?;
        let mut header = header_for(&metadata);
        debug!(path = %name.display(), size = metadata.len(), "append file");
        self.builder.append_data(&mut header, name, file)?;
        Ok(())
    }

    /// Append the filesystem object at `path` under `name`.
    ///
    /// Directories are recorded as a single entry, not recursed into.
    /// Symlinks are stored as links, not followed.
    pub fn append_path_with_name<P: AsRef<Path>, N: AsRef<Path>>(
        &mut self,
        path: P,
        name: N,
    ) -> Result<()> {
        let path = path.as_ref();
        let name = name.as_ref();
        let metadata = fs::symlink_metadata(path)?;
        debug!(path = %name.display(), "append path");

        if metadata.is_file() {
            let mut file = File::open(path)?;
            return self.append_file(name, &mut file);
        }

        let mut header = header_for(&metadata);
        if metadata.is_dir() {
            self.builder.append_data(&mut header, name, io::empty())?;
        } else if metadata.file_type().is_symlink() {
            let target = fs::read_link(path)?;
            self.builder.append_link(&mut header, name, target)?;
        } else {
            // Devices and fifos: tar knows their special fields.
            self.builder.append_path_with_name(path, name)?;
        }
        Ok(())
    }

    /// Segments emitted so far, including the header segment.
    pub fn segments_written(&mut self) -> u64 {
        self.builder.get_mut().get_ref().segments_written()
    }

    /// Write the tar trailer, the gzip trailer and the last partial segment,
    /// in that order, and return the sink.
    pub fn finish(self) -> Result<W> {
        let encoder = self.builder.into_inner()?;
        let segments = encoder.finish()?;
        let written = segments.segments_written();
        let inner = segments.finish()?;
        debug!(segments = written, "archive finished");
        Ok(inner)
    }
}

/// GNU header filled from filesystem metadata, owner names included.
fn header_for(metadata: &Metadata) -> Header {
    let mut header = Header::new_gnu();
    header.set_metadata(metadata);
    set_owner_names(&mut header, metadata);
    header
}
