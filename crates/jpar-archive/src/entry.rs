use std::io::{self, Read};
use std::path::PathBuf;

use tar::{Entry, EntryType, Header};

/// Coarse entry type, as listed by `jpar dump`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other(u8),
}

impl From<EntryType> for EntryKind {
    fn from(kind: EntryType) -> Self {
        if kind.is_file() {
            EntryKind::File
        } else if kind.is_dir() {
            EntryKind::Directory
        } else if kind.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other(kind.as_byte())
        }
    }
}

/// Metadata of one archived record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
    /// Permission bits.
    pub mode: u32,
    pub uname: Option<String>,
    pub gname: Option<String>,
    /// Modification time in Unix seconds.
    pub mtime: u64,
}

impl EntryInfo {
    /// Metadata of an entry being read. Long names from GNU/PAX extensions are honoured.
    pub fn from_entry<R: Read>(entry: &Entry<'_, R>) -> io::Result<Self> {
        let mut info = Self::from_header(entry.header())?;
        info.path = entry.path()?.into_owned();
        Ok(info)
    }

    /// Metadata of a bare header block.
    pub fn from_header(header: &Header) -> io::Result<Self> {
        Ok(Self {
            path: header.path()?.into_owned(),
            kind: header.entry_type().into(),
            size: header.size()?,
            mode: header.mode()? & 0o7777,
            uname: owner_name(header.username())?,
            gname: owner_name(header.groupname())?,
            mtime: header.mtime()?,
        })
    }

    /// `ls`-style mode string, e.g. `-rw-r--r--`.
    pub fn mode_string(&self) -> String {
        let kind = match self.kind {
            EntryKind::File => '-',
            EntryKind::Directory => 'd',
            EntryKind::Symlink => 'l',
            EntryKind::Other(_) => '?',
        };

        let mut out = String::with_capacity(10);
        out.push(kind);
        for shift in [6u32, 3, 0] {
            let bits = (self.mode >> shift) & 0o7;
            out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
            out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
            out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
        }
        out
    }
}

/// Owner name field; an empty field means no name was recorded.
fn owner_name(
    field: std::result::Result<Option<&str>, std::str::Utf8Error>,
) -> io::Result<Option<String>> {
    let name = field.map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    Ok(name.filter(|name| !name.is_empty()).map(str::to_owned))
}
