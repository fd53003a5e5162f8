use std::fmt;
use std::io;

use jpar_archive::ArchiveError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::InvalidData | io::ErrorKind::UnexpectedEof => DATA_INVALID,
        io::ErrorKind::NotFound | io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn archive_error(context: &str, err: ArchiveError) -> CliError {
    match err {
        ArchiveError::Io(source) => io_error(context, source),
        ArchiveError::InvalidLevel(_) => CliError::new(USAGE, format!("{context}: {err}")),
        ArchiveError::MissingStartMarker
        | ArchiveError::UnsupportedFramingVersion { .. }
        | ArchiveError::Segment(_) => CliError::new(DATA_INVALID, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use jpar_segment::SegmentError;

    use super::*;

    #[test]
    fn io_kinds_map_to_codes() {
        let code = |kind: io::ErrorKind| io_error("x", io::Error::from(kind)).code;
        assert_eq!(code(io::ErrorKind::PermissionDenied), PERMISSION_DENIED);
        assert_eq!(code(io::ErrorKind::UnexpectedEof), DATA_INVALID);
        assert_eq!(code(io::ErrorKind::NotFound), FAILURE);
        assert_eq!(code(io::ErrorKind::Other), INTERNAL);
    }

    #[test]
    fn archive_errors_map_to_codes() {
        let err = archive_error("dump", ArchiveError::MissingStartMarker);
        assert_eq!(err.code, DATA_INVALID);
        assert_eq!(err.to_string(), "dump: missing JPEG start-of-image marker");

        let err = archive_error(
            "dump",
            ArchiveError::Segment(SegmentError::InvalidLength { length: 2 }),
        );
        assert_eq!(err.code, DATA_INVALID);

        let err = archive_error("create", ArchiveError::InvalidLevel(11));
        assert_eq!(err.code, USAGE);

        let err = archive_error(
            "create",
            ArchiveError::Io(io::Error::from(io::ErrorKind::PermissionDenied)),
        );
        assert_eq!(err.code, PERMISSION_DENIED);
    }
}
