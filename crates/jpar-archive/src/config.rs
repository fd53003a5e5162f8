use std::time::{SystemTime, UNIX_EPOCH};

use jpar_segment::SegmentConfig;

use crate::error::{ArchiveError, Result};

/// Default gzip compression level (best compression).
pub const DEFAULT_LEVEL: u32 = 9;

/// Highest gzip compression level.
pub const MAX_LEVEL: u32 = 9;

/// Configuration for [`ArchiveWriter`](crate::ArchiveWriter).
#[derive(Debug, Clone)]
pub struct ArchiveConfig {
    /// Gzip compression level, 0-9. Default: 9.
    pub level: u32,
    /// Gzip header timestamp in Unix seconds. Default: now.
    pub mtime: Option<u32>,
    /// Segment framing configuration.
    pub segment: SegmentConfig,
}

impl ArchiveConfig {
    /// Default configuration at an explicit compression level.
    pub fn with_level(level: u32) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.level > MAX_LEVEL {
            return Err(ArchiveError::InvalidLevel(self.level));
        }
        Ok(())
    }

    pub(crate) fn header_mtime(&self) -> u32 {
        self.mtime.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as u32)
                .unwrap_or(0)
        })
    }
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LEVEL,
            mtime: None,
            segment: SegmentConfig::default(),
        }
    }
}
