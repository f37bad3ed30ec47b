//! Error types for the playback engine.

use std::io;

use super::path::MAX_PATH_LEN;

/// Failure to create a display surface.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("No display surface available (limit {limit})")]
    Exhausted { limit: usize },
    #[error("Display rejected surface of {width}x{height}")]
    Rejected { width: u32, height: u32 },
}

/// Failure to register a recurring timer.
#[derive(Debug, thiserror::Error)]
pub enum TimerError {
    #[error("Timer period must be non-zero")]
    ZeroPeriod,
    #[error("No timer slot available (limit {limit})")]
    Exhausted { limit: usize },
}

/// Errors returned when an animation cannot be started.
///
/// Every variant means no instance exists afterwards and every resource
/// acquired on the way has been released.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("Path pattern is empty")]
    EmptyPattern,
    #[error("Path pattern is {len} bytes, limit is {max}", max = MAX_PATH_LEN)]
    PatternTooLong { len: usize },
    #[error("Invalid path pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },
    #[error("Frame count must be positive")]
    ZeroFrameCount,
    #[error("Group index {index} out of range (have {len} groups)")]
    GroupOutOfRange { index: i32, len: usize },
    #[error("Failed to allocate {bytes} byte frame buffer")]
    Allocation { bytes: usize },
    #[error("Failed to create display surface: {0}")]
    Surface(#[from] SurfaceError),
    #[error("Failed to register playback timer: {0}")]
    Timer(#[from] TimerError),
}

impl PlaybackError {
    /// True for rejections that happen before any resource is touched.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            PlaybackError::EmptyPattern
                | PlaybackError::PatternTooLong { .. }
                | PlaybackError::InvalidPattern { .. }
                | PlaybackError::ZeroFrameCount
                | PlaybackError::GroupOutOfRange { .. }
        )
    }
}

/// Why a single frame could not be presented.
///
/// These never leave a tick: they become [`TickOutcome::Skipped`](super::TickOutcome).
#[derive(Debug, thiserror::Error)]
pub enum FrameLoadError {
    #[error("Failed to open frame {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read frame {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("Frame {path} is truncated: {actual} of {expected} bytes")]
    Truncated {
        path: String,
        expected: usize,
        actual: usize,
    },
    #[error("Frame {path} is larger than {expected} bytes")]
    Oversized { path: String, expected: usize },
}

impl FrameLoadError {
    /// Path of the frame that failed.
    pub fn path(&self) -> &str {
        match self {
            FrameLoadError::Open { path, .. }
            | FrameLoadError::Read { path, .. }
            | FrameLoadError::Truncated { path, .. }
            | FrameLoadError::Oversized { path, .. } => path,
        }
    }
}
