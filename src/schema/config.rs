//! Configuration types for the player.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::playback::{FrameGeometry, Group, GroupRegistry, PathPattern, PixelFormat};

/// Process-wide color depth. Fixed at startup.
///
/// Serialized as the bit count (16, 24 or 32); any other value fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ColorDepth {
    #[default]
    Bits16,
    Bits24,
    Bits32,
}

impl ColorDepth {
    pub fn bits(self) -> u8 {
        match self {
            ColorDepth::Bits16 => 16,
            ColorDepth::Bits24 => 24,
            ColorDepth::Bits32 => 32,
        }
    }
}

impl TryFrom<u8> for ColorDepth {
    type Error = ConfigError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            16 => Ok(ColorDepth::Bits16),
            24 => Ok(ColorDepth::Bits24),
            32 => Ok(ColorDepth::Bits32),
            other => Err(ConfigError::UnsupportedColorDepth(other)),
        }
    }
}

impl From<ColorDepth> for u8 {
    fn from(depth: ColorDepth) -> u8 {
        depth.bits()
    }
}

/// One entry of a configured group table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Frame path pattern with one integer placeholder, e.g. `/sdcard/video/group0/out%03d.bin`.
    pub pattern: String,
    /// Number of frames in the loop.
    pub frame_count: u32,
}

/// Top-level player configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Color depth of the display; selects the pixel format.
    pub color_depth: ColorDepth,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Time between frames in milliseconds.
    pub interval_ms: u64,
    /// Host directory standing in for the storage root.
    pub storage_root: PathBuf,
    /// Group started by the player binary.
    pub group: i32,
    /// Group table. Empty means the builtin table.
    pub groups: Vec<GroupConfig>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            color_depth: ColorDepth::Bits16,
            width: FrameGeometry::DEFAULT.width,
            height: FrameGeometry::DEFAULT.height,
            interval_ms: 100,
            storage_root: PathBuf::from("."),
            group: 0,
            groups: Vec::new(),
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: PlayerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    #[inline]
    pub fn pixel_format(&self) -> PixelFormat {
        PixelFormat::from_depth(self.color_depth)
    }

    #[inline]
    pub fn geometry(&self) -> FrameGeometry {
        FrameGeometry::new(self.width, self.height)
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Bytes in one frame file for this configuration.
    pub fn frame_size(&self) -> usize {
        self.geometry().frame_size(self.pixel_format())
    }

    /// Build the group registry: the configured table, or the builtin one.
    pub fn registry(&self) -> GroupRegistry {
        if self.groups.is_empty() {
            return GroupRegistry::builtin();
        }
        GroupRegistry::new(
            self.groups
                .iter()
                .map(|g| Group {
                    pattern: g.pattern.clone(),
                    frame_count: g.frame_count,
                })
                .collect(),
        )
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        for (i, group) in self.groups.iter().enumerate() {
            if group.frame_count == 0 {
                return Err(ConfigError::InvalidGroup {
                    group: i,
                    reason: "frame count must be positive".to_string(),
                });
            }
            PathPattern::parse(&group.pattern).map_err(|e| ConfigError::InvalidGroup {
                group: i,
                reason: e.to_string(),
            })?;
        }
        let len = self.registry().len();
        if !usize::try_from(self.group).is_ok_and(|g| g < len) {
            return Err(ConfigError::GroupOutOfRange {
                group: self.group,
                len,
            });
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unsupported color depth {0} (expected 16, 24 or 32)")]
    UnsupportedColorDepth(u8),
    #[error("Frame dimensions (width, height) must be non-zero")]
    InvalidDimensions,
    #[error("Frame interval must be positive")]
    InvalidInterval,
    #[error("Group {group} is invalid: {reason}")]
    InvalidGroup { group: usize, reason: String },
    #[error("Group {group} out of range (have {len} groups)")]
    GroupOutOfRange { group: i32, len: usize },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
}
