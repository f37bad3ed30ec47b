//! Registered animation groups.

use super::PlaybackError;

/// One animation loop: a frame path pattern and how many frames it has.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub pattern: String,
    pub frame_count: u32,
}

/// Groups shipped on the reference card image.
pub const BUILTIN_GROUPS: &[(&str, u32)] = &[
    ("/sdcard/video/group0/out%03d.bin", 10),
    ("/sdcard/video/group1/out%03d.bin", 15),
];

/// Immutable table of groups, fixed for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRegistry {
    groups: Box<[Group]>,
}

impl GroupRegistry {
    /// Registry holding [`BUILTIN_GROUPS`].
    pub fn builtin() -> Self {
        Self::from_table(BUILTIN_GROUPS)
    }

    pub fn from_table(table: &[(&str, u32)]) -> Self {
        Self::new(
            table
                .iter()
                .map(|&(pattern, frame_count)| Group {
                    pattern: pattern.to_string(),
                    frame_count,
                })
                .collect(),
        )
    }

    pub fn new(groups: Vec<Group>) -> Self {
        Self {
            groups: groups.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Look up a group by index. Returns a copy.
    pub fn resolve(&self, index: i32) -> Result<Group, PlaybackError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.groups.get(i))
            .cloned()
            .ok_or(PlaybackError::GroupOutOfRange {
                index,
                len: self.groups.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Group> {
        self.groups.iter()
    }
}

impl Default for GroupRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
