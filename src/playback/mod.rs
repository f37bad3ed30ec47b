//! Frame-sequenced bitmap playback.
//!
//! Streams pre-rendered raw frames from storage into a fixed display
//! surface, one frame per timer tick, looping forever.
//!
//! # Frame files
//!
//! Each animation group is a directory of headerless files numbered from 1
//! with a zero-padded 3-digit counter:
//!
//! ```text
//! /sdcard/video/group0/out001.bin
//! /sdcard/video/group0/out002.bin
//! ...
//! ```
//!
//! Every file is exactly `width * height * bytes_per_pixel` bytes of
//! row-major pixels in the configured [`PixelFormat`].
//!
//! # Lifecycle
//!
//! [`PlaybackManager`] holds at most one [`AnimationInstance`]. Starting a
//! new animation tears the old one down first. An instance is built in a
//! fixed order (buffer, surface, first frame, timer) and torn down in the
//! reverse resource order (timer, surface, buffer).

mod buffer;
mod display;
mod error;
mod instance;
mod manager;
mod path;
mod pixel;
mod registry;
mod storage;
mod timer;

pub use buffer::{BufferDescriptor, FrameBuffer};
pub use display::{Display, HeadlessDisplay, SurfaceId, SurfaceState};
pub use error::{FrameLoadError, PlaybackError, SurfaceError, TimerError};
pub use instance::{AnimationInstance, AnimationRequest, PlaybackStats, TickOutcome};
pub use manager::PlaybackManager;
pub use path::{MAX_PATH_LEN, PathPattern};
pub use pixel::{FrameGeometry, PixelFormat};
pub use registry::{BUILTIN_GROUPS, Group, GroupRegistry};
pub use storage::{FsStorage, MemoryStorage, Storage, load_frame};
pub use timer::{TickTimers, TimerId, TimerService};
