//! SD video animation - frame-sequenced bitmap playback for small displays.
//!
//! This crate plays a looping raster "video" by streaming pre-rendered raw
//! frames from removable storage into a fixed display surface, one frame
//! per timer tick.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Player configuration (color depth, geometry, group table)
//! - `playback`: The playback engine (path resolution, frame buffer,
//!   instance lifecycle, single-slot manager) and its collaborator traits
//!
//! # Example
//!
//! ```rust,no_run
//! use sd_video_anim::{
//!     playback::{FsStorage, HeadlessDisplay, PlaybackManager, TickTimers},
//!     schema::PlayerConfig,
//! };
//!
//! let config = PlayerConfig::load("player.json").unwrap();
//! let mut manager = PlaybackManager::new(
//!     HeadlessDisplay::new(),
//!     TickTimers::new(),
//!     FsStorage::new(&config.storage_root),
//!     config.registry(),
//!     config.pixel_format(),
//!     config.geometry(),
//! );
//! manager.start_group(config.group, config.interval()).unwrap();
//!
//! for _ in 0..100 {
//!     for handle in manager.timers_mut().advance(config.interval()) {
//!         manager.on_timer(handle);
//!     }
//! }
//! ```

pub mod playback;
pub mod schema;

// Re-export commonly used types
pub use playback::{PlaybackError, PlaybackManager, TickOutcome};
pub use schema::{ColorDepth, PlayerConfig};
