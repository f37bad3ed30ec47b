//! Single-slot owner of the active animation.

use std::time::Duration;

use log::info;

use super::{
    AnimationInstance, AnimationRequest, Display, FrameGeometry, GroupRegistry, PixelFormat,
    PlaybackError, Storage, TickOutcome, TimerService,
};

/// Owns the display, timer and storage collaborators and at most one
/// running [`AnimationInstance`].
///
/// Everything runs on the display loop's thread: `start*`, `stop` and
/// `on_timer` never overlap, so the slot needs no locking.
///
/// Usage:
/// ```ignore
/// let mut manager = PlaybackManager::new(display, timers, storage, registry, format, geometry);
/// manager.start_group(0, Duration::from_millis(100))?;
/// for handle in manager.timers_mut().advance(elapsed) {
///     manager.on_timer(handle);
/// }
/// ```
pub struct PlaybackManager<D: Display, T: TimerService, S: Storage> {
    display: D,
    timers: T,
    storage: S,
    registry: GroupRegistry,
    format: PixelFormat,
    geometry: FrameGeometry,
    active: Option<AnimationInstance<D::Surface, T::Handle>>,
}

impl<D: Display, T: TimerService, S: Storage> PlaybackManager<D, T, S> {
    pub fn new(
        display: D,
        timers: T,
        storage: S,
        registry: GroupRegistry,
        format: PixelFormat,
        geometry: FrameGeometry,
    ) -> Self {
        Self {
            display,
            timers,
            storage,
            registry,
            format,
            geometry,
            active: None,
        }
    }

    /// Start a registered group, replacing whatever is playing.
    ///
    /// An out-of-range index fails without touching the current animation.
    pub fn start_group(&mut self, index: i32, interval: Duration) -> Result<(), PlaybackError> {
        let group = self.registry.resolve(index)?;
        info!(
            "Starting group {index}: {} ({} frames)",
            group.pattern, group.frame_count
        );
        self.start(&group.pattern, group.frame_count, interval)
    }

    /// Start an animation from a pattern and frame count, replacing whatever is playing.
    ///
    /// Invalid arguments fail without touching the current animation. Once
    /// they are accepted the current animation is torn down first; if the new
    /// one then fails to build, nothing is left playing.
    pub fn start(
        &mut self,
        pattern: &str,
        frame_count: u32,
        interval: Duration,
    ) -> Result<(), PlaybackError> {
        let request = AnimationRequest::new(pattern, frame_count, interval)?;

        if self.active.is_some() {
            info!("Replacing active animation with {}", request.pattern);
            self.stop();
        }

        let instance = AnimationInstance::create(
            request,
            self.format,
            self.geometry,
            &mut self.display,
            &mut self.timers,
            &self.storage,
        )?;
        info!(
            "Playing {} ({} frames every {:?})",
            instance.pattern(),
            instance.frame_count(),
            instance.interval()
        );
        self.active = Some(instance);
        Ok(())
    }

    /// Stop the active animation, if any.
    pub fn stop(&mut self) {
        if let Some(instance) = self.active.take() {
            info!("Stopping {} after {}", instance.pattern(), instance.stats());
            instance.teardown(&mut self.display, &mut self.timers);
        }
    }

    /// Handle a fired timer.
    ///
    /// Returns `None` when `handle` does not belong to the active animation,
    /// e.g. a firing that raced with `stop`.
    pub fn on_timer(&mut self, handle: T::Handle) -> Option<TickOutcome> {
        let instance = self.active.as_mut()?;
        if !instance.owns_timer(handle) {
            return None;
        }
        Some(instance.tick(&mut self.display, &self.storage))
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&AnimationInstance<D::Surface, T::Handle>> {
        self.active.as_ref()
    }

    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    pub fn geometry(&self) -> FrameGeometry {
        self.geometry
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Mutable timers, for the loop that decides which handles fired.
    pub fn timers_mut(&mut self) -> &mut T {
        &mut self.timers
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}

impl<D: Display, T: TimerService, S: Storage> Drop for PlaybackManager<D, T, S> {
    fn drop(&mut self) {
        self.stop();
    }
}
