//! A single running animation and its per-tick state machine.

use std::fmt;
use std::num::NonZeroU32;
use std::time::Duration;

use log::{debug, error, warn};

use super::{
    Display, FrameBuffer, FrameGeometry, FrameLoadError, PathPattern, PixelFormat, PlaybackError,
    Storage, TimerService, load_frame,
};

/// Validated arguments for starting an animation.
///
/// Building one touches no resources, so a rejected request has no side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationRequest {
    pub pattern: PathPattern,
    pub frame_count: NonZeroU32,
    pub interval: Duration,
}

impl AnimationRequest {
    pub fn new(pattern: &str, frame_count: u32, interval: Duration) -> Result<Self, PlaybackError> {
        let pattern = PathPattern::parse(pattern)?;
        let frame_count = NonZeroU32::new(frame_count).ok_or(PlaybackError::ZeroFrameCount)?;
        Ok(Self {
            pattern,
            frame_count,
            interval,
        })
    }
}

/// Result of one timer tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The frame was read in full and the surface asked to redraw.
    Presented { frame: u32 },
    /// The frame could not be read; the previous frame stays on screen.
    Skipped { frame: u32, reason: FrameLoadError },
}

impl TickOutcome {
    /// 1-based frame number this tick tried to show.
    pub fn frame(&self) -> u32 {
        match self {
            TickOutcome::Presented { frame } | TickOutcome::Skipped { frame, .. } => *frame,
        }
    }

    pub fn is_presented(&self) -> bool {
        matches!(self, TickOutcome::Presented { .. })
    }
}

/// Tick counters for one instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    pub ticks: u64,
    pub presented: u64,
    pub skipped: u64,
}

impl PlaybackStats {
    fn record(&mut self, outcome: &TickOutcome) {
        self.ticks += 1;
        if outcome.is_presented() {
            self.presented += 1;
        } else {
            self.skipped += 1;
        }
    }
}

impl fmt::Display for PlaybackStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} frames presented, {} skipped",
            self.ticks, self.presented, self.skipped
        )
    }
}

/// A running animation: frame buffer, display surface and timer, owned together.
///
/// `S` is the display's surface handle, `H` the timer handle. Either both
/// exist or the instance does not; it is only released through
/// [`AnimationInstance::teardown`].
#[derive(Debug)]
pub struct AnimationInstance<S, H> {
    pattern: PathPattern,
    frame_count: NonZeroU32,
    frame_index: u32,
    interval: Duration,
    buffer: FrameBuffer,
    surface: S,
    timer: H,
    first_frame_presented: bool,
    stats: PlaybackStats,
}

impl<S, H: Copy + Eq> AnimationInstance<S, H> {
    /// Build an instance, releasing everything acquired so far on the first failure.
    ///
    /// Frame 1 is loaded eagerly but is best-effort: a missing first frame
    /// leaves the surface blank until a later tick succeeds.
    pub fn create<D, T, St>(
        request: AnimationRequest,
        format: PixelFormat,
        geometry: FrameGeometry,
        display: &mut D,
        timers: &mut T,
        storage: &St,
    ) -> Result<Self, PlaybackError>
    where
        D: Display<Surface = S>,
        T: TimerService<Handle = H>,
        St: Storage + ?Sized,
    {
        let AnimationRequest {
            pattern,
            frame_count,
            interval,
        } = request;

        let mut buffer = FrameBuffer::allocate(geometry, format)?;

        let surface = display.create_surface(geometry).inspect_err(|e| {
            error!("Animation {pattern}: {e}");
        })?;
        display.bind(&surface, buffer.descriptor());

        let first_path = pattern.resolve(1);
        let first_frame_presented = match load_frame(storage, &first_path, buffer.as_bytes_mut()) {
            Ok(()) => {
                display.invalidate(&surface, buffer.as_bytes());
                true
            }
            Err(e) => {
                warn!("First frame unavailable, starting blank: {e}");
                buffer.as_bytes_mut().fill(0);
                false
            }
        };

        let timer = match timers.register(interval) {
            Ok(timer) => timer,
            Err(e) => {
                error!("Animation {pattern}: {e}");
                display.destroy_surface(surface);
                return Err(e.into());
            }
        };

        Ok(Self {
            pattern,
            frame_count,
            frame_index: 0,
            interval,
            buffer,
            surface,
            timer,
            first_frame_presented,
            stats: PlaybackStats::default(),
        })
    }

    /// Advance by one frame.
    ///
    /// Loads frame `frame_index + 1` and presents it only if it was read in
    /// full. The index advances whatever happens.
    pub fn tick<D, St>(&mut self, display: &mut D, storage: &St) -> TickOutcome
    where
        D: Display<Surface = S>,
        St: Storage + ?Sized,
    {
        let frame = self.frame_index + 1;
        let path = self.pattern.resolve(frame);

        let outcome = match load_frame(storage, &path, self.buffer.as_bytes_mut()) {
            Ok(()) => {
                display.invalidate(&self.surface, self.buffer.as_bytes());
                debug!("Presented {path}");
                TickOutcome::Presented { frame }
            }
            Err(reason) => {
                warn!("Skipping frame {frame}: {reason}");
                TickOutcome::Skipped { frame, reason }
            }
        };

        self.frame_index = (self.frame_index + 1) % self.frame_count.get();
        self.stats.record(&outcome);
        outcome
    }

    /// Cancel the timer, destroy the surface, then free the buffer.
    pub fn teardown<D, T>(self, display: &mut D, timers: &mut T)
    where
        D: Display<Surface = S>,
        T: TimerService<Handle = H>,
    {
        let Self {
            timer,
            surface,
            buffer,
            ..
        } = self;
        timers.cancel(timer);
        display.destroy_surface(surface);
        drop(buffer);
    }

    /// Whether `handle` is this instance's timer.
    #[inline]
    pub fn owns_timer(&self, handle: H) -> bool {
        self.timer == handle
    }

    pub fn timer(&self) -> H {
        self.timer
    }
}

impl<S, H> AnimationInstance<S, H> {
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }

    pub fn frame_count(&self) -> u32 {
        self.frame_count.get()
    }

    /// Current position in `[0, frame_count)`.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn first_frame_presented(&self) -> bool {
        self.first_frame_presented
    }

    pub fn stats(&self) -> PlaybackStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::playback::{HeadlessDisplay, MemoryStorage, SurfaceId, TickTimers, TimerId};
    use proptest::prelude::*;

    const GEOMETRY: FrameGeometry = FrameGeometry::new(4, 2);
    const FORMAT: PixelFormat = PixelFormat::Rgb565;
    const FRAME_SIZE: usize = 4 * 2 * 2;
    const PATTERN: &str = "/g0/out%03d.bin";

    fn frame_bytes(frame: u32) -> Vec<u8> {
        vec![frame as u8; FRAME_SIZE]
    }

    fn storage_with(frames: &[u32]) -> MemoryStorage {
        let mut storage = MemoryStorage::new();
        for &frame in frames {
            storage.insert(format!("/g0/out{frame:03}.bin"), frame_bytes(frame));
        }
        storage
    }

    fn create(
        frame_count: u32,
        display: &mut HeadlessDisplay,
        timers: &mut TickTimers,
        storage: &MemoryStorage,
    ) -> Result<AnimationInstance<SurfaceId, TimerId>, PlaybackError> {
        let request = AnimationRequest::new(PATTERN, frame_count, Duration::from_millis(100))?;
        AnimationInstance::create(request, FORMAT, GEOMETRY, display, timers, storage)
    }

    #[test]
    fn test_request_validation() {
        assert!(matches!(
            AnimationRequest::new(PATTERN, 0, Duration::from_millis(1)),
            Err(PlaybackError::ZeroFrameCount)
        ));
        assert!(matches!(
            AnimationRequest::new("", 3, Duration::from_millis(1)),
            Err(PlaybackError::EmptyPattern)
        ));
    }

    #[test]
    fn test_create_presents_first_frame() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let storage = storage_with(&[1, 2, 3]);

        let instance = create(3, &mut display, &mut timers, &storage).unwrap();
        assert!(instance.first_frame_presented());
        assert_eq!(instance.frame_index(), 0);
        assert_eq!(instance.buffer().len(), FRAME_SIZE);
        assert_eq!(timers.active(), 1);

        let surface = display.surface(instance.surface()).unwrap();
        assert_eq!(surface.presents, 1);
        assert_eq!(surface.contents, frame_bytes(1));
        assert_eq!(surface.descriptor, Some(instance.buffer().descriptor()));
    }

    #[test]
    fn test_missing_first_frame_is_not_fatal() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let storage = storage_with(&[2]);

        let instance = create(2, &mut display, &mut timers, &storage).unwrap();
        assert!(!instance.first_frame_presented());
        assert!(instance.buffer().as_bytes().iter().all(|&b| b == 0));
        assert_eq!(display.surface(instance.surface()).unwrap().presents, 0);
    }

    #[test]
    fn test_surface_failure_releases_nothing_else() {
        let mut display = HeadlessDisplay::new().with_surface_limit(0);
        let mut timers = TickTimers::new();
        let storage = storage_with(&[1]);

        let result = create(1, &mut display, &mut timers, &storage);
        assert!(matches!(result, Err(PlaybackError::Surface(_))));
        assert_eq!(display.live_surfaces(), 0);
        assert_eq!(timers.active(), 0);
    }

    #[test]
    fn test_timer_failure_rolls_back_surface() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new().with_capacity_limit(0);
        let storage = storage_with(&[1]);

        let result = create(1, &mut display, &mut timers, &storage);
        assert!(matches!(result, Err(PlaybackError::Timer(_))));
        assert_eq!(display.live_surfaces(), 0);
        assert_eq!(display.destroyed_surfaces(), 1);
    }

    #[test]
    fn test_loop_visits_every_frame_in_order() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let storage = storage_with(&[1, 2, 3]);
        let mut instance = create(3, &mut display, &mut timers, &storage).unwrap();

        let mut indices = vec![instance.frame_index()];
        for tick in 0..6u32 {
            let outcome = instance.tick(&mut display, &storage);
            assert!(outcome.is_presented());
            assert_eq!(outcome.frame(), tick % 3 + 1);
            let surface = display.surface(instance.surface()).unwrap();
            assert_eq!(surface.contents, frame_bytes(tick % 3 + 1));
            indices.push(instance.frame_index());
        }
        assert_eq!(indices, vec![0, 1, 2, 0, 1, 2, 0]);
        // One eager present plus one per tick
        assert_eq!(display.surface(instance.surface()).unwrap().presents, 7);
    }

    #[test]
    fn test_missing_frame_keeps_previous_content() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let storage = storage_with(&[1, 3]);
        let mut instance = create(3, &mut display, &mut timers, &storage).unwrap();

        let first = instance.tick(&mut display, &storage);
        assert!(first.is_presented());
        assert_eq!(instance.frame_index(), 1);

        let second = instance.tick(&mut display, &storage);
        assert!(matches!(
            second,
            TickOutcome::Skipped {
                frame: 2,
                reason: FrameLoadError::Open { .. }
            }
        ));
        assert_eq!(instance.frame_index(), 2);
        let surface = display.surface(instance.surface()).unwrap();
        assert_eq!(surface.contents, frame_bytes(1));
        assert_eq!(surface.presents, 2);

        let third = instance.tick(&mut display, &storage);
        assert!(third.is_presented());
        assert_eq!(instance.frame_index(), 0);
        assert_eq!(
            display.surface(instance.surface()).unwrap().contents,
            frame_bytes(3)
        );

        let stats = instance.stats();
        assert_eq!(stats.ticks, 3);
        assert_eq!(stats.presented, 2);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn test_short_frame_is_never_presented() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let mut storage = storage_with(&[1]);
        storage.insert("/g0/out002.bin", vec![0xAA; FRAME_SIZE - 1]);
        let mut instance = create(2, &mut display, &mut timers, &storage).unwrap();

        instance.tick(&mut display, &storage);
        let outcome = instance.tick(&mut display, &storage);
        assert!(matches!(
            outcome,
            TickOutcome::Skipped {
                reason: FrameLoadError::Truncated { .. },
                ..
            }
        ));
        let surface = display.surface(instance.surface()).unwrap();
        assert_eq!(surface.contents, frame_bytes(1));
    }

    #[test]
    fn test_failures_then_success_presents_that_frame() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let storage = storage_with(&[5]);
        let mut instance = create(5, &mut display, &mut timers, &storage).unwrap();

        for _ in 0..4 {
            assert!(!instance.tick(&mut display, &storage).is_presented());
        }
        let outcome = instance.tick(&mut display, &storage);
        assert!(matches!(outcome, TickOutcome::Presented { frame: 5 }));

        let surface = display.surface(instance.surface()).unwrap();
        assert_eq!(surface.presents, 1);
        assert_eq!(surface.contents, frame_bytes(5));
    }

    #[test]
    fn test_teardown_releases_everything() {
        let mut display = HeadlessDisplay::new();
        let mut timers = TickTimers::new();
        let storage = storage_with(&[1]);
        let instance = create(1, &mut display, &mut timers, &storage).unwrap();
        let timer = instance.timer();

        instance.teardown(&mut display, &mut timers);
        assert!(!timers.is_registered(timer));
        assert_eq!(display.live_surfaces(), 0);
    }

    proptest! {
        #[test]
        fn prop_index_follows_tick_count(
            frame_count in 1u32..12,
            present in proptest::collection::vec(any::<bool>(), 12),
            ticks in 0usize..60,
        ) {
            let frames: Vec<u32> = (1..=frame_count)
                .filter(|&f| present[(f - 1) as usize])
                .collect();
            let storage = storage_with(&frames);
            let mut display = HeadlessDisplay::new();
            let mut timers = TickTimers::new();
            let mut instance = create(frame_count, &mut display, &mut timers, &storage).unwrap();

            for _ in 0..ticks {
                instance.tick(&mut display, &storage);
                prop_assert!(instance.frame_index() < frame_count);
            }
            prop_assert_eq!(instance.frame_index(), (ticks as u32) % frame_count);
            prop_assert_eq!(instance.stats().ticks, ticks as u64);
        }
    }
}
