//! Recurring timer collaborator.
//!
//! Timers fire on the same loop that drives the display. The loop forwards
//! each fired handle to [`PlaybackManager::on_timer`](super::PlaybackManager::on_timer);
//! the manager only ticks the instance that owns the handle.

use std::time::Duration;

use super::TimerError;

/// Recurring timer registrations.
pub trait TimerService {
    /// Handle to one registration.
    type Handle: Copy + Eq + std::fmt::Debug;

    /// Register a timer that fires every `period`.
    fn register(&mut self, period: Duration) -> Result<Self::Handle, TimerError>;

    /// Cancel a registration. It never fires again.
    fn cancel(&mut self, handle: Self::Handle);
}

/// Handle issued by [`TickTimers`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u32);

#[derive(Debug, Clone)]
struct Registration {
    id: TimerId,
    period: Duration,
    elapsed: Duration,
}

/// Manually clocked timers for running the engine off-target.
///
/// Time only moves through [`TickTimers::advance`].
#[derive(Debug, Default)]
pub struct TickTimers {
    registrations: Vec<Registration>,
    next_id: u32,
    capacity: Option<usize>,
}

impl TickTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail registration once `capacity` timers are active.
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Number of active registrations.
    pub fn active(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_registered(&self, handle: TimerId) -> bool {
        self.registrations.iter().any(|r| r.id == handle)
    }

    /// Move the clock forward and return every firing, in order.
    ///
    /// A timer whose period fits several times into `elapsed` fires that
    /// many times.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerId> {
        let mut fired = Vec::new();
        for registration in &mut self.registrations {
            registration.elapsed += elapsed;
            while registration.elapsed >= registration.period {
                registration.elapsed -= registration.period;
                fired.push(registration.id);
            }
        }
        fired
    }
}

impl TimerService for TickTimers {
    type Handle = TimerId;

    fn register(&mut self, period: Duration) -> Result<TimerId, TimerError> {
        if period.is_zero() {
            return Err(TimerError::ZeroPeriod);
        }
        if let Some(limit) = self.capacity
            && self.registrations.len() >= limit
        {
            return Err(TimerError::Exhausted { limit });
        }

        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.registrations.push(Registration {
            id,
            period,
            elapsed: Duration::ZERO,
        });
        Ok(id)
    }

    fn cancel(&mut self, handle: TimerId) {
        self.registrations.retain(|r| r.id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_every_period() {
        let mut timers = TickTimers::new();
        let id = timers.register(Duration::from_millis(100)).unwrap();

        assert!(timers.advance(Duration::from_millis(50)).is_empty());
        assert_eq!(timers.advance(Duration::from_millis(50)), vec![id]);
        assert_eq!(timers.advance(Duration::from_millis(250)), vec![id, id]);
        // 50ms carried over
        assert_eq!(timers.advance(Duration::from_millis(50)), vec![id]);
    }

    #[test]
    fn test_cancel_stops_firing() {
        let mut timers = TickTimers::new();
        let id = timers.register(Duration::from_millis(10)).unwrap();
        timers.cancel(id);
        assert!(!timers.is_registered(id));
        assert!(timers.advance(Duration::from_secs(1)).is_empty());
        // Cancelling twice is harmless
        timers.cancel(id);
    }

    #[test]
    fn test_rejects_zero_period_and_exhaustion() {
        let mut timers = TickTimers::new().with_capacity_limit(1);
        assert!(matches!(
            timers.register(Duration::ZERO),
            Err(TimerError::ZeroPeriod)
        ));
        timers.register(Duration::from_millis(1)).unwrap();
        assert!(matches!(
            timers.register(Duration::from_millis(1)),
            Err(TimerError::Exhausted { limit: 1 })
        ));
    }
}
