//! Cooperative host scheduler.
//!
//! Models the single-threaded event loop the backdrop lives on: interval
//! timers, one-shot frame requests serviced once per display refresh, and
//! resize listener registrations. The owner advances time and drains frame
//! requests; callbacks are dispatched by the owner, never from here, so no
//! callback can re-enter another.

use std::time::Duration;

/// Shortest interval period; shorter requests are raised to it so `advance`
/// always makes progress.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Handle of an interval timer.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TimerId(u64);

/// Handle of a pending frame request.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FrameRequestId(u64);

/// Handle of a resize listener registration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct ListenerId(u64);

#[derive(Debug, Clone)]
struct Interval {
    id: TimerId,
    period: Duration,
    next_due: Duration,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    intervals: Vec<Interval>,
    frames: Vec<FrameRequestId>,
    resize_listeners: Vec<ListenerId>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since the scheduler was created.
    #[inline]
    pub fn now(&self) -> Duration {
        self.now
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    // ── timers ────────────────────────────────────────────────────────────

    /// Registers a repeating timer; the first tick is one `period` from now.
    ///
    /// Periods below [`MIN_INTERVAL`] are raised to it.
    pub fn set_interval(&mut self, period: Duration) -> TimerId {
        if period < MIN_INTERVAL {
            log::warn!("interval period {period:?} raised to {MIN_INTERVAL:?}");
        }
        let period = period.max(MIN_INTERVAL);
        let id = TimerId(self.next_id());
        self.intervals.push(Interval {
            id,
            period,
            next_due: self.now + period,
        });
        id
    }

    /// Cancels a timer. Returns `false` if it was not active.
    pub fn clear_interval(&mut self, id: TimerId) -> bool {
        let before = self.intervals.len();
        self.intervals.retain(|t| t.id != id);
        self.intervals.len() != before
    }

    pub fn is_interval_active(&self, id: TimerId) -> bool {
        self.intervals.iter().any(|t| t.id == id)
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    /// Advances the clock by `dt` and returns every timer tick that fell due,
    /// in firing order. A long step yields several ticks of the same timer.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        let target = self.now + dt;
        let mut fired = Vec::new();

        loop {
            let next = self
                .intervals
                .iter_mut()
                .filter(|t| t.next_due <= target)
                .min_by_key(|t| t.next_due);

            let Some(timer) = next else { break };
            self.now = timer.next_due;
            timer.next_due += timer.period;
            fired.push(timer.id);
        }

        self.now = target;
        fired
    }

    // ── frames ────────────────────────────────────────────────────────────

    /// Requests a callback on the next display refresh.
    pub fn request_frame(&mut self) -> FrameRequestId {
        let id = FrameRequestId(self.next_id());
        self.frames.push(id);
        id
    }

    /// Withdraws a pending frame request. Returns `false` if it was not pending.
    pub fn cancel_frame(&mut self, id: FrameRequestId) -> bool {
        let before = self.frames.len();
        self.frames.retain(|f| *f != id);
        self.frames.len() != before
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Takes the requests to service for this refresh.
    ///
    /// Requests made while servicing them belong to the following refresh.
    pub fn begin_frame(&mut self) -> Vec<FrameRequestId> {
        std::mem::take(&mut self.frames)
    }

    // ── resize listeners ──────────────────────────────────────────────────

    pub fn add_resize_listener(&mut self) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.resize_listeners.push(id);
        id
    }

    /// Returns `false` if the listener was not registered.
    pub fn remove_resize_listener(&mut self, id: ListenerId) -> bool {
        let before = self.resize_listeners.len();
        self.resize_listeners.retain(|l| *l != id);
        self.resize_listeners.len() != before
    }

    pub fn resize_listeners(&self) -> &[ListenerId] {
        &self.resize_listeners
    }

    /// True when nothing is registered: no timers, frames or listeners.
    pub fn is_idle(&self) -> bool {
        self.intervals.is_empty() && self.frames.is_empty() && self.resize_listeners.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    // ── timers ────────────────────────────────────────────────────────────

    #[test]
    fn interval_fires_once_per_period() {
        let mut s = Scheduler::new();
        let t = s.set_interval(ms(2000));
        assert!(s.advance(ms(1999)).is_empty());
        assert_eq!(s.advance(ms(1)), vec![t]);
        assert!(s.advance(ms(1000)).is_empty());
        assert_eq!(s.advance(ms(1000)), vec![t]);
    }

    #[test]
    fn long_step_fires_every_missed_tick() {
        let mut s = Scheduler::new();
        let t = s.set_interval(ms(2000));
        assert_eq!(s.advance(ms(6500)), vec![t, t, t]);
        assert_eq!(s.now(), ms(6500));
    }

    #[test]
    fn ticks_of_two_timers_interleave_by_due_time() {
        let mut s = Scheduler::new();
        let a = s.set_interval(ms(300));
        let b = s.set_interval(ms(500));
        assert_eq!(s.advance(ms(1000)), vec![a, b, a, a, b]);
    }

    #[test]
    fn zero_period_is_raised_to_minimum() {
        let mut s = Scheduler::new();
        let t = s.set_interval(Duration::ZERO);
        assert_eq!(s.advance(ms(5)), vec![t; 5]);
        assert_eq!(s.now(), ms(5));
    }

    #[test]
    fn cleared_interval_never_fires() {
        let mut s = Scheduler::new();
        let t = s.set_interval(ms(100));
        assert!(s.clear_interval(t));
        assert!(!s.clear_interval(t));
        assert!(s.advance(ms(1000)).is_empty());
        assert!(!s.is_interval_active(t));
    }

    // ── frames ────────────────────────────────────────────────────────────

    #[test]
    fn frame_requests_are_serviced_once() {
        let mut s = Scheduler::new();
        let f = s.request_frame();
        assert_eq!(s.begin_frame(), vec![f]);
        assert!(s.begin_frame().is_empty());
    }

    #[test]
    fn request_during_service_waits_for_next_refresh() {
        let mut s = Scheduler::new();
        s.request_frame();
        let batch = s.begin_frame();
        assert_eq!(batch.len(), 1);
        let next = s.request_frame();
        assert_eq!(s.pending_frames(), 1);
        assert_eq!(s.begin_frame(), vec![next]);
    }

    #[test]
    fn cancelled_frame_is_not_serviced() {
        let mut s = Scheduler::new();
        let f = s.request_frame();
        assert!(s.cancel_frame(f));
        assert!(!s.cancel_frame(f));
        assert!(s.begin_frame().is_empty());
    }

    // ── listeners ─────────────────────────────────────────────────────────

    #[test]
    fn resize_listener_registration() {
        let mut s = Scheduler::new();
        let l = s.add_resize_listener();
        assert_eq!(s.resize_listeners(), &[l]);
        assert!(s.remove_resize_listener(l));
        assert!(!s.remove_resize_listener(l));
        assert!(s.is_idle());
    }
}
