//! # Frame Ticker
//!
//! One owned scheduler replaces per-component self-rescheduling loops:
//!
//! ```text
//! host display callback (now_ms)
//!   └─ Ticker::begin_frame ── FrameTime { frame, now_ms, delta_ms, frames }
//!        └─ for each registered entry (registration order): update(frame)
//! ```
//!
//! Entries are registered once and receive a [`TickHandle`]; disposing the
//! handle removes the entry. [`Ticker::stop`] tears everything down and
//! turns further frames into no-ops.

use crate::config::TimingConfig;

/// Disposer handle returned by [`Ticker::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u32);

impl TickHandle {
    /// Raw handle value (for logging).
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Timing information for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Frame number, starting at 0.
    pub frame: u64,
    /// Host timestamp of this frame (ms).
    pub now_ms: f64,
    /// Elapsed time since the previous frame, clamped (ms).
    pub delta_ms: f64,
    /// Frame length in reference frames; always `1.0` when easing
    /// normalization is off.
    pub frames: f32,
}

/// Turns host timestamps into [`FrameTime`]s.
#[derive(Debug, Clone)]
pub struct FrameClock {
    reference_ms: f64,
    max_frame_ms: f64,
    normalize: bool,
    last_ms: Option<f64>,
    frame: u64,
}

impl FrameClock {
    /// Creates a clock from timing configuration.
    #[must_use]
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            reference_ms: timing.reference_frame_ms,
            max_frame_ms: timing.max_frame_ms,
            normalize: timing.normalize_easing,
            last_ms: None,
            frame: 0,
        }
    }

    /// Advances to a new frame at `now_ms`.
    ///
    /// The first frame is treated as exactly one reference frame. Time that
    /// runs backwards counts as zero elapsed.
    pub fn advance(&mut self, now_ms: f64) -> FrameTime {
        let delta_ms = match self.last_ms {
            None => self.reference_ms,
            Some(last) => (now_ms - last).clamp(0.0, self.max_frame_ms),
        };
        self.last_ms = Some(now_ms);

        let frames = if self.normalize {
            (delta_ms / self.reference_ms) as f32
        } else {
            1.0
        };

        let time = FrameTime {
            frame: self.frame,
            now_ms,
            delta_ms,
            frames,
        };
        self.frame += 1;
        time
    }

    /// Number of frames produced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }
}

/// Owns the per-frame entries.
#[derive(Debug)]
pub struct Ticker<T> {
    entries: Vec<(TickHandle, T)>,
    next_handle: u32,
    clock: FrameClock,
    running: bool,
}

impl<T> Ticker<T> {
    /// Creates a running ticker with no entries.
    #[must_use]
    pub fn new(timing: &TimingConfig) -> Self {
        Self {
            entries: Vec::with_capacity(8),
            next_handle: 0,
            clock: FrameClock::new(timing),
            running: true,
        }
    }

    /// Registers an entry and returns its disposer handle.
    pub fn register(&mut self, entry: T) -> TickHandle {
        let handle = TickHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push((handle, entry));
        handle
    }

    /// Removes the entry for `handle`, returning it if it was registered.
    pub fn dispose(&mut self, handle: TickHandle) -> Option<T> {
        let index = self.entries.iter().position(|(h, _)| *h == handle)?;
        Some(self.entries.remove(index).1)
    }

    /// Starts a frame. Returns `None` once the ticker has been stopped.
    pub fn begin_frame(&mut self, now_ms: f64) -> Option<FrameTime> {
        if !self.running {
            return None;
        }
        Some(self.clock.advance(now_ms))
    }

    /// Stops the ticker and returns every entry, in registration order.
    pub fn stop(&mut self) -> Vec<T> {
        self.running = false;
        self.entries.drain(..).map(|(_, entry)| entry).collect()
    }

    /// True until [`stop`](Self::stop) is called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Number of registered entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Frames produced so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Iterates entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (TickHandle, &T)> {
        self.entries.iter().map(|(h, e)| (*h, e))
    }

    /// Iterates entries mutably in registration order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (TickHandle, &mut T)> {
        self.entries.iter_mut().map(|(h, e)| (*h, e))
    }

    /// The entry for `handle`, if still registered.
    pub fn get_mut(&mut self, handle: TickHandle) -> Option<&mut T> {
        self.entries
            .iter_mut()
            .find(|(h, _)| *h == handle)
            .map(|(_, e)| e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing() -> TimingConfig {
        TimingConfig::default()
    }

    #[test]
    fn test_first_frame_is_one_reference_frame() {
        let mut clock = FrameClock::new(&timing());
        let first = clock.advance(1234.0);
        assert_eq!(first.frame, 0);
        assert!((first.frames - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_double_length_frame() {
        let config = timing();
        let mut clock = FrameClock::new(&config);
        clock.advance(0.0);
        let next = clock.advance(config.reference_frame_ms * 2.0);
        assert!((next.frames - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_delta_is_clamped() {
        let config = timing();
        let mut clock = FrameClock::new(&config);
        clock.advance(0.0);
        let stalled = clock.advance(60_000.0);
        assert_eq!(stalled.delta_ms, config.max_frame_ms);
        let backwards = clock.advance(10.0);
        assert_eq!(backwards.delta_ms, 0.0);
    }

    #[test]
    fn test_fixed_frames_without_normalization() {
        let config = TimingConfig {
            normalize_easing: false,
            ..TimingConfig::default()
        };
        let mut clock = FrameClock::new(&config);
        clock.advance(0.0);
        assert_eq!(clock.advance(50.0).frames, 1.0);
    }

    #[test]
    fn test_register_dispose_stop() {
        let mut ticker: Ticker<&'static str> = Ticker::new(&timing());
        let a = ticker.register("a");
        let b = ticker.register("b");
        assert_ne!(a, b);
        assert_eq!(ticker.len(), 2);

        if let Some(entry) = ticker.get_mut(b) {
            *entry = "b2";
        }
        assert_eq!(ticker.dispose(a), Some("a"));
        assert_eq!(ticker.dispose(a), None);
        assert_eq!(ticker.iter().map(|(_, e)| *e).collect::<Vec<_>>(), vec!["b2"]);
        assert!(ticker.get_mut(a).is_none());

        for i in 0..3 {
            assert!(ticker.begin_frame(f64::from(i) * 16.0).is_some());
        }
        assert_eq!(ticker.frame_count(), 3);

        assert_eq!(ticker.stop(), vec!["b2"]);
        assert!(!ticker.is_running());
        assert!(ticker.begin_frame(100.0).is_none());
        assert!(ticker.is_empty());
    }
}
