/// Coalesces bursts of scroll events into one evaluation per display frame.
///
/// The first scroll event after a frame asks the host to schedule a frame
/// callback; further events are absorbed until that callback runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameThrottle {
    pending: bool,
}

impl FrameThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scroll event. Returns `true` when a frame callback must be
    /// scheduled, `false` when one is already outstanding.
    pub fn on_scroll(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        true
    }

    /// Mark the outstanding frame callback as run. Returns whether one was
    /// actually pending.
    pub fn on_frame(&mut self) -> bool {
        std::mem::replace(&mut self.pending, false)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_schedules_once() {
        let mut throttle = FrameThrottle::new();
        let scheduled = (0..10).filter(|_| throttle.on_scroll()).count();
        assert_eq!(scheduled, 1);
        assert!(throttle.is_pending());
    }

    #[test]
    fn test_frame_rearms() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.on_scroll());
        assert!(throttle.on_frame());
        assert!(!throttle.is_pending());
        assert!(throttle.on_scroll());
    }

    #[test]
    fn test_spurious_frame() {
        let mut throttle = FrameThrottle::new();
        assert!(!throttle.on_frame());
    }
}
