//! Featured-posts carousel with auto-advance

use std::time::Duration;

/// Most slides a carousel shows
pub const MAX_SLIDES: usize = 5;

/// Default auto-advance interval
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5000);

/// Carousel state with time advanced explicitly by the caller
#[derive(Debug, Clone)]
pub struct Carousel {
    count: usize,
    active: usize,
    interval: Duration,
    elapsed: Duration,
    hovered: bool,
}

impl Carousel {
    /// `featured` is the number of candidate posts; at most [`MAX_SLIDES`] are shown
    pub fn new(featured: usize, interval: Duration) -> Self {
        Self {
            count: featured.min(MAX_SLIDES),
            active: 0,
            interval,
            elapsed: Duration::ZERO,
            hovered: false,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Whether the timer runs and the arrows and dots are shown
    pub fn is_enabled(&self) -> bool {
        self.count > 1 && !self.interval.is_zero()
    }

    /// Pointer enter/leave. The timer keeps running.
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Let time pass. Returns how many slides were advanced.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        if !self.is_enabled() {
            return 0;
        }

        self.elapsed += elapsed;
        let mut moved = 0;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            if !self.hovered {
                self.active = (self.active + 1) % self.count;
                moved += 1;
            }
        }
        moved
    }

    pub fn next(&mut self) {
        if self.count > 1 {
            self.active = (self.active + 1) % self.count;
            self.reset_timer();
        }
    }

    pub fn prev(&mut self) {
        if self.count > 1 {
            self.active = (self.active + self.count - 1) % self.count;
            self.reset_timer();
        }
    }

    /// Jump to slide `index`; out-of-range indices are ignored
    pub fn go_to(&mut self, index: usize) {
        if self.count > 1 && index < self.count {
            self.active = index;
            self.reset_timer();
        }
    }

    /// Change the number of slides, restarting the timer
    pub fn set_count(&mut self, featured: usize) {
        self.count = featured.min(MAX_SLIDES);
        if self.active >= self.count {
            self.active = 0;
        }
        self.reset_timer();
    }

    fn reset_timer(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

impl Default for Carousel {
    fn default() -> Self {
        Self::new(0, DEFAULT_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_count_is_capped() {
        assert_eq!(Carousel::new(8, DEFAULT_INTERVAL).count(), 5);
        assert_eq!(Carousel::new(3, DEFAULT_INTERVAL).count(), 3);
    }

    #[test]
    fn test_auto_advance_wraps() {
        let mut c = Carousel::new(3, DEFAULT_INTERVAL);
        c.advance(ms(4999));
        assert_eq!(c.active(), 0);
        c.advance(ms(1));
        assert_eq!(c.active(), 1);
        assert_eq!(c.advance(ms(10_000)), 2);
        assert_eq!(c.active(), 0);
    }

    #[test]
    fn test_hover_pauses_without_resetting() {
        let mut c = Carousel::new(3, DEFAULT_INTERVAL);
        c.advance(ms(3000));
        c.set_hovered(true);
        c.advance(ms(5000));
        assert_eq!(c.active(), 0);

        c.set_hovered(false);
        // 3000 + 5000 - 5000 = 3000 carried over
        c.advance(ms(2000));
        assert_eq!(c.active(), 1);
    }

    #[test]
    fn test_manual_navigation_resets_timer() {
        let mut c = Carousel::new(5, DEFAULT_INTERVAL);
        c.advance(ms(4000));
        c.next();
        assert_eq!(c.active(), 1);
        c.advance(ms(4000));
        assert_eq!(c.active(), 1);

        c.prev();
        c.prev();
        assert_eq!(c.active(), 4);

        c.go_to(2);
        assert_eq!(c.active(), 2);
        c.go_to(9);
        assert_eq!(c.active(), 2);
    }

    #[test]
    fn test_single_slide_is_static() {
        let mut c = Carousel::new(1, DEFAULT_INTERVAL);
        assert!(!c.is_enabled());
        c.next();
        c.advance(ms(60_000));
        assert_eq!(c.active(), 0);

        let mut empty = Carousel::default();
        assert_eq!(empty.advance(ms(60_000)), 0);
    }

    #[test]
    fn test_set_count_clamps_active() {
        let mut c = Carousel::new(5, DEFAULT_INTERVAL);
        c.go_to(4);
        c.set_count(2);
        assert_eq!(c.active(), 0);
        assert_eq!(c.count(), 2);
    }
}
