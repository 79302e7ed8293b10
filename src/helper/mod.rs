use std::time::{Duration, Instant};

/// Tracks whether the duplicate storage bar has to be pinned to the top of
/// the viewport. It is shown as soon as the main bar has scrolled out, i.e.
/// its bottom edge is above the viewport.
///
/// Scroll samples are throttled: the first sample of a window is applied
/// right away, the newest sample that arrived during the window is applied by
/// [`StickyBar::flush`] once the window is over.
///
/// The terminal report has no viewport, this is for front ends embedding the
/// library that draw the bar in a scrolling view.
pub struct StickyBar {
    throttle: Duration,
    sticky: bool,
    last_applied: Option<Instant>,
    pending: Option<f64>,
}

impl StickyBar {
    pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(100);

    pub fn new() -> StickyBar {
        StickyBar::with_throttle(StickyBar::DEFAULT_THROTTLE)
    }

    pub fn with_throttle(throttle: Duration) -> StickyBar {
        StickyBar {
            throttle,
            sticky: false,
            last_applied: None,
            pending: None,
        }
    }

    /// Feeds the bottom edge of the main bar, relative to the top of the
    /// viewport. Returns whether the sticky bar is shown afterwards.
    pub fn on_scroll(&mut self, bar_bottom: f64, now: Instant) -> bool {
        match self.last_applied {
            Some(last) if now.duration_since(last) < self.throttle => {
                self.pending = Some(bar_bottom);
            }
            _ => {
                self.pending = None;
                self.apply(bar_bottom, now);
            }
        }

        self.sticky
    }

    pub fn flush(&mut self, now: Instant) -> bool {
        if let (Some(last), Some(bar_bottom)) = (self.last_applied, self.pending) {
            if now.duration_since(last) >= self.throttle {
                self.pending = None;
                self.apply(bar_bottom, now);
            }
        }

        self.sticky
    }

    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    fn apply(&mut self, bar_bottom: f64, now: Instant) {
        self.sticky = bar_bottom < 0.0;
        self.last_applied = Some(now);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TooltipPosition {
    pub percent: f64,
    pub anchor: Anchor,
}

/// Places the breakdown tooltip at the pointer. Past the middle of the bar
/// the tooltip hangs to the left of the pointer so it stays on screen.
/// Meant for front ends that show the segment breakdown on hover.
pub fn tooltip_position(pointer_x: f64, bar_width: f64) -> TooltipPosition {
    let percent = if bar_width > 0.0 {
        pointer_x / bar_width * 100.0
    } else {
        50.0
    };

    TooltipPosition {
        percent,
        anchor: if percent > 50.0 {
            Anchor::Right
        } else {
            Anchor::Left
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sticks_once_the_bar_scrolled_out() {
        let start = Instant::now();
        let mut bar = StickyBar::new();

        assert!(!bar.on_scroll(120.0, start));
        assert!(bar.on_scroll(-1.0, start + Duration::from_millis(150)));
        assert!(!bar.on_scroll(0.0, start + Duration::from_millis(300)));
    }

    #[test]
    fn throttles_scroll_samples() {
        let start = Instant::now();
        let mut bar = StickyBar::new();

        assert!(!bar.on_scroll(40.0, start));
        assert!(!bar.on_scroll(-20.0, start + Duration::from_millis(30)));
        assert!(!bar.on_scroll(-60.0, start + Duration::from_millis(60)));
        assert!(!bar.flush(start + Duration::from_millis(90)));
        assert!(bar.flush(start + Duration::from_millis(100)));
        assert!(bar.is_sticky());
    }

    #[test]
    fn flush_without_pending_sample_keeps_state() {
        let start = Instant::now();
        let mut bar = StickyBar::with_throttle(Duration::from_millis(10));

        assert!(!bar.flush(start));
        assert!(bar.on_scroll(-5.0, start));
        assert!(bar.flush(start + Duration::from_secs(1)));
    }

    #[test]
    fn anchors_tooltip_by_pointer_position() {
        assert_eq!(
            tooltip_position(25.0, 200.0),
            TooltipPosition {
                percent: 12.5,
                anchor: Anchor::Left
            }
        );
        assert_eq!(tooltip_position(100.0, 200.0).anchor, Anchor::Left);
        assert_eq!(tooltip_position(150.0, 200.0).anchor, Anchor::Right);
        assert_eq!(tooltip_position(10.0, 0.0).percent, 50.0);
    }
}
