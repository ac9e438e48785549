//! Frame sequence and load-to-speed mapping for the parrot animation.

use std::time::Duration;

/// Number of sprites in the parrot loop
pub const FRAME_COUNT: usize = 10;

pub const DEFAULT_FRAME_PREFIX: &str = "imgs/actions/cpu-usage/parrot-";
pub const DEFAULT_MIN_FRAME_DELAY_MS: u64 = 20;
pub const DEFAULT_MAX_FRAME_DELAY_MS: u64 = 220;

/// Fixed cyclic list of image identifiers, `<prefix>0` .. `<prefix>9`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    frames: Vec<String>,
}

impl FrameSequence {
    pub fn new(prefix: &str) -> Self {
        Self {
            frames: (0..FRAME_COUNT).map(|i| format!("{}{}", prefix, i)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Image id for `index`, wrapping around the sequence
    pub fn get(&self, index: usize) -> &str {
        &self.frames[index % self.frames.len()]
    }

    /// Index of an image id previously handed out by `get`
    pub fn position(&self, image: &str) -> Option<usize> {
        self.frames.iter().position(|f| f == image)
    }
}

impl Default for FrameSequence {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_PREFIX)
    }
}

/// Current position in a frame sequence; always in `[0, len)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    index: usize,
    len: usize,
}

impl FrameCursor {
    pub fn new(len: usize) -> Self {
        Self {
            index: 0,
            len: len.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the current index and step to the next one
    pub fn advance(&mut self) -> usize {
        let current = self.index;
        self.index = (self.index + 1) % self.len;
        current
    }
}

/// Delay bounds for the animation loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    pub fn new(min: Duration, max: Duration) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Linear interpolation from `max` at 0% load down to `min` at 100% load.
    pub fn delay_for(&self, utilization: f64) -> Duration {
        let u = if utilization.is_finite() {
            utilization.clamp(0.0, 100.0)
        } else {
            0.0
        };
        let min_us = self.min.as_micros() as f64;
        let max_us = self.max.as_micros() as f64;
        let us = (max_us - (u / 100.0) * (max_us - min_us)).clamp(min_us, max_us);
        Duration::from_micros(us.round() as u64)
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_MIN_FRAME_DELAY_MS),
            Duration::from_millis(DEFAULT_MAX_FRAME_DELAY_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_has_ten_prefixed_frames() {
        let frames = FrameSequence::new("parrot/");
        assert_eq!(frames.len(), FRAME_COUNT);
        assert_eq!(frames.get(0), "parrot/0");
        assert_eq!(frames.get(9), "parrot/9");
        assert_eq!(frames.get(13), "parrot/3");
        assert_eq!(frames.position("parrot/7"), Some(7));
        assert_eq!(frames.position("parrot/10"), None);
    }

    #[test]
    fn cursor_cycles_with_period_ten() {
        let mut cursor = FrameCursor::new(FRAME_COUNT);
        let seen: Vec<usize> = (0..25).map(|_| cursor.advance()).collect();
        let expected: Vec<usize> = (0..25).map(|i| i % 10).collect();
        assert_eq!(seen, expected);
        assert_eq!(cursor.index(), 5);
    }

    #[test]
    fn delay_endpoints_and_midpoint() {
        let range = DelayRange::default();
        assert_eq!(range.delay_for(0.0), Duration::from_millis(220));
        assert_eq!(range.delay_for(50.0), Duration::from_millis(120));
        assert_eq!(range.delay_for(100.0), Duration::from_millis(20));
    }

    #[test]
    fn delay_is_bounded_and_non_increasing() {
        let range = DelayRange::default();
        let mut previous = Duration::MAX;
        for step in 0..=1000 {
            let d = range.delay_for(step as f64 / 10.0);
            assert!(d >= Duration::from_millis(20) && d <= Duration::from_millis(220));
            assert!(d <= previous);
            previous = d;
        }
    }

    #[test]
    fn out_of_range_load_is_clamped() {
        let range = DelayRange::default();
        assert_eq!(range.delay_for(-5.0), Duration::from_millis(220));
        assert_eq!(range.delay_for(250.0), Duration::from_millis(20));
        assert_eq!(range.delay_for(f64::NAN), Duration::from_millis(220));
    }

    #[test]
    fn inverted_bounds_are_swapped() {
        let range = DelayRange::new(Duration::from_millis(300), Duration::from_millis(100));
        assert_eq!(range.min, Duration::from_millis(100));
        assert_eq!(range.max, Duration::from_millis(300));
    }
}
