/// A closed range of ray parameters `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Returns a copy with the upper bound lowered to `max` (never raised).
    pub fn clip_max(&self, max: f32) -> Interval {
        Interval::new(self.min, self.max.min(max))
    }

    /// Shrink both ends inward by `eps`.
    ///
    /// An infinite upper bound stays infinite.
    pub fn shrink(&self, eps: f32) -> Interval {
        Interval::new(self.min + eps, self.max - eps)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Every non-negative ray parameter.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };
}

impl Default for Interval {
    fn default() -> Self {
        Self::FORWARD
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        // Outside bounds
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
    }

    #[test]
    fn test_interval_clip_max() {
        let interval = Interval::new(1.0, 10.0);
        assert_eq!(interval.clip_max(4.0), Interval::new(1.0, 4.0));
        // Never widens
        assert_eq!(interval.clip_max(20.0), Interval::new(1.0, 10.0));
    }

    #[test]
    fn test_interval_shrink() {
        let shrunk = Interval::new(0.0, 2.0).shrink(0.5);
        assert_eq!(shrunk, Interval::new(0.5, 1.5));

        let open = Interval::FORWARD.shrink(0.5);
        assert_eq!(open.min, 0.5);
        assert_eq!(open.max, f32::INFINITY);
    }

    #[test]
    fn test_interval_empty() {
        let empty = Interval::EMPTY;
        assert!(empty.min > empty.max);
        assert!(!empty.contains(0.0));
        assert!(!empty.contains(f32::INFINITY));
    }
}
