// src/mail/interval.rs
//! Delay between two dispatches, in whole minutes.

use rand::Rng;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Lowest delay the provider tolerates without throttling
pub const MINIMUM_INTERVAL_FLOOR: i64 = 30;
pub const DEFAULT_MAXIMUM_INTERVAL: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendInterval {
    pub minimum: u64,
    pub maximum: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntervalCorrection {
    #[error("Interval Minimum of {given} minutes is lower than {floor} minutes!", floor = MINIMUM_INTERVAL_FLOOR)]
    MinimumTooLow { given: i64 },
    #[error("Interval Maximum of {given} minutes is lower than {floor} minutes!", floor = MINIMUM_INTERVAL_FLOOR)]
    MaximumTooLow { given: i64 },
    #[error("Interval Maximum of {maximum} minutes is lower than Interval Minimum of {minimum} minutes!")]
    MaximumBelowMinimum { maximum: i64, minimum: i64 },
}

impl SendInterval {
    /// Clamp the configured bounds. Each rule that fires is returned, in order.
    pub fn configure(minimum: i64, maximum: i64) -> (Self, Vec<IntervalCorrection>) {
        let mut corrections = Vec::new();
        let (mut minimum, mut maximum) = (minimum, maximum);

        if minimum < MINIMUM_INTERVAL_FLOOR {
            corrections.push(IntervalCorrection::MinimumTooLow { given: minimum });
            minimum = MINIMUM_INTERVAL_FLOOR;
        }
        if maximum < MINIMUM_INTERVAL_FLOOR {
            corrections.push(IntervalCorrection::MaximumTooLow { given: maximum });
            maximum = DEFAULT_MAXIMUM_INTERVAL;
        }
        if maximum < minimum {
            corrections.push(IntervalCorrection::MaximumBelowMinimum { maximum, minimum });
            minimum = MINIMUM_INTERVAL_FLOOR;
            maximum = DEFAULT_MAXIMUM_INTERVAL;
        }

        // Both bounds are at least the floor here
        let interval = Self {
            minimum: minimum.unsigned_abs(),
            maximum: maximum.unsigned_abs(),
        };
        (interval, corrections)
    }

    /// Uniform whole-minute draw in `[minimum, maximum]`
    pub fn draw_minutes<R: Rng>(&self, rng: &mut R) -> u64 {
        rng.gen_range(self.minimum..=self.maximum)
    }

    pub fn draw<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(self.draw_minutes(rng).saturating_mul(60))
    }
}

impl fmt::Display for SendInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} minutes", self.minimum, self.maximum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_valid_bounds_are_unchanged() {
        let (interval, corrections) = SendInterval::configure(35, 50);
        assert_eq!(interval, SendInterval { minimum: 35, maximum: 50 });
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_low_bounds_fall_back_to_defaults() {
        let (interval, corrections) = SendInterval::configure(10, 20);
        assert_eq!(interval, SendInterval { minimum: 30, maximum: 60 });
        assert_eq!(
            corrections,
            vec![
                IntervalCorrection::MinimumTooLow { given: 10 },
                IntervalCorrection::MaximumTooLow { given: 20 }
            ]
        );
    }

    #[test]
    fn test_inverted_bounds_reset_to_default_pair() {
        let (interval, corrections) = SendInterval::configure(40, 35);
        assert_eq!(interval, SendInterval { minimum: 30, maximum: 60 });
        assert_eq!(
            corrections,
            vec![IntervalCorrection::MaximumBelowMinimum { maximum: 35, minimum: 40 }]
        );
    }

    #[test]
    fn test_configure_is_idempotent() {
        let (first, _) = SendInterval::configure(10, 20);
        let (second, corrections) =
            SendInterval::configure(first.minimum as i64, first.maximum as i64);
        assert_eq!(first, second);
        assert!(corrections.is_empty());
    }

    #[test]
    fn test_draws_stay_within_bounds() {
        let interval = SendInterval { minimum: 30, maximum: 32 };
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let minutes = interval.draw_minutes(&mut rng);
            assert!((30..=32).contains(&minutes));
        }
        let fixed = SendInterval { minimum: 45, maximum: 45 };
        assert_eq!(fixed.draw(&mut rng), Duration::from_secs(45 * 60));
    }

    #[test]
    fn test_huge_bounds_saturate_instead_of_overflowing() {
        let (interval, corrections) = SendInterval::configure(i64::MAX / 2, i64::MAX);
        assert!(corrections.is_empty());

        let mut rng = StdRng::seed_from_u64(3);
        let delay = interval.draw(&mut rng);
        assert!(delay >= Duration::from_secs(30 * 60));

        let ceiling = SendInterval { minimum: u64::MAX, maximum: u64::MAX };
        assert_eq!(ceiling.draw(&mut rng), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_correction_messages() {
        assert_eq!(
            IntervalCorrection::MinimumTooLow { given: 10 }.to_string(),
            "Interval Minimum of 10 minutes is lower than 30 minutes!"
        );
        assert_eq!(
            IntervalCorrection::MaximumBelowMinimum { maximum: 35, minimum: 40 }.to_string(),
            "Interval Maximum of 35 minutes is lower than Interval Minimum of 40 minutes!"
        );
    }
}
