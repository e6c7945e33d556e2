//! Wait timeouts
//!
//! A timeout is either infinite or a non-negative count of 100ns ticks.
//! [`TimeoutParts`] composes one from hours, minutes, seconds and
//! milliseconds; the parts add up, so one second plus 1000 milliseconds is
//! two seconds.

use core::time::Duration;

use nt_platform::types::LARGE_INTEGER;

use crate::config::{NANOS_PER_TICK, TICKS_PER_MILLISECOND};
use crate::{NtError, Result};

/// Duration a wait may block for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaitTimeout(Option<i64>);

impl WaitTimeout {
    pub const INFINITE: Self = Self(None);
    /// Poll without blocking
    pub const ZERO: Self = Self(Some(0));

    pub fn from_ticks(ticks: i64) -> Result<Self> {
        if ticks < 0 {
            return Err(NtError::InvalidArgument("timeout is negative"));
        }
        Ok(Self(Some(ticks)))
    }

    pub fn from_milliseconds(milliseconds: i64) -> Result<Self> {
        let ticks = milliseconds
            .checked_mul(TICKS_PER_MILLISECOND)
            .ok_or(NtError::InvalidArgument("timeout overflows"))?;
        Self::from_ticks(ticks)
    }

    pub fn from_duration(duration: Duration) -> Result<Self> {
        let ticks = duration.as_nanos() / u128::from(NANOS_PER_TICK);
        i64::try_from(ticks)
            .map(|ticks| Self(Some(ticks)))
            .map_err(|_| NtError::InvalidArgument("timeout overflows"))
    }

    #[inline]
    pub const fn is_infinite(self) -> bool {
        self.0.is_none()
    }

    /// Tick count, `None` when infinite
    #[inline]
    pub const fn ticks(self) -> Option<i64> {
        self.0
    }

    /// Whole milliseconds, `None` when infinite
    pub fn as_millis(self) -> Option<i64> {
        self.0.map(|ticks| ticks / TICKS_PER_MILLISECOND)
    }

    /// Kernel encoding: negative ticks for a relative interval, `None` to
    /// wait forever
    pub(crate) fn to_interval(self) -> Option<LARGE_INTEGER> {
        self.0.map(|ticks| -ticks)
    }
}

impl TryFrom<Duration> for WaitTimeout {
    type Error = NtError;

    fn try_from(duration: Duration) -> Result<Self> {
        Self::from_duration(duration)
    }
}

/// Unit-by-unit timeout description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeoutParts {
    pub hours: i32,
    pub minutes: i32,
    pub seconds: i32,
    pub milliseconds: i64,
    /// Overrides every numeric field
    pub infinite: bool,
}

impl TimeoutParts {
    pub const fn infinite() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            milliseconds: 0,
            infinite: true,
        }
    }

    /// Total in milliseconds: `ms + ((h * 60 + m) * 60 + s) * 1000`
    fn total_milliseconds(&self) -> Option<i64> {
        let minutes = i64::from(self.hours).checked_mul(60)?.checked_add(i64::from(self.minutes))?;
        let seconds = minutes.checked_mul(60)?.checked_add(i64::from(self.seconds))?;
        seconds.checked_mul(1000)?.checked_add(self.milliseconds)
    }

    /// Build the timeout.
    ///
    /// Fails with [`NtError::InvalidArgument`] if the total is negative or
    /// does not fit the tick range.
    pub fn compose(&self) -> Result<WaitTimeout> {
        if self.infinite {
            return Ok(WaitTimeout::INFINITE);
        }
        let total = self
            .total_milliseconds()
            .ok_or(NtError::InvalidArgument("timeout overflows"))?;
        if total < 0 {
            return Err(NtError::InvalidArgument("timeout is negative"));
        }
        WaitTimeout::from_milliseconds(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose(hours: i32, minutes: i32, seconds: i32, milliseconds: i64) -> Result<WaitTimeout> {
        TimeoutParts { hours, minutes, seconds, milliseconds, infinite: false }.compose()
    }

    #[test]
    fn test_units_add_up() {
        let samples = [(0, 0, 0, 0), (1, 0, 0, 0), (0, 2, 3, 4), (5, 59, 59, 999), (0, 0, 1, 1000)];
        for (h, m, s, ms) in samples {
            let expected = ms + ((i64::from(h) * 60 + i64::from(m)) * 60 + i64::from(s)) * 1000;
            assert_eq!(compose(h, m, s, ms).unwrap().as_millis(), Some(expected));
        }
    }

    #[test]
    fn test_second_plus_thousand_milliseconds() {
        assert_eq!(compose(0, 0, 1, 1000).unwrap(), WaitTimeout::from_milliseconds(2000).unwrap());
    }

    #[test]
    fn test_all_zero_is_zero() {
        assert_eq!(TimeoutParts::default().compose().unwrap(), WaitTimeout::ZERO);
    }

    #[test]
    fn test_infinite_ignores_fields() {
        let parts = TimeoutParts { hours: -1, milliseconds: 5, ..TimeoutParts::infinite() };
        assert_eq!(parts.compose().unwrap(), WaitTimeout::INFINITE);
        assert!(WaitTimeout::INFINITE.is_infinite());
        assert_eq!(WaitTimeout::INFINITE.to_interval(), None);
    }

    #[test]
    fn test_negative_total_rejected() {
        assert!(matches!(compose(0, 0, 0, -1), Err(NtError::InvalidArgument(_))));
        assert!(matches!(compose(0, -1, 0, 0), Err(NtError::InvalidArgument(_))));
        // Negative parts are fine while the total stays non-negative
        assert_eq!(compose(0, 0, 1, -500).unwrap().as_millis(), Some(500));
    }

    #[test]
    fn test_overflow_rejected() {
        assert!(matches!(compose(0, 0, 0, i64::MAX), Err(NtError::InvalidArgument(_))));
        assert!(WaitTimeout::from_duration(Duration::MAX).is_err());
    }

    #[test]
    fn test_kernel_interval_is_relative() {
        let timeout = WaitTimeout::from_milliseconds(3).unwrap();
        assert_eq!(timeout.ticks(), Some(30_000));
        assert_eq!(timeout.to_interval(), Some(-30_000));
        assert_eq!(WaitTimeout::from_duration(Duration::from_micros(250)).unwrap().ticks(), Some(2500));
    }
}
