//! Rational time values and half-open time ranges.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tolerance used when comparing instants expressed in seconds.
const SECONDS_EPSILON: f64 = 1e-9;

/// Slack added before flooring a value to whole frames, so that a value such
/// as `99.99999999997` produced by rescaling still lands on frame 100.
const FRAME_EPSILON: f64 = 1e-6;

/// A point in time (or a duration) expressed as `value` units at `rate`
/// units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RationalTime {
    pub value: f64,
    pub rate: f64,
}

impl RationalTime {
    pub const fn new(value: f64, rate: f64) -> Self {
        Self { value, rate }
    }

    pub const fn zero(rate: f64) -> Self {
        Self { value: 0.0, rate }
    }

    /// Build a time from seconds, expressed at `rate`.
    pub fn from_seconds(seconds: f64, rate: f64) -> Self {
        Self::new(seconds * rate, rate)
    }

    pub fn to_seconds(&self) -> f64 {
        self.value / self.rate
    }

    /// The same instant expressed at a different rate.
    pub fn rescaled_to(&self, rate: f64) -> Self {
        if rate == self.rate {
            return *self;
        }
        Self::new(self.value_rescaled_to(rate), rate)
    }

    pub fn value_rescaled_to(&self, rate: f64) -> f64 {
        self.value * rate / self.rate
    }

    /// Whole frames at this time's own rate, rounded down.
    pub fn to_frames(&self) -> i64 {
        (self.value + FRAME_EPSILON).floor() as i64
    }

    /// Whole frames after rescaling to `rate`, rounded down.
    pub fn to_frames_at(&self, rate: f64) -> i64 {
        self.rescaled_to(rate).to_frames()
    }

    pub fn has_valid_rate(&self) -> bool {
        self.rate.is_finite() && self.rate > 0.0
    }

    /// Whether both times denote the same instant within `delta` seconds.
    pub fn almost_equal(&self, other: &Self, delta: f64) -> bool {
        (self.to_seconds() - other.to_seconds()).abs() <= delta
    }

    /// Order two instants by their real-valued position, treating values
    /// closer than a nanosecond as equal.
    pub fn cmp_instant(&self, other: &Self) -> Ordering {
        let a = self.to_seconds();
        let b = other.to_seconds();
        if (a - b).abs() <= SECONDS_EPSILON {
            Ordering::Equal
        } else if a < b {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    pub fn is_before(&self, other: &Self) -> bool {
        self.cmp_instant(other) == Ordering::Less
    }

    /// The later of the two instants, keeping that instant's rate.
    pub fn latest(self, other: Self) -> Self {
        if other.is_before(&self) || self.cmp_instant(&other) == Ordering::Equal {
            self
        } else {
            other
        }
    }

    /// The earlier of the two instants, keeping that instant's rate.
    pub fn earliest(self, other: Self) -> Self {
        if self.is_before(&other) || self.cmp_instant(&other) == Ordering::Equal {
            self
        } else {
            other
        }
    }
}

impl Add for RationalTime {
    type Output = RationalTime;

    fn add(self, rhs: RationalTime) -> RationalTime {
        RationalTime::new(self.value + rhs.value_rescaled_to(self.rate), self.rate)
    }
}

impl AddAssign for RationalTime {
    fn add_assign(&mut self, rhs: RationalTime) {
        *self = *self + rhs;
    }
}

impl Sub for RationalTime {
    type Output = RationalTime;

    fn sub(self, rhs: RationalTime) -> RationalTime {
        RationalTime::new(self.value - rhs.value_rescaled_to(self.rate), self.rate)
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.value, self.rate)
    }
}

/// A half-open range `[start_time, start_time + duration)`.
///
/// The duration is always stored at the start time's rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_time: RationalTime,
    pub duration: RationalTime,
}

impl TimeRange {
    pub fn new(start_time: RationalTime, duration: RationalTime) -> Self {
        Self {
            start_time,
            duration: duration.rescaled_to(start_time.rate),
        }
    }

    /// Build a range and check it against the model invariants.
    pub fn try_new(start_time: RationalTime, duration: RationalTime) -> Result<Self> {
        let range = Self::new(start_time, duration);
        range.validate("time range")?;
        Ok(range)
    }

    /// Build a range from a start and an exclusive end. An end before the
    /// start yields an empty range.
    pub fn from_start_end_time(start_time: RationalTime, end_time_exclusive: RationalTime) -> Self {
        let end = end_time_exclusive.rescaled_to(start_time.rate);
        let duration = (end.value - start_time.value).max(0.0);
        Self {
            start_time,
            duration: RationalTime::new(duration, start_time.rate),
        }
    }

    pub fn rate(&self) -> f64 {
        self.start_time.rate
    }

    pub fn end_time_exclusive(&self) -> RationalTime {
        self.start_time + self.duration
    }

    pub fn is_empty(&self) -> bool {
        self.duration.to_seconds() <= SECONDS_EPSILON
    }

    pub fn rescaled_to(&self, rate: f64) -> Self {
        Self {
            start_time: self.start_time.rescaled_to(rate),
            duration: self.duration.rescaled_to(rate),
        }
    }

    /// Whether the two ranges share any instant. Ranges that merely touch
    /// end to start do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_time.is_before(&other.end_time_exclusive())
            && other.start_time.is_before(&self.end_time_exclusive())
    }

    pub fn contains(&self, time: &RationalTime) -> bool {
        !time.is_before(&self.start_time) && time.is_before(&self.end_time_exclusive())
    }

    /// The overlapping part of two ranges, expressed at this range's rate.
    pub fn intersection(&self, other: &TimeRange) -> Option<TimeRange> {
        if !self.overlaps(other) {
            return None;
        }
        let start = self
            .start_time
            .latest(other.start_time)
            .rescaled_to(self.rate());
        let end = self
            .end_time_exclusive()
            .earliest(other.end_time_exclusive());
        Some(TimeRange::from_start_end_time(start, end))
    }

    /// Check the rate and duration invariants, naming `context` on failure.
    pub fn validate(&self, context: &str) -> Result<()> {
        for time in [&self.start_time, &self.duration] {
            if !time.has_valid_rate() {
                return Err(Error::non_positive_rate(time.rate, context));
            }
        }
        if self.duration.value < 0.0 {
            return Err(Error::negative_duration(self.duration.value, context));
        }
        Ok(())
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} +{}]", self.start_time, self.duration)
    }
}
