//! Range bounds and time ranges over the sequencer's float time domain.
//!
//! A [`RangeBound`] is one endpoint of a [`TimeRange`]. Bounds are either
//! inclusive or exclusive at a value, or unbounded. The same type serves as a
//! lower or an upper bound; which role it plays decides how it orders against
//! other bounds (see [`RangeBound::cmp_lower`] and [`RangeBound::cmp_upper`]).

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One endpoint of a [`TimeRange`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RangeBound {
    Inclusive(f32),
    Exclusive(f32),
    #[default]
    Unbounded,
}

fn cmp_value(a: f32, b: f32) -> Ordering {
    // NaN bounds are rejected before any sweep runs.
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

impl RangeBound {
    #[inline]
    pub fn is_unbounded(&self) -> bool {
        matches!(self, RangeBound::Unbounded)
    }

    #[inline]
    pub fn is_bounded(&self) -> bool {
        !self.is_unbounded()
    }

    #[inline]
    pub fn is_inclusive(&self) -> bool {
        matches!(self, RangeBound::Inclusive(_))
    }

    #[inline]
    pub fn is_exclusive(&self) -> bool {
        matches!(self, RangeBound::Exclusive(_))
    }

    /// Bound value, or `None` when unbounded.
    #[inline]
    pub fn value(&self) -> Option<f32> {
        match *self {
            RangeBound::Inclusive(v) | RangeBound::Exclusive(v) => Some(v),
            RangeBound::Unbounded => None,
        }
    }

    /// Swap inclusive and exclusive at the same value. Unbounded stays unbounded.
    ///
    /// Flipping the upper bound of a range yields the lower bound of the range
    /// that adjoins it, and vice versa.
    #[inline]
    pub fn flip_inclusion(self) -> Self {
        match self {
            RangeBound::Inclusive(v) => RangeBound::Exclusive(v),
            RangeBound::Exclusive(v) => RangeBound::Inclusive(v),
            RangeBound::Unbounded => RangeBound::Unbounded,
        }
    }

    /// Ordering of two bounds used as lower bounds.
    ///
    /// Unbounded sorts first; at equal values an inclusive bound sorts before
    /// an exclusive one, since `[x` starts covering earlier than `(x`.
    pub fn cmp_lower(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => cmp_value(a, b).then_with(|| {
                match (self.is_inclusive(), other.is_inclusive()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            }),
        }
    }

    /// Ordering of two bounds used as upper bounds.
    ///
    /// Unbounded sorts last; at equal values an exclusive bound sorts before
    /// an inclusive one, since `x)` stops covering earlier than `x]`.
    pub fn cmp_upper(&self, other: &Self) -> Ordering {
        match (self.value(), other.value()) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => cmp_value(a, b).then_with(|| {
                match (self.is_exclusive(), other.is_exclusive()) {
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    _ => Ordering::Equal,
                }
            }),
        }
    }

    /// The earlier of two lower bounds.
    pub fn min_lower(a: Self, b: Self) -> Self {
        if a.cmp_lower(&b) == Ordering::Greater {
            b
        } else {
            a
        }
    }

    /// The later of two lower bounds.
    pub fn max_lower(a: Self, b: Self) -> Self {
        if a.cmp_lower(&b) == Ordering::Less {
            b
        } else {
            a
        }
    }

    /// The earlier of two upper bounds.
    pub fn min_upper(a: Self, b: Self) -> Self {
        if a.cmp_upper(&b) == Ordering::Greater {
            b
        } else {
            a
        }
    }

    /// The later of two upper bounds.
    pub fn max_upper(a: Self, b: Self) -> Self {
        if a.cmp_upper(&b) == Ordering::Less {
            b
        } else {
            a
        }
    }
}

/// A range of time between a lower and an upper [`RangeBound`].
///
/// Ranges may be empty (lower past upper, or a single point with an exclusive end).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub lower: RangeBound,
    pub upper: RangeBound,
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::all()
    }
}

impl TimeRange {
    #[inline]
    pub fn new(lower: RangeBound, upper: RangeBound) -> Self {
        Self { lower, upper }
    }

    /// `[lower, upper)`
    #[inline]
    pub fn closed_open(lower: f32, upper: f32) -> Self {
        Self::new(RangeBound::Inclusive(lower), RangeBound::Exclusive(upper))
    }

    /// `[lower, upper]`
    #[inline]
    pub fn closed(lower: f32, upper: f32) -> Self {
        Self::new(RangeBound::Inclusive(lower), RangeBound::Inclusive(upper))
    }

    /// `(lower, upper)`
    #[inline]
    pub fn open(lower: f32, upper: f32) -> Self {
        Self::new(RangeBound::Exclusive(lower), RangeBound::Exclusive(upper))
    }

    /// `[value, value]`
    #[inline]
    pub fn point(value: f32) -> Self {
        Self::closed(value, value)
    }

    /// The fully unbounded range.
    #[inline]
    pub fn all() -> Self {
        Self::new(RangeBound::Unbounded, RangeBound::Unbounded)
    }

    pub fn is_empty(&self) -> bool {
        match (self.lower.value(), self.upper.value()) {
            (Some(lo), Some(hi)) => {
                if lo > hi {
                    return true;
                }
                lo == hi && (self.lower.is_exclusive() || self.upper.is_exclusive())
            }
            _ => false,
        }
    }

    pub fn contains_time(&self, time: f32) -> bool {
        let above_lower = match self.lower {
            RangeBound::Inclusive(v) => time >= v,
            RangeBound::Exclusive(v) => time > v,
            RangeBound::Unbounded => true,
        };
        let below_upper = match self.upper {
            RangeBound::Inclusive(v) => time <= v,
            RangeBound::Exclusive(v) => time < v,
            RangeBound::Unbounded => true,
        };
        above_lower && below_upper
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: &TimeRange) -> bool {
        self.lower.cmp_lower(&other.lower) != Ordering::Greater
            && other.upper.cmp_upper(&self.upper) != Ordering::Greater
    }

    /// Whether the two ranges touch without overlapping or leaving a gap.
    pub fn adjoins(&self, other: &TimeRange) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        fn touches(upper: RangeBound, lower: RangeBound) -> bool {
            match (upper, lower) {
                (RangeBound::Inclusive(a), RangeBound::Exclusive(b))
                | (RangeBound::Exclusive(a), RangeBound::Inclusive(b)) => a == b,
                _ => false,
            }
        }
        touches(self.upper, other.lower) || touches(other.upper, self.lower)
    }

    /// Smallest range covering both inputs.
    pub fn hull(&self, other: &TimeRange) -> TimeRange {
        TimeRange::new(
            RangeBound::min_lower(self.lower, other.lower),
            RangeBound::max_upper(self.upper, other.upper),
        )
    }

    /// Overlap of both inputs; may be empty.
    pub fn intersection(&self, other: &TimeRange) -> TimeRange {
        TimeRange::new(
            RangeBound::max_lower(self.lower, other.lower),
            RangeBound::min_upper(self.upper, other.upper),
        )
    }

    pub(crate) fn has_nan(&self) -> bool {
        self.lower.value().is_some_and(f32::is_nan) || self.upper.value().is_some_and(f32::is_nan)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lower {
            RangeBound::Inclusive(v) => write!(f, "[{v}")?,
            RangeBound::Exclusive(v) => write!(f, "({v}")?,
            RangeBound::Unbounded => f.write_str("(-inf")?,
        }
        f.write_str(", ")?;
        match self.upper {
            RangeBound::Inclusive(v) => write!(f, "{v}]"),
            RangeBound::Exclusive(v) => write!(f, "{v})"),
            RangeBound::Unbounded => f.write_str("+inf)"),
        }
    }
}
