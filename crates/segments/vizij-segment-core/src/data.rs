//! Compiler inputs and outputs.
//!
//! `SectionData` is one entry fed to the segment compiler; `Segment` is one
//! entry it produces. `SectionDesc` is what a host hands to the row builder
//! for each section on a track.

use serde::{Deserialize, Serialize};

use crate::bound::{RangeBound, TimeRange};

/// Which part of a section a reference evaluates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvalFlags {
    #[default]
    None,
    /// Lead-in region before the section's start.
    PreRoll,
    /// Lead-out region after the section's end.
    PostRoll,
}

/// Reference to caller-owned section data plus evaluation flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvalData {
    /// Index into the caller's data the reference resolves against.
    pub impl_index: usize,
    #[serde(default)]
    pub flags: EvalFlags,
}

impl EvalData {
    #[inline]
    pub fn new(impl_index: usize) -> Self {
        Self {
            impl_index,
            flags: EvalFlags::None,
        }
    }

    #[inline]
    pub fn with_flags(impl_index: usize, flags: EvalFlags) -> Self {
        Self { impl_index, flags }
    }
}

/// One compiler input entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SectionData {
    pub bounds: TimeRange,
    pub eval: EvalData,
    /// Caller-defined ordering hint; the sweep itself ignores it.
    #[serde(default)]
    pub priority: i32,
}

impl SectionData {
    pub fn new(bounds: TimeRange, eval: EvalData, priority: i32) -> Self {
        Self {
            bounds,
            eval,
            priority,
        }
    }
}

/// One compiled segment: a range and every reference active over it.
///
/// Reference order is significant and governs precedence for consumers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub range: TimeRange,
    pub impls: Vec<EvalData>,
}

impl Segment {
    pub fn new(range: TimeRange, impls: Vec<EvalData>) -> Self {
        Self { range, impls }
    }

    /// Segment with no references.
    pub fn empty(range: TimeRange) -> Self {
        Self {
            range,
            impls: Vec::new(),
        }
    }

    #[inline]
    pub fn impl_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.impls.iter().map(|e| e.impl_index)
    }
}

/// Host-side description of a section, consumed by [`crate::rows::Rows::build`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDesc {
    pub range: TimeRange,
    #[serde(default)]
    pub row_index: usize,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
    /// Infinite sections cover all time regardless of `range`.
    #[serde(default)]
    pub infinite: bool,
    #[serde(default)]
    pub pre_roll: f32,
    #[serde(default)]
    pub post_roll: f32,
}

fn default_active() -> bool {
    true
}

impl SectionDesc {
    pub fn new(range: TimeRange, row_index: usize) -> Self {
        Self {
            range,
            row_index,
            priority: 0,
            active: true,
            infinite: false,
            pre_roll: 0.0,
            post_roll: 0.0,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_roll(mut self, pre_roll: f32, post_roll: f32) -> Self {
        self.pre_roll = pre_roll;
        self.post_roll = post_roll;
        self
    }

    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Range the section nominally covers.
    pub fn effective_range(&self) -> TimeRange {
        if self.infinite {
            TimeRange::all()
        } else {
            self.range
        }
    }

    /// Lead-in range `[lower - pre_roll, lower)`, if the section has one.
    pub fn pre_roll_range(&self) -> Option<TimeRange> {
        let range = self.effective_range();
        let lower = range.lower.value()?;
        (self.pre_roll > 0.0).then(|| {
            TimeRange::new(
                RangeBound::Inclusive(lower - self.pre_roll),
                RangeBound::Exclusive(lower),
            )
        })
    }

    /// Lead-out range `(upper, upper + post_roll]`, if the section has one.
    pub fn post_roll_range(&self) -> Option<TimeRange> {
        let range = self.effective_range();
        let upper = range.upper.value()?;
        (self.post_roll > 0.0).then(|| {
            TimeRange::new(
                RangeBound::Exclusive(upper),
                RangeBound::Inclusive(upper + self.post_roll),
            )
        })
    }
}

/// Row-local compiler entry remembering the caller's flat section index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RowSectionData {
    /// Index into the caller's original section list.
    pub actual_index: usize,
    pub data: SectionData,
}

impl RowSectionData {
    pub fn new(actual_index: usize, data: SectionData) -> Self {
        Self { actual_index, data }
    }
}
