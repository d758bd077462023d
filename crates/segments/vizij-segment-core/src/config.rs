//! Core configuration for vizij-segment-core.

use serde::{Deserialize, Serialize};

/// What to do when a rule inserts a segment wider than the gap it fills.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapOverflowPolicy {
    /// Clip the segment to the gap and log a warning.
    #[default]
    Clip,
    /// Fail the compile with [`crate::error::CompileError::GapOverflow`].
    Reject,
}

/// Configuration for compiler sizing and policies.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Initial capacity hints for the bound lists.
    pub scratch_sections: usize,
    /// Initial capacity hint for the live set.
    pub scratch_overlaps: usize,

    pub gap_overflow: GapOverflowPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scratch_sections: 64,
            scratch_overlaps: 16,
            gap_overflow: GapOverflowPolicy::Clip,
        }
    }
}
