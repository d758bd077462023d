//! Scratch buffers reused across compiles.
//!
//! A compiler owns one `Scratch`; every compile resets it instead of
//! reallocating the bound lists and the live set.

use crate::bound::RangeBound;
use crate::config::Config;
use crate::data::EvalData;

/// A reference tagged with one of its section's bounds.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoundEntry {
    pub eval: EvalData,
    pub bound: RangeBound,
}

#[derive(Debug, Default)]
pub struct Scratch {
    pub(crate) lower_bounds: Vec<BoundEntry>,
    pub(crate) upper_bounds: Vec<BoundEntry>,
    /// Live set: references overlapping the sweep position, in opening order.
    pub(crate) overlapping: Vec<EvalData>,
    /// Parallel to `overlapping`.
    pub(crate) ref_counts: Vec<u32>,
}

impl Scratch {
    pub fn new(cfg: &Config) -> Self {
        Self {
            lower_bounds: Vec::with_capacity(cfg.scratch_sections),
            upper_bounds: Vec::with_capacity(cfg.scratch_sections),
            overlapping: Vec::with_capacity(cfg.scratch_overlaps),
            ref_counts: Vec::with_capacity(cfg.scratch_overlaps),
        }
    }

    #[inline]
    pub fn reset(&mut self) {
        self.lower_bounds.clear();
        self.upper_bounds.clear();
        self.overlapping.clear();
        self.ref_counts.clear();
    }

    pub(crate) fn open(&mut self, eval: EvalData) {
        match self.overlapping.iter().position(|e| *e == eval) {
            Some(i) => self.ref_counts[i] += 1,
            None => {
                self.overlapping.push(eval);
                self.ref_counts.push(1);
            }
        }
    }

    pub(crate) fn close(&mut self, eval: EvalData) {
        let Some(i) = self.overlapping.iter().position(|e| *e == eval) else {
            debug_assert!(false, "closing {eval:?} which is not live");
            return;
        };
        self.ref_counts[i] -= 1;
        if self.ref_counts[i] == 0 {
            self.overlapping.remove(i);
            self.ref_counts.remove(i);
        }
    }
}
