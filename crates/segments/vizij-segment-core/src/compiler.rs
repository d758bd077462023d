//! Segment compiler: sweep a set of possibly overlapping sections into
//! ordered, non-overlapping segments.
//!
//! Lower and upper bounds are sorted separately and consumed by two cursors.
//! A live set (references plus parallel reference counts) tracks which
//! sections cover the sweep position. Each time the live set changes, the
//! current segment is closed and a new one opened with a snapshot of it.

use log::debug;

use crate::bound::{RangeBound, TimeRange};
use crate::config::Config;
use crate::data::{SectionData, Segment};
use crate::error::CompileError;
use crate::rules::{process_segments, CompilerRules};
use crate::scratch::{BoundEntry, Scratch};

/// Compiler owning its configuration and scratch buffers. Reuse one instance
/// across compiles to avoid reallocating.
#[derive(Debug, Default)]
pub struct SegmentCompiler {
    cfg: Config,
    scratch: Scratch,
}

impl SegmentCompiler {
    pub fn new(cfg: Config) -> Self {
        let scratch = Scratch::new(&cfg);
        Self { cfg, scratch }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    pub fn compile(
        &mut self,
        data: &[SectionData],
        rules: Option<&dyn CompilerRules>,
    ) -> Result<Vec<Segment>, CompileError> {
        compile_segments(data, rules, &self.cfg, &mut self.scratch)
    }
}

/// Compile `data` into segments using caller-provided scratch space.
///
/// Empty sections are ignored. When `rules` is given, the swept segments are
/// handed to [`process_segments`] before returning.
pub fn compile_segments(
    data: &[SectionData],
    rules: Option<&dyn CompilerRules>,
    cfg: &Config,
    scratch: &mut Scratch,
) -> Result<Vec<Segment>, CompileError> {
    scratch.reset();

    for (index, section) in data.iter().enumerate() {
        if section.bounds.has_nan() {
            return Err(CompileError::NanBound { index });
        }
        if section.bounds.is_empty() {
            continue;
        }
        scratch.lower_bounds.push(BoundEntry {
            eval: section.eval,
            bound: section.bounds.lower,
        });
        scratch.upper_bounds.push(BoundEntry {
            eval: section.eval,
            bound: section.bounds.upper,
        });
    }

    // Stable sorts: entries sharing a bound stay in input order.
    scratch
        .lower_bounds
        .sort_by(|a, b| a.bound.cmp_lower(&b.bound));
    scratch
        .upper_bounds
        .sort_by(|a, b| a.bound.cmp_upper(&b.bound));

    let mut sweep = Sweep {
        scratch,
        lower_read: 0,
        upper_read: 0,
        segments: Vec::new(),
    };
    sweep.run();
    let mut segments = sweep.segments;

    debug!(
        "compiled {} sections into {} segments",
        data.len(),
        segments.len()
    );

    if let Some(rules) = rules {
        process_segments(rules, &mut segments, data, cfg.gap_overflow)?;
    }
    Ok(segments)
}

struct Sweep<'s> {
    scratch: &'s mut Scratch,
    lower_read: usize,
    upper_read: usize,
    segments: Vec<Segment>,
}

impl Sweep<'_> {
    fn run(&mut self) {
        while self.lower_read < self.scratch.lower_bounds.len() {
            self.close_completed_segments();

            let opening = self.scratch.lower_bounds[self.lower_read].bound;
            while let Some(entry) = self.scratch.lower_bounds.get(self.lower_read) {
                if entry.bound != opening {
                    break;
                }
                let eval = entry.eval;
                self.scratch.open(eval);
                self.lower_read += 1;
            }

            self.segments.push(Segment::new(
                TimeRange::new(opening, RangeBound::Unbounded),
                self.scratch.overlapping.clone(),
            ));
        }

        self.close_completed_segments();
        debug_assert!(
            self.scratch.overlapping.is_empty(),
            "live set not empty after sweep: {:?}",
            self.scratch.overlapping
        );
    }

    fn close_completed_segments(&mut self) {
        if self.segments.is_empty() {
            return;
        }

        while let Some(next_upper) = self.scratch.upper_bounds.get(self.upper_read) {
            let closing = next_upper.bound;

            // A non-empty range between the next opening and the next closing
            // means that opening has to happen first.
            if let Some(next_lower) = self.scratch.lower_bounds.get(self.lower_read) {
                if !TimeRange::new(next_lower.bound, closing).is_empty() {
                    if !self.scratch.overlapping.is_empty() {
                        let end = next_lower.bound.flip_inclusion();
                        if let Some(last) = self.segments.last_mut() {
                            let range = TimeRange::new(last.range.lower, end);
                            if range.is_empty() {
                                // The next segment picks up the current live set anyway.
                                self.segments.pop();
                            } else {
                                last.range = range;
                            }
                        }
                    }
                    return;
                }
            }

            if let Some(last) = self.segments.last_mut() {
                last.range = TimeRange::new(last.range.lower, closing);
                debug_assert!(!last.range.is_empty(), "closed into empty {}", last.range);
            }

            while let Some(entry) = self.scratch.upper_bounds.get(self.upper_read) {
                if entry.bound != closing {
                    break;
                }
                let eval = entry.eval;
                self.scratch.close(eval);
                self.upper_read += 1;
            }

            if !self.scratch.overlapping.is_empty() {
                self.segments.push(Segment::new(
                    TimeRange::new(closing.flip_inclusion(), RangeBound::Unbounded),
                    self.scratch.overlapping.clone(),
                ));
            }
        }
    }
}
