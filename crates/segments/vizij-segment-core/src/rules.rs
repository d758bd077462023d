//! Compiler rules: caller policy for blending, gap filling and post-processing.
//!
//! Every hook has a no-op default so implementors override only what they need.
//! [`process_segments`] drives the hooks over a freshly swept segment list.

use std::cmp::Reverse;

use log::warn;

use crate::bound::{RangeBound, TimeRange};
use crate::config::GapOverflowPolicy;
use crate::data::{SectionData, Segment};
use crate::error::CompileError;

pub trait CompilerRules {
    /// Reorder, filter or annotate a segment's references. Must not touch `segment.range`.
    fn blend_segment(&self, _segment: &mut Segment, _source: &[SectionData]) {}

    /// Optionally produce a segment filling `gap`. `prev`/`next` are the
    /// neighbours of the gap, absent before the first or after the last segment.
    fn insert_empty_space(
        &self,
        _gap: &TimeRange,
        _prev: Option<&Segment>,
        _next: Option<&Segment>,
    ) -> Option<Segment> {
        None
    }

    /// Whole-list pass run after all gaps are handled.
    fn post_process_segments(&self, _segments: &mut Vec<Segment>, _source: &[SectionData]) {}

    /// Keep segments without references in track output.
    fn allow_empty_segments(&self) -> bool {
        false
    }
}

/// Run `rules` over `segments`: blend every segment, fill the leading gap, each
/// interior gap and the trailing gap, then post-process.
pub fn process_segments(
    rules: &dyn CompilerRules,
    segments: &mut Vec<Segment>,
    source: &[SectionData],
    policy: GapOverflowPolicy,
) -> Result<(), CompileError> {
    if segments.is_empty() {
        return Ok(());
    }

    for segment in segments.iter_mut() {
        rules.blend_segment(segment, source);
    }

    if segments[0].range.lower.is_bounded() {
        insert_segment(rules, segments, 0, source, policy)?;
    }

    let mut index = 1;
    while index < segments.len() {
        if insert_segment(rules, segments, index, source, policy)? {
            // Skip past the segment just inserted.
            index += 1;
        }
        index += 1;
    }

    if segments.last().is_some_and(|s| s.range.upper.is_bounded()) {
        let end = segments.len();
        insert_segment(rules, segments, end, source, policy)?;
    }

    rules.post_process_segments(segments, source);
    Ok(())
}

/// Ask `rules` to fill the gap in front of `segments[index]`. Returns whether a
/// segment was inserted.
pub fn insert_segment(
    rules: &dyn CompilerRules,
    segments: &mut Vec<Segment>,
    index: usize,
    source: &[SectionData],
    policy: GapOverflowPolicy,
) -> Result<bool, CompileError> {
    let prev = index.checked_sub(1).and_then(|i| segments.get(i));
    let next = segments.get(index);

    let gap = TimeRange::new(
        prev.map_or(RangeBound::Unbounded, |p| p.range.upper.flip_inclusion()),
        next.map_or(RangeBound::Unbounded, |n| n.range.lower.flip_inclusion()),
    );
    if gap.is_empty() {
        return Ok(false);
    }

    let Some(mut new_segment) = rules.insert_empty_space(&gap, prev, next) else {
        return Ok(false);
    };

    if !gap.contains(&new_segment.range) {
        match policy {
            GapOverflowPolicy::Reject => {
                return Err(CompileError::GapOverflow {
                    gap,
                    inserted: new_segment.range,
                });
            }
            GapOverflowPolicy::Clip => {
                warn!(
                    "inserted segment {} overflows gap {}; clipping",
                    new_segment.range, gap
                );
                new_segment.range = new_segment.range.intersection(&gap);
                if new_segment.range.is_empty() {
                    warn!("inserted segment lies outside gap {gap}; dropping");
                    return Ok(false);
                }
            }
        }
    }

    rules.blend_segment(&mut new_segment, source);
    segments.insert(index, new_segment);
    Ok(true)
}

/// Rules with every hook left at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultRules;

impl CompilerRules for DefaultRules {}

fn priority_of(source: &[SectionData], impl_index: usize) -> i32 {
    source.get(impl_index).map_or(i32::MIN, |s| s.priority)
}

/// Orders each segment's references by source priority, highest first.
/// Ties keep their opening order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SortByPriority;

impl CompilerRules for SortByPriority {
    fn blend_segment(&self, segment: &mut Segment, source: &[SectionData]) {
        segment
            .impls
            .sort_by_key(|e| Reverse(priority_of(source, e.impl_index)));
    }
}

/// Keeps only the references sharing the highest source priority.
#[derive(Clone, Copy, Debug, Default)]
pub struct HighestPriorityWins;

impl CompilerRules for HighestPriorityWins {
    fn blend_segment(&self, segment: &mut Segment, source: &[SectionData]) {
        SortByPriority.blend_segment(segment, source);
        if let Some(first) = segment.impls.first() {
            let top = priority_of(source, first.impl_index);
            segment
                .impls
                .retain(|e| priority_of(source, e.impl_index) == top);
        }
    }
}

/// Fills gaps with the references of the nearest neighbour: the previous
/// segment where there is one, otherwise the next.
#[derive(Clone, Copy, Debug, Default)]
pub struct EvaluateNearest;

impl CompilerRules for EvaluateNearest {
    fn insert_empty_space(
        &self,
        gap: &TimeRange,
        prev: Option<&Segment>,
        next: Option<&Segment>,
    ) -> Option<Segment> {
        prev.or(next).map(|s| Segment::new(*gap, s.impls.clone()))
    }
}

/// Forwards to `R` but keeps segments without references.
#[derive(Clone, Copy, Debug, Default)]
pub struct AllowEmpty<R>(pub R);

impl<R: CompilerRules> CompilerRules for AllowEmpty<R> {
    fn blend_segment(&self, segment: &mut Segment, source: &[SectionData]) {
        self.0.blend_segment(segment, source);
    }

    fn insert_empty_space(
        &self,
        gap: &TimeRange,
        prev: Option<&Segment>,
        next: Option<&Segment>,
    ) -> Option<Segment> {
        self.0.insert_empty_space(gap, prev, next)
    }

    fn post_process_segments(&self, segments: &mut Vec<Segment>, source: &[SectionData]) {
        self.0.post_process_segments(segments, source);
    }

    fn allow_empty_segments(&self) -> bool {
        true
    }
}
