//! Track compiler: compile each row, then fold the rows into one field.
//!
//! Every row is compiled on its own with the row's rules. The resulting
//! segments are flattened into a pool of pseudo-sections (one per reference)
//! carrying the row priority, and the pool is compiled again with the track
//! rules. A lookup table parallel to the pool maps each pseudo-section back to
//! the caller's original section index.

use log::{trace, warn};
use serde::{Deserialize, Serialize};

use crate::bound::RangeBound;
use crate::compiler::SegmentCompiler;
use crate::config::Config;
use crate::data::{EvalData, SectionData, SectionDesc, Segment};
use crate::error::CompileError;
use crate::rows::{Row, Rows};
use crate::rules::CompilerRules;

/// Final compiled field for a track. `impl_index` of every reference is an
/// index into the caller's original section list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackEvaluationField {
    pub segments: Vec<Segment>,
}

impl TrackEvaluationField {
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    /// Segment covering `time`, if any.
    pub fn segment_at(&self, time: f32) -> Option<&Segment> {
        // Ordered and disjoint, so "ends before `time`" holds for a prefix.
        let index = self.segments.partition_point(|s| match s.range.upper {
            RangeBound::Inclusive(hi) => hi < time,
            RangeBound::Exclusive(hi) => hi <= time,
            RangeBound::Unbounded => false,
        });
        self.segments
            .get(index)
            .filter(|s| s.range.contains_time(time))
    }
}

#[derive(Debug, Default)]
pub struct TrackCompiler {
    compiler: SegmentCompiler,
}

impl TrackCompiler {
    pub fn new(cfg: Config) -> Self {
        Self {
            compiler: SegmentCompiler::new(cfg),
        }
    }

    /// Compile `rows` (first row highest priority) into one field.
    ///
    /// Rules may only emit references whose `impl_index` points into the
    /// source data they were handed; other references are dropped with a warning.
    pub fn compile(
        &mut self,
        rows: &[Row<'_>],
        rules: Option<&dyn CompilerRules>,
    ) -> Result<TrackEvaluationField, CompileError> {
        let row_count = rows.len();

        let mut pool: Vec<SectionData> = Vec::new();
        // pool index -> caller's section index
        let mut actual_index: Vec<usize> = Vec::new();

        for (row_index, row) in rows.iter().enumerate() {
            if row.is_empty() {
                continue;
            }

            let row_segments = self
                .compiler
                .compile(&row.section_data(), row.rules)
                .map_err(|err| match err {
                    CompileError::NanBound { index } => CompileError::NanBound {
                        index: row.sections.get(index).map_or(index, |s| s.actual_index),
                    },
                    other => other,
                })?;

            let priority = i32::try_from(row_count - row_index).unwrap_or(i32::MAX);
            for segment in row_segments {
                for eval in segment.impls {
                    let Some(source) = row.sections.get(eval.impl_index) else {
                        warn!(
                            "row {row_index} produced reference {} outside its {} sections; dropping",
                            eval.impl_index,
                            row.sections.len()
                        );
                        continue;
                    };
                    let pooled_index = pool.len();
                    actual_index.push(source.actual_index);
                    pool.push(SectionData::new(
                        segment.range,
                        EvalData::with_flags(pooled_index, eval.flags),
                        priority,
                    ));
                }
            }
            trace!("row {row_index} pooled; {} pseudo-sections so far", pool.len());
        }

        let track_segments = self.compiler.compile(&pool, rules)?;
        let allow_empty = rules.is_some_and(|r| r.allow_empty_segments());

        let mut result = TrackEvaluationField::default();
        for mut segment in track_segments {
            segment.impls.retain_mut(|eval| match actual_index.get(eval.impl_index) {
                Some(&actual) => {
                    eval.impl_index = actual;
                    true
                }
                None => {
                    warn!(
                        "track rules produced reference {} outside the pooled sections; dropping",
                        eval.impl_index
                    );
                    false
                }
            });

            if segment.impls.is_empty() && !allow_empty {
                continue;
            }

            // Coalesce with an adjoining predecessor carrying the same references.
            if let Some(last) = result.segments.last_mut() {
                if last.range.adjoins(&segment.range) && last.impls == segment.impls {
                    last.range = last.range.hull(&segment.range);
                    continue;
                }
            }
            result.segments.push(segment);
        }
        Ok(result)
    }
}

/// Build rows from `sections` and compile them into a track field.
pub fn compile_track(
    sections: &[Option<SectionDesc>],
    row_rules: Option<&dyn CompilerRules>,
    track_rules: Option<&dyn CompilerRules>,
    cfg: Config,
) -> Result<TrackEvaluationField, CompileError> {
    let rows = Rows::build(sections, row_rules);
    TrackCompiler::new(cfg).compile(&rows.rows, track_rules)
}
