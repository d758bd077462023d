//! Vizij Segment Core (engine-agnostic)
//!
//! Compiles a track's sections into an evaluation field: an ordered list of
//! non-overlapping segments, each listing every section active over it.
//!
//! - `SegmentCompiler` sweeps one set of sections into segments.
//! - `Rows` buckets a track's sections into rows and adds pre/post-roll.
//! - `TrackCompiler` compiles each row, then folds all rows into one field.
//! - `CompilerRules` lets callers blend segments and fill gaps.

pub mod bound;
pub mod compiler;
pub mod config;
pub mod data;
pub mod error;
pub mod rows;
pub mod rules;
pub mod scratch;
pub mod track;

// Re-exports for consumers (evaluators)
pub use bound::{RangeBound, TimeRange};
pub use compiler::{compile_segments, SegmentCompiler};
pub use config::{Config, GapOverflowPolicy};
pub use data::{EvalData, EvalFlags, RowSectionData, SectionData, SectionDesc, Segment};
pub use error::CompileError;
pub use rows::{Row, Rows};
pub use rules::{
    process_segments, AllowEmpty, CompilerRules, DefaultRules, EvaluateNearest,
    HighestPriorityWins, SortByPriority,
};
pub use scratch::Scratch;
pub use track::{compile_track, TrackCompiler, TrackEvaluationField};
