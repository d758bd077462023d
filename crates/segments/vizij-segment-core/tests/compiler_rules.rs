use std::cell::Cell;

use vizij_segment_core::{
    process_segments, CompileError, CompilerRules, Config, DefaultRules, EvalData, EvaluateNearest,
    GapOverflowPolicy, HighestPriorityWins, RangeBound, SectionData, Segment, SegmentCompiler,
    SortByPriority, TimeRange,
};

fn sec(bounds: TimeRange, index: usize, priority: i32) -> SectionData {
    SectionData::new(bounds, EvalData::new(index), priority)
}

fn two_apart() -> Vec<SectionData> {
    vec![
        sec(TimeRange::closed_open(0.0, 5.0), 0, 0),
        sec(TimeRange::closed_open(10.0, 15.0), 1, 0),
    ]
}

/// Fills interior gaps with an empty segment of the given range, or the gap itself.
#[derive(Default)]
struct FillInterior {
    fill: Option<TimeRange>,
    blends: Cell<usize>,
    post_processed_len: Cell<usize>,
}

impl CompilerRules for FillInterior {
    fn blend_segment(&self, _segment: &mut Segment, _source: &[SectionData]) {
        self.blends.set(self.blends.get() + 1);
    }

    fn insert_empty_space(
        &self,
        gap: &TimeRange,
        prev: Option<&Segment>,
        next: Option<&Segment>,
    ) -> Option<Segment> {
        (prev.is_some() && next.is_some()).then(|| Segment::empty(self.fill.unwrap_or(*gap)))
    }

    fn post_process_segments(&self, segments: &mut Vec<Segment>, _source: &[SectionData]) {
        self.post_processed_len.set(segments.len());
    }
}

#[test]
fn interior_gap_is_filled_contiguously() {
    let rules = FillInterior::default();
    let out = SegmentCompiler::default()
        .compile(&two_apart(), Some(&rules))
        .unwrap();
    let ranges: Vec<TimeRange> = out.iter().map(|s| s.range).collect();
    assert_eq!(
        ranges,
        vec![
            TimeRange::closed_open(0.0, 5.0),
            TimeRange::closed_open(5.0, 10.0),
            TimeRange::closed_open(10.0, 15.0),
        ]
    );
    assert!(out[1].impls.is_empty());
    for pair in out.windows(2) {
        assert!(pair[0].range.adjoins(&pair[1].range));
    }
}

#[test]
fn hooks_run_in_order() {
    let rules = FillInterior::default();
    SegmentCompiler::default()
        .compile(&two_apart(), Some(&rules))
        .unwrap();
    // Two swept segments plus the inserted one.
    assert_eq!(rules.blends.get(), 3);
    assert_eq!(rules.post_processed_len.get(), 3);
}

#[test]
fn overflowing_insert_is_clipped() {
    let rules = FillInterior {
        fill: Some(TimeRange::closed_open(3.0, 12.0)),
        ..Default::default()
    };
    let out = SegmentCompiler::default()
        .compile(&two_apart(), Some(&rules))
        .unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out[1].range, TimeRange::closed_open(5.0, 10.0));
}

#[test]
fn insert_outside_gap_is_dropped() {
    let rules = FillInterior {
        fill: Some(TimeRange::closed_open(20.0, 30.0)),
        ..Default::default()
    };
    let out = SegmentCompiler::default()
        .compile(&two_apart(), Some(&rules))
        .unwrap();
    assert_eq!(out.len(), 2);
}

#[test]
fn overflowing_insert_is_rejected_when_configured() {
    let rules = FillInterior {
        fill: Some(TimeRange::closed_open(3.0, 12.0)),
        ..Default::default()
    };
    let cfg = Config {
        gap_overflow: GapOverflowPolicy::Reject,
        ..Default::default()
    };
    let err = SegmentCompiler::new(cfg)
        .compile(&two_apart(), Some(&rules))
        .unwrap_err();
    assert_eq!(
        err,
        CompileError::GapOverflow {
            gap: TimeRange::closed_open(5.0, 10.0),
            inserted: TimeRange::closed_open(3.0, 12.0),
        }
    );
}

#[test]
fn evaluate_nearest_fills_every_gap() {
    let out = SegmentCompiler::default()
        .compile(&two_apart(), Some(&EvaluateNearest))
        .unwrap();
    let summary: Vec<(TimeRange, Vec<usize>)> = out
        .iter()
        .map(|s| (s.range, s.impl_indices().collect()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (
                TimeRange::new(RangeBound::Unbounded, RangeBound::Exclusive(0.0)),
                vec![0]
            ),
            (TimeRange::closed_open(0.0, 5.0), vec![0]),
            (TimeRange::closed_open(5.0, 10.0), vec![0]),
            (TimeRange::closed_open(10.0, 15.0), vec![1]),
            (
                TimeRange::new(RangeBound::Inclusive(15.0), RangeBound::Unbounded),
                vec![1]
            ),
        ]
    );
}

#[test]
fn no_outer_gaps_for_unbounded_sections() {
    let out = SegmentCompiler::default()
        .compile(&[sec(TimeRange::all(), 0, 0)], Some(&EvaluateNearest))
        .unwrap();
    assert_eq!(out.len(), 1);
}

#[test]
fn priority_rules_order_and_filter() {
    let data = vec![
        sec(TimeRange::closed_open(0.0, 10.0), 0, 1),
        sec(TimeRange::closed_open(0.0, 10.0), 1, 5),
        sec(TimeRange::closed_open(0.0, 10.0), 2, 5),
    ];
    let mut compiler = SegmentCompiler::default();

    let sorted = compiler.compile(&data, Some(&SortByPriority)).unwrap();
    assert_eq!(sorted[0].impl_indices().collect::<Vec<_>>(), vec![1, 2, 0]);

    let winners = compiler.compile(&data, Some(&HighestPriorityWins)).unwrap();
    assert_eq!(winners[0].impl_indices().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn process_segments_on_empty_list_is_a_no_op() {
    let rules = FillInterior::default();
    let mut segments = Vec::new();
    process_segments(&rules, &mut segments, &[], GapOverflowPolicy::Clip).unwrap();
    assert!(segments.is_empty());
    assert_eq!(rules.blends.get(), 0);
}

#[test]
fn default_rules_change_nothing() {
    let mut compiler = SegmentCompiler::default();
    let plain = compiler.compile(&two_apart(), None).unwrap();
    let ruled = compiler.compile(&two_apart(), Some(&DefaultRules)).unwrap();
    assert_eq!(plain, ruled);
}
