use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use vizij_segment_core::{
    Config, EvalData, Rows, SectionData, SectionDesc, SegmentCompiler, SortByPriority, TimeRange,
    TrackCompiler,
};

fn overlapping_sections(count: usize) -> Vec<SectionData> {
    (0..count)
        .map(|i| {
            let start = (i * 7 % 97) as f32;
            let len = 5.0 + (i % 13) as f32;
            SectionData::new(
                TimeRange::closed_open(start, start + len),
                EvalData::new(i),
                (i % 4) as i32,
            )
        })
        .collect()
}

fn track_sections(count: usize) -> Vec<Option<SectionDesc>> {
    (0..count)
        .map(|i| {
            let start = (i * 3) as f32;
            Some(
                SectionDesc::new(TimeRange::closed_open(start, start + 10.0), i % 4)
                    .with_priority((i % 3) as i32)
                    .with_roll(1.0, 1.0),
            )
        })
        .collect()
}

fn bench_segment_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment_compile");
    for &n in &[16usize, 128, 1024] {
        let data = overlapping_sections(n);
        let mut compiler = SegmentCompiler::new(Config::default());
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| {
                let segments = compiler.compile(black_box(data), None).unwrap();
                black_box(segments.len())
            })
        });
    }
    group.finish();
}

fn bench_track_compile(c: &mut Criterion) {
    let sections = track_sections(256);
    let rows = Rows::build(&sections, Some(&SortByPriority));
    let mut compiler = TrackCompiler::new(Config::default());
    c.bench_function("track_compile_256", |b| {
        b.iter(|| {
            let field = compiler
                .compile(black_box(&rows.rows), Some(&SortByPriority))
                .unwrap();
            black_box(field.len())
        })
    });
}

criterion_group!(benches, bench_segment_compile, bench_track_compile);
criterion_main!(benches);
