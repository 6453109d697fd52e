use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use zui::drawlist::{Decoder, DrawlistBuilder, DrawlistCaps};
use zui::style::TextStyle;

fn build_drawlist(rows: u16) -> Vec<u8> {
    let mut builder = DrawlistBuilder::new(1, 80, rows, DrawlistCaps::default());
    let style = TextStyle::default();
    for y in 0..rows {
        builder.draw_text(0, y, "the quick brown fox jumps over the lazy dog", &style);
    }
    builder.build().unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawlist_encode");

    for &rows in &[1u16, 24, 200] {
        group.bench_with_input(BenchmarkId::from_parameter(rows), &rows, |b, &rows| {
            b.iter(|| black_box(build_drawlist(rows)));
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("drawlist_decode");

    for &rows in &[1u16, 24, 200] {
        let bytes = build_drawlist(rows);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &bytes, |b, bytes| {
            b.iter(|| {
                let decoder = Decoder::new(black_box(bytes)).unwrap();
                let count = decoder.commands().filter(Result::is_ok).count();
                black_box(count)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
