// Blink benchmarks
// Cost of a blink toggle: scanning the grid and redrawing blinking cells

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use eight_rs::display::font::GLYPH_COUNT;
use eight_rs::display::{
    BitmapFont, CellCode, Display, DisplayConfig, FontRenderer, HeadlessBuilder, HeadlessContext,
    TextFlags, TextGrid,
};
use std::hint::black_box;

/// 8x16 font where every glyph is a checkerboard
fn checker_font() -> BitmapFont {
    let mask: Vec<bool> = (0..8 * 16).map(|i| (i + i / 8) % 2 == 0).collect();
    BitmapFont::from_masks(8, 16, vec![mask; GLYPH_COUNT])
}

/// 80x25 display with every `stride`-th cell blinking
fn display_with_blinking(stride: usize) -> Display<HeadlessContext, FontRenderer> {
    let config = DisplayConfig::default();
    let mut display =
        Display::with_renderer(&config, HeadlessBuilder, FontRenderer::new(checker_font()))
            .expect("display should initialize");

    for index in (0..display.grid().len()).step_by(stride) {
        let code = CellCode::new(b'A' as u16 + (index % 26) as u16, 15, 1);
        display
            .write_cell(index, code, TextFlags::BLINKING)
            .expect("index in range");
    }
    display
}

/// Benchmark the flag scan alone
fn bench_blinking_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("blink_scan");

    for &(width, height) in &[(40u32, 25u32), (80, 25), (132, 60)] {
        let mut grid = TextGrid::new(width, height).unwrap();
        for index in (0..grid.len()).step_by(7) {
            grid.set_cell(index, CellCode::default(), TextFlags::BLINKING)
                .unwrap();
        }

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &grid,
            |b, grid| {
                b.iter(|| black_box(grid.blinking_cells().count()));
            },
        );
    }

    group.finish();
}

/// Benchmark a toggling tick with varying numbers of blinking cells
fn bench_blink_toggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("blink_toggle");

    for &stride in &[1usize, 10, 100] {
        group.bench_with_input(
            BenchmarkId::new("every_nth_cell", stride),
            &stride,
            |b, &stride| {
                let mut display = display_with_blinking(stride);
                b.iter(|| {
                    // One full interval per iteration so every call toggles
                    black_box(display.advance(black_box(500)));
                });
            },
        );
    }

    // Ticks below the interval only accumulate time
    group.bench_function("idle_tick", |b| {
        let mut display = display_with_blinking(1);
        b.iter(|| {
            black_box(display.advance(black_box(0)));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_blinking_scan, bench_blink_toggle);
criterion_main!(benches);
