use criterion::{Criterion, criterion_group, criterion_main};
use regex_dojo::{Playground, RegexFlags, get_regex_matches};
use std::hint::black_box;

fn criterion_benchmark(c: &mut Criterion) {
    let prose = "The quick brown fox jumps over the lazy dog 42 times. ".repeat(40);
    let zero_width = "b".repeat(5000);

    c.bench_function("literal_matches", |b| {
        b.iter(|| get_regex_matches(black_box("fox"), black_box(&prose)))
    });

    c.bench_function("capped_matches", |b| {
        b.iter(|| get_regex_matches(black_box(r"\w+"), black_box(&prose)))
    });

    c.bench_function("iteration_cap", |b| {
        b.iter(|| get_regex_matches(black_box("a*"), black_box(&zero_width)))
    });

    c.bench_function("playground_captures", |b| {
        let playground = Playground::new(r"(?P<word>\w+) (\d+)", prose.clone(), RegexFlags::default());
        b.iter(|| black_box(playground.evaluate()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
