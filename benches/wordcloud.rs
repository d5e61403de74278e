//! Benchmarks for keyword ranking and word-cloud layout.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;

use pagebrief::keywords::{KeywordExtractor, RakeExtractor};
use pagebrief::wordcloud::layout::{self, LayoutParams};
use pagebrief::wordcloud::{BitmapFace, WordCloudConfig, WordCloudRenderer, word_frequencies};

const ARTICLE: &str = "Rust is a general-purpose programming language emphasizing \
    performance, type safety and concurrency. It enforces memory safety without a \
    garbage collector. The borrow checker tracks object lifetimes during compilation. \
    Cargo is the official build system and package manager. Crates are published on \
    crates.io and shared by a large open source community.";

fn bench_rake(c: &mut Criterion) {
    let rake = RakeExtractor::new();
    c.bench_function("rake_article", |bench| {
        bench.iter(|| black_box(rake.extract(black_box(ARTICLE))))
    });
}

fn bench_layout(c: &mut Criterion) {
    let keywords = RakeExtractor::new().extract(ARTICLE);
    let words = word_frequencies(&keywords.joined(), 200);
    let params = LayoutParams {
        width: 800,
        height: 400,
        max_font_size: 400,
        min_font_size: 4,
        font_step: 1,
        prefer_horizontal: 0.9,
        relative_scaling: 0.5,
        margin: 2,
    };

    c.bench_function("layout_top10_keywords", |bench| {
        bench.iter(|| {
            let mut rng = rand::rngs::StdRng::seed_from_u64(42);
            black_box(layout::place_words(&words, &BitmapFace, &params, &mut rng))
        })
    });
}

fn bench_render(c: &mut Criterion) {
    let keywords = RakeExtractor::new().extract(ARTICLE);
    let renderer = WordCloudRenderer::with_face(WordCloudConfig::default(), Box::new(BitmapFace));

    c.bench_function("render_800x400", |bench| {
        bench.iter(|| black_box(renderer.render(&keywords).unwrap()))
    });
}

criterion_group!(benches, bench_rake, bench_layout, bench_render);
criterion_main!(benches);
