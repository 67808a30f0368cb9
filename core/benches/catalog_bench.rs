use criterion::{criterion_group, criterion_main, Criterion};
use reelmatch_core::similarity::SimilarityMatrix;
use reelmatch_core::tokenizer::tokenize;
use reelmatch_core::vectorizer::FieldVectorizer;

const WORDS: &[&str] = &[
    "detective", "city", "family", "secret", "war", "love", "island", "heist", "school", "robot",
    "kingdom", "ghost", "chef", "music", "rivals", "journey", "village", "mystery", "storm", "crew",
];

fn synthetic_descriptions(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            (0..12)
                .map(|k| WORDS[(i * 7 + k * 3 + k * k) % WORDS.len()])
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}

fn bench_tokenize(c: &mut Criterion) {
    let text = "When a young detective returns to the city where her family vanished, \
                she uncovers a secret that binds the village to an old war.";
    c.bench_function("tokenize_description", |b| b.iter(|| tokenize(text)));
}

fn bench_build(c: &mut Criterion) {
    let docs = synthetic_descriptions(1000);
    let vectorizer = FieldVectorizer::default();
    c.bench_function("vectorize_1000", |b| b.iter(|| vectorizer.build(&docs)));
    let space = vectorizer.build(&docs);
    c.bench_function("similarity_matrix_1000", |b| b.iter(|| SimilarityMatrix::build(&space.vectors)));
}

criterion_group!(benches, bench_tokenize, bench_build);
criterion_main!(benches);
