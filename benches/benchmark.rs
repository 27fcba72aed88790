// Search and load benchmarks over a synthetic dictionary
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use slovnik::{normalize_term, DictionarySchema, LanguageFilter, MemoryRows, SearchEngine};
use slovnik_core::TextIndex;

const LETTERS: &[&str] = &[
    "a", "b", "c", "č", "d", "e", "ě", "ę", "g", "i", "j", "k", "l", "ľ", "m", "n", "ń", "o",
    "p", "r", "s", "š", "t", "u", "v", "z", "ž",
];

fn random_word(rng: &mut impl Rng, len: usize) -> String {
    (0..len).map(|_| LETTERS[rng.random_range(0..LETTERS.len())]).collect()
}

fn generate_rows(count: usize) -> MemoryRows {
    let mut rng = rand::rng();
    let schema = DictionarySchema::build(["isv", "en", "ru", "pl", "cs"]).unwrap();
    let mut rows = MemoryRows::new(schema);

    for _ in 0..count {
        let cells = (0..5)
            .map(|_| {
                if rng.random_bool(0.1) {
                    String::new()
                } else {
                    let len = rng.random_range(3..10);
                    random_word(&mut rng, len)
                }
            })
            .collect();
        rows.push(cells);
    }
    rows
}

fn benchmark_normalize(c: &mut Criterion) {
    let mut rng = rand::rng();
    let words: Vec<String> = (0..1000).map(|_| random_word(&mut rng, 8)).collect();

    c.bench_function("normalize_term", |b| {
        b.iter(|| {
            for word in &words {
                black_box(normalize_term(word));
            }
        });
    });
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    for size in [1_000, 10_000, 50_000].iter() {
        let rows = generate_rows(*size);
        let engine = SearchEngine::new(&rows);

        group.bench_with_input(BenchmarkId::new("substring", size), size, |b, _| {
            b.iter(|| black_box(engine.search(&["ka"], None).unwrap()));
        });

        let filter = LanguageFilter::new("ru");
        group.bench_with_input(BenchmarkId::new("substring_filtered", size), size, |b, _| {
            b.iter(|| black_box(engine.search(&["ka", "voda"], Some(&filter)).unwrap()));
        });
    }

    group.finish();
}

fn benchmark_text_index(c: &mut Criterion) {
    let rows = generate_rows(10_000);
    let mut index = TextIndex::new();
    let mut probe = String::new();

    slovnik::RowSource::scan(&rows, &mut |id, row| {
        if probe.is_empty() && !row.cell(1).is_empty() {
            probe = row.cell(1).to_string();
        }
        index.insert_doc(id, row.cells.iter().map(String::as_str));
    })
    .unwrap();

    c.bench_function("text_index_lookup", |b| {
        b.iter(|| black_box(index.lookup(&probe)));
    });
}

criterion_group!(benches, benchmark_normalize, benchmark_search, benchmark_text_index);
criterion_main!(benches);
