use criterion::{criterion_group, criterion_main, Criterion};
use keyword_vectorizer::{
    CorpusModel, CorpusParams, Document, ExtractionStage, GraphExtractor, KeywordPipeline,
    KweConfig, StopwordFilter,
};
use keyword_vectorizer::graph::GraphParams;

const TOPICS: &[&str] = &[
    "vowel harmony", "word order", "case marking", "syntactic ambiguity", "natural language",
    "relative clause", "tone sandhi", "noun class", "serial verb", "evidential marking",
    "ergative alignment", "information structure", "reduplication", "clitic placement",
];

const FILLER: &[&str] = &[
    "is discussed in detail", "interacts with prosody", "varies between dialects",
    "was documented in fieldwork", "shows a clear pattern", "appears in older texts",
];

/// Deterministic pseudo-text, `sentences` long, rotating through topics
fn synthetic_text(seed: usize, sentences: usize) -> String {
    let mut text = String::new();
    for i in 0..sentences {
        let a = TOPICS[(seed * 7 + i * 3) % TOPICS.len()];
        let b = TOPICS[(seed + i * 5) % TOPICS.len()];
        let f = FILLER[(seed + i) % FILLER.len()];
        text.push_str(&format!("The {a} {f}, and {b} is related. "));
        if i % 12 == 11 {
            text.push_str("\n\n");
        }
    }
    text
}

fn corpus(docs: usize) -> Vec<String> {
    (0..docs).map(|i| synthetic_text(i + 1, 40 + i % 20)).collect()
}

fn extraction_benchmark(c: &mut Criterion) {
    let book = Document::new(synthetic_text(0, 2_000));
    let documents = corpus(60);

    c.bench_function("tokenize_book", |b| {
        b.iter(|| Document::new(book.text()));
    });

    let graph = GraphExtractor::new(GraphParams::default(), StopwordFilter::english());
    c.bench_function("graph_rank", |b| {
        b.iter(|| graph.extract_keywords(&book, 300));
    });

    c.bench_function("corpus_train", |b| {
        b.iter(|| {
            let mut model: CorpusModel = CorpusModel::new(CorpusParams::clean(), StopwordFilter::english());
            model.train(documents.clone().into()).map(|_| model.is_trained())
        });
    });

    let mut model: CorpusModel = CorpusModel::new(CorpusParams::clean(), StopwordFilter::english());
    if model.train(documents.clone().into()).is_ok() {
        c.bench_function("corpus_score", |b| {
            b.iter(|| model.score(&book, ExtractionStage::CleanCorpus));
        });
    }

    if let Ok(mut pipeline) = KeywordPipeline::new(KweConfig::default()) {
        if pipeline
            .train(Some(documents.clone().into()), Some(documents.into()))
            .is_ok()
        {
            c.bench_function("pipeline_extract", |b| {
                b.iter(|| pipeline.extract_keywords(&book, 300, 0.85));
            });
        }
    }
}

criterion_group!(benches, extraction_benchmark);
criterion_main!(benches);
