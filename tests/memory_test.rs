/// Resource tests: repeated loads and larger exports
mod common;

use chatgpt_history_search::{Corpus, SearchParams, initialize};
use common::{ConversationBuilder, ExportBuilder, sample_export};

#[test]
fn test_repeated_initialization_is_stable() {
    let (_dir, path) = sample_export().write_zip();

    // A leak here would show up as growth under valgrind or miri
    for i in 0..200 {
        let corpus = initialize(&path).unwrap_or_else(|e| panic!("iteration {i}: {e}"));
        assert_eq!(corpus.len(), 3);
        drop(corpus);
    }
}

#[test]
fn test_large_export_indexes_every_conversation() {
    let mut builder = ExportBuilder::new();
    for i in 0..2_000 {
        builder = builder.with_conversation(
            ConversationBuilder::new(&format!("bulk-{i:04}"))
                .create_time(1_690_000_000.0 + i as f64 * 60.0)
                .message("user", &format!("question number {i} about topic{}", i % 50))
                .message("assistant", "a reasonably long answer with several shared words"),
        );
    }
    let corpus = Corpus::from_records(builder.records()).unwrap();

    assert_eq!(corpus.len(), 2_000);
    assert_eq!(corpus.stats().message_count, 4_000);

    let page = corpus.search(&SearchParams::new("topic7")).unwrap();
    assert_eq!(page.total, 40);
    assert_eq!(page.results.len(), 20);
}

#[test]
fn test_corpus_is_shareable_across_threads() {
    let (_dir, path) = sample_export().write_json();
    let corpus = std::sync::Arc::new(initialize(&path).unwrap());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let corpus = corpus.clone();
            std::thread::spawn(move || corpus.search(&SearchParams::new("python")).unwrap().total)
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 1);
    }
}
