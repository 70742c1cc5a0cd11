use fraudgen_core::{
    config::GeneratorConfig,
    generator::generate,
    store::DatasetStore,
};

fn build_store() -> DatasetStore {
    let store = DatasetStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    store
}

#[test]
fn rows_and_trace_round_trip_through_sqlite() {
    let store = build_store();
    let config = GeneratorConfig::default_test();
    let dataset = generate(config.clone()).unwrap();

    store.insert_run("store-test", &config, "0.1.0-test").unwrap();
    store.insert_rows("store-test", &dataset.rows).unwrap();
    store.insert_trace("store-test", &dataset.trace).unwrap();

    assert_eq!(store.row_count("store-test").unwrap(), dataset.rows.len() as u64);
    assert_eq!(store.fraud_count("store-test").unwrap(), dataset.fraud_count() as u64);

    let stored = store.pattern_counts("store-test").unwrap();
    let expected = dataset.tally();
    assert_eq!(stored.len(), expected.len());
    for (pattern, count) in expected {
        assert_eq!(stored.get(pattern), Some(&(count as u64)), "{pattern}");
    }
}

#[test]
fn runs_are_kept_apart() {
    let store = build_store();
    let a = GeneratorConfig { seed: 1, ..GeneratorConfig::default_test() };
    let b = GeneratorConfig { seed: 2, document_count: 40, ..GeneratorConfig::default_test() };

    for (run_id, config) in [("run-a", &a), ("run-b", &b)] {
        let dataset = generate(config.clone()).unwrap();
        store.insert_run(run_id, config, "0.1.0-test").unwrap();
        store.insert_rows(run_id, &dataset.rows).unwrap();
    }

    assert!(store.row_count("run-a").unwrap() >= 120);
    assert!(store.row_count("run-b").unwrap() >= 40);
    assert!(store.row_count("run-b").unwrap() < store.row_count("run-a").unwrap());
    assert_eq!(store.row_count("missing").unwrap(), 0);
}

#[test]
fn rows_require_a_registered_run() {
    let store = build_store();
    let dataset = generate(GeneratorConfig::default_test()).unwrap();
    assert!(store.insert_rows("unregistered", &dataset.rows).is_err());
}
