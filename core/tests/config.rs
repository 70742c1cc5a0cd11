use fraudgen_core::{
    calendar::YearRange,
    config::{AnomalyProbabilities, GeneratorConfig, StatusWeights},
    error::GenError,
    generator::{generate, DatasetGenerator},
};

fn rejected_parameter(config: GeneratorConfig) -> String {
    match DatasetGenerator::new(config) {
        Err(GenError::InvalidParameter { name, .. }) => name,
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("config was accepted"),
    }
}

#[test]
fn defaults_are_valid() {
    assert!(GeneratorConfig::default().validate().is_ok());
    assert!(GeneratorConfig::default_test().validate().is_ok());
}

#[test]
fn empty_populations_are_rejected() {
    let name = rejected_parameter(GeneratorConfig {
        account_count: 0,
        ..GeneratorConfig::default_test()
    });
    assert_eq!(name, "account_count");

    let name = rejected_parameter(GeneratorConfig {
        document_count: 0,
        ..GeneratorConfig::default_test()
    });
    assert_eq!(name, "document_count");
}

#[test]
fn out_of_range_probability_names_the_rule() {
    let name = rejected_parameter(GeneratorConfig::default_test().with_probabilities(
        AnomalyProbabilities {
            round_amount: 1.5,
            ..AnomalyProbabilities::default()
        },
    ));
    assert_eq!(name, "probabilities.round_amount");

    let name = rejected_parameter(GeneratorConfig::default_test().with_probabilities(
        AnomalyProbabilities {
            invalid_phone: f64::NAN,
            ..AnomalyProbabilities::default()
        },
    ));
    assert_eq!(name, "probabilities.invalid_phone");
}

#[test]
fn document_id_sequence_that_cannot_fit_is_rejected_up_front() {
    let name = rejected_parameter(GeneratorConfig {
        first_document_id: u64::MAX,
        document_count: 1,
        ..GeneratorConfig::default_test()
    });
    assert_eq!(name, "first_document_id");

    let err = generate(GeneratorConfig {
        first_document_id: i64::MAX as u64,
        ..GeneratorConfig::default_test()
    });
    assert!(matches!(err, Err(GenError::InvalidParameter { .. })));
}

#[test]
fn inverted_year_range_is_rejected() {
    let name = rejected_parameter(GeneratorConfig {
        issue_years: YearRange::new(2025, 2023),
        ..GeneratorConfig::default_test()
    });
    assert_eq!(name, "issue_years");
}

#[test]
fn all_zero_status_weights_are_rejected() {
    let name = rejected_parameter(GeneratorConfig {
        status_weights: StatusWeights {
            paid: 0.0,
            pending: 0.0,
            overdue: 0.0,
        },
        ..GeneratorConfig::default_test()
    });
    assert_eq!(name, "status_weights");
}

#[test]
fn partial_json_keeps_defaults() {
    let dir = std::env::temp_dir().join(format!("fraudgen-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("gen.json");
    std::fs::write(
        &path,
        r#"{ "seed": 7, "account_count": 10, "probabilities": { "duplicate": 0.5 } }"#,
    )
    .unwrap();

    let config = GeneratorConfig::load(path.to_str().unwrap()).unwrap();
    assert_eq!(config.seed, 7);
    assert_eq!(config.account_count, 10);
    assert_eq!(config.document_count, GeneratorConfig::default().document_count);
    assert_eq!(config.probabilities.duplicate, 0.5);
    assert_eq!(
        config.probabilities.suspicious_email,
        AnomalyProbabilities::default().suspicious_email
    );
    std::fs::remove_dir_all(&dir).ok();
}
