//! End-to-end pipeline scenarios over the in-memory fixture registry

use std::time::Instant;

use super::*;
use crate::logic::model::classifier::sigmoid;
use crate::logic::error::{ErrorKind, PipelineError};
use crate::logic::features::Disposition;
use crate::logic::mission::{MissionTag, RawRow, Table};
use crate::logic::model::testing::registry;
use crate::logic::verdict::{Label, Threshold};

const KEPLER_HEADERS: &[&str] = &[
    "kepoi_name",
    "koi_disposition",
    "koi_period",
    "koi_prad",
    "koi_duration",
    "koi_depth",
    "koi_steff",
];

fn kepler_table(rows: Vec<RawRow>) -> Table {
    Table::new(KEPLER_HEADERS.iter().map(|s| s.to_string()).collect(), rows)
}

fn kepler_row(index: usize, params: &ManualParameters) -> RawRow {
    let mut row = RawRow::new(index);
    row.insert("kepoi_name", format!("K{:05}.01", index));
    row.insert("koi_period", params.orbital_period.to_string());
    row.insert("koi_prad", params.planet_radius.to_string());
    row.insert("koi_duration", params.transit_duration.to_string());
    if let Some(depth) = params.transit_depth {
        row.insert("koi_depth", depth.to_string());
    }
    if let Some(temp) = params.stellar_temp {
        row.insert("koi_steff", temp.to_string());
    }
    row
}

fn params(period: f64, radius: f64, duration: f64, depth: Option<f64>, temp: Option<f64>) -> ManualParameters {
    ManualParameters {
        orbital_period: period,
        planet_radius: radius,
        transit_duration: duration,
        transit_depth: depth,
        stellar_temp: temp,
    }
}

fn fixtures() -> Vec<ManualParameters> {
    vec![
        params(365.0, 1.0, 13.0, Some(84.0), Some(5778.0)),
        params(3.5, 11.0, 4.0, Some(10000.0), Some(6000.0)),
        params(50.0, 1.8, 6.0, None, Some(5500.0)),
        params(120.0, 3.9, 8.0, Some(1500.0), None),
        params(0.5, 0.2, 0.3, Some(0.0), Some(9000.0)),
        params(0.123456789, 2.718281828, 1.0e-3, None, None),
    ]
}

#[test]
fn test_path_parity_single_vs_batch_of_one() {
    let shared = registry();
    let snapshot = shared.snapshot();

    for model in ["xgb", "probe"] {
        for t in [0.0, 0.3, 0.5, 0.9, 1.0] {
            let threshold = Threshold::new(t).unwrap();
            for p in fixtures() {
                let single = run_single(&snapshot, &p, model, threshold).unwrap();
                let batch = run_batch(
                    &snapshot,
                    &kepler_table(vec![kepler_row(0, &p)]),
                    model,
                    threshold,
                    &BatchOptions::default(),
                )
                .unwrap();

                assert_eq!(batch.verdicts.len(), 1);
                let one = &batch.verdicts[0];
                assert_eq!(single.probability.to_bits(), one.probability.to_bits());
                assert_eq!(single.features, one.features);
                assert_eq!(single.label, one.label);
                assert_eq!(single.confidence, one.confidence);
                assert_eq!(single.imputed, one.imputed);
            }
        }
    }
}

#[test]
fn test_row_count_accounting_with_missing_column() {
    let shared = registry();
    let rows: Vec<RawRow> = (0..100)
        .map(|i| {
            let mut row = kepler_row(i, &params(1.0 + i as f64, 1.5, 3.0, None, None));
            if i == 7 || i == 42 || i == 99 {
                row = RawRow::from_pairs(i, [("kepoi_name", "K0"), ("koi_period", "5.0"), ("koi_duration", "2.0")]);
            }
            row
        })
        .collect();

    let outcome = run_batch(
        &shared.snapshot(),
        &kepler_table(rows),
        "xgb",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.verdicts.len(), 97);
    assert_eq!(outcome.summary.excluded_rows, 3);
    assert_eq!(outcome.summary.exclusions_by_kind.get(&ErrorKind::MissingFeature), Some(&3));
    assert_eq!(
        outcome.exclusions.iter().map(|e| e.row).collect::<Vec<_>>(),
        vec![7, 42, 99]
    );
    assert!(outcome.exclusions.iter().all(|e| e.detail.contains("planet_radius")));
    assert!(!outcome.truncated);
}

#[test]
fn test_order_preserved_under_parallel_chunks() {
    let shared = registry();
    let snapshot = shared.snapshot();
    let inputs: Vec<ManualParameters> = (0..1000)
        .map(|i| params(0.5 + (i as f64 * 7.3) % 400.0, 0.5 + (i % 17) as f64, 1.0 + (i % 9) as f64, None, Some(4000.0 + (i % 50) as f64 * 60.0)))
        .collect();
    let rows = inputs.iter().enumerate().map(|(i, p)| kepler_row(i, p)).collect();

    let options = BatchOptions { chunk_rows: 7, ..BatchOptions::default() };
    let outcome = run_batch(&snapshot, &kepler_table(rows), "xgb", Threshold::default(), &options).unwrap();

    assert_eq!(outcome.verdicts.len(), inputs.len());
    for (i, (verdict, p)) in outcome.verdicts.iter().zip(&inputs).enumerate() {
        assert_eq!(verdict.id, format!("K{:05}.01", i));
        let expected = run_single(&snapshot, p, "xgb", Threshold::default()).unwrap();
        assert_eq!(verdict.probability.to_bits(), expected.probability.to_bits());
    }
}

#[test]
fn test_summary_over_known_probabilities() {
    // probe model: p = sigmoid(period - 5)
    let shared = registry();
    let rows = (1..=10)
        .map(|period| kepler_row(period, &params(period as f64, 1.0, 2.0, None, None)))
        .collect();
    let outcome = run_batch(
        &shared.snapshot(),
        &kepler_table(rows),
        "probe",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    let expected: Vec<f64> = (1..=10).map(|p| sigmoid(p as f64 - 5.0)).collect();
    for (verdict, p) in outcome.verdicts.iter().zip(&expected) {
        assert!((verdict.probability - p).abs() < 1e-12);
    }

    let summary = &outcome.summary;
    assert_eq!(summary.predicted_planets + summary.false_positives, outcome.verdicts.len());
    assert_eq!(summary.predicted_planets, 6);
    assert_eq!(summary.false_positives, 4);
    assert_eq!(summary.high_confidence_count, 5);

    let mean = outcome.verdicts.iter().map(|v| v.probability).sum::<f64>() / 10.0;
    assert!((summary.mean_probability - mean).abs() < 1e-12);
    assert!((summary.mean_probability - expected.iter().sum::<f64>() / 10.0).abs() < 1e-12);
}

#[test]
fn test_empty_table_rejected() {
    let shared = registry();
    let err = run_batch(
        &shared.snapshot(),
        &kepler_table(vec![]),
        "xgb",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::EmptyInput);
}

#[test]
fn test_all_rows_invalid_is_no_valid_samples() {
    let shared = registry();
    let rows = (0..5)
        .map(|i| RawRow::from_pairs(i, [("kepoi_name", "K1"), ("koi_period", "-3")]))
        .collect();
    let err = run_batch(
        &shared.snapshot(),
        &kepler_table(rows),
        "xgb",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoValidSamples);
}

#[test]
fn test_undetectable_schema_is_no_valid_samples() {
    let shared = registry();
    let table = Table::new(
        vec!["a".to_string(), "b".to_string()],
        vec![RawRow::from_pairs(0, [("a", "1"), ("b", "2")])],
    );
    let err = run_batch(&shared.snapshot(), &table, "xgb", Threshold::default(), &BatchOptions::default())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoValidSamples);
}

#[test]
fn test_unknown_model_is_request_fatal() {
    let shared = registry();
    let p = fixtures().remove(0);
    let err = run_single(&shared.snapshot(), &p, "nonexistent", Threshold::default()).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownModel { .. }));

    let err = run_batch(
        &shared.snapshot(),
        &kepler_table(vec![kepler_row(0, &p)]),
        "nonexistent",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::UnknownModel { .. }));
}

#[test]
fn test_invalid_values_are_excluded_by_kind() {
    let shared = registry();
    let good = params(10.0, 1.0, 2.0, None, None);
    let mut rows = vec![kepler_row(0, &good)];
    rows.push(RawRow::from_pairs(1, [("koi_period", "abc"), ("koi_prad", "1"), ("koi_duration", "2")]));
    rows.push(RawRow::from_pairs(2, [("koi_period", "0"), ("koi_prad", "1"), ("koi_duration", "2")]));
    rows.push(RawRow::from_pairs(3, [("koi_period", "4"), ("koi_duration", "2")]));

    let outcome = run_batch(
        &shared.snapshot(),
        &kepler_table(rows),
        "xgb",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.verdicts.len(), 1);
    assert_eq!(outcome.summary.exclusions_by_kind.get(&ErrorKind::InvalidValue), Some(&2));
    assert_eq!(outcome.summary.exclusions_by_kind.get(&ErrorKind::MissingFeature), Some(&1));
    // no catalog id on the malformed row
    assert_eq!(outcome.exclusions[0].id, None);
}

#[test]
fn test_invalid_manual_value_is_rejected() {
    let shared = registry();
    let p = params(-1.0, 1.0, 1.0, None, None);
    let err = run_single(&shared.snapshot(), &p, "xgb", Threshold::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);

    let p = params(1.0, 0.0, 1.0, None, None);
    let err = run_single(&shared.snapshot(), &p, "xgb", Threshold::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn test_zero_depth_is_not_imputed() {
    let shared = registry();
    let verdict = run_single(
        &shared.snapshot(),
        &params(1.0, 1.0, 1.0, Some(0.0), None),
        "probe",
        Threshold::default(),
    )
    .unwrap();
    assert_eq!(verdict.features.transit_depth, 0.0);
    assert_eq!(verdict.imputed, vec!["stellar_temp"]);
    assert_eq!(verdict.features.stellar_temp, 5778.0);
}

#[test]
fn test_deadline_truncates_between_chunks() {
    let shared = registry();
    let rows = (0..25)
        .map(|i| kepler_row(i, &params(1.0 + i as f64, 1.0, 2.0, None, None)))
        .collect();
    let options = BatchOptions {
        chunk_rows: 10,
        deadline: Some(Instant::now()),
        ..BatchOptions::default()
    };
    let outcome = run_batch(&shared.snapshot(), &kepler_table(rows), "xgb", Threshold::default(), &options)
        .unwrap();
    assert!(outcome.truncated);
    assert_eq!(outcome.verdicts.len(), 10);
}

#[test]
fn test_ground_truth_evaluation() {
    let shared = registry();
    let mut rows = Vec::new();
    for (i, (period, disposition)) in [
        (9.0, "CONFIRMED"),
        (8.0, "CANDIDATE"),
        (1.0, "FALSE POSITIVE"),
        (9.0, "FALSE POSITIVE"),
        (2.0, "NOT DISPOSITIONED"),
    ]
    .into_iter()
    .enumerate()
    {
        let mut row = kepler_row(i, &params(period, 1.0, 2.0, None, None));
        row.insert("koi_disposition", disposition);
        rows.push(row);
    }

    let outcome = run_batch(
        &shared.snapshot(),
        &kepler_table(rows),
        "probe",
        Threshold::default(),
        &BatchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.verdicts[0].ground_truth, Some(Disposition::Confirmed));
    assert_eq!(outcome.verdicts[4].ground_truth, Some(Disposition::Unknown));
    let evaluation = outcome.summary.evaluation.unwrap();
    assert_eq!(evaluation.labeled_samples, 4);
    assert_eq!(evaluation.correct, 3);
    assert!((evaluation.accuracy - 0.75).abs() < 1e-12);
}

#[test]
fn test_tess_and_k2_tables_are_adapted() {
    let shared = registry();
    let snapshot = shared.snapshot();

    let tess = Table::new(
        ["toi", "tfopwg_disp", "pl_orbper", "pl_rade", "pl_trandurh", "pl_trandep", "st_teff"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![RawRow::from_pairs(0, [
            ("toi", "1234.01"),
            ("tfopwg_disp", "PC"),
            ("pl_orbper", "3.2"),
            ("pl_rade", "2.1"),
            ("pl_trandurh", "2.5"),
            ("pl_trandep", "850"),
            ("st_teff", "5100"),
        ])],
    );
    let outcome = run_batch(&snapshot, &tess, "xgb", Threshold::default(), &BatchOptions::default()).unwrap();
    assert_eq!(outcome.mission, MissionTag::Tess);
    assert_eq!(outcome.verdicts[0].id, "1234.01");
    assert_eq!(outcome.verdicts[0].ground_truth, Some(Disposition::Candidate));

    let k2 = Table::new(
        ["pl_name", "disposition", "pl_orbper", "pl_rade", "pl_trandur", "pl_trandep"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        vec![RawRow::from_pairs(0, [
            ("pl_name", "K2-18 b"),
            ("disposition", "CONFIRMED"),
            ("pl_orbper", "32.9"),
            ("pl_rade", "2.6"),
            ("pl_trandur", "2.7"),
            ("pl_trandep", "0.29"),
        ])],
    );
    let outcome = run_batch(&snapshot, &k2, "xgb", Threshold::default(), &BatchOptions::default()).unwrap();
    assert_eq!(outcome.mission, MissionTag::K2);
    assert!((outcome.verdicts[0].features.transit_depth - 2900.0).abs() < 1e-6);
    assert_eq!(outcome.verdicts[0].label == Label::Planet, outcome.verdicts[0].probability >= 0.5);
}
