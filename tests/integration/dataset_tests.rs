use percentile_closure::prep::repair::SeriesRepair;
use percentile_closure::{
    close_dataset, close_source, BatchOptions, ClosureError, Dataset, RangeSelection, SeriesKey, TableConfig,
};

const SOURCE: &str = "\"Top income shares, WID\";;;\n\
Percentile;Year;\"Pre-tax national income\nFrance\";\"Pre-tax national income\nUSA\"\n\
p0p90;2019;0.65;0.53\n\
p90p99;2019;0.24;0.28\n\
p99p99.9;2019;;0.11\n\
p99.9p100;2019;0.04;0.08\n\
p0p90;1980;0.68;\n";

#[test]
fn every_distribution_is_closed_independently() {
    let closed = close_source(SOURCE, &TableConfig::default(), &BatchOptions::default()).unwrap();
    assert_eq!(closed.len(), 3);
    assert_eq!(closed.skipped, vec![SeriesKey::new("1980", "USA")]);

    let fr = closed.get(&SeriesKey::new("2019", "France")).unwrap();
    assert_eq!(fr.closure.len(), 10);
    assert!((fr.closure.size_of("p99p99.9", 'p').unwrap().unwrap() - 0.07).abs() < 1e-7);

    let fr_1980 = closed.get(&SeriesKey::new("1980", "France")).unwrap();
    assert_eq!(fr_1980.closure.len(), 3);
}

#[test]
fn repair_fills_the_single_gap() {
    let options = BatchOptions {
        repair: true,
        ..BatchOptions::default()
    };
    let closed = close_source(SOURCE, &TableConfig::default(), &options).unwrap();
    match &closed.get(&SeriesKey::new("2019", "France")).unwrap().repair {
        Some(SeriesRepair::Repaired { label, size }) => {
            assert_eq!(label, "p99p99.9");
            assert!((size - 0.07).abs() < 1e-9);
        }
        other => panic!("unexpected repair outcome: {:?}", other),
    }
}

#[test]
fn percent_bar_selection_keeps_bar_order() {
    let options = BatchOptions {
        selection: Some(RangeSelection::from_percent_bar("percentBar-0-90-99-100").unwrap()),
        ..BatchOptions::default()
    };
    let closed = close_source(SOURCE, &TableConfig::default(), &options).unwrap();
    let us = closed.get(&SeriesKey::new("2019", "USA")).unwrap();
    let labels: Vec<String> = us.records.iter().map(|r| r.label('p')).collect();
    assert_eq!(labels, vec!["p0p90", "p90p99", "p99p100"]);
    assert!((us.records[2].size - 0.19).abs() < 1e-7);
}

#[test]
fn year_filter_narrows_the_batch() {
    let mut ds = Dataset::from_source(SOURCE, &TableConfig::default()).unwrap();
    ds.retain(|k| k.year == "1980");
    let closed = close_dataset(&ds, &BatchOptions::default());
    assert_eq!(closed.len(), 1);
    assert_eq!(closed.skipped.len(), 1);
}

#[test]
fn failing_distribution_is_named() {
    let src = "meta\nPercentile;Year;Broken\np0p50;2019;0.3\np50p100;2019;0.6\n";
    let err = close_source(src, &TableConfig::default(), &BatchOptions::default())
        .unwrap()
        .require_all_closed()
        .unwrap_err();
    assert!(matches!(err, ClosureError::Group { .. }));
    assert!(err.to_string().contains("2019 Broken"));
}

#[test]
fn rounded_distribution_is_reported_without_dropping_the_rest() {
    let src = "meta\nPercentile;Year;France;USA\n\
p0p50;2019;0.2207;0.13\n\
p50p90;2019;0.4012;0.42\n\
p90p100;2019;0.3782;0.45\n\
p0p90;2019;0.6219;0.55\n";
    let closed = close_source(src, &TableConfig::default(), &BatchOptions::default()).unwrap();
    assert_eq!(closed.len(), 1);
    let (key, err) = &closed.failed[0];
    assert_eq!(key, &SeriesKey::new("2019", "France"));
    assert!(matches!(err, ClosureError::InconsistentPath { .. }));
    assert!(closed.get(&SeriesKey::new("2019", "USA")).is_some());
}

#[test]
fn crlf_and_quoted_delimiters_are_read() {
    let src = "meta\r\nPercentile;Year;\"Income; pre-tax\nSpain\"\r\np0p50;2019;0.2\r\n";
    let ds = Dataset::from_source(src, &TableConfig::default()).unwrap();
    assert_eq!(ds.series, vec!["Spain"]);
    assert_eq!(ds.len(), 1);
}
