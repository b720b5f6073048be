use percentile_closure::export::{ExportDocument, LayoutDocument};
use percentile_closure::{
    close_source, BatchOptions, ClosureError, LayoutConfig, RangeSelection, SeriesKey, TableConfig,
};

const SOURCE: &str = "meta\n\
Percentile;Year;France;USA\n\
p0p50;2019;0.22;0.13\n\
p50p90;2019;0.46;0.42\n\
p99p100;2019;0.1;\n";

const BAR: &str = "percentBar-0-50-90-100";

#[test]
fn export_holds_selected_ranges_per_year_and_series() {
    let options = BatchOptions {
        selection: Some(RangeSelection::from_percent_bar(BAR).unwrap()),
        ..BatchOptions::default()
    };
    let closed = close_source(SOURCE, &TableConfig::default(), &options).unwrap();
    let doc = ExportDocument::from_closed(&closed, 'p');
    assert_eq!(doc.series_count(), 2);

    let us = &doc.years["2019"]["USA"];
    assert_eq!(us.len(), 3);
    assert_eq!(us[2].label, "p90p100");
    assert!((us[2].size - 0.45).abs() < 1e-9);
}

#[test]
fn layout_stacks_selected_ranges() {
    let options = BatchOptions {
        selection: Some(RangeSelection::from_percent_bar(BAR).unwrap()),
        ..BatchOptions::default()
    };
    let closed = close_source(SOURCE, &TableConfig::default(), &options).unwrap();
    let layout = LayoutDocument::from_closed(&closed, &LayoutConfig::default(), None).unwrap();
    let fr = &layout.years["2019"]["France"];
    assert_eq!(fr.len(), 3);
    assert!((fr[1].size_lower - 0.22).abs() < 1e-9);
    assert!((fr[2].size_upper - 1.0).abs() < 1e-9);
}

#[test]
fn layout_of_a_gapped_selection_fails() {
    // France's p99p100 cannot be placed: nothing selected ends at 99.
    let options = BatchOptions {
        selection: Some(RangeSelection::from_labels(["p0p50", "p99p100"], 'p').unwrap()),
        ..BatchOptions::default()
    };
    let closed = close_source(SOURCE, &TableConfig::default(), &options).unwrap();
    let err = LayoutDocument::from_closed(&closed, &LayoutConfig::default(), None).unwrap_err();
    assert!(matches!(err, ClosureError::Layout(_)));
}

#[test]
fn sparse_series_is_left_out_of_the_layout() {
    let src = "meta\n\
Percentile;Year;France;USA\n\
p0p50;2019;0.22;\n\
p50p90;2019;0.46;\n\
p90p100;2019;0.32;0.45\n";
    let options = BatchOptions {
        selection: Some(RangeSelection::from_percent_bar(BAR).unwrap()),
        ..BatchOptions::default()
    };
    let closed = close_source(src, &TableConfig::default(), &options).unwrap();
    let layout = LayoutDocument::from_closed(&closed, &LayoutConfig::default(), Some(BAR)).unwrap();

    assert_eq!(layout.no_data, vec![SeriesKey::new("2019", "USA")]);
    let year = &layout.years["2019"];
    assert!(!year.contains_key("USA"));
    let fr = &year["France"];
    assert_eq!(fr.len(), 3);
    assert!((fr[2].size_upper - 1.0).abs() < 1e-9);
    assert!(year.contains_key(BAR));
}

#[cfg(feature = "serde")]
#[test]
fn export_json_nests_years_then_series() {
    use percentile_closure::export::save_export_json;

    let closed = close_source(SOURCE, &TableConfig::default(), &BatchOptions::default()).unwrap();
    let json = save_export_json(&ExportDocument::from_closed(&closed, 'p')).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value["years"]["2019"]["France"].is_array());
    assert_eq!(value["metadata"]["version"], env!("CARGO_PKG_VERSION"));
}
