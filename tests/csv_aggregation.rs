// End-to-end: payroll CSV on disk → load → aggregate → totals

use payroll_aggregator::{
    load_csv, Accumulator, AccumulatorStore, AggregatorConfig, AggregatorError, Category,
    ConcurrentAggregator,
};
use rust_decimal_macros::dec;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_csv_with_duplicates_aggregates_once_per_name() {
    let file = write_csv(
        "name,salary,role\n\
         Ana,1000.00,boss\n\
         Luis,250.50,developer\n\
         Ana,1000.00,boss\n\
         Marta,300.25,Developer\n\
         Luis,250.50,developer\n",
    );

    let records = load_csv(file.path()).unwrap();
    let store = AccumulatorStore::new(Duration::from_millis(1));
    let aggregator = ConcurrentAggregator::new(AggregatorConfig::default().with_workers(8)).unwrap();

    let report = aggregator
        .aggregate(&records, &store, Duration::from_secs(2))
        .unwrap();

    assert_eq!(report.input_records, 5);
    assert_eq!(report.unique_records, 3);
    assert_eq!(report.duplicates_dropped, 2);
    assert_eq!(store.total(Category::Boss), dec!(1000.00));
    assert_eq!(store.total(Category::Developer), dec!(550.75));
    assert_eq!(report.totals.grand_total(), dec!(1550.75));
}

#[test]
fn test_invalid_row_rejected_before_any_aggregation() {
    let file = write_csv("name,salary,role\nAna,1000.00,boss\nLuis,250.50,intern\n");

    let err = load_csv(file.path()).unwrap_err();

    let root = err.root_cause().to_string();
    assert_eq!(root, "unknown category 'intern'");
    assert!(err
        .chain()
        .any(|cause| matches!(
            cause.downcast_ref::<AggregatorError>(),
            Some(AggregatorError::InvalidCategory { .. })
        )));
}

#[test]
fn test_missing_file_has_context() {
    let err = load_csv(std::path::Path::new("/nonexistent/payroll.csv")).unwrap_err();
    assert!(err.to_string().starts_with("Failed to open CSV file"));
}

#[test]
fn test_totals_are_stable_between_reads() {
    let file = write_csv("name,salary,role\nAna,10.00,boss\nLuis,5.00,developer\n");
    let records = load_csv(file.path()).unwrap();
    let store = AccumulatorStore::instant();

    ConcurrentAggregator::new(AggregatorConfig::default())
        .unwrap()
        .aggregate_with_default_deadline(&records, &store)
        .unwrap();

    let first = store.totals();
    let second = store.totals();
    assert_eq!(first, second);
    assert_eq!(first.get(Category::Boss), dec!(10.00));
}
