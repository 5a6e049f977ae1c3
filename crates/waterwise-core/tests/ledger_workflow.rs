//! Integration tests for the analyse-then-append workflow.

use chrono::NaiveDate;
use waterwise_core::{
    Analyzer, Config, CoreError, ComputeError, EmptyHistoryPolicy, EstimatorKind, Feedback, Ledger,
    UsageInput,
};

fn day(n: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 7, n).unwrap()
}

#[test]
fn test_full_recording_workflow() {
    let ledger = Ledger::open_memory().unwrap();
    let analyzer = Analyzer::default();

    let first = analyzer.record(&ledger, UsageInput::new(day(1), 100.0, 3)).unwrap();
    assert_eq!(first.record.expected_usage, 0.0);
    assert_eq!(first.feedback, Feedback::OverBaseline);
    assert!(first.record.id > 0);

    for (n, liters) in [(2, 200.0), (3, 300.0)] {
        analyzer.record(&ledger, UsageInput::new(day(n), liters, 3)).unwrap();
    }

    // history is [100, 200, 300] -> baseline 200
    let fourth = analyzer.record(&ledger, UsageInput::new(day(4), 80.0, 4)).unwrap();
    assert_eq!(fourth.record.expected_usage, 200.0);
    assert_eq!(fourth.record.reward_score, 1.2);
    assert_eq!(fourth.record.efficiency_score, 60.0);
    assert_eq!(fourth.record.streak, 1);
    assert_eq!(fourth.per_person_usage, 20.0);
    assert_eq!(fourth.feedback, Feedback::Saviour);

    let stored = ledger.records().unwrap();
    assert_eq!(stored.len(), 4);
    assert_eq!(stored[3], fourth.record);
}

#[test]
fn test_baseline_excludes_the_new_record() {
    let ledger = Ledger::open_memory().unwrap();
    let analyzer = Analyzer::default();
    for n in 1..=7 {
        analyzer.record(&ledger, UsageInput::new(day(n), 100.0, 2)).unwrap();
    }
    let spike = analyzer.record(&ledger, UsageInput::new(day(8), 1000.0, 2)).unwrap();
    assert_eq!(spike.record.expected_usage, 100.0);

    let next = analyzer.expected_for(&ledger.records().unwrap()).unwrap();
    // last seven: six 100s and the 1000 spike
    assert_eq!(next, 228.57);
}

#[test]
fn test_invalid_input_appends_nothing() {
    let ledger = Ledger::open_memory().unwrap();
    let analyzer = Analyzer::default();
    let err = analyzer
        .record(&ledger, UsageInput::new(day(1), -3.0, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Compute(ComputeError::InvalidInput { .. })
    ));
    assert_eq!(ledger.count().unwrap(), 0);
}

#[test]
fn test_fail_policy_on_empty_ledger() {
    let mut config = Config::default();
    config.baseline.empty_history = EmptyHistoryPolicy::Fail;
    let analyzer = config.analyzer().unwrap();
    let ledger = Ledger::open_memory().unwrap();

    let err = analyzer
        .record(&ledger, UsageInput::new(day(1), 50.0, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Compute(ComputeError::InsufficientData { available: 0, .. })
    ));
    assert_eq!(ledger.count().unwrap(), 0);
}

#[test]
fn test_seasonal_strategy_through_config() {
    let mut config = Config::default();
    config.baseline.strategy = EstimatorKind::Seasonal;
    let analyzer = config.analyzer().unwrap();
    let ledger = Ledger::open_memory().unwrap();

    // 2024-07-01 is a Monday; weekends use twice as much
    for n in 1..=26 {
        let liters = if (n - 1) % 7 >= 5 { 200.0 } else { 100.0 };
        analyzer.record(&ledger, UsageInput::new(day(n), liters, 2)).unwrap();
    }
    // next day is Saturday 2024-07-27
    let expected = analyzer.expected_for(&ledger.records().unwrap()).unwrap();
    assert_eq!(expected, 200.0);
}

#[test]
fn test_ledger_file_survives_reopen() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("waterwise.db");
    let analyzer = Analyzer::default();
    {
        let ledger = Ledger::open_at(&path).unwrap();
        analyzer.record(&ledger, UsageInput::new(day(1), 100.0, 2)).unwrap();
        analyzer.record(&ledger, UsageInput::new(day(2), 50.0, 2)).unwrap();
    }
    let ledger = Ledger::open_at(&path).unwrap();
    let summary = ledger.summary().unwrap();
    assert_eq!(summary.total_records, 2);
    assert_eq!(summary.days_under_baseline, 1);
    assert_eq!(summary.best_streak, 1);
    assert_eq!(summary.total_reward, 0.5);
}
