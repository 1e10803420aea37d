//! File-level export round trips for event-study results.

use chrono::NaiveDate;
use merton_analytics::{AnalyticsError, MarketModelResult, ReturnObservation};
use merton_events::{AbnormalReturnResult, EventOutcome, WindowConfig};
use merton_output::{
    AbnormalReturnRecord, write_abnormal_returns_csv, write_results_json,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 8, d).unwrap()
}

fn result_for(label: &str, event_day: u32) -> AbnormalReturnResult {
    let event_date = date(event_day);
    let windows = WindowConfig::default().windows_for(event_date).unwrap();
    AbnormalReturnResult {
        label: label.to_string(),
        event_date,
        windows,
        market_model: MarketModelResult {
            beta: 0.85,
            estimation_sample_size: 120,
        },
        abnormal_returns: vec![
            ReturnObservation::new(date(event_day - 1), 0.012),
            ReturnObservation::new(date(event_day), 0.345),
        ],
        car: 0.357,
        aar: 0.1785,
        std_ar: 0.02,
        t_ar: vec![0.6, 17.25],
        std_car: 0.0283,
        t_car: 12.62,
    }
}

#[test]
fn test_csv_export_skips_failed_events() {
    let outcomes = vec![
        EventOutcome {
            label: "Merger Announced".to_string(),
            result: Ok(result_for("Merger Announced", 5)),
        },
        EventOutcome {
            label: "Broken".to_string(),
            result: Err(AnalyticsError::EmptyEventWindow.into()),
        },
    ];

    let path = std::env::temp_dir().join("merton_abnormal_returns_test.csv");
    write_abnormal_returns_csv(&path, &outcomes).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let records: Vec<AbnormalReturnRecord> =
        reader.deserialize().collect::<Result<_, _>>().unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.label == "Merger Announced"));
    assert_eq!(records[0].date, date(4));
    assert_eq!(records[1].abnormal_return, 0.345);
}

#[test]
fn test_json_export_keeps_failures_by_label() {
    let outcomes = vec![
        EventOutcome {
            label: "Merger Announced".to_string(),
            result: Ok(result_for("Merger Announced", 5)),
        },
        EventOutcome {
            label: "Broken".to_string(),
            result: Err(AnalyticsError::EmptyEventWindow.into()),
        },
    ];

    let path = std::env::temp_dir().join("merton_results_test.json");
    write_results_json(&path, &outcomes).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();
    let value: serde_json::Value = serde_json::from_str(&content).unwrap();

    assert_eq!(value["Merger Announced"]["car"], 0.357);
    assert_eq!(
        value["Merger Announced"]["market_model"]["beta"],
        0.85
    );
    assert!(value["Broken"]["error"].as_str().unwrap().contains("event window"));
}
