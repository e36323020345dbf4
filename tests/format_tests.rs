// Text report: time periods, summary/cycle tables, filters, N/A handling

mod common;

use common::*;
use fridgetop::commands::history::{list_records, render_record};
use fridgetop::format::{ReportOptions, format_cycles, format_report, format_summary, format_time_period};

#[test]
fn time_period_format() {
    assert_eq!(format_time_period(0.0), "Days 00, 00:00:00");
    assert_eq!(format_time_period(59.9), "Days 00, 00:00:59");
    assert_eq!(format_time_period(CYCLE_0_WAIT as f64), "Days 08, 22:48:00");
    assert_eq!(format_time_period(-3661.0), "-Days 00, 01:01:01");
    assert_eq!(format_time_period(100.0 * 86_400.0), "Days 100, 00:00:00");
}

#[test]
fn summary_table_marks_undefined_values() {
    let state = state_with(&[FRIDGE_3_CYCLE_0], 1);
    let text = format_summary(state.summary(3).unwrap());

    assert!(text.contains("Cool Down Time:"));
    assert!(text.contains("Wait Time:"));
    assert!(text.contains("33.33%"));
    let wait_row = text.lines().find(|l| l.contains("Wait Time:")).unwrap();
    assert!(wait_row.contains("N/A"));
    assert!(wait_row.contains("0.00%"));
}

#[test]
fn cycle_table_lists_cycles_and_last_wait_is_na() {
    let state = state_with(&[CYCLE_0, CYCLE_1], 1);
    let cycles = state.cycle_store().fridge(0).unwrap();

    let text = format_cycles(cycles, None);
    let rows: Vec<&str> = text.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].contains("2019-01-05 08:10:00"));
    assert!(rows[0].contains("2019-01-11 09:12:00"));
    assert!(rows[0].contains("Days 08, 22:48:00"));
    assert!(rows[1].trim_end().ends_with("N/A"));

    let only_one = format_cycles(cycles, Some(1));
    assert_eq!(only_one.lines().count(), 2);
    assert!(only_one.contains("2019-01-20 08:00:00"));
}

#[test]
fn report_respects_fridge_filter_and_sections() {
    let state = state_with(&[CYCLE_0, CYCLE_1, FRIDGE_3_CYCLE_0], 1);

    let all = format_report(state.summaries(), state.cycle_store(), &ReportOptions::default());
    assert!(all.contains("Fridge 0 Summary:"));
    assert!(all.contains("Fridge 3 Cycle Data:"));
    assert!(all.contains("Fridge 0: Cycle Count: 2  Total Time: Days 20, 23:50:00"));

    let options = ReportOptions {
        fridge: Some(3),
        show_cycles: false,
        ..ReportOptions::default()
    };
    let only_three = format_report(state.summaries(), state.cycle_store(), &options);
    assert!(!only_three.contains("Fridge 0"));
    assert!(only_three.contains("Fridge 3 Summary:"));
    assert!(!only_three.contains("Cycle Data"));
    assert!(only_three.contains("Fridge 3: Cycle Count: 1"));
}

#[test]
fn report_without_data_says_so() {
    let state = state_with(&["# empty log"], 1);
    let text = format_report(state.summaries(), state.cycle_store(), &ReportOptions::default());
    assert_eq!(text, "No data");

    let state = state_with(&[CYCLE_0], 1);
    let options = ReportOptions {
        fridge: Some(5),
        ..ReportOptions::default()
    };
    let text = format_report(state.summaries(), state.cycle_store(), &options);
    assert_eq!(text, "Fridge 5: No data");
}

#[test]
fn history_listing_and_record_rendering() {
    let entries = vec![
        history_entry(&[CYCLE_0], 1_600_000_000),
        history_entry(&[CYCLE_0, CYCLE_1], 1_600_000_060),
    ];

    let listing = list_records(&entries);
    assert!(listing.contains("Record 1: Date 2020-09-13T12:26:40.000000Z"));
    assert!(listing.contains("Record 2: Date 2020-09-13T12:27:40.000000Z"));
    assert_eq!(list_records(&[]), "No history records");

    let text = render_record(&entries, 2, &ReportOptions::default()).unwrap();
    assert!(text.starts_with("Record 2:"));
    assert!(text.contains("Fridge 0: Cycle Count: 2"));

    let first = render_record(&entries, 1, &ReportOptions::default()).unwrap();
    assert!(first.contains("Fridge 0: Cycle Count: 1"));

    assert!(render_record(&entries, 0, &ReportOptions::default()).is_err());
    assert!(render_record(&entries, 3, &ReportOptions::default()).is_err());
}
