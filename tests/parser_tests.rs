// Parser tests: comments, field count, integers, timestamps, ordering policy

mod common;

use common::{CYCLE_0, log_time};
use fridgetop::parser::{LineError, ValidationPolicy, parse_line};

#[test]
fn parses_valid_line() {
    let record = parse_line(CYCLE_0, ValidationPolicy::Lenient)
        .unwrap()
        .expect("data line");
    assert_eq!(record.fridge_id, 0);
    assert_eq!(record.cycle_number, 0);
    assert_eq!(record.cooldown_start, log_time("2019-01-05 08:10:00"));
    assert_eq!(record.cooldown_end, log_time("2019-01-06 14:27:00"));
    assert_eq!(record.warmup_start, log_time("2019-01-10 08:15:00"));
    assert_eq!(record.warmup_end, log_time("2019-01-11 09:12:00"));
}

#[test]
fn tolerates_crlf_and_padded_integers() {
    let line = "7, 12 ,2019-01-05 08:10:00,2019-01-06 14:27:00,2019-01-10 08:15:00,2019-01-11 09:12:00\r\n";
    let record = parse_line(line, ValidationPolicy::Lenient)
        .unwrap()
        .expect("data line");
    assert_eq!(record.fridge_id, 7);
    assert_eq!(record.cycle_number, 12);
}

#[test]
fn comments_and_blank_lines_are_skipped() {
    for line in [
        "# fridge log",
        "fridge_id,cooldown_number,cooldown_start,cooldown_end,warmup_start,warmup_end",
        "",
        "   ",
        "-1,0,2019-01-05 08:10:00,2019-01-06 14:27:00,2019-01-10 08:15:00,2019-01-11 09:12:00",
    ] {
        assert_eq!(parse_line(line, ValidationPolicy::Lenient), Ok(None), "{line:?}");
    }
}

#[test]
fn rejects_wrong_field_count() {
    let err = parse_line("0,0,2019-01-05 08:10:00", ValidationPolicy::Lenient).unwrap_err();
    assert_eq!(
        err,
        LineError::FieldCount {
            expected: 6,
            found: 3
        }
    );

    let extra = format!("{CYCLE_0},extra");
    let err = parse_line(&extra, ValidationPolicy::Lenient).unwrap_err();
    assert!(matches!(err, LineError::FieldCount { found: 7, .. }));
}

#[test]
fn rejects_non_integer_cycle_number() {
    let line = "0,x,2019-01-05 08:10:00,2019-01-06 14:27:00,2019-01-10 08:15:00,2019-01-11 09:12:00";
    let err = parse_line(line, ValidationPolicy::Lenient).unwrap_err();
    assert_eq!(
        err,
        LineError::InvalidInteger {
            field: "cooldown_number",
            value: "x".into()
        }
    );
}

#[test]
fn rejects_bad_timestamp() {
    let line = "0,0,2019-01-05T08:10:00,2019-01-06 14:27:00,2019-01-10 08:15:00,2019-01-11 09:12:00";
    let err = parse_line(line, ValidationPolicy::Lenient).unwrap_err();
    assert!(matches!(
        err,
        LineError::InvalidTimestamp {
            field: "cooldown_start",
            ..
        }
    ));
    assert!(err.to_string().contains("cooldown_start"));
}

#[test]
fn rejects_timestamps_outside_fixed_format() {
    for value in [
        " 2019-01-05 08:10:00",
        "2019-01-05 08:10:00 ",
        "+2019-01-05 08:10:00",
        "2019-01-05 08:10:60",
        "2019-1-05 08:10:00",
        "2019-01-05 8:10:00",
    ] {
        let line = format!(
            "0,0,{value},2019-01-06 14:27:00,2019-01-10 08:15:00,2019-01-11 09:12:00"
        );
        let err = parse_line(&line, ValidationPolicy::Lenient).unwrap_err();
        assert_eq!(
            err,
            LineError::InvalidTimestamp {
                field: "cooldown_start",
                value: value.to_string()
            },
            "{value:?}"
        );
    }
}

#[test]
fn rejects_cooldown_end_before_start() {
    let line = "0,0,2019-01-06 14:27:00,2019-01-05 08:10:00,2019-01-10 08:15:00,2019-01-11 09:12:00";
    for policy in [ValidationPolicy::Lenient, ValidationPolicy::Strict] {
        let err = parse_line(line, policy).unwrap_err();
        assert_eq!(
            err,
            LineError::OutOfOrder {
                start: "cooldown_start",
                end: "cooldown_end"
            }
        );
    }
}

#[test]
fn inverted_warmup_depends_on_policy() {
    // warmup_end earlier than warmup_start
    let line = "0,0,2019-01-05 08:10:00,2019-01-06 14:27:00,2019-01-11 09:12:00,2019-01-10 08:15:00";
    assert!(parse_line(line, ValidationPolicy::Lenient).unwrap().is_some());
    assert_eq!(
        parse_line(line, ValidationPolicy::Strict).unwrap_err(),
        LineError::OutOfOrder {
            start: "warmup_start",
            end: "warmup_end"
        }
    );

    // warmup_start earlier than cooldown_end
    let line = "0,0,2019-01-05 08:10:00,2019-01-10 08:15:00,2019-01-06 14:27:00,2019-01-11 09:12:00";
    assert!(parse_line(line, ValidationPolicy::Lenient).unwrap().is_some());
    assert!(matches!(
        parse_line(line, ValidationPolicy::Strict).unwrap_err(),
        LineError::OutOfOrder {
            start: "cooldown_end",
            ..
        }
    ));
}

#[test]
fn equal_timestamps_are_in_order() {
    let line = "1,1,2019-01-05 08:10:00,2019-01-05 08:10:00,2019-01-05 08:10:00,2019-01-05 08:10:00";
    assert!(parse_line(line, ValidationPolicy::Strict).unwrap().is_some());
}
