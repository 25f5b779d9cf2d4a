use worktracker::utils::time::{format_duration, parse_duration};

const HOUR: i64 = 3_600_000;
const MINUTE: i64 = 60_000;

#[test]
fn test_duration_round_trip() {
    for text in ["00:00", "02:30", "27:15", "-02:00"] {
        let elapsed = parse_duration(text).expect("valid duration");
        assert_eq!(format_duration(elapsed), text);
    }
    assert_eq!(parse_duration("02:30"), Some(2 * HOUR + 30 * MINUTE));
    assert_eq!(parse_duration("27:15"), Some(27 * HOUR + 15 * MINUTE));
    assert_eq!(parse_duration("-02:00"), Some(-2 * HOUR));
}

#[test]
fn test_format_duration_truncates_seconds() {
    assert_eq!(format_duration(2 * HOUR + 30 * MINUTE + 59_999), "02:30");
    assert_eq!(format_duration(125 * HOUR), "125:00");
}

#[test]
fn test_parse_duration_rejects_malformed() {
    assert_eq!(parse_duration(""), None);
    assert_eq!(parse_duration("2h"), None);
    assert_eq!(parse_duration("02:5"), None);
    assert_eq!(parse_duration("02:60"), None);
    assert_eq!(parse_duration(":30"), None);
}

#[test]
fn test_parse_duration_rejects_overflowing_hours() {
    assert_eq!(parse_duration("99999999999999:00"), None);
    assert_eq!(parse_duration("-99999999999999:00"), None);
    assert_eq!(parse_duration("99999999999999999999:00"), None);
}
