//! Tests for event value types, time display and draft prefill.

use calendar_engine::event::parse_time;
use calendar_engine::{
    display_time, CalendarError, DateKey, Event, EventDraft, Occurrence, RecurrenceKind,
    RecurrenceRule,
};
use chrono::{NaiveTime, TimeZone, Utc};
use uuid::Uuid;

fn key(s: &str) -> DateKey {
    s.parse().unwrap()
}

fn at(h: u32, m: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(h, m, 0)
}

#[test]
fn display_time_uses_twelve_hour_clock() {
    assert_eq!(display_time(at(14, 5)), "2:05 PM");
    assert_eq!(display_time(at(9, 30)), "9:30 AM");
    assert_eq!(display_time(at(0, 30)), "12:30 AM");
    assert_eq!(display_time(at(12, 0)), "12:00 PM");
    assert_eq!(display_time(at(23, 59)), "11:59 PM");
    assert_eq!(display_time(None), "All day");
}

#[test]
fn parse_time_accepts_input_formats() {
    assert_eq!(parse_time("07:45").ok(), at(7, 45));
    assert_eq!(parse_time("07:45:30").ok(), at(7, 45));
    assert!(matches!(parse_time("24:00"), Err(CalendarError::InvalidTime(_))));
    assert!(parse_time("noon").is_err());
    assert!(parse_time("").is_err());
}

#[test]
fn with_time_keeps_whole_minutes() {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
    let event = Event::new("Call", created_at)
        .with_time(NaiveTime::from_hms_milli_opt(9, 0, 30, 500).unwrap());
    assert_eq!(event.time, at(9, 0));

    let json = serde_json::to_string(&event).unwrap();
    let back: Event = serde_json::from_str(&json).unwrap();
    assert_eq!(back, event);
}

#[test]
fn recurrence_kind_parses_case_insensitively() {
    assert_eq!("weekly".parse::<RecurrenceKind>().unwrap(), RecurrenceKind::Weekly);
    assert_eq!("Weekends".parse::<RecurrenceKind>().unwrap(), RecurrenceKind::Weekends);
    assert!(matches!(
        "hourly".parse::<RecurrenceKind>(),
        Err(CalendarError::InvalidRecurrence(_))
    ));
    for kind in RecurrenceKind::ALL {
        assert_eq!(kind.to_string().parse::<RecurrenceKind>().unwrap(), kind);
    }
}

#[test]
fn rule_serializes_with_type_key() {
    let rule = RecurrenceRule::new(RecurrenceKind::Monthly, key("2024-01-31"));
    let json = serde_json::to_value(&rule).unwrap();
    assert_eq!(json, serde_json::json!({"type": "monthly", "startDate": "2024-01-31"}));
}

#[test]
fn same_series_prefers_ids_then_start_date() {
    let start = key("2024-01-01");
    let a = RecurrenceRule::new(RecurrenceKind::Daily, start).with_series_id(Uuid::from_u128(1));
    let b = RecurrenceRule::new(RecurrenceKind::Weekly, start).with_series_id(Uuid::from_u128(2));
    let legacy = RecurrenceRule::new(RecurrenceKind::Weekly, start);
    let elsewhere = RecurrenceRule::new(RecurrenceKind::Daily, key("2024-01-02"));

    assert!(a.same_series(&a));
    assert!(!a.same_series(&b));
    assert!(a.same_series(&legacy));
    assert!(legacy.same_series(&b));
    assert!(!legacy.same_series(&elsewhere));
}

#[test]
fn echo_serializes_flat_with_origin() {
    let event = Event::new("Standup", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
        .with_time(NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    let echo = Occurrence::echo(event, key("2024-01-01"), 2);
    let json = serde_json::to_value(&echo).unwrap();

    assert_eq!(json["title"], "Standup");
    assert_eq!(json["time"], "09:30");
    assert_eq!(json["isRecurring"], true);
    assert_eq!(json["originalDate"], "2024-01-01");
    assert_eq!(json["index"], 2);
}

#[test]
fn stored_occurrence_has_no_origin() {
    let event = Event::new("Lunch", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap());
    let json = serde_json::to_value(Occurrence::stored(event, 0)).unwrap();
    assert_eq!(json["isRecurring"], false);
    assert!(json.get("originalDate").is_none());
}

#[test]
fn draft_prefill_from_event() {
    let event = Event::new("Rent", Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap())
        .with_time(NaiveTime::from_hms_opt(8, 5, 0).unwrap())
        .with_description("Transfer")
        .with_color("#f59e0b")
        .with_recurrence(
            RecurrenceRule::new(RecurrenceKind::Monthly, key("2024-03-01"))
                .with_end_date(key("2024-12-01")),
        );

    let draft = EventDraft::from_event(key("2024-03-01"), &event);
    assert_eq!(draft.title, "Rent");
    assert_eq!(draft.date, "2024-03-01");
    assert_eq!(draft.time, "08:05");
    assert_eq!(draft.description, "Transfer");
    assert_eq!(draft.color, "#f59e0b");
    let recurrence = draft.recurrence.unwrap();
    assert_eq!(recurrence.kind, RecurrenceKind::Monthly);
    assert_eq!(recurrence.end_date, "2024-12-01");
}

#[test]
fn draft_deserializes_from_form_json() {
    let draft: EventDraft = serde_json::from_str(
        r##"{"title":"Gym","date":"2024-01-02","color":"#000000","recurrence":{"type":"weekdays"}}"##,
    )
    .unwrap();
    assert_eq!(draft.time, "");
    assert_eq!(draft.recurrence.unwrap().end_date, "");
}
