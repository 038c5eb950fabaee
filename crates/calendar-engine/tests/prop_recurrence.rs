//! Property-based tests for recurrence expansion and store persistence using proptest.
//!
//! These tests verify invariants that should hold for *any* event map, not
//! just the specific examples in `recurrence_tests.rs` and `store_tests.rs`.

use calendar_engine::store::{load, save};
use calendar_engine::{
    events_for_display, matches, occurrences_on, sort_for_display, DateKey, Event, EventMap,
    MemoryBackend, Occurrence, RecurrenceKind, RecurrenceRule,
};
use chrono::{Datelike, NaiveTime, TimeZone, Utc, Weekday};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_kind() -> impl Strategy<Value = RecurrenceKind> {
    prop_oneof![
        Just(RecurrenceKind::Daily),
        Just(RecurrenceKind::Weekly),
        Just(RecurrenceKind::Monthly),
        Just(RecurrenceKind::Yearly),
        Just(RecurrenceKind::Weekdays),
        Just(RecurrenceKind::Weekends),
    ]
}

/// A date in 2023-2026, any valid day of the month.
fn arb_date() -> impl Strategy<Value = DateKey> {
    (2023i32..=2026, 0u32..12, 1u32..=31).prop_filter_map("day exists in month", |(y, m, d)| {
        DateKey::from_ymd0(y, m, d).ok()
    })
}

/// Any wall-clock time, including seconds and sub-second parts.
fn arb_time() -> impl Strategy<Value = Option<NaiveTime>> {
    prop_oneof![
        Just(None),
        (0u32..24, 0u32..60, 0u32..60, 0u32..1000)
            .prop_map(|(h, m, s, ms)| NaiveTime::from_hms_milli_opt(h, m, s, ms)),
    ]
}

/// An event anchored on `anchor`, recurring about half the time.
fn arb_event(anchor: DateKey) -> impl Strategy<Value = Event> {
    (
        "[A-Za-z ]{1,12}",
        arb_time(),
        proptest::option::of("[a-z ]{0,16}"),
        proptest::option::of(arb_kind()),
        proptest::option::of(0i64..200),
        0i64..1_000_000,
    )
        .prop_map(move |(title, time, description, kind, end_offset, secs)| {
            let created_at = Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap();
            let mut event = Event::new(title, created_at);
            if let Some(time) = time {
                event = event.with_time(time);
            }
            event.description = description;
            event.recurrence = kind.map(|kind| {
                let mut rule = RecurrenceRule::new(kind, anchor);
                rule.end_date = end_offset
                    .and_then(|days| anchor.date().checked_add_days(chrono::Days::new(days as u64)))
                    .map(DateKey::from);
                rule
            });
            event
        })
}

fn arb_map() -> impl Strategy<Value = EventMap> {
    proptest::collection::vec(arb_date(), 0..6)
        .prop_flat_map(|anchors| {
            anchors
                .into_iter()
                .map(|anchor| {
                    proptest::collection::vec(arb_event(anchor), 1..4)
                        .prop_map(move |events| (anchor, events))
                })
                .collect::<Vec<_>>()
        })
        .prop_map(|entries| entries.into_iter().collect())
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: queries are pure
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn occurrences_are_deterministic(map in arb_map(), date in arb_date()) {
        let first = occurrences_on(date, &map);
        let second = occurrences_on(date, &map);
        prop_assert_eq!(first, second);
    }
}

// ---------------------------------------------------------------------------
// Property 2: stored events come first, echoes never repeat the anchor
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn stored_prefix_then_foreign_echoes(map in arb_map(), date in arb_date()) {
        let result = occurrences_on(date, &map);
        let stored = map.get(&date).map_or(0, Vec::len);

        prop_assert!(result.len() >= stored);
        for occurrence in &result[..stored] {
            prop_assert!(!occurrence.is_recurring);
        }
        for occurrence in &result[stored..] {
            prop_assert!(occurrence.is_recurring);
            let anchor = occurrence.original_date.unwrap();
            prop_assert_ne!(anchor, date);
            prop_assert_eq!(&map[&anchor][occurrence.index], &occurrence.event);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 3: no rule matches before its start or after its end
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn matches_respects_bounds(
        kind in arb_kind(),
        start in arb_date(),
        end_offset in proptest::option::of(0u64..400),
        date in arb_date(),
    ) {
        let mut rule = RecurrenceRule::new(kind, start);
        rule.end_date = end_offset
            .and_then(|d| start.date().checked_add_days(chrono::Days::new(d)))
            .map(DateKey::from);

        if matches(&rule, date.date()) {
            prop_assert!(date >= start);
            if let Some(end) = rule.end_date {
                prop_assert!(date <= end);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 4: weekday / weekend rules partition the days after the start
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn weekdays_and_weekends_partition(start in arb_date(), date in arb_date()) {
        let weekdays = RecurrenceRule::new(RecurrenceKind::Weekdays, start);
        let weekends = RecurrenceRule::new(RecurrenceKind::Weekends, start);
        let a = matches(&weekdays, date.date());
        let b = matches(&weekends, date.date());

        if date >= start {
            prop_assert!(a ^ b);
            prop_assert_eq!(b, matches!(date.weekday(), Weekday::Sat | Weekday::Sun));
        } else {
            prop_assert!(!a && !b);
        }
    }
}

// ---------------------------------------------------------------------------
// Property 5: display sort is ordered and stable
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn display_sort_is_ordered_and_stable(times in proptest::collection::vec(arb_time(), 0..12)) {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let input: Vec<Occurrence> = times
            .iter()
            .enumerate()
            .map(|(i, time)| {
                let mut event = Event::new(format!("e{}", i), created_at);
                event.time = *time;
                Occurrence::stored(event, i)
            })
            .collect();

        let sorted = sort_for_display(input);
        prop_assert_eq!(sorted.len(), times.len());

        for pair in sorted.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            match (a.event.time, b.event.time) {
                (Some(x), Some(y)) => {
                    prop_assert!(x <= y);
                    if x == y {
                        prop_assert!(a.index < b.index);
                    }
                }
                (None, Some(_)) => prop_assert!(false, "all-day event before timed event"),
                (Some(_), None) => {}
                (None, None) => prop_assert!(a.index < b.index),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Property 6: save / load round-trip
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn save_load_roundtrip(map in arb_map()) {
        let mut backend = MemoryBackend::new();
        save(&mut backend, "events", &map).unwrap();
        prop_assert_eq!(load(&backend, "events"), map);
    }
}

// ---------------------------------------------------------------------------
// Property 7: date keys format as zero-padded YYYY-MM-DD with a 1-based month
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn date_key_format(date in arb_date()) {
        let text = date.to_string();
        prop_assert_eq!(text.len(), 10);
        prop_assert_eq!(
            &text,
            &format!("{:04}-{:02}-{:02}", date.year(), date.month0() + 1, date.day())
        );
        prop_assert_eq!(text.parse::<DateKey>().unwrap(), date);
        prop_assert_eq!(date.date().month(), date.month());
    }
}

// ---------------------------------------------------------------------------
// Property 8: the display list is a permutation of the merged occurrences
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn display_list_keeps_every_occurrence(map in arb_map(), date in arb_date()) {
        let merged = occurrences_on(date, &map);
        let display = events_for_display(date, &map);
        prop_assert_eq!(merged.len(), display.len());
        for occurrence in &merged {
            prop_assert!(display.contains(occurrence));
        }
    }
}
