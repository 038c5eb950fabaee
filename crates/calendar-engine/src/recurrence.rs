//! Recurrence expansion -- which stored events occur on a given day.
//!
//! Rules are matched against wall-clock date components only (year, month,
//! day of month, day of week); there is no timezone conversion. The engine
//! keeps no state: every query is a pure function of the date and the map.

use crate::date_key::DateKey;
use crate::event::{Event, Occurrence, RecurrenceKind, RecurrenceRule};
use crate::store::EventMap;
use chrono::{Datelike, NaiveDate, Weekday};
use std::cmp::Ordering;

/// Whether `rule` produces an occurrence on `date`.
///
/// No rule matches before its start date or after its (inclusive) end date.
/// Monthly and yearly rules need an exact day-of-month match, so a rule
/// anchored on the 31st skips shorter months and one anchored on Feb 29 only
/// fires in leap years.
pub fn matches(rule: &RecurrenceRule, date: NaiveDate) -> bool {
    let start = rule.start_date.date();
    if date < start {
        return false;
    }
    if rule.end_date.is_some_and(|end| date > end.date()) {
        return false;
    }

    match rule.kind {
        RecurrenceKind::Daily => true,
        RecurrenceKind::Weekly => date.weekday() == start.weekday(),
        RecurrenceKind::Monthly => date.day() == start.day(),
        RecurrenceKind::Yearly => date.day() == start.day() && date.month() == start.month(),
        RecurrenceKind::Weekdays => !is_weekend(date.weekday()),
        RecurrenceKind::Weekends => is_weekend(date.weekday()),
    }
}

fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

/// All events occurring on `date`, unsorted.
///
/// Events stored under `date` come first, in stored order. Then come echoes of
/// recurring events anchored on other dates whose rule matches, in key order.
/// A rule is never echoed on its own anchor date: the stored event already
/// stands for that occurrence.
pub fn occurrences_on(date: DateKey, events: &EventMap) -> Vec<Occurrence> {
    let mut result: Vec<Occurrence> = events
        .get(&date)
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(index, event)| Occurrence::stored(event.clone(), index))
        .collect();

    for (anchor, list) in events {
        if *anchor == date {
            continue;
        }
        for (index, event) in list.iter().enumerate() {
            if recurs_on(event, date) {
                result.push(Occurrence::echo(event.clone(), *anchor, index));
            }
        }
    }

    result
}

fn recurs_on(event: &Event, date: DateKey) -> bool {
    event
        .recurrence
        .as_ref()
        .is_some_and(|rule| matches(rule, date.date()))
}

/// Order a day's events for the sidebar: timed events first by time, then
/// all-day events. The sort is stable, so all-day events and events sharing a
/// time keep their input order.
pub fn sort_for_display(mut occurrences: Vec<Occurrence>) -> Vec<Occurrence> {
    occurrences.sort_by(|a, b| display_order(&a.event, &b.event));
    occurrences
}

fn display_order(a: &Event, b: &Event) -> Ordering {
    match (a.time, b.time) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// The merged, display-ordered event list for `date`.
pub fn events_for_display(date: DateKey, events: &EventMap) -> Vec<Occurrence> {
    sort_for_display(occurrences_on(date, events))
}

