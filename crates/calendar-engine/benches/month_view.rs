//! Month grid construction over a populated store.

use calendar_engine::{DateKey, Event, EventMap, MonthView, RecurrenceKind, RecurrenceRule};
use chrono::{NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

/// A year of events: one per day, every seventh one recurring.
fn populated_map() -> EventMap {
    let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let kinds = RecurrenceKind::ALL;
    let mut map = EventMap::new();
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    for (i, date) in start.iter_days().take(366).enumerate() {
        let key = DateKey::from(date);
        let mut event = Event::new(format!("event {}", i), created_at);
        if i % 7 == 0 {
            event = event.with_recurrence(RecurrenceRule::new(kinds[i % kinds.len()], key));
        }
        map.insert(key, vec![event]);
    }
    map
}

fn bench_month_view(c: &mut Criterion) {
    let map = populated_map();
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("month_view_june_2024", |b| {
        b.iter(|| MonthView::build(black_box(2024), black_box(5), &map, today).unwrap())
    });
}

criterion_group!(benches, bench_month_view);
criterion_main!(benches);
