use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use kalendi_core::{
    expand, expand_with_options, occurrences, ExpandOptions, Event, Frequency, MonthOverflow,
    RecurrenceRule, WindowFilter,
};
use proptest::prelude::*;

fn frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Daily),
        Just(Frequency::Weekly),
        Just(Frequency::Monthly),
        Just(Frequency::Yearly),
    ]
}

fn overflow() -> impl Strategy<Value = MonthOverflow> {
    prop_oneof![Just(MonthOverflow::Rollover), Just(MonthOverflow::Clamp)]
}

/// Naive instants between 2000 and ~2040 at minute resolution.
fn instant() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..(40 * 366 * 24 * 60)).prop_map(|minutes| {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    })
}

fn template(start: NaiveDateTime, duration_minutes: i64, rule: RecurrenceRule) -> Event {
    Event::new("tpl", "Generated", start, start + Duration::minutes(duration_minutes)).with_rule(rule)
}

fn far_future() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(9000, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

proptest! {
    #[test]
    fn non_recurring_is_returned_unchanged(
        start in instant(),
        window_start in instant(),
        window_end in instant(),
    ) {
        let event = Event::new("one", "Once", start, start + Duration::hours(1));
        prop_assert_eq!(expand(&event, window_start, window_end).unwrap(), vec![event]);
    }

    #[test]
    fn count_bounds_an_unbounded_window_exactly(
        start in instant(),
        freq in frequency(),
        interval in 1i32..5,
        count in 0u32..60,
    ) {
        let rule = RecurrenceRule::new(freq, interval).with_count(count);
        let event = template(start, 30, rule);
        let instances = expand(&event, start, far_future()).unwrap();

        prop_assert_eq!(instances.len(), count as usize);
        let expected_ids: Vec<String> = (0..count).map(|n| format!("tpl_{n}")).collect();
        let ids: Vec<String> = instances.iter().map(|e| e.id.clone()).collect();
        prop_assert_eq!(ids, expected_ids);
    }

    #[test]
    fn instances_keep_duration_and_ascend(
        start in instant(),
        duration_minutes in 0i64..(3 * 24 * 60),
        freq in frequency(),
        interval in 1i32..4,
        overflow in overflow(),
        window_start in instant(),
        span_days in 0i64..800,
    ) {
        let event = template(start, duration_minutes, RecurrenceRule::new(freq, interval));
        let window_end = window_start + Duration::days(span_days);
        let options = ExpandOptions { month_overflow: overflow, ..ExpandOptions::default() };
        let instances = expand_with_options(&event, window_start, window_end, &options).unwrap();

        for instance in &instances {
            prop_assert_eq!(instance.duration(), Duration::minutes(duration_minutes));
            prop_assert!(instance.start_date >= window_start);
            prop_assert!(instance.start_date <= window_end);
            prop_assert_eq!(instance.original_event_id.as_deref(), Some("tpl"));
        }
        for pair in instances.windows(2) {
            prop_assert!(pair[0].start_date < pair[1].start_date);
        }
    }

    #[test]
    fn never_exceeds_the_cap(
        start in instant(),
        freq in frequency(),
        cap in 0u32..50,
    ) {
        let event = template(start, 60, RecurrenceRule::new(freq, 1));
        let options = ExpandOptions { max_occurrences: cap, ..ExpandOptions::default() };
        let instances = expand_with_options(&event, start, far_future(), &options).unwrap();
        prop_assert_eq!(instances.len(), cap as usize);
    }

    #[test]
    fn until_bound_is_respected(
        start in instant(),
        freq in frequency(),
        until_days in 0i64..1500,
    ) {
        let until = start + Duration::days(until_days);
        let event = template(start, 60, RecurrenceRule::new(freq, 1).with_end_date(until));
        let instances = expand(&event, start, far_future()).unwrap();

        prop_assert!(!instances.is_empty());
        let date_only = until.time() == NaiveTime::MIN;
        for instance in &instances {
            if date_only {
                prop_assert!(instance.start_date.date() <= until.date());
            } else {
                prop_assert!(instance.start_date <= until);
            }
        }
    }

    #[test]
    fn expansion_is_idempotent(
        start in instant(),
        freq in frequency(),
        interval in 1i32..4,
        window_start in instant(),
    ) {
        let event = template(start, 45, RecurrenceRule::new(freq, interval).with_count(40));
        let window_end = window_start + Duration::days(365);
        let first = expand(&event, window_start, window_end).unwrap();
        let second = expand(&event, window_start, window_end).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn lazy_and_eager_agree(
        start in instant(),
        freq in frequency(),
        window_start in instant(),
        overlap in any::<bool>(),
    ) {
        let event = template(start, 90, RecurrenceRule::new(freq, 2).with_count(30));
        let window_end = window_start + Duration::days(200);
        let options = ExpandOptions {
            window_filter: if overlap { WindowFilter::Overlap } else { WindowFilter::StartDate },
            ..ExpandOptions::default()
        };
        let eager = expand_with_options(&event, window_start, window_end, &options).unwrap();
        let lazy: Vec<Event> = occurrences(&event, window_start, window_end, &options)
            .unwrap()
            .collect();
        prop_assert_eq!(eager, lazy);
    }

    #[test]
    fn non_positive_interval_is_rejected(
        start in instant(),
        freq in frequency(),
        interval in -100i32..=0,
    ) {
        let event = template(start, 60, RecurrenceRule::new(freq, interval));
        prop_assert!(expand(&event, start, far_future()).is_err());
    }
}
