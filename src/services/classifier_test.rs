#[cfg(test)]
mod classifier_tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use crate::models::booking::{Booking, BookingStatus, EffectiveWindow};
    use crate::services::classifier::classify;

    // Reference instant used by most tests: 2025-06-15 12:00:00 UTC
    fn test_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    fn base_booking(id: &str, status: BookingStatus) -> Booking {
        Booking {
            id: id.to_string(),
            status,
            scheduled_start: None,
            scheduled_end: None,
            requested_start: None,
            requested_end: None,
            subject_ref: None,
            tutor_ref: None,
            meeting_link: None,
        }
    }

    #[test]
    fn test_effective_window_prefers_scheduled_times() {
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Scheduled);
        booking.scheduled_start = Some(now + Duration::hours(1));
        booking.scheduled_end = Some(now + Duration::hours(2));
        booking.requested_start = Some(now + Duration::hours(5));
        booking.requested_end = Some(now + Duration::hours(6));

        let window = EffectiveWindow::resolve(&booking).unwrap();
        assert_eq!(window.start, now + Duration::hours(1));
        assert_eq!(window.end, now + Duration::hours(2));
    }

    #[test]
    fn test_effective_window_falls_back_to_requested_times() {
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Pending);
        booking.requested_start = Some(now + Duration::hours(3));
        booking.requested_end = Some(now + Duration::hours(4));

        let window = EffectiveWindow::resolve(&booking).unwrap();
        assert_eq!(window.start, now + Duration::hours(3));
        assert_eq!(window.end, now + Duration::hours(4));
    }

    #[test]
    fn test_effective_window_missing_end_defaults_to_one_hour() {
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Pending);
        booking.requested_start = Some(now + Duration::hours(1));

        let window = EffectiveWindow::resolve(&booking).unwrap();
        assert_eq!(window.end - window.start, Duration::minutes(60));
    }

    #[test]
    fn test_effective_window_missing_start_is_unresolvable() {
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Pending);
        // An end time alone is not a start anchor
        booking.scheduled_end = Some(now + Duration::hours(1));

        assert!(EffectiveWindow::resolve(&booking).is_none());
    }

    #[test]
    fn test_booking_without_start_anchor_in_neither_bucket() {
        let now = test_now();
        let booking = base_booking("orphan", BookingStatus::Scheduled);

        let classified = classify(&[booking], now);
        assert!(classified.upcoming.is_empty());
        assert!(classified.past.is_empty());

        // Same result at any other reference instant
        let classified = classify(
            &[base_booking("orphan", BookingStatus::Scheduled)],
            now + Duration::days(365),
        );
        assert!(classified.upcoming.is_empty());
        assert!(classified.past.is_empty());
    }

    #[test]
    fn test_future_scheduled_booking_is_upcoming() {
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Scheduled);
        booking.scheduled_start = Some(now + Duration::hours(1));
        booking.scheduled_end = Some(now + Duration::hours(2));

        let classified = classify(&[booking], now);
        assert_eq!(classified.upcoming.len(), 1);
        assert_eq!(classified.upcoming[0].id, "b1");
        assert!(classified.past.is_empty());
    }

    #[test]
    fn test_pending_with_future_requested_window_is_upcoming() {
        // Unconfirmed sessions must stay visible to the student
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Pending);
        booking.requested_start = Some(now + Duration::hours(1));

        let classified = classify(&[booking], now);
        assert_eq!(classified.upcoming.len(), 1);
        assert!(classified.past.is_empty());
    }

    #[test]
    fn test_in_progress_booking_is_upcoming() {
        // The window has opened but not closed, so the session is actionable
        let now = test_now();
        let mut booking = base_booking("live", BookingStatus::Scheduled);
        booking.scheduled_start = Some(now - Duration::minutes(10));
        booking.scheduled_end = Some(now + Duration::minutes(50));

        let classified = classify(&[booking], now);
        assert_eq!(classified.upcoming.len(), 1);
    }

    #[test]
    fn test_elapsed_booking_is_past() {
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Scheduled);
        booking.scheduled_start = Some(now - Duration::hours(2));
        booking.scheduled_end = Some(now - Duration::hours(1));

        let classified = classify(&[booking], now);
        assert!(classified.upcoming.is_empty());
        assert_eq!(classified.past.len(), 1);
    }

    #[test]
    fn test_window_ending_exactly_now_is_past() {
        // "Strictly after now" for upcoming, so an end at the boundary is past
        let now = test_now();
        let mut booking = base_booking("b1", BookingStatus::Scheduled);
        booking.scheduled_start = Some(now - Duration::hours(1));
        booking.scheduled_end = Some(now);

        let classified = classify(&[booking], now);
        assert!(classified.upcoming.is_empty());
        assert_eq!(classified.past.len(), 1);
    }

    #[test]
    fn test_completed_with_future_end_is_past_never_upcoming() {
        let now = test_now();
        let mut booking = base_booking("done-early", BookingStatus::Completed);
        booking.scheduled_start = Some(now - Duration::hours(1));
        booking.scheduled_end = Some(now + Duration::hours(1));

        let classified = classify(&[booking], now);
        assert!(classified.upcoming.is_empty());
        assert_eq!(classified.past.len(), 1);
        assert_eq!(classified.past[0].id, "done-early");
    }

    #[test]
    fn test_cancelled_with_future_window_in_neither_bucket_until_elapsed() {
        let now = test_now();
        let mut booking = base_booking("cx", BookingStatus::Cancelled);
        booking.scheduled_start = Some(now + Duration::hours(1));
        booking.scheduled_end = Some(now + Duration::hours(2));

        // Window still open: in neither bucket
        let classified = classify(&[booking.clone()], now);
        assert!(classified.upcoming.is_empty());
        assert!(classified.past.is_empty());

        // Once the window has elapsed it surfaces in past
        let later = now + Duration::hours(3);
        let classified = classify(&[booking], later);
        assert!(classified.upcoming.is_empty());
        assert_eq!(classified.past.len(), 1);
    }

    #[test]
    fn test_declined_with_future_window_excluded_from_upcoming() {
        let now = test_now();
        let mut booking = base_booking("dx", BookingStatus::Declined);
        booking.requested_start = Some(now + Duration::hours(1));

        let classified = classify(&[booking], now);
        assert!(classified.upcoming.is_empty());
        assert!(classified.past.is_empty());
    }

    #[test]
    fn test_inverted_window_accepted_as_is() {
        // Window sanity is the booking creator's problem, not the classifier's
        let now = test_now();
        let mut booking = base_booking("inv", BookingStatus::Scheduled);
        booking.scheduled_start = Some(now + Duration::hours(2));
        booking.scheduled_end = Some(now - Duration::hours(1));

        let classified = classify(&[booking], now);
        // End is before now, so the booking lands in past despite the
        // future start
        assert!(classified.upcoming.is_empty());
        assert_eq!(classified.past.len(), 1);
    }

    #[test]
    fn test_upcoming_sorted_ascending_by_effective_start() {
        let now = test_now();

        let mut late = base_booking("late", BookingStatus::Scheduled);
        late.scheduled_start = Some(now + Duration::hours(5));

        let mut soon = base_booking("soon", BookingStatus::Scheduled);
        soon.scheduled_start = Some(now + Duration::hours(1));

        let mut mid = base_booking("mid", BookingStatus::Pending);
        mid.requested_start = Some(now + Duration::hours(3));

        let classified = classify(&[late, soon, mid], now);
        let order: Vec<&str> = classified.upcoming.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["soon", "mid", "late"]);
    }

    #[test]
    fn test_past_sorted_descending_by_effective_end() {
        let now = test_now();

        let mut oldest = base_booking("oldest", BookingStatus::Completed);
        oldest.scheduled_start = Some(now - Duration::days(7));
        oldest.scheduled_end = Some(now - Duration::days(7) + Duration::hours(1));

        let mut recent = base_booking("recent", BookingStatus::Scheduled);
        recent.scheduled_start = Some(now - Duration::hours(3));
        recent.scheduled_end = Some(now - Duration::hours(2));

        let mut yesterday = base_booking("yesterday", BookingStatus::Completed);
        yesterday.scheduled_start = Some(now - Duration::days(1));
        yesterday.scheduled_end = Some(now - Duration::days(1) + Duration::hours(1));

        let classified = classify(&[oldest, recent, yesterday], now);
        let order: Vec<&str> = classified.past.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(order, vec!["recent", "yesterday", "oldest"]);
    }

    #[test]
    fn test_mixed_scenario_partitions_and_orders() {
        // A: pending, requested to start in an hour -> upcoming
        // B: scheduled, ended an hour ago -> past
        // C: completed but computed end still two hours out -> past, and
        //    ordered ahead of B by its later raw end time
        let now = test_now();

        let mut a = base_booking("A", BookingStatus::Pending);
        a.requested_start = Some(now + Duration::hours(1));

        let mut b = base_booking("B", BookingStatus::Scheduled);
        b.scheduled_start = Some(now - Duration::hours(2));
        b.scheduled_end = Some(now - Duration::hours(1));

        let mut c = base_booking("C", BookingStatus::Completed);
        c.scheduled_start = Some(now + Duration::hours(1));
        c.scheduled_end = Some(now + Duration::hours(2));

        let classified = classify(&[a, b, c], now);

        let upcoming: Vec<&str> = classified.upcoming.iter().map(|b| b.id.as_str()).collect();
        let past: Vec<&str> = classified.past.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(upcoming, vec!["A"]);
        assert_eq!(past, vec!["C", "B"]);
    }

    #[test]
    fn test_classification_is_deterministic() {
        let now = test_now();

        let mut one = base_booking("one", BookingStatus::Scheduled);
        one.scheduled_start = Some(now + Duration::hours(1));

        let mut two = base_booking("two", BookingStatus::Completed);
        two.scheduled_start = Some(now - Duration::hours(2));
        two.scheduled_end = Some(now - Duration::hours(1));

        let bookings = vec![one, two];

        let first = classify(&bookings, now);
        let second = classify(&bookings, now);

        let ids = |bookings: &[Booking]| -> Vec<String> {
            bookings.iter().map(|b| b.id.clone()).collect()
        };
        assert_eq!(ids(&first.upcoming), ids(&second.upcoming));
        assert_eq!(ids(&first.past), ids(&second.past));
    }
}
