use chrono::{DateTime, Utc};
use std::cmp::Reverse;
use tracing::debug;

use crate::models::booking::{Booking, BookingStatus, EffectiveWindow};

// Result of partitioning a student's bookings at a reference instant
#[derive(Debug, Clone, Default)]
pub struct ClassifiedBookings {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
}

// Derivation stage: pair each booking with its resolved window, dropping
// the ones that have no start anchor. Dropped bookings are a data-quality
// concern, not an error - they simply never show up in either partition.
fn resolve_windows(bookings: &[Booking]) -> Vec<(Booking, EffectiveWindow)> {
    let mut resolved = Vec::with_capacity(bookings.len());

    for booking in bookings {
        match EffectiveWindow::resolve(booking) {
            Some(window) => resolved.push((booking.clone(), window)),
            None => {
                debug!(
                    "Booking {} has no start anchor, excluding from classification",
                    booking.id
                );
            }
        }
    }

    resolved
}

/// Partition bookings into upcoming and past buckets relative to `now`.
///
/// Upcoming holds bookings whose effective window has not yet closed,
/// soonest first. Cancelled and declined bookings are withheld from
/// upcoming, but only join past once their window has actually elapsed.
/// A completed booking is past regardless of its window - once a terminal
/// status says the session happened, status wins over the clock.
///
/// Past is ordered most recent first by effective end. A completed booking
/// whose computed end is still in the future keeps that raw end time for
/// ordering, so it sorts ahead of naturally elapsed entries.
///
/// Pure and deterministic for a given `(bookings, now)`; cheap enough to
/// call on every poll tick.
pub fn classify(bookings: &[Booking], now: DateTime<Utc>) -> ClassifiedBookings {
    let mut upcoming: Vec<(Booking, EffectiveWindow)> = Vec::new();
    let mut past: Vec<(Booking, EffectiveWindow)> = Vec::new();

    for (booking, window) in resolve_windows(bookings) {
        match booking.status {
            // Completion is authoritative over the computed window
            BookingStatus::Completed => past.push((booking, window)),
            BookingStatus::Cancelled | BookingStatus::Declined => {
                if window.end <= now {
                    past.push((booking, window));
                } else {
                    // Not yet elapsed: cancellation alone does not make a
                    // booking retroactively past, and it must not look live
                    debug!(
                        "Booking {} is {:?} with an open window, excluding from both buckets",
                        booking.id, booking.status
                    );
                }
            }
            BookingStatus::Pending | BookingStatus::Scheduled => {
                if window.end > now {
                    upcoming.push((booking, window));
                } else {
                    past.push((booking, window));
                }
            }
        }
    }

    // Stable sorts, so equal keys keep the input order across polls
    upcoming.sort_by_key(|(_, window)| window.start);
    past.sort_by_key(|(_, window)| Reverse(window.end));

    ClassifiedBookings {
        upcoming: upcoming.into_iter().map(|(booking, _)| booking).collect(),
        past: past.into_iter().map(|(booking, _)| booking).collect(),
    }
}
