use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Default session length applied when a booking has a start anchor but no
/// end time from either the scheduled or the requested window. Policy
/// constant - adjust here, not at call sites.
pub const DEFAULT_SESSION_MINUTES: i64 = 60;

// Booking lifecycle states as reported by the booking source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Scheduled,
    Completed,
    Cancelled,
    Declined,
}

impl BookingStatus {
    /// Terminal statuses do not change state further.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Declined
        )
    }
}

// A booking record as supplied by the booking source. Scheduled times are
// set once staffing confirms the session; until then only the requested
// window may be present. Either may be missing entirely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub scheduled_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub requested_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub requested_end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub subject_ref: Option<String>,
    #[serde(default)]
    pub tutor_ref: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

// The resolved [start, end) interval for a booking after applying the
// scheduled -> requested -> default fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EffectiveWindow {
    /// Resolve the effective window for a booking. Returns `None` when the
    /// booking has no start anchor at all, which makes it unclassifiable.
    /// A missing end falls back to start plus [`DEFAULT_SESSION_MINUTES`].
    /// Inverted or zero-length windows are passed through untouched.
    pub fn resolve(booking: &Booking) -> Option<Self> {
        let start = booking.scheduled_start.or(booking.requested_start)?;
        let end = booking
            .scheduled_end
            .or(booking.requested_end)
            .unwrap_or(start + Duration::minutes(DEFAULT_SESSION_MINUTES));

        Some(Self { start, end })
    }
}
