//! Session Access Service
//!
//! This library backs the session-access flows of a tutoring marketplace:
//! it classifies a student's bookings into upcoming and past buckets and
//! issues short-lived, role-scoped credentials for joining a specific
//! virtual classroom on the external conferencing backend.
//!
//! # Modules
//!
//! - `services::classifier`: pure temporal classification of bookings
//! - `auth`: credential construction and HMAC-SHA256 signing
//! - `handlers` / `routes`: the thin HTTP surface over both
//!
//! # Authentication
//!
//! Issued credentials are compact JWS tokens (HS256) signed with a shared
//! secret configured per deployment. The service itself performs no
//! authentication: callers supply an already-authenticated identity and an
//! already-decided role, and the conferencing backend verifies the token.

pub mod auth;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

// Re-export the main API types for ease of use
pub use auth::{
    Clock, ConferenceConfig, CredentialIssuer, MeetingCredential, SystemClock, TokenPolicy,
};
pub use handlers::api::AppState;
pub use models::booking::{Booking, BookingStatus, EffectiveWindow};
pub use models::identity::{features_for, FeatureSet, Identity, Role};
pub use routes::create_router;
pub use services::classifier::{classify, ClassifiedBookings};
