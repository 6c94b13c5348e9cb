use axum::{
    extract::{Json as ExtractJson, State},
    http::StatusCode,
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::{Clock, CredentialIssuer, IssueError, MeetingCredential};
use crate::models::booking::Booking;
use crate::models::identity::{Identity, Role};
use crate::services::classifier::classify;

// AppState struct containing shared resources
pub struct AppState {
    pub issuer: CredentialIssuer,
    pub clock: Arc<dyn Clock + Send + Sync>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub bookings: Vec<Booking>,
    // Reference instant for classification; defaults to the server clock.
    // Callers may pin it for deterministic rendering.
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyResponse {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct JoinRequest {
    pub subject: Identity,
    // Room identifier from the resolved booking. Absent while no classroom
    // has been provisioned for the booking yet.
    #[serde(default)]
    pub room: Option<String>,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub domain: String,
    #[serde(flatten)]
    pub credential: MeetingCredential,
}

// Error body returned alongside non-2xx statuses, so the front-end can
// tell "cannot authorize" apart from "no credential available yet"
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

// Classify bookings into upcoming/past buckets endpoint
pub async fn classify_bookings(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<ClassifyRequest>,
) -> Json<ClassifyResponse> {
    let now = request.now.unwrap_or_else(|| state.clock.now());

    info!(
        "Received request to classify {} bookings at {}",
        request.bookings.len(),
        now
    );

    let classified = classify(&request.bookings, now);

    info!(
        "Classified {} upcoming and {} past bookings",
        classified.upcoming.len(),
        classified.past.len()
    );

    Json(ClassifyResponse {
        upcoming: classified.upcoming,
        past: classified.past,
    })
}

// Issue a room credential for a join attempt endpoint
pub async fn join_meeting(
    State(state): State<Arc<AppState>>,
    ExtractJson(request): ExtractJson<JoinRequest>,
) -> Result<Json<JoinResponse>, (StatusCode, Json<ErrorBody>)> {
    let room = match request.room {
        Some(room) => room,
        None => {
            info!(
                "Join attempt by {} before a classroom was provisioned",
                request.subject.id
            );
            return Err((
                StatusCode::CONFLICT,
                Json(ErrorBody {
                    error: "room_not_ready",
                    message: "No classroom has been provisioned for this booking yet".to_string(),
                }),
            ));
        }
    };

    info!(
        "Received join request for room {} with role {:?}",
        room, request.role
    );

    match state
        .issuer
        .issue(&request.subject, &room, request.role, state.clock.as_ref())
    {
        Ok(credential) => {
            info!(
                "Issued credential for room {} expiring at {}",
                credential.room, credential.expires_at
            );
            Ok(Json(JoinResponse {
                domain: state.issuer.domain().to_string(),
                credential,
            }))
        }
        Err(err @ (IssueError::InvalidSubject | IssueError::InvalidRoom)) => {
            warn!("Rejected join request: {}", err);
            Err((
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: "invalid_request",
                    message: err.to_string(),
                }),
            ))
        }
        Err(err) => {
            error!("Failed to sign credential: {}", err);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "signing_failure",
                    message: err.to_string(),
                }),
            ))
        }
    }
}
