use base64::engine::{general_purpose, Engine};
use chrono::{DateTime, Duration, Utc};
use dotenv::dotenv;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::env;
use thiserror::Error;
use tracing::debug;

use crate::models::identity::{features_for, FeatureSet, Identity, Role};

// Type alias for HMAC-SHA256
type HmacSha256 = Hmac<Sha256>;

/// Default credential validity.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;
/// Default backdating of `nbf`, absorbing clock drift between this service
/// and the conferencing backend's verifier.
pub const DEFAULT_NOT_BEFORE_SKEW_SECONDS: i64 = 10;

/// Time source for credential issuance. Injected so tests can pin the
/// instant a token is minted at.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock reading system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

// Validity policy for issued credentials. Deployment-tunable through the
// environment, see main.rs.
#[derive(Debug, Clone, Copy)]
pub struct TokenPolicy {
    pub ttl: Duration,
    pub not_before_skew: Duration,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            not_before_skew: Duration::seconds(DEFAULT_NOT_BEFORE_SKEW_SECONDS),
        }
    }
}

/// Conferencing backend configuration, supplied through the environment.
/// The signing secret and application identifier are deployment values and
/// never live in code.
#[derive(Debug, Clone)]
pub struct ConferenceConfig {
    pub app_id: String,
    pub secret: String,
    pub domain: String,
    pub audience: String,
}

impl ConferenceConfig {
    /// Load the conferencing configuration from environment variables.
    /// The three required values panic when absent so a misconfigured
    /// process refuses to start instead of issuing unusable credentials.
    pub fn from_env() -> Self {
        dotenv().ok();

        Self {
            app_id: env::var("CONFERENCE_APP_ID")
                .expect("CONFERENCE_APP_ID must be set in environment"),
            secret: env::var("CONFERENCE_SECRET")
                .expect("CONFERENCE_SECRET must be set in environment"),
            domain: env::var("CONFERENCE_DOMAIN")
                .expect("CONFERENCE_DOMAIN must be set in environment"),
            audience: env::var("CONFERENCE_AUDIENCE")
                .unwrap_or_else(|_| "conference".to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("conference signing secret is missing or empty")]
    MissingSecret,
    #[error("conference application identifier is missing or empty")]
    MissingAppId,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IssueError {
    #[error("subject identity has an empty id")]
    InvalidSubject,
    #[error("room identifier is empty")]
    InvalidRoom,
    #[error("failed to sign credential: {0}")]
    Signing(String),
}

// Claim layout is a wire contract with the conferencing backend: renaming
// or re-nesting any of these fields breaks verification on their side and
// needs an explicitly versioned rollout.
#[derive(Debug, Serialize, Deserialize)]
struct UserClaims {
    id: String,
    name: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    avatar: Option<String>,
    moderator: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContextClaims {
    user: UserClaims,
    features: FeatureSet,
}

#[derive(Debug, Serialize, Deserialize)]
struct CredentialClaims {
    iss: String,
    aud: String,
    sub: String,
    context: ContextClaims,
    iat: i64,
    nbf: i64,
    exp: i64,
}

#[derive(Debug, Serialize)]
struct JoseHeader {
    alg: &'static str,
    typ: &'static str,
}

/// A freshly minted room credential. Never persisted - the caller hands the
/// token to the client, which presents it once to the conferencing backend;
/// after that it simply expires. There is no revocation path.
#[derive(Debug, Clone, Serialize)]
pub struct MeetingCredential {
    pub token: String,
    pub room: String,
    pub role: Role,
    pub issued_at: DateTime<Utc>,
    pub not_before: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Issues signed, time-bounded room credentials for the conferencing
/// backend. Stateless: every call signs a fresh token, nothing is cached
/// or shared between calls, and concurrent use needs no coordination.
pub struct CredentialIssuer {
    config: ConferenceConfig,
    policy: TokenPolicy,
}

impl CredentialIssuer {
    /// Build an issuer from configuration. An empty secret or app id is a
    /// deployment error and is rejected here, at startup, rather than on
    /// the first join attempt.
    pub fn new(config: ConferenceConfig) -> Result<Self, ConfigError> {
        if config.secret.trim().is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if config.app_id.trim().is_empty() {
            return Err(ConfigError::MissingAppId);
        }

        Ok(Self {
            config,
            policy: TokenPolicy::default(),
        })
    }

    pub fn with_policy(mut self, policy: TokenPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn domain(&self) -> &str {
        &self.config.domain
    }

    /// Issue a credential admitting `subject` into `room` with `role`.
    ///
    /// The moderator flag and the feature grants are derived from `role`
    /// alone - never from the subject - and the role decision itself is the
    /// caller's: this is credential construction, not an authorization
    /// check. Inputs are validated before signing so an empty id or room
    /// can never end up as an empty claim inside a valid signature.
    pub fn issue(
        &self,
        subject: &Identity,
        room: &str,
        role: Role,
        clock: &dyn Clock,
    ) -> Result<MeetingCredential, IssueError> {
        if subject.id.trim().is_empty() {
            return Err(IssueError::InvalidSubject);
        }
        if room.trim().is_empty() {
            return Err(IssueError::InvalidRoom);
        }

        let issued_at = clock.now();
        let not_before = issued_at - self.policy.not_before_skew;
        let expires_at = issued_at + self.policy.ttl;

        let claims = CredentialClaims {
            iss: self.config.app_id.clone(),
            aud: self.config.audience.clone(),
            sub: room.to_string(),
            context: ContextClaims {
                user: UserClaims {
                    id: subject.id.clone(),
                    name: subject.name.clone(),
                    email: subject.email.clone(),
                    avatar: subject.avatar.clone(),
                    moderator: role.is_moderator(),
                },
                features: features_for(role),
            },
            iat: issued_at.timestamp(),
            nbf: not_before.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = self.sign(&claims)?;

        debug!(
            "Issued {:?} credential for room {} expiring at {}",
            role, room, expires_at
        );

        Ok(MeetingCredential {
            token,
            room: room.to_string(),
            role,
            issued_at,
            not_before,
            expires_at,
        })
    }

    // Compact JWS serialization: base64url(header).base64url(claims),
    // signed with HMAC-SHA256 over the shared secret
    fn sign(&self, claims: &CredentialClaims) -> Result<String, IssueError> {
        let header = JoseHeader {
            alg: "HS256",
            typ: "JWT",
        };

        let header_json =
            serde_json::to_vec(&header).map_err(|e| IssueError::Signing(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(claims).map_err(|e| IssueError::Signing(e.to_string()))?;

        let signing_input = format!(
            "{}.{}",
            general_purpose::URL_SAFE_NO_PAD.encode(header_json),
            general_purpose::URL_SAFE_NO_PAD.encode(claims_json)
        );

        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|e| IssueError::Signing(e.to_string()))?;
        mac.update(signing_input.as_bytes());
        let signature = general_purpose::URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }
}
