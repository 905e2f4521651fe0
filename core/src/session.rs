//! Session signature requests
//!
//! Every remote Lit call is authorized by session signatures requested
//! fresh for that call. The request always asks for the
//! `lit-action-execution` ability on any Lit Action resource and expires
//! ten minutes after it is built.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Lifetime of a session signature grant
pub const SESSION_TTL_MINUTES: i64 = 10;

/// Chain the session signatures are issued against
pub const SESSION_CHAIN: &str = "ethereum";

/// Expiration timestamp format expected by the Lit SDK
pub const EXPIRATION_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Opaque session signatures returned by the Lit network
pub type SessionSigs = Map<String, Value>;

/// Resource targeted by an ability request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LitResource {
    /// Resource identifier (`*` for any)
    pub resource: String,
    /// Resource namespace
    pub resource_prefix: String,
}

/// Resource/ability pair requested for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAbilityRequest {
    /// Target resource
    pub resource: LitResource,
    /// Requested ability
    pub ability: String,
}

impl ResourceAbilityRequest {
    /// Permission to execute any Lit Action
    pub fn any_lit_action() -> Self {
        Self {
            resource: LitResource {
                resource: "*".to_string(),
                resource_prefix: "lit-litaction".to_string(),
            },
            ability: "lit-action-execution".to_string(),
        }
    }
}

/// Request for a short-lived session signature grant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSigsRequest {
    /// Chain name
    pub chain: String,
    /// Expiration timestamp, UTC, second precision
    pub expiration: String,
    /// Requested resource abilities
    pub resource_ability_requests: Vec<ResourceAbilityRequest>,
}

impl SessionSigsRequest {
    /// Build a Lit Action execution request issued now
    pub fn lit_action_execution() -> Self {
        Self::lit_action_execution_at(Utc::now())
    }

    /// Build a Lit Action execution request issued at `issued_at`
    pub fn lit_action_execution_at(issued_at: DateTime<Utc>) -> Self {
        Self {
            chain: SESSION_CHAIN.to_string(),
            expiration: expiration_from(issued_at),
            resource_ability_requests: vec![ResourceAbilityRequest::any_lit_action()],
        }
    }

    /// Parse the expiration back into a timestamp
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        chrono::NaiveDateTime::parse_from_str(&self.expiration, EXPIRATION_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

fn expiration_from(issued_at: DateTime<Utc>) -> String {
    (issued_at + Duration::minutes(SESSION_TTL_MINUTES))
        .format(EXPIRATION_FORMAT)
        .to_string()
}
