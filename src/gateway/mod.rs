//! Placement gateway — the remote call that turns intake data into a
//! starting tier.
//!
//! Supports:
//! - **HTTP**: `POST {base}/createCareer` against a running placement service
//! - **Local**: the same scoring rules evaluated in-process
//!
//! Both sit behind the `SubmissionGateway` trait so the form controller never
//! knows which one it is talking to.

pub mod http;
pub mod local;
pub mod routes;

pub use http::HttpGateway;
pub use local::{LocalGateway, StartingTier, weighted_tier};
pub use routes::{PlacementRouteState, placement_routes};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::OnboardingConfig;
use crate::error::GatewayError;
use crate::intake::model::{Division, ExperienceTier, RankTier};

/// Division value sent when the rank has no divisions.
pub const NO_DIVISION: &str = "N/A";

/// Body of a placement request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareerRequest {
    pub age: u32,
    pub current_rank: String,
    pub past_experience: String,
    pub division: String,
}

impl CareerRequest {
    pub fn new(
        age: u32,
        rank: RankTier,
        past_experience: ExperienceTier,
        division: Option<Division>,
    ) -> Self {
        let division = match division {
            Some(division) if rank.has_divisions() => division.as_str().to_string(),
            _ => NO_DIVISION.to_string(),
        };
        Self {
            age,
            current_rank: rank.as_str().to_string(),
            past_experience: past_experience.as_str().to_string(),
            division,
        }
    }
}

/// Successful placement response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResponse {
    pub starting_tier: String,
    #[serde(default)]
    pub career_info: serde_json::Value,
}

/// What the form keeps after a successful submission and what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// Display label, e.g. "Tier 2 (College / Challengers)".
    pub starting_tier: String,
    /// Opaque profile payload returned by the gateway.
    pub profile: serde_json::Value,
}

impl From<PlacementResponse> for PlacementResult {
    fn from(response: PlacementResponse) -> Self {
        Self {
            starting_tier: response.starting_tier,
            profile: response.career_info,
        }
    }
}

/// The placement service as seen by the intake form.
#[async_trait]
pub trait SubmissionGateway: Send + Sync {
    /// Short name for logs and errors.
    fn name(&self) -> &str;

    async fn create_career(
        &self,
        request: &CareerRequest,
    ) -> Result<PlacementResponse, GatewayError>;
}

/// Pick the gateway described by configuration.
pub fn create_gateway(config: &OnboardingConfig) -> Result<Arc<dyn SubmissionGateway>, GatewayError> {
    match config.gateway_url.as_deref() {
        Some(url) => {
            tracing::info!(url, timeout = ?config.gateway_timeout, "Using HTTP placement gateway");
            Ok(Arc::new(HttpGateway::new(url, config.gateway_timeout)?))
        }
        None => {
            tracing::info!("Using in-process placement scorer");
            Ok(Arc::new(LocalGateway::new()))
        }
    }
}
