//! In-process placement scoring.
//!
//! Rank contributes a base score, prior experience counts in full only for
//! players already at Ascendant or above, and young players in the middle
//! band are routed to the college/Premier circuit instead of ranked play.

use std::ops::RangeInclusive;

use async_trait::async_trait;
use serde::Serialize;

use super::{CareerRequest, PlacementResponse, SubmissionGateway};
use crate::error::GatewayError;

/// Ages eligible for the college / Premier path.
const COLLEGE_AGE: RangeInclusive<u32> = 17..=24;

/// Rank score at which prior experience counts in full.
const EXPERIENCE_FULL_CREDIT: f32 = 2.0;

/// Where a new career starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StartingTier {
    RankedPlay,
    Tier3,
    Tier2,
    Tier1,
}

impl StartingTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RankedPlay => "Ranked Play",
            Self::Tier3 => "Tier 3 (College / Premier)",
            Self::Tier2 => "Tier 2 (College / Challengers)",
            Self::Tier1 => "Tier 1 (VCT)",
        }
    }
}

impl std::fmt::Display for StartingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn rank_score(rank: &str) -> f32 {
    match rank.trim().to_ascii_lowercase().as_str() {
        "radiant" => 5.0,
        "immortal" => 4.0,
        "ascendant" => 2.0,
        "diamond" => 1.0,
        "platinum" => 0.5,
        _ => 0.0,
    }
}

fn experience_score(experience: &str) -> f32 {
    match experience.trim() {
        "Tier 1" => 4.0,
        "Tier 2" => 3.0,
        "Tier 3" => 2.0,
        _ => 0.0,
    }
}

/// Score a request and pick the starting tier.
pub fn weighted_tier(request: &CareerRequest) -> StartingTier {
    let rank = rank_score(&request.current_rank);
    let experience = experience_score(&request.past_experience);

    let mut score = rank;
    if rank >= EXPERIENCE_FULL_CREDIT {
        score += experience;
    } else if experience > 0.0 {
        score += 1.0;
    }

    match score {
        s if s >= 9.0 => StartingTier::Tier1,
        s if s >= 6.0 => StartingTier::Tier2,
        s if s >= 3.0 && COLLEGE_AGE.contains(&request.age) => StartingTier::Tier3,
        _ => StartingTier::RankedPlay,
    }
}

/// Build the response body the placement service returns.
pub fn placement_response(request: &CareerRequest) -> Result<PlacementResponse, serde_json::Error> {
    Ok(PlacementResponse {
        starting_tier: weighted_tier(request).as_str().to_string(),
        career_info: serde_json::to_value(request)?,
    })
}

/// Gateway that scores requests without leaving the process.
#[derive(Debug, Default)]
pub struct LocalGateway;

impl LocalGateway {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SubmissionGateway for LocalGateway {
    fn name(&self) -> &str {
        "local"
    }

    async fn create_career(
        &self,
        request: &CareerRequest,
    ) -> Result<PlacementResponse, GatewayError> {
        placement_response(request).map_err(|e| GatewayError::InvalidResponse {
            gateway: self.name().to_string(),
            reason: e.to_string(),
        })
    }
}
