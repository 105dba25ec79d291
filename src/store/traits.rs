//! `Database` trait — where a confirmed placement lives once the user accepts it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::gateway::PlacementResult;

/// The persisted form of a confirmed placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub id: Uuid,
    pub starting_tier: String,
    pub profile: serde_json::Value,
    pub confirmed_at: DateTime<Utc>,
}

impl PlacementRecord {
    /// Stamp a fresh record for a placement confirmed now.
    pub fn confirm(placement: &PlacementResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            starting_tier: placement.starting_tier.clone(),
            profile: placement.profile.clone(),
            confirmed_at: Utc::now(),
        }
    }
}

/// Client-side placement storage.
///
/// There is exactly one current placement. Saving replaces it in a single
/// statement, so a reader sees either the old record or the new one.
#[async_trait]
pub trait Database: Send + Sync {
    /// Bring the schema up to date.
    async fn run_migrations(&self) -> Result<(), DatabaseError>;

    /// Store `record` as the current placement, replacing any previous one.
    async fn save_placement(&self, record: &PlacementRecord) -> Result<(), DatabaseError>;

    /// The current placement, if one was ever confirmed.
    async fn load_placement(&self) -> Result<Option<PlacementRecord>, DatabaseError>;
}
