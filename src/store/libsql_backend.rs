//! libSQL-backed placement store, either a local file or in-memory.

use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Connection, Row, params};
use uuid::Uuid;

use crate::error::DatabaseError;
use crate::store::migrations;
use crate::store::traits::{Database, PlacementRecord};

/// The only row `placements` may hold.
const CURRENT_SLOT: i64 = 1;

pub struct LibSqlBackend {
    // An in-memory database lives only as long as this handle.
    _db: libsql::Database,
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) the database file, creating parent directories.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DatabaseError::Pool(format!("create {}: {e}", parent.display())))?;
        }
        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("open {}: {e}", path.display())))?;
        let backend = Self::attach(db).await?;
        tracing::info!(path = %path.display(), "Placement store opened");
        Ok(backend)
    }

    /// Throwaway in-memory store.
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("open in-memory database: {e}")))?;
        Self::attach(db).await
    }

    async fn attach(db: libsql::Database) -> Result<Self, DatabaseError> {
        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("connect: {e}")))?;
        let backend = Self { _db: db, conn };
        backend.run_migrations().await?;
        Ok(backend)
    }
}

fn decode_record(row: &Row) -> Result<PlacementRecord, DatabaseError> {
    let column = |e: libsql::Error| DatabaseError::Query(format!("load_placement: {e}"));
    let id: String = row.get(0).map_err(column)?;
    let starting_tier: String = row.get(1).map_err(column)?;
    let profile: String = row.get(2).map_err(column)?;
    let confirmed_at: String = row.get(3).map_err(column)?;

    let bad = |what: &str, e: &dyn std::fmt::Display| {
        DatabaseError::Serialization(format!("stored placement has invalid {what}: {e}"))
    };
    Ok(PlacementRecord {
        id: Uuid::parse_str(&id).map_err(|e| bad("id", &e))?,
        starting_tier,
        profile: serde_json::from_str(&profile).map_err(|e| bad("profile", &e))?,
        confirmed_at: DateTime::parse_from_rfc3339(&confirmed_at)
            .map_err(|e| bad("confirmed_at", &e))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl Database for LibSqlBackend {
    async fn run_migrations(&self) -> Result<(), DatabaseError> {
        migrations::run_migrations(&self.conn).await
    }

    async fn save_placement(&self, record: &PlacementRecord) -> Result<(), DatabaseError> {
        let profile = serde_json::to_string(&record.profile)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;
        self.conn
            .execute(
                "INSERT INTO placements (slot, id, starting_tier, profile, confirmed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (slot) DO UPDATE SET
                     id = excluded.id,
                     starting_tier = excluded.starting_tier,
                     profile = excluded.profile,
                     confirmed_at = excluded.confirmed_at",
                params![
                    CURRENT_SLOT,
                    record.id.to_string(),
                    record.starting_tier.clone(),
                    profile,
                    record.confirmed_at.to_rfc3339()
                ],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("save_placement: {e}")))?;
        tracing::debug!(record_id = %record.id, "Placement row written");
        Ok(())
    }

    async fn load_placement(&self) -> Result<Option<PlacementRecord>, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, starting_tier, profile, confirmed_at FROM placements WHERE slot = ?1",
                params![CURRENT_SLOT],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("load_placement: {e}")))?;
        let row = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("load_placement: {e}")))?;
        row.as_ref().map(decode_record).transpose()
    }
}
