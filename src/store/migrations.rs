//! Schema versioning for the placement store.
//!
//! The applied version lives in SQLite's `user_version` pragma. Each step
//! runs inside one transaction together with the pragma bump, so a crash
//! mid-migration leaves the previous version intact.

use libsql::Connection;

use crate::error::DatabaseError;

/// Ordered schema steps. `SCHEMA[i]` upgrades version `i` to `i + 1`.
const SCHEMA: &[(&str, &str)] = &[(
    "placements",
    "CREATE TABLE IF NOT EXISTS placements (
        slot INTEGER PRIMARY KEY CHECK (slot = 1),
        id TEXT NOT NULL,
        starting_tier TEXT NOT NULL,
        profile TEXT NOT NULL,
        confirmed_at TEXT NOT NULL
    );",
)];

/// Newest schema version this build knows about.
pub fn latest_version() -> i64 {
    SCHEMA.len() as i64
}

/// Apply every step above the database's current version.
pub async fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    let current = schema_version(conn).await?;
    if current > latest_version() {
        return Err(DatabaseError::Migration(format!(
            "database is at V{current}, newer than this build (V{})",
            latest_version()
        )));
    }

    for (index, (name, sql)) in SCHEMA.iter().enumerate().skip(current as usize) {
        let version = index as i64 + 1;
        tracing::info!(version, name, "Applying schema step");
        let batch = format!("BEGIN;\n{sql}\nPRAGMA user_version = {version};\nCOMMIT;");
        if let Err(e) = conn.execute_batch(&batch).await {
            // Best effort: the transaction may never have opened.
            let _ = conn.execute("ROLLBACK", ()).await;
            return Err(DatabaseError::Migration(format!("V{version} ({name}): {e}")));
        }
    }

    let version = schema_version(conn).await?;
    tracing::debug!(version, "Schema up to date");
    Ok(())
}

/// Read `PRAGMA user_version`.
pub async fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("PRAGMA user_version", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("read user_version: {e}")))?;
    let row = rows
        .next()
        .await
        .map_err(|e| DatabaseError::Migration(format!("read user_version: {e}")))?
        .ok_or_else(|| DatabaseError::Migration("user_version returned no row".into()))?;
    row.get::<i64>(0)
        .map_err(|e| DatabaseError::Migration(format!("decode user_version: {e}")))
}
