//! Versioned schema migrations for the transcript database.

use rusqlite::Connection;

use callsight_core::StoreError;

/// A single schema migration.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub up: &'static str,
}

/// Applies pending migrations in version order, tracking progress in a
/// `schema_migrations` table. Each migration runs inside a transaction.
pub struct MigrationEngine {
    migrations: Vec<Migration>,
}

impl MigrationEngine {
    pub fn new() -> Self {
        Self {
            migrations: Self::default_migrations(),
        }
    }

    fn default_migrations() -> Vec<Migration> {
        vec![Migration {
            version: 1,
            description: "create transcript and analysis tables",
            up: r#"
                CREATE TABLE IF NOT EXISTS call_transcripts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    customer_id TEXT NOT NULL,
                    customer_name TEXT NOT NULL,
                    transcript TEXT NOT NULL,
                    call_date TEXT NOT NULL,
                    duration_seconds INTEGER NOT NULL,
                    phone_number TEXT NOT NULL
                );

                CREATE TABLE IF NOT EXISTS analysis_results (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    transcript_id INTEGER NOT NULL,
                    customer_id TEXT NOT NULL,
                    intent TEXT NOT NULL,
                    sentiment TEXT NOT NULL,
                    confidence_score REAL NOT NULL,
                    analysis_date TEXT NOT NULL,
                    raw_analysis TEXT NOT NULL,
                    FOREIGN KEY (transcript_id) REFERENCES call_transcripts(id)
                );

                CREATE INDEX IF NOT EXISTS idx_transcripts_customer
                    ON call_transcripts(customer_id);
                CREATE INDEX IF NOT EXISTS idx_analysis_customer
                    ON analysis_results(customer_id);
                CREATE INDEX IF NOT EXISTS idx_analysis_transcript
                    ON analysis_results(transcript_id);
            "#,
        }]
    }

    /// Latest schema version defined by this engine.
    pub fn latest_version(&self) -> u32 {
        self.migrations.iter().map(|m| m.version).max().unwrap_or(0)
    }

    /// Apply all migrations newer than the database's current version.
    pub fn migrate(&self, conn: &Connection) -> Result<(), StoreError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                description TEXT NOT NULL,
                applied_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )
        .map_err(|e| StoreError::MigrationFailed {
            version: 0,
            reason: format!("failed to create migrations table: {e}"),
        })?;

        let current_version: u32 = conn
            .query_row(
                "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
                [],
                |row| row.get(0),
            )
            .unwrap_or(0);

        for migration in &self.migrations {
            if migration.version > current_version {
                self.apply(conn, migration)?;
            }
        }

        Ok(())
    }

    fn apply(&self, conn: &Connection, migration: &Migration) -> Result<(), StoreError> {
        let failed = |reason: String| StoreError::MigrationFailed {
            version: migration.version,
            reason,
        };

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| failed(format!("failed to start transaction: {e}")))?;

        tx.execute_batch(migration.up)
            .map_err(|e| failed(e.to_string()))?;

        tx.execute(
            "INSERT INTO schema_migrations (version, description) VALUES (?1, ?2)",
            rusqlite::params![migration.version, migration.description],
        )
        .map_err(|e| failed(format!("failed to record migration: {e}")))?;

        tx.commit()
            .map_err(|e| failed(format!("failed to commit: {e}")))?;

        tracing::info!(
            version = migration.version,
            description = migration.description,
            "Applied schema migration"
        );

        Ok(())
    }
}

impl Default for MigrationEngine {
    fn default() -> Self {
        Self::new()
    }
}
