//! SQLite Database
//!
//! Embedded database for persistent storage using rusqlite with r2d2
//! connection pooling. One record set per canvas: ten section rows, one
//! impact-chain row, up to seven venture-profile rows. There are no
//! cross-canvas foreign keys.
//!
//! Writes are discrete, independently-validated field upserts; there is no
//! multi-field transaction. Every successful child write bumps the owning
//! canvas's `updated_at`.

use std::collections::HashMap;

use chrono::Utc;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};

use crate::models::canvas::SectionKey;
use crate::models::impact_chain::{ImpactChain, ImpactField};
use crate::models::venture::{
    DimensionAssessment, DimensionValue, VentureDimension, VentureProfile,
};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::database_path;

/// Canvas metadata row
#[derive(Debug, Clone)]
pub struct CanvasRow {
    pub id: String,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Raw section row from the database
#[derive(Debug, Clone)]
pub struct SectionRow {
    pub section: String,
    pub content: String,
    pub updated_at: String,
}

/// Type alias for the connection pool
pub type DbPool = Pool<SqliteConnectionManager>;

/// Database service for managing SQLite operations
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a database from an existing connection pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create an in-memory database for testing.
    ///
    /// Uses an in-memory SQLite database with the same schema as the
    /// production database.
    pub fn new_in_memory() -> AppResult<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;
        Ok(db)
    }

    /// Create a new database instance at the default location.
    pub fn new() -> AppResult<Self> {
        Self::new_at(database_path()?)
    }

    /// Create a new database instance at an explicit path.
    pub fn new_at(db_path: std::path::PathBuf) -> AppResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let manager = SqliteConnectionManager::file(&db_path);
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| AppError::database(format!("Failed to create connection pool: {}", e)))?;

        let db = Self { pool };
        db.init_schema()?;

        Ok(db)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> AppResult<()> {
        let conn = self.conn()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS canvases (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS canvas_sections (
                canvas_id TEXT NOT NULL,
                section TEXT NOT NULL,
                content TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (canvas_id, section)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS impact_chains (
                canvas_id TEXT PRIMARY KEY,
                issue TEXT NOT NULL DEFAULT '',
                participants TEXT NOT NULL DEFAULT '',
                activities TEXT NOT NULL DEFAULT '',
                outputs TEXT NOT NULL DEFAULT '',
                short_term_outcomes TEXT NOT NULL DEFAULT '',
                medium_term_outcomes TEXT NOT NULL DEFAULT '',
                long_term_outcomes TEXT NOT NULL DEFAULT '',
                impact TEXT NOT NULL DEFAULT '',
                updated_at TEXT NOT NULL DEFAULT ''
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS venture_profiles (
                canvas_id TEXT NOT NULL,
                dimension TEXT NOT NULL,
                value TEXT NOT NULL,
                confidence REAL NOT NULL DEFAULT 0,
                confirmed INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL DEFAULT '',
                PRIMARY KEY (canvas_id, dimension)
            )",
            [],
        )?;

        Ok(())
    }

    fn conn(&self) -> AppResult<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| AppError::database(format!("Failed to get connection: {}", e)))
    }

    /// Check if the database is reachable
    pub fn is_healthy(&self) -> bool {
        self.conn()
            .and_then(|conn| {
                conn.query_row("SELECT 1", [], |_| Ok(()))
                    .map_err(AppError::from)
            })
            .is_ok()
    }

    // ── Canvas lifecycle ─────────────────────────────────────────────

    /// Create a canvas with all sections empty and an empty impact chain.
    pub fn create_canvas(&self, id: &str, name: &str) -> AppResult<CanvasRow> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO canvases (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)",
            params![id, name, now],
        )?;

        for key in SectionKey::ALL {
            conn.execute(
                "INSERT INTO canvas_sections (canvas_id, section) VALUES (?1, ?2)",
                params![id, key.as_str()],
            )?;
        }

        conn.execute(
            "INSERT INTO impact_chains (canvas_id) VALUES (?1)",
            params![id],
        )?;

        tracing::info!(canvas_id = id, "created canvas");

        Ok(CanvasRow {
            id: id.to_string(),
            name: name.to_string(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Fetch canvas metadata.
    pub fn get_canvas(&self, id: &str) -> AppResult<Option<CanvasRow>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT id, name, created_at, updated_at FROM canvases WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CanvasRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: row.get(2)?,
                        updated_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Whether a canvas exists.
    pub fn canvas_exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.get_canvas(id)?.is_some())
    }

    /// List all canvases, newest first.
    pub fn list_canvases(&self) -> AppResult<Vec<CanvasRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, created_at, updated_at FROM canvases ORDER BY updated_at DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CanvasRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    updated_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Bump a canvas's updated_at to now, returning the new timestamp.
    fn touch_canvas(&self, id: &str) -> AppResult<String> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "UPDATE canvases SET updated_at = ?1 WHERE id = ?2",
            params![now, id],
        )?;
        Ok(now)
    }

    // ── Section store ────────────────────────────────────────────────

    /// Read one section row.
    pub fn get_section(&self, canvas_id: &str, key: SectionKey) -> AppResult<Option<SectionRow>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT section, content, updated_at FROM canvas_sections
                 WHERE canvas_id = ?1 AND section = ?2",
                params![canvas_id, key.as_str()],
                |row| {
                    Ok(SectionRow {
                        section: row.get(0)?,
                        content: row.get(1)?,
                        updated_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Read all section rows for a canvas, keyed by section identifier.
    pub fn get_sections(&self, canvas_id: &str) -> AppResult<HashMap<String, SectionRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT section, content, updated_at FROM canvas_sections WHERE canvas_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![canvas_id], |row| {
                Ok(SectionRow {
                    section: row.get(0)?,
                    content: row.get(1)?,
                    updated_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows.into_iter().map(|r| (r.section.clone(), r)).collect())
    }

    /// Upsert one section's content with a fresh timestamp.
    pub fn upsert_section(
        &self,
        canvas_id: &str,
        key: SectionKey,
        content: &str,
    ) -> AppResult<SectionRow> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO canvas_sections (canvas_id, section, content, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (canvas_id, section)
             DO UPDATE SET content = excluded.content, updated_at = excluded.updated_at",
            params![canvas_id, key.as_str(), content, now],
        )?;
        drop(conn);
        self.touch_canvas(canvas_id)?;

        tracing::debug!(canvas_id, section = key.as_str(), "section persisted");

        Ok(SectionRow {
            section: key.as_str().to_string(),
            content: content.to_string(),
            updated_at: now,
        })
    }

    // ── Impact chain store ───────────────────────────────────────────

    /// Read the impact chain for a canvas.
    pub fn get_impact_chain(&self, canvas_id: &str) -> AppResult<Option<ImpactChain>> {
        let conn = self.conn()?;
        let chain = conn
            .query_row(
                "SELECT issue, participants, activities, outputs, short_term_outcomes,
                        medium_term_outcomes, long_term_outcomes, impact, updated_at
                 FROM impact_chains WHERE canvas_id = ?1",
                params![canvas_id],
                |row| {
                    Ok(ImpactChain {
                        issue: row.get(0)?,
                        participants: row.get(1)?,
                        activities: row.get(2)?,
                        outputs: row.get(3)?,
                        short_term_outcomes: row.get(4)?,
                        medium_term_outcomes: row.get(5)?,
                        long_term_outcomes: row.get(6)?,
                        impact: row.get(7)?,
                        updated_at: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(chain)
    }

    /// Upsert one impact chain field with a fresh timestamp.
    pub fn upsert_impact_field(
        &self,
        canvas_id: &str,
        field: ImpactField,
        content: &str,
    ) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();
        let conn = self.conn()?;
        // Column name comes from the fixed ImpactField set, never from input.
        let sql = format!(
            "INSERT INTO impact_chains (canvas_id, {col}, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT (canvas_id)
             DO UPDATE SET {col} = excluded.{col}, updated_at = excluded.updated_at",
            col = field.as_str()
        );
        conn.execute(&sql, params![canvas_id, content, now])?;
        drop(conn);
        self.touch_canvas(canvas_id)?;

        tracing::debug!(canvas_id, field = field.as_str(), "impact field persisted");
        Ok(())
    }

    // ── Venture profile store ────────────────────────────────────────

    /// Read the venture profile for a canvas.
    pub fn get_venture_profile(&self, canvas_id: &str) -> AppResult<VentureProfile> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT dimension, value, confidence, confirmed, updated_at
             FROM venture_profiles WHERE canvas_id = ?1",
        )?;
        let rows = stmt
            .query_map(params![canvas_id], |row| {
                let dimension: String = row.get(0)?;
                let value_json: String = row.get(1)?;
                let confidence: f64 = row.get(2)?;
                let confirmed: bool = row.get(3)?;
                let updated_at: String = row.get(4)?;
                Ok((dimension, value_json, confidence, confirmed, updated_at))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut profile = VentureProfile::new(canvas_id);
        for (dimension, value_json, confidence, confirmed, updated_at) in rows {
            let dim = VentureDimension::parse(&dimension).ok_or_else(|| {
                AppError::database(format!("unknown venture dimension in store: {}", dimension))
            })?;
            let value: DimensionValue = serde_json::from_str(&value_json)?;
            let mut assessment = DimensionAssessment::new(value, confidence, confirmed);
            assessment.updated_at = updated_at;
            profile.dimensions.insert(dim, assessment);
        }
        Ok(profile)
    }

    /// Upsert one venture dimension assessment.
    pub fn upsert_venture_dimension(
        &self,
        canvas_id: &str,
        dimension: VentureDimension,
        assessment: &DimensionAssessment,
    ) -> AppResult<()> {
        let now = Utc::now().to_rfc3339();
        let value_json = serde_json::to_string(&assessment.value)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO venture_profiles (canvas_id, dimension, value, confidence, confirmed, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT (canvas_id, dimension)
             DO UPDATE SET value = excluded.value, confidence = excluded.confidence,
                           confirmed = excluded.confirmed, updated_at = excluded.updated_at",
            params![
                canvas_id,
                dimension.as_str(),
                value_json,
                assessment.confidence,
                assessment.confirmed,
                now
            ],
        )?;
        drop(conn);
        self.touch_canvas(canvas_id)?;
        Ok(())
    }
}
