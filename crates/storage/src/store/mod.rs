#![forbid(unsafe_code)]

mod error;
mod queries;
mod retention;

pub use error::StoreError;

use hop_core::ids::{canonical_branch_name, canonical_project_path};
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

const SCHEMA_VERSION: i64 = 1;
const VISIT_SEQ_COUNTER: &str = "visit_seq";

/// One row of the projects table. `path` is the canonical absolute
/// repository root and is unique across the store.
#[derive(Clone, Debug)]
pub struct ProjectRow {
    pub id: i64,
    pub path: String,
    pub basename: String,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// One tracked branch. `position` 0 is the most recently visited branch;
/// positions are gapless immediately after any mutation commits.
#[derive(Clone, Debug)]
pub struct BranchRow {
    pub id: i64,
    pub project_id: i64,
    pub name: String,
    pub position: i64,
    pub last_visited_at_ms: i64,
    pub visit_seq: i64,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ProjectStats {
    pub total_branches: i64,
    pub most_recent: Option<BranchRow>,
}

#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(Duration::from_secs(5))?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;\n\
             PRAGMA journal_mode = WAL;\n\
             PRAGMA synchronous = NORMAL;",
        )?;

        preflight_gate(&conn)?;
        install_schema(&conn)?;
        tracing::debug!(db_path = %db_path.display(), "store opened");

        Ok(Self { conn, db_path })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Returns the existing project for `path` or inserts a new row. A
    /// concurrent insert of the same path loses the race silently and the
    /// surviving row is returned.
    pub fn find_or_create_project(
        &mut self,
        path: &str,
        basename: &str,
    ) -> Result<ProjectRow, StoreError> {
        let path = canonical_project_path(path)
            .map_err(|_| StoreError::InvalidInput("project path must be absolute"))?;
        if basename.trim().is_empty() {
            return Err(StoreError::InvalidInput("project basename must not be empty"));
        }

        let now_ms = now_ms();
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT OR IGNORE INTO projects(path, basename, created_at_ms, updated_at_ms) \
             VALUES (?1, ?2, ?3, ?3)",
            params![path, basename, now_ms],
        )?;
        let row = project_by_path_tx(&tx, &path)?
            .ok_or(StoreError::Corrupt("project row vanished after insert"))?;
        tx.commit()?;
        Ok(row)
    }

    /// Records a visit to `name`: inserts the branch at position 0 or, if
    /// already tracked, bumps its timestamp in place. The re-rank of every
    /// branch in the project commits in the same transaction, so readers
    /// never observe a stale position.
    pub fn record_visit(
        &mut self,
        project_id: i64,
        name: &str,
        visited_at_ms: i64,
    ) -> Result<BranchRow, StoreError> {
        let name = canonical_branch_name(name)
            .map_err(|_| StoreError::InvalidInput("invalid branch name"))?;

        let tx = self.conn.transaction()?;
        ensure_project_tx(&tx, project_id)?;

        let visit_seq = next_visit_seq_tx(&tx)?;
        tx.execute(
            "INSERT INTO branches(project_id, name, position, last_visited_at_ms, visit_seq, created_at_ms) \
             VALUES (?1, ?2, 0, ?3, ?4, ?3) \
             ON CONFLICT(project_id, name) DO UPDATE SET \
               last_visited_at_ms = excluded.last_visited_at_ms, \
               visit_seq = excluded.visit_seq, \
               position = 0",
            params![project_id, name, visited_at_ms, visit_seq],
        )?;

        reorder_branches_tx(&tx, project_id)?;
        let row = branch_by_name_tx(&tx, project_id, &name)?
            .ok_or(StoreError::Corrupt("branch row vanished after upsert"))?;
        tx.commit()?;
        Ok(row)
    }

    /// Deletes one branch by id. Returns false when no such row exists.
    pub fn delete_branch(&mut self, branch_id: i64) -> Result<bool, StoreError> {
        let tx = self.conn.transaction()?;
        let project_id = tx
            .query_row(
                "SELECT project_id FROM branches WHERE id = ?1",
                params![branch_id],
                |row| row.get::<_, i64>(0),
            )
            .optional()?;

        let Some(project_id) = project_id else {
            return Ok(false);
        };

        tx.execute("DELETE FROM branches WHERE id = ?1", params![branch_id])?;
        reorder_branches_tx(&tx, project_id)?;
        tx.commit()?;
        Ok(true)
    }

    /// Branches of a project ordered most recent first.
    pub fn list_branches(
        &self,
        project_id: i64,
        limit: Option<usize>,
    ) -> Result<Vec<BranchRow>, StoreError> {
        let limit = match limit {
            Some(limit) => i64::try_from(limit)
                .map_err(|_| StoreError::InvalidInput("limit overflows sqlite integer"))?,
            None => -1,
        };

        let mut stmt = self.conn.prepare(
            "SELECT id, project_id, name, position, last_visited_at_ms, visit_seq, created_at_ms \
             FROM branches \
             WHERE project_id = ?1 \
             ORDER BY position ASC, last_visited_at_ms DESC \
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![project_id, limit], branch_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count_branches(&self, project_id: i64) -> Result<i64, StoreError> {
        Ok(self.conn.query_row(
            "SELECT COUNT(*) FROM branches WHERE project_id = ?1",
            params![project_id],
            |row| row.get(0),
        )?)
    }
}

fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let required: BTreeSet<&str> = ["store_state", "counters", "projects", "branches"]
        .into_iter()
        .collect();

    if tables.iter().any(|table| !required.contains(table.as_str())) {
        return Err(StoreError::Corrupt("unsupported tables detected"));
    }
    for table in required {
        if !tables.contains(table) {
            return Err(StoreError::Corrupt("required table is missing"));
        }
    }

    let version = conn
        .query_row(
            "SELECT schema_version FROM store_state WHERE singleton = 1",
            [],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;

    match version {
        Some(v) if v == SCHEMA_VERSION => Ok(()),
        Some(_) => Err(StoreError::Corrupt("schema version mismatch")),
        None => Err(StoreError::Corrupt("schema state row is missing")),
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    let now_ms = now_ms();

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS store_state (
          singleton INTEGER PRIMARY KEY CHECK(singleton = 1),
          schema_version INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS counters (
          name TEXT PRIMARY KEY,
          value INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          path TEXT NOT NULL UNIQUE,
          basename TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS branches (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          project_id INTEGER NOT NULL,
          name TEXT NOT NULL,
          position INTEGER NOT NULL DEFAULT 0,
          last_visited_at_ms INTEGER NOT NULL,
          visit_seq INTEGER NOT NULL,
          created_at_ms INTEGER NOT NULL,
          FOREIGN KEY(project_id) REFERENCES projects(id) ON DELETE CASCADE,
          UNIQUE(project_id, name)
        );

        CREATE INDEX IF NOT EXISTS idx_branches_project_position
          ON branches(project_id, position);
        "#,
    )?;

    conn.execute(
        "INSERT INTO store_state(singleton, schema_version, created_at_ms, updated_at_ms) \
         VALUES (1, ?1, ?2, ?2) \
         ON CONFLICT(singleton) DO UPDATE SET updated_at_ms = excluded.updated_at_ms",
        params![SCHEMA_VERSION, now_ms],
    )?;

    Ok(())
}

/// Full O(n) re-rank: positions follow descending visit recency, ties broken
/// by the per-visit sequence counter. Runs as the final step of every
/// mutating transaction so readers never see gaps or duplicate positions.
fn reorder_branches_tx(tx: &Transaction<'_>, project_id: i64) -> Result<(), StoreError> {
    let mut stmt = tx.prepare(
        "SELECT id FROM branches \
         WHERE project_id = ?1 \
         ORDER BY last_visited_at_ms DESC, visit_seq DESC",
    )?;
    let ids = stmt
        .query_map(params![project_id], |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    drop(stmt);

    let mut update = tx.prepare("UPDATE branches SET position = ?1 WHERE id = ?2")?;
    for (position, id) in ids.iter().enumerate() {
        update.execute(params![position as i64, id])?;
    }
    Ok(())
}

fn ensure_project_tx(tx: &Transaction<'_>, project_id: i64) -> Result<(), StoreError> {
    let exists = tx
        .query_row(
            "SELECT 1 FROM projects WHERE id = ?1",
            params![project_id],
            |row| row.get::<_, i64>(0),
        )
        .optional()?
        .is_some();

    if exists { Ok(()) } else { Err(StoreError::UnknownProject) }
}

/// Store-wide monotonic visit counter. Disambiguates visits that land on
/// the same clock millisecond.
fn next_visit_seq_tx(tx: &Transaction<'_>) -> Result<i64, StoreError> {
    let current: i64 = tx
        .query_row(
            "SELECT value FROM counters WHERE name = ?1",
            params![VISIT_SEQ_COUNTER],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0);
    let next = current + 1;
    tx.execute(
        "INSERT INTO counters(name, value) VALUES (?1, ?2) \
         ON CONFLICT(name) DO UPDATE SET value = excluded.value",
        params![VISIT_SEQ_COUNTER, next],
    )?;
    Ok(next)
}

fn project_by_path_tx(tx: &Transaction<'_>, path: &str) -> Result<Option<ProjectRow>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id, path, basename, created_at_ms, updated_at_ms \
             FROM projects WHERE path = ?1",
            params![path],
            |row| {
                Ok(ProjectRow {
                    id: row.get(0)?,
                    path: row.get(1)?,
                    basename: row.get(2)?,
                    created_at_ms: row.get(3)?,
                    updated_at_ms: row.get(4)?,
                })
            },
        )
        .optional()?)
}

fn branch_by_name_tx(
    tx: &Transaction<'_>,
    project_id: i64,
    name: &str,
) -> Result<Option<BranchRow>, StoreError> {
    Ok(tx
        .query_row(
            "SELECT id, project_id, name, position, last_visited_at_ms, visit_seq, created_at_ms \
             FROM branches WHERE project_id = ?1 AND name = ?2",
            params![project_id, name],
            branch_from_row,
        )
        .optional()?)
}

fn branch_from_row(row: &rusqlite::Row<'_>) -> Result<BranchRow, rusqlite::Error> {
    Ok(BranchRow {
        id: row.get(0)?,
        project_id: row.get(1)?,
        name: row.get(2)?,
        position: row.get(3)?,
        last_visited_at_ms: row.get(4)?,
        visit_seq: row.get(5)?,
        created_at_ms: row.get(6)?,
    })
}

fn now_ms() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    let now = match SystemTime::now().duration_since(UNIX_EPOCH) {
        Ok(duration) => duration,
        Err(_) => return 0,
    };

    i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
}
