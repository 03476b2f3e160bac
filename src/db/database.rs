//! SQLite database operations for sqlscout
//!
//! Thin wrapper over an embedded SQLite connection. Generated SQL is executed
//! one statement at a time; statement-level rejections surface as retryable
//! execution errors while connection-level failures abort the session.

use crate::error::{Result, SqlScoutError};
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Ordered query result: column names plus rows of JSON values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Compact rendering for observations and CLI output
    pub fn render(&self) -> String {
        if self.rows.is_empty() {
            return "(no rows)".to_string();
        }

        let mut lines = vec![self.columns.join(" | ")];
        for row in &self.rows {
            let cells: Vec<String> = row
                .iter()
                .map(|v| match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect();
            lines.push(cells.join(" | "));
        }
        lines.join("\n")
    }
}

/// Database connection and operations
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open a database file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(&path).map_err(|e| {
            SqlScoutError::Infrastructure(format!(
                "failed to open database {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_connection(conn)
    }

    /// Create an in-memory database
    pub fn memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| {
            SqlScoutError::Infrastructure(format!("failed to create in-memory database: {}", e))
        })?;
        Self::from_connection(conn)
    }

    /// In-memory database populated with the demo e-commerce dataset
    pub fn demo() -> Result<Self> {
        let mut db = Self::memory()?;
        seed_demo(&mut db)?;
        Ok(db)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(std::time::Duration::from_secs(5))
            .map_err(|e| SqlScoutError::Infrastructure(format!("busy_timeout: {}", e)))?;
        Ok(Self { conn })
    }

    /// Execute one SQL statement inside its own transaction.
    ///
    /// Committed on success, rolled back on any error, so a rejected attempt
    /// cannot leak partial writes into the next attempt.
    pub fn execute_query(&mut self, sql: &str) -> Result<ResultSet> {
        let tx = self
            .conn
            .transaction()
            .map_err(|e| SqlScoutError::Infrastructure(format!("failed to begin: {}", e)))?;

        let result = run_statement(&tx, sql);

        match result {
            Ok(rows) => {
                tx.commit()
                    .map_err(|e| SqlScoutError::Infrastructure(format!("failed to commit: {}", e)))?;
                Ok(rows)
            }
            Err(e) => {
                // Drop rolls the transaction back; be explicit about it.
                if let Err(rollback) = tx.rollback() {
                    log::warn!("rollback after failed statement also failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    /// Raw connection access for schema setup and seeding
    pub fn connection(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

fn run_statement(conn: &Connection, sql: &str) -> Result<ResultSet> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    let mut rows = Vec::new();
    let mut raw = stmt.query([])?;
    while let Some(row) = raw.next()? {
        let mut values = Vec::with_capacity(columns.len());
        for i in 0..columns.len() {
            values.push(to_json(row.get_ref(i)?));
        }
        rows.push(values);
    }

    Ok(ResultSet { columns, rows })
}

fn to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::String(format!("<blob {} bytes>", b.len())),
    }
}

fn seed_demo(db: &mut Database) -> Result<()> {
    crate::db::seed::create_schema(db.connection())?;
    crate::db::seed::populate(db.connection())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_query_returns_rows() {
        let mut db = Database::memory().unwrap();
        db.connection()
            .execute_batch("CREATE TABLE t (a INTEGER, b TEXT); INSERT INTO t VALUES (1, 'x');")
            .unwrap();

        let result = db.execute_query("SELECT a, b FROM t").unwrap();
        assert_eq!(result.columns, vec!["a", "b"]);
        assert_eq!(result.rows, vec![vec![serde_json::json!(1), serde_json::json!("x")]]);
    }

    #[test]
    fn test_bad_statement_is_execution_error() {
        let mut db = Database::memory().unwrap();
        match db.execute_query("SELECT amt FROM nowhere") {
            Err(SqlScoutError::Execution(message)) => {
                assert!(message.contains("nowhere") || message.contains("no such"));
            }
            other => panic!("expected Execution error, got {:?}", other.map(|r| r.columns)),
        }
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut db = Database::memory().unwrap();
        db.connection()
            .execute_batch("CREATE TABLE t (a INTEGER PRIMARY KEY); INSERT INTO t VALUES (1);")
            .unwrap();

        // Duplicate key fails; the insert must not stick.
        assert!(db.execute_query("INSERT INTO t VALUES (1)").is_err());
        let count = db.execute_query("SELECT COUNT(*) FROM t").unwrap();
        assert_eq!(count.rows[0][0], serde_json::json!(1));
    }

    #[test]
    fn test_read_query_is_deterministic() {
        let mut db = Database::demo().unwrap();
        let first = db
            .execute_query("SELECT COUNT(*), SUM(final_price) FROM transactions")
            .unwrap();
        let second = db
            .execute_query("SELECT COUNT(*), SUM(final_price) FROM transactions")
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_open_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scout.db");
        {
            let mut db = Database::open(&path).unwrap();
            db.connection()
                .execute_batch("CREATE TABLE t (a INTEGER); INSERT INTO t VALUES (7);")
                .unwrap();
        }
        let mut db = Database::open(&path).unwrap();
        let result = db.execute_query("SELECT a FROM t").unwrap();
        assert_eq!(result.rows[0][0], serde_json::json!(7));
    }
}
