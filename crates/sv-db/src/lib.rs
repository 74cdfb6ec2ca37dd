//! # sv-db
//!
//! libSQL store of record and the questionnaire mutation engine.
//!
//! [`SurveyDb`] owns the database handle and hands out one connection per
//! operation. [`service::QuestionnaireService`] is the engine: it runs every
//! mutation in a single `BEGIN IMMEDIATE` transaction, applies the
//! [`guard::PublishGuard`] and [`reconcile::ComponentDiff`], keeps the cache
//! in step after commit, and feeds the autosave queue consumed by
//! [`autosave::AutosaveWorker`].

pub mod autosave;
mod cache_sync;
pub mod error;
pub mod guard;
pub mod helpers;
mod migrations;
pub mod ops;
pub mod reconcile;
mod repos;
pub mod service;
pub mod updates;

#[cfg(test)]
pub(crate) mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::{Builder, Connection, Transaction, TransactionBehavior};
use sv_config::DatabaseConfig;

/// Database handle shared by every engine operation.
///
/// Connections are opened per operation so concurrent callers never share a
/// transaction. Writers are serialized by `BEGIN IMMEDIATE` and wait up to
/// the busy timeout for the write lock.
pub struct SurveyDb {
    db: libsql::Database,
    busy_timeout: Duration,
}

impl SurveyDb {
    /// Open a local database file with the default busy timeout.
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_with(&DatabaseConfig {
            path: path.to_string(),
            ..DatabaseConfig::default()
        })
        .await
    }

    /// Open the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_with(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(&config.path).build().await?;
        let survey_db = Self {
            db,
            busy_timeout: config.busy_timeout(),
        };

        let conn = survey_db.connect().await?;
        let mut rows = conn
            .query("PRAGMA journal_mode = WAL", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA journal_mode: {e}")))?;
        while rows.next().await?.is_some() {}

        survey_db.run_migrations().await?;
        tracing::debug!(path = %config.path, "database opened");
        Ok(survey_db)
    }

    /// Open a fresh connection with per-connection pragmas applied.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be opened or a
    /// pragma is rejected.
    pub async fn connect(&self) -> Result<Connection, DatabaseError> {
        let conn = self.db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let millis = u64::try_from(self.busy_timeout.as_millis()).unwrap_or(u64::MAX);
        let mut rows = conn
            .query(&format!("PRAGMA busy_timeout = {millis}"), ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
        while rows.next().await?.is_some() {}

        Ok(conn)
    }

    /// Open a connection and start a write transaction on it.
    ///
    /// The write lock is taken up front (`BEGIN IMMEDIATE`), so two writers
    /// never interleave their read-modify-write sequences.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the lock cannot be acquired within the busy
    /// timeout.
    pub async fn begin(&self) -> Result<Transaction, DatabaseError> {
        let conn = self.connect().await?;
        Ok(conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?)
    }

    /// Commit `tx` if `result` is `Ok`, otherwise roll it back.
    ///
    /// The original error is returned even when the rollback itself fails.
    ///
    /// # Errors
    ///
    /// Returns the error carried by `result`, or the commit failure.
    pub async fn finish<T>(
        tx: Transaction,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(error = %rollback, "rollback failed");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_db() -> (tempfile::TempDir, SurveyDb) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("survey.db");
        let db = SurveyDb::open_local(path.to_str().unwrap()).await.unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let (_dir, db) = temp_db().await;
        let conn = db.connect().await.unwrap();

        for table in ["questions", "components", "answers", "answer_items"] {
            let mut rows = conn
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn migrations_are_idempotent() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("survey.db");
        let path = path.to_str().unwrap();
        drop(SurveyDb::open_local(path).await.unwrap());
        let reopened = SurveyDb::open_local(path).await.unwrap();
        reopened.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn foreign_keys_enabled_per_connection() {
        let (_dir, db) = temp_db().await;
        let conn = db.connect().await.unwrap();
        let result = conn
            .execute(
                "INSERT INTO components (question_id, fe_id, type, title, sort_order) \
                 VALUES (999, 'c1', 'questionInput', 't', 0)",
                (),
            )
            .await;
        assert!(result.is_err(), "orphan component must be rejected");
    }

    #[tokio::test]
    async fn rolled_back_transaction_leaves_no_rows() {
        let (_dir, db) = temp_db().await;
        let tx = db.begin().await.unwrap();
        tx.execute("INSERT INTO questions (user_id, title) VALUES (1, 'x')", ())
            .await
            .unwrap();
        let outcome: Result<(), DatabaseError> =
            SurveyDb::finish(tx, Err(DatabaseError::Validation("boom".into()))).await;
        assert!(outcome.is_err());

        let conn = db.connect().await.unwrap();
        let mut rows = conn.query("SELECT COUNT(*) FROM questions", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 0);
    }

    #[tokio::test]
    async fn committed_transaction_is_visible_to_new_connections() {
        let (_dir, db) = temp_db().await;
        let tx = db.begin().await.unwrap();
        tx.execute("INSERT INTO questions (user_id, title) VALUES (1, 'x')", ())
            .await
            .unwrap();
        SurveyDb::finish(tx, Ok(())).await.unwrap();

        let conn = db.connect().await.unwrap();
        let mut rows = conn.query("SELECT COUNT(*) FROM questions", ()).await.unwrap();
        let row = rows.next().await.unwrap().unwrap();
        assert_eq!(row.get::<i64>(0).unwrap(), 1);
    }
}
