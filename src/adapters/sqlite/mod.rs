//! SQLite adapter: Implementation of ProjectStore.
//!
//! Persists scraped projects (funding figures plus the 19 feature columns)
//! in a single `projects` table keyed by hyperlink. Feature columns are
//! nullable until features have been extracted for the project.
//!
//! # Mutex Behavior
//!
//! The connection is protected by a `Mutex`. A poisoned mutex (from a panic
//! in another thread) is reported as `StorageError::LockPoisoned`.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, ToSql};

use crate::domain::{CohortRow, FeatureName, FeatureVector, FEATURE_COUNT};
use crate::ports::ProjectStore;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database connection lock poisoned")]
    LockPoisoned,
}

/// SQLite storage adapter.
pub struct SqliteProjectStore {
    conn: Mutex<Connection>,
}

impl SqliteProjectStore {
    /// Open (or create) the project database at `path`.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn()?;

        let feature_defs = FeatureName::ALL
            .iter()
            .map(|f| format!("{f} REAL"))
            .collect::<Vec<_>>()
            .join(",\n                ");

        conn.execute_batch(&format!(
            r"
            CREATE TABLE IF NOT EXISTS projects (
                hyperlink TEXT PRIMARY KEY,
                currency TEXT NOT NULL,
                pledged REAL,
                goal REAL,
                {feature_defs}
            );
            "
        ))?;

        Ok(())
    }

    /// Comma-separated feature column list in canonical order.
    fn feature_columns() -> String {
        FeatureName::ALL
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_sql(filter: &str) -> String {
        format!(
            "SELECT hyperlink, currency, pledged, goal, {} FROM projects {filter} ORDER BY hyperlink",
            Self::feature_columns()
        )
    }

    fn row_to_project(row: &rusqlite::Row<'_>) -> rusqlite::Result<CohortRow> {
        let mut project = CohortRow::new(
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<f64>>(2)?,
            row.get::<_, Option<f64>>(3)?,
        );
        for name in FeatureName::ALL {
            project.features[name.index()] = row.get::<_, Option<f64>>(4 + name.index())?;
        }
        Ok(project)
    }
}

impl ProjectStore for SqliteProjectStore {
    type Error = StorageError;

    fn save_project(&self, row: &CohortRow) -> Result<(), Self::Error> {
        let conn = self.conn()?;

        let placeholders = (1..=4 + FEATURE_COUNT)
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT OR REPLACE INTO projects (hyperlink, currency, pledged, goal, {}) VALUES ({placeholders})",
            Self::feature_columns()
        );

        let mut values: Vec<&dyn ToSql> =
            vec![&row.hyperlink, &row.currency, &row.pledged, &row.goal];
        values.extend(row.features.iter().map(|f| f as &dyn ToSql));
        conn.execute(&sql, values.as_slice())?;

        tracing::debug!("Saved project {} to storage", row.hyperlink);
        Ok(())
    }

    fn load_projects(&self) -> Result<Vec<CohortRow>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&Self::select_sql(""))?;
        let projects = stmt
            .query_map([], Self::row_to_project)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(projects)
    }

    fn load_project(&self, hyperlink: &str) -> Result<Option<CohortRow>, Self::Error> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&Self::select_sql("WHERE hyperlink = ?1"))?;
        match stmt.query_row(params![hyperlink], Self::row_to_project) {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_features(&self, hyperlink: &str, features: &FeatureVector) -> Result<(), Self::Error> {
        let conn = self.conn()?;

        let assignments = FeatureName::ALL
            .iter()
            .map(|f| format!("{f} = ?{}", f.index() + 1))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "UPDATE projects SET {assignments} WHERE hyperlink = ?{}",
            FEATURE_COUNT + 1
        );

        let mut values: Vec<&dyn ToSql> = features
            .as_array()
            .iter()
            .map(|v| v as &dyn ToSql)
            .collect();
        values.push(&hyperlink);

        let updated = conn.execute(&sql, values.as_slice())?;
        if updated == 0 {
            return Err(StorageError::NotFound(hyperlink.to_string()));
        }

        tracing::debug!("Saved features for {}", hyperlink);
        Ok(())
    }

    fn projects_missing_features(&self) -> Result<Vec<String>, Self::Error> {
        let conn = self.conn()?;

        let all_null = FeatureName::ALL
            .iter()
            .map(|f| format!("{f} IS NULL"))
            .collect::<Vec<_>>()
            .join(" AND ");
        let mut stmt = conn.prepare(&format!(
            "SELECT hyperlink FROM projects WHERE {all_null} ORDER BY hyperlink"
        ))?;

        let links = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(links)
    }

    fn count_projects(&self) -> Result<usize, Self::Error> {
        let conn = self.conn()?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;

        Ok(count as usize)
    }
}
