use std::path::PathBuf;

use sqlx::sqlite::SqliteConnectOptions;
use workhours::{DbPool, database};

/// Test database wrapper for test isolation
///
/// Every instance owns a fresh SQLite file in the system temp directory,
/// migrated to the current schema. The file is removed when the wrapper
/// is dropped.
///
/// # Example Usage:
/// ```rust
/// #[tokio::test]
/// async fn test_something() {
///     let test_db = TestDb::new("test_something").await;
///     let mut conn = test_db.get_connection().await;
///     // ... test logic
/// }
/// ```
pub struct TestDb {
    pub pool: DbPool,
    path: PathBuf,
}

impl TestDb {
    /// Creates a migrated database named after the test.
    ///
    /// `test_name` should match the test function name so leftover files
    /// can be traced back to the test that produced them.
    pub async fn new(test_name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "workhours_{}_{}.db",
            test_name,
            nanoid::nanoid!(8, &nanoid::alphabet::SAFE)
        ));

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = database::connect_with(options, 5)
            .await
            .expect("Failed to open test database");
        database::migrate(&pool)
            .await
            .expect("Failed to run migrations");

        Self { pool, path }
    }

    pub async fn get_connection(&self) -> sqlx::pool::PoolConnection<sqlx::Sqlite> {
        self.pool
            .acquire()
            .await
            .expect("Failed to get database connection")
    }

    /// Number of rows in `table`
    pub async fn count_rows(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&self.pool)
            .await
            .expect("Failed to count rows")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut file = self.path.clone().into_os_string();
            file.push(suffix);
            let _ = std::fs::remove_file(file);
        }
    }
}
