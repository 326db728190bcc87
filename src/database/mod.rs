pub mod participants_repo;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tracing::info;

// The sequence row tracks the last number handed out. It only moves inside the
// same transaction that inserts the participants, so it never runs ahead of the
// committed rows.
const SCHEMA: &[&str] = &[
    r#"
CREATE TABLE IF NOT EXISTS participants (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  number INTEGER NOT NULL UNIQUE CHECK (number > 0),
  status TEXT NOT NULL DEFAULT 'active' CHECK (status IN ('active', 'disabled')),
  created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
  updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
)
"#,
    r#"
CREATE TABLE IF NOT EXISTS participant_sequence (
  id INTEGER PRIMARY KEY CHECK (id = 1),
  last_number INTEGER NOT NULL
)
"#,
    r#"
INSERT OR IGNORE INTO participant_sequence (id, last_number)
SELECT 1, COALESCE(MAX(number), 0) FROM participants
"#,
];

/// Opens the store and makes sure the schema exists.
pub async fn connect(database_url: &str) -> sqlx::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new().connect(database_url).await?;
    ensure_schema(&pool).await?;
    info!("Store ready at {}", database_url);
    Ok(pool)
}

/// Private in-memory store. Every SQLite memory connection is its own database,
/// so the pool is pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> sqlx::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    ensure_schema(&pool).await?;
    Ok(pool)
}

pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

pub async fn close(pool: SqlitePool) {
    pool.close().await;
    info!("Store closed");
}
