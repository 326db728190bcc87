use sqlx::{SqliteConnection, SqlitePool};

use crate::models::ParticipantRow;

const SQL_LIST_PARTICIPANTS: &str = r#"
SELECT
  number,
  status,
  created_at,
  updated_at
FROM participants
ORDER BY number ASC
"#;

pub async fn list_all(pool: &SqlitePool) -> sqlx::Result<Vec<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_LIST_PARTICIPANTS)
        .fetch_all(pool)
        .await
}

const SQL_COUNT_PARTICIPANTS: &str = r#"
SELECT COUNT(*) FROM participants
"#;

pub async fn count_all(pool: &SqlitePool) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_COUNT_PARTICIPANTS)
        .fetch_one(pool)
        .await
}

// Bumps the sequence by `count` and returns the new last number. Being a write,
// it takes the database write lock up front, so concurrent reservations queue
// behind each other instead of reading the same maximum.
const SQL_RESERVE_NUMBERS: &str = r#"
UPDATE participant_sequence
SET last_number = MAX(
  last_number,
  (SELECT COALESCE(MAX(number), 0) FROM participants)
) + ?1
WHERE id = 1
RETURNING last_number
"#;

pub async fn reserve_numbers(conn: &mut SqliteConnection, count: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar::<_, i64>(SQL_RESERVE_NUMBERS)
        .bind(count)
        .fetch_one(conn)
        .await
}

const SQL_INSERT_RANGE: &str = r#"
WITH RECURSIVE seq(n) AS (
  SELECT ?1
  UNION ALL
  SELECT n + 1 FROM seq WHERE n < ?2
)
INSERT INTO participants (number, status)
SELECT n, 'active' FROM seq
"#;

/// Inserts participants `start..=end` in one statement. A number that already
/// exists aborts the whole statement.
pub async fn insert_range(conn: &mut SqliteConnection, start: i64, end: i64) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_RANGE)
        .bind(start)
        .bind(end)
        .execute(conn)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LIST_RANGE: &str = r#"
SELECT
  number,
  status,
  created_at,
  updated_at
FROM participants
WHERE number BETWEEN ?1 AND ?2
ORDER BY number ASC
"#;

pub async fn list_range(
    conn: &mut SqliteConnection,
    start: i64,
    end: i64,
) -> sqlx::Result<Vec<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_LIST_RANGE)
        .bind(start)
        .bind(end)
        .fetch_all(conn)
        .await
}

const SQL_TOGGLE_STATUS: &str = r#"
UPDATE participants
SET
  status = CASE status WHEN 'active' THEN 'disabled' ELSE 'active' END,
  updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
WHERE number = ?1
RETURNING
  number,
  status,
  created_at,
  updated_at
"#;

/// Flips the status in place. `None` when no participant has that number.
pub async fn toggle_status(pool: &SqlitePool, number: i64) -> sqlx::Result<Option<ParticipantRow>> {
    sqlx::query_as::<_, ParticipantRow>(SQL_TOGGLE_STATUS)
        .bind(number)
        .fetch_optional(pool)
        .await
}
