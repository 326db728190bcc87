use sqlx::SqlitePool;
use thiserror::Error;
use tracing::info;

use crate::database::participants_repo;
use crate::models::ParticipantRow;

#[derive(Debug, Error)]
pub enum ParticipantError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Another writer already holds one of the numbers in the batch.
    #[error("duplicate participant number")]
    DuplicateKey,

    #[error("participant {0} not found")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(sqlx::Error),
}

impl From<sqlx::Error> for ParticipantError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::DuplicateKey,
            _ => Self::Store(err),
        }
    }
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub start: i64,
    pub end: i64,
    pub inserted: Vec<ParticipantRow>,
}

impl BatchOutcome {
    pub fn count(&self) -> i64 {
        self.end - self.start + 1
    }

    pub fn range_label(&self) -> String {
        format!("from {} to {}", self.start, self.end)
    }
}

pub async fn list_participants(pool: &SqlitePool) -> Result<Vec<ParticipantRow>, ParticipantError> {
    Ok(participants_repo::list_all(pool).await?)
}

pub async fn count_participants(pool: &SqlitePool) -> Result<i64, ParticipantError> {
    Ok(participants_repo::count_all(pool).await?)
}

pub fn validate_count(count: i64, max_batch: i64) -> Result<(), ParticipantError> {
    if count <= 0 {
        return Err(ParticipantError::InvalidArgument(format!(
            "count must be positive, got {}",
            count
        )));
    }
    if count > max_batch {
        return Err(ParticipantError::InvalidArgument(format!(
            "count {} exceeds the batch limit of {}",
            count, max_batch
        )));
    }
    Ok(())
}

/// Appends `count` active participants numbered right after the current maximum.
///
/// Reservation, insert and read-back share one transaction; any failure rolls
/// back all of it, so callers never observe a partial batch.
pub async fn add_batch(
    pool: &SqlitePool,
    count: i64,
    max_batch: i64,
) -> Result<BatchOutcome, ParticipantError> {
    validate_count(count, max_batch)?;

    let mut tx = pool.begin().await?;
    let end = participants_repo::reserve_numbers(&mut tx, count).await?;
    let start = end - count + 1;
    participants_repo::insert_range(&mut tx, start, end).await?;
    let inserted = participants_repo::list_range(&mut tx, start, end).await?;
    tx.commit().await?;

    info!(start, end, count, "participants added");
    Ok(BatchOutcome {
        start,
        end,
        inserted,
    })
}

pub async fn toggle_status(pool: &SqlitePool, number: i64) -> Result<ParticipantRow, ParticipantError> {
    let Some(row) = participants_repo::toggle_status(pool, number).await? else {
        return Err(ParticipantError::NotFound(number.to_string()));
    };
    info!(number, status = row.status.as_str(), "participant status toggled");
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database;
    use crate::models::ParticipantStatus;

    const MAX: i64 = 10_000;

    fn ids(rows: &[ParticipantRow]) -> Vec<i64> {
        rows.iter().map(|r| r.number).collect()
    }

    #[tokio::test]
    async fn first_batch_starts_at_one() {
        let pool = database::connect_in_memory().await.unwrap();

        let outcome = add_batch(&pool, 3, MAX).await.unwrap();

        assert_eq!((outcome.start, outcome.end), (1, 3));
        assert_eq!(outcome.range_label(), "from 1 to 3");
        assert_eq!(ids(&outcome.inserted), vec![1, 2, 3]);
        assert!(outcome
            .inserted
            .iter()
            .all(|r| r.status == ParticipantStatus::Active));
    }

    #[tokio::test]
    async fn next_batch_continues_after_max() {
        let pool = database::connect_in_memory().await.unwrap();
        add_batch(&pool, 5, MAX).await.unwrap();

        let outcome = add_batch(&pool, 2, MAX).await.unwrap();

        assert_eq!(outcome.range_label(), "from 6 to 7");
        assert_eq!(ids(&outcome.inserted), vec![6, 7]);
        assert_eq!(count_participants(&pool).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn rejects_non_positive_and_oversized_counts() {
        let pool = database::connect_in_memory().await.unwrap();
        add_batch(&pool, 2, MAX).await.unwrap();

        for count in [0, -1, MAX + 1] {
            let err = add_batch(&pool, count, MAX).await.unwrap_err();
            assert!(matches!(err, ParticipantError::InvalidArgument(_)), "{count}");
        }
        assert_eq!(ids(&list_participants(&pool).await.unwrap()), vec![1, 2]);
    }

    #[tokio::test]
    async fn list_is_ascending_across_batches() {
        let pool = database::connect_in_memory().await.unwrap();
        for count in [4, 1, 3] {
            add_batch(&pool, count, MAX).await.unwrap();
        }

        let numbers = ids(&list_participants(&pool).await.unwrap());
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn toggle_only_touches_target_and_is_an_involution() {
        let pool = database::connect_in_memory().await.unwrap();
        add_batch(&pool, 3, MAX).await.unwrap();

        let toggled = toggle_status(&pool, 2).await.unwrap();
        assert_eq!(toggled.number, 2);
        assert_eq!(toggled.status, ParticipantStatus::Disabled);

        let statuses: Vec<_> = list_participants(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|r| (r.number, r.status))
            .collect();
        assert_eq!(
            statuses,
            vec![
                (1, ParticipantStatus::Active),
                (2, ParticipantStatus::Disabled),
                (3, ParticipantStatus::Active),
            ]
        );

        let back = toggle_status(&pool, 2).await.unwrap();
        assert_eq!(back.status, ParticipantStatus::Active);
    }

    #[tokio::test]
    async fn toggle_unknown_number_is_not_found() {
        let pool = database::connect_in_memory().await.unwrap();
        add_batch(&pool, 1, MAX).await.unwrap();

        let err = toggle_status(&pool, 999).await.unwrap_err();
        assert!(matches!(err, ParticipantError::NotFound(ref id) if id == "999"));
        assert_eq!(
            list_participants(&pool).await.unwrap()[0].status,
            ParticipantStatus::Active
        );
    }

    #[tokio::test]
    async fn colliding_insert_is_duplicate_key_and_rolls_back() {
        let pool = database::connect_in_memory().await.unwrap();
        add_batch(&pool, 3, MAX).await.unwrap();

        // A writer that computed its range from a stale maximum.
        let mut tx = pool.begin().await.unwrap();
        let err: ParticipantError = participants_repo::insert_range(&mut tx, 3, 6)
            .await
            .unwrap_err()
            .into();
        drop(tx);

        assert!(matches!(err, ParticipantError::DuplicateKey));
        assert_eq!(ids(&list_participants(&pool).await.unwrap()), vec![1, 2, 3]);

        // The sequence was not disturbed either.
        let outcome = add_batch(&pool, 1, MAX).await.unwrap();
        assert_eq!(outcome.start, 4);
    }
}
