//! Reservations repository: the FIFO waiting list per book

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{error::AppResult, models::reservation::Reservation};

/// Named unique constraint on (book_id, queue_position). The workflow matches
/// on this name to tell a position collision apart from other conflicts.
pub const QUEUE_POSITION_CONSTRAINT: &str = "reservations_book_position_key";

#[derive(Clone)]
pub struct ReservationsRepository {
    pool: Pool<Postgres>,
}

impl ReservationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Duplicate check: does this user already hold an entry for this book?
    pub async fn find_by_book_and_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE book_id = $1 AND user_id = $2",
        )
        .bind(book_id)
        .bind(user_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(reservation)
    }

    /// Next queue position for the book: one past the current maximum, 1 if
    /// the queue is empty. The book's existing entries are locked FOR UPDATE
    /// first so the maximum is stable against concurrent inserts that have
    /// already committed; a racer still inside its own transaction can slip
    /// past this window, which the insert's unique constraint catches.
    pub async fn next_queue_position(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
    ) -> AppResult<i32> {
        sqlx::query("SELECT id FROM reservations WHERE book_id = $1 FOR UPDATE")
            .bind(book_id)
            .fetch_all(&mut **tx)
            .await?;

        let max_position: Option<i32> =
            sqlx::query_scalar("SELECT MAX(queue_position) FROM reservations WHERE book_id = $1")
                .bind(book_id)
                .fetch_one(&mut **tx)
                .await?;

        Ok(max_position.unwrap_or(0) + 1)
    }

    /// Insert a new entry. A unique violation on the queue-position
    /// constraint is surfaced to the caller, which retries exactly once.
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        user_id: Uuid,
        queue_position: i32,
        created_at: DateTime<Utc>,
    ) -> AppResult<Reservation> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            INSERT INTO reservations (book_id, user_id, queue_position, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(book_id)
        .bind(user_id)
        .bind(queue_position)
        .bind(created_at)
        .fetch_one(&mut **tx)
        .await?;

        Ok(reservation)
    }

    /// Head of the queue: smallest position, earliest creation time on ties
    pub async fn head(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
    ) -> AppResult<Option<Reservation>> {
        let reservation = sqlx::query_as::<_, Reservation>(
            r#"
            SELECT * FROM reservations
            WHERE book_id = $1
            ORDER BY queue_position ASC, created_at ASC
            LIMIT 1
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(reservation)
    }

    /// Remove an entry; called only as part of promotion
    pub async fn delete(&self, tx: &mut Transaction<'_, Postgres>, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM reservations WHERE id = $1")
            .bind(id)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// List all current reservations for a book, ordered by queue position
    pub async fn list_by_book(&self, book_id: Uuid) -> AppResult<Vec<Reservation>> {
        let reservations = sqlx::query_as::<_, Reservation>(
            "SELECT * FROM reservations WHERE book_id = $1 ORDER BY queue_position ASC",
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reservations)
    }
}
