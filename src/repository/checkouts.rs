//! Checkouts repository: the loan record store

use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{error::AppResult, models::checkout::Checkout};

#[derive(Clone)]
pub struct CheckoutsRepository {
    pool: Pool<Postgres>,
}

impl CheckoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Open a new loan. Only called right after a successful copy claim, in
    /// the same transaction.
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_copy_id: Uuid,
        user_id: Uuid,
        checkout_at: DateTime<Utc>,
        due_date: DateTime<Utc>,
    ) -> AppResult<Checkout> {
        let checkout = sqlx::query_as::<_, Checkout>(
            r#"
            INSERT INTO checkouts (book_copy_id, user_id, checkout_at, due_date, fine_amount)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING *
            "#,
        )
        .bind(book_copy_id)
        .bind(user_id)
        .bind(checkout_at)
        .bind(due_date)
        .fetch_one(&mut **tx)
        .await?;

        Ok(checkout)
    }

    /// Lock the checkout row exclusively for the duration of the transaction
    /// (SELECT ... FOR UPDATE). Required before any return, so that racing
    /// return attempts on the same loan serialize and the already-returned
    /// check is authoritative.
    pub async fn get_by_id_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Option<Checkout>> {
        let checkout =
            sqlx::query_as::<_, Checkout>("SELECT * FROM checkouts WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;

        Ok(checkout)
    }

    /// Complete the loan: set `returned_at` and the fine, exactly once. The
    /// `returned_at IS NULL` guard matches the caller's idempotency check.
    pub async fn mark_returned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        returned_at: DateTime<Utc>,
        fine_amount: i64,
    ) -> AppResult<Checkout> {
        let checkout = sqlx::query_as::<_, Checkout>(
            r#"
            UPDATE checkouts
            SET returned_at = $2, fine_amount = $3
            WHERE id = $1 AND returned_at IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(returned_at)
        .bind(fine_amount)
        .fetch_one(&mut **tx)
        .await?;

        Ok(checkout)
    }

    /// List all checkout records (active and past) for a user
    pub async fn list_by_user(&self, user_id: Uuid) -> AppResult<Vec<Checkout>> {
        let checkouts = sqlx::query_as::<_, Checkout>(
            "SELECT * FROM checkouts WHERE user_id = $1 ORDER BY checkout_at",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(checkouts)
    }
}
