//! Book-copy repository: the resource ledger of physical copies

use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book::{BookCopy, CopyStatus},
};

#[derive(Clone)]
pub struct CopiesRepository;

impl CopiesRepository {
    pub fn new() -> Self {
        Self
    }

    /// Insert a new copy in AVAILABLE state
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
    ) -> AppResult<BookCopy> {
        let copy = sqlx::query_as::<_, BookCopy>(
            "INSERT INTO book_copies (book_id, status) VALUES ($1, 'AVAILABLE') RETURNING *",
        )
        .bind(book_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(copy)
    }

    /// Claim one AVAILABLE copy of the book, taking an exclusive row lock on
    /// it for the duration of the transaction (SELECT ... FOR UPDATE).
    ///
    /// A concurrent claimer blocks on the lock and, once the holder commits,
    /// re-evaluates: the claimed row no longer matches and the scan moves on
    /// to the next AVAILABLE copy, or returns `None` when all are out.
    /// `None` is not an error; it is the signal to fall back to the queue.
    pub async fn find_available_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
    ) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>(
            r#"
            SELECT * FROM book_copies
            WHERE book_id = $1 AND status = 'AVAILABLE'
            ORDER BY id
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(copy)
    }

    /// Get a copy by ID inside the caller's transaction
    pub async fn get_by_id(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Option<BookCopy>> {
        let copy = sqlx::query_as::<_, BookCopy>("SELECT * FROM book_copies WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(copy)
    }

    /// Single-row status update. Only called while the caller's transaction
    /// holds the lock from `find_available_for_update` or the loan-row lock
    /// taken at the start of a return.
    pub async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: CopyStatus,
    ) -> AppResult<()> {
        sqlx::query("UPDATE book_copies SET status = $2 WHERE id = $1")
            .bind(id)
            .bind(status)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

impl Default for CopiesRepository {
    fn default() -> Self {
        Self::new()
    }
}
