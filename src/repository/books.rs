//! Books repository for database operations

use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::book::Book,
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Get book by ID inside the caller's transaction
    pub async fn get_by_id_tx(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// List all books in the catalogue
    pub async fn list(&self) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title")
            .fetch_all(&self.pool)
            .await?;
        Ok(books)
    }

    /// Insert a new book with a zero copy count
    pub async fn create(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        title: &str,
        author: &str,
    ) -> AppResult<Book> {
        let book = sqlx::query_as::<_, Book>(
            "INSERT INTO books (title, author, total_copies) VALUES ($1, $2, 0) RETURNING *",
        )
        .bind(title)
        .bind(author)
        .fetch_one(&mut **tx)
        .await?;

        Ok(book)
    }

    /// Increment the denormalized copy count
    pub async fn increment_total_copies(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        delta: i32,
    ) -> AppResult<()> {
        sqlx::query("UPDATE books SET total_copies = total_copies + $2 WHERE id = $1")
            .bind(book_id)
            .bind(delta)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
