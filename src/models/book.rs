//! Book and book-copy models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A catalogue entry: one title with a pool of interchangeable physical copies
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub author: String,
    /// Denormalized count of copies ever created for this book
    pub total_copies: i32,
}

/// Lifecycle status of a single physical copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "book_copy_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CopyStatus {
    Available,
    CheckedOut,
}

/// One physical copy of a book.
///
/// Status is CHECKED_OUT exactly while one open checkout references the copy;
/// it is mutated only inside the circulation workflow's transaction.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookCopy {
    pub id: Uuid,
    pub book_id: Uuid,
    pub status: CopyStatus,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    #[validate(range(min = 0))]
    pub total_copies: i32,
}
