//! Catalogue endpoints: books, copies and their reservation queues

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        book::{Book, BookCopy, CreateBook},
        reservation::Reservation,
    },
};

use super::validate_request;

/// List all books in the catalogue
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    responses(
        (status = 200, description = "All books", body = Vec<Book>)
    )
)]
pub async fn list_books(State(state): State<crate::AppState>) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.circulation.list_books().await?;
    Ok(Json(books))
}

/// Create a book with its initial copies
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    validate_request(&request)?;

    let book = state
        .services
        .circulation
        .create_book(&request.title, &request.author, request.total_copies)
        .await?;

    Ok((StatusCode::CREATED, Json(book)))
}

/// Add a physical copy to an existing book
#[utoipa::path(
    post,
    path = "/books/{id}/copies",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 201, description = "Copy added", body = BookCopy),
        (status = 404, description = "Book not found")
    )
)]
pub async fn add_book_copy(
    State(state): State<crate::AppState>,
    Path(book_id): Path<Uuid>,
) -> AppResult<(StatusCode, Json<BookCopy>)> {
    let copy = state.services.circulation.add_book_copy(book_id).await?;
    Ok((StatusCode::CREATED, Json(copy)))
}

/// List the reservation queue for a book, ordered by position
#[utoipa::path(
    get,
    path = "/books/{id}/reservations",
    tag = "books",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Reservation queue", body = Vec<Reservation>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_reservations(
    State(state): State<crate::AppState>,
    Path(book_id): Path<Uuid>,
) -> AppResult<Json<Vec<Reservation>>> {
    let reservations = state
        .services
        .circulation
        .list_book_reservations(book_id)
        .await?;
    Ok(Json(reservations))
}
