//! Checkout and return endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::checkout::{Checkout, CheckoutOutcome, CheckoutRequest},
};

/// Check out a book for a user.
///
/// Responds with a tagged union: either the opened checkout, or the
/// reservation the user was queued under when no copy was free.
#[utoipa::path(
    post,
    path = "/books/{id}/checkout",
    tag = "checkouts",
    params(
        ("id" = Uuid, Path, description = "Book ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 201, description = "Checkout opened or reservation queued", body = CheckoutOutcome),
        (status = 404, description = "Book or user not found"),
        (status = 409, description = "User already has a reservation for this book")
    )
)]
pub async fn checkout_book(
    State(state): State<crate::AppState>,
    Path(book_id): Path<Uuid>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<(StatusCode, Json<CheckoutOutcome>)> {
    let outcome = state
        .services
        .circulation
        .checkout_book(book_id, request.user_id)
        .await?;

    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Return a checked-out book
#[utoipa::path(
    post,
    path = "/checkouts/{id}/return",
    tag = "checkouts",
    params(
        ("id" = Uuid, Path, description = "Checkout ID")
    ),
    responses(
        (status = 200, description = "Checkout completed", body = Checkout),
        (status = 404, description = "Checkout not found"),
        (status = 409, description = "Checkout already returned")
    )
)]
pub async fn return_checkout(
    State(state): State<crate::AppState>,
    Path(checkout_id): Path<Uuid>,
) -> AppResult<Json<Checkout>> {
    let checkout = state
        .services
        .circulation
        .return_checkout(checkout_id)
        .await?;

    Ok(Json(checkout))
}

/// List all checkouts (active and past) for a user
#[utoipa::path(
    get,
    path = "/users/{id}/checkouts",
    tag = "checkouts",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's checkouts", body = Vec<Checkout>),
        (status = 404, description = "User not found")
    )
)]
pub async fn list_user_checkouts(
    State(state): State<crate::AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<Vec<Checkout>>> {
    let checkouts = state
        .services
        .circulation
        .list_user_checkouts(user_id)
        .await?;

    Ok(Json(checkouts))
}
