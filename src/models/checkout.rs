//! Checkout (loan) model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::reservation::Reservation;

/// Checkout model from database.
///
/// `returned_at` and `fine_amount` are set together, exactly once, when the
/// loan is completed. At most one checkout per copy has `returned_at` null at
/// any time (enforced by a partial unique index).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Checkout {
    pub id: Uuid,
    pub book_copy_id: Uuid,
    pub user_id: Uuid,
    pub checkout_at: DateTime<Utc>,
    pub due_date: DateTime<Utc>,
    pub returned_at: Option<DateTime<Utc>>,
    pub fine_amount: i64,
}

/// Result of a checkout attempt: either a loan was opened, or the requester
/// was queued behind the existing holders.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CheckoutOutcome {
    Checkout { checkout: Checkout },
    Reservation { reservation: Reservation },
}

/// Checkout request body
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub user_id: Uuid,
}
