//! Reservation (waiting list) model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A FIFO waiting-list entry for a book with no free copies.
///
/// `queue_position` is unique per book and monotonically assigned;
/// `created_at` only breaks ties. Entries are deleted when promoted to a
/// checkout and never otherwise mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub queue_position: i32,
    pub created_at: DateTime<Utc>,
}
