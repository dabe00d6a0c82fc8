//! Circulation service: the transactional checkout/return workflow
//!
//! Every operation that mutates copy, checkout or reservation rows runs as a
//! single Postgres transaction with row-level FOR UPDATE locks on the rows it
//! touches. All effects commit together or not at all; callers never observe
//! a partially-applied checkout or return.

use chrono::{Duration, Utc};
use sqlx::{Acquire, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    config::CirculationConfig,
    error::{AppError, AppResult},
    models::{
        book::{Book, BookCopy, CopyStatus},
        checkout::{Checkout, CheckoutOutcome},
        reservation::Reservation,
    },
    repository::{reservations::QUEUE_POSITION_CONSTRAINT, Repository},
    services::fines::overdue_fine,
};

#[derive(Clone)]
pub struct CirculationService {
    repository: Repository,
    config: CirculationConfig,
}

impl CirculationService {
    pub fn new(repository: Repository, config: CirculationConfig) -> Self {
        Self { repository, config }
    }

    /// Create a book together with its initial copies, all in one transaction
    pub async fn create_book(
        &self,
        title: &str,
        author: &str,
        total_copies: i32,
    ) -> AppResult<Book> {
        let mut tx = self.repository.pool.begin().await?;

        let book = self.repository.books.create(&mut tx, title, author).await?;
        for _ in 0..total_copies {
            self.repository.copies.create(&mut tx, book.id).await?;
        }
        self.repository
            .books
            .increment_total_copies(&mut tx, book.id, total_copies)
            .await?;

        tx.commit().await?;

        tracing::info!(book_id = %book.id, title, total_copies, "book created");
        Ok(Book {
            total_copies,
            ..book
        })
    }

    /// Add a single copy to an existing book, updating the count atomically
    pub async fn add_book_copy(&self, book_id: Uuid) -> AppResult<BookCopy> {
        self.repository.books.get_by_id(book_id).await?;

        let mut tx = self.repository.pool.begin().await?;
        let copy = self.repository.copies.create(&mut tx, book_id).await?;
        self.repository
            .books
            .increment_total_copies(&mut tx, book_id, 1)
            .await?;
        tx.commit().await?;

        tracing::info!(copy_id = %copy.id, %book_id, "copy added");
        Ok(copy)
    }

    /// List all books in the catalogue
    pub async fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list().await
    }

    /// Check out a book for a user.
    ///
    /// Happy path: an AVAILABLE copy exists, it is locked FOR UPDATE, marked
    /// CHECKED_OUT and a checkout record is opened for the loan period.
    ///
    /// No-copy path: the user is appended to the book's reservation queue,
    /// unless they already hold an entry for this book (DuplicateReservation).
    pub async fn checkout_book(&self, book_id: Uuid, user_id: Uuid) -> AppResult<CheckoutOutcome> {
        let mut tx = self.repository.pool.begin().await?;

        self.repository.users.get_by_id_tx(&mut tx, user_id).await?;
        self.repository.books.get_by_id_tx(&mut tx, book_id).await?;

        let Some(copy) = self
            .repository
            .copies
            .find_available_for_update(&mut tx, book_id)
            .await?
        else {
            tracing::info!(%book_id, %user_id, "no available copies, falling back to queue");

            if self
                .repository
                .reservations
                .find_by_book_and_user(&mut tx, book_id, user_id)
                .await?
                .is_some()
            {
                tracing::warn!(%book_id, %user_id, "user already queued for this book");
                return Err(AppError::DuplicateReservation);
            }

            let reservation = self
                .create_reservation_with_retry(&mut tx, book_id, user_id)
                .await?;
            tx.commit().await?;

            tracing::info!(
                reservation_id = %reservation.id, %book_id, %user_id,
                position = reservation.queue_position,
                "reservation created"
            );
            return Ok(CheckoutOutcome::Reservation { reservation });
        };

        self.repository
            .copies
            .update_status(&mut tx, copy.id, CopyStatus::CheckedOut)
            .await?;

        let now = Utc::now();
        let due = now + Duration::days(self.config.loan_period_days);
        let checkout = self
            .repository
            .checkouts
            .create(&mut tx, copy.id, user_id, now, due)
            .await?;

        tx.commit().await?;

        tracing::info!(
            checkout_id = %checkout.id, %user_id, copy_id = %copy.id,
            due = %due.format("%Y-%m-%d"),
            "checkout created"
        );
        Ok(CheckoutOutcome::Checkout { checkout })
    }

    /// Return a checked-out book.
    ///
    /// All in one transaction: lock the checkout row, guard against
    /// double-return, compute the fine, complete the loan, free the copy, and
    /// if a reservation is waiting, promote its head to a fresh checkout on
    /// the just-freed copy. The copy is never observable as AVAILABLE by any
    /// concurrent checkout while a promotion is pending.
    pub async fn return_checkout(&self, checkout_id: Uuid) -> AppResult<Checkout> {
        let mut tx = self.repository.pool.begin().await?;

        let checkout = self
            .repository
            .checkouts
            .get_by_id_for_update(&mut tx, checkout_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Checkout with id {} not found", checkout_id))
            })?;

        if let Some(returned_at) = checkout.returned_at {
            tracing::warn!(%checkout_id, %returned_at, "checkout already returned");
            return Err(AppError::AlreadyReturned);
        }

        let now = Utc::now();
        let fine = overdue_fine(checkout.due_date, now, self.config.fine_per_day);
        tracing::info!(
            %checkout_id, copy_id = %checkout.book_copy_id, user_id = %checkout.user_id,
            fine, "returning checkout"
        );

        let completed = self
            .repository
            .checkouts
            .mark_returned(&mut tx, checkout.id, now, fine)
            .await?;

        self.repository
            .copies
            .update_status(&mut tx, checkout.book_copy_id, CopyStatus::Available)
            .await?;

        let copy = self
            .repository
            .copies
            .get_by_id(&mut tx, checkout.book_copy_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "copy {} referenced by checkout {} does not exist",
                    checkout.book_copy_id, checkout_id
                ))
            })?;

        if let Some(reservation) = self.repository.reservations.head(&mut tx, copy.book_id).await? {
            tracing::info!(
                reservation_id = %reservation.id, user_id = %reservation.user_id,
                position = reservation.queue_position,
                "promoting head reservation to checkout"
            );

            self.repository
                .copies
                .update_status(&mut tx, copy.id, CopyStatus::CheckedOut)
                .await?;
            self.repository
                .reservations
                .delete(&mut tx, reservation.id)
                .await?;

            let start = Utc::now();
            let due = start + Duration::days(self.config.loan_period_days);
            let promoted = self
                .repository
                .checkouts
                .create(&mut tx, copy.id, reservation.user_id, start, due)
                .await?;

            tracing::info!(
                checkout_id = %promoted.id, user_id = %reservation.user_id,
                due = %due.format("%Y-%m-%d"),
                "auto-checkout created for promoted reservation"
            );
        }

        tx.commit().await?;
        Ok(completed)
    }

    /// List all checkout records (active and past) for a user
    pub async fn list_user_checkouts(&self, user_id: Uuid) -> AppResult<Vec<Checkout>> {
        self.repository.users.get_by_id(user_id).await?;
        self.repository.checkouts.list_by_user(user_id).await
    }

    /// List current reservations for a book, ordered by queue position
    pub async fn list_book_reservations(&self, book_id: Uuid) -> AppResult<Vec<Reservation>> {
        self.repository.books.get_by_id(book_id).await?;
        self.repository.reservations.list_by_book(book_id).await
    }

    /// Insert a reservation at the next queue position.
    ///
    /// `next_queue_position` locks the book's existing entries, but a
    /// concurrent transaction that has computed the same position and not yet
    /// committed slips past that window; our insert then blocks on its index
    /// entry and fails with a unique violation once it commits. The insert
    /// runs inside a savepoint so the collision can be rolled back without
    /// aborting the outer transaction; the position is recomputed and the
    /// insert retried exactly once. A second collision is an internal fault,
    /// deliberately not retried further.
    async fn create_reservation_with_retry(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book_id: Uuid,
        user_id: Uuid,
    ) -> AppResult<Reservation> {
        let position = self
            .repository
            .reservations
            .next_queue_position(tx, book_id)
            .await?;

        let mut savepoint = tx.begin().await?;
        match self
            .repository
            .reservations
            .create(&mut savepoint, book_id, user_id, position, Utc::now())
            .await
        {
            Ok(reservation) => {
                savepoint.commit().await?;
                Ok(reservation)
            }
            Err(err) if err.is_unique_violation(QUEUE_POSITION_CONSTRAINT) => {
                savepoint.rollback().await?;
                tracing::warn!(%book_id, position, "queue position collision, retrying once");

                let position = self
                    .repository
                    .reservations
                    .next_queue_position(tx, book_id)
                    .await?;
                self.repository
                    .reservations
                    .create(tx, book_id, user_id, position, Utc::now())
                    .await
                    .map_err(|err| {
                        if err.is_unique_violation(QUEUE_POSITION_CONSTRAINT) {
                            AppError::Internal(format!(
                                "queue position collision persisted after retry for book {}",
                                book_id
                            ))
                        } else {
                            err
                        }
                    })
            }
            Err(err) => Err(err),
        }
    }
}
