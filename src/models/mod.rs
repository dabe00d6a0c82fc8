//! Data models for Stacks

pub mod book;
pub mod checkout;
pub mod reservation;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookCopy, CopyStatus};
pub use checkout::{Checkout, CheckoutOutcome};
pub use reservation::Reservation;
pub use user::{User, UserRole};
