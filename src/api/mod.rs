//! API handlers for the Stacks REST endpoints

pub mod books;
pub mod checkouts;
pub mod health;
pub mod openapi;
pub mod users;

use validator::Validate;

use crate::error::{AppError, AppResult};

/// Run `validator` checks on a request body, mapping failures to a 400
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}
