//! Stacks Library Circulation Server
//!
//! A REST JSON API for circulating a shared pool of book copies: transactional
//! checkout and return, a FIFO reservation queue per book, and deterministic
//! overdue-fine calculation.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
