//! Business logic services

pub mod circulation;
pub mod fines;
pub mod users;

use crate::{config::CirculationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub circulation: circulation::CirculationService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, circulation_config: CirculationConfig) -> Self {
        Self {
            circulation: circulation::CirculationService::new(
                repository.clone(),
                circulation_config,
            ),
            users: users::UsersService::new(repository),
        }
    }
}
