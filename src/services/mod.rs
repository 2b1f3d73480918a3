//! Business logic services

pub mod accounts;
pub mod blog;
pub mod library;
pub mod social;

use crate::{config::AppConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub accounts: accounts::AccountsService,
    pub library: library::LibraryService,
    pub blog: blog::BlogService,
    pub social: social::SocialService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, config: &AppConfig) -> Self {
        Self {
            accounts: accounts::AccountsService::new(repository.clone(), config.auth.clone()),
            library: library::LibraryService::new(repository.clone()),
            blog: blog::BlogService::new(repository.clone()),
            social: social::SocialService::new(repository, config.pagination.clone()),
        }
    }
}
