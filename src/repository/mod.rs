//! Repository layer for database operations

pub mod accounts;
pub mod blog;
pub mod library;
pub mod social;

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Sqlite,
};

use crate::{config::DatabaseConfig, error::AppResult};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Sqlite>,
    pub accounts: accounts::AccountsRepository,
    pub library: library::LibraryRepository,
    pub blog: blog::BlogRepository,
    pub social: social::SocialRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self {
            accounts: accounts::AccountsRepository::new(pool.clone()),
            library: library::LibraryRepository::new(pool.clone()),
            blog: blog::BlogRepository::new(pool.clone()),
            social: social::SocialRepository::new(pool.clone()),
            pool,
        }
    }
}

/// Open the pool and apply pending migrations.
///
/// An in-memory database exists only as long as its connection, so it is
/// pinned to a single connection that never idles out.
pub async fn connect(config: &DatabaseConfig) -> AppResult<Pool<Sqlite>> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = config.url.contains(":memory:") || config.url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
    };

    let pool = pool_options.connect_with(options).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
