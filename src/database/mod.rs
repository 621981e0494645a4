pub mod connection;

pub use connection::*;

/// In-memory SQLite with all migrations applied.
#[cfg(test)]
pub async fn test_pool() -> DbPool {
    let config = crate::config::DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // every connection to :memory: is a separate database
        max_connections: 1,
    };
    let pool = create_pool(&config).await.expect("sqlite pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}
