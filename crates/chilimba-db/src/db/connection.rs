use diesel::SqliteConnection;
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};

use crate::error::DbResult;

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Enables cascade foreign keys on every pooled connection; SQLite leaves
/// them off unless asked per connection.
#[derive(Debug, Clone, Copy)]
struct SqlitePragmas;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// ## Summary
/// Creates a new connection pool against the embedded SQLite database.
///
/// ## Errors
/// Returns an error if the pool cannot be created for the given path.
#[tracing::instrument(fields(pool_size = max_connections))]
pub fn create_pool(database_path: &str, max_connections: u32) -> DbResult<DbPool> {
    tracing::debug!("Creating database connection pool");

    let manager = ConnectionManager::<SqliteConnection>::new(database_path);

    let pool = Pool::builder()
        .max_size(max_connections)
        .connection_customizer(Box::new(SqlitePragmas))
        .build(manager)?;

    tracing::info!(
        pool_size = max_connections,
        "Database connection pool created successfully"
    );

    Ok(pool)
}

/// ## Summary
/// Checks a connection out of the pool.
///
/// ## Errors
/// Returns a pool error if no connection becomes available.
pub fn checkout(pool: &DbPool) -> DbResult<DbConnection> {
    Ok(pool.get()?)
}
