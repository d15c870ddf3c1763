use diesel::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{DbError, DbResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// ## Summary
/// Applies any pending embedded migrations.
///
/// ## Errors
/// Returns `Migration` if a migration fails to apply.
pub fn run_migrations(conn: &mut SqliteConnection) -> DbResult<()> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DbError::Migration(e.to_string()))?;

    for version in &applied {
        tracing::info!(%version, "Applied migration");
    }

    Ok(())
}
