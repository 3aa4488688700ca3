//! Database module

pub mod queries;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Create a database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Run database migrations.
///
/// Stored checksums are refreshed first so CRLF/LF differences across
/// platforms do not block startup.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    let migrator = sqlx::migrate!("./migrations");

    if migrations_table_exists(pool).await? {
        fix_migration_checksums(pool, &migrator).await?;
    }
    migrator.run(pool).await?;

    info!("Database migrations complete");
    Ok(())
}

async fn migrations_table_exists(pool: &PgPool) -> Result<bool> {
    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (SELECT 1 FROM information_schema.tables WHERE table_name = '_sqlx_migrations')"
    )
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Update stored checksums in `_sqlx_migrations` to match the checksums
/// embedded in the current binary.
async fn fix_migration_checksums(pool: &PgPool, migrator: &sqlx::migrate::Migrator) -> Result<()> {
    for migration in migrator.iter() {
        if migration.migration_type.is_down_migration() {
            continue;
        }

        let stored: Option<(Vec<u8>,)> = sqlx::query_as(
            "SELECT checksum FROM _sqlx_migrations WHERE version = $1"
        )
        .bind(migration.version)
        .fetch_optional(pool)
        .await?;

        if let Some((stored_checksum,)) = stored {
            let current_checksum: &[u8] = &migration.checksum;
            if stored_checksum != current_checksum {
                warn!(
                    "Migration {} ({}) checksum mismatch — updating stored checksum",
                    migration.version, migration.description
                );
                sqlx::query("UPDATE _sqlx_migrations SET checksum = $1 WHERE version = $2")
                    .bind(current_checksum)
                    .bind(migration.version)
                    .execute(pool)
                    .await?;
            }
        }
    }

    Ok(())
}
