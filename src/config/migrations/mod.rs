//! Schema migrations for the student database
//!
//! Migrations are embedded at compile time from the `files/` directory
//! (one `NNN_name/up.sql` per migration) and tracked in a
//! `schema_migrations` table with a checksum, so a modified migration
//! file is detected instead of silently re-applied.

use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::SqlitePool;
use std::collections::BTreeMap;

/// A single forward migration.
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
}

/// A migration that has already been applied to the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub applied_at: chrono::DateTime<chrono::Utc>,
    pub checksum: String,
}

/// Load all available migrations from the embedded files.
pub fn load_migrations() -> Result<BTreeMap<i64, Migration>> {
    use include_dir::{Dir, include_dir};

    static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/config/migrations/files");

    let mut migrations = BTreeMap::new();

    for entry in MIGRATIONS_DIR.dirs() {
        let dir_name = entry
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .context("Invalid migration directory name")?;

        // Directory names follow NNN_name
        let parts: Vec<&str> = dir_name.splitn(2, '_').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid migration directory: {}. Expected NNN_name", dir_name);
        }
        let version: i64 = parts[0]
            .parse()
            .with_context(|| format!("Invalid migration version in directory: {}", dir_name))?;
        let name = parts[1].to_string();

        let up_sql = MIGRATIONS_DIR
            .get_file(format!("{}/up.sql", dir_name))
            .with_context(|| format!("Missing up.sql in migration {}", dir_name))?
            .contents_utf8()
            .with_context(|| format!("up.sql is not valid UTF-8 in migration {}", dir_name))?
            .to_string();

        migrations.insert(version, Migration { version, name, up_sql });
    }

    if migrations.is_empty() {
        anyhow::bail!("No migrations found in files directory");
    }

    Ok(migrations)
}

/// Checksum for migration SQL, with line endings normalized so the same
/// file hashes identically on Windows and Unix.
pub fn calculate_checksum(sql: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let normalized = sql.replace("\r\n", "\n").replace('\r', "\n");
    let mut hasher = DefaultHasher::new();
    normalized.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

async fn init_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            checksum TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;

    Ok(())
}

async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<AppliedMigration>> {
    sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, name, applied_at, checksum FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .context("Failed to get applied migrations")
}

/// Check that every applied migration still matches its embedded SQL.
async fn validate_migrations(pool: &SqlitePool) -> Result<()> {
    let available = load_migrations()?;
    let applied = get_applied_migrations(pool).await?;

    for applied_migration in applied {
        let available_migration = available.get(&applied_migration.version).with_context(|| {
            format!(
                "Applied migration {} '{}' not found in available migrations",
                applied_migration.version, applied_migration.name
            )
        })?;

        let expected = calculate_checksum(&available_migration.up_sql);
        if applied_migration.checksum != expected {
            anyhow::bail!(
                "Migration {} checksum mismatch! Applied: {}, Expected: {}. \
                The migration file has been modified after being applied.",
                applied_migration.version,
                applied_migration.checksum,
                expected
            );
        }
    }

    Ok(())
}

/// Run every migration that has not been applied yet.
pub async fn migrate_up(pool: &SqlitePool) -> Result<()> {
    init_migration_table(pool).await?;
    validate_migrations(pool).await?;

    let available = load_migrations()?;
    let applied: std::collections::HashSet<i64> = get_applied_migrations(pool)
        .await?
        .into_iter()
        .map(|m| m.version)
        .collect();

    let pending: Vec<Migration> = available
        .into_values()
        .filter(|m| !applied.contains(&m.version))
        .collect();

    if pending.is_empty() {
        debug!("No pending migrations");
        return Ok(());
    }

    info!("Running {} pending migrations", pending.len());
    for migration in pending {
        apply_migration(pool, &migration).await?;
    }

    Ok(())
}

async fn apply_migration(pool: &SqlitePool, migration: &Migration) -> Result<()> {
    info!("Applying migration {} '{}'", migration.version, migration.name);
    debug!("Executing SQL:\n{}", migration.up_sql);

    let mut tx = pool
        .begin()
        .await
        .context("Failed to start migration transaction")?;

    sqlx::query(&migration.up_sql)
        .execute(&mut *tx)
        .await
        .with_context(|| format!("Failed to execute migration {} SQL", migration.version))?;

    let checksum = calculate_checksum(&migration.up_sql);
    sqlx::query("INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)")
        .bind(migration.version)
        .bind(&migration.name)
        .bind(&checksum)
        .execute(&mut *tx)
        .await
        .context("Failed to record migration")?;

    tx.commit().await.context("Failed to commit migration transaction")?;

    Ok(())
}

/// Highest applied migration version, if any.
pub async fn current_version(pool: &SqlitePool) -> Result<Option<i64>> {
    init_migration_table(pool).await?;
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to get current schema version")?;
    Ok(version)
}
