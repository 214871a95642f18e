//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Chains table
            CREATE TABLE IF NOT EXISTS chains (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                description TEXT NOT NULL DEFAULT '',
                email TEXT NOT NULL DEFAULT '',
                phone TEXT NOT NULL DEFAULT '',
                website TEXT NOT NULL DEFAULT '',
                sales_contact TEXT NOT NULL DEFAULT '',
                price_range INTEGER NOT NULL DEFAULT 2,
                auto_assign INTEGER NOT NULL DEFAULT 0,
                recipient_email TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            -- Titles are unique regardless of casing
            CREATE UNIQUE INDEX IF NOT EXISTS idx_chains_title_nocase
                ON chains(title COLLATE NOCASE);

            -- Principals table
            CREATE TABLE IF NOT EXISTS principals (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                username TEXT NOT NULL,
                is_reviewer INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            -- Hotels table
            CREATE TABLE IF NOT EXISTS hotels (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                slug TEXT NOT NULL UNIQUE,
                location TEXT,
                photo TEXT,
                is_active INTEGER NOT NULL DEFAULT 0,
                chain_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (chain_id) REFERENCES chains(id) ON DELETE RESTRICT
            );

            -- Derived sibling relation (hotels sharing a chain)
            CREATE TABLE IF NOT EXISTS related_hotels (
                hotel_id TEXT NOT NULL,
                related_id TEXT NOT NULL,
                PRIMARY KEY (hotel_id, related_id),
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE,
                FOREIGN KEY (related_id) REFERENCES hotels(id) ON DELETE CASCADE
            );

            -- Drafts table
            CREATE TABLE IF NOT EXISTS drafts (
                id TEXT PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                hotel_id TEXT NOT NULL,
                created_by TEXT NOT NULL,
                name TEXT,
                location TEXT,
                photo TEXT,
                chain_id TEXT,
                is_active INTEGER,
                status TEXT NOT NULL DEFAULT 'pending',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (hotel_id) REFERENCES hotels(id) ON DELETE CASCADE,
                FOREIGN KEY (created_by) REFERENCES principals(id),
                FOREIGN KEY (chain_id) REFERENCES chains(id) ON DELETE RESTRICT
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            -- Chain indexes
            CREATE INDEX IF NOT EXISTS idx_chains_auto_assign ON chains(auto_assign);

            -- Hotel indexes
            CREATE INDEX IF NOT EXISTS idx_hotels_chain ON hotels(chain_id);
            CREATE INDEX IF NOT EXISTS idx_hotels_is_active ON hotels(is_active);
            CREATE INDEX IF NOT EXISTS idx_hotels_location ON hotels(location);

            -- Sibling indexes
            CREATE INDEX IF NOT EXISTS idx_related_hotels_related ON related_hotels(related_id);

            -- Draft indexes
            CREATE INDEX IF NOT EXISTS idx_drafts_hotel ON drafts(hotel_id);
            CREATE INDEX IF NOT EXISTS idx_drafts_status ON drafts(status);
            CREATE INDEX IF NOT EXISTS idx_drafts_created ON drafts(created_at);

            -- Principal indexes
            CREATE INDEX IF NOT EXISTS idx_principals_reviewer ON principals(is_reviewer);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}
