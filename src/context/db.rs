// {{{ Imports
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::Context;
use include_dir::{include_dir, Dir};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite_migration::Migrations;
use tracing::info;

use crate::context::paths::NuzPaths;
// }}}

pub type SqlitePool = r2d2::Pool<SqliteConnectionManager>;

/// How long a connection waits on another writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub fn connect_db(paths: &NuzPaths) -> anyhow::Result<SqlitePool> {
	let db_path = paths.db_path();
	let mut conn = rusqlite::Connection::open(&db_path)
		.with_context(|| "Could not connect to sqlite database")?;
	conn.pragma_update(None, "journal_mode", "WAL")?;
	conn.pragma_update(None, "foreign_keys", "ON")?;

	// {{{ Run migrations
	static MIGRATIONS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/migrations");
	static MIGRATIONS: LazyLock<Migrations> = LazyLock::new(|| {
		Migrations::from_directory(&MIGRATIONS_DIR).expect("Could not load migrations")
	});

	MIGRATIONS
		.to_latest(&mut conn)
		.with_context(|| "Could not run migrations")?;
	info!(path = ?db_path, "Ensured db schema is up to date");
	// }}}

	// Pragmas are per-connection, so every pooled connection needs them too.
	let manager = SqliteConnectionManager::file(&db_path).with_init(|conn| {
		conn.pragma_update(None, "foreign_keys", "ON")?;
		conn.busy_timeout(BUSY_TIMEOUT)
	});

	Pool::new(manager).with_context(|| "Could not open sqlite database.")
}
