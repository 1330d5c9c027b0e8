//! Runs, the captures recorded in them, and the active run slot.
//!
//! Every mutation happens inside a single `IMMEDIATE` transaction, which
//! makes sqlite serialize writers across all pooled connections.

// {{{ Imports
use std::fmt::Display;

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row, TransactionBehavior};
use tracing::info;

use crate::context::db::SqlitePool;

use super::entry::{CapturedEntry, NewEntry, Status};
use super::error::TrackerError;
// }}}

// {{{ Run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
	pub id: u32,
	pub name: String,
	pub generation: String,
	pub created_at: NaiveDateTime,
}

impl Run {
	#[inline]
	fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
		Ok(Self {
			id: row.get("id")?,
			name: row.get("name")?,
			generation: row.get("generation")?,
			created_at: row.get("created_at")?,
		})
	}

	fn by_name(conn: &Connection, name: &str) -> Result<Option<Self>, rusqlite::Error> {
		conn.prepare_cached("SELECT * FROM runs WHERE name=?")?
			.query_row([name], Self::from_row)
			.optional()
	}

	fn require(conn: &Connection, name: &str) -> Result<Self, TrackerError> {
		Self::by_name(conn, name)?.ok_or_else(|| TrackerError::RunNotFound(name.to_owned()))
	}
}

impl Display for Run {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Name: {}, Generation: {}", self.name, self.generation)
	}
}
// }}}
// {{{ Registry
/// Owns every run, every captured entry, and the active run pointer.
#[derive(Clone)]
pub struct RunRegistry {
	db: SqlitePool,
}

impl RunRegistry {
	#[inline]
	pub fn new(db: SqlitePool) -> Self {
		Self { db }
	}

	// {{{ Runs
	pub fn add_run(&self, name: &str, generation: &str) -> Result<Run, TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		if Run::by_name(&tx, name)?.is_some() {
			return Err(TrackerError::DuplicateRun(name.to_owned()));
		}

		let run = tx
			.prepare_cached("INSERT INTO runs(name, generation) VALUES (?,?) RETURNING *")?
			.query_row((name, generation), Run::from_row)?;

		tx.commit()?;
		info!(run = %run.name, generation = %run.generation, "Run added");

		Ok(run)
	}

	/// Deletes an empty run. Runs which still hold entries are refused.
	///
	/// Deleting the active run also clears the active slot.
	pub fn delete_run(&self, name: &str) -> Result<Run, TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		let run = Run::require(&tx, name)?;
		let count: u32 = tx
			.prepare_cached("SELECT COUNT(*) FROM entries WHERE run_id=?")?
			.query_row([run.id], |row| row.get(0))?;

		if count > 0 {
			return Err(TrackerError::RunHasEntries {
				name: run.name,
				count,
			});
		}

		tx.prepare_cached("DELETE FROM runs WHERE id=?")?
			.execute([run.id])?;

		tx.commit()?;
		info!(run = %run.name, "Run deleted");

		Ok(run)
	}

	/// Points the active slot at the given run. The slot is a single row
	/// which gets overwritten in place, so there's never more than one
	/// active run.
	pub fn select_run(&self, name: &str) -> Result<Run, TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		let run = Run::require(&tx, name)?;
		tx.prepare_cached(
			"
        INSERT INTO active_run(id, run_id) VALUES (0, ?)
        ON CONFLICT(id) DO UPDATE SET run_id=excluded.run_id
      ",
		)?
		.execute([run.id])?;

		tx.commit()?;
		info!(run = %run.name, "Run selected");

		Ok(run)
	}

	pub fn get_active_run(&self) -> Result<Option<Run>, TrackerError> {
		let run = self
			.db
			.get()?
			.prepare_cached(
				"
          SELECT r.* FROM active_run a
          JOIN runs r ON r.id = a.run_id
        ",
			)?
			.query_row((), Run::from_row)
			.optional()?;

		Ok(run)
	}

	/// Like [Self::get_active_run], except a missing active run is an error.
	pub fn require_active_run(&self) -> Result<Run, TrackerError> {
		self.get_active_run()?.ok_or(TrackerError::NoActiveRun)
	}

	pub fn get_run(&self, name: &str) -> Result<Run, TrackerError> {
		Run::require(&*self.db.get()?, name)
	}

	pub fn list_runs(&self) -> Result<Vec<Run>, TrackerError> {
		let runs = self
			.db
			.get()?
			.prepare_cached("SELECT * FROM runs ORDER BY id")?
			.query_map((), Run::from_row)?
			.collect::<Result<Vec<_>, _>>()?;

		Ok(runs)
	}
	// }}}
	// {{{ Entries
	/// Appends an entry to the given run, starting out alive.
	pub fn add_captured_entry(
		&self,
		run_name: &str,
		entry: NewEntry,
	) -> Result<CapturedEntry, TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		let run = Run::require(&tx, run_name)?;
		let entry = insert_entry(&tx, &run, &entry)?;

		tx.commit()?;
		Ok(entry)
	}

	/// Like [Self::add_captured_entry], except the run is referenced by id.
	///
	/// Fails with [TrackerError::RunNotFound] once the run has been deleted,
	/// even if a run with the same name was created since.
	pub fn add_captured_entry_by_id(
		&self,
		run: &Run,
		entry: NewEntry,
	) -> Result<CapturedEntry, TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		let run = tx
			.prepare_cached("SELECT * FROM runs WHERE id=?")?
			.query_row([run.id], Run::from_row)
			.optional()?
			.ok_or_else(|| TrackerError::RunNotFound(run.name.clone()))?;
		let entry = insert_entry(&tx, &run, &entry)?;

		tx.commit()?;
		Ok(entry)
	}

	/// Lists the entries of a run in the order they were added.
	pub fn list_entries(&self, run_name: &str) -> Result<Vec<CapturedEntry>, TrackerError> {
		let conn = self.db.get()?;
		let run = Run::require(&conn, run_name)?;

		let entries = conn
			.prepare_cached("SELECT * FROM entries WHERE run_id=? ORDER BY id")?
			.query_map([run.id], CapturedEntry::from_row)?
			.collect::<Result<Vec<_>, _>>()?;

		Ok(entries)
	}

	/// Sets the status of every entry with the given name in the given
	/// run, returning how many entries matched.
	pub fn update_status(
		&self,
		entry_name: &str,
		run_name: &str,
		status: Status,
	) -> Result<usize, TrackerError> {
		let changed = self
			.db
			.get()?
			.prepare_cached(
				"
          UPDATE entries SET status=?
          WHERE name=?
          AND run_id=(SELECT id FROM runs WHERE name=?)
        ",
			)?
			.execute((status, entry_name, run_name))?;

		if changed == 0 {
			return Err(TrackerError::EntryNotFound {
				name: entry_name.to_owned(),
				run: run_name.to_owned(),
			});
		}

		info!(run = run_name, name = entry_name, %status, "Status updated");
		Ok(changed)
	}
	// }}}
}
// }}}
// {{{ Entry insertion
fn insert_entry(
	conn: &Connection,
	run: &Run,
	entry: &NewEntry,
) -> Result<CapturedEntry, TrackerError> {
	let entry = conn
		.prepare_cached(
			"
        INSERT INTO entries(run_id, name, form, route, base_stat_total, points, status)
        VALUES (?,?,?,?,?,?,?)
        RETURNING *
      ",
		)?
		.query_row(
			(
				run.id,
				&entry.name,
				&entry.form,
				&entry.route,
				entry.base_stat_total,
				entry.points,
				Status::Alive,
			),
			CapturedEntry::from_row,
		)?;

	info!(
		run = %run.name,
		name = %entry.name,
		bst = entry.base_stat_total,
		points = entry.points,
		"Entry added"
	);

	Ok(entry)
}
// }}}
