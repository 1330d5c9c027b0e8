//! Classification of base stat totals into point values.
//!
//! A table is a list of `(upper_bound, points)` pairs kept sorted by
//! upper bound. A stat total is worth the points of the first entry
//! whose bound is at least as big as the total.

// {{{ Imports
use std::fmt::Display;

use rusqlite::{Connection, TransactionBehavior};
use tracing::info;

use crate::context::db::SqlitePool;

use super::error::TrackerError;
// }}}

// {{{ Threshold entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdEntry {
	pub upper_bound: i64,
	pub points: i64,
}

impl ThresholdEntry {
	#[inline]
	pub const fn new(upper_bound: i64, points: i64) -> Self {
		Self {
			upper_bound,
			points,
		}
	}
}

impl Display for ThresholdEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} BST = {} points", self.upper_bound, self.points)
	}
}

/// The table every fresh database starts out with.
pub const DEFAULT_THRESHOLDS: [ThresholdEntry; 5] = [
	ThresholdEntry::new(350, 1),
	ThresholdEntry::new(465, 2),
	ThresholdEntry::new(515, 3),
	ThresholdEntry::new(579, 4),
	ThresholdEntry::new(9999, 5),
];
// }}}
// {{{ Thresholds
/// A sorted set of thresholds with unique upper bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Thresholds(Vec<ThresholdEntry>);

impl Thresholds {
	/// Builds a table out of arbitrary entries. When a bound appears
	/// more than once, the last occurrence wins.
	pub fn new(entries: impl IntoIterator<Item = ThresholdEntry>) -> Self {
		let mut result = Self::default();
		for entry in entries {
			result.set(entry.upper_bound, entry.points);
		}

		result
	}

	/// Returns the points of the first entry whose bound is `>= stat_total`,
	/// or `0` if the total is bigger than every bound.
	pub fn classify(&self, stat_total: i64) -> i64 {
		self.0
			.iter()
			.find(|entry| entry.upper_bound >= stat_total)
			.map_or(0, |entry| entry.points)
	}

	/// Inserts a new bound, or replaces the points of an existing one.
	pub fn set(&mut self, upper_bound: i64, points: i64) {
		match self.0.binary_search_by_key(&upper_bound, |e| e.upper_bound) {
			Ok(i) => self.0[i].points = points,
			Err(i) => self.0.insert(i, ThresholdEntry::new(upper_bound, points)),
		}
	}

	pub fn remove(&mut self, upper_bound: i64) -> Option<ThresholdEntry> {
		let i = self
			.0
			.binary_search_by_key(&upper_bound, |e| e.upper_bound)
			.ok()?;
		Some(self.0.remove(i))
	}

	#[inline]
	pub fn contains(&self, upper_bound: i64) -> bool {
		self.0
			.binary_search_by_key(&upper_bound, |e| e.upper_bound)
			.is_ok()
	}

	#[inline]
	pub fn entries(&self) -> &[ThresholdEntry] {
		&self.0
	}

	#[inline]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[inline]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
// }}}
// {{{ Threshold table
/// The persisted threshold table.
///
/// Nothing is cached in memory: every read goes to the database, so all
/// handles sharing a data directory (other bot processes, the cli) agree
/// on the table. Mutations run in a single statement or an `IMMEDIATE`
/// transaction, so readers never observe a half-applied change.
#[derive(Clone)]
pub struct ThresholdTable {
	db: SqlitePool,
}

impl ThresholdTable {
	/// Opens the table, seeding it with [DEFAULT_THRESHOLDS] if it's empty.
	pub fn load(db: SqlitePool) -> Result<Self, TrackerError> {
		let mut conn = db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		if read_thresholds(&tx)?.is_empty() {
			write_thresholds(&tx, &DEFAULT_THRESHOLDS)?;
			info!("Seeded threshold table with the default tiers");
		}

		tx.commit()?;
		drop(conn);

		Ok(Self { db })
	}

	/// Reads the whole table in one statement.
	pub fn snapshot(&self) -> Result<Thresholds, TrackerError> {
		Ok(read_thresholds(&*self.db.get()?)?)
	}

	#[inline]
	pub fn classify(&self, stat_total: i64) -> Result<i64, TrackerError> {
		Ok(self.snapshot()?.classify(stat_total))
	}

	/// The current table, in ascending order.
	#[inline]
	pub fn list_thresholds(&self) -> Result<Vec<ThresholdEntry>, TrackerError> {
		Ok(self.snapshot()?.0)
	}

	pub fn set_threshold(&self, upper_bound: i64, points: i64) -> Result<(), TrackerError> {
		self.db
			.get()?
			.prepare_cached(
				"
          INSERT INTO thresholds(upper_bound, points) VALUES (?,?)
          ON CONFLICT(upper_bound) DO UPDATE SET points=excluded.points
        ",
			)?
			.execute((upper_bound, points))?;

		info!(upper_bound, points, "Threshold set");
		Ok(())
	}

	pub fn remove_threshold(&self, upper_bound: i64) -> Result<ThresholdEntry, TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

		let mut thresholds = read_thresholds(&tx)?;
		if !thresholds.contains(upper_bound) {
			return Err(TrackerError::ThresholdNotFound(upper_bound));
		} else if thresholds.len() == 1 {
			return Err(TrackerError::LastThreshold);
		}

		tx.prepare_cached("DELETE FROM thresholds WHERE upper_bound=?")?
			.execute([upper_bound])?;
		tx.commit()?;

		let removed = thresholds
			.remove(upper_bound)
			.ok_or(TrackerError::ThresholdNotFound(upper_bound))?;
		info!(upper_bound, "Threshold removed");

		Ok(removed)
	}

	/// Replaces the whole table with [DEFAULT_THRESHOLDS].
	pub fn reset_thresholds(&self) -> Result<(), TrackerError> {
		let mut conn = self.db.get()?;
		let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
		tx.execute("DELETE FROM thresholds", ())?;
		write_thresholds(&tx, &DEFAULT_THRESHOLDS)?;
		tx.commit()?;

		info!("Threshold table reset to defaults");
		Ok(())
	}
}

fn read_thresholds(conn: &Connection) -> Result<Thresholds, rusqlite::Error> {
	let entries = conn
		.prepare_cached("SELECT upper_bound, points FROM thresholds ORDER BY upper_bound")?
		.query_map((), |row| {
			Ok(ThresholdEntry::new(
				row.get("upper_bound")?,
				row.get("points")?,
			))
		})?
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Thresholds::new(entries))
}

fn write_thresholds(conn: &Connection, entries: &[ThresholdEntry]) -> Result<(), rusqlite::Error> {
	let mut statement =
		conn.prepare_cached("INSERT INTO thresholds(upper_bound, points) VALUES (?,?)")?;
	for entry in entries {
		statement.execute((entry.upper_bound, entry.points))?;
	}

	Ok(())
}
// }}}
// {{{ Tests
#[cfg(test)]
mod threshold_tests {
	use proptest::prelude::*;

	use super::*;
	use crate::context::testing::get_test_db;

	fn sample_table() -> Thresholds {
		Thresholds::new([
			ThresholdEntry::new(200, 1),
			ThresholdEntry::new(300, 2),
			ThresholdEntry::new(400, 3),
			ThresholdEntry::new(9999, 4),
		])
	}

	#[test]
	fn classify_picks_first_bound_at_least_total() {
		let table = sample_table();
		assert_eq!(table.classify(150), 1);
		assert_eq!(table.classify(200), 1);
		assert_eq!(table.classify(201), 2);
		assert_eq!(table.classify(400), 3);
		assert_eq!(table.classify(9999), 4);
	}

	#[test]
	fn classify_falls_through_to_zero() {
		assert_eq!(sample_table().classify(50000), 0);
		assert_eq!(Thresholds::default().classify(1), 0);
	}

	#[test]
	fn set_replaces_existing_bound() {
		let mut table = sample_table();
		table.set(300, 7);

		assert_eq!(table.len(), 4);
		assert_eq!(table.classify(250), 7);
	}

	#[test]
	fn set_inserts_in_order() {
		let mut table = sample_table();
		table.set(250, 9);
		table.set(50, 0);

		let bounds: Vec<_> = table.entries().iter().map(|e| e.upper_bound).collect();
		assert_eq!(bounds, vec![50, 200, 250, 300, 400, 9999]);
		assert_eq!(table.classify(220), 9);
		assert_eq!(table.classify(10), 0);
	}

	#[test]
	fn new_keeps_last_duplicate() {
		let table = Thresholds::new([
			ThresholdEntry::new(500, 1),
			ThresholdEntry::new(100, 2),
			ThresholdEntry::new(500, 3),
		]);

		assert_eq!(
			table.entries(),
			&[ThresholdEntry::new(100, 2), ThresholdEntry::new(500, 3)]
		);
	}

	proptest! {
		#[test]
		fn always_sorted_and_unique(ops in prop::collection::vec((-1000i64..1000, -10i64..10), 0..64)) {
			let mut table = Thresholds::default();
			for (bound, points) in ops {
				table.set(bound, points);

				let entries = table.entries();
				prop_assert!(entries.windows(2).all(|w| w[0].upper_bound < w[1].upper_bound));
				prop_assert_eq!(table.classify(bound), points);
			}
		}
	}

	#[test]
	fn load_seeds_defaults() -> anyhow::Result<()> {
		let (db, _guard) = get_test_db()?;
		let table = ThresholdTable::load(db)?;

		assert_eq!(table.list_thresholds()?, DEFAULT_THRESHOLDS.to_vec());
		assert_eq!(table.classify(318)?, 1);
		assert_eq!(table.classify(530)?, 4);
		assert_eq!(table.classify(680)?, 5);
		Ok(())
	}

	#[test]
	fn mutations_survive_reload() -> anyhow::Result<()> {
		let (db, _guard) = get_test_db()?;
		let table = ThresholdTable::load(db.clone())?;

		table.set_threshold(250, 0)?;
		table.set_threshold(465, 3)?;
		table.remove_threshold(515)?;

		let reloaded = ThresholdTable::load(db)?;
		assert_eq!(reloaded.list_thresholds()?, table.list_thresholds()?);
		assert_eq!(
			reloaded.list_thresholds()?,
			vec![
				ThresholdEntry::new(250, 0),
				ThresholdEntry::new(350, 1),
				ThresholdEntry::new(465, 3),
				ThresholdEntry::new(579, 4),
				ThresholdEntry::new(9999, 5),
			]
		);
		Ok(())
	}

	#[test]
	fn remove_rejects_unknown_and_last() -> anyhow::Result<()> {
		let (db, _guard) = get_test_db()?;
		let table = ThresholdTable::load(db)?;

		assert!(matches!(
			table.remove_threshold(123),
			Err(TrackerError::ThresholdNotFound(123))
		));

		for entry in &DEFAULT_THRESHOLDS[1..] {
			table.remove_threshold(entry.upper_bound)?;
		}

		assert!(matches!(
			table.remove_threshold(350),
			Err(TrackerError::LastThreshold)
		));
		assert_eq!(table.list_thresholds()?, vec![ThresholdEntry::new(350, 1)]);
		Ok(())
	}

	#[test]
	fn reset_restores_defaults() -> anyhow::Result<()> {
		let (db, _guard) = get_test_db()?;
		let table = ThresholdTable::load(db.clone())?;

		table.set_threshold(100, 42)?;
		table.reset_thresholds()?;

		assert_eq!(table.list_thresholds()?, DEFAULT_THRESHOLDS.to_vec());
		assert_eq!(
			ThresholdTable::load(db)?.list_thresholds()?,
			DEFAULT_THRESHOLDS.to_vec()
		);
		Ok(())
	}

	#[test]
	fn handles_sharing_a_store_agree() -> anyhow::Result<()> {
		let (db, _guard) = get_test_db()?;
		let bot = ThresholdTable::load(db.clone())?;
		let cli = ThresholdTable::load(db)?;

		cli.set_threshold(350, 10)?;
		cli.set_threshold(100, 7)?;

		assert_eq!(bot.list_thresholds()?, cli.list_thresholds()?);
		assert_eq!(bot.classify(308)?, 10);
		assert_eq!(bot.classify(80)?, 7);

		assert_eq!(bot.remove_threshold(100)?, ThresholdEntry::new(100, 7));
		assert_eq!(cli.classify(80)?, 10);

		cli.reset_thresholds()?;
		assert_eq!(bot.list_thresholds()?, DEFAULT_THRESHOLDS.to_vec());
		Ok(())
	}

	#[test]
	fn readers_only_see_sorted_tables() -> anyhow::Result<()> {
		let (db, _guard) = get_test_db()?;
		let table = ThresholdTable::load(db)?;

		let writers = (0..4i64)
			.map(|w| {
				let table = table.clone();
				std::thread::spawn(move || -> Result<(), TrackerError> {
					for i in 0..25 {
						let bound = 1000 - (i * 4 + w) * 7;
						table.set_threshold(bound, w)?;
						if i % 5 == 4 {
							table.remove_threshold(bound)?;
						}
					}
					Ok(())
				})
			})
			.collect::<Vec<_>>();

		let readers = (0..4)
			.map(|_| {
				let table = table.clone();
				std::thread::spawn(move || -> Result<(), TrackerError> {
					for _ in 0..50 {
						let entries = table.list_thresholds()?;
						assert!(!entries.is_empty());
						assert!(entries
							.windows(2)
							.all(|w| w[0].upper_bound < w[1].upper_bound));
					}
					Ok(())
				})
			})
			.collect::<Vec<_>>();

		for handle in writers.into_iter().chain(readers) {
			handle.join().expect("thread panicked")?;
		}

		// Five defaults plus 4 * 20 surviving bounds
		assert_eq!(table.list_thresholds()?.len(), 85);
		Ok(())
	}
}
// }}}
