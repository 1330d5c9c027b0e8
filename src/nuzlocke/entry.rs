// {{{ Imports
use std::fmt::Display;
use std::str::FromStr;

use chrono::NaiveDateTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;

use super::error::TrackerError;
// }}}

// {{{ Status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, poise::ChoiceParameter)]
pub enum Status {
	#[default]
	Alive,
	Dead,
}

impl Status {
	pub const STATUSES: [Status; 2] = [Self::Alive, Self::Dead];
	pub const STATUS_DB_STRINGS: [&'static str; 2] = ["alive", "dead"];
	pub const STATUS_STRINGS: [&'static str; 2] = ["Alive", "Dead"];

	#[inline]
	pub fn to_index(self) -> usize {
		self as usize
	}
}

impl Display for Status {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", Self::STATUS_STRINGS[self.to_index()])
	}
}

impl FromStr for Status {
	type Err = TrackerError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let lower = s.trim().to_lowercase();
		Self::STATUS_DB_STRINGS
			.iter()
			.position(|db_string| *db_string == lower)
			.map(|i| Self::STATUSES[i])
			.ok_or_else(|| TrackerError::InvalidStatus(s.to_owned()))
	}
}

impl ToSql for Status {
	fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
		Ok(ToSqlOutput::from(Self::STATUS_DB_STRINGS[self.to_index()]))
	}
}

impl FromSql for Status {
	fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
		let text = value.as_str()?;
		text.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
	}
}
// }}}
// {{{ New entry
/// Everything needed to record a capture, before it gets an id.
#[derive(Debug, Clone)]
pub struct NewEntry {
	pub name: String,
	pub form: Option<String>,
	pub route: String,
	pub base_stat_total: i64,
	pub points: i64,
}
// }}}
// {{{ Captured entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEntry {
	pub id: u32,
	pub run_id: u32,
	pub name: String,
	pub form: Option<String>,
	pub route: String,
	pub base_stat_total: i64,

	/// Computed once when the entry was added. Later changes to the
	/// threshold table do not affect it.
	pub points: i64,
	pub status: Status,
	pub created_at: NaiveDateTime,
}

impl CapturedEntry {
	#[inline]
	pub fn from_row(row: &Row<'_>) -> Result<Self, rusqlite::Error> {
		Ok(Self {
			id: row.get("id")?,
			run_id: row.get("run_id")?,
			name: row.get("name")?,
			form: row.get("form")?,
			route: row.get("route")?,
			base_stat_total: row.get("base_stat_total")?,
			points: row.get("points")?,
			status: row.get("status")?,
			created_at: row.get("created_at")?,
		})
	}

	#[inline]
	pub fn is_alive(&self) -> bool {
		self.status == Status::Alive
	}
}

impl Display for CapturedEntry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Name: {}", self.name)?;
		if let Some(form) = &self.form {
			write!(f, " ({form})")?;
		}

		write!(
			f,
			", Route: {}, BST: {}, Points: {}, Status: {}",
			self.route, self.base_stat_total, self.points, self.status
		)
	}
}
// }}}
