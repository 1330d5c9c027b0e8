// {{{ Imports
use std::sync::Arc;
use std::time::Duration;

use config::ProviderConfig;
use db::{connect_db, SqlitePool};

use crate::commands::router::CommandError;
use crate::context::paths::NuzPaths;
use crate::nuzlocke::error::TrackerError;
use crate::nuzlocke::run::RunRegistry;
use crate::nuzlocke::threshold::ThresholdTable;
use crate::stats::StatProvider;
use crate::timed;
// }}}

pub mod config;
pub mod db;
pub mod paths;

// {{{ Common types
pub type Error = anyhow::Error;
pub type PoiseContext<'a> = poise::Context<'a, UserContext, Error>;
// }}}
// {{{ Error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	User,
	Internal,
}

#[derive(Debug)]
pub struct TaggedError {
	pub kind: ErrorKind,
	pub error: Error,
}

impl TaggedError {
	#[inline]
	pub fn new(kind: ErrorKind, error: Error) -> Self {
		Self { kind, error }
	}
}

/// Domain and parsing errors are the invoker's fault. Everything else
/// (storage, transport, ...) is ours.
impl<E: Into<Error>> From<E> for TaggedError {
	fn from(value: E) -> Self {
		let error = value.into();
		let is_user_error = if let Some(err) = error.downcast_ref::<TrackerError>() {
			err.is_user_error()
		} else if let Some(err) = error.downcast_ref::<CommandError>() {
			err.is_user_error()
		} else {
			false
		};

		let kind = if is_user_error {
			ErrorKind::User
		} else {
			ErrorKind::Internal
		};

		Self::new(kind, error)
	}
}
// }}}
// {{{ UserContext
/// Custom user data passed to all command functions
#[derive(Clone)]
pub struct UserContext {
	pub db: SqlitePool,
	pub paths: NuzPaths,

	pub runs: RunRegistry,
	pub thresholds: ThresholdTable,

	pub stats: Arc<dyn StatProvider>,
	pub provider_timeout: Duration,
}

impl UserContext {
	/// Opens the database at the given location and loads the
	/// threshold table out of it.
	pub fn new(paths: NuzPaths, config: &ProviderConfig) -> Result<Self, Error> {
		Self::with_provider(paths, config.build_provider(), config.timeout)
	}

	pub fn with_provider(
		paths: NuzPaths,
		stats: Arc<dyn StatProvider>,
		provider_timeout: Duration,
	) -> Result<Self, Error> {
		timed!("create_context", {
			let db = connect_db(&paths)?;
			let thresholds = ThresholdTable::load(db.clone())?;
			let runs = RunRegistry::new(db.clone());

			Ok(Self {
				db,
				paths,
				runs,
				thresholds,
				stats,
				provider_timeout,
			})
		})
	}
}
// }}}
