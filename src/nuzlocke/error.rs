use thiserror::Error;

/// Every way a tracker operation can fail.
///
/// All variants except [TrackerError::StorageUnavailable] are the user's
/// doing, and get reported back verbatim.
#[derive(Error, Debug)]
pub enum TrackerError {
	#[error("A run named '{0}' already exists")]
	DuplicateRun(String),

	#[error("No run named '{0}' exists")]
	RunNotFound(String),

	#[error("Run '{name}' still has {count} captured pokémon and cannot be deleted")]
	RunHasEntries { name: String, count: u32 },

	#[error("No active run. Use `run select <name>` to select one")]
	NoActiveRun,

	#[error("No pokémon named '{name}' in run '{run}'")]
	EntryNotFound { name: String, run: String },

	#[error("Invalid status '{0}'. Use 'alive' or 'dead'")]
	InvalidStatus(String),

	#[error("Could not find data for pokémon '{0}'")]
	ProviderNotFound(String),

	#[error("Invalid threshold input '{0}': bounds and points must be integers")]
	InvalidThresholdInput(String),

	#[error("No threshold with upper bound {0}")]
	ThresholdNotFound(i64),

	#[error("Cannot remove the last remaining threshold")]
	LastThreshold,

	#[error("Storage unavailable: {0}")]
	StorageUnavailable(#[source] anyhow::Error),
}

impl TrackerError {
	/// Whether this error was caused by the invoker rather than the system.
	#[inline]
	pub fn is_user_error(&self) -> bool {
		!matches!(self, Self::StorageUnavailable(_))
	}
}

impl From<rusqlite::Error> for TrackerError {
	fn from(value: rusqlite::Error) -> Self {
		Self::StorageUnavailable(value.into())
	}
}

impl From<r2d2::Error> for TrackerError {
	fn from(value: r2d2::Error) -> Self {
		Self::StorageUnavailable(value.into())
	}
}
