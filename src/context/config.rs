//! Settings for the stat provider, read from the environment.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;

use crate::stats::fixed::FixedStats;
use crate::stats::pokemondb::{PokemonDb, DEFAULT_POKEMONDB_URL};
use crate::stats::StatProvider;

use super::paths::get_var;

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct ProviderConfig {
	pub url: String,

	/// Lookups taking longer than this are reported as not found.
	pub timeout: Duration,

	/// Skips the network entirely, making every lookup fail.
	pub offline: bool,
}

impl Default for ProviderConfig {
	fn default() -> Self {
		Self {
			url: DEFAULT_POKEMONDB_URL.to_owned(),
			timeout: DEFAULT_PROVIDER_TIMEOUT,
			offline: false,
		}
	}
}

impl ProviderConfig {
	/// Reads `$NUZBOT_PROVIDER_URL`, `$NUZBOT_PROVIDER_TIMEOUT_SECS` and
	/// `$NUZBOT_OFFLINE`, falling back to the defaults for missing ones.
	pub fn from_env() -> anyhow::Result<Self> {
		let mut config = Self::default();

		if let Ok(url) = get_var("NUZBOT_PROVIDER_URL") {
			config.url = url;
		}

		if let Ok(secs) = get_var("NUZBOT_PROVIDER_TIMEOUT_SECS") {
			let secs = secs
				.parse::<u64>()
				.with_context(|| format!("$NUZBOT_PROVIDER_TIMEOUT_SECS is not a number: {secs}"))?;
			config.timeout = Duration::from_secs(secs);
		}

		config.offline = get_var("NUZBOT_OFFLINE").unwrap_or_default() == "1";

		Ok(config)
	}

	pub fn build_provider(&self) -> Arc<dyn StatProvider> {
		if self.offline {
			Arc::new(FixedStats::default())
		} else {
			Arc::new(PokemonDb::new(&self.url))
		}
	}
}
