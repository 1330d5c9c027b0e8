//! Recording a new capture into the active run.

// {{{ Imports
use std::time::Duration;

use tracing::warn;

use crate::context::UserContext;
use crate::stats::{StatProvider, StatRecord};
use crate::timed;

use super::entry::{CapturedEntry, NewEntry};
use super::error::TrackerError;
use super::run::Run;
// }}}

#[derive(Debug, Clone)]
pub struct CaptureRequest {
	pub name: String,
	pub route: String,
	pub form: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Capture {
	pub run: Run,
	pub entry: CapturedEntry,
	pub record: StatRecord,
}

/// Looks up the stats of a pokémon, giving up after `timeout`. Every
/// kind of failure is reported as [TrackerError::ProviderNotFound].
pub async fn fetch_stats(
	provider: &dyn StatProvider,
	timeout: Duration,
	name: &str,
) -> Result<StatRecord, TrackerError> {
	let result = timed!("fetch_stats", {
		tokio::time::timeout(timeout, provider.fetch_stats(name)).await
	});

	match result {
		Ok(Ok(record)) => Ok(record),
		Ok(Err(error)) => {
			warn!(name, ?error, "Stat lookup failed");
			Err(TrackerError::ProviderNotFound(name.to_owned()))
		}
		Err(_) => {
			warn!(name, ?timeout, "Stat lookup timed out");
			Err(TrackerError::ProviderNotFound(name.to_owned()))
		}
	}
}

/// Adds a pokémon to the active run.
///
/// The stats are fetched before touching any shared state, and nothing
/// gets written if the lookup fails. Points are computed against the
/// stored threshold table as it is right now, and never recomputed
/// afterwards. The entry goes to the run that was active when the command
/// started, so deleting that run mid-lookup fails the capture.
pub async fn capture(ctx: &UserContext, request: CaptureRequest) -> Result<Capture, TrackerError> {
	let run = ctx.runs.require_active_run()?;
	let record = fetch_stats(ctx.stats.as_ref(), ctx.provider_timeout, &request.name).await?;

	let base_stat_total = i64::from(record.base_stat_total);
	let points = ctx.thresholds.classify(base_stat_total)?;

	let entry = ctx.runs.add_captured_entry_by_id(
		&run,
		NewEntry {
			name: record.name.clone(),
			form: request.form,
			route: request.route,
			base_stat_total,
			points,
		},
	)?;

	Ok(Capture { run, entry, record })
}

// }}}
