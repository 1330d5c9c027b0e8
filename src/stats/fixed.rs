use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;

use super::{slug, StatProvider, StatRecord};

/// A provider backed by an in-memory table, used for tests and for
/// running without network access.
#[derive(Debug, Clone, Default)]
pub struct FixedStats {
	records: HashMap<String, StatRecord>,
}

impl FixedStats {
	pub fn with(mut self, name: &str, base_stat_total: u32, types: &[&str]) -> Self {
		self.records.insert(
			slug(name),
			StatRecord {
				name: name.to_owned(),
				base_stat_total,
				types: types.iter().map(|t| (*t).to_owned()).collect(),
			},
		);
		self
	}
}

#[async_trait]
impl StatProvider for FixedStats {
	async fn fetch_stats(&self, name: &str) -> anyhow::Result<StatRecord> {
		self.records
			.get(&slug(name))
			.cloned()
			.ok_or_else(|| anyhow!("No fixed record for '{name}'"))
	}
}
