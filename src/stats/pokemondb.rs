//! Scrapes base stat totals off the pokedex pages of pokemondb.net.

// {{{ Imports
use std::sync::LazyLock;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use regex::Regex;
use tracing::debug;

use super::{slug, StatProvider, StatRecord};
// }}}

pub const DEFAULT_POKEMONDB_URL: &str = "https://pokemondb.net/pokedex";

// {{{ Provider
#[derive(Debug, Clone)]
pub struct PokemonDb {
	http_client: reqwest::Client,
	base_url: String,
}

impl PokemonDb {
	pub fn new(base_url: &str) -> Self {
		Self {
			http_client: reqwest::Client::new(),
			base_url: base_url.trim_end_matches('/').to_owned(),
		}
	}

	#[inline]
	pub fn page_url(&self, name: &str) -> String {
		format!("{}/{}", self.base_url, slug(name))
	}
}

impl Default for PokemonDb {
	fn default() -> Self {
		Self::new(DEFAULT_POKEMONDB_URL)
	}
}

#[async_trait]
impl StatProvider for PokemonDb {
	async fn fetch_stats(&self, name: &str) -> anyhow::Result<StatRecord> {
		let url = self.page_url(name);
		debug!(%url, "Fetching pokedex page");

		let page = self
			.http_client
			.get(&url)
			.send()
			.await
			.context("Failed to send request")?
			.error_for_status()
			.context("Request has non-ok status")?
			.text()
			.await
			.context("Failed to read response body")?;

		parse_page(name, &page)
	}
}
// }}}
// {{{ Page parsing
static TITLE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"<h1[^>]*>\s*([^<]+?)\s*</h1>").unwrap());
static TOTAL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<td class="cell-num cell-total"[^>]*>\s*(?:<b>)?\s*(\d+)"#).unwrap()
});
static TYPE_CELL: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?s)<th[^>]*>\s*Type\s*</th>\s*<td[^>]*>(.*?)</td>"#).unwrap()
});
static TYPE_LINK: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"<a[^>]*class="type-icon[^"]*"[^>]*>\s*([^<]+?)\s*</a>"#).unwrap()
});

/// Extracts a [StatRecord] out of a pokedex page.
///
/// Pages describing multiple forms contain multiple stat tables. The
/// first one always belongs to the default form.
pub fn parse_page(requested_name: &str, page: &str) -> anyhow::Result<StatRecord> {
	let base_stat_total = TOTAL
		.captures(page)
		.ok_or_else(|| anyhow!("No stat total found on the page for '{requested_name}'"))?[1]
		.parse::<u32>()
		.context("Stat total is not a number")?;

	let name = TITLE
		.captures(page)
		.map_or_else(|| requested_name.trim().to_owned(), |c| c[1].to_owned());

	let types = TYPE_CELL
		.captures(page)
		.map(|cell| {
			TYPE_LINK
				.captures_iter(&cell[1])
				.take(2)
				.map(|link| link[1].to_owned())
				.collect()
		})
		.unwrap_or_default();

	Ok(StatRecord {
		name,
		base_stat_total,
		types,
	})
}
// }}}
