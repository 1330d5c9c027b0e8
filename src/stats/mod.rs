//! Lookup of base stat totals from an external source.

use async_trait::async_trait;

pub mod fixed;
pub mod pokemondb;

// {{{ Stat record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatRecord {
	/// The name as spelled by the source.
	pub name: String,
	pub base_stat_total: u32,

	/// At most two types, primary first.
	pub types: Vec<String>,
}
// }}}
// {{{ Provider
/// Something that can look up the stats of a pokémon by name.
///
/// Implementations are free to fail in any way they like. Callers treat
/// every failure as "not found".
#[async_trait]
pub trait StatProvider: Send + Sync {
	async fn fetch_stats(&self, name: &str) -> anyhow::Result<StatRecord>;
}
// }}}
// {{{ Slugs
/// Turns a display name into the form used for lookups, so that
/// `Mr. Mime` becomes `mr-mime` and `Farfetch'd` becomes `farfetchd`.
pub fn slug(name: &str) -> String {
	name.split_whitespace()
		.collect::<Vec<_>>()
		.join("-")
		.chars()
		.filter(|c| !matches!(c, '.' | '\'' | ':' | '’'))
		.flat_map(char::to_lowercase)
		.map(|c| match c {
			'é' => 'e',
			'♀' => 'f',
			'♂' => 'm',
			c => c,
		})
		.collect()
}

#[cfg(test)]
mod slug_tests {
	use super::*;

	#[test]
	fn slugs_match_pokedex_urls() {
		assert_eq!(slug("Tepig"), "tepig");
		assert_eq!(slug("  Mr. Mime "), "mr-mime");
		assert_eq!(slug("Farfetch'd"), "farfetchd");
		assert_eq!(slug("Type: Null"), "type-null");
		assert_eq!(slug("Nidoran♀"), "nidoranf");
		assert_eq!(slug("Flabébé"), "flabebe");
		assert_eq!(slug("Tapu   Koko"), "tapu-koko");
	}
}
// }}}
