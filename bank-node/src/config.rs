// Copyright (C) Banking Engine Contributors
// SPDX-License-Identifier: GPL-3.0-or-later WITH Classpath-exception-2.0

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! The configuration surface enumerated in spec §6, built either from CLI
//! flags (see [`crate::cli::Cli`]) or directly by an embedder that links
//! `bank-node` as a library.

use bank_core::CurrencyCode;
use std::{collections::BTreeMap, path::PathBuf, time::Duration};

/// Everything the core needs to start: pool sizing, persistence root,
/// actor lifecycle, and the seed rates table.
#[derive(Clone, Debug)]
pub struct Config {
	/// Number of storage pool worker slots (`storage.workers`).
	pub storage_workers: usize,
	/// Root directory under which the `accounts/` and `exchange/` folders
	/// are created (`storage.base_folder`).
	pub storage_base_folder: PathBuf,
	/// How long an account actor may sit idle before it terminates
	/// (`actor.idle_timeout`).
	pub idle_timeout: Duration,
	/// How often the rates refresher snapshots the table to storage
	/// (`rates.refresh_interval`).
	pub rates_refresh_interval: Duration,
	/// The seed rates table, keyed by currency code against a pivot
	/// (`rates.seed_table`).
	pub rates_seed_table: BTreeMap<CurrencyCode, f64>,
	/// The currency new accounts default to when none is supplied
	/// (`account.default_currency`).
	pub default_currency: CurrencyCode,
	/// The floor new accounts default to in their default currency
	/// (`account.default_limit`).
	pub default_limit: i64,
}

/// Errors while assembling a [`Config`] from a rates file or CLI flags.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
	#[error("failed to read rates file {0}: {1}")]
	ReadRatesFile(PathBuf, std::io::Error),
	#[error("failed to parse rates file {0}: {1}")]
	ParseRatesFile(PathBuf, toml::de::Error),
	#[error("invalid currency code in rates file: {0}")]
	InvalidCurrency(#[from] bank_core::InvalidCurrencyCode),
}

impl Default for Config {
	fn default() -> Self {
		Self {
			storage_workers: 3,
			storage_base_folder: PathBuf::from("./data"),
			idle_timeout: Duration::from_secs(240),
			rates_refresh_interval: Duration::from_secs(3600),
			rates_seed_table: default_rates_seed_table(),
			default_currency: CurrencyCode::BRL,
			default_limit: 0,
		}
	}
}

/// The built-in static table the rates component seeds from absent an
/// operator-supplied `--rates-file`, per spec §4.5 ("seeds from a static
/// table keyed by currency code").
pub fn default_rates_seed_table() -> BTreeMap<CurrencyCode, f64> {
	BTreeMap::from([(CurrencyCode::BRL, 5.45), (CurrencyCode::USD, 1.0)])
}

/// A rates file is a flat TOML table of `CODE = rate` pairs, e.g.:
///
/// ```toml
/// BRL = 5.45
/// USD = 1.0
/// ```
pub fn load_rates_file(path: &std::path::Path) -> Result<BTreeMap<CurrencyCode, f64>, ConfigError> {
	let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadRatesFile(path.to_path_buf(), e))?;
	let table: BTreeMap<String, f64> =
		toml::from_str(&raw).map_err(|e| ConfigError::ParseRatesFile(path.to_path_buf(), e))?;
	table.into_iter().map(|(code, rate)| Ok((CurrencyCode::new(&code)?, rate))).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_config_matches_the_source_systems_defaults() {
		let config = Config::default();
		assert_eq!(config.storage_workers, 3);
		assert_eq!(config.idle_timeout, Duration::from_secs(240));
		assert_eq!(config.rates_refresh_interval, Duration::from_secs(3600));
		assert_eq!(config.default_currency, CurrencyCode::BRL);
	}

	#[test]
	fn rates_file_parses_a_flat_currency_table() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("rates.toml");
		std::fs::write(&path, "BRL = 5.45\nUSD = 1.0\n").unwrap();
		let table = load_rates_file(&path).unwrap();
		assert_eq!(table.get(&CurrencyCode::BRL), Some(&5.45));
		assert_eq!(table.get(&CurrencyCode::USD), Some(&1.0));
	}
}
