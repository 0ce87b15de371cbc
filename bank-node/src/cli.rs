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

//! Command-line flags for the `bank-node` binary. The HTTP edge that would
//! normally sit in front of this is out of scope (spec §1): this CLI only
//! configures and starts the core (rates ticker, storage pool, registry)
//! and then idles until interrupted.

use crate::config::{default_rates_seed_table, load_rates_file, Config, ConfigError};
use bank_core::CurrencyCode;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, clap::Parser)]
#[command(name = "bank-node", about = "Multi-currency banking account engine")]
pub struct Cli {
	/// Number of storage pool worker slots.
	#[arg(long, default_value_t = 3)]
	pub storage_workers: usize,

	/// Root directory under which `accounts/` and `exchange/` are created.
	#[arg(long, default_value = "./data")]
	pub storage_base_folder: PathBuf,

	/// Seconds an account actor may sit idle before it terminates.
	#[arg(long, default_value_t = 240)]
	pub idle_timeout_secs: u64,

	/// Seconds between rates-table refresh snapshots.
	#[arg(long, default_value_t = 3600)]
	pub rates_refresh_interval_secs: u64,

	/// Optional TOML file of `CODE = rate` pairs to seed the rates table
	/// from. Absent this flag, a small built-in table is used.
	#[arg(long)]
	pub rates_file: Option<PathBuf>,

	/// The currency a new account defaults to when none is supplied.
	#[arg(long, default_value = "BRL")]
	pub default_currency: String,

	/// The floor a new account's default-currency balance may reach.
	#[arg(long, default_value_t = 0)]
	pub default_limit: i64,
}

impl Cli {
	/// Resolves CLI flags into a [`Config`], reading `--rates-file` if one
	/// was given.
	pub fn into_config(self) -> Result<Config, ConfigError> {
		let default_currency = CurrencyCode::new(&self.default_currency)?;
		let rates_seed_table = match self.rates_file {
			Some(path) => load_rates_file(&path)?,
			None => default_rates_seed_table(),
		};
		Ok(Config {
			storage_workers: self.storage_workers,
			storage_base_folder: self.storage_base_folder,
			idle_timeout: Duration::from_secs(self.idle_timeout_secs),
			rates_refresh_interval: Duration::from_secs(self.rates_refresh_interval_secs),
			rates_seed_table,
			default_currency,
			default_limit: self.default_limit,
		})
	}
}
