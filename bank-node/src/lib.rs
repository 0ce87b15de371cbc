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

//! The library entry point: wires `bank-storage`'s pool, `bank-actor`'s
//! rates table and registry together in the order spec §6 requires (rates
//! ticker, then storage pool, then registry), and hands back the
//! [`Registry`] an embedder (the HTTP edge, a test harness, ...) drives.
//!
//! This crate deliberately does not itself speak HTTP: per spec §1 that
//! edge is an external collaborator, out of scope for the core.

pub mod cli;
pub mod config;

pub use bank_actor::{ActorError, RatesHandle, Registry};
pub use bank_core::InitialArgs;
pub use config::{Config, ConfigError};

/// A fully wired instance of the core: the storage pool, the process-wide
/// rates table (with its refresher already ticking), and the account
/// registry, all sharing `config`'s settings.
pub struct BankNode {
	config: Config,
	registry: Registry,
}

impl BankNode {
	/// Starts the rates ticker, the storage pool, and the registry, in that
	/// order (spec §6, "CLI / runtime surface").
	pub fn start(config: Config) -> Self {
		let storage = bank_storage::StoragePool::new(config.storage_workers, &config.storage_base_folder);
		let rates = RatesHandle::new(config.rates_seed_table.clone());
		bank_actor::spawn_refresher(rates.clone(), storage.clone(), config.rates_refresh_interval);
		let registry = Registry::new(storage, rates, config.idle_timeout);
		tracing::info!(
			target: "bank-node",
			workers = config.storage_workers,
			idle_timeout_secs = config.idle_timeout.as_secs(),
			"banking engine started",
		);
		Self { config, registry }
	}

	/// The registry callers use to reach (or lazily spawn) an account's
	/// actor.
	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// `InitialArgs` built from this node's configured defaults, for a
	/// caller that wants to open an account with no explicit starting
	/// balances or currency.
	pub fn default_initial_args(&self) -> InitialArgs {
		InitialArgs {
			default_currency: self.config.default_currency,
			limit: self.config.default_limit,
			balances: Default::default(),
		}
	}

	pub fn config(&self) -> &Config {
		&self.config
	}
}

/// Installs a `tracing_subscriber::fmt` subscriber honoring `RUST_LOG`,
/// defaulting to `info` when the variable is unset or invalid.
pub fn init_tracing() {
	use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
	let _ = tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).try_init();
}

#[cfg(test)]
mod tests {
	use super::*;
	use bank_core::CurrencyCode;

	#[tokio::test]
	async fn start_wires_a_working_registry() {
		let dir = tempfile::tempdir().unwrap();
		let mut config = Config::default();
		config.storage_base_folder = dir.path().to_path_buf();
		config.idle_timeout = std::time::Duration::from_secs(240);

		let node = BankNode::start(config);
		let handle = node.registry().server_process(1, node.default_initial_args());
		handle.deposit(1_000, CurrencyCode::BRL, None).await.unwrap();
		assert_eq!(handle.balance(CurrencyCode::BRL).await.unwrap(), 1_000);
	}
}
