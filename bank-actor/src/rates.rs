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

//! The process-wide rates table and its periodic refresher.
//!
//! `bank_core::RatesTable` is a pure value; this module is the single
//! concurrent writer around it, read-shared by every account actor that
//! calls `exchange_balances`.

use bank_core::{CurrencyCode, RatesError, RatesTable, Timestamp};
use bank_storage::StoragePool;
use parking_lot::RwLock;
use std::{collections::BTreeMap, sync::Arc, time::Duration};

/// Cheaply cloneable handle to the shared rates table.
#[derive(Clone)]
pub struct RatesHandle(Arc<RwLock<RatesTable>>);

impl RatesHandle {
	pub fn new(seed: BTreeMap<CurrencyCode, f64>) -> Self {
		Self(Arc::new(RwLock::new(RatesTable::new(seed))))
	}

	/// `(new_amount, exchange_rate)` for converting `amount` of `current`
	/// into `new`. Takes the read lock only for the duration of the lookup.
	pub fn convert(&self, amount: i64, current: CurrencyCode, new: CurrencyCode) -> Result<(i64, f64), RatesError> {
		self.0.read().convert(amount, current, new)
	}

	/// Replaces the whole table. The single writer: only the refresher (or
	/// an operator-triggered reload) calls this.
	pub fn replace(&self, seed: BTreeMap<CurrencyCode, f64>) {
		self.0.write().replace(seed);
	}

	/// A cloned snapshot of the underlying table, for callers that need to
	/// hold a `RatesTable` across an `.await` point (the lock itself must
	/// not be held there).
	pub fn snapshot_table(&self) -> RatesTable {
		self.0.read().clone()
	}
}

/// Spawns the refresh ticker: every `interval`, persists the current table
/// to the `"exchange"` folder under a `YYYYMMDDHH` time-bucket key. The
/// source system has no external rate feed described in its contract, so
/// this does not itself invent new rates — it is the audit trail of
/// "what the table looked like at this hour" (see `DESIGN.md`).
pub fn spawn_refresher(rates: RatesHandle, storage: StoragePool, interval: Duration) {
	tokio::spawn(async move {
		let mut ticker = tokio::time::interval(interval);
		loop {
			ticker.tick().await;
			let bucket = Timestamp::now().to_datetime().format("%Y%m%d%H").to_string();
			let snapshot = rates.snapshot_table().as_encoded_map();
			match storage.store_async("exchange", &bucket, &snapshot) {
				Ok(()) => tracing::info!(target: "bank-actor::rates", bucket, "rates snapshot enqueued"),
				Err(error) => tracing::warn!(target: "bank-actor::rates", bucket, %error, "failed to enqueue rates snapshot"),
			}
		}
	});
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn convert_reflects_the_seeded_table() {
		let mut seed = BTreeMap::new();
		seed.insert(CurrencyCode::USD, 1.0);
		seed.insert(CurrencyCode::BRL, 5.45);
		let handle = RatesHandle::new(seed);

		let (amount, _) = handle.convert(100, CurrencyCode::USD, CurrencyCode::BRL).unwrap();
		assert_eq!(amount, 545);
	}

	#[test]
	fn replace_is_visible_to_subsequent_reads() {
		let mut seed = BTreeMap::new();
		seed.insert(CurrencyCode::USD, 1.0);
		seed.insert(CurrencyCode::BRL, 5.0);
		let handle = RatesHandle::new(seed);

		let mut updated = BTreeMap::new();
		updated.insert(CurrencyCode::USD, 1.0);
		updated.insert(CurrencyCode::BRL, 6.0);
		handle.replace(updated);

		let (amount, _) = handle.convert(100, CurrencyCode::USD, CurrencyCode::BRL).unwrap();
		assert_eq!(amount, 600);
	}
}
