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

//! Currency exchange rate table, expressed against a pivot currency.
//!
//! This module is deliberately free of I/O and concurrency primitives: the
//! process-wide, concurrently-refreshed table lives in `bank-actor`, which
//! wraps a `RatesTable` snapshot behind a lock and swaps it on refresh. Here
//! we only provide the pure lookup/conversion arithmetic.

use crate::{currency::CurrencyCode, money::{round_amount, Rate}};
use std::collections::BTreeMap;

/// Rates errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RatesError {
	#[error("unknown currency: {0}")]
	UnknownCurrency(CurrencyCode),
}

/// A read-mostly mapping from currency code to rate against a pivot currency.
///
/// Stored internally as fixed-point [`Rate`] so a snapshot can be handed
/// straight to the storage pool; callers deal in `f64` at the boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct RatesTable {
	rates: BTreeMap<CurrencyCode, Rate>,
}

impl RatesTable {
	/// Build a table from a seed map. Rates are expressed relative to whatever
	/// pivot the seed table was defined against; the pivot itself is just the
	/// entry whose rate is `1.0`.
	pub fn new(seed: BTreeMap<CurrencyCode, f64>) -> Self {
		Self { rates: seed.into_iter().map(|(code, rate)| (code, Rate::from_f64(rate))).collect() }
	}

	/// Look up the raw rate for a currency, if known.
	pub fn rate(&self, currency: CurrencyCode) -> Result<f64, RatesError> {
		self.rates.get(&currency).map(|rate| rate.to_f64()).ok_or(RatesError::UnknownCurrency(currency))
	}

	/// Convert `amount` of `current` into `new`, returning the converted
	/// amount and the effective rate applied.
	///
	/// `exchange_rate = rate[new] / rate[current]`, `new_amount =
	/// round(amount * exchange_rate)`.
	pub fn convert(
		&self,
		amount: i64,
		current: CurrencyCode,
		new: CurrencyCode,
	) -> Result<(i64, f64), RatesError> {
		let current_rate = self.rate(current)?;
		let new_rate = self.rate(new)?;
		let exchange_rate = new_rate / current_rate;
		let new_amount = round_amount(amount as f64 * exchange_rate);
		Ok((new_amount, exchange_rate))
	}

	/// Replace the entire table, e.g. on a periodic refresh.
	pub fn replace(&mut self, seed: BTreeMap<CurrencyCode, f64>) {
		self.rates = seed.into_iter().map(|(code, rate)| (code, Rate::from_f64(rate))).collect();
	}

	/// A snapshot of the table as a human-readable map.
	pub fn as_map(&self) -> BTreeMap<CurrencyCode, f64> {
		self.rates.iter().map(|(code, rate)| (*code, rate.to_f64())).collect()
	}

	/// A snapshot of the table in its SCALE-encodable fixed-point form, for
	/// persistence under the `"exchange"` folder.
	pub fn as_encoded_map(&self) -> BTreeMap<CurrencyCode, Rate> {
		self.rates.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn table() -> RatesTable {
		let mut seed = BTreeMap::new();
		seed.insert(CurrencyCode::USD, 1.0);
		seed.insert(CurrencyCode::BRL, 5.45);
		RatesTable::new(seed)
	}

	#[test]
	fn converts_usd_to_brl() {
		let (amount, rate) = table().convert(100, CurrencyCode::USD, CurrencyCode::BRL).unwrap();
		assert_eq!(amount, 545);
		assert!((rate - 5.45).abs() < f64::EPSILON);
	}

	#[test]
	fn round_trips_within_rounding() {
		let (brl, _) = table().convert(100, CurrencyCode::USD, CurrencyCode::BRL).unwrap();
		let (usd_back, _) = table().convert(brl, CurrencyCode::BRL, CurrencyCode::USD).unwrap();
		assert!((usd_back - 100).abs() <= 1);
	}

	#[test]
	fn unknown_currency_errors() {
		let err = table().convert(100, CurrencyCode::USD, CurrencyCode::new("JPY").unwrap());
		assert_eq!(err, Err(RatesError::UnknownCurrency(CurrencyCode::new("JPY").unwrap())));
	}
}
