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

//! Minor-unit integer amounts and the rounding rule shared by transfers and
//! currency conversion.

use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Amount in minor units (e.g. cents), always signed to allow balances to sit
/// at a negative floor in the default currency.
pub type Money = i64;

const RATE_SCALE: f64 = 1_000_000_000.0;

/// A currency exchange rate, fixed-point at one part in 10^9.
///
/// SCALE has no encoding for floating point (consensus-style codecs
/// generally don't, to keep encodings platform-independent), so the rate
/// recorded on an `exchange` operation is stored in this form rather than
/// as a raw `f64`. All arithmetic still happens in `f64`; this type only
/// exists at the persistence boundary.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Rate(i64);

impl Rate {
	pub fn from_f64(value: f64) -> Self {
		Self((value * RATE_SCALE).round() as i64)
	}

	pub fn to_f64(self) -> f64 {
		self.0 as f64 / RATE_SCALE
	}
}

/// "Round half away from zero" for non-negative inputs, matching the source
/// system's `round/1` (`floor(x + 0.5)`). Every caller of this function in
/// `bank-core` only ever rounds a non-negative amount-times-rate or
/// amount-times-percentage product.
pub fn round_amount(x: f64) -> Money {
	debug_assert!(x >= 0.0, "round_amount is only defined for non-negative inputs");
	(x + 0.5).floor() as Money
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn rounds_half_up() {
		assert_eq!(round_amount(0.5), 1);
		assert_eq!(round_amount(1.5), 2);
		assert_eq!(round_amount(2.5), 3);
	}

	#[test]
	fn rounds_down_below_half() {
		assert_eq!(round_amount(0.49), 0);
		assert_eq!(round_amount(700.0), 700);
	}

	#[test]
	fn rate_round_trips_within_fixed_point_precision() {
		let rate = Rate::from_f64(5.45);
		assert!((rate.to_f64() - 5.45).abs() < 1e-9);
	}
}
