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

//! ISO-4217-style currency codes.

use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A three-letter currency code (e.g. `BRL`, `USD`), stored as upper-case ASCII.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode, Serialize, Deserialize)]
pub struct CurrencyCode([u8; 3]);

/// Returned when a caller-supplied currency string is not a valid code.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("invalid currency code: {0:?}")]
pub struct InvalidCurrencyCode(pub String);

impl CurrencyCode {
	/// Build a currency code from three upper-case ASCII letters.
	pub fn new(code: &str) -> Result<Self, InvalidCurrencyCode> {
		let bytes = code.as_bytes();
		if bytes.len() != 3 || !bytes.iter().all(|b| b.is_ascii_uppercase()) {
			return Err(InvalidCurrencyCode(code.to_owned()));
		}
		Ok(Self([bytes[0], bytes[1], bytes[2]]))
	}

	/// The Brazilian Real, the source system's configured default.
	pub const BRL: CurrencyCode = CurrencyCode(*b"BRL");
	/// US Dollar.
	pub const USD: CurrencyCode = CurrencyCode(*b"USD");

	/// The three-letter code as a `&str`.
	pub fn as_str(&self) -> &str {
		// SAFETY: constructed only from ASCII uppercase letters.
		std::str::from_utf8(&self.0).expect("CurrencyCode is always valid ASCII")
	}
}

impl Default for CurrencyCode {
	/// Defaults to the source system's configured default currency.
	fn default() -> Self {
		Self::BRL
	}
}

impl fmt::Debug for CurrencyCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Display for CurrencyCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for CurrencyCode {
	type Err = InvalidCurrencyCode;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn accepts_three_upper_ascii_letters() {
		assert_eq!(CurrencyCode::new("BRL").unwrap(), CurrencyCode::BRL);
		assert_eq!(CurrencyCode::new("USD").unwrap(), CurrencyCode::USD);
	}

	#[test]
	fn rejects_malformed_codes() {
		assert!(CurrencyCode::new("br").is_err());
		assert!(CurrencyCode::new("DOLLAR").is_err());
		assert!(CurrencyCode::new("").is_err());
	}

	#[test]
	fn display_round_trips() {
		let code = CurrencyCode::new("EUR").unwrap();
		assert_eq!(code.to_string(), "EUR");
	}
}
