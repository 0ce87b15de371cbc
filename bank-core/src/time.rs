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

//! A SCALE-encodable instant, wrapping milliseconds since the Unix epoch so
//! `chrono::DateTime<Utc>` (which has no native `Encode`/`Decode` impl) can
//! still be persisted through `bank-storage`'s codec.

use chrono::{DateTime, TimeZone, Utc};
use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

#[derive(
	Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord,
)]
pub struct Timestamp(i64);

impl Timestamp {
	/// The current instant.
	pub fn now() -> Self {
		Self::from_datetime(Utc::now())
	}

	pub fn from_datetime(dt: DateTime<Utc>) -> Self {
		Self(dt.timestamp_millis())
	}

	pub fn to_datetime(self) -> DateTime<Utc> {
		Utc.timestamp_millis_opt(self.0).single().expect("Timestamp always round-trips")
	}

	/// Midnight at the start of this instant's calendar day (UTC).
	pub fn start_of_day(self) -> Self {
		let day = self.to_datetime().date_naive().and_hms_opt(0, 0, 0).expect("valid time");
		Self::from_datetime(Utc.from_utc_datetime(&day))
	}

	/// The last millisecond of this instant's calendar day (UTC).
	pub fn end_of_day(self) -> Self {
		let day =
			self.to_datetime().date_naive().and_hms_milli_opt(23, 59, 59, 999).expect("valid time");
		Self::from_datetime(Utc.from_utc_datetime(&day))
	}
}

impl From<DateTime<Utc>> for Timestamp {
	fn from(dt: DateTime<Utc>) -> Self {
		Self::from_datetime(dt)
	}
}
