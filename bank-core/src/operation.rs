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

//! The immutable ledger record describing one attempted account mutation.

use crate::{
	currency::CurrencyCode,
	money::{Money, Rate},
	time::Timestamp,
};
use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

pub type OperationId = u64;
pub type AccountId = u64;

/// The kind of mutation an [`Operation`] records.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationType {
	Deposit,
	Withdraw,
	TransferIn,
	TransferOut,
	CardTransaction,
	Refund,
	Exchange,
}

/// `status` may transition exactly once, from `Done` to `Refunded`.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
	Done,
	Denied,
	Refunded,
}

/// A caller-supplied extra field whose value is preserved verbatim.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum ScalarValue {
	Text(String),
	Integer(i64),
	Boolean(bool),
}

/// The closed set of fields the core recognizes, plus an open side-channel
/// for whatever extra fields the caller attached to the request.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct OperationData {
	pub amount: Option<Money>,
	pub currency: Option<CurrencyCode>,
	pub card_id: Option<u64>,
	pub recipient_account_id: Option<AccountId>,
	pub sender_account_id: Option<AccountId>,
	pub operation_to_refund_id: Option<OperationId>,
	pub message: Option<String>,
	pub rate: Option<Rate>,
	pub new_amount: Option<Money>,
	pub new_currency: Option<CurrencyCode>,
	/// Caller-supplied fields not consumed by the core, preserved verbatim.
	/// Recipient-specific extras in a split transfer override general ones
	/// of the same key.
	pub extra: Vec<(String, ScalarValue)>,
}

impl OperationData {
	/// Merge `general` extras with `specific` extras, letting `specific`
	/// override a key present in both, as required for split-transfer
	/// recipient data.
	pub fn merge_extra(general: &[(String, ScalarValue)], specific: &[(String, ScalarValue)]) -> Vec<(String, ScalarValue)> {
		let mut merged: Vec<(String, ScalarValue)> = general.to_vec();
		for (key, value) in specific {
			if let Some(existing) = merged.iter_mut().find(|(k, _)| k == key) {
				existing.1 = value.clone();
			} else {
				merged.push((key.clone(), value.clone()));
			}
		}
		merged
	}
}

/// An immutable (in identity and type) ledger entry.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Operation {
	pub id: OperationId,
	pub date_time: Timestamp,
	pub kind: OperationType,
	pub status: OperationStatus,
	pub data: OperationData,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn specific_extras_override_general_ones() {
		let general = vec![("meta_data".to_string(), ScalarValue::Text("y".to_string()))];
		let specific = vec![
			("meta_data".to_string(), ScalarValue::Text("override".to_string())),
			("other_data".to_string(), ScalarValue::Text("x".to_string())),
		];
		let merged = OperationData::merge_extra(&general, &specific);
		assert_eq!(merged.len(), 2);
		assert!(merged.contains(&("other_data".to_string(), ScalarValue::Text("x".to_string()))));
		assert!(merged.contains(&(
			"meta_data".to_string(),
			ScalarValue::Text("override".to_string())
		)));
	}
}
