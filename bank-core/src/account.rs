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

//! The pure account value and the deterministic operations defined on it.
//!
//! Every method here takes an `Account` by value and returns the account
//! that results from applying the request, alongside the operation(s) that
//! were recorded. Nothing in this module performs I/O; `bank-actor` is the
//! only place a caller's request actually reaches one of these functions.

use crate::{
	currency::CurrencyCode,
	money::{round_amount, Money, Rate},
	operation::{AccountId, Operation, OperationData, OperationId, OperationStatus, OperationType, ScalarValue},
	rates::{RatesError, RatesTable},
	time::Timestamp,
};
use codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Arguments used to construct a brand-new account, either from a caller's
/// explicit request or while rehydrating a never-before-seen id.
#[derive(Clone, Debug, Default)]
pub struct InitialArgs {
	pub default_currency: CurrencyCode,
	pub limit: Money,
	pub balances: BTreeMap<CurrencyCode, Money>,
}

/// One recipient's share of a split transfer.
#[derive(Clone, Debug)]
pub struct TransferRecipient {
	pub percentage: f64,
	pub recipient_account_id: AccountId,
	pub extra: Vec<(String, ScalarValue)>,
}

/// The result of a debit-style operation (`withdraw`, `card_transaction`,
/// single-recipient `transfer_out`): it either goes through, or it is
/// denied and recorded as such.
#[derive(Debug)]
pub enum DebitResult {
	Done { account: Account, operation: Operation },
	Denied { reason: String, account: Account, operation: Operation },
}

/// The result of a split `transfer_out`.
#[derive(Debug)]
pub enum SplitTransferResult {
	Done { account: Account, operations: Vec<Operation> },
	Denied { reason: String, account: Account, operation: Operation },
}

/// The result of a `refund`: either the target operation exists and is
/// refundable, or the request fails a precondition (no state change, no
/// operation recorded).
#[derive(Debug)]
pub enum RefundResult {
	Ok { account: Account, operation: Operation },
	Error { reason: String, account: Account },
}

/// The result of `exchange_balances`.
#[derive(Debug)]
pub enum ExchangeResult {
	Ok { account: Account, operation: Operation },
	Denied { reason: String, account: Account, operation: Operation },
}

/// A multi-currency account: its balances, its floor, and its full
/// operations ledger.
#[derive(Encode, Decode, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Account {
	id: AccountId,
	default_currency: CurrencyCode,
	limit: Money,
	balances: BTreeMap<CurrencyCode, Money>,
	operations: BTreeMap<OperationId, Operation>,
	next_operation_id: OperationId,
}

impl Account {
	/// Construct a fresh account. Does not record an operation: the initial
	/// balances are simply the account's starting state.
	pub fn new(id: AccountId, args: InitialArgs) -> Self {
		Self {
			id,
			default_currency: args.default_currency,
			limit: args.limit,
			balances: args.balances,
			operations: BTreeMap::new(),
			next_operation_id: 1,
		}
	}

	pub fn id(&self) -> AccountId {
		self.id
	}

	pub fn default_currency(&self) -> CurrencyCode {
		self.default_currency
	}

	pub fn limit(&self) -> Money {
		self.limit
	}

	pub fn next_operation_id(&self) -> OperationId {
		self.next_operation_id
	}

	/// The floor a currency's balance may not drop below: `limit` for the
	/// default currency, zero for every other currency.
	fn floor_for(&self, currency: CurrencyCode) -> Money {
		if currency == self.default_currency {
			self.limit
		} else {
			0
		}
	}

	pub fn balance(&self, currency: CurrencyCode) -> Money {
		self.balances.get(&currency).copied().unwrap_or(0)
	}

	pub fn balances(&self) -> BTreeMap<CurrencyCode, Money> {
		self.balances.clone()
	}

	pub fn operation(&self, id: OperationId) -> Option<&Operation> {
		self.operations.get(&id)
	}

	/// Operations whose `date_time` falls on the same UTC calendar day as
	/// `date`, most recent first.
	pub fn operations_on(&self, date: Timestamp) -> Vec<Operation> {
		self.operations_between(date.start_of_day(), date.end_of_day())
	}

	/// Operations in `[ini, fin]` (inclusive on both ends), most recent
	/// first.
	pub fn operations_between(&self, ini: Timestamp, fin: Timestamp) -> Vec<Operation> {
		let mut found: Vec<Operation> = self
			.operations
			.values()
			.filter(|op| op.date_time >= ini && op.date_time <= fin)
			.cloned()
			.collect();
		found.sort_by(|a, b| b.date_time.cmp(&a.date_time));
		found
	}

	fn credit(&mut self, currency: CurrencyCode, amount: Money) {
		let updated = self.balance(currency) + amount;
		self.balances.insert(currency, updated);
	}

	fn record_operation(
		&mut self,
		kind: OperationType,
		status: OperationStatus,
		data: OperationData,
		now: Timestamp,
	) -> Operation {
		let operation = Operation { id: self.next_operation_id, date_time: now, kind, status, data };
		self.operations.insert(operation.id, operation.clone());
		self.next_operation_id += 1;
		operation
	}

	fn insufficient_funds_message(currency: CurrencyCode) -> String {
		format!("No {} funds", currency)
	}

	/// Shared debit path for `withdraw`, `card_transaction`, and the
	/// single-recipient `transfer_out`: debit if it would not breach the
	/// floor invariant, otherwise record a denial and leave the balance
	/// untouched.
	fn debit(
		mut self,
		kind: OperationType,
		amount: Money,
		currency: CurrencyCode,
		mut data: OperationData,
		now: Timestamp,
	) -> DebitResult {
		debug_assert!(amount > 0, "amount must be positive");
		let floor = self.floor_for(currency);
		let current = self.balance(currency);
		data.amount = Some(amount);
		data.currency = Some(currency);

		if current - amount < floor {
			let reason = Self::insufficient_funds_message(currency);
			data.message = Some(reason.clone());
			let operation = self.record_operation(kind, OperationStatus::Denied, data, now);
			return DebitResult::Denied { reason, account: self, operation };
		}

		self.balances.insert(currency, current - amount);
		let operation = self.record_operation(kind, OperationStatus::Done, data, now);
		DebitResult::Done { account: self, operation }
	}

	pub fn deposit(mut self, amount: Money, currency: CurrencyCode, now: Timestamp) -> (Account, Operation) {
		debug_assert!(amount > 0, "amount must be positive");
		self.credit(currency, amount);
		let data = OperationData { amount: Some(amount), currency: Some(currency), ..Default::default() };
		let operation = self.record_operation(OperationType::Deposit, OperationStatus::Done, data, now);
		(self, operation)
	}

	pub fn withdraw(self, amount: Money, currency: CurrencyCode, now: Timestamp) -> DebitResult {
		self.debit(OperationType::Withdraw, amount, currency, OperationData::default(), now)
	}

	pub fn card_transaction(self, amount: Money, currency: CurrencyCode, card_id: u64, now: Timestamp) -> DebitResult {
		let data = OperationData { card_id: Some(card_id), ..Default::default() };
		self.debit(OperationType::CardTransaction, amount, currency, data, now)
	}

	/// Single-recipient `transfer_out`. `extra` is preserved verbatim in the
	/// recorded operation's data.
	pub fn transfer_out(
		self,
		amount: Money,
		currency: CurrencyCode,
		recipient_account_id: AccountId,
		extra: Vec<(String, ScalarValue)>,
		now: Timestamp,
	) -> DebitResult {
		let data = OperationData { recipient_account_id: Some(recipient_account_id), extra, ..Default::default() };
		self.debit(OperationType::TransferOut, amount, currency, data, now)
	}

	/// Split `transfer_out`: debits the total up front, then records one
	/// `transfer_out`/`done` operation per recipient with
	/// `round(total * percentage)` substituted as that operation's amount.
	/// Percentages need not sum to 1 and are not re-normalized; any residual
	/// between `total` and the sum of rounded shares is retained by the
	/// sender (see `DESIGN.md`).
	pub fn transfer_out_split(
		mut self,
		total: Money,
		currency: CurrencyCode,
		recipients: &[TransferRecipient],
		general_extra: &[(String, ScalarValue)],
		now: Timestamp,
	) -> SplitTransferResult {
		debug_assert!(total > 0, "amount must be positive");
		let floor = self.floor_for(currency);
		let current = self.balance(currency);

		if current - total < floor {
			let reason = Self::insufficient_funds_message(currency);
			let data = OperationData {
				amount: Some(total),
				currency: Some(currency),
				message: Some(reason.clone()),
				extra: general_extra.to_vec(),
				..Default::default()
			};
			let operation = self.record_operation(OperationType::TransferOut, OperationStatus::Denied, data, now);
			return SplitTransferResult::Denied { reason, account: self, operation };
		}

		self.balances.insert(currency, current - total);
		let mut operations = Vec::with_capacity(recipients.len());
		for recipient in recipients {
			let share = round_amount(total as f64 * recipient.percentage);
			let data = OperationData {
				amount: Some(share),
				currency: Some(currency),
				recipient_account_id: Some(recipient.recipient_account_id),
				extra: OperationData::merge_extra(general_extra, &recipient.extra),
				..Default::default()
			};
			operations.push(self.record_operation(OperationType::TransferOut, OperationStatus::Done, data, now));
		}

		SplitTransferResult::Done { account: self, operations }
	}

	/// Credits a transfer received from `sender_account_id`. Never denies.
	pub fn transfer_in(
		mut self,
		amount: Money,
		currency: CurrencyCode,
		sender_account_id: AccountId,
		extra: Vec<(String, ScalarValue)>,
		now: Timestamp,
	) -> (Account, Operation) {
		debug_assert!(amount > 0, "amount must be positive");
		self.credit(currency, amount);
		let data = OperationData {
			amount: Some(amount),
			currency: Some(currency),
			sender_account_id: Some(sender_account_id),
			extra,
			..Default::default()
		};
		let operation = self.record_operation(OperationType::TransferIn, OperationStatus::Done, data, now);
		(self, operation)
	}

	/// Reverses a refundable operation (a `done` `card_transaction`).
	pub fn refund(mut self, operation_to_refund_id: OperationId, now: Timestamp) -> RefundResult {
		let Some(target) = self.operations.get(&operation_to_refund_id) else {
			return RefundResult::Error { reason: "operation does not exist".to_string(), account: self };
		};

		if target.kind != OperationType::CardTransaction || target.status != OperationStatus::Done {
			return RefundResult::Error { reason: "unrefundable operation".to_string(), account: self };
		}

		let amount = target.data.amount.expect("card_transaction always records an amount");
		let currency = target.data.currency.expect("card_transaction always records a currency");

		self.operations
			.get_mut(&operation_to_refund_id)
			.expect("looked up above")
			.status = OperationStatus::Refunded;
		self.credit(currency, amount);

		let data = OperationData {
			amount: Some(amount),
			currency: Some(currency),
			operation_to_refund_id: Some(operation_to_refund_id),
			..Default::default()
		};
		let operation = self.record_operation(OperationType::Refund, OperationStatus::Done, data, now);
		RefundResult::Ok { account: self, operation }
	}

	/// Internal cross-currency swap against the process-wide rates table.
	pub fn exchange_balances(
		mut self,
		current_amount: Money,
		current_currency: CurrencyCode,
		new_currency: CurrencyCode,
		rates: &RatesTable,
		now: Timestamp,
	) -> Result<ExchangeResult, RatesError> {
		debug_assert!(current_amount > 0, "amount must be positive");
		let (new_amount, rate) = rates.convert(current_amount, current_currency, new_currency)?;

		let floor = self.floor_for(current_currency);
		let current_balance = self.balance(current_currency);

		if current_balance - current_amount < floor {
			let reason = Self::insufficient_funds_message(current_currency);
			let data = OperationData {
				amount: Some(current_amount),
				currency: Some(current_currency),
				new_amount: Some(new_amount),
				new_currency: Some(new_currency),
				rate: Some(Rate::from_f64(rate)),
				message: Some(reason.clone()),
				..Default::default()
			};
			let operation = self.record_operation(OperationType::Exchange, OperationStatus::Denied, data, now);
			return Ok(ExchangeResult::Denied { reason, account: self, operation });
		}

		self.balances.insert(current_currency, current_balance - current_amount);
		self.credit(new_currency, new_amount);

		let data = OperationData {
			amount: Some(current_amount),
			currency: Some(current_currency),
			new_amount: Some(new_amount),
			new_currency: Some(new_currency),
			rate: Some(Rate::from_f64(rate)),
			..Default::default()
		};
		let operation = self.record_operation(OperationType::Exchange, OperationStatus::Done, data, now);
		Ok(ExchangeResult::Ok { account: self, operation })
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn fresh(limit: Money, balances: &[(CurrencyCode, Money)]) -> Account {
		Account::new(
			1,
			InitialArgs {
				default_currency: CurrencyCode::BRL,
				limit,
				balances: balances.iter().copied().collect(),
			},
		)
	}

	fn now() -> Timestamp {
		Timestamp::now()
	}

	#[test]
	fn withdraw_with_no_funds_is_denied_and_recorded() {
		let account = fresh(-500, &[]);
		let DebitResult::Denied { reason, account, operation } = account.withdraw(5000, CurrencyCode::BRL, now())
		else {
			panic!("expected denial");
		};
		assert_eq!(reason, "No BRL funds");
		assert_eq!(account.balance(CurrencyCode::BRL), 0);
		assert_eq!(operation.kind, OperationType::Withdraw);
		assert_eq!(operation.status, OperationStatus::Denied);
		assert_eq!(operation.data.amount, Some(5000));
		assert_eq!(account.next_operation_id(), 2);
	}

	#[test]
	fn withdraw_within_balance_succeeds() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 5000)]);
		let DebitResult::Done { account, operation } = account.withdraw(3000, CurrencyCode::BRL, now()) else {
			panic!("expected success");
		};
		assert_eq!(account.balance(CurrencyCode::BRL), 2000);
		assert_eq!(operation.status, OperationStatus::Done);
		assert_eq!(account.next_operation_id(), 2);
	}

	#[test]
	fn withdraw_boundary_at_exactly_the_floor() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 0)]);
		let DebitResult::Done { account, .. } = account.withdraw(500, CurrencyCode::BRL, now()) else {
			panic!("withdraw of exactly balance-minus-limit must succeed");
		};
		assert_eq!(account.balance(CurrencyCode::BRL), -500);
		let DebitResult::Denied { .. } = account.withdraw(1, CurrencyCode::BRL, now()) else {
			panic!("one more unit must deny");
		};
	}

	#[test]
	fn non_default_currency_floors_at_zero() {
		let account = fresh(-500, &[(CurrencyCode::USD, 1000)]);
		let DebitResult::Done { account, .. } = account.withdraw(1000, CurrencyCode::USD, now()) else {
			panic!("withdraw of exactly the balance must succeed in a non-default currency");
		};
		assert_eq!(account.balance(CurrencyCode::USD), 0);
		let DebitResult::Denied { .. } = account.withdraw(1, CurrencyCode::USD, now()) else {
			panic!("one more unit must deny since non-default currencies floor at zero");
		};
	}

	#[test]
	fn card_transaction_then_refund_restores_balance() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 5000)]);
		let DebitResult::Done { account, operation: charge } =
			account.card_transaction(3000, CurrencyCode::BRL, 1, now())
		else {
			panic!("expected success");
		};
		assert_eq!(charge.id, 1);

		let RefundResult::Ok { account, operation: refund } = account.refund(charge.id, now()) else {
			panic!("expected refund to succeed");
		};
		assert_eq!(account.balance(CurrencyCode::BRL), 5000);
		assert_eq!(refund.kind, OperationType::Refund);
		assert_eq!(refund.data.amount, Some(3000));
		assert_eq!(refund.data.operation_to_refund_id, Some(charge.id));
		assert_eq!(account.operation(charge.id).unwrap().status, OperationStatus::Refunded);
	}

	#[test]
	fn refund_of_missing_operation_is_an_error() {
		let account = fresh(-500, &[]);
		let RefundResult::Error { reason, account } = account.refund(99, now()) else {
			panic!("expected error");
		};
		assert_eq!(reason, "operation does not exist");
		assert_eq!(account.next_operation_id(), 1, "no operation should be recorded on error");
	}

	#[test]
	fn refund_of_a_withdraw_is_unrefundable() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 5000)]);
		let DebitResult::Done { account, operation } = account.withdraw(1000, CurrencyCode::BRL, now()) else {
			panic!("expected success");
		};
		let RefundResult::Error { reason, .. } = account.refund(operation.id, now()) else {
			panic!("expected error");
		};
		assert_eq!(reason, "unrefundable operation");
	}

	#[test]
	fn refund_of_a_denied_card_transaction_is_unrefundable() {
		let account = fresh(-500, &[]);
		let DebitResult::Denied { account, operation, .. } =
			account.card_transaction(1000, CurrencyCode::BRL, 7, now())
		else {
			panic!("expected denial");
		};
		let RefundResult::Error { reason, .. } = account.refund(operation.id, now()) else {
			panic!("expected error");
		};
		assert_eq!(reason, "unrefundable operation");
	}

	#[test]
	fn split_transfer_debits_total_and_distributes_rounded_shares() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 10000)]);
		let recipients = vec![
			TransferRecipient {
				percentage: 0.7,
				recipient_account_id: 2,
				extra: vec![("other_data".to_string(), ScalarValue::Text("x".to_string()))],
			},
			TransferRecipient {
				percentage: 0.2,
				recipient_account_id: 3,
				extra: vec![("meta_data".to_string(), ScalarValue::Text("y".to_string()))],
			},
			TransferRecipient { percentage: 0.1, recipient_account_id: 4, extra: vec![] },
		];
		let SplitTransferResult::Done { account, operations } =
			account.transfer_out_split(1000, CurrencyCode::BRL, &recipients, &[], now())
		else {
			panic!("expected success");
		};
		assert_eq!(account.balance(CurrencyCode::BRL), 9000);
		assert_eq!(operations.len(), 3);
		assert_eq!(operations[0].data.amount, Some(700));
		assert_eq!(operations[1].data.amount, Some(200));
		assert_eq!(operations[2].data.amount, Some(100));
	}

	#[test]
	fn split_transfer_denies_as_a_single_operation_when_total_is_insufficient() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 100)]);
		let recipients = vec![TransferRecipient { percentage: 1.0, recipient_account_id: 2, extra: vec![] }];
		let SplitTransferResult::Denied { account, operation, .. } =
			account.transfer_out_split(1000, CurrencyCode::BRL, &recipients, &[], now())
		else {
			panic!("expected denial");
		};
		assert_eq!(account.next_operation_id(), 2, "exactly one denied operation is recorded");
		assert_eq!(operation.data.amount, Some(1000));
	}

	#[test]
	fn exchange_moves_value_between_currencies() {
		let mut seed = BTreeMap::new();
		seed.insert(CurrencyCode::USD, 1.0);
		seed.insert(CurrencyCode::BRL, 5.45);
		let rates = RatesTable::new(seed);

		let account = fresh(-500, &[(CurrencyCode::USD, 1000)]);
		let ExchangeResult::Ok { account, operation } =
			account.exchange_balances(100, CurrencyCode::USD, CurrencyCode::BRL, &rates, now()).unwrap()
		else {
			panic!("expected success");
		};
		assert_eq!(account.balance(CurrencyCode::USD), 900);
		assert_eq!(account.balance(CurrencyCode::BRL), 545);
		assert_eq!(operation.status, OperationStatus::Done);
	}

	#[test]
	fn operations_between_is_inclusive_and_descending() {
		let account = fresh(-500, &[(CurrencyCode::BRL, 5000)]);
		let (account, _) = account.deposit(100, CurrencyCode::BRL, Timestamp::from_datetime(
			chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
		));
		let (account, _) = account.deposit(100, CurrencyCode::BRL, Timestamp::from_datetime(
			chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
		));
		let ini = Timestamp::from_datetime(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
		let fin = Timestamp::from_datetime(chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
		let found = account.operations_between(ini, fin);
		assert_eq!(found.len(), 2);
		assert!(found[0].date_time > found[1].date_time, "most recent first");
	}
}
