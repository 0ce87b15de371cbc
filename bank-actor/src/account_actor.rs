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

//! The per-account actor: one task owning exactly one `Account`, serving
//! requests strictly in arrival order, write-through persisting every
//! accepted mutation before the caller observes its result.

use crate::{error::ActorError, rates::RatesHandle, registry::Registry};
use bank_core::{
	Account, AccountId, CurrencyCode, DebitResult, ExchangeResult, InitialArgs, Money, Operation, OperationId,
	RefundResult, ScalarValue, SplitTransferResult, Timestamp, TransferRecipient,
};
use bank_storage::StoragePool;
use std::{collections::BTreeMap, time::Duration};
use tokio::sync::{mpsc, oneshot};

/// Outcome of a debit-style request (`withdraw`, `card_transaction`).
#[derive(Debug, Clone)]
pub enum DebitOutcome {
	Ok { balance: Money, operation: Operation },
	Denied { reason: String, balance: Money, operation: Operation },
}

/// Outcome of a single-recipient `transfer_out`.
#[derive(Debug, Clone)]
pub enum SingleTransferOutcome {
	Ok { balance: Money, local_operation: Operation, recipient_operation: Operation },
	Denied { reason: String, balance: Money, operation: Operation },
}

/// Outcome of a split `transfer_out`, recipient operations in caller-supplied order.
#[derive(Debug, Clone)]
pub enum SplitTransferOutcome {
	Ok { balance: Money, local_operations: Vec<Operation>, recipient_operations: Vec<Operation> },
	Denied { reason: String, balance: Money, operation: Operation },
}

/// Outcome of a `refund` request.
#[derive(Debug, Clone)]
pub enum RefundOutcome {
	Ok { balances: BTreeMap<CurrencyCode, Money>, operation: Operation },
	Error { reason: String, balances: BTreeMap<CurrencyCode, Money> },
}

/// Outcome of an `exchange_balances` request.
#[derive(Debug, Clone)]
pub enum ExchangeOutcome {
	Ok { balances: BTreeMap<CurrencyCode, Money>, operation: Operation },
	Denied { reason: String, balances: BTreeMap<CurrencyCode, Money>, operation: Operation },
}

enum Request {
	Deposit {
		amount: Money,
		currency: CurrencyCode,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<(Money, Operation), ActorError>>,
	},
	Withdraw {
		amount: Money,
		currency: CurrencyCode,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<DebitOutcome, ActorError>>,
	},
	CardTransaction {
		amount: Money,
		currency: CurrencyCode,
		card_id: u64,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<DebitOutcome, ActorError>>,
	},
	TransferOutSingle {
		amount: Money,
		currency: CurrencyCode,
		recipient_account_id: AccountId,
		extra: Vec<(String, ScalarValue)>,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<SingleTransferOutcome, ActorError>>,
	},
	TransferOutSplit {
		total: Money,
		currency: CurrencyCode,
		recipients: Vec<TransferRecipient>,
		general_extra: Vec<(String, ScalarValue)>,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<SplitTransferOutcome, ActorError>>,
	},
	TransferIn {
		amount: Money,
		currency: CurrencyCode,
		sender_account_id: AccountId,
		extra: Vec<(String, ScalarValue)>,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<(Money, Operation), ActorError>>,
	},
	Refund {
		operation_to_refund_id: OperationId,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<RefundOutcome, ActorError>>,
	},
	Exchange {
		current_amount: Money,
		current_currency: CurrencyCode,
		new_currency: CurrencyCode,
		date_time: Option<Timestamp>,
		respond: oneshot::Sender<Result<ExchangeOutcome, ActorError>>,
	},
	Balance { currency: CurrencyCode, respond: oneshot::Sender<Money> },
	Balances { respond: oneshot::Sender<BTreeMap<CurrencyCode, Money>> },
	Operation { id: OperationId, respond: oneshot::Sender<Option<Operation>> },
	OperationsOn { date: Timestamp, respond: oneshot::Sender<Vec<Operation>> },
	OperationsBetween { ini: Timestamp, fin: Timestamp, respond: oneshot::Sender<Vec<Operation>> },
}

/// A handle to a running account actor. Cheap to clone; every clone talks
/// to the same underlying task.
#[derive(Clone)]
pub struct AccountActorHandle {
	account_id: AccountId,
	sender: mpsc::UnboundedSender<Request>,
}

impl AccountActorHandle {
	pub fn account_id(&self) -> AccountId {
		self.account_id
	}

	/// Best-effort liveness check. A `true` result can still race with the
	/// actor shutting down immediately after; callers must be prepared to
	/// retry via the registry on `ActorError::Terminated`.
	pub fn is_alive(&self) -> bool {
		!self.sender.is_closed()
	}

	async fn call<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Request) -> Result<T, ActorError> {
		let (respond, receiver) = oneshot::channel();
		self.sender.send(build(respond)).map_err(|_| ActorError::Terminated)?;
		receiver.await.map_err(|_| ActorError::Terminated)
	}

	pub async fn deposit(
		&self,
		amount: Money,
		currency: CurrencyCode,
		date_time: Option<Timestamp>,
	) -> Result<(Money, Operation), ActorError> {
		self.call(|respond| Request::Deposit { amount, currency, date_time, respond }).await?
	}

	pub async fn withdraw(
		&self,
		amount: Money,
		currency: CurrencyCode,
		date_time: Option<Timestamp>,
	) -> Result<DebitOutcome, ActorError> {
		self.call(|respond| Request::Withdraw { amount, currency, date_time, respond }).await?
	}

	pub async fn card_transaction(
		&self,
		amount: Money,
		currency: CurrencyCode,
		card_id: u64,
		date_time: Option<Timestamp>,
	) -> Result<DebitOutcome, ActorError> {
		self.call(|respond| Request::CardTransaction { amount, currency, card_id, date_time, respond }).await?
	}

	pub async fn transfer_out_single(
		&self,
		amount: Money,
		currency: CurrencyCode,
		recipient_account_id: AccountId,
		extra: Vec<(String, ScalarValue)>,
		date_time: Option<Timestamp>,
	) -> Result<SingleTransferOutcome, ActorError> {
		self.call(|respond| Request::TransferOutSingle {
			amount,
			currency,
			recipient_account_id,
			extra,
			date_time,
			respond,
		})
		.await?
	}

	pub async fn transfer_out_split(
		&self,
		total: Money,
		currency: CurrencyCode,
		recipients: Vec<TransferRecipient>,
		general_extra: Vec<(String, ScalarValue)>,
		date_time: Option<Timestamp>,
	) -> Result<SplitTransferOutcome, ActorError> {
		self.call(|respond| Request::TransferOutSplit {
			total,
			currency,
			recipients,
			general_extra,
			date_time,
			respond,
		})
		.await?
	}

	pub async fn transfer_in(
		&self,
		amount: Money,
		currency: CurrencyCode,
		sender_account_id: AccountId,
		extra: Vec<(String, ScalarValue)>,
		date_time: Option<Timestamp>,
	) -> Result<(Money, Operation), ActorError> {
		self.call(|respond| Request::TransferIn { amount, currency, sender_account_id, extra, date_time, respond })
			.await?
	}

	pub async fn refund(
		&self,
		operation_to_refund_id: OperationId,
		date_time: Option<Timestamp>,
	) -> Result<RefundOutcome, ActorError> {
		self.call(|respond| Request::Refund { operation_to_refund_id, date_time, respond }).await?
	}

	pub async fn exchange(
		&self,
		current_amount: Money,
		current_currency: CurrencyCode,
		new_currency: CurrencyCode,
		date_time: Option<Timestamp>,
	) -> Result<ExchangeOutcome, ActorError> {
		self.call(|respond| Request::Exchange { current_amount, current_currency, new_currency, date_time, respond })
			.await?
	}

	pub async fn balance(&self, currency: CurrencyCode) -> Result<Money, ActorError> {
		self.call(|respond| Request::Balance { currency, respond }).await
	}

	pub async fn balances(&self) -> Result<BTreeMap<CurrencyCode, Money>, ActorError> {
		self.call(|respond| Request::Balances { respond }).await
	}

	pub async fn operation(&self, id: OperationId) -> Result<Option<Operation>, ActorError> {
		self.call(|respond| Request::Operation { id, respond }).await
	}

	pub async fn operations_on(&self, date: Timestamp) -> Result<Vec<Operation>, ActorError> {
		self.call(|respond| Request::OperationsOn { date, respond }).await
	}

	pub async fn operations_between(&self, ini: Timestamp, fin: Timestamp) -> Result<Vec<Operation>, ActorError> {
		self.call(|respond| Request::OperationsBetween { ini, fin, respond }).await
	}
}

pub(crate) fn spawn(
	account_id: AccountId,
	initial_args: InitialArgs,
	storage: StoragePool,
	rates: RatesHandle,
	registry: Registry,
	idle_timeout: Duration,
) -> AccountActorHandle {
	let (sender, inbox) = mpsc::unbounded_channel();
	tokio::spawn(run(account_id, initial_args, storage, rates, registry, idle_timeout, inbox));
	AccountActorHandle { account_id, sender }
}

async fn persist(storage: &StoragePool, account: &Account) -> Result<(), ActorError> {
	storage.store_sync("accounts", &account.id().to_string(), account).await.map_err(ActorError::from)
}

async fn run(
	account_id: AccountId,
	initial_args: InitialArgs,
	storage: StoragePool,
	rates: RatesHandle,
	registry: Registry,
	idle_timeout: Duration,
	mut inbox: mpsc::UnboundedReceiver<Request>,
) {
	tracing::debug!(target: "bank-actor", account_id, "starting, rehydrating");

	let mut account = match storage.get::<Account>("accounts", &account_id.to_string()).await {
		Ok(Some(existing)) => {
			tracing::info!(target: "bank-actor", account_id, "rehydrated from storage");
			existing
		}
		Ok(None) => {
			let fresh = Account::new(account_id, initial_args);
			if let Err(error) = storage.store_sync("accounts", &account_id.to_string(), &fresh).await {
				tracing::error!(target: "bank-actor", account_id, %error, "failed to persist new account, aborting startup");
				return;
			}
			tracing::info!(target: "bank-actor", account_id, "created");
			fresh
		}
		Err(error) => {
			tracing::error!(target: "bank-actor", account_id, %error, "rehydration failed, aborting startup");
			return;
		}
	};

	loop {
		tokio::select! {
			biased;
			maybe_request = inbox.recv() => {
				match maybe_request {
					Some(request) => {
						account = handle(account, &storage, &rates, &registry, request).await;
					}
					None => break,
				}
			}
			_ = tokio::time::sleep(idle_timeout) => {
				tracing::debug!(target: "bank-actor", account_id, "idle timeout reached");
				break;
			}
		}
	}

	// A request may have arrived in the exact instant the idle timer fired;
	// drain it before deregistering so it isn't silently dropped.
	while let Ok(request) = inbox.try_recv() {
		account = handle(account, &storage, &rates, &registry, request).await;
	}

	registry.deregister(account_id);
	tracing::info!(target: "bank-actor", account_id, "terminated");
}

async fn handle(
	account: Account,
	storage: &StoragePool,
	rates: &RatesHandle,
	registry: &Registry,
	request: Request,
) -> Account {
	match request {
		Request::Deposit { amount, currency, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			let (account, operation) = account.deposit(amount, currency, now);
			match persist(storage, &account).await {
				Ok(()) => {
					let balance = account.balance(currency);
					let _ = respond.send(Ok((balance, operation)));
					account
				}
				Err(error) => {
					let _ = respond.send(Err(error));
					previous
				}
			}
		}

		Request::Withdraw { amount, currency, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			match account.withdraw(amount, currency, now) {
				DebitResult::Done { account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let balance = account.balance(currency);
						let _ = respond.send(Ok(DebitOutcome::Ok { balance, operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
				DebitResult::Denied { reason, account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let balance = account.balance(currency);
						let _ = respond.send(Ok(DebitOutcome::Denied { reason, balance, operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
			}
		}

		Request::CardTransaction { amount, currency, card_id, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			match account.card_transaction(amount, currency, card_id, now) {
				DebitResult::Done { account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let balance = account.balance(currency);
						let _ = respond.send(Ok(DebitOutcome::Ok { balance, operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
				DebitResult::Denied { reason, account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let balance = account.balance(currency);
						let _ = respond.send(Ok(DebitOutcome::Denied { reason, balance, operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
			}
		}

		Request::TransferOutSingle { amount, currency, recipient_account_id, extra, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			let extra_for_recipient = extra.clone();
			match account.transfer_out(amount, currency, recipient_account_id, extra, now) {
				DebitResult::Denied { reason, account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let balance = account.balance(currency);
						let _ = respond.send(Ok(SingleTransferOutcome::Denied { reason, balance, operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
				DebitResult::Done { account, operation: local_operation } => match persist(storage, &account).await {
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
					Ok(()) => {
						let balance = account.balance(currency);
						let sender_id = account.id();
						let registry = registry.clone();
						let idle_timeout = registry.idle_timeout();
						tokio::spawn(async move {
							let call = registry.with_actor(recipient_account_id, InitialArgs::default(), move |handle| {
								let extra = extra_for_recipient.clone();
								Box::pin(async move {
									handle.transfer_in(amount, currency, sender_id, extra, None).await
								})
							});
							let outcome = match tokio::time::timeout(idle_timeout, call).await {
								Ok(result) => result,
								Err(_) => Err(ActorError::Timeout(recipient_account_id)),
							};
							let response = outcome.map(|(_, recipient_operation)| SingleTransferOutcome::Ok {
								balance,
								local_operation,
								recipient_operation,
							});
							let _ = respond.send(response);
						});
						account
					}
				},
			}
		}

		Request::TransferOutSplit { total, currency, recipients, general_extra, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			match account.transfer_out_split(total, currency, &recipients, &general_extra, now) {
				SplitTransferResult::Denied { reason, account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let balance = account.balance(currency);
						let _ = respond.send(Ok(SplitTransferOutcome::Denied { reason, balance, operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
				SplitTransferResult::Done { account, operations: local_operations } => {
					match persist(storage, &account).await {
						Err(error) => {
							let _ = respond.send(Err(error));
							previous
						}
						Ok(()) => {
							let balance = account.balance(currency);
							let sender_id = account.id();
							let registry = registry.clone();
							let idle_timeout = registry.idle_timeout();
							let local_operations_for_task = local_operations;
							tokio::spawn(async move {
								let calls = local_operations_for_task.iter().zip(recipients.iter()).map(
									|(local_operation, recipient)| {
										let registry = registry.clone();
										let amount =
											local_operation.data.amount.expect("transfer_out always records an amount");
										let recipient_id = recipient.recipient_account_id;
										let extra = recipient.extra.clone();
										async move {
											let call =
												registry.with_actor(recipient_id, InitialArgs::default(), move |handle| {
													let extra = extra.clone();
													Box::pin(async move {
														handle.transfer_in(amount, currency, sender_id, extra, None).await
													})
												});
											match tokio::time::timeout(idle_timeout, call).await {
												Ok(result) => result,
												Err(_) => Err(ActorError::Timeout(recipient_id)),
											}
										}
									},
								);
								let results = futures::future::join_all(calls).await;
								let response = results
									.into_iter()
									.collect::<Result<Vec<_>, ActorError>>()
									.map(|pairs| SplitTransferOutcome::Ok {
										balance,
										local_operations: local_operations_for_task,
										recipient_operations: pairs.into_iter().map(|(_, operation)| operation).collect(),
									});
								let _ = respond.send(response);
							});
							account
						}
					}
				}
			}
		}

		Request::TransferIn { amount, currency, sender_account_id, extra, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			let (account, operation) = account.transfer_in(amount, currency, sender_account_id, extra, now);
			match persist(storage, &account).await {
				Ok(()) => {
					let balance = account.balance(currency);
					let _ = respond.send(Ok((balance, operation)));
					account
				}
				Err(error) => {
					let _ = respond.send(Err(error));
					previous
				}
			}
		}

		Request::Refund { operation_to_refund_id, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			match account.refund(operation_to_refund_id, now) {
				RefundResult::Error { reason, account } => {
					let _ = respond.send(Ok(RefundOutcome::Error { reason, balances: account.balances() }));
					account
				}
				RefundResult::Ok { account, operation } => match persist(storage, &account).await {
					Ok(()) => {
						let _ = respond.send(Ok(RefundOutcome::Ok { balances: account.balances(), operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
			}
		}

		Request::Exchange { current_amount, current_currency, new_currency, date_time, respond } => {
			let now = date_time.unwrap_or_else(Timestamp::now);
			let previous = account.clone();
			let rates_table = rates.snapshot_table();
			match account.exchange_balances(current_amount, current_currency, new_currency, &rates_table, now) {
				Ok(ExchangeResult::Denied { reason, account, operation }) => match persist(storage, &account).await {
					Ok(()) => {
						let _ = respond.send(Ok(ExchangeOutcome::Denied { reason, balances: account.balances(), operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
				Ok(ExchangeResult::Ok { account, operation }) => match persist(storage, &account).await {
					Ok(()) => {
						let _ = respond.send(Ok(ExchangeOutcome::Ok { balances: account.balances(), operation }));
						account
					}
					Err(error) => {
						let _ = respond.send(Err(error));
						previous
					}
				},
				Err(error) => {
					let _ = respond.send(Err(error.into()));
					previous
				}
			}
		}

		Request::Balance { currency, respond } => {
			let _ = respond.send(account.balance(currency));
			account
		}
		Request::Balances { respond } => {
			let _ = respond.send(account.balances());
			account
		}
		Request::Operation { id, respond } => {
			let _ = respond.send(account.operation(id).cloned());
			account
		}
		Request::OperationsOn { date, respond } => {
			let _ = respond.send(account.operations_on(date));
			account
		}
		Request::OperationsBetween { ini, fin, respond } => {
			let _ = respond.send(account.operations_between(ini, fin));
			account
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::registry::Registry;
	use bank_core::TransferRecipient;

	fn test_registry(dir: &std::path::Path, idle_timeout: Duration) -> Registry {
		let storage = StoragePool::new(2, dir);
		let rates = RatesHandle::new(BTreeMap::from([(CurrencyCode::USD, 1.0), (CurrencyCode::BRL, 5.0)]));
		Registry::new(storage, rates, idle_timeout)
	}

	#[tokio::test]
	async fn deposit_withdraw_and_balance_round_trip() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path(), Duration::from_secs(240));
		let handle = registry.server_process(1, InitialArgs::default());

		let (balance, _) = handle.deposit(1_000, CurrencyCode::BRL, None).await.unwrap();
		assert_eq!(balance, 1_000);

		match handle.withdraw(400, CurrencyCode::BRL, None).await.unwrap() {
			DebitOutcome::Ok { balance, .. } => assert_eq!(balance, 600),
			DebitOutcome::Denied { reason, .. } => panic!("expected a successful withdrawal: {reason}"),
		}

		assert_eq!(handle.balance(CurrencyCode::BRL).await.unwrap(), 600);
	}

	#[tokio::test]
	async fn card_transaction_then_refund_restores_the_balance() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path(), Duration::from_secs(240));
		let handle = registry.server_process(1, InitialArgs::default());
		handle.deposit(1_000, CurrencyCode::BRL, None).await.unwrap();

		let operation = match handle.card_transaction(300, CurrencyCode::BRL, 42, None).await.unwrap() {
			DebitOutcome::Ok { operation, .. } => operation,
			DebitOutcome::Denied { reason, .. } => panic!("expected the card transaction to be accepted: {reason}"),
		};
		assert_eq!(handle.balance(CurrencyCode::BRL).await.unwrap(), 700);

		match handle.refund(operation.id, None).await.unwrap() {
			RefundOutcome::Ok { balances, .. } => assert_eq!(balances[&CurrencyCode::BRL], 1_000),
			RefundOutcome::Error { reason, .. } => panic!("expected refund to succeed: {reason}"),
		}
	}

	#[tokio::test]
	async fn exchange_moves_funds_between_currencies_at_the_seeded_rate() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path(), Duration::from_secs(240));
		let handle = registry.server_process(1, InitialArgs::default());
		handle.deposit(100, CurrencyCode::USD, None).await.unwrap();

		match handle.exchange(100, CurrencyCode::USD, CurrencyCode::BRL, None).await.unwrap() {
			ExchangeOutcome::Ok { balances, .. } => {
				assert_eq!(balances[&CurrencyCode::USD], 0);
				assert_eq!(balances[&CurrencyCode::BRL], 500);
			}
			ExchangeOutcome::Denied { reason, .. } => panic!("expected exchange to succeed: {reason}"),
		}
	}

	// Spawn, deposit, let the idle timer terminate the actor, then re-acquire
	// it and confirm the rehydrated balance survived the restart.
	#[tokio::test]
	async fn actor_rehydrates_its_balance_after_idle_termination() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path(), Duration::from_millis(50));
		let first = registry.server_process(7, InitialArgs::default());
		first.deposit(1_000, CurrencyCode::BRL, None).await.unwrap();

		tokio::time::sleep(Duration::from_millis(250)).await;
		assert!(!first.is_alive());

		let second = registry.server_process(7, InitialArgs::default());
		assert_eq!(second.balance(CurrencyCode::BRL).await.unwrap(), 1_000);
	}

	#[tokio::test]
	async fn single_transfer_credits_the_recipient_through_a_second_actor() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path(), Duration::from_secs(240));
		let sender = registry.server_process(1, InitialArgs::default());
		sender.deposit(1_000, CurrencyCode::BRL, None).await.unwrap();

		match sender.transfer_out_single(300, CurrencyCode::BRL, 2, Vec::new(), None).await.unwrap() {
			SingleTransferOutcome::Ok { balance, .. } => assert_eq!(balance, 700),
			SingleTransferOutcome::Denied { reason, .. } => panic!("expected transfer to succeed: {reason}"),
		}

		let recipient = registry.server_process(2, InitialArgs::default());
		assert_eq!(recipient.balance(CurrencyCode::BRL).await.unwrap(), 300);
	}

	#[tokio::test]
	async fn split_transfer_distributes_to_every_recipient_by_percentage() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path(), Duration::from_secs(240));
		let sender = registry.server_process(1, InitialArgs::default());
		sender.deposit(1_000, CurrencyCode::BRL, None).await.unwrap();

		let recipients = vec![
			TransferRecipient { percentage: 0.7, recipient_account_id: 2, extra: Vec::new() },
			TransferRecipient { percentage: 0.2, recipient_account_id: 3, extra: Vec::new() },
			TransferRecipient { percentage: 0.1, recipient_account_id: 4, extra: Vec::new() },
		];
		match sender.transfer_out_split(1_000, CurrencyCode::BRL, recipients, Vec::new(), None).await.unwrap() {
			SplitTransferOutcome::Ok { balance, .. } => assert_eq!(balance, 0),
			SplitTransferOutcome::Denied { reason, .. } => panic!("expected split transfer to succeed: {reason}"),
		}

		let second = registry.server_process(2, InitialArgs::default());
		let third = registry.server_process(3, InitialArgs::default());
		let fourth = registry.server_process(4, InitialArgs::default());
		assert_eq!(second.balance(CurrencyCode::BRL).await.unwrap(), 700);
		assert_eq!(third.balance(CurrencyCode::BRL).await.unwrap(), 200);
		assert_eq!(fourth.balance(CurrencyCode::BRL).await.unwrap(), 100);
	}
}
