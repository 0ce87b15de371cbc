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

//! Account id → live actor handle, spawned on demand.

use crate::{account_actor, account_actor::AccountActorHandle, error::ActorError, rates::RatesHandle};
use bank_core::{AccountId, InitialArgs};
use bank_storage::StoragePool;
use parking_lot::RwLock;
use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc, time::Duration};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ActorError>> + Send + 'a>>;

/// Spawns account actors on demand and keeps the canonical id → handle map.
#[derive(Clone)]
pub struct Registry {
	actors: Arc<RwLock<HashMap<AccountId, AccountActorHandle>>>,
	storage: StoragePool,
	rates: RatesHandle,
	idle_timeout: Duration,
}

impl Registry {
	pub fn new(storage: StoragePool, rates: RatesHandle, idle_timeout: Duration) -> Self {
		Self { actors: Arc::new(RwLock::new(HashMap::new())), storage, rates, idle_timeout }
	}

	pub fn idle_timeout(&self) -> Duration {
		self.idle_timeout
	}

	/// Returns the existing handle for `account_id` if one is registered
	/// and alive, spawning a fresh actor otherwise. `initial_args` is used
	/// only when a new actor is spawned; it is ignored if one already
	/// exists. Race-free: two concurrent callers for the same id converge
	/// on the same handle.
	pub fn server_process(&self, account_id: AccountId, initial_args: InitialArgs) -> AccountActorHandle {
		if let Some(handle) = self.actors.read().get(&account_id) {
			if handle.is_alive() {
				return handle.clone();
			}
		}

		let mut actors = self.actors.write();
		if let Some(handle) = actors.get(&account_id) {
			if handle.is_alive() {
				return handle.clone();
			}
		}

		let handle = account_actor::spawn(
			account_id,
			initial_args,
			self.storage.clone(),
			self.rates.clone(),
			self.clone(),
			self.idle_timeout,
		);
		actors.insert(account_id, handle.clone());
		handle
	}

	/// Removes `account_id`'s registration. Called by an actor's own task
	/// as its last act before exiting, after draining any message that
	/// raced its idle shutdown.
	pub(crate) fn deregister(&self, account_id: AccountId) {
		self.actors.write().remove(&account_id);
	}

	/// Runs `f` against `account_id`'s actor, retrying exactly once (via a
	/// fresh `server_process` lookup) if the handle turned out to be
	/// stale — the in-flight-termination race described in §4.3.
	pub async fn with_actor<T, F>(&self, account_id: AccountId, initial_args: InitialArgs, mut f: F) -> Result<T, ActorError>
	where
		F: FnMut(AccountActorHandle) -> BoxFuture<'static, T>,
	{
		let handle = self.server_process(account_id, initial_args.clone());
		match f(handle).await {
			Err(ActorError::Terminated) => {
				let handle = self.server_process(account_id, initial_args);
				f(handle).await
			}
			other => other,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use bank_core::CurrencyCode;
	use std::collections::BTreeMap;

	fn test_registry(dir: &std::path::Path) -> Registry {
		let storage = StoragePool::new(2, dir);
		let rates = RatesHandle::new(BTreeMap::from([(CurrencyCode::BRL, 1.0)]));
		Registry::new(storage, rates, Duration::from_secs(240))
	}

	#[tokio::test]
	async fn server_process_returns_the_same_handle_for_the_same_id() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path());
		let a = registry.server_process(1, InitialArgs::default());
		let b = registry.server_process(1, InitialArgs::default());
		assert_eq!(a.account_id(), b.account_id());

		a.deposit(100, CurrencyCode::BRL, None).await.unwrap();
		// `b` talks to the same underlying actor, so it observes the deposit.
		assert_eq!(b.balance(CurrencyCode::BRL).await.unwrap(), 100);
	}

	#[tokio::test]
	async fn server_process_spawns_distinct_actors_for_distinct_ids() {
		let dir = tempfile::tempdir().unwrap();
		let registry = test_registry(dir.path());
		let a = registry.server_process(1, InitialArgs::default());
		let b = registry.server_process(2, InitialArgs::default());
		assert_ne!(a.account_id(), b.account_id());
	}
}
