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

use bank_core::{AccountId, RatesError};
use bank_storage::StorageError;

/// Infrastructure failures that cross the actor boundary. Business denials
/// and precondition errors are modeled as `Ok` variants of the pure layer's
/// outcome types, never as an `ActorError` (see §7 of the design notes).
#[derive(Debug, thiserror::Error)]
pub enum ActorError {
	#[error("account actor is no longer running")]
	Terminated,
	#[error(transparent)]
	Storage(#[from] StorageError),
	#[error(transparent)]
	Rates(#[from] RatesError),
	#[error("cross-account call to account {0} timed out")]
	Timeout(AccountId),
	#[error("recipient account {0} is unavailable: {1}")]
	RecipientUnavailable(AccountId, String),
}
