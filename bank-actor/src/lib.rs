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

//! Per-account actors, the id registry, and the process-wide rates table
//! that sit on top of the pure `bank-core` domain model and the
//! `bank-storage` write-through pool.

mod account_actor;
mod error;
mod rates;
mod registry;

pub use account_actor::{
	AccountActorHandle, DebitOutcome, ExchangeOutcome, RefundOutcome, SingleTransferOutcome, SplitTransferOutcome,
};
pub use error::ActorError;
pub use rates::{spawn_refresher, RatesHandle};
pub use registry::Registry;
