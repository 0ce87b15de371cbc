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

//! Pure multi-currency account domain model.
//!
//! Everything in this crate is deterministic and free of I/O: given an
//! [`Account`] and a request, each operation returns the account that
//! results and the [`Operation`] recorded for it. `bank-storage` persists
//! the results, `bank-actor` serializes concurrent access to them.

mod account;
mod currency;
mod money;
mod operation;
mod rates;
mod time;

pub use account::{
	Account, DebitResult, ExchangeResult, InitialArgs, RefundResult, SplitTransferResult, TransferRecipient,
};
pub use currency::{CurrencyCode, InvalidCurrencyCode};
pub use money::{round_amount, Money, Rate};
pub use operation::{AccountId, Operation, OperationData, OperationId, OperationStatus, OperationType, ScalarValue};
pub use rates::{RatesError, RatesTable};
pub use time::Timestamp;
