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

use bank_node::{cli::Cli, init_tracing, BankNode};
use clap::Parser;

#[tokio::main]
async fn main() {
	init_tracing();

	let cli = Cli::parse();
	let config = match cli.into_config() {
		Ok(config) => config,
		Err(error) => {
			tracing::error!(target: "bank-node", %error, "invalid configuration");
			std::process::exit(1);
		}
	};

	let _node = BankNode::start(config);

	// The HTTP edge that would route requests to the registry above is out
	// of scope for this core (spec §1); this binary's job ends at wiring
	// the components together and keeping them alive.
	if let Err(error) = tokio::signal::ctrl_c().await {
		tracing::error!(target: "bank-node", %error, "failed to listen for shutdown signal");
	}
	tracing::info!(target: "bank-node", "shutting down");
}
