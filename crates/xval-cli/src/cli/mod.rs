// Dweve XVAL - Cross-Machine Benchmark Validation
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! CLI command definitions and argument parsing.
//!
//! - [`analysis`]: report, champions, savings, scalarmult
//! - [`utility`]: config

mod analysis;
mod utility;

use crate::error::CliError;
use clap::Subcommand;
use xval_core::Config;

pub use analysis::AnalysisCommands;
pub use utility::UtilityCommands;

/// Top-level CLI commands enum.
///
/// ```text
/// Commands
/// ├── Analysis (report, champions, savings, scalarmult)
/// └── Utility (config)
/// ```
#[derive(Subcommand)]
pub enum Commands {
    // Analysis commands - flattened to appear at top level
    #[command(flatten)]
    Analysis(AnalysisCommands),

    // Utility commands - flattened to appear at top level
    #[command(flatten)]
    Utility(UtilityCommands),
}

impl Commands {
    /// Execute the command with the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `Err` if loading, ranking or writing output fails.
    pub fn execute(self, config: Config) -> Result<(), CliError> {
        match self {
            Commands::Analysis(cmd) => cmd.execute(config),
            Commands::Utility(cmd) => cmd.execute(config),
        }
    }
}
