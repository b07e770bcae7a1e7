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

//! Utility commands.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use xval_core::Config;

/// Utility commands.
#[derive(Subcommand)]
pub enum UtilityCommands {
    /// Print the active configuration as YAML
    ///
    /// Without `--config` this is the built-in configuration, a starting
    /// point for a custom file.
    Config {
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl UtilityCommands {
    /// Execute the utility command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if serialization or writing fails.
    pub fn execute(self, config: Config) -> Result<(), CliError> {
        match self {
            UtilityCommands::Config { output } => commands::print_config(&config, output.as_deref()),
        }
    }
}
