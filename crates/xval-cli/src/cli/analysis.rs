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

//! Analysis commands over measurement directories.

use crate::commands;
use crate::error::CliError;
use clap::Subcommand;
use xval_core::Config;

/// Analysis commands.
#[derive(Subcommand)]
pub enum AnalysisCommands {
    /// Build the full cross-validation report
    ///
    /// Loads every `*.json` measurement file in DIR and prints, per routine,
    /// the ratio table, Final ratios and champions, followed by the compiler
    /// savings summary.
    Report {
        /// Directory of x-val result files
        #[arg(value_name = "DIR")]
        dir: String,

        /// Output format (text, markdown, json)
        #[arg(short, long, default_value = "text", value_parser = ["text", "markdown", "json"])]
        format: String,

        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Champion shortlist length (overrides the configuration)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Also write the grouped measurements as JSON
        #[arg(long, value_name = "FILE")]
        dump_store: Option<String>,

        /// Drop routines whose curve has no caption instead of failing
        #[arg(long)]
        skip_unknown_curves: bool,
    },

    /// List the best implementations per routine
    Champions {
        /// Directory of x-val result files
        #[arg(value_name = "DIR")]
        dir: String,

        /// Champion shortlist length (overrides the configuration)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Summarize savings over off-the-shelf compilers
    Savings {
        /// Directory of x-val result files
        #[arg(value_name = "DIR")]
        dir: String,

        /// Output format (text, markdown, json)
        #[arg(short, long, default_value = "text", value_parser = ["text", "markdown", "json"])]
        format: String,
    },

    /// Tabulate SUPERCOP scalar-multiplication results
    ///
    /// DIR holds one sub-directory per host, each with a SUPERCOP `data` file.
    Scalarmult {
        /// SUPERCOP results directory
        #[arg(value_name = "DIR")]
        dir: String,

        /// Output format (text, markdown, json)
        #[arg(short, long, default_value = "text", value_parser = ["text", "markdown", "json"])]
        format: String,
    },
}

impl AnalysisCommands {
    /// Execute the analysis command.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the command execution fails.
    pub fn execute(self, config: Config) -> Result<(), CliError> {
        match self {
            AnalysisCommands::Report {
                dir,
                format,
                output,
                top_k,
                dump_store,
                skip_unknown_curves,
            } => commands::report(
                &dir,
                &config,
                &commands::ReportOptions {
                    format: &format,
                    output: output.as_deref(),
                    top_k,
                    dump_store: dump_store.as_deref(),
                    skip_unknown_curves,
                },
            ),
            AnalysisCommands::Champions { dir, top_k, format } => {
                commands::champions(&dir, &config, top_k, &format)
            }
            AnalysisCommands::Savings { dir, format } => commands::savings(&dir, &config, &format),
            AnalysisCommands::Scalarmult { dir, format } => {
                commands::scalarmult(&dir, &config, &format)
            }
        }
    }
}
