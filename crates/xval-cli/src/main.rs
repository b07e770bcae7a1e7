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

//! XVAL Command Line Interface

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use xval_cli::cli::Commands;
use xval_cli::commands::load_config;

/// XVAL - Cross-machine benchmark validation
///
/// Ranks cycle-count measurements of field-arithmetic routines across the
/// machines they were tuned on and the machines they ran on.
///
/// # Examples
///
/// ```bash
/// # Full report as Markdown
/// xval report results/ --format markdown --output report.md
///
/// # Top three implementations per routine
/// xval champions results/ --top-k 3
///
/// # Start a custom configuration
/// xval config > xval.yaml
/// ```
#[derive(Parser)]
#[command(name = "xval")]
#[command(author, version, about = "XVAL - Cross-machine benchmark validation", long_about = None)]
struct Cli {
    /// Configuration file (YAML); built-in tables when omitted
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Log debug details to stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Log errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("xval={level},xval_core={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let result = load_config(cli.config.as_deref()).and_then(|config| cli.command.execute(config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
