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

//! Report and savings commands.

use super::{load_measurements, use_color, with_top_k, write_output};
use crate::error::CliError;
use tracing::{info, warn};
use xval_core::reporters::{console, markdown, to_json};
use xval_core::{build_report, retain_captioned, Config};

/// Options of the `report` command.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions<'a> {
    /// Output format (text, markdown, json)
    pub format: &'a str,
    /// Output file, stdout when `None`
    pub output: Option<&'a str>,
    /// Shortlist length override
    pub top_k: Option<usize>,
    /// Where to dump the grouped store
    pub dump_store: Option<&'a str>,
    /// Drop uncaptioned routines instead of failing
    pub skip_unknown_curves: bool,
}

/// Build and print the full report.
///
/// # Errors
///
/// Returns `Err` if loading fails, a routine has no caption (unless
/// `skip_unknown_curves`), or the output cannot be written.
pub fn report(dir: &str, config: &Config, options: &ReportOptions<'_>) -> Result<(), CliError> {
    let config = with_top_k(config, options.top_k)?;
    let mut summary = load_measurements(dir, &config)?;

    if options.skip_unknown_curves {
        for symbol in retain_captioned(&mut summary.store, &config) {
            warn!("dropping {}: no caption for its curve", symbol);
        }
    }

    if let Some(path) = options.dump_store {
        write_output(&to_json(&summary.store)?, Some(path))?;
        info!("wrote measurement store to {}", path);
    }

    let report = build_report(&summary.store, &config)?;
    let content = match options.format {
        "text" => console::render_report(&report, use_color(options.output)),
        "markdown" => markdown::render_report(&report),
        "json" => to_json(&report)?,
        other => {
            return Err(CliError::invalid_input(format!(
                "unsupported format '{}'",
                other
            )))
        }
    };
    write_output(&content, options.output)
}

/// Print the compiler savings summary.
///
/// # Errors
///
/// Returns `Err` if loading or ranking fails.
pub fn savings(dir: &str, config: &Config, format: &str) -> Result<(), CliError> {
    let summary = load_measurements(dir, config)?;
    let report = build_report(&summary.store, config)?;

    let content = match format {
        "text" => console::render_savings(&report.savings),
        "markdown" => markdown::render_savings(&report.savings),
        "json" => to_json(&report.savings)?,
        other => {
            return Err(CliError::invalid_input(format!(
                "unsupported format '{}'",
                other
            )))
        }
    };
    write_output(&content, None)
}
