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

//! Champions command.

use super::{load_measurements, with_top_k, write_output};
use crate::error::CliError;
use serde_json::json;
use xval_core::reporters::{console, to_json};
use xval_core::{rank_store, Config};

/// Print the champion shortlist of every routine.
///
/// # Errors
///
/// Returns `Err` if loading or ranking fails.
pub fn champions(
    dir: &str,
    config: &Config,
    top_k: Option<usize>,
    format: &str,
) -> Result<(), CliError> {
    let config = with_top_k(config, top_k)?;
    let summary = load_measurements(dir, &config)?;
    let rankings = rank_store(&summary.store, &config)?;

    let content = match format {
        "text" => console::render_champion_summary(&rankings),
        "json" => {
            let entries: Vec<_> = rankings
                .iter()
                .map(|r| {
                    json!({
                        "symbol": r.symbol,
                        "caption": r.caption,
                        "machines": r.columns,
                        "champions": r.champions,
                    })
                })
                .collect();
            to_json(&entries)?
        }
        other => {
            return Err(CliError::invalid_input(format!(
                "unsupported format '{}'",
                other
            )))
        }
    };
    write_output(&content, None)
}
