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

//! Complete cross-validation report.

use crate::config::Config;
use crate::error::Result;
use crate::ranking::{rank_store, RoutineRanking};
use crate::savings::{compiler_savings, CompilerSavings};
use crate::store::MeasurementStore;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Everything the reporters render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Machine columns.
    pub machines: Vec<String>,
    /// Compiler rows.
    pub compilers: Vec<String>,
    /// One ranking per routine, by symbol.
    pub rankings: Vec<RoutineRanking>,
    /// Savings over off-the-shelf compilers.
    pub savings: CompilerSavings,
}

impl Report {
    /// Looks up the ranking of a symbol.
    pub fn ranking(&self, symbol: &str) -> Option<&RoutineRanking> {
        self.rankings.iter().find(|r| r.symbol == symbol)
    }

    /// Total number of non-fatal diagnostics.
    pub fn diagnostic_count(&self) -> usize {
        self.rankings.iter().map(|r| r.diagnostics.len()).sum()
    }
}

/// Ranks every routine and summarizes compiler savings.
///
/// # Errors
///
/// Returns [`crate::XvalError::MissingCaption`] when a routine's curve has
/// no caption.
pub fn build_report(store: &MeasurementStore, config: &Config) -> Result<Report> {
    let rankings = rank_store(store, config)?;
    let savings = compiler_savings(&rankings, config)?;

    let report = Report {
        machines: config.machine_order().iter().map(|m| m.to_string()).collect(),
        compilers: config.compiler_order().iter().map(|c| c.to_string()).collect(),
        rankings,
        savings,
    };
    info!(
        "ranked {} routines ({} diagnostics)",
        report.rankings.len(),
        report.diagnostic_count()
    );
    Ok(report)
}

/// Drops routines whose curve has no caption instead of failing on them.
///
/// Returns the dropped symbols.
pub fn retain_captioned(store: &mut MeasurementStore, config: &Config) -> Vec<String> {
    let mut dropped = Vec::new();
    store.retain(|symbol| {
        let keep = config.has_caption(symbol);
        if !keep {
            dropped.push(symbol.to_string());
        }
        keep
    });
    dropped
}
