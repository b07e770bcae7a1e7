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

//! Ratio matrix computation.
//!
//! For one routine, every row (a tuning machine or a compiler) is compared
//! against every column (an execution machine):
//!
//! ```text
//! reference(col) = mean cycles of variants tuned on `col`, run on `col`
//! cell(row, col) = mean cycles of variants from `row`, run on `col`
//! ratio          = cell / reference
//! ```
//!
//! A column without a reference is unavailable for every row. The same pass
//! records, per column, the fastest machine-tuned and the fastest
//! compiler-generated cell; ranking turns those into the "Final" ratios.

use crate::record::Origin;
use crate::stats::{geometric_mean, mean, running_min};
use crate::store::RoutineGroup;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// How a defined ratio compares the candidate with the column's reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatioClass {
    /// Candidate needs fewer cycles than the reference (ratio < 1).
    Faster,
    /// Exactly the reference (ratio == 1).
    Identity,
    /// Candidate needs more cycles than the reference (ratio > 1).
    Slower,
}

impl RatioClass {
    /// Classifies a ratio.
    pub fn of(ratio: f64) -> Self {
        if ratio < 1.0 {
            RatioClass::Faster
        } else if ratio > 1.0 {
            RatioClass::Slower
        } else {
            RatioClass::Identity
        }
    }
}

/// Non-fatal findings attached to a routine's results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A configured row has no implementation for this routine.
    MissingRow {
        /// Row name
        row: String,
    },
    /// A ratio evaluated to NaN or infinity and was dropped.
    NonFiniteRatio {
        /// Row name
        row: String,
        /// Column machine
        column: String,
    },
    /// A geometric mean had no defined inputs.
    DegenerateGeometricMean {
        /// Row name, or `Final`
        row: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingRow { row } => {
                write!(f, "no implementation from '{}'", row)
            }
            Diagnostic::NonFiniteRatio { row, column } => {
                write!(f, "non-finite ratio for '{}' on '{}'", row, column)
            }
            Diagnostic::DegenerateGeometricMean { row } => {
                write!(f, "cannot calculate '{}' mean: no defined values", row)
            }
        }
    }
}

/// One row of the ratio matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioRow {
    /// Tuning machine or compiler of this row.
    pub origin: Origin,
    /// Ratio per column; `None` is "N/A".
    pub cells: Vec<Option<f64>>,
    /// Geometric mean of the defined cells.
    pub geometric_mean: Option<f64>,
}

/// Fastest mean cycles per column, split by row kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnBests {
    /// Best machine-tuned mean per column.
    pub optimized: Vec<Option<f64>>,
    /// Best compiler-generated mean per column.
    pub off_the_shelf: Vec<Option<f64>>,
}

impl ColumnBests {
    fn new(columns: usize) -> Self {
        Self {
            optimized: vec![None; columns],
            off_the_shelf: vec![None; columns],
        }
    }

    fn record(&mut self, origin: &Origin, column: usize, cycles: f64) {
        let slot = if origin.is_compiler() {
            &mut self.off_the_shelf[column]
        } else {
            &mut self.optimized[column]
        };
        *slot = running_min(*slot, cycles);
    }
}

/// Ratio matrix of one routine.
#[derive(Debug, Clone, PartialEq)]
pub struct RatioMatrix {
    /// Column machines.
    pub columns: Vec<String>,
    /// Machine rows followed by compiler rows.
    pub rows: Vec<RatioRow>,
    /// Per-column minima feeding the Final ratios.
    pub bests: ColumnBests,
    /// Findings collected while computing.
    pub diagnostics: Vec<Diagnostic>,
}

/// Mean cycles of variants tuned on `column` and run on `column`.
pub fn reference_cycles(group: &RoutineGroup, column: &str) -> Option<f64> {
    mean(&group.cycles(&Origin::MachineTuned(column.to_string()), column))
}

/// Mean cycles of `origin`'s variants run on `column`.
pub fn cell_cycles(group: &RoutineGroup, origin: &Origin, column: &str) -> Option<f64> {
    mean(&group.cycles(origin, column))
}

/// Computes the ratio matrix of one routine.
///
/// Rows are `machines` (as machine-tuned origins) followed by `compilers`,
/// regardless of which of them occur in the data, so every routine yields
/// the same row set.
pub fn compute_matrix(group: &RoutineGroup, machines: &[&str], compilers: &[&str]) -> RatioMatrix {
    let columns: Vec<String> = machines.iter().map(|m| m.to_string()).collect();
    let references: Vec<Option<f64>> = machines
        .iter()
        .map(|column| reference_cycles(group, column))
        .collect();

    let origins = machines
        .iter()
        .map(|m| Origin::MachineTuned(m.to_string()))
        .chain(compilers.iter().map(|c| Origin::CompilerGenerated(c.to_string())));

    let mut bests = ColumnBests::new(columns.len());
    let mut diagnostics = Vec::new();
    let mut rows = Vec::new();

    for origin in origins {
        if group.origin(&origin).is_none() {
            warn!(
                "{} should be present in {} (no implementation from {})",
                origin, group.symbol, origin
            );
            diagnostics.push(Diagnostic::MissingRow {
                row: origin.to_string(),
            });
            rows.push(RatioRow {
                origin,
                cells: vec![None; columns.len()],
                geometric_mean: None,
            });
            continue;
        }

        let mut cells = Vec::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let cell = match (references[i], cell_cycles(group, &origin, column)) {
                (Some(reference), Some(cycles)) => {
                    bests.record(&origin, i, cycles);
                    let ratio = cycles / reference;
                    if ratio.is_finite() {
                        Some(ratio)
                    } else {
                        warn!(
                            "{}: ratio for {} on {} is not finite",
                            group.symbol, origin, column
                        );
                        diagnostics.push(Diagnostic::NonFiniteRatio {
                            row: origin.to_string(),
                            column: column.clone(),
                        });
                        None
                    }
                }
                _ => None,
            };
            cells.push(cell);
        }

        let defined: Vec<f64> = cells.iter().flatten().copied().collect();
        let row_mean = geometric_mean(&defined);
        if row_mean.is_none() {
            warn!("cannot calculate {}-{} mean", group.symbol, origin);
            diagnostics.push(Diagnostic::DegenerateGeometricMean {
                row: origin.to_string(),
            });
        }

        rows.push(RatioRow {
            origin,
            cells,
            geometric_mean: row_mean,
        });
    }

    RatioMatrix {
        columns,
        rows,
        bests,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Measurement;
    use crate::store::MeasurementStore;

    fn group(records: &[(&str, &str, &str, f64)]) -> RoutineGroup {
        let compilers = ["GCC", "Clang"];
        let (store, rejected) = MeasurementStore::from_records(records.iter().map(
            |(opt_on, filename, ran_on, cycles)| {
                let origin = if compilers.contains(opt_on) {
                    Origin::CompilerGenerated(opt_on.to_string())
                } else {
                    Origin::MachineTuned(opt_on.to_string())
                };
                Measurement::new("x_mul", origin, *filename, *ran_on, *cycles).unwrap()
            },
        ));
        assert!(rejected.is_empty());
        store.group("x_mul").unwrap().clone()
    }

    #[test]
    fn test_identity_and_missing_reference() {
        let g = group(&[("M1", "f1", "M1", 100.0), ("M1", "f1", "M2", 150.0)]);
        let matrix = compute_matrix(&g, &["M1", "M2"], &[]);

        let m1 = &matrix.rows[0];
        assert_eq!(m1.cells[0], Some(1.0));
        assert_eq!(m1.cells[1], None);
        assert_eq!(m1.geometric_mean, Some(1.0));

        // M2 never tuned anything: full N/A row
        let m2 = &matrix.rows[1];
        assert_eq!(m2.cells, vec![None, None]);
        assert_eq!(m2.geometric_mean, None);
        assert!(matrix
            .diagnostics
            .contains(&Diagnostic::MissingRow { row: "M2".into() }));
    }

    #[test]
    fn test_cross_machine_ratios() {
        let g = group(&[
            ("M1", "a", "M1", 100.0),
            ("M1", "a", "M2", 220.0),
            ("M2", "b", "M1", 125.0),
            ("M2", "b", "M2", 200.0),
        ]);
        let matrix = compute_matrix(&g, &["M1", "M2"], &[]);
        assert_eq!(matrix.rows[0].cells, vec![Some(1.0), Some(1.1)]);
        assert_eq!(matrix.rows[1].cells, vec![Some(1.25), Some(1.0)]);
    }

    #[test]
    fn test_repeated_trials_are_averaged() {
        let g = group(&[
            ("M1", "a", "M1", 90.0),
            ("M1", "a", "M1", 110.0),
            ("GCC", "0NA", "M1", 150.0),
            ("GCC", "1NA", "M1", 250.0),
        ]);
        let matrix = compute_matrix(&g, &["M1"], &["GCC"]);
        assert_eq!(matrix.rows[0].cells, vec![Some(1.0)]);
        assert_eq!(matrix.rows[1].cells, vec![Some(2.0)]);
    }

    #[test]
    fn test_column_without_reference_is_disabled_for_all_rows() {
        // M2 has compiler data and an M1-tuned run, but nothing tuned on M2
        let g = group(&[
            ("M1", "a", "M1", 100.0),
            ("M1", "a", "M2", 100.0),
            ("GCC", "0NA", "M1", 120.0),
            ("GCC", "0NA", "M2", 130.0),
        ]);
        let matrix = compute_matrix(&g, &["M1", "M2"], &["GCC"]);
        for row in &matrix.rows {
            assert_eq!(row.cells[1], None, "row {}", row.origin);
        }
        assert_eq!(matrix.bests.optimized, vec![Some(100.0), None]);
        assert_eq!(matrix.bests.off_the_shelf, vec![Some(120.0), None]);
    }

    #[test]
    fn test_bests_partition_machine_and_compiler_rows() {
        let g = group(&[
            ("M1", "a", "M1", 100.0),
            ("M2", "b", "M1", 95.0),
            ("M2", "b", "M2", 80.0),
            ("Clang", "0NA", "M1", 140.0),
            ("GCC", "0NA", "M1", 130.0),
            ("GCC", "0NA", "M2", 110.0),
        ]);
        let matrix = compute_matrix(&g, &["M1", "M2"], &["Clang", "GCC"]);
        assert_eq!(matrix.bests.optimized, vec![Some(95.0), Some(80.0)]);
        assert_eq!(matrix.bests.off_the_shelf, vec![Some(130.0), Some(110.0)]);
        assert_eq!(matrix.rows.len(), 4);
        assert_eq!(matrix.rows[2].origin, Origin::CompilerGenerated("Clang".into()));
        assert_eq!(matrix.rows[2].cells, vec![Some(1.4), None]);
    }

    #[test]
    fn test_ratio_class() {
        assert_eq!(RatioClass::of(0.9), RatioClass::Faster);
        assert_eq!(RatioClass::of(1.0), RatioClass::Identity);
        assert_eq!(RatioClass::of(1.2), RatioClass::Slower);
    }
}
