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

//! Final ratios and champion selection.
//!
//! Routines are independent, so [`rank_store`] ranks them in parallel over
//! the read-only store and collects the results in symbol order.

use crate::config::Config;
use crate::engine::{compute_matrix, ColumnBests, Diagnostic, RatioRow};
use crate::error::Result;
use crate::record::Origin;
use crate::stats::{geometric_mean, mean};
use crate::store::{MeasurementStore, RoutineGroup};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One implementation ranked by its geometric-mean cycle count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    /// Tuning machine or compiler.
    pub origin: Origin,
    /// Solution id.
    pub filename: String,
    /// Mean cycles per configured machine; `None` where it never ran.
    pub per_machine: Vec<Option<f64>>,
    /// Geometric mean over the machines it ran on.
    pub geometric_mean: f64,
    /// Number of configured machines with data.
    pub machines_covered: usize,
}

/// Complete ranking result of one routine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineRanking {
    /// Routine symbol.
    pub symbol: String,
    /// Display caption.
    pub caption: String,
    /// Column machines.
    pub columns: Vec<String>,
    /// Machine rows followed by compiler rows.
    pub rows: Vec<RatioRow>,
    /// Best compiler cycles over best optimized cycles, per column.
    pub finals: Vec<Option<f64>>,
    /// Geometric mean of the defined Final ratios.
    pub final_geometric_mean: Option<f64>,
    /// Best implementations, best first.
    pub champions: Vec<Champion>,
    /// Non-fatal findings.
    pub diagnostics: Vec<Diagnostic>,
}

impl RoutineRanking {
    /// The best implementation, if any ran on a configured machine.
    pub fn champion(&self) -> Option<&Champion> {
        self.champions.first()
    }

    /// The row for an origin.
    pub fn row(&self, origin: &Origin) -> Option<&RatioRow> {
        self.rows.iter().find(|row| &row.origin == origin)
    }
}

/// Final ratio per column: best off-the-shelf cycles / best optimized cycles.
///
/// `None` where either minimum was never established.
pub fn final_ratios(bests: &ColumnBests) -> Vec<Option<f64>> {
    bests
        .optimized
        .iter()
        .zip(&bests.off_the_shelf)
        .map(|(optimized, off_the_shelf)| match (optimized, off_the_shelf) {
            (Some(optimized), Some(off_the_shelf)) => Some(off_the_shelf / optimized),
            _ => None,
        })
        .collect()
}

/// Ranks every (origin, filename) pair of a routine by geometric-mean cycles.
///
/// Repeated trials on a machine are averaged first; the geometric mean is
/// then taken over the configured machines that have data. Pairs that never
/// ran on a configured machine are skipped.
///
/// Pairs measured on more configured machines rank first, so a single run
/// on a fast host cannot outrank a pair measured everywhere. Within the same
/// coverage the lower geometric mean wins and ties keep first-seen order.
pub fn rank_champions(group: &RoutineGroup, machines: &[&str]) -> Vec<Champion> {
    let mut champions: Vec<Champion> = group
        .solutions()
        .filter_map(|(origin, solution)| {
            let per_machine: Vec<Option<f64>> = machines
                .iter()
                .map(|machine| mean(&solution.cycles_on(machine).collect::<Vec<_>>()))
                .collect();
            let defined: Vec<f64> = per_machine.iter().flatten().copied().collect();

            match geometric_mean(&defined) {
                Some(gm) => Some(Champion {
                    origin: origin.clone(),
                    filename: solution.filename.clone(),
                    machines_covered: defined.len(),
                    per_machine,
                    geometric_mean: gm,
                }),
                None => {
                    debug!(
                        "{}: {}/{} has no runs on configured machines",
                        group.symbol, origin, solution.filename
                    );
                    None
                }
            }
        })
        .collect();

    // stable: equal keys keep first-seen order
    champions.sort_by(|a, b| {
        b.machines_covered
            .cmp(&a.machines_covered)
            .then(a.geometric_mean.total_cmp(&b.geometric_mean))
    });
    champions
}

/// Ranks one routine.
///
/// # Errors
///
/// Returns [`crate::XvalError::MissingCaption`] when the routine's curve has
/// no caption.
pub fn rank_routine(group: &RoutineGroup, config: &Config) -> Result<RoutineRanking> {
    let caption = config.caption_for(&group.symbol)?;
    let machines = config.machine_order();
    let compilers = config.compiler_order();

    let matrix = compute_matrix(group, &machines, &compilers);
    let finals = final_ratios(&matrix.bests);
    let mut diagnostics = matrix.diagnostics;

    let defined_finals: Vec<f64> = finals.iter().flatten().copied().collect();
    let final_geometric_mean = geometric_mean(&defined_finals);
    if final_geometric_mean.is_none() {
        warn!("cannot calculate {}-Final mean", group.symbol);
        diagnostics.push(Diagnostic::DegenerateGeometricMean {
            row: "Final".to_string(),
        });
    }

    let mut champions = rank_champions(group, &machines);
    champions.truncate(config.top_k);

    Ok(RoutineRanking {
        symbol: group.symbol.clone(),
        caption,
        columns: matrix.columns,
        rows: matrix.rows,
        finals,
        final_geometric_mean,
        champions,
        diagnostics,
    })
}

/// Ranks every routine in the store, in symbol order.
///
/// # Errors
///
/// Fails on the first routine whose caption is missing.
pub fn rank_store(store: &MeasurementStore, config: &Config) -> Result<Vec<RoutineRanking>> {
    let groups: Vec<&RoutineGroup> = store.groups().collect();
    groups
        .par_iter()
        .map(|group| rank_routine(group, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Measurement;

    fn store(records: &[(&str, &str, &str, &str, f64)]) -> MeasurementStore {
        let config = Config::default();
        let (store, _) = MeasurementStore::from_records(records.iter().map(
            |(symbol, opt_on, filename, ran_on, cycles)| {
                Measurement::new(
                    *symbol,
                    config.classify_origin(opt_on),
                    *filename,
                    *ran_on,
                    *cycles,
                )
                .unwrap()
            },
        ));
        store
    }

    fn config() -> Config {
        Config::default()
            .with_machines(&["M1", "M2"])
            .with_caption("x", "X")
            .with_caption("y", "Y")
    }

    #[test]
    fn test_champion_by_geometric_mean() {
        let s = store(&[
            ("y_mul", "M1", "A", "M1", 100.0),
            ("y_mul", "M1", "A", "M2", 100.0),
            ("y_mul", "M1", "B", "M1", 80.0),
            ("y_mul", "M1", "B", "M2", 120.0),
        ]);
        let champions = rank_champions(s.group("y_mul").unwrap(), &["M1", "M2"]);
        assert_eq!(champions[0].filename, "B");
        assert!((champions[0].geometric_mean - 97.979_589_711).abs() < 1e-6);
        assert_eq!(champions[1].filename, "A");
        assert_eq!(champions[1].geometric_mean, 100.0);
    }

    #[test]
    fn test_champion_ties_keep_first_seen() {
        let s = store(&[
            ("y_mul", "M2", "late", "M1", 100.0),
            ("y_mul", "M1", "early", "M1", 100.0),
        ]);
        let champions = rank_champions(s.group("y_mul").unwrap(), &["M1"]);
        assert_eq!(champions[0].filename, "late");
        assert_eq!(champions[1].filename, "early");
    }

    #[test]
    fn test_champion_averages_trials_and_skips_foreign_machines() {
        let s = store(&[
            ("y_mul", "M1", "A", "M1", 90.0),
            ("y_mul", "M1", "A", "M1", 110.0),
            ("y_mul", "M1", "A", "elsewhere", 1.0),
            ("y_mul", "M1", "C", "elsewhere", 1.0),
        ]);
        let champions = rank_champions(s.group("y_mul").unwrap(), &["M1", "M2"]);
        assert_eq!(champions.len(), 1);
        assert_eq!(champions[0].per_machine, vec![Some(100.0), None]);
        assert_eq!(champions[0].machines_covered, 1);
    }

    #[test]
    fn test_full_coverage_outranks_partial() {
        let s = store(&[
            ("y_mul", "M1", "everywhere", "M1", 100.0),
            ("y_mul", "M1", "everywhere", "M2", 120.0),
            ("y_mul", "M2", "one-host", "M2", 50.0),
            ("y_mul", "M2", "other", "M1", 90.0),
        ]);
        let champions = rank_champions(s.group("y_mul").unwrap(), &["M1", "M2"]);
        let order: Vec<(&str, usize)> = champions
            .iter()
            .map(|c| (c.filename.as_str(), c.machines_covered))
            .collect();
        assert_eq!(order, vec![("everywhere", 2), ("one-host", 1), ("other", 1)]);
    }

    #[test]
    fn test_final_ratios() {
        let bests = ColumnBests {
            optimized: vec![Some(100.0), Some(50.0), None],
            off_the_shelf: vec![Some(150.0), None, Some(10.0)],
        };
        assert_eq!(final_ratios(&bests), vec![Some(1.5), None, None]);
    }

    #[test]
    fn test_rank_routine_finals() {
        let s = store(&[
            ("x_mul", "M1", "a", "M1", 100.0),
            ("x_mul", "M2", "b", "M2", 100.0),
            ("x_mul", "gcc", "0NA", "M1", 150.0),
            ("x_mul", "clang", "0NA", "M1", 120.0),
            ("x_mul", "gcc", "0NA", "M2", 200.0),
        ]);
        let ranking = rank_routine(s.group("x_mul").unwrap(), &config()).unwrap();
        assert_eq!(ranking.caption, "X");
        assert_eq!(ranking.finals, vec![Some(1.2), Some(2.0)]);
        let gm = ranking.final_geometric_mean.unwrap();
        assert!((gm - (1.2f64 * 2.0).sqrt()).abs() < 1e-12);
        assert_eq!(ranking.rows.len(), 4);
    }

    #[test]
    fn test_rank_routine_without_compilers_has_no_final() {
        let s = store(&[("x_mul", "M1", "a", "M1", 100.0)]);
        let ranking = rank_routine(s.group("x_mul").unwrap(), &config()).unwrap();
        assert_eq!(ranking.finals, vec![None, None]);
        assert_eq!(ranking.final_geometric_mean, None);
        assert!(ranking.diagnostics.contains(&Diagnostic::DegenerateGeometricMean {
            row: "Final".to_string()
        }));
    }

    #[test]
    fn test_top_k_truncates() {
        let records: Vec<(String, f64)> =
            (0..15).map(|i| (format!("f{}", i), 100.0 + i as f64)).collect();
        let rows: Vec<(&str, &str, &str, &str, f64)> = records
            .iter()
            .map(|(f, c)| ("x_mul", "M1", f.as_str(), "M1", *c))
            .collect();
        let s = store(&rows);
        let ranking = rank_routine(s.group("x_mul").unwrap(), &config().with_top_k(3)).unwrap();
        let names: Vec<&str> = ranking.champions.iter().map(|c| c.filename.as_str()).collect();
        assert_eq!(names, vec!["f0", "f1", "f2"]);
    }

    #[test]
    fn test_rank_store_missing_caption_is_fatal() {
        let s = store(&[("p999_mul", "M1", "a", "M1", 100.0)]);
        assert!(rank_store(&s, &config()).is_err());
    }

    #[test]
    fn test_rank_store_symbol_order() {
        let s = store(&[
            ("y_square", "M1", "a", "M1", 100.0),
            ("x_mul", "M1", "a", "M1", 100.0),
            ("y_mul", "M1", "a", "M1", 100.0),
        ]);
        let rankings = rank_store(&s, &config()).unwrap();
        let symbols: Vec<&str> = rankings.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["x_mul", "y_mul", "y_square"]);
    }
}
