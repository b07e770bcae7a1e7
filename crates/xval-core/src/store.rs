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

//! In-memory measurement store.
//!
//! Measurements are indexed symbol → origin → filename → runs. Origins and
//! filenames keep their first-seen order and runs keep insertion order, so
//! every later pass (and every tie-break) is deterministic. Repeated trials
//! are kept as separate runs; averaging happens in the engine.

use crate::error::{Result, XvalError};
use crate::record::{Measurement, Origin};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::warn;

/// A single (ran on, cycles) observation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Run {
    /// Machine the measurement was executed on.
    pub ran_on: String,
    /// Cycle count.
    pub cycles: f64,
}

/// All runs of one solution (one filename).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    /// Solution id.
    pub filename: String,
    /// Runs in insertion order.
    pub runs: Vec<Run>,
}

impl Solution {
    /// Cycle counts of the runs executed on `machine`.
    pub fn cycles_on<'a>(&'a self, machine: &'a str) -> impl Iterator<Item = f64> + 'a {
        self.runs
            .iter()
            .filter(move |run| run.ran_on == machine)
            .map(|run| run.cycles)
    }
}

/// All solutions sharing one origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginGroup {
    /// Tuning machine or compiler.
    pub origin: Origin,
    /// Solutions in first-seen order.
    pub solutions: Vec<Solution>,
}

impl OriginGroup {
    /// Cycle counts of every solution of this origin executed on `machine`.
    pub fn cycles_on(&self, machine: &str) -> Vec<f64> {
        self.solutions
            .iter()
            .flat_map(|solution| solution.cycles_on(machine))
            .collect()
    }

    fn solution_mut(&mut self, filename: &str) -> &mut Solution {
        let index = match self.solutions.iter().position(|s| s.filename == filename) {
            Some(index) => index,
            None => {
                self.solutions.push(Solution {
                    filename: filename.to_string(),
                    runs: Vec::new(),
                });
                self.solutions.len() - 1
            }
        };
        &mut self.solutions[index]
    }
}

/// All measurements of one routine symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutineGroup {
    /// Routine symbol shared by every measurement in the group.
    pub symbol: String,
    /// Origins in first-seen order.
    pub origins: Vec<OriginGroup>,
}

impl RoutineGroup {
    /// Creates an empty group.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            origins: Vec::new(),
        }
    }

    /// Looks up the group for an origin.
    pub fn origin(&self, origin: &Origin) -> Option<&OriginGroup> {
        self.origins.iter().find(|group| &group.origin == origin)
    }

    /// Cycle counts of `origin`'s solutions executed on `machine`.
    ///
    /// Empty when the origin is unknown or never ran there.
    pub fn cycles(&self, origin: &Origin, machine: &str) -> Vec<f64> {
        self.origin(origin)
            .map(|group| group.cycles_on(machine))
            .unwrap_or_default()
    }

    /// Every machine a measurement of this routine ran on, first-seen order.
    pub fn ran_on(&self) -> Vec<&str> {
        let mut machines: Vec<&str> = Vec::new();
        for run in self.runs() {
            if !machines.contains(&run.ran_on.as_str()) {
                machines.push(&run.ran_on);
            }
        }
        machines
    }

    /// All (origin, solution) pairs in first-seen order.
    pub fn solutions(&self) -> impl Iterator<Item = (&Origin, &Solution)> {
        self.origins.iter().flat_map(|group| {
            group
                .solutions
                .iter()
                .map(move |solution| (&group.origin, solution))
        })
    }

    /// Total number of runs.
    pub fn measurement_count(&self) -> usize {
        self.runs().count()
    }

    fn runs(&self) -> impl Iterator<Item = &Run> {
        self.solutions().flat_map(|(_, solution)| solution.runs.iter())
    }

    fn push(&mut self, origin: Origin, filename: &str, run: Run) {
        let index = match self.origins.iter().position(|g| g.origin == origin) {
            Some(index) => index,
            None => {
                self.origins.push(OriginGroup {
                    origin,
                    solutions: Vec::new(),
                });
                self.origins.len() - 1
            }
        };
        self.origins[index].solution_mut(filename).runs.push(run);
    }

    fn absorb(&mut self, other: RoutineGroup) {
        for group in other.origins {
            for solution in group.solutions {
                for run in solution.runs {
                    self.push(group.origin.clone(), &solution.filename, run);
                }
            }
        }
    }
}

/// Index of all measurements of one report run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MeasurementStore {
    routines: BTreeMap<String, RoutineGroup>,
}

impl MeasurementStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store, collecting rejected measurements instead of failing.
    ///
    /// Every rejection is logged as a warning.
    pub fn from_records(records: impl IntoIterator<Item = Measurement>) -> (Self, Vec<XvalError>) {
        let mut store = Self::new();
        let mut rejected = Vec::new();
        for record in records {
            if let Err(err) = store.insert(record) {
                warn!("dropping record: {}", err);
                rejected.push(err);
            }
        }
        (store, rejected)
    }

    /// Adds one measurement.
    ///
    /// Duplicates are kept: identical records are independent trials.
    ///
    /// # Errors
    ///
    /// Returns [`XvalError::MalformedRecord`] for an empty symbol or a
    /// cycle count that is not a positive finite number. The store is left
    /// unchanged.
    pub fn insert(&mut self, measurement: Measurement) -> Result<()> {
        let Measurement {
            symbol,
            origin,
            filename,
            ran_on,
            cycles,
        } = measurement;

        if symbol.is_empty() {
            return Err(XvalError::malformed(symbol, "empty symbol"));
        }
        if !cycles.is_finite() || cycles <= 0.0 {
            return Err(XvalError::malformed(
                symbol,
                format!("cycles must be a positive number, got {}", cycles),
            ));
        }

        self.routines
            .entry(symbol.clone())
            .or_insert_with(|| RoutineGroup::new(symbol))
            .push(origin, &filename, Run { ran_on, cycles });
        Ok(())
    }

    /// Folds another store into this one.
    ///
    /// Runs of a solution present in both stores are concatenated, this
    /// store's first.
    pub fn merge(&mut self, other: MeasurementStore) {
        for (symbol, group) in other.routines {
            match self.routines.get_mut(&symbol) {
                Some(existing) => existing.absorb(group),
                None => {
                    self.routines.insert(symbol, group);
                }
            }
        }
    }

    /// All symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        self.routines.keys().map(String::as_str).collect()
    }

    /// The group for a symbol.
    pub fn group(&self, symbol: &str) -> Option<&RoutineGroup> {
        self.routines.get(symbol)
    }

    /// All groups in symbol order.
    pub fn groups(&self) -> impl Iterator<Item = &RoutineGroup> {
        self.routines.values()
    }

    /// Machines observed for a symbol, first-seen order.
    pub fn ran_on(&self, symbol: &str) -> Vec<&str> {
        self.group(symbol).map(RoutineGroup::ran_on).unwrap_or_default()
    }

    /// Drops every symbol for which `keep` returns false.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.routines.retain(|symbol, _| keep(symbol));
    }

    /// Number of routines.
    pub fn len(&self) -> usize {
        self.routines.len()
    }

    /// Returns whether the store holds no routines.
    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tuned(name: &str) -> Origin {
        Origin::MachineTuned(name.to_string())
    }

    fn m(symbol: &str, origin: Origin, filename: &str, ran_on: &str, cycles: f64) -> Measurement {
        Measurement {
            symbol: symbol.to_string(),
            origin,
            filename: filename.to_string(),
            ran_on: ran_on.to_string(),
            cycles,
        }
    }

    #[test]
    fn test_insert_groups_by_symbol_origin_filename() {
        let (store, rejected) = MeasurementStore::from_records(vec![
            m("b_mul", tuned("M1"), "f1", "M1", 100.0),
            m("a_mul", tuned("M1"), "f1", "M1", 90.0),
            m("b_mul", tuned("M2"), "f2", "M1", 120.0),
            m("b_mul", tuned("M1"), "f1", "M2", 110.0),
        ]);
        assert!(rejected.is_empty());
        assert_eq!(store.symbols(), vec!["a_mul", "b_mul"]);

        let group = store.group("b_mul").unwrap();
        assert_eq!(group.origins.len(), 2);
        assert_eq!(group.origins[0].origin, tuned("M1"));
        assert_eq!(group.origins[0].solutions[0].runs.len(), 2);
        assert_eq!(group.cycles(&tuned("M1"), "M2"), vec![110.0]);
        assert_eq!(store.ran_on("b_mul"), vec!["M1", "M2"]);
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let record = m("x_mul", tuned("M1"), "f1", "M1", 100.0);
        let (store, _) = MeasurementStore::from_records(vec![record.clone(), record]);
        assert_eq!(store.group("x_mul").unwrap().measurement_count(), 2);
    }

    #[test]
    fn test_insert_rejects_invalid_cycles() {
        let (store, rejected) = MeasurementStore::from_records(vec![
            m("x_mul", tuned("M1"), "f1", "M1", -5.0),
            m("x_mul", tuned("M1"), "f1", "M1", f64::INFINITY),
            m("", tuned("M1"), "f1", "M1", 10.0),
        ]);
        assert!(store.is_empty());
        assert_eq!(rejected.len(), 3);
    }

    #[test]
    fn test_merge_concatenates_runs() {
        let (mut left, _) =
            MeasurementStore::from_records(vec![m("x_mul", tuned("M1"), "f1", "M1", 100.0)]);
        let (right, _) = MeasurementStore::from_records(vec![
            m("x_mul", tuned("M1"), "f1", "M1", 104.0),
            m("y_mul", tuned("M2"), "g", "M2", 50.0),
        ]);
        left.merge(right);
        assert_eq!(left.len(), 2);
        assert_eq!(
            left.group("x_mul").unwrap().cycles(&tuned("M1"), "M1"),
            vec![100.0, 104.0]
        );
    }

    #[test]
    fn test_solutions_first_seen_order() {
        let (store, _) = MeasurementStore::from_records(vec![
            m("x_mul", tuned("M2"), "z", "M1", 1.0),
            m("x_mul", tuned("M1"), "b", "M1", 1.0),
            m("x_mul", tuned("M2"), "a", "M1", 1.0),
        ]);
        let order: Vec<(&str, &str)> = store
            .group("x_mul")
            .unwrap()
            .solutions()
            .map(|(o, s)| (o.name(), s.filename.as_str()))
            .collect();
        assert_eq!(order, vec![("M2", "z"), ("M2", "a"), ("M1", "b")]);
    }

    #[test]
    fn test_unknown_symbol_has_no_machines() {
        let store = MeasurementStore::new();
        assert!(store.ran_on("nope").is_empty());
        assert!(store.group("nope").is_none());
    }
}
