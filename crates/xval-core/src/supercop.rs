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

//! SUPERCOP scalar-multiplication results.
//!
//! A results directory holds one sub-directory per host, each with a `data`
//! file of SUPERCOP result lines. For every implementation the fastest
//! compiler combination is kept per host, then implementations are laid out
//! in the configured groups with ratios to the fastest one per machine.

use crate::config::Config;
use crate::error::{Result, XvalError};
use crate::loader::read_file;
use crate::stats::geometric_mean;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

const RESULT_LINE: &str = r"(?P<version>\d+) (?P<host>\w+) (?P<abi>\w+) (?P<date>\d+) (?P<primitive>\w+) (?P<timecop>[\w/]+) try(\(\w+placeasm:\w+\))? (?P<checksum>[\w/]+) (ok|unknown) (?P<cycles>\d+) (?P<checksumcycles>\d+) (?P<cyclespersecond>\d+) (?P<impl>[-\w/]+) (?P<cc>[/\w]+)_(?P<cflags>[-=\w/]+)";

/// One successful benchmark line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultLine {
    /// Host name as written by SUPERCOP.
    pub host: String,
    /// Implementation path, e.g. `crypto_scalarmult/curve25519/donna`.
    pub implementation: String,
    /// Measured cycles.
    pub cycles: u64,
}

/// Parser for SUPERCOP `data` files.
#[derive(Debug, Clone)]
pub struct ResultParser {
    pattern: Regex,
}

impl ResultParser {
    /// Compiles the result-line pattern.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(RESULT_LINE)
            .map_err(|e| XvalError::Config(format!("invalid SUPERCOP line pattern: {}", e)))?;
        Ok(Self { pattern })
    }

    /// Parses one line. Size reports, zero cycle counts and unrecognized
    /// lines yield `None`.
    pub fn parse_line(&self, line: &str) -> Option<ResultLine> {
        if line.contains("objsize") {
            return None;
        }
        let caps = self.pattern.captures(line)?;
        let result = ResultLine {
            host: caps.name("host")?.as_str().to_string(),
            implementation: caps.name("impl")?.as_str().to_string(),
            cycles: caps.name("cycles")?.as_str().parse().ok()?,
        };
        if result.cycles == 0 {
            warn!(
                "skipping {} on {}: zero cycles",
                result.implementation, result.host
            );
            return None;
        }
        Some(result)
    }

    /// Parses a whole `data` file.
    pub fn parse(&self, content: &str) -> Vec<ResultLine> {
        content.lines().filter_map(|line| self.parse_line(line)).collect()
    }
}

/// Fastest cycles per implementation and machine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScalarmultData {
    cycles: BTreeMap<String, BTreeMap<String, u64>>,
}

impl ScalarmultData {
    /// Creates an empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a measurement, keeping the minimum per implementation and machine.
    pub fn record(&mut self, implementation: &str, machine: &str, cycles: u64) {
        let slot = self
            .cycles
            .entry(implementation.to_string())
            .or_default()
            .entry(machine.to_string())
            .or_insert(cycles);
        *slot = (*slot).min(cycles);
    }

    /// Fastest cycles of an implementation on a machine.
    pub fn get(&self, implementation: &str, machine: &str) -> Option<u64> {
        self.cycles.get(implementation)?.get(machine).copied()
    }

    /// Whether any machine has data for the implementation.
    pub fn contains(&self, implementation: &str) -> bool {
        self.cycles.contains_key(implementation)
    }

    /// Implementation ids with data.
    pub fn implementations(&self) -> impl Iterator<Item = &str> {
        self.cycles.keys().map(String::as_str)
    }

    /// Adds parsed lines for configured machines.
    ///
    /// Hosts are normalized through the machine aliases; hosts outside the
    /// machine list are ignored.
    pub fn extend(&mut self, lines: &[ResultLine], config: &Config) {
        let machines = config.machine_order();
        for line in lines {
            let machine = config.normalize_machine(&line.host);
            if machines.contains(&machine.as_str()) {
                self.record(&line.implementation, &machine, line.cycles);
            }
        }
    }
}

/// Reads every host directory of a SUPERCOP results directory.
///
/// # Errors
///
/// Fails when the directory cannot be listed or a host's `data` file
/// cannot be read.
pub fn load_scalarmult(dir: impl AsRef<Path>, config: &Config) -> Result<ScalarmultData> {
    let dir = dir.as_ref();
    let parser = ResultParser::new()?;
    let machines = config.machine_order();

    let mut hosts = Vec::new();
    for entry in fs::read_dir(dir).map_err(|e| XvalError::io_error(dir, e))? {
        let path = entry.map_err(|e| XvalError::io_error(dir, e))?.path();
        if path.is_dir() {
            hosts.push(path);
        }
    }
    hosts.sort();

    let mut data = ScalarmultData::new();
    for host in hosts {
        let name = host
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !machines.contains(&config.normalize_machine(&name).as_str()) {
            debug!("skipping unconfigured host {}", name);
            continue;
        }
        let content = read_file(host.join("data"))?;
        let lines = parser.parse(&content);
        debug!("{}: {} result lines", name, lines.len());
        data.extend(&lines, config);
    }

    info!(
        "loaded SUPERCOP results for {} implementations",
        data.cycles.len()
    );
    Ok(data)
}

/// One implementation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarmultRow {
    /// Implementation id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Source-language label.
    pub language: String,
    /// Cycles per machine column.
    pub cycles: Vec<Option<u64>>,
    /// Cycles relative to the fastest implementation per column.
    pub ratios: Vec<Option<f64>>,
    /// Geometric mean of the available cycles.
    pub geometric_mean: Option<f64>,
    /// Geometric mean relative to the smallest mean in the group.
    pub mean_ratio: Option<f64>,
}

/// One implementation group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarmultTable {
    /// Group heading.
    pub heading: String,
    /// Machine columns.
    pub columns: Vec<String>,
    /// Rows with data, in configured order.
    pub rows: Vec<ScalarmultRow>,
}

/// Lays the data out in the configured implementation groups.
///
/// # Errors
///
/// Returns [`XvalError::UnknownImplementation`] when a group lists an id
/// without metadata.
pub fn scalarmult_tables(data: &ScalarmultData, config: &Config) -> Result<Vec<ScalarmultTable>> {
    let machines = config.machine_order();

    config
        .implementation_groups
        .iter()
        .map(|group| {
            let mut rows = Vec::new();
            for id in &group.implementations {
                let implementation = config
                    .implementation(id)
                    .ok_or_else(|| XvalError::UnknownImplementation(id.clone()))?;
                if !data.contains(id) {
                    debug!("no SUPERCOP data for {}", id);
                    continue;
                }

                let cycles: Vec<Option<u64>> = machines.iter().map(|m| data.get(id, m)).collect();
                let defined: Vec<f64> = cycles.iter().flatten().map(|c| *c as f64).collect();
                rows.push(ScalarmultRow {
                    id: id.clone(),
                    name: implementation.name.clone(),
                    language: config.language_for(id),
                    cycles,
                    ratios: Vec::new(),
                    geometric_mean: geometric_mean(&defined),
                    mean_ratio: None,
                });
            }

            let smallest: Vec<Option<u64>> = (0..machines.len())
                .map(|i| rows.iter().filter_map(|r| r.cycles[i]).min())
                .collect();
            let smallest_mean = rows
                .iter()
                .filter_map(|r| r.geometric_mean)
                .min_by(|a, b| a.total_cmp(b));

            for row in &mut rows {
                row.ratios = row
                    .cycles
                    .iter()
                    .zip(&smallest)
                    .map(|(c, s)| match (c, s) {
                        (Some(c), Some(s)) => Some(*c as f64 / *s as f64),
                        _ => None,
                    })
                    .map(|ratio| ratio.filter(|r| r.is_finite()))
                    .collect();
                row.mean_ratio = match (row.geometric_mean, smallest_mean) {
                    (Some(gm), Some(s)) => Some(gm / s).filter(|r| r.is_finite()),
                    _ => None,
                };
            }

            Ok(ScalarmultTable {
                heading: group.heading.clone(),
                columns: machines.iter().map(|m| m.to_string()).collect(),
                rows,
            })
        })
        .collect()
}
