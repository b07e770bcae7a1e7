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

//! Measurement records.
//!
//! An x-val result file is a JSON object mapping each routine symbol to the
//! list of measurements collected for it:
//!
//! ```json
//! {
//!   "fiat_curve25519_carry_mul": [
//!     { "filename": "seed1.asm", "opton": "AMD Ryzen 9 7950X 16-Core Processor",
//!       "median": 112, "runon": "AMD Ryzen 9 7950X 16-Core Processor" },
//!     { "filename": "0NA", "opton": "gcc", "median": 131,
//!       "runon": "AMD Ryzen 9 7950X 16-Core Processor" }
//!   ]
//! }
//! ```
//!
//! Parsing validates every record on its own. A bad record becomes a
//! [`XvalError::MalformedRecord`] next to the good ones instead of failing
//! the whole file.

use crate::config::Config;
use crate::error::{Result, XvalError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Where an implementation variant came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Origin {
    /// Hand/auto-optimized on the named machine.
    MachineTuned(String),
    /// Code generated by the named off-the-shelf compiler.
    CompilerGenerated(String),
}

impl Origin {
    /// Display name of the machine or compiler.
    pub fn name(&self) -> &str {
        match self {
            Origin::MachineTuned(name) | Origin::CompilerGenerated(name) => name,
        }
    }

    /// Returns whether this origin is an off-the-shelf compiler.
    pub fn is_compiler(&self) -> bool {
        matches!(self, Origin::CompilerGenerated(_))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One observed cycle count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Routine symbol, e.g. `fiat_curve25519_carry_mul`.
    pub symbol: String,
    /// Tuning machine or compiler of the implementation variant.
    pub origin: Origin,
    /// Opaque id distinguishing solutions with the same origin.
    pub filename: String,
    /// Normalized name of the machine the measurement ran on.
    pub ran_on: String,
    /// Median cycle count. Always finite and positive.
    pub cycles: f64,
}

impl Measurement {
    /// Creates a validated measurement.
    ///
    /// # Errors
    ///
    /// Returns [`XvalError::MalformedRecord`] for an empty symbol or a
    /// cycle count that is zero, negative, NaN or infinite.
    pub fn new(
        symbol: impl Into<String>,
        origin: Origin,
        filename: impl Into<String>,
        ran_on: impl Into<String>,
        cycles: f64,
    ) -> Result<Self> {
        let symbol = symbol.into();
        if symbol.is_empty() {
            return Err(XvalError::malformed(symbol, "empty symbol"));
        }
        if !cycles.is_finite() || cycles <= 0.0 {
            return Err(XvalError::malformed(
                symbol,
                format!("cycles must be a positive number, got {}", cycles),
            ));
        }
        Ok(Self {
            symbol,
            origin,
            filename: filename.into(),
            ran_on: ran_on.into(),
            cycles,
        })
    }
}

/// Raw record as written by the collector.
#[derive(Debug, Deserialize)]
struct RawRecord {
    filename: String,
    opton: String,
    #[serde(default)]
    median: Option<Value>,
    runon: String,
}

/// Records parsed from one input file.
#[derive(Debug, Default)]
pub struct ParsedFile {
    /// Valid measurements in file order.
    pub measurements: Vec<Measurement>,
    /// Records that were dropped, as recoverable errors.
    pub rejected: Vec<XvalError>,
}

/// Parses the content of one x-val result file.
///
/// Raw machine and compiler strings are normalized through `config`, so the
/// returned measurements carry display names and tagged origins.
///
/// # Errors
///
/// Returns [`XvalError::Json`] when the content is not a JSON object of
/// arrays. Problems with individual records are reported in
/// [`ParsedFile::rejected`] instead.
pub fn parse_records(content: &str, path: &Path, config: &Config) -> Result<ParsedFile> {
    let document: BTreeMap<String, Vec<Value>> =
        serde_json::from_str(content).map_err(|e| XvalError::json_error(path, e))?;

    let mut parsed = ParsedFile::default();
    for (symbol, records) in document {
        for value in records {
            match parse_record(&symbol, value, config) {
                Ok(measurement) => parsed.measurements.push(measurement),
                Err(err) => parsed.rejected.push(err),
            }
        }
    }
    Ok(parsed)
}

fn parse_record(symbol: &str, value: Value, config: &Config) -> Result<Measurement> {
    let raw: RawRecord =
        serde_json::from_value(value).map_err(|e| XvalError::malformed(symbol, e.to_string()))?;

    let cycles = match raw.median {
        Some(Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| XvalError::malformed(symbol, format!("unrepresentable median {}", n)))?,
        Some(Value::Null) | None => return Err(XvalError::malformed(symbol, "missing median")),
        Some(other) => {
            return Err(XvalError::malformed(
                symbol,
                format!("median is not a number: {}", other),
            ))
        }
    };

    Measurement::new(
        symbol,
        config.classify_origin(&raw.opton),
        raw.filename,
        config.normalize_machine(&raw.runon),
        cycles,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config::default()
    }

    #[test]
    fn test_measurement_rejects_non_positive() {
        let origin = Origin::MachineTuned("M1".into());
        assert!(Measurement::new("x_mul", origin.clone(), "f", "M1", 0.0).is_err());
        assert!(Measurement::new("x_mul", origin.clone(), "f", "M1", -5.0).is_err());
        assert!(Measurement::new("x_mul", origin.clone(), "f", "M1", f64::NAN).is_err());
        assert!(Measurement::new("", origin.clone(), "f", "M1", 10.0).is_err());
        assert!(Measurement::new("x_mul", origin, "f", "M1", 10.0).is_ok());
    }

    #[test]
    fn test_parse_normalizes_names() {
        let content = r#"{
            "fiat_curve25519_carry_mul": [
                {"filename": "a.asm", "opton": "AMD Ryzen 9 7950X 16-Core Processor",
                 "median": 112, "runon": "AMD Ryzen 9 7950X 16-Core Processor"},
                {"filename": "0NA", "opton": "gcc", "median": 131.5,
                 "runon": "AMD Ryzen 9 7950X 16-Core Processor"}
            ]
        }"#;
        let parsed = parse_records(content, Path::new("t.json"), &config()).unwrap();
        assert!(parsed.rejected.is_empty());
        assert_eq!(parsed.measurements.len(), 2);

        let first = &parsed.measurements[0];
        assert_eq!(first.origin, Origin::MachineTuned("7950X".into()));
        assert_eq!(first.ran_on, "7950X");
        assert_eq!(first.cycles, 112.0);

        let second = &parsed.measurements[1];
        assert_eq!(second.origin, Origin::CompilerGenerated("GCC".into()));
        assert_eq!(second.cycles, 131.5);
    }

    #[test]
    fn test_parse_drops_bad_records_and_keeps_good_ones() {
        let content = r#"{
            "x_mul": [
                {"filename": "f1", "opton": "M1", "median": 100, "runon": "M1"},
                {"filename": "f2", "opton": "M1", "median": -5, "runon": "M1"},
                {"filename": "f3", "opton": "M1", "median": "fast", "runon": "M1"},
                {"filename": "f4", "opton": "M1", "runon": "M1"},
                {"filename": "f5", "opton": "M1", "median": 0, "runon": "M1"},
                {"opton": "M1", "median": 90, "runon": "M1"},
                42
            ]
        }"#;
        let parsed = parse_records(content, Path::new("t.json"), &config()).unwrap();
        assert_eq!(parsed.measurements.len(), 1);
        assert_eq!(parsed.measurements[0].filename, "f1");
        assert_eq!(parsed.rejected.len(), 6);
        assert!(parsed.rejected.iter().all(XvalError::is_recoverable));
    }

    #[test]
    fn test_parse_rejects_wrong_top_level() {
        let err = parse_records("[1, 2, 3]", Path::new("bad.json"), &config()).unwrap_err();
        assert!(matches!(err, XvalError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn test_origin_serialization() {
        let json = serde_json::to_string(&Origin::CompilerGenerated("GCC".into())).unwrap();
        assert_eq!(json, r#"{"kind":"compiler_generated","name":"GCC"}"#);
    }
}
