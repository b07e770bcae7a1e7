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

//! XVAL Core
//!
//! Cross-validation of cycle-count benchmarks: implementations tuned on one
//! machine are measured on every other machine and compared with the code
//! tuned there, and with off-the-shelf compiler output.
//!
//! ## Pipeline
//!
//! 1. [`loader`] reads measurement files into a [`MeasurementStore`]
//! 2. [`engine`] builds the ratio matrix of each routine
//! 3. [`ranking`] derives Final ratios and the champion shortlist
//! 4. [`savings`] summarizes the gain over each compiler
//! 5. [`reporters`] render text, Markdown or JSON
//!
//! ## Example
//!
//! ```
//! use xval_core::{build_report, Config, Measurement, MeasurementStore};
//!
//! let config = Config::default().with_machines(&["M1", "M2"]);
//! let records = vec![
//!     Measurement::new("p256_mul", config.classify_origin("M1"), "a.asm", "M1", 100.0).unwrap(),
//!     Measurement::new("p256_mul", config.classify_origin("gcc"), "0", "M1", 150.0).unwrap(),
//! ];
//! let (store, rejected) = MeasurementStore::from_records(records);
//! assert!(rejected.is_empty());
//!
//! let report = build_report(&store, &config).unwrap();
//! assert_eq!(report.rankings[0].finals[0], Some(1.5));
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod loader;
pub mod ranking;
pub mod record;
pub mod report;
pub mod reporters;
pub mod savings;
pub mod stats;
pub mod store;
pub mod supercop;

pub use config::{Config, DEFAULT_TOP_K};
pub use engine::{compute_matrix, ColumnBests, Diagnostic, RatioClass, RatioMatrix, RatioRow};
pub use error::{Result, XvalError};
pub use loader::{load_directory, read_file, LoadSummary};
pub use ranking::{final_ratios, rank_champions, rank_routine, rank_store, Champion, RoutineRanking};
pub use record::{parse_records, Measurement, Origin};
pub use report::{build_report, retain_captioned, Report};
pub use savings::{compiler_savings, CompilerSavings, Method, RoutineName};
pub use stats::geometric_mean;
pub use store::{MeasurementStore, RoutineGroup};
pub use supercop::{load_scalarmult, scalarmult_tables, ScalarmultData, ScalarmultTable};
