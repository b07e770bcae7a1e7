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

//! Report renderers.
//!
//! Every renderer returns a `String`; writing it to stdout or a file is
//! left to the caller.
//!
//! # Modules
//!
//! - `console`: aligned text tables, optionally colored
//! - `markdown`: Markdown tables
//! - `json`: pretty-printed JSON

pub mod console;
pub mod json;
pub mod markdown;

pub use json::to_json;

/// Placeholder for values that are not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Formats a ratio with two decimals.
pub fn format_ratio(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.2}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats a cycle count without decimals.
pub fn format_cycles(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.0}", v))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formats a SUPERCOP cycle count in thousands with its ratio.
pub fn format_kcycles(cycles: Option<u64>, ratio: Option<f64>) -> String {
    match (cycles, ratio) {
        (Some(c), Some(r)) => format!("{:.0}k ({:.2}x)", c as f64 / 1000.0, r),
        (Some(c), None) => format!("{:.0}k", c as f64 / 1000.0),
        _ => NOT_AVAILABLE.to_string(),
    }
}
