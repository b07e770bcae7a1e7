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

//! Savings over off-the-shelf compilers.
//!
//! Compiler-row ratios of every routine are grouped by curve, arithmetic
//! method and compiler, then summarized with geometric means. Routines whose
//! symbol does not follow the `<curve>_<method>` convention are left out of
//! this summary and reported as skipped.

use crate::config::Config;
use crate::error::{Result, XvalError};
use crate::ranking::RoutineRanking;
use crate::stats::geometric_mean;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Field arithmetic method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// Multiplication.
    Mul,
    /// Squaring.
    Square,
}

impl Method {
    /// All methods in report order.
    pub const ALL: [Method; 2] = [Method::Mul, Method::Square];

    /// Symbol suffix without the leading underscore.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Mul => "mul",
            Method::Square => "square",
        }
    }

    /// Column heading.
    pub fn label(&self) -> &'static str {
        match self {
            Method::Mul => "Multiply",
            Method::Square => "Square",
        }
    }
}

/// A routine symbol split into curve and method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutineName {
    /// Curve id, e.g. `curve25519`.
    pub curve: String,
    /// Arithmetic method.
    pub method: Method,
}

impl RoutineName {
    /// Splits a symbol such as `fiat_curve25519_carry_mul`.
    ///
    /// The `fiat_` and `_carry` markers are removed before matching the
    /// `_mul` / `_square` suffix.
    ///
    /// # Errors
    ///
    /// Returns [`XvalError::UnknownSymbolFormat`] when no suffix matches or
    /// the curve part is empty.
    pub fn parse(symbol: &str) -> Result<Self> {
        let stripped = symbol.replace("fiat_", "").replace("_carry", "");
        for method in Method::ALL {
            let suffix = format!("_{}", method.as_str());
            if let Some(curve) = stripped.strip_suffix(&suffix) {
                if !curve.is_empty() {
                    return Ok(Self {
                        curve: curve.to_string(),
                        method,
                    });
                }
            }
        }
        Err(XvalError::UnknownSymbolFormat(stripped))
    }
}

/// Geometric mean of one compiler's ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilerMean {
    /// Compiler name.
    pub compiler: String,
    /// Geometric mean, `None` without samples.
    pub geometric_mean: Option<f64>,
    /// Number of ratios included.
    pub samples: usize,
}

/// Savings of one method for one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSavings {
    /// Arithmetic method.
    pub method: Method,
    /// One entry per configured compiler.
    pub compilers: Vec<CompilerMean>,
}

/// Savings row of one curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSavings {
    /// Curve id.
    pub curve: String,
    /// Display caption.
    pub caption: String,
    /// Mul then square.
    pub methods: Vec<MethodSavings>,
}

/// Compiler savings summary across all routines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilerSavings {
    /// Curves in first-seen order.
    pub curves: Vec<CurveSavings>,
    /// Overall geometric mean per compiler across curves and methods.
    pub overall: Vec<CompilerMean>,
    /// Symbols left out because of their name.
    pub skipped: Vec<String>,
}

struct Bucket {
    curve: String,
    caption: String,
    // [method][compiler] -> ratios
    ratios: Vec<Vec<Vec<f64>>>,
}

/// Builds the savings summary from ranked routines.
///
/// # Errors
///
/// Returns [`XvalError::MissingCaption`] when neither a curve nor its first
/// symbol has a caption.
pub fn compiler_savings(rankings: &[RoutineRanking], config: &Config) -> Result<CompilerSavings> {
    let compilers = config.compiler_order();
    let mut buckets: Vec<Bucket> = Vec::new();
    let mut skipped = Vec::new();

    for ranking in rankings {
        let name = match RoutineName::parse(&ranking.symbol) {
            Ok(name) => name,
            Err(err) => {
                warn!("not using {} for compiler savings: {}", ranking.symbol, err);
                skipped.push(ranking.symbol.clone());
                continue;
            }
        };

        let index = match buckets.iter().position(|b| b.curve == name.curve) {
            Some(index) => index,
            None => {
                buckets.push(Bucket {
                    caption: config.curve_caption(&name.curve, &ranking.symbol)?,
                    curve: name.curve.clone(),
                    ratios: vec![vec![Vec::new(); compilers.len()]; Method::ALL.len()],
                });
                buckets.len() - 1
            }
        };
        let method_index = Method::ALL
            .iter()
            .position(|m| *m == name.method)
            .unwrap_or_default();

        for row in ranking.rows.iter().filter(|r| r.origin.is_compiler()) {
            if let Some(compiler_index) = compilers.iter().position(|c| *c == row.origin.name()) {
                buckets[index].ratios[method_index][compiler_index]
                    .extend(row.cells.iter().flatten().copied());
            }
        }
    }

    let mut curves = Vec::with_capacity(buckets.len());
    let mut per_compiler_means: Vec<Vec<f64>> = vec![Vec::new(); compilers.len()];

    for bucket in buckets {
        let methods = Method::ALL
            .iter()
            .zip(bucket.ratios)
            .map(|(method, by_compiler)| MethodSavings {
                method: *method,
                compilers: compilers
                    .iter()
                    .zip(by_compiler)
                    .enumerate()
                    .map(|(i, (compiler, ratios))| {
                        let gm = geometric_mean(&ratios);
                        if let Some(gm) = gm {
                            per_compiler_means[i].push(gm);
                        }
                        CompilerMean {
                            compiler: compiler.to_string(),
                            geometric_mean: gm,
                            samples: ratios.len(),
                        }
                    })
                    .collect(),
            })
            .collect();

        curves.push(CurveSavings {
            curve: bucket.curve,
            caption: bucket.caption,
            methods,
        });
    }

    let overall = compilers
        .iter()
        .zip(per_compiler_means)
        .map(|(compiler, means)| CompilerMean {
            compiler: compiler.to_string(),
            geometric_mean: geometric_mean(&means),
            samples: means.len(),
        })
        .collect();

    Ok(CompilerSavings {
        curves,
        overall,
        skipped,
    })
}
