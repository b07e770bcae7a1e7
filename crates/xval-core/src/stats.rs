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

//! Summary statistics.
//!
//! Every reduction returns `Option<f64>`: `None` means "not available" and
//! is never coerced to 0 or 1.

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Geometric mean of strictly positive values.
///
/// Computed in the log domain so long products of cycle counts cannot
/// overflow, then clamped to `[min, max]` of the inputs to absorb rounding.
/// Returns `None` for an empty slice or when any value is not a positive
/// finite number.
pub fn geometric_mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() || values.iter().any(|v| !v.is_finite() || *v <= 0.0) {
        return None;
    }

    let log_mean = values.iter().map(|v| v.ln()).sum::<f64>() / values.len() as f64;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(log_mean.exp().clamp(min, max))
}

/// Smaller of a running minimum and a new value.
pub fn running_min(current: Option<f64>, value: f64) -> Option<f64> {
    Some(current.map_or(value, |c| c.min(value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[100.0, 150.0]), Some(125.0));
    }

    #[test]
    fn test_geometric_mean_basic() {
        assert_eq!(geometric_mean(&[]), None);
        assert_eq!(geometric_mean(&[100.0, 100.0]), Some(100.0));
        let gm = geometric_mean(&[80.0, 120.0]).unwrap();
        assert!((gm - (80.0f64 * 120.0).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_geometric_mean_single_value_is_exact() {
        assert_eq!(geometric_mean(&[1.0]), Some(1.0));
        assert_eq!(geometric_mean(&[0.37]), Some(0.37));
    }

    #[test]
    fn test_geometric_mean_rejects_invalid() {
        assert_eq!(geometric_mean(&[1.0, -1.0]), None);
        assert_eq!(geometric_mean(&[1.0, 0.0]), None);
        assert_eq!(geometric_mean(&[1.0, f64::NAN]), None);
    }

    #[test]
    fn test_geometric_mean_no_overflow() {
        let values = vec![1.0e200; 8];
        let gm = geometric_mean(&values).unwrap();
        assert!((gm / 1.0e200 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_running_min() {
        assert_eq!(running_min(None, 5.0), Some(5.0));
        assert_eq!(running_min(Some(3.0), 5.0), Some(3.0));
        assert_eq!(running_min(Some(7.0), 5.0), Some(5.0));
    }

    proptest! {
        #[test]
        fn prop_geometric_mean_bounded(values in prop::collection::vec(0.01f64..1.0e6, 1..20)) {
            let gm = geometric_mean(&values).unwrap();
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assert!(gm >= min && gm <= max);
        }

        #[test]
        fn prop_geometric_mean_order_independent(mut values in prop::collection::vec(1.0f64..1.0e5, 1..12)) {
            let forward = geometric_mean(&values).unwrap();
            values.reverse();
            let backward = geometric_mean(&values).unwrap();
            prop_assert!((forward - backward).abs() <= forward * 1e-12);
        }
    }
}
