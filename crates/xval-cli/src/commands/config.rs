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

//! Config command.

use super::write_output;
use crate::error::CliError;
use xval_core::Config;

/// Print the configuration as YAML.
///
/// # Errors
///
/// Returns `Err` if serialization or writing fails.
pub fn print_config(config: &Config, output: Option<&str>) -> Result<(), CliError> {
    write_output(&config.to_yaml()?, output)
}
