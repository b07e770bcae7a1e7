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

//! SUPERCOP scalar-multiplication command.

use super::write_output;
use crate::error::CliError;
use std::path::Path;
use xval_core::reporters::{console, markdown, to_json};
use xval_core::{load_scalarmult, scalarmult_tables, Config};

/// Print the scalar-multiplication tables of a SUPERCOP results directory.
///
/// # Errors
///
/// Returns `Err` if the directory cannot be read or a configured
/// implementation group references unknown metadata.
pub fn scalarmult(dir: &str, config: &Config, format: &str) -> Result<(), CliError> {
    if !Path::new(dir).is_dir() {
        return Err(CliError::invalid_input(format!("'{}' is not a directory", dir)));
    }
    let data = load_scalarmult(dir, config)?;
    let tables = scalarmult_tables(&data, config)?;

    let content = match format {
        "text" => console::render_scalarmult(&tables),
        "markdown" => markdown::render_scalarmult(&tables),
        "json" => to_json(&tables)?,
        other => {
            return Err(CliError::invalid_input(format!(
                "unsupported format '{}'",
                other
            )))
        }
    };
    write_output(&content, None)
}
