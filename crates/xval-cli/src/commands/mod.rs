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

//! Command implementations for the XVAL CLI.
//!
//! Every command reads its input through [`xval_core::loader`], which checks
//! file sizes against `XVAL_MAX_FILE_SIZE` before reading, and writes its
//! result through [`write_output`].

mod champions;
mod config;
mod report;
mod scalarmult;

pub use champions::champions;
pub use config::print_config;
pub use report::{report, savings, ReportOptions};
pub use scalarmult::scalarmult;

use crate::error::CliError;
use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::Path;
use tracing::debug;
use xval_core::{load_directory, Config, LoadSummary};

/// Loads the configuration file, or the built-in defaults without one.
///
/// # Errors
///
/// Returns `Err` if the file cannot be read, does not parse or is invalid.
pub fn load_config(path: Option<&str>) -> Result<Config, CliError> {
    match path {
        Some(p) => {
            debug!("loading configuration from {}", p);
            Ok(Config::load(p)?)
        }
        None => Ok(Config::default()),
    }
}

/// Applies a `--top-k` override.
pub(crate) fn with_top_k(config: &Config, top_k: Option<usize>) -> Result<Config, CliError> {
    match top_k {
        Some(0) => Err(CliError::invalid_input("--top-k must be at least 1")),
        Some(k) => Ok(config.clone().with_top_k(k)),
        None => Ok(config.clone()),
    }
}

/// Loads a measurement directory.
pub(crate) fn load_measurements(dir: &str, config: &Config) -> Result<LoadSummary, CliError> {
    if !Path::new(dir).is_dir() {
        return Err(CliError::invalid_input(format!("'{}' is not a directory", dir)));
    }
    Ok(load_directory(dir, config)?)
}

/// Whether console output should be colored.
pub(crate) fn use_color(output: Option<&str>) -> bool {
    output.is_none() && io::stdout().is_terminal()
}

/// Write content to a file or stdout.
///
/// # Errors
///
/// Returns `Err` if file creation, writing or writing to stdout fails.
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), CliError> {
    match path {
        Some(p) => fs::write(p, content).map_err(|e| CliError::io_error(p, e)),
        None => io::stdout()
            .write_all(content.as_bytes())
            .map_err(|e| CliError::io_error("<stdout>", e)),
    }
}
