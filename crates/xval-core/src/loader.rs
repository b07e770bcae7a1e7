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

//! Reading measurement directories.
//!
//! Files are listed in sorted order, parsed in parallel and merged into one
//! [`MeasurementStore`] sequentially in that same order, so the result does
//! not depend on thread scheduling. A file that is not valid JSON is skipped
//! on its own; the other files still load.

use crate::config::Config;
use crate::error::{Result, XvalError};
use crate::record::{parse_records, ParsedFile};
use crate::store::MeasurementStore;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Default maximum input file size (1 GB).
///
/// Can be overridden via the `XVAL_MAX_FILE_SIZE` environment variable.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 1024 * 1024 * 1024;

/// Environment variable overriding [`DEFAULT_MAX_FILE_SIZE`].
pub const MAX_FILE_SIZE_ENV: &str = "XVAL_MAX_FILE_SIZE";

fn max_file_size() -> u64 {
    std::env::var(MAX_FILE_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(DEFAULT_MAX_FILE_SIZE)
}

/// Reads a file with size validation.
///
/// The size is checked from metadata before anything is allocated.
///
/// # Errors
///
/// Returns [`XvalError::FileTooLarge`] when the file exceeds the limit and
/// [`XvalError::Io`] when it cannot be read.
pub fn read_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let metadata = fs::metadata(path).map_err(|e| XvalError::io_error(path, e))?;

    let max = max_file_size();
    if metadata.len() > max {
        return Err(XvalError::FileTooLarge {
            path: path.to_path_buf(),
            actual: metadata.len(),
            max,
        });
    }

    fs::read_to_string(path).map_err(|e| XvalError::io_error(path, e))
}

/// Lists the `*.json` files of a directory in sorted order.
pub fn list_measurement_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = fs::read_dir(dir).map_err(|e| XvalError::io_error(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| XvalError::io_error(dir, e))?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Outcome of loading a directory.
#[derive(Debug, Default)]
pub struct LoadSummary {
    /// Grouped measurements.
    pub store: MeasurementStore,
    /// Files read.
    pub files: usize,
    /// Records dropped as malformed.
    pub rejected: Vec<XvalError>,
    /// Files skipped because their content did not parse.
    pub skipped_files: Vec<XvalError>,
}

/// Loads every measurement file of a directory.
///
/// # Errors
///
/// Fails on the first unreadable or oversized file. Files that do not parse
/// are logged and collected in [`LoadSummary::skipped_files`]; malformed
/// individual records end up in [`LoadSummary::rejected`].
pub fn load_directory(dir: impl AsRef<Path>, config: &Config) -> Result<LoadSummary> {
    let dir = dir.as_ref();
    let files = list_measurement_files(dir)?;
    if files.is_empty() {
        warn!("no measurement files found in {}", dir.display());
    }

    let parsed: Vec<Result<ParsedFile>> = files
        .par_iter()
        .map(|path| {
            let content = read_file(path)?;
            debug!("parsing {}", path.display());
            Ok(parse_records(&content, path, config))
        })
        .collect::<Result<_>>()?;

    let mut summary = LoadSummary {
        files: files.len(),
        ..LoadSummary::default()
    };
    for file in parsed {
        let file = match file {
            Ok(file) => file,
            Err(err) => {
                warn!("skipping file: {}", err);
                summary.skipped_files.push(err);
                continue;
            }
        };
        let (store, mut rejected) = MeasurementStore::from_records(file.measurements);
        summary.store.merge(store);
        summary.rejected.append(&mut rejected);
        summary.rejected.extend(file.rejected);
    }

    for err in &summary.rejected {
        warn!("skipping record: {}", err);
    }
    info!(
        "loaded {} routines from {} files ({} files skipped, {} records rejected)",
        summary.store.len(),
        summary.files - summary.skipped_files.len(),
        summary.skipped_files.len(),
        summary.rejected.len()
    );
    Ok(summary)
}
