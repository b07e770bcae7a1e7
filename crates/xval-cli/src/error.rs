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

//! Structured error types for the XVAL CLI.
//!
//! All command handlers return `Result<T, CliError>`; `main` prints the
//! message and exits with a failure status.

use std::io;
use std::path::PathBuf;
use thiserror::Error;
use xval_core::XvalError;

/// The main error type for XVAL CLI operations.
#[derive(Error, Debug, Clone)]
pub enum CliError {
    /// Writing output failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Loading, ranking or rendering failed.
    #[error(transparent)]
    Core(#[from] XvalError),

    /// An argument value is not usable.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl CliError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_is_transparent() {
        let err: CliError = XvalError::Config("top_k must be at least 1".into()).into();
        assert_eq!(err.to_string(), "Configuration error: top_k must be at least 1");
    }

    #[test]
    fn test_io_error_mentions_path() {
        let err = CliError::io_error(
            "/tmp/out.md",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/out.md"));
        assert!(msg.contains("denied"));
    }
}
