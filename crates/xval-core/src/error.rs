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

//! Error types for measurement ingestion and ranking.
//!
//! Two classes of errors share this enum. Recoverable ones
//! ([`XvalError::Json`], [`XvalError::MalformedRecord`],
//! [`XvalError::UnknownSymbolFormat`]) are logged and skipped by the caller
//! so that a single bad file, record or symbol never stops a run.
//! Everything else is fatal and propagates with `?`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for XVAL operations.
pub type Result<T> = std::result::Result<T, XvalError>;

/// Errors that can occur while loading, grouping and ranking measurements.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum XvalError {
    /// I/O operation failed (directory listing or file read).
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The path that caused the error
        path: PathBuf,
        /// The error message
        message: String,
    },

    /// Input file exceeds the configured size limit.
    #[error("File '{path}' is too large ({actual} bytes). Maximum allowed: {max} bytes")]
    FileTooLarge {
        /// The offending file
        path: PathBuf,
        /// Actual size in bytes
        actual: u64,
        /// Configured limit in bytes
        max: u64,
    },

    /// Input file is not valid JSON or has the wrong top-level shape. Recoverable.
    #[error("JSON error in '{path}': {message}")]
    Json {
        /// The offending file
        path: PathBuf,
        /// The serde_json error message
        message: String,
    },

    /// A single measurement record is unusable. Recoverable.
    #[error("Malformed record for symbol '{symbol}': {reason}")]
    MalformedRecord {
        /// Symbol the record was listed under
        symbol: String,
        /// Why the record was rejected
        reason: String,
    },

    /// A symbol does not follow the `<curve>_<mul|square>` convention. Recoverable.
    #[error("'{0}' is in the wrong format (expected <curve>_mul or <curve>_square)")]
    UnknownSymbolFormat(String),

    /// A curve recognized from a symbol has no display caption configured.
    #[error("No caption configured for curve '{curve}' (symbol '{symbol}')")]
    MissingCaption {
        /// Curve identifier extracted from the symbol
        curve: String,
        /// Symbol being reported
        symbol: String,
    },

    /// SUPERCOP implementation referenced by a group but absent from the metadata.
    #[error("Implementation '{0}' is listed in an implementation group but has no metadata")]
    UnknownImplementation(String),

    /// Configuration could not be loaded or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl XvalError {
    /// Create an I/O error with path context.
    pub fn io_error(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a JSON error with path context.
    pub fn json_error(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            message: source.to_string(),
        }
    }

    /// Create a malformed-record error.
    pub fn malformed(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    /// Returns whether the run may continue after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            XvalError::Json { .. }
                | XvalError::MalformedRecord { .. }
                | XvalError::UnknownSymbolFormat(_)
        )
    }
}

impl From<serde_yaml::Error> for XvalError {
    fn from(err: serde_yaml::Error) -> Self {
        XvalError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_display() {
        let err = XvalError::malformed("curve25519_mul", "cycles must be positive, got -5");
        let msg = err.to_string();
        assert!(msg.contains("curve25519_mul"));
        assert!(msg.contains("-5"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(XvalError::malformed("x", "y").is_recoverable());
        assert!(XvalError::UnknownSymbolFormat("foo".into()).is_recoverable());
        assert!(XvalError::Json {
            path: "b.json".into(),
            message: "EOF while parsing".into()
        }
        .is_recoverable());
        assert!(!XvalError::FileTooLarge {
            path: "big.json".into(),
            actual: 2,
            max: 1
        }
        .is_recoverable());
        assert!(!XvalError::Config("bad".into()).is_recoverable());
        assert!(!XvalError::MissingCaption {
            curve: "p999".into(),
            symbol: "p999_mul".into()
        }
        .is_recoverable());
    }

    #[test]
    fn test_io_error_context() {
        let err = XvalError::io_error(
            "/nonexistent",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(err.to_string().contains("/nonexistent"));
    }
}
