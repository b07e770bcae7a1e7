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

//! Report configuration.
//!
//! The configuration is a set of lookup tables: machine order and aliases,
//! compiler names and aliases, curve captions and SUPERCOP implementation
//! metadata. It decides ordering, naming and formatting only; it never
//! changes a computed number.
//!
//! # Example
//!
//! ```
//! use xval_core::config::Config;
//!
//! let config = Config::default()
//!     .with_machines(&["M1", "M2"])
//!     .with_top_k(3);
//! assert_eq!(config.machine_order(), vec!["M1", "M2"]);
//! assert_eq!(config.normalize_machine("unknown box"), "unknown box");
//! ```

use crate::error::{Result, XvalError};
use crate::record::Origin;
use crate::savings::RoutineName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Default length of the champion shortlist.
pub const DEFAULT_TOP_K: usize = 10;

/// A display name and the raw strings that map onto it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedAliases {
    /// Normalized display name.
    pub name: String,
    /// Raw spellings normalized onto `name`.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl NamedAliases {
    fn new(name: &str, aliases: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Display metadata for a SUPERCOP implementation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Implementation {
    /// Implementation path as reported by SUPERCOP, e.g. `crypto_scalarmult/curve25519/donna`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Field / source classification key, e.g. `a64`, `c51`, `av`.
    pub field: String,
}

/// Ordered list of implementations shown together under one heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementationGroup {
    /// Heading, usually the curve name.
    pub heading: String,
    /// Implementation ids in display order.
    pub implementations: Vec<String>,
}

/// Complete report configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Machines in column order.
    pub machines: Vec<NamedAliases>,
    /// Off-the-shelf compilers in row order.
    pub compilers: Vec<NamedAliases>,
    /// Curve or symbol id to display caption.
    pub curves: BTreeMap<String, String>,
    /// SUPERCOP implementation metadata.
    pub implementations: Vec<Implementation>,
    /// SUPERCOP implementation groups in display order.
    pub implementation_groups: Vec<ImplementationGroup>,
    /// Field classification to source-language label.
    pub languages: BTreeMap<String, String>,
    /// Champion shortlist length.
    pub top_k: usize,
}

impl Config {
    /// Loads a YAML configuration file.
    ///
    /// Fields missing from the file keep their built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns [`XvalError::Io`] when the file cannot be read and
    /// [`XvalError::Config`] when it does not parse or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| XvalError::io_error(path, e))?;
        Self::from_yaml(&content)
    }

    /// Parses and validates a YAML configuration string.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Checks the tables for contradictions.
    pub fn validate(&self) -> Result<()> {
        if self.machines.is_empty() {
            return Err(XvalError::Config("machine list is empty".to_string()));
        }
        if self.top_k == 0 {
            return Err(XvalError::Config("top_k must be at least 1".to_string()));
        }

        let mut seen = std::collections::HashSet::new();
        for entry in self.machines.iter().chain(self.compilers.iter()) {
            if entry.name.is_empty() {
                return Err(XvalError::Config("empty machine or compiler name".to_string()));
            }
            if !seen.insert(entry.name.as_str()) {
                return Err(XvalError::Config(format!(
                    "'{}' is listed more than once",
                    entry.name
                )));
            }
        }

        for group in &self.implementation_groups {
            for id in &group.implementations {
                if self.implementation(id).is_none() {
                    return Err(XvalError::UnknownImplementation(id.clone()));
                }
            }
        }
        Ok(())
    }

    /// Replaces the machine list with alias-free entries.
    pub fn with_machines(mut self, machines: &[&str]) -> Self {
        self.machines = machines.iter().map(|m| NamedAliases::new(m, &[])).collect();
        self
    }

    /// Replaces the compiler list with alias-free entries.
    pub fn with_compilers(mut self, compilers: &[&str]) -> Self {
        self.compilers = compilers.iter().map(|c| NamedAliases::new(c, &[])).collect();
        self
    }

    /// Adds or replaces a curve caption.
    pub fn with_caption(mut self, curve: impl Into<String>, caption: impl Into<String>) -> Self {
        self.curves.insert(curve.into(), caption.into());
        self
    }

    /// Sets the champion shortlist length.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Machine display names in column order.
    pub fn machine_order(&self) -> Vec<&str> {
        self.machines.iter().map(|m| m.name.as_str()).collect()
    }

    /// Compiler display names in row order.
    pub fn compiler_order(&self) -> Vec<&str> {
        self.compilers.iter().map(|c| c.name.as_str()).collect()
    }

    /// Maps a raw machine string onto its display name.
    ///
    /// Unknown names pass through unchanged.
    pub fn normalize_machine(&self, raw: &str) -> String {
        self.machines
            .iter()
            .find(|m| m.name == raw || m.aliases.iter().any(|a| a == raw))
            .map(|m| m.name.clone())
            .unwrap_or_else(|| raw.to_string())
    }

    /// Recognizes a compiler and returns its canonical name.
    ///
    /// Matching is case-insensitive and accepts version suffixes, so
    /// `gcc`, `GCC` and `gcc-11` all map to the same compiler.
    pub fn compiler_for(&self, raw: &str) -> Option<&str> {
        let lower = raw.to_ascii_lowercase();
        self.compilers
            .iter()
            .find(|c| {
                std::iter::once(&c.name)
                    .chain(c.aliases.iter())
                    .any(|alias| matches_compiler(&lower, &alias.to_ascii_lowercase()))
            })
            .map(|c| c.name.as_str())
    }

    /// Classifies a raw `opton` value as a compiler or a tuning machine.
    pub fn classify_origin(&self, raw: &str) -> Origin {
        match self.compiler_for(raw) {
            Some(name) => Origin::CompilerGenerated(name.to_string()),
            None => Origin::MachineTuned(self.normalize_machine(raw)),
        }
    }

    /// Looks up SUPERCOP implementation metadata.
    pub fn implementation(&self, id: &str) -> Option<&Implementation> {
        self.implementations.iter().find(|i| i.id == id)
    }

    /// Source-language label for a SUPERCOP implementation.
    ///
    /// Unknown implementations render as `-<id>`; unknown field keys render
    /// as the raw key.
    pub fn language_for(&self, id: &str) -> String {
        match self.implementation(id) {
            None => format!("-{}", id),
            Some(implementation) => self
                .languages
                .get(&implementation.field)
                .cloned()
                .unwrap_or_else(|| implementation.field.clone()),
        }
    }

    /// Display caption for a routine symbol.
    ///
    /// An exact symbol entry wins; otherwise the curve extracted from the
    /// symbol is looked up. Symbols outside the naming convention are
    /// captioned with the symbol itself.
    ///
    /// # Errors
    ///
    /// Returns [`XvalError::MissingCaption`] when the symbol names a curve
    /// that has no caption.
    pub fn caption_for(&self, symbol: &str) -> Result<String> {
        if let Some(caption) = self.curves.get(symbol) {
            return Ok(caption.clone());
        }
        match RoutineName::parse(symbol) {
            Ok(name) => self.curve_caption(&name.curve, symbol),
            Err(_) => Ok(symbol.to_string()),
        }
    }

    /// Caption of a curve, falling back to the entry of one of its symbols.
    ///
    /// Fails exactly when [`Config::caption_for`] fails for `symbol`.
    pub fn curve_caption(&self, curve: &str, symbol: &str) -> Result<String> {
        self.curves
            .get(curve)
            .or_else(|| self.curves.get(symbol))
            .cloned()
            .ok_or_else(|| XvalError::MissingCaption {
                curve: curve.to_string(),
                symbol: symbol.to_string(),
            })
    }

    /// Returns whether the symbol's curve has a caption.
    pub fn has_caption(&self, symbol: &str) -> bool {
        self.caption_for(symbol).is_ok()
    }
}

fn matches_compiler(raw: &str, alias: &str) -> bool {
    if raw == alias {
        return true;
    }
    match raw.strip_prefix(alias) {
        Some(rest) => rest
            .chars()
            .next()
            .map_or(false, |c| c == '-' || c == '_' || c.is_ascii_digit()),
        None => false,
    }
}

impl Default for Config {
    fn default() -> Self {
        let machines = vec![
            NamedAliases::new("1900X", &["AMD Ryzen Threadripper 1900X 8-Core Processor", "kivsa"]),
            NamedAliases::new("5800X", &["AMD Ryzen 7 5800X 8-Core Processor", "nakhash"]),
            NamedAliases::new("5950X", &["AMD Ryzen 9 5950X 16-Core Processor", "aljamus"]),
            NamedAliases::new("7950X", &["AMD Ryzen 9 7950X 16-Core Processor", "dag"]),
            NamedAliases::new("i7 6G", &["Intel(R) Core(TM) i7-6770HQ CPU @ 2.60GHz", "nuc"]),
            NamedAliases::new("i7 10G", &["Intel(R) Core(TM) i7-10710U CPU @ 1.10GHz", "akrav"]),
            NamedAliases::new("i9 10G", &["Intel(R) Core(TM) i9-10900K CPU @ 3.70GHz", "akavish"]),
            NamedAliases::new("i7 11G", &["11th Gen Intel(R) Core(TM) i7-11700KF @ 3.60GHz", "pil"]),
            NamedAliases::new("i9 12G", &["12th Gen Intel(R) Core(TM) i9-12900KF", "arnevet"]),
            NamedAliases::new("i9 13G", &["13th Gen Intel(R) Core(TM) i9-13900KF", "ez"]),
        ];

        let compilers = vec![
            NamedAliases::new("Clang", &["clang"]),
            NamedAliases::new("GCC", &["gcc"]),
        ];

        let curves = [
            ("p448_solinas", "Curve448"),
            ("p224", "P-224"),
            ("p256", "P-256"),
            ("p384", "P-384"),
            ("p434", "SIKEp434"),
            ("p521", "P-521"),
            ("curve25519", "Curve25519"),
            ("curve25519_solinas", "Curve25519-Solinas"),
            ("poly1305", "Poly1305"),
            ("secp256k1_montgomery", "secp256k1"),
            ("secp256k1_dettman", "secp256k1-Dettman"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let implementations = [
            ("crypto_scalarmult/curve25519/sandy2x", "sandy2x", "av"),
            ("crypto_scalarmult/curve25519/amd64-51", "amd64-51", "a64"),
            ("crypto_scalarmult/curve25519/amd64-64", "amd64-64", "a64"),
            ("crypto_scalarmult/curve25519/donna", "donna", "av"),
            ("crypto_scalarmult/curve25519/donna_c64", "donna-c64", "c51"),
            ("crypto_scalarmult/curve25519/openssl-c-ots", "OSSL ots", "c51"),
            ("crypto_scalarmult/curve25519/openssl-ots", "OSSL fe-51 ots", "a51"),
            ("crypto_scalarmult/curve25519/openssl-fe64-ots", "OSSL fe-64 ots", "a64"),
            ("crypto_scalarmult/curve25519/openssl-fe51-cryptopt", "OSSL fe-51 + CryptOpt", "a51"),
            ("crypto_scalarmult/curve25519/openssl-fe64-cryptopt", "OSSL fe-64 + CryptOpt", "a64"),
            ("crypto_scalarmult/curve25519/openssl-fe64-fiat", "OSSL fe-64 + Fiat-C", "c64"),
            ("crypto_scalarmult/curve25519/everest-hacl-51", "HACL* fe-51", "c51"),
            ("crypto_scalarmult/curve25519/everest-hacl-64", "HACL* fe-64", "a64"),
            ("crypto_scalarmult/curve25519/everest-hacl-lib-51", "HACL* fe-51", "bin"),
            ("crypto_scalarmult/curve25519/everest-hacl-lib-64", "HACL* fe-64", "bin"),
            ("crypto_scalarmult/secp256k1/openssl-ots", "OSSL ots", "c port"),
            ("crypto_scalarmult/secp256k1/openssl-cryptopt", "OSSL + CryptOpt", "sa"),
            ("crypto_scalarmult/secp256k1/libsecp256k1-ots", "libsecp256k1", "sa"),
            ("crypto_scalarmult/secp256k1/libsecp256k1-c-ots", "libsecp256k1", "c52"),
            ("crypto_scalarmult/secp256k1/libsecp256k1-ots-c-dettman", "libsecp256k1 + Dettman (mul only)", "c52"),
            ("crypto_scalarmult/secp256k1/libsecp256k1-ots-cryptopt-dettman", "libsecp256k1 + CryptOpt (mul only)", "sa"),
            ("crypto_scalarmult/secp256k1/libsecp256k1-ots-cryptopt-bcc", "libsecp256k1 + CryptOpt (CS2)", "sa"),
        ]
        .iter()
        .map(|(id, name, field)| Implementation {
            id: id.to_string(),
            name: name.to_string(),
            field: field.to_string(),
        })
        .collect();

        let implementation_groups = vec![
            ImplementationGroup {
                heading: "Curve25519".to_string(),
                implementations: [
                    "sandy2x",
                    "amd64-64",
                    "amd64-51",
                    "donna",
                    "donna_c64",
                    "openssl-c-ots",
                    "openssl-ots",
                    "openssl-fe51-cryptopt",
                    "openssl-fe64-ots",
                    "openssl-fe64-cryptopt",
                    "everest-hacl-64",
                ]
                .iter()
                .map(|i| format!("crypto_scalarmult/curve25519/{}", i))
                .collect(),
            },
            ImplementationGroup {
                heading: "secp256k1".to_string(),
                implementations: [
                    "libsecp256k1-ots",
                    "libsecp256k1-c-ots",
                    "libsecp256k1-ots-cryptopt-dettman",
                    "libsecp256k1-ots-cryptopt-bcc",
                ]
                .iter()
                .map(|i| format!("crypto_scalarmult/secp256k1/{}", i))
                .collect(),
            },
        ];

        let languages = [
            ("c port", "C"),
            ("c", "C"),
            ("c64", "C"),
            ("c52", "C"),
            ("c51", "C"),
            ("av", "asm-v"),
            ("a64", "asm"),
            ("a51", "asm"),
            ("sa", "asm"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            machines,
            compilers,
            curves,
            implementations,
            implementation_groups,
            languages,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.machine_order().len(), 10);
        assert_eq!(config.compiler_order(), vec!["Clang", "GCC"]);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
    }

    #[test]
    fn test_normalize_machine() {
        let config = Config::default();
        assert_eq!(
            config.normalize_machine("AMD Ryzen 9 7950X 16-Core Processor"),
            "7950X"
        );
        assert_eq!(config.normalize_machine("ez"), "i9 13G");
        assert_eq!(config.normalize_machine("i9 13G"), "i9 13G");
        assert_eq!(config.normalize_machine("Apple M2"), "Apple M2");
    }

    #[test]
    fn test_compiler_recognizer() {
        let config = Config::default();
        assert_eq!(config.compiler_for("gcc"), Some("GCC"));
        assert_eq!(config.compiler_for("GCC"), Some("GCC"));
        assert_eq!(config.compiler_for("gcc-11"), Some("GCC"));
        assert_eq!(config.compiler_for("clang15"), Some("Clang"));
        assert_eq!(config.compiler_for("gccgo"), None);
        assert_eq!(config.compiler_for("5950X"), None);
    }

    #[test]
    fn test_classify_origin() {
        let config = Config::default();
        assert_eq!(
            config.classify_origin("clang"),
            Origin::CompilerGenerated("Clang".to_string())
        );
        assert_eq!(
            config.classify_origin("AMD Ryzen 7 5800X 8-Core Processor"),
            Origin::MachineTuned("5800X".to_string())
        );
    }

    #[test]
    fn test_language_for() {
        let config = Config::default();
        assert_eq!(config.language_for("crypto_scalarmult/curve25519/sandy2x"), "asm-v");
        assert_eq!(config.language_for("crypto_scalarmult/curve25519/donna_c64"), "C");
        assert_eq!(
            config.language_for("crypto_scalarmult/curve25519/everest-hacl-lib-64"),
            "bin"
        );
        assert_eq!(config.language_for("nope"), "-nope");
    }

    #[test]
    fn test_caption_for() {
        let config = Config::default();
        assert_eq!(config.caption_for("fiat_curve25519_carry_mul").unwrap(), "Curve25519");
        assert_eq!(config.caption_for("secp256k1_dettman_square").unwrap(), "secp256k1-Dettman");
        assert_eq!(config.caption_for("not_a_routine").unwrap(), "not_a_routine");
        assert!(matches!(
            config.caption_for("p999_mul"),
            Err(XvalError::MissingCaption { .. })
        ));
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = "machines:\n  - name: M1\n  - name: M2\n    aliases: [box2]\ntop_k: 3\n";
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.machine_order(), vec!["M1", "M2"]);
        assert_eq!(config.normalize_machine("box2"), "M2");
        assert_eq!(config.top_k, 3);
        // untouched tables keep their defaults
        assert_eq!(config.compiler_order(), vec!["Clang", "GCC"]);
    }

    #[test]
    fn test_yaml_roundtrip_default() {
        let config = Config::default();
        let yaml = config.to_yaml().unwrap();
        assert_eq!(Config::from_yaml(&yaml).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let config = Config::default().with_machines(&["M1", "M1"]);
        assert!(matches!(config.validate(), Err(XvalError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        assert!(Config::default().with_top_k(0).validate().is_err());
    }
}
