//
// Copyright (c) 2023 ZettaScale Technology
//
// This program and the accompanying materials are made available under the
// terms of the Eclipse Public License 2.0 which is available at
// http://www.eclipse.org/legal/epl-2.0, or the Apache License, Version 2.0
// which is available at https://www.apache.org/licenses/LICENSE-2.0.
//
// SPDX-License-Identifier: EPL-2.0 OR Apache-2.0
//
// Contributors:
//   ZettaScale Zenoh Team, <zenoh@zettascale.tech>
//

//! Configuration for keyspace.
//!
//! A [`Config`] is usually read from a json5 file, either explicitly with [`Config::from_file`]
//! or through the file named by the `KEYSPACE_CONFIG` environment variable with [`Config::from_env`].
//! Every field is optional, missing ones take the values found in [`defaults`]:
//!
//! ```json5
//! {
//!   parameters: {
//!     // "reject" or "last_wins"
//!     duplicates: "reject",
//!   },
//!   selector: {
//!     autocanonize: true,
//!   },
//! }
//! ```
pub mod defaults;

use std::{fmt, path::Path};

use keyspace_result::{bail, zerror, ZResult};
use serde::{Deserialize, Serialize};

/// What to do when a parameters string names the same parameter more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with a duplicate name error.
    Reject,
    /// Keep the value of the last occurrence.
    LastWins,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        defaults::parameters::duplicates
    }
}

fn default_autocanonize() -> bool {
    defaults::selector::autocanonize
}

/// Controls how parameters strings are parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParametersConfig {
    #[serde(default)]
    duplicates: DuplicatePolicy,
}

impl ParametersConfig {
    pub fn duplicates(&self) -> DuplicatePolicy {
        self.duplicates
    }

    pub fn set_duplicates(&mut self, duplicates: DuplicatePolicy) -> &mut Self {
        self.duplicates = duplicates;
        self
    }
}

/// Controls how selectors are parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SelectorConfig {
    #[serde(default = "default_autocanonize")]
    autocanonize: bool,
    #[serde(skip)]
    parameters: ParametersConfig,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        SelectorConfig {
            autocanonize: default_autocanonize(),
            parameters: ParametersConfig::default(),
        }
    }
}

impl SelectorConfig {
    /// Whether the key expression part of a selector is canonized before validation.
    pub fn autocanonize(&self) -> bool {
        self.autocanonize
    }

    pub fn set_autocanonize(&mut self, autocanonize: bool) -> &mut Self {
        self.autocanonize = autocanonize;
        self
    }

    /// The rules applied to the parameters part of a selector.
    pub fn parameters(&self) -> &ParametersConfig {
        &self.parameters
    }

    pub fn set_parameters(&mut self, parameters: ParametersConfig) -> &mut Self {
        self.parameters = parameters;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    parameters: ParametersConfig,
    #[serde(default)]
    selector: SelectorConfig,
}

impl Config {
    pub fn parameters(&self) -> &ParametersConfig {
        &self.parameters
    }

    /// The selector rules, with the top level `parameters` section applied to the selectors' parameters.
    pub fn selector(&self) -> SelectorConfig {
        let mut selector = self.selector.clone();
        selector.set_parameters(self.parameters.clone());
        selector
    }

    pub fn from_deserializer<'d, D: serde::Deserializer<'d>>(d: D) -> Result<Self, D::Error> {
        Config::deserialize(d)
    }

    pub fn from_json5(content: &str) -> ZResult<Self> {
        let mut d = json5::Deserializer::from_str(content)
            .map_err(|e| zerror!("JSON5 parsing error: {}", e))?;
        Config::from_deserializer(&mut d)
            .map_err(|e| zerror!("Invalid configuration: {}", e).into())
    }

    pub fn from_env() -> ZResult<Self> {
        let path = std::env::var(defaults::ENV)
            .map_err(|e| zerror!("Invalid ENV variable ({}): {}", defaults::ENV, e))?;
        Self::from_file(path.as_str())
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ZResult<Self> {
        let path = path.as_ref();
        Self::_from_file(path)
    }

    fn _from_file(path: &Path) -> ZResult<Config> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => bail!("Couldn't open file {}: {}", path.display(), e),
        };
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") | Some("json5") => {
                let config = Self::from_json5(&content)?;
                tracing::debug!("Loaded configuration from {}: {}", path.display(), config);
                Ok(config)
            }
            Some(other) => bail!(
                "Unsupported file type '.{}' (.json and .json5 are supported)",
                other
            ),
            None => bail!(
                "Unsupported file type. Configuration files must have an extension (.json and .json5 supported)"
            ),
        }
    }

    /// Sets the value found at `key` (a `/`-separated path such as `parameters/duplicates`) from its json5 representation.
    pub fn insert_json5(&mut self, key: &str, value: &str) -> ZResult<()> {
        fn parse<'a, T: Deserialize<'a>>(key: &str, value: &'a str) -> ZResult<T> {
            json5::from_str(value)
                .map_err(|e| zerror!("Invalid value for `{}`: {}", key, e).into())
        }
        match key.trim_matches('/') {
            "parameters" => self.parameters = parse(key, value)?,
            "parameters/duplicates" => self.parameters.duplicates = parse(key, value)?,
            "selector" => self.selector = parse(key, value)?,
            "selector/autocanonize" => self.selector.autocanonize = parse(key, value)?,
            other => bail!("Unknown configuration key `{}`", other),
        }
        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

#[test]
fn config_deser() {
    let config = Config::from_deserializer(
        &mut json5::Deserializer::from_str(
            r#"{
        parameters: {
          duplicates: "last_wins",
        },
      }"#,
        )
        .unwrap(),
    )
    .unwrap();
    assert_eq!(config.parameters().duplicates(), DuplicatePolicy::LastWins);
    assert!(config.selector().autocanonize());
    assert_eq!(
        config.selector().parameters().duplicates(),
        DuplicatePolicy::LastWins
    );

    let config = Config::from_json5(r#"{ selector: { autocanonize: false } }"#).unwrap();
    assert!(!config.selector().autocanonize());
    assert_eq!(config.parameters().duplicates(), DuplicatePolicy::Reject);

    assert_eq!(Config::from_json5("{}").unwrap(), Config::default());
    assert!(Config::from_json5(r#"{ parameters: { duplicates: "first_wins" } }"#).is_err());
    assert!(Config::from_json5(r#"{ selectors: {} }"#).is_err());
    assert!(Config::from_json5("{").is_err());
}

#[test]
fn config_insert_json5() {
    let mut config = Config::default();
    config
        .insert_json5("parameters/duplicates", r#""last_wins""#)
        .unwrap();
    config.insert_json5("/selector/autocanonize/", "false").unwrap();
    assert_eq!(config.parameters().duplicates(), DuplicatePolicy::LastWins);
    assert!(!config.selector().autocanonize());
    assert!(config.insert_json5("selector/autocanonize", "\"yes\"").is_err());
    assert!(config.insert_json5("transport", "{}").is_err());

    let displayed = config.to_string();
    let reparsed = Config::from_json5(&displayed).unwrap();
    assert_eq!(reparsed, config);
}

#[test]
fn config_from_file_and_env() {
    let dir = std::env::temp_dir().join(format!("keyspace-config-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("keyspace.json5");
    std::fs::write(
        &path,
        "// comments are allowed\n{ parameters: { duplicates: 'last_wins' } }",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.parameters().duplicates(), DuplicatePolicy::LastWins);

    std::env::set_var(defaults::ENV, &path);
    assert_eq!(Config::from_env().unwrap(), config);
    std::env::remove_var(defaults::ENV);
    assert!(Config::from_env().is_err());

    let yaml = dir.join("keyspace.yaml");
    std::fs::write(&yaml, "parameters: {}").unwrap();
    assert!(Config::from_file(&yaml).is_err());
    assert!(Config::from_file(dir.join("missing.json5")).is_err());
    std::fs::remove_dir_all(&dir).unwrap();
}
