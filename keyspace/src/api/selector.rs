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

//! Selectors, as used to issue queries.
use std::{convert::TryFrom, fmt, str::FromStr};

use keyspace_config::SelectorConfig;
use keyspace_result::{zerror, Error, ZResult};

use super::{key_expr::KeyExpr, parameters::Parameters};

/// A selector is the combination of a [Key Expression](crate::key_expr::KeyExpr), which defines the
/// set of keys that are relevant to an operation, and a set of [`Parameters`]
/// with a few intended uses:
/// - specifying arguments to a queryable, allowing the passing of Remote Procedure Call parameters
/// - filtering by value,
/// - filtering by metadata, such as the timestamp of a value.
///
/// When in string form, selectors look a lot like a URI, with similar semantics:
/// - the `key_expr` before the first `?` must be a valid key expression (it is canonized first
///   unless [`SelectorConfig::autocanonize`] is disabled),
/// - the `parameters` after the first `?` follow the [parameters format](crate::parameters),
///   duplicate names being rejected by default.
///
/// ```
/// use std::convert::TryFrom;
/// use keyspace::selector::Selector;
///
/// let selector = Selector::try_from("a/b/c?arg1=val1").unwrap();
/// assert_eq!(selector.key_expr().as_str(), "a/b/c");
/// assert_eq!(selector.parameters().as_str(), "arg1=val1");
/// assert_eq!(selector.to_string(), "a/b/c?arg1=val1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Selector<'a> {
    key_expr: KeyExpr<'a>,
    parameters: Parameters<'a>,
}

/// The error returned when building a [`Selector`] from an empty string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySelector;

impl EmptySelector {
    pub const ERRNO: i8 = -11;
}

impl fmt::Display for EmptySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Empty selector")
    }
}

impl std::error::Error for EmptySelector {}

fn split_once(s: &str) -> (&str, &str) {
    match s.find('?') {
        Some(qmark_pos) => (&s[..qmark_pos], &s[qmark_pos + 1..]),
        None => (s, ""),
    }
}

fn parse_key_expr<'a>(raw: &'a str, config: &SelectorConfig) -> ZResult<KeyExpr<'a>> {
    match KeyExpr::try_from(raw) {
        Ok(key_expr) => Ok(key_expr),
        Err(_) if config.autocanonize() => KeyExpr::autocanonize(raw),
        Err(e) => Err(e),
    }
}

impl<'a> Selector<'a> {
    /// Parses `raw` as `key_expr?parameters`, following `config`.
    pub fn try_from_with(raw: &'a str, config: &SelectorConfig) -> ZResult<Self> {
        if raw.is_empty() {
            tracing::debug!("Rejecting empty selector");
            return Err(zerror!((EmptySelector::ERRNO) EmptySelector).into());
        }
        let (key_expr, parameters) = split_once(raw);
        let selector = parse_key_expr(key_expr, config).and_then(|key_expr| {
            Ok(Selector {
                key_expr,
                parameters: Parameters::try_from_with(parameters, config.parameters())?,
            })
        });
        if let Err(e) = &selector {
            tracing::debug!("Rejecting selector `{raw}`: {e}");
        }
        selector
    }

    /// Same as [`Selector::try_from_with`], producing a selector that owns its data.
    pub fn try_from_string_with(raw: String, config: &SelectorConfig) -> ZResult<Selector<'static>> {
        Selector::try_from_with(&raw, config).map(Selector::into_owned)
    }

    /// The key expression part of this selector.
    pub fn key_expr(&self) -> &KeyExpr<'a> {
        &self.key_expr
    }

    /// The parameters part of this selector.
    pub fn parameters(&self) -> &Parameters<'a> {
        &self.parameters
    }

    pub fn parameters_mut(&mut self) -> &mut Parameters<'a> {
        &mut self.parameters
    }

    /// Splits this selector into its key expression and its parameters.
    pub fn split(self) -> (KeyExpr<'a>, Parameters<'a>) {
        (self.key_expr, self.parameters)
    }

    /// Ensures `self` owns all of its data.
    pub fn into_owned(self) -> Selector<'static> {
        Selector {
            key_expr: self.key_expr.into_owned(),
            parameters: self.parameters.into_owned(),
        }
    }
}

impl<'a> TryFrom<&'a str> for Selector<'a> {
    type Error = Error;
    fn try_from(s: &'a str) -> Result<Self, Self::Error> {
        Selector::try_from_with(s, &SelectorConfig::default())
    }
}

impl<'a> TryFrom<&'a String> for Selector<'a> {
    type Error = Error;
    fn try_from(s: &'a String) -> Result<Self, Self::Error> {
        Selector::try_from(s.as_str())
    }
}

impl TryFrom<String> for Selector<'static> {
    type Error = Error;
    fn try_from(s: String) -> Result<Self, Self::Error> {
        Selector::try_from_string_with(s, &SelectorConfig::default())
    }
}

impl FromStr for Selector<'static> {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Selector::try_from(s).map(Selector::into_owned)
    }
}

impl<'a> From<KeyExpr<'a>> for Selector<'a> {
    fn from(key_expr: KeyExpr<'a>) -> Self {
        Selector {
            key_expr,
            parameters: Parameters::empty(),
        }
    }
}

impl<'a> From<(KeyExpr<'a>, Parameters<'a>)> for Selector<'a> {
    fn from((key_expr, parameters): (KeyExpr<'a>, Parameters<'a>)) -> Self {
        Selector {
            key_expr,
            parameters,
        }
    }
}

impl<'a> From<Selector<'a>> for (KeyExpr<'a>, Parameters<'a>) {
    fn from(selector: Selector<'a>) -> Self {
        selector.split()
    }
}

impl fmt::Debug for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "sel\"{self}\"")
    }
}

impl fmt::Display for Selector<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.key_expr)?;
        if !self.parameters.is_empty() {
            write!(f, "?{}", self.parameters)?;
        }
        Ok(())
    }
}

#[test]
fn selector_accessors() {
    for s in [
        "hello/there?_timetrick",
        "hello/there?_timetrick;_time",
        "hello/there?_timetrick;_time;_filter",
        "hello/there?_timetrick;_time=[..]",
        "hello/there?_timetrick;_time=[..];_filter",
    ] {
        let selector = Selector::try_from(s).unwrap();
        assert_eq!(selector.to_string(), s);
        let (key_expr, mut parameters) = selector.split();
        assert_eq!(key_expr.as_str(), "hello/there");
        assert_eq!(parameters.get("_timetrick").unwrap(), "");

        let time_range = "[now(-2s)..now(2s)]";
        parameters.insert("_time", time_range).unwrap();
        assert_eq!(parameters.get("_time").unwrap(), time_range);

        parameters.insert("_filter", "").unwrap();
        assert_eq!(parameters.get("_filter").unwrap(), "");

        let rebuilt = Selector::from((key_expr, parameters));
        assert!(rebuilt.to_string().starts_with("hello/there?_timetrick;"));
    }
}
