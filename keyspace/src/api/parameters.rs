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

//! Functions to manipulate `&str`s which follow the parameters format `a=b;c=d|e;f=g`,
//! and the [`Parameters`] structure, which provides a `HashMap<&str, &str>`-like view over such a string.
//!
//! `;` is the separator between the key-value `(&str, &str)` elements.
//!
//! `=` is the separator between the `&str`-key and `&str`-value. Only the first `=` of an element
//! splits it: `a=b=c` maps `a` to `b=c`. An element without `=` maps its key to the empty string.
//!
//! `|` is the separator between multiple elements of the values.
use std::{
    borrow::{Borrow, Cow},
    collections::{HashMap, HashSet},
    convert::TryFrom,
    fmt,
    str::FromStr,
};

use keyspace_config::{DuplicatePolicy, ParametersConfig};
use keyspace_result::{zerror, Error, ZResult};

pub(crate) const LIST_SEPARATOR: char = ';';
pub(crate) const FIELD_SEPARATOR: char = '=';
pub(crate) const VALUE_SEPARATOR: char = '|';

fn split_once(s: &str, c: char) -> (&str, &str) {
    match s.find(c) {
        Some(index) => {
            let (l, r) = s.split_at(index);
            (l, &r[1..])
        }
        None => (s, ""),
    }
}

/// Returns an iterator of key-value `(&str, &str)` pairs according to the parameters format.
pub fn iter(s: &str) -> impl DoubleEndedIterator<Item = (&str, &str)> + Clone {
    s.split(LIST_SEPARATOR)
        .filter(|p| !p.is_empty())
        .map(|p| split_once(p, FIELD_SEPARATOR))
}

/// Joins two key-value `(&str, &str)` iterators removing from `current` any element whose key is present in `new`.
pub fn join<'s, C, N>(current: C, new: N) -> impl Iterator<Item = (&'s str, &'s str)> + Clone
where
    C: Iterator<Item = (&'s str, &'s str)> + Clone,
    N: Iterator<Item = (&'s str, &'s str)> + Clone + 's,
{
    let n = new.clone();
    let current = current.filter(move |(kc, _)| !n.clone().any(|(kn, _)| kn == *kc));
    current.chain(new)
}

/// Builds a string from key-value pairs, keeping the position where each key first appears.
///
/// When a key appears several times, its last value is kept. Pairs that would not read back
/// as themselves are rejected: empty keys, keys holding `;` or `=`, and values holding `;`.
#[allow(clippy::should_implement_trait)]
pub fn from_iter<'s, I>(iter: I) -> ZResult<String>
where
    I: Iterator<Item = (&'s str, &'s str)>,
{
    let pairs = last_wins(iter);
    for (k, v) in &pairs {
        check_pair(k, v)?;
    }
    Ok(concat(pairs.into_iter()))
}

/// Get the a `&str`-value for a `&str`-key according to the parameters format.
pub fn get<'s>(s: &'s str, k: &str) -> Option<&'s str> {
    iter(s).find(|(key, _)| *key == k).map(|(_, value)| value)
}

/// Get the a `&str`-value iterator for a `&str`-key according to the parameters format.
pub fn values<'s>(s: &'s str, k: &str) -> impl DoubleEndedIterator<Item = &'s str> {
    match get(s, k) {
        Some(v) => v.split(VALUE_SEPARATOR),
        None => {
            let mut i = "".split(VALUE_SEPARATOR);
            i.next();
            i
        }
    }
}

/// Moves `k` to the end of `s` with the value `v`, returning the new string and the previous value.
///
/// Fails on the same pairs as [`from_iter`].
pub fn insert<'s>(s: &'s str, k: &'s str, v: &'s str) -> ZResult<(String, Option<&'s str>)> {
    check_pair(k, v)?;
    let previous = get(s, k);
    let kept = iter(s).filter(move |(key, _)| *key != k);
    Ok((concat(kept.chain(Some((k, v)))), previous))
}

/// Remove a key-value `(&str, &str)` pair from `s` preserving the insertion order.
pub fn remove<'s>(s: &'s str, k: &str) -> (String, Option<&'s str>) {
    let item = get(s, k);
    (concat(iter(s).filter(|x| x.0 != k)), item)
}

fn last_wins<'s, I>(iter: I) -> Vec<(&'s str, &'s str)>
where
    I: Iterator<Item = (&'s str, &'s str)>,
{
    let mut pairs: Vec<(&str, &str)> = Vec::new();
    for (k, v) in iter {
        match pairs.iter_mut().find(|(key, _)| *key == k) {
            Some(pair) => pair.1 = v,
            None => pairs.push((k, v)),
        }
    }
    pairs
}

fn concat<'s, I>(iter: I) -> String
where
    I: Iterator<Item = (&'s str, &'s str)>,
{
    let mut into = String::new();
    for (k, v) in iter.filter(|(k, _)| !k.is_empty()) {
        if !into.is_empty() {
            into.push(LIST_SEPARATOR);
        }
        into.push_str(k);
        if !v.is_empty() {
            into.push(FIELD_SEPARATOR);
            into.push_str(v);
        }
    }
    into
}

/// The reasons a parameters string, or a pair written into one, may be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParametersError {
    /// The named parameter appears more than once.
    DuplicateName(String),
    /// The element has no name, as in `=value`.
    EmptyName(String),
    /// The pair holds a separator that would split it differently once written,
    /// like a `;` anywhere or a `=` in the name.
    Separator { name: String, value: String },
}

impl ParametersError {
    pub const fn errno(&self) -> i8 {
        match self {
            ParametersError::DuplicateName(_) => -9,
            ParametersError::EmptyName(_) => -10,
            ParametersError::Separator { .. } => -12,
        }
    }
}

impl fmt::Display for ParametersError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParametersError::DuplicateName(name) => {
                write!(f, "Parameter `{name}` is defined more than once")
            }
            ParametersError::EmptyName(element) => {
                write!(f, "Parameter `{element}` has an empty name")
            }
            ParametersError::Separator { name, value } => write!(
                f,
                "Parameter `{name}` with value `{value}` holds a separator (`;` anywhere, `=` in the name)"
            ),
        }
    }
}

impl std::error::Error for ParametersError {}

fn reject(context: &str, error: ParametersError) -> Error {
    tracing::debug!("Rejecting parameters `{context}`: {error}");
    let errno = error.errno();
    zerror!((errno) error).into()
}

fn check_pair(k: &str, v: &str) -> ZResult<()> {
    let error = if k.is_empty() {
        ParametersError::EmptyName(format!("{FIELD_SEPARATOR}{v}"))
    } else if k.contains([LIST_SEPARATOR, FIELD_SEPARATOR].as_slice()) || v.contains(LIST_SEPARATOR) {
        ParametersError::Separator {
            name: k.to_owned(),
            value: v.to_owned(),
        }
    } else {
        return Ok(());
    };
    Err(reject(&format!("{k}{FIELD_SEPARATOR}{v}"), error))
}

/// Checks `s` against `policy`, returning the rewritten string if duplicates had to be merged.
fn validate(s: &str, policy: DuplicatePolicy) -> ZResult<Option<String>> {
    let mut seen = HashSet::new();
    let mut merge = false;
    for element in s.split(LIST_SEPARATOR).filter(|p| !p.is_empty()) {
        let (k, _) = split_once(element, FIELD_SEPARATOR);
        let error = if k.is_empty() {
            ParametersError::EmptyName(element.to_owned())
        } else if !seen.insert(k) {
            if policy == DuplicatePolicy::LastWins {
                merge = true;
                continue;
            }
            ParametersError::DuplicateName(k.to_owned())
        } else {
            continue;
        };
        return Err(reject(s, error));
    }
    // Pairs read from `s` cannot hold separators, so they are written back without checks.
    Ok(merge.then(|| concat(last_wins(iter(s)).into_iter())))
}

/// An ordered map of key/value (String,String) parameters.
///
/// It is parsed from a string using `;` as separator between each parameter
/// and the first `=` as separator between a key and its value.
/// Parsing fails if a key appears twice (unless configured otherwise through [`ParametersConfig`])
/// or if an element has an empty key. Pairs added afterwards are checked so that the text
/// always parses back to the same pairs.
///
/// Percent-encoding of keys and values is left to the caller.
///
/// Example:
/// ```
/// use std::convert::TryFrom;
/// use keyspace::parameters::Parameters;
///
/// let a = "a=1;b=2;c=3|4|5;d=6";
/// let p = Parameters::try_from(a).unwrap();
///
/// // Retrieve values
/// assert!(!p.is_empty());
/// assert_eq!(p.get("a").unwrap(), "1");
/// assert_eq!(p.get("b").unwrap(), "2");
/// assert_eq!(p.get("c").unwrap(), "3|4|5");
/// assert_eq!(p.get("d").unwrap(), "6");
/// assert_eq!(p.values("c").collect::<Vec<&str>>(), vec!["3", "4", "5"]);
///
/// // Iterate over parameters
/// let mut iter = p.iter();
/// assert_eq!(iter.next().unwrap(), ("a", "1"));
/// assert_eq!(iter.next().unwrap(), ("b", "2"));
/// assert_eq!(iter.next().unwrap(), ("c", "3|4|5"));
/// assert_eq!(iter.next().unwrap(), ("d", "6"));
/// assert!(iter.next().is_none());
///
/// // Build parameters from pairs
/// let pi = Parameters::try_from_iter([("a", "1"), ("b", "2"), ("c", "3|4|5"), ("d", "6")]).unwrap();
/// assert_eq!(p, pi);
/// assert!(Parameters::try_from_iter([("a", "1;b=2")]).is_err());
///
/// // Duplicates are rejected
/// assert!(Parameters::try_from("a=1;a=2").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct Parameters<'s>(Cow<'s, str>);

impl<'s> Parameters<'s> {
    /// Create empty parameters.
    pub const fn empty() -> Self {
        Self(Cow::Borrowed(""))
    }

    /// Parses `raw` following the duplicate policy of `config`.
    ///
    /// The string is kept as is, so that displaying the result gives `raw` back,
    /// unless duplicates were merged.
    pub fn try_from_with<S>(raw: S, config: &ParametersConfig) -> ZResult<Self>
    where
        S: Into<Cow<'s, str>>,
    {
        let raw = raw.into();
        Ok(match validate(&raw, config.duplicates())? {
            Some(merged) => Self(Cow::Owned(merged)),
            None => Self(raw),
        })
    }

    /// Builds parameters from pairs, like [`from_iter`]. Works with maps, slices of pairs, and
    /// any other iterator over `(&K, &V)`.
    pub fn try_from_iter<'e, I, K, V>(iter: I) -> ZResult<Self>
    where
        I: IntoIterator<Item = (&'e K, &'e V)>,
        K: Borrow<str> + 'e + ?Sized,
        V: Borrow<str> + 'e + ?Sized,
    {
        let pairs = iter.into_iter().map(|(k, v)| (k.borrow(), v.borrow()));
        Ok(Self(Cow::Owned(from_iter(pairs)?)))
    }

    /// Returns `true` if parameters does not contain anything.
    pub fn is_empty(&self) -> bool {
        iter(&self.0).next().is_none()
    }

    /// Returns parameters as [`str`].
    pub fn as_str(&'s self) -> &'s str {
        &self.0
    }

    /// Returns `true` if parameters contains the specified key.
    pub fn contains_key<K>(&self, k: K) -> bool
    where
        K: Borrow<str>,
    {
        get(&self.0, k.borrow()).is_some()
    }

    /// Returns a reference to the `&str`-value corresponding to the key.
    pub fn get<K>(&'s self, k: K) -> Option<&'s str>
    where
        K: Borrow<str>,
    {
        get(self.as_str(), k.borrow())
    }

    /// Returns an iterator to the `&str`-values corresponding to the key.
    pub fn values<K>(&'s self, k: K) -> impl DoubleEndedIterator<Item = &'s str>
    where
        K: Borrow<str>,
    {
        values(self.as_str(), k.borrow())
    }

    /// Returns an iterator on the key-value pairs as `(&str, &str)`.
    pub fn iter(&'s self) -> impl DoubleEndedIterator<Item = (&'s str, &'s str)> + Clone {
        iter(self.as_str())
    }

    /// Sets `k` to `v` and returns the previous value. `k` moves to the end.
    ///
    /// Nothing changes if the pair is rejected by [`from_iter`]'s rules.
    pub fn insert<K, V>(&mut self, k: K, v: V) -> ZResult<Option<String>>
    where
        K: Borrow<str>,
        V: Borrow<str>,
    {
        let (inner, previous) = insert(&self.0, k.borrow(), v.borrow())?;
        let previous = previous.map(str::to_owned);
        self.0 = Cow::Owned(inner);
        Ok(previous)
    }

    /// Removes a key from the map, returning the value at the key if the key was previously in the parameters.
    pub fn remove<K>(&mut self, k: K) -> Option<String>
    where
        K: Borrow<str>,
    {
        let (inner, item) = remove(&self.0, k.borrow());
        let item = item.map(|i| i.to_string());
        self.0 = Cow::Owned(inner);
        item
    }

    /// Extend these parameters with other parameters. Values from `other` take precedence.
    pub fn extend(&mut self, other: &Parameters) {
        self.0 = Cow::Owned(concat(join(iter(&self.0), other.iter())));
    }

    /// Extend these parameters from an iterator. Values from `iter` take precedence.
    ///
    /// Nothing changes if one of the pairs is rejected.
    pub fn extend_from_iter<'e, I, K, V>(&mut self, iter: I) -> ZResult<()>
    where
        I: Iterator<Item = (&'e K, &'e V)> + Clone,
        K: Borrow<str> + 'e + ?Sized,
        V: Borrow<str> + 'e + ?Sized,
    {
        let inner = from_iter(join(
            self::iter(&self.0),
            iter.map(|(k, v)| (k.borrow(), v.borrow())),
        ))?;
        self.0 = Cow::Owned(inner);
        Ok(())
    }

    /// Convert these parameters into owned parameters.
    pub fn into_owned(self) -> Parameters<'static> {
        Parameters(Cow::Owned(self.0.into_owned()))
    }
}

impl<'s> TryFrom<&'s str> for Parameters<'s> {
    type Error = Error;
    fn try_from(value: &'s str) -> Result<Self, Self::Error> {
        Self::try_from_with(value, &ParametersConfig::default())
    }
}

impl TryFrom<String> for Parameters<'_> {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from_with(value, &ParametersConfig::default())
    }
}

impl<'s> TryFrom<Cow<'s, str>> for Parameters<'s> {
    type Error = Error;
    fn try_from(value: Cow<'s, str>) -> Result<Self, Self::Error> {
        Self::try_from_with(value, &ParametersConfig::default())
    }
}

impl FromStr for Parameters<'static> {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameters::try_from(s.to_owned())
    }
}

impl<'s> From<&'s Parameters<'s>> for HashMap<&'s str, &'s str> {
    fn from(props: &'s Parameters<'s>) -> Self {
        HashMap::from_iter(props.iter())
    }
}

impl From<&Parameters<'_>> for HashMap<String, String> {
    fn from(props: &Parameters<'_>) -> Self {
        HashMap::from_iter(iter(&props.0).map(|(k, v)| (k.to_string(), v.to_string())))
    }
}

impl From<Parameters<'_>> for HashMap<String, String> {
    fn from(props: Parameters) -> Self {
        HashMap::from(&props)
    }
}

impl fmt::Display for Parameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Parameters<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use keyspace_result::ErrNo;

    fn params(s: &str) -> Parameters<'_> {
        Parameters::try_from(s).unwrap()
    }

    fn error_of(e: &Error) -> Option<&ParametersError> {
        keyspace_result::downcast_ref::<ParametersError>(&**e)
    }

    #[test]
    fn test_parameters() {
        assert!(params("").is_empty());
        assert!(params(";;").is_empty());

        assert_eq!(params("p1"), Parameters::try_from_iter([("p1", "")]).unwrap());

        assert_eq!(params("p1=v1"), Parameters::try_from_iter([("p1", "v1")]).unwrap());

        assert_eq!(
            params("p1=v1;p2;p3=v3").iter().collect::<Vec<_>>(),
            vec![("p1", "v1"), ("p2", ""), ("p3", "v3")]
        );

        assert_eq!(
            params("p1=v 1;p 2=v2").iter().collect::<Vec<_>>(),
            vec![("p1", "v 1"), ("p 2", "v2")]
        );

        assert_eq!(
            params("p1=x=y;p2=a==b").iter().collect::<Vec<_>>(),
            vec![("p1", "x=y"), ("p2", "a==b")]
        );

        let mut hm: HashMap<String, String> = HashMap::new();
        hm.insert("p1".to_string(), "v1".to_string());
        assert_eq!(Parameters::try_from_iter(&hm).unwrap(), params("p1=v1"));

        let mut hm: HashMap<&str, &str> = HashMap::new();
        hm.insert("p1", "v1");
        assert_eq!(Parameters::try_from_iter(&hm).unwrap(), params("p1=v1"));
    }

    #[test]
    fn rejections() {
        for (s, expected) in [
            ("a=1;a=2", ParametersError::DuplicateName("a".into())),
            ("a;b=1;a", ParametersError::DuplicateName("a".into())),
            ("a=1;=2", ParametersError::EmptyName("=2".into())),
            ("=", ParametersError::EmptyName("=".into())),
        ] {
            let e = Parameters::try_from(s).unwrap_err();
            assert_eq!(error_of(&e), Some(&expected), "{s}");
            assert_eq!(e.errno().get(), expected.errno());
        }
    }

    #[test]
    fn built_pairs_must_read_back() {
        let separator = |name: &str, value: &str| ParametersError::Separator {
            name: name.into(),
            value: value.into(),
        };
        for ((k, v), expected) in [
            (("a", "1;a=2"), separator("a", "1;a=2")),
            (("k=v", "w"), separator("k=v", "w")),
            (("k;", ""), separator("k;", "")),
            (("", "v"), ParametersError::EmptyName("=v".into())),
        ] {
            let e = Parameters::try_from_iter([(k, v)]).unwrap_err();
            assert_eq!(error_of(&e), Some(&expected), "{k:?} {v:?}");
            assert_eq!(e.errno().get(), expected.errno());
            assert!(from_iter([(k, v)].into_iter()).is_err());
            assert!(insert("x=1", k, v).is_err());
        }

        let mut p = params("x=1");
        assert!(p.insert("y", "2;x=3").is_err());
        assert!(p.extend_from_iter([("z", "1;x=4")].iter().map(|(k, v)| (k, v))).is_err());
        assert_eq!(p.as_str(), "x=1");

        // `=` inside a value, `|` anywhere and spaces survive a reparse
        let p = Parameters::try_from_iter([("x", "a=b"), ("l", "1|2"), ("s p", "v w"), ("f", "")])
            .unwrap();
        let reparsed = Parameters::try_from(p.to_string()).unwrap();
        assert_eq!(reparsed, p);
        assert_eq!(
            reparsed.iter().collect::<Vec<_>>(),
            [("x", "a=b"), ("l", "1|2"), ("s p", "v w"), ("f", "")]
        );
    }

    #[test]
    fn last_wins_policy() {
        let mut config = ParametersConfig::default();
        config.set_duplicates(DuplicatePolicy::LastWins);
        let p = Parameters::try_from_with("a=1;b;a=3", &config).unwrap();
        assert_eq!(p.as_str(), "a=3;b");
        let p = Parameters::try_from_with("a=1;b", &config).unwrap();
        assert!(matches!(p.0, Cow::Borrowed(_)));
        assert!(Parameters::try_from_with("=1", &config).is_err());
    }

    #[test]
    fn edits() {
        let mut p = params("a=1;b=2");
        assert_eq!(p.insert("a", "3").unwrap().as_deref(), Some("1"));
        assert_eq!(p.as_str(), "b=2;a=3");
        assert_eq!(p.insert("c", "").unwrap().as_deref(), None);
        assert_eq!(p.as_str(), "b=2;a=3;c");
        assert_eq!(p.remove("b").as_deref(), Some("2"));
        assert_eq!(p.remove("b"), None);
        assert_eq!(p.as_str(), "a=3;c");

        p.extend(&params("c=4;d=5"));
        assert_eq!(p.as_str(), "a=3;c=4;d=5");
        assert!(p.contains_key("d"));

        let hm: HashMap<String, String> = HashMap::from(&p);
        p.extend_from_iter(hm.iter()).unwrap();
        assert_eq!(HashMap::<String, String>::from(p), hm);
    }

    #[test]
    fn keeps_raw_text() {
        for s in ["a", "a=", "a=1;;b", "a=1|2;b=c=d;", "k=v w"] {
            assert_eq!(params(s).to_string(), s);
        }
    }
}
