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
use super::{canon::Canonize, OwnedKeyExpr, DELIMITER, DOUBLE_WILD, FORBIDDEN_CHARS, SINGLE_WILD};
use core::{
    convert::{TryFrom, TryInto},
    fmt,
    ops::{Deref, Div},
};
use keyspace_result::{zerror, Error, ZResult};
use std::borrow::{Borrow, ToOwned};

/// A borrowed key expression: a `str` that passed validation and is in canon form.
///
/// A key expression names a set of keys. It is a list of non-empty chunks separated by `/`:
/// * `*` matches exactly one chunk,
/// * `**` matches any number of chunks, zero included,
/// * `$*` inside a chunk matches any run of characters that stays within that chunk.
///
/// `#` and `?` never appear, and `$` only as the head of `$*`. Canon form makes string
/// equality the same thing as set equality; [`keyexpr::autocanonize`] rewrites an input into it.
///
/// Set relations are [`intersects`](keyexpr::intersects), [`includes`](keyexpr::includes)
/// and [`relation_to`](keyexpr::relation_to).
#[allow(non_camel_case_types)]
#[repr(transparent)]
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct keyexpr(str);

impl keyexpr {
    /// Validates `t` without rewriting it. Non-canon input is an error.
    pub fn new<'a, T, E>(t: &'a T) -> Result<&'a Self, E>
    where
        &'a Self: TryFrom<&'a T, Error = E>,
        T: ?Sized,
    {
        t.try_into()
    }

    /// Rewrites `t` in place into canon form, then validates it.
    pub fn autocanonize<'a, T, E>(t: &'a mut T) -> Result<&'a Self, E>
    where
        &'a Self: TryFrom<&'a T, Error = E>,
        T: Canonize + ?Sized,
    {
        t.canonize();
        Self::new(t)
    }

    pub fn intersects(&self, other: &Self) -> bool {
        use super::intersect::Intersector;
        super::intersect::DEFAULT_INTERSECTOR.intersect(self, other)
    }

    /// `true` when every key matched by `other` is also matched by `self`.
    pub fn includes(&self, other: &Self) -> bool {
        use super::include::Includer;
        super::include::DEFAULT_INCLUDER.includes(self, other)
    }

    /// The strongest relation `self` holds towards `other`. Costs up to one inclusion and one
    /// intersection check, so prefer those when only one answer is needed.
    pub fn relation_to(&self, other: &Self) -> SetIntersectionLevel {
        if self == other {
            SetIntersectionLevel::Equals
        } else if self.includes(other) {
            SetIntersectionLevel::Includes
        } else if self.intersects(other) {
            SetIntersectionLevel::Intersects
        } else {
            SetIntersectionLevel::Disjoint
        }
    }

    /// Appends `other` after a `/` and canonizes the result.
    ///
    /// ```rust
    /// # use keyspace_keyexpr::keyexpr;
    /// let sensors = keyexpr::new("building/*/sensors").unwrap();
    /// assert_eq!(sensors.join("**/**/temp").unwrap().as_str(), "building/*/sensors/**/temp");
    /// assert!(sensors.join("temp?").is_err());
    /// ```
    ///
    /// When `other` is already a `&keyexpr`, `self / other` cannot fail.
    pub fn join<S: AsRef<str> + ?Sized>(&self, other: &S) -> ZResult<OwnedKeyExpr> {
        OwnedKeyExpr::autocanonize(format!("{}/{}", self, other.as_ref()))
    }

    /// Whether any `*`, `**` or `$*` appears.
    pub fn is_wild(&self) -> bool {
        self.as_bytes().contains(&SINGLE_WILD)
    }

    /// The leading chunks of `self` up to, but excluding, the first chunk that holds a wildcard.
    /// `None` when the very first chunk is wild.
    ///
    /// ```
    /// # use keyspace_keyexpr::keyexpr;
    /// let prefix = |s| keyexpr::new(s).unwrap().get_nonwild_prefix().map(keyexpr::as_str);
    /// assert_eq!(prefix("fleet/truck-7/gps"), Some("fleet/truck-7/gps"));
    /// assert_eq!(prefix("fleet/truck-$*/gps"), Some("fleet"));
    /// assert_eq!(prefix("fleet/**/gps/*"), Some("fleet"));
    /// assert_eq!(prefix("*/gps"), None);
    /// ```
    pub fn get_nonwild_prefix(&self) -> Option<&keyexpr> {
        let mut end = 0;
        for chunk in self.chunks() {
            if chunk.is_wild() {
                break;
            }
            end += chunk.len() + 1;
        }
        match end {
            0 => None,
            end if end > self.len() => Some(self),
            // Leading whole chunks of a key expression form a key expression.
            end => Some(unsafe { keyexpr::from_str_unchecked(&self.0[..end - 1]) }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// # Safety
    /// `s` must already be a canon key expression. Nothing is checked, and later relation
    /// checks on an invalid value give meaningless answers.
    pub unsafe fn from_str_unchecked(s: &str) -> &Self {
        core::mem::transmute(s)
    }

    /// Splits on `/`. Each chunk is itself a key expression.
    pub fn chunks(&self) -> impl DoubleEndedIterator<Item = &Self> {
        self.0
            .split(DELIMITER as char)
            .map(|chunk| unsafe { Self::from_str_unchecked(chunk) })
    }
}

impl Div for &keyexpr {
    type Output = OwnedKeyExpr;
    fn div(self, rhs: Self) -> Self::Output {
        // Two canon KEs joined by `/` only need `**` merging, which canonization always achieves.
        let mut joined = format!("{}/{}", self, rhs);
        joined.canonize();
        unsafe { OwnedKeyExpr::from_string_unchecked(joined) }
    }
}

/// How two key expressions relate, ordered from weakest to strongest.
///
/// Each level implies the ones below it, so `level >= SetIntersectionLevel::Intersects`
/// tests for intersection and `level >= SetIntersectionLevel::Includes` for inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SetIntersectionLevel {
    Disjoint,
    Intersects,
    Includes,
    Equals,
}

#[test]
fn intersection_level_cmp() {
    use SetIntersectionLevel::*;
    assert!(Disjoint < Intersects);
    assert!(Intersects < Includes);
    assert!(Includes < Equals);
    let level = |l: &str, r: &str| keyexpr::new(l).unwrap().relation_to(keyexpr::new(r).unwrap());
    assert!(level("a/*", "*/b") >= Intersects);
    assert!(level("a/*", "*/b") < Includes);
    assert!(level("a/**", "a/b") >= Includes);
    assert!(level("a/b", "c/d") < Intersects);
}

impl fmt::Debug for keyexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ke`{}`", self.as_ref())
    }
}

impl fmt::Display for keyexpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

/// The ways a string can fail to be a canon key expression.
///
/// The discriminant is the error number carried by the resulting [`ZError`](keyspace_result::ZError).
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExprConstructionError {
    LoneDollarStar = -1,
    SingleStarAfterDoubleStar = -2,
    DoubleStarAfterDoubleStar = -3,
    EmptyChunk = -4,
    StarsInChunk = -5,
    DollarAfterDollarOrStar = -6,
    ContainsSharpOrQMark = -7,
    ContainsUnboundDollar = -8,
}

impl KeyExprConstructionError {
    pub const fn reason(self) -> &'static str {
        match self {
            Self::LoneDollarStar => "lone `$*`s must be replaced by `*` to reach canon-form",
            Self::SingleStarAfterDoubleStar => "`**/*` must be replaced by `*/**` to reach canon-form",
            Self::DoubleStarAfterDoubleStar => "`**/**` must be replaced by `**` to reach canon-form",
            Self::EmptyChunk => {
                "empty chunks are forbidden, as well as leading and trailing slashes"
            }
            Self::StarsInChunk => "`*` and `**` may only be preceded and followed by `/`",
            Self::DollarAfterDollarOrStar => "`$` is not allowed after `$*`",
            Self::ContainsSharpOrQMark => "`#` and `?` are forbidden characters",
            Self::ContainsUnboundDollar => "`$` is only allowed in `$*`",
        }
    }
}

/// The error raised when a string isn't a valid key expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKeyExpr {
    expr: String,
    kind: KeyExprConstructionError,
}

impl InvalidKeyExpr {
    pub fn new<S: Into<String>>(expr: S, kind: KeyExprConstructionError) -> Self {
        InvalidKeyExpr {
            expr: expr.into(),
            kind,
        }
    }

    /// The offending string.
    pub fn expr(&self) -> &str {
        &self.expr
    }

    pub fn kind(&self) -> KeyExprConstructionError {
        self.kind
    }
}

impl fmt::Display for InvalidKeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid Key Expr `{}`: {}", self.expr, self.kind.reason())
    }
}

impl std::error::Error for InvalidKeyExpr {}

fn invalid(value: &str, kind: KeyExprConstructionError) -> Error {
    zerror!((kind) InvalidKeyExpr::new(value, kind)).into()
}

/// Checks one chunk. `after_double_wild` tells whether the previous chunk was `**`.
fn check_chunk(chunk: &[u8], after_double_wild: bool) -> Result<(), KeyExprConstructionError> {
    use KeyExprConstructionError::*;
    match chunk {
        b"" => Err(EmptyChunk),
        b"$*" => Err(LoneDollarStar),
        b"**" if after_double_wild => Err(DoubleStarAfterDoubleStar),
        b"*" if after_double_wild => Err(SingleStarAfterDoubleStar),
        b"*" | b"**" => Ok(()),
        _ => {
            for (i, byte) in chunk.iter().enumerate() {
                let next = |n: usize| chunk.get(i + n).copied();
                match *byte {
                    b'$' if next(1) != Some(SINGLE_WILD) => return Err(ContainsUnboundDollar),
                    b'$' if next(2) == Some(b'$') => return Err(DollarAfterDollarOrStar),
                    SINGLE_WILD if i == 0 || chunk[i - 1] != b'$' => return Err(StarsInChunk),
                    c if FORBIDDEN_CHARS.contains(&c) && c != b'$' => {
                        return Err(ContainsSharpOrQMark)
                    }
                    _ => {}
                }
            }
            Ok(())
        }
    }
}

/// Validation stops at the first offending chunk, reading left to right.
impl<'a> TryFrom<&'a str> for &'a keyexpr {
    type Error = Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        let mut after_double_wild = false;
        for chunk in value.as_bytes().split(|&b| b == DELIMITER) {
            if let Err(kind) = check_chunk(chunk, after_double_wild) {
                return Err(invalid(value, kind));
            }
            after_double_wild = chunk == DOUBLE_WILD;
        }
        Ok(unsafe { keyexpr::from_str_unchecked(value) })
    }
}

impl<'a> TryFrom<&'a String> for &'a keyexpr {
    type Error = Error;
    fn try_from(value: &'a String) -> Result<Self, Self::Error> {
        value.as_str().try_into()
    }
}

impl<'a> TryFrom<&'a &'a str> for &'a keyexpr {
    type Error = Error;
    fn try_from(value: &'a &'a str) -> Result<Self, Self::Error> {
        (*value).try_into()
    }
}

#[test]
fn autocanon() {
    let mut s = String::from("hello/**/*");
    assert_eq!(keyexpr::autocanonize(&mut s).unwrap(), "hello/*/**");
}

impl Deref for keyexpr {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for keyexpr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for keyexpr {
    fn eq(&self, other: &str) -> bool {
        &self.0 == other
    }
}

impl PartialEq<keyexpr> for str {
    fn eq(&self, other: &keyexpr) -> bool {
        other == self
    }
}

impl Borrow<keyexpr> for OwnedKeyExpr {
    fn borrow(&self) -> &keyexpr {
        self
    }
}

impl ToOwned for keyexpr {
    type Owned = OwnedKeyExpr;
    fn to_owned(&self) -> OwnedKeyExpr {
        OwnedKeyExpr::from(self)
    }
}
