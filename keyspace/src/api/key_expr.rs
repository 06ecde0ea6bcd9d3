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
use std::{
    borrow::Cow,
    convert::{TryFrom, TryInto},
    fmt,
    hash::{Hash, Hasher},
    ops::{Deref, Div},
    str::FromStr,
};

use keyspace_keyexpr::{canon::Canonize, keyexpr, OwnedKeyExpr};
use keyspace_result::{bail, Error, ZResult};

/// A key expression that either borrows its text or shares an [`OwnedKeyExpr`].
///
/// It dereferences to [`keyexpr`], where the grammar and the set relations are documented.
/// Serialized as a plain string, and validated again on deserialization.
#[derive(Clone, serde::Deserialize, serde::Serialize)]
#[serde(from = "OwnedKeyExpr", into = "OwnedKeyExpr")]
pub struct KeyExpr<'a>(Cow<'a, keyexpr>);

impl<'a> KeyExpr<'a> {
    /// Validates `t`, which must already be canon. See [`KeyExpr::autocanonize`] otherwise.
    pub fn new<T, E>(t: T) -> Result<Self, E>
    where
        Self: TryFrom<T, Error = E>,
    {
        Self::try_from(t)
    }

    /// Canonizes `t`, then validates it. The result always owns its text.
    ///
    /// ```
    /// use keyspace::key_expr::KeyExpr;
    ///
    /// let ke = KeyExpr::autocanonize("robot/**/**/$*$*").unwrap();
    /// assert_eq!(ke.as_str(), "robot/**/*");
    /// ```
    pub fn autocanonize<T: Into<String>>(t: T) -> ZResult<KeyExpr<'static>> {
        let mut t: String = t.into();
        t.canonize();
        KeyExpr::try_from(t)
    }

    /// A [`KeyExpr`] borrowing from `self`. Cloning an owned one only bumps a reference count.
    pub fn borrowing_clone(&'a self) -> Self {
        KeyExpr(Cow::Borrowed(&**self))
    }

    pub fn as_keyexpr(&self) -> &keyexpr {
        self
    }

    pub fn into_owned(self) -> KeyExpr<'static> {
        KeyExpr(Cow::Owned(self.0.into_owned()))
    }

    /// `self/s`, canonized.
    ///
    /// ```
    /// # use std::convert::TryFrom;
    /// # use keyspace::key_expr::KeyExpr;
    /// let fleet = KeyExpr::try_from("fleet/**").unwrap();
    /// assert_eq!(fleet.join("**/gps").unwrap().as_str(), "fleet/**/gps");
    /// ```
    pub fn join<S: AsRef<str> + ?Sized>(&self, s: &S) -> ZResult<KeyExpr<'static>> {
        Ok(self.as_keyexpr().join(s)?.into())
    }

    /// Glues `s` right after `self`, without a `/`. The result must be canon as is.
    ///
    /// Gluing a trailing `*` to a leading `*` is refused, since it would silently turn two
    /// wildcards into something else.
    pub fn concat<S: AsRef<str> + ?Sized>(&self, s: &S) -> ZResult<KeyExpr<'static>> {
        let s = s.as_ref();
        if self.ends_with('*') && s.starts_with('*') {
            bail!("Refusing to concatenate `{}` and `{}`: the `*`s would merge", self, s)
        }
        KeyExpr::try_from(format!("{self}{s}"))
    }
}

impl Deref for KeyExpr<'_> {
    type Target = keyexpr;
    fn deref(&self) -> &keyexpr {
        &self.0
    }
}

impl AsRef<keyexpr> for KeyExpr<'_> {
    fn as_ref(&self) -> &keyexpr {
        self
    }
}

impl AsRef<str> for KeyExpr<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<'a> TryFrom<&'a str> for KeyExpr<'a> {
    type Error = Error;
    fn try_from(s: &'a str) -> ZResult<Self> {
        Ok(KeyExpr(Cow::Borrowed(s.try_into()?)))
    }
}

impl<'a> TryFrom<&'a String> for KeyExpr<'a> {
    type Error = Error;
    fn try_from(s: &'a String) -> ZResult<Self> {
        KeyExpr::try_from(s.as_str())
    }
}

impl<'a> TryFrom<&'a mut str> for KeyExpr<'a> {
    type Error = Error;
    fn try_from(s: &'a mut str) -> ZResult<Self> {
        KeyExpr::try_from(s as &'a str)
    }
}

impl TryFrom<String> for KeyExpr<'_> {
    type Error = Error;
    fn try_from(s: String) -> ZResult<Self> {
        Ok(KeyExpr(Cow::Owned(OwnedKeyExpr::try_from(s)?)))
    }
}

impl FromStr for KeyExpr<'static> {
    type Err = Error;
    fn from_str(s: &str) -> ZResult<Self> {
        KeyExpr::try_from(s.to_owned())
    }
}

impl<'a> From<&'a keyexpr> for KeyExpr<'a> {
    fn from(ke: &'a keyexpr) -> Self {
        KeyExpr(Cow::Borrowed(ke))
    }
}

impl<'a> From<&'a OwnedKeyExpr> for KeyExpr<'a> {
    fn from(ke: &'a OwnedKeyExpr) -> Self {
        KeyExpr(Cow::Borrowed(ke))
    }
}

impl From<OwnedKeyExpr> for KeyExpr<'_> {
    fn from(ke: OwnedKeyExpr) -> Self {
        KeyExpr(Cow::Owned(ke))
    }
}

impl From<KeyExpr<'_>> for OwnedKeyExpr {
    fn from(ke: KeyExpr<'_>) -> Self {
        ke.0.into_owned()
    }
}

impl From<KeyExpr<'_>> for String {
    fn from(ke: KeyExpr<'_>) -> Self {
        match ke.0 {
            Cow::Borrowed(ke) => ke.as_str().to_owned(),
            Cow::Owned(ke) => ke.into(),
        }
    }
}

impl fmt::Debug for KeyExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_keyexpr(), f)
    }
}

impl fmt::Display for KeyExpr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: PartialEq<keyexpr> + ?Sized> PartialEq<T> for KeyExpr<'_> {
    fn eq(&self, other: &T) -> bool {
        other == self.as_keyexpr()
    }
}

impl Eq for KeyExpr<'_> {}

impl Hash for KeyExpr<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_keyexpr().hash(state)
    }
}

impl Div<&keyexpr> for &KeyExpr<'_> {
    type Output = KeyExpr<'static>;
    fn div(self, rhs: &keyexpr) -> KeyExpr<'static> {
        (self.as_keyexpr() / rhs).into()
    }
}

impl Div<&keyexpr> for KeyExpr<'_> {
    type Output = KeyExpr<'static>;
    fn div(self, rhs: &keyexpr) -> KeyExpr<'static> {
        &self / rhs
    }
}
