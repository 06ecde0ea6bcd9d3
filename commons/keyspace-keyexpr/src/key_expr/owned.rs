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
use super::{canon::Canonize, keyexpr};
use core::{
    convert::TryFrom,
    fmt,
    ops::{Deref, Div},
    str::FromStr,
};
use keyspace_result::Error;
use std::sync::Arc;

/// A [`Arc<str>`] newtype that is statically known to be a valid key expression.
///
/// See [`keyexpr`](super::borrowed::keyexpr).
#[derive(Clone, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(try_from = "String")]
#[serde(into = "String")]
pub struct OwnedKeyExpr(pub(crate) Arc<str>);

impl OwnedKeyExpr {
    /// Equivalent to `<OwnedKeyExpr as TryFrom>::try_from(t)`.
    ///
    /// Will return an Err if `t` isn't a valid key expression.
    /// Note that to be considered a valid key expression, a string MUST be canon.
    ///
    /// [`OwnedKeyExpr::autocanonize`] is an alternative constructor that will canonize the passed expression before constructing it.
    pub fn new<T, E>(t: T) -> Result<Self, E>
    where
        Self: TryFrom<T, Error = E>,
    {
        Self::try_from(t)
    }

    /// Canonizes the passed value before returning it as an `OwnedKeyExpr`.
    ///
    /// Will return Err if the passed value isn't a valid key expression despite canonization.
    pub fn autocanonize<T, E>(mut t: T) -> Result<Self, E>
    where
        Self: TryFrom<T, Error = E>,
        T: Canonize,
    {
        t.canonize();
        Self::new(t)
    }

    /// # Safety
    /// Key Expressions must follow some rules to be accepted by a keyspace session.
    /// Ensuring these rules are respected is the caller's responsibility.
    pub unsafe fn from_string_unchecked(s: String) -> Self {
        Self::from_boxed_str_unchecked(s.into_boxed_str())
    }

    /// # Safety
    /// Key Expressions must follow some rules to be accepted by a keyspace session.
    /// Ensuring these rules are respected is the caller's responsibility.
    pub unsafe fn from_boxed_str_unchecked(s: Box<str>) -> Self {
        OwnedKeyExpr(s.into())
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Div<&keyexpr> for OwnedKeyExpr {
    type Output = Self;
    fn div(self, rhs: &keyexpr) -> Self::Output {
        &self / rhs
    }
}

#[allow(clippy::suspicious_arithmetic_impl)]
impl Div<&keyexpr> for &OwnedKeyExpr {
    type Output = OwnedKeyExpr;
    fn div(self, rhs: &keyexpr) -> Self::Output {
        let lhs: &keyexpr = self;
        lhs / rhs
    }
}

#[test]
fn div() {
    let a = OwnedKeyExpr::new("a").unwrap();
    let b = keyexpr::new("b").unwrap();
    let k = a / b;
    assert_eq!(k.as_str(), "a/b");

    let a = OwnedKeyExpr::new("a/**").unwrap();
    let b = keyexpr::new("**/b").unwrap();
    assert_eq!((&a / b).as_str(), "a/**/b");
    let c = keyexpr::new("**").unwrap();
    assert_eq!((a / c).as_str(), "a/**");
}

impl fmt::Debug for OwnedKeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for OwnedKeyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Deref for OwnedKeyExpr {
    type Target = keyexpr;
    fn deref(&self) -> &Self::Target {
        unsafe { keyexpr::from_str_unchecked(&self.0) }
    }
}

impl AsRef<str> for OwnedKeyExpr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for OwnedKeyExpr {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<&str> for OwnedKeyExpr {
    type Error = Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::try_from(s.to_owned())
    }
}

impl TryFrom<String> for OwnedKeyExpr {
    type Error = Error;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        <&keyexpr as TryFrom<&str>>::try_from(value.as_str())?;
        Ok(Self(value.into()))
    }
}

impl<'a> From<&'a keyexpr> for OwnedKeyExpr {
    fn from(val: &'a keyexpr) -> Self {
        OwnedKeyExpr(Arc::from(val.as_str()))
    }
}

impl From<OwnedKeyExpr> for Arc<str> {
    fn from(ke: OwnedKeyExpr) -> Self {
        ke.0
    }
}

impl From<OwnedKeyExpr> for String {
    fn from(ke: OwnedKeyExpr) -> Self {
        ke.as_str().to_owned()
    }
}

impl PartialEq<str> for OwnedKeyExpr {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<keyexpr> for OwnedKeyExpr {
    fn eq(&self, other: &keyexpr) -> bool {
        self.as_str() == other.as_str()
    }
}

#[test]
fn serde_goes_through_validation() {
    let ke: OwnedKeyExpr = serde_json::from_str("\"a/*/b\"").unwrap();
    assert_eq!(ke.as_str(), "a/*/b");
    assert_eq!(serde_json::to_string(&ke).unwrap(), "\"a/*/b\"");
    assert!(serde_json::from_str::<OwnedKeyExpr>("\"a//b\"").is_err());
    assert!(serde_json::from_str::<OwnedKeyExpr>("\"**/*\"").is_err());
}
