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
//! ⚠️ WARNING ⚠️
//!
//! This crate is intended for keyspace's internal use.
//!
//! Fallible keyspace operations return a [`ZResult`]. When keyspace itself rejects an input it
//! raises a [`ZError`], which wraps the typed reason, remembers where it was raised and carries
//! the negative error number reported through [`ErrNo`] and across the C boundary.
use core::fmt;

pub use anyhow::anyhow;
pub use std::error::Error as IError;

pub type Error = Box<dyn IError + Send + Sync + 'static>;

pub type ZResult<T> = core::result::Result<T, Error>;

/// An error number, always below zero so that `0` can mean success in C.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NegativeI8(i8);

impl NegativeI8 {
    /// Reported for errors that carry no number of their own.
    pub const MIN: Self = Self::new(i8::MIN);

    pub const fn new(v: i8) -> Self {
        assert!(v < 0, "error numbers must be negative");
        NegativeI8(v)
    }

    pub const fn get(self) -> i8 {
        self.0
    }
}

pub struct ZError {
    error: anyhow::Error,
    errno: NegativeI8,
    file: &'static str,
    line: u32,
}

impl ZError {
    pub fn new<E: Into<anyhow::Error>>(
        error: E,
        file: &'static str,
        line: u32,
        errno: NegativeI8,
    ) -> ZError {
        ZError {
            error: error.into(),
            errno,
            file,
            line,
        }
    }

    /// The typed reason, if it is an `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.error.downcast_ref::<E>()
    }

    /// Where the error was raised, as `(file, line)`.
    pub fn location(&self) -> (&'static str, u32) {
        (self.file, self.line)
    }
}

impl IError for ZError {}

impl fmt::Debug for ZError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for ZError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}:{}.", self.error, self.file, self.line)
    }
}

pub trait ErrNo {
    fn errno(&self) -> NegativeI8;
}

impl ErrNo for ZError {
    fn errno(&self) -> NegativeI8 {
        self.errno
    }
}

/// Foreign errors report [`NegativeI8::MIN`].
impl ErrNo for dyn IError + Send + Sync + 'static {
    fn errno(&self) -> NegativeI8 {
        self.downcast_ref::<ZError>()
            .map_or(NegativeI8::MIN, ErrNo::errno)
    }
}

/// Finds a typed error of type `E`, either wrapped by a [`ZError`] or as `error` itself.
pub fn downcast_ref<'a, E>(error: &'a (dyn IError + Send + Sync + 'static)) -> Option<&'a E>
where
    E: IError + Send + Sync + 'static,
{
    match error.downcast_ref::<ZError>() {
        Some(zerror) => zerror.downcast_ref::<E>(),
        None => error.downcast_ref::<E>(),
    }
}

/// Builds a [`ZError`] at the call site.
///
/// - `zerror!((errno) typed_error)` wraps a typed error under the given error number,
/// - `zerror!((errno) "format", args..)` and `zerror!("format", args..)` build a message,
///   the latter with [`NegativeI8::MIN`].
#[macro_export]
macro_rules! zerror {
    (($errno:expr) $e:expr) => {
        $crate::ZError::new($e, file!(), line!(), $crate::NegativeI8::new($errno as i8))
    };
    (($errno:expr) $($fmt:tt)*) => {
        $crate::ZError::new($crate::anyhow!($($fmt)*), file!(), line!(), $crate::NegativeI8::new($errno as i8))
    };
    ($($fmt:tt)*) => {
        $crate::ZError::new($crate::anyhow!($($fmt)*), file!(), line!(), $crate::NegativeI8::MIN)
    };
}

/// Returns early with `Err(zerror!(..))`.
#[macro_export]
macro_rules! bail {
    ($($t:tt)*) => {
        return Err($crate::zerror!($($t)*).into())
    };
}
