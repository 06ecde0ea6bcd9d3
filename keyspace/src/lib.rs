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

//! Keyspace addresses data with *key expressions*: `/`-separated paths
//! that may contain wildcards and therefore stand for sets of keys.
//!
//! This crate gathers the address-space engine behind keyspace sessions:
//! - [`key_expr`]: validation, canonization and set relations between key expressions,
//! - [`parameters`]: the `name=value;name=value` strings attached to queries,
//! - [`selector`]: `key/expr?parameters` pairs.
//!
//! # Examples
//! ```
//! use keyspace::prelude::*;
//!
//! let subscriber = KeyExpr::autocanonize("robot/**/**/battery").unwrap();
//! assert_eq!(subscriber.as_str(), "robot/**/battery");
//!
//! let selector = Selector::try_from("robot/7/battery?unit=mV").unwrap();
//! assert!(subscriber.intersects(selector.key_expr()));
//! assert_eq!(selector.parameters().get("unit"), Some("mV"));
//! ```
#![warn(clippy::redundant_clone)]

mod api;

pub use keyspace_result::{bail, zerror, ErrNo, Error, ZError, ZResult};
pub use keyspace_util::{
    init_log_from_env_or, init_log_with_callback, try_init_log_from_env, LogRecord,
};

/// [Key expression](https://github.com/eclipse-zenoh/roadmap/blob/main/rfcs/ALL/Key%20Expressions.md) are Keyspace's address space.
///
/// A key expression is a `/`-separated list of non-empty chunks. Besides plain chunks, three
/// wildcards are available:
/// - `*` stands for exactly one chunk,
/// - `**` stands for any number of chunks, including none,
/// - `$*` stands for any (possibly empty) substring inside a single chunk.
///
/// Two key expressions defining the same set of keys are written the same way once canonized,
/// which is why [`KeyExpr::try_from`] only accepts canon expressions and [`KeyExpr::autocanonize`]
/// rewrites its input before validating it.
pub mod key_expr {
    pub use keyspace_keyexpr::{
        canon::Canonize, include::Includer, intersect::Intersector, keyexpr, InvalidKeyExpr,
        KeyExprConstructionError, OwnedKeyExpr, SetIntersectionLevel,
    };
    #[cfg(feature = "fuzzer")]
    pub use keyspace_keyexpr::fuzzer::KeyExprFuzzer;

    pub use crate::api::key_expr::KeyExpr;
}

/// Query parameters: an ordered list of `name=value` pairs separated by `;`.
pub mod parameters {
    pub use crate::api::parameters::{
        from_iter, get, insert, iter, join, remove, values, Parameters, ParametersError,
    };
}

/// Selectors combine a key expression and query parameters.
pub mod selector {
    pub use crate::api::selector::{EmptySelector, Selector};
}

/// Configuration of the parsers.
pub mod config {
    pub use keyspace_config::*;
}

pub mod prelude {
    pub use crate::{
        config::Config,
        key_expr::{keyexpr, KeyExpr, OwnedKeyExpr, SetIntersectionLevel},
        parameters::Parameters,
        selector::Selector,
    };
}
