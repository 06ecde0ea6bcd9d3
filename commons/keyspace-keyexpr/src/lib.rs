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
//! [`keyexpr`] and [`OwnedKeyExpr`] provide statically checked string types that hold canon key
//! expressions, together with the set relations between them:
//! [`intersects`](keyexpr::intersects), [`includes`](keyexpr::includes) and
//! [`relation_to`](keyexpr::relation_to).
pub mod key_expr;

pub use key_expr::*;
