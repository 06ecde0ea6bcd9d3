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
//! Key expressions: `/`-separated chunks where `*` stands for one chunk, `**` for any number of
//! chunks and `$*` for any substring of a chunk. See [`keyexpr`] for the full grammar.

// Grammar bytes.
pub(crate) const DELIMITER: u8 = b'/';
pub(crate) const SINGLE_WILD: u8 = b'*';
pub(crate) const DOUBLE_WILD: &[u8] = b"**";
pub(crate) const STAR_DSL: &[u8] = b"$*";
/// `$` is only allowed as the head of `$*`.
pub(crate) const FORBIDDEN_CHARS: [u8; 3] = [b'#', b'?', b'$'];

mod borrowed;
mod owned;
pub use borrowed::*;
pub use owned::OwnedKeyExpr;

pub mod canon;
pub mod include;
pub mod intersect;
mod utils;

#[cfg(feature = "fuzzer")]
pub mod fuzzer;
