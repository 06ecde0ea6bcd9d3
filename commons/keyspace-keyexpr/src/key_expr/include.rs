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
use super::{
    keyexpr,
    utils::{chunks, tokens, Table, Token},
    DOUBLE_WILD, SINGLE_WILD,
};

pub const DEFAULT_INCLUDER: ChunkTableIncluder = ChunkTableIncluder;

/// Inclusion between two sets of keys.
///
/// Byte-level includers get the `&keyexpr` version for free. It answers directly when both
/// sides are the same string, or when a different `left` has no wildcard to absorb `right`.
pub trait Includer<Left, Right> {
    /// `true` when every key matched by `right` is also matched by `left`.
    fn includes(&self, left: Left, right: Right) -> bool;
}

impl<T: for<'a> Includer<&'a [u8], &'a [u8]>> Includer<&keyexpr, &keyexpr> for T {
    fn includes(&self, left: &keyexpr, right: &keyexpr) -> bool {
        let left = left.as_bytes();
        let right = right.as_bytes();
        if left == right {
            return true;
        }
        if !left.contains(&SINGLE_WILD) {
            return false;
        }
        self.includes(left, right)
    }
}

/// An includer that fills a table over every pair of chunk suffixes, mirroring
/// [`ChunkTableIntersector`](super::intersect::ChunkTableIntersector).
pub struct ChunkTableIncluder;

impl Includer<&[u8], &[u8]> for ChunkTableIncluder {
    fn includes(&self, left: &[u8], right: &[u8]) -> bool {
        let a = chunks(left);
        let b = chunks(right);
        let (n, m) = (a.len(), b.len());
        let mut table = Table::new(n, m);
        for i in (0..=n).rev() {
            for j in (0..=m).rev() {
                let value = match (a.get(i), b.get(j)) {
                    (None, None) => true,
                    (Some(&DOUBLE_WILD), _) => {
                        table.get(i + 1, j) || (j < m && table.get(i, j + 1))
                    }
                    // only `**` may stand for a varying number of chunks
                    (Some(_), Some(&DOUBLE_WILD)) => false,
                    (Some(l), Some(r)) => table.get(i + 1, j + 1) && chunk_includes(l, r),
                    _ => false,
                };
                table.set(i, j, value);
            }
        }
        table.get(0, 0)
    }
}

fn chunk_includes(left: &[u8], right: &[u8]) -> bool {
    left == right
        || left == [SINGLE_WILD]
        || (right != [SINGLE_WILD] && left.contains(&b'$') && star_dsl_includes(left, right))
}

/// Checks whether every chunk matched by the `right` sub-chunk pattern is matched by the `left` one.
fn star_dsl_includes(left: &[u8], right: &[u8]) -> bool {
    let x = tokens(left);
    let y = tokens(right);
    let mut table = Table::new(x.len(), y.len());
    for p in (0..=x.len()).rev() {
        for q in (0..=y.len()).rev() {
            let value = match (x.get(p), y.get(q)) {
                (None, None) => true,
                (Some(Token::Star), _) => {
                    table.get(p + 1, q) || (q < y.len() && table.get(p, q + 1))
                }
                (Some(Token::Byte(l)), Some(Token::Byte(r))) => {
                    l == r && table.get(p + 1, q + 1)
                }
                _ => false,
            };
            table.set(p, q, value);
        }
    }
    table.get(0, 0)
}

#[test]
fn sub_chunk_inclusion() {
    assert!(star_dsl_includes(b"a$*", b"abc$*"));
    assert!(star_dsl_includes(b"$*c$*", b"abc$*"));
    assert!(!star_dsl_includes(b"abc$*", b"a$*"));
    assert!(!star_dsl_includes(b"a$*d$*e", b"a$*e"));
    assert!(star_dsl_includes(b"a$*e", b"a$*d$*e"));
}
