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
use super::ChunkIntersector;
use crate::key_expr::{
    utils::{chunks, tokens, Table, Token},
    DOUBLE_WILD, SINGLE_WILD,
};

/// An intersector that fills a table over every pair of chunk suffixes.
///
/// Its cost is bounded by the product of both expressions' chunk counts (and, within chunks that use `$*`,
/// by the product of both chunks' lengths), whatever the arrangement of `**` in either expression.
pub struct ChunkTableIntersector;

/// Checks whether two sub-chunk patterns can both match a common chunk.
fn star_dsl_intersect(left: &[u8], right: &[u8]) -> bool {
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
                (_, Some(Token::Star)) => {
                    table.get(p, q + 1) || (p < x.len() && table.get(p + 1, q))
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

#[inline(always)]
fn chunk_intersect<const STAR_DSL: bool>(left: &[u8], right: &[u8]) -> bool {
    left == right
        || left == [SINGLE_WILD]
        || right == [SINGLE_WILD]
        || (STAR_DSL && star_dsl_intersect(left, right))
}

fn intersect<const STAR_DSL: bool>(left: &[u8], right: &[u8]) -> bool {
    let a = chunks(left);
    let b = chunks(right);
    let (n, m) = (a.len(), b.len());
    let mut table = Table::new(n, m);
    for i in (0..=n).rev() {
        for j in (0..=m).rev() {
            let value = match (a.get(i), b.get(j)) {
                (None, None) => true,
                (Some(&DOUBLE_WILD), _) => table.get(i + 1, j) || (j < m && table.get(i, j + 1)),
                (_, Some(&DOUBLE_WILD)) => table.get(i, j + 1) || (i < n && table.get(i + 1, j)),
                (Some(l), Some(r)) => {
                    table.get(i + 1, j + 1) && chunk_intersect::<STAR_DSL>(l, r)
                }
                _ => false,
            };
            table.set(i, j, value);
        }
    }
    table.get(0, 0)
}

impl ChunkIntersector for ChunkTableIntersector {
    fn intersect_chunks(&self, left: &[u8], right: &[u8], sub_wilds: bool) -> bool {
        if sub_wilds {
            intersect::<true>(left, right)
        } else {
            intersect::<false>(left, right)
        }
    }
}

#[test]
fn sub_chunk_patterns() {
    assert!(star_dsl_intersect(b"a$*", b"$*b"));
    assert!(star_dsl_intersect(b"a$*c", b"abc"));
    assert!(star_dsl_intersect(b"a$*c$*e", b"$*d$*"));
    assert!(!star_dsl_intersect(b"a$*", b"b$*"));
    assert!(!star_dsl_intersect(b"$*a", b"$*b"));
    assert!(!star_dsl_intersect(b"ab$*cd", b"abc"));
}
