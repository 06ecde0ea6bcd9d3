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
use crate::key_expr::{DELIMITER, DOUBLE_WILD, SINGLE_WILD};

#[cold]
fn star_dsl_intersect(mut it1: &[u8], mut it2: &[u8]) -> bool {
    while let (Some((&current1, advanced1)), Some((&current2, advanced2))) =
        (it1.split_first(), it2.split_first())
    {
        match (current1, current2) {
            (b'$', b'$') => {
                if advanced1.len() == 1 || advanced2.len() == 1 {
                    return true;
                }
                return star_dsl_intersect(&advanced1[1..], it2)
                    || star_dsl_intersect(it1, &advanced2[1..]);
            }
            (b'$', _) => {
                if advanced1.len() == 1 {
                    return true;
                }
                if star_dsl_intersect(&advanced1[1..], it2) {
                    return true;
                }
                it2 = advanced2;
            }
            (_, b'$') => {
                if advanced2.len() == 1 {
                    return true;
                }
                if star_dsl_intersect(it1, &advanced2[1..]) {
                    return true;
                }
                it1 = advanced1;
            }
            (sub1, sub2) if sub1 == sub2 => {
                it1 = advanced1;
                it2 = advanced2;
            }
            (_, _) => return false,
        }
    }
    it1.is_empty() && it2.is_empty() || it1 == b"$*" || it2 == b"$*"
}

#[inline(always)]
fn chunk_intersect<const STAR_DSL: bool>(c1: &[u8], c2: &[u8]) -> bool {
    c1 == c2
        || c1 == [SINGLE_WILD]
        || c2 == [SINGLE_WILD]
        || (STAR_DSL && star_dsl_intersect(c1, c2))
}

#[inline(always)]
fn next(s: &[u8]) -> (&[u8], &[u8]) {
    match s.iter().position(|c| *c == DELIMITER) {
        Some(i) => (&s[..i], &s[(i + 1)..]),
        None => (s, b""),
    }
}

fn it_intersect<const STAR_DSL: bool>(mut it1: &[u8], mut it2: &[u8]) -> bool {
    while !it1.is_empty() && !it2.is_empty() {
        let (current1, advanced1) = next(it1);
        let (current2, advanced2) = next(it2);
        match (current1, current2) {
            (DOUBLE_WILD, _) => {
                if advanced1.is_empty() {
                    return true;
                }
                return it_intersect::<STAR_DSL>(it1, advanced2)
                    || it_intersect::<STAR_DSL>(advanced1, it2);
            }
            (_, DOUBLE_WILD) => {
                if advanced2.is_empty() {
                    return true;
                }
                return it_intersect::<STAR_DSL>(advanced1, it2)
                    || it_intersect::<STAR_DSL>(it1, advanced2);
            }
            (sub1, sub2) if chunk_intersect::<STAR_DSL>(sub1, sub2) => {
                it1 = advanced1;
                it2 = advanced2;
            }
            (_, _) => return false,
        }
    }
    (it1.is_empty() || it1 == DOUBLE_WILD) && (it2.is_empty() || it2 == DOUBLE_WILD)
}

/// The backtracking intersector: it walks both expressions chunk by chunk, branching on every `**`.
///
/// It is fast on typical expressions but degrades exponentially on long chains of `**`,
/// which is why [`DEFAULT_INTERSECTOR`](super::DEFAULT_INTERSECTOR) doesn't use it.
pub struct ClassicIntersector;

impl ChunkIntersector for ClassicIntersector {
    fn intersect_chunks(&self, left: &[u8], right: &[u8], sub_wilds: bool) -> bool {
        if sub_wilds {
            it_intersect::<true>(left, right)
        } else {
            it_intersect::<false>(left, right)
        }
    }
}
