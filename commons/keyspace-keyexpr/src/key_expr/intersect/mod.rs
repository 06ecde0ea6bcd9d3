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
//! Intersection of key expressions.
//!
//! Matchers work on raw bytes through [`ChunkIntersector`]. Every such matcher is also an
//! [`Intersector`] over `&keyexpr`, which settles the trivial cases before reaching it:
//! identical expressions always intersect, and two distinct expressions without any `*` never do.
use super::{keyexpr, SINGLE_WILD};

mod chunk_table;
pub use chunk_table::ChunkTableIntersector;
mod classical;
pub use classical::ClassicIntersector;

pub const DEFAULT_INTERSECTOR: ChunkTableIntersector = ChunkTableIntersector;

pub trait Intersector<Left, Right> {
    /// Returns `true` if at least one key belongs to both `left` and `right`.
    fn intersect(&self, left: Left, right: Right) -> bool;
}

/// A byte-level matcher over two canon key expressions holding at least one wildcard between them.
///
/// `sub_wilds` is `false` when neither side contains `$*`, letting the matcher skip sub-chunk matching.
pub trait ChunkIntersector {
    fn intersect_chunks(&self, left: &[u8], right: &[u8], sub_wilds: bool) -> bool;
}

impl<T: ChunkIntersector> Intersector<&keyexpr, &keyexpr> for T {
    fn intersect(&self, left: &keyexpr, right: &keyexpr) -> bool {
        let (left, right) = (left.as_bytes(), right.as_bytes());
        if left == right {
            return true;
        }
        let wild = |ke: &[u8]| ke.contains(&SINGLE_WILD);
        if !wild(left) && !wild(right) {
            return false;
        }
        let sub_wilds = left.contains(&b'$') || right.contains(&b'$');
        self.intersect_chunks(left, right, sub_wilds)
    }
}
