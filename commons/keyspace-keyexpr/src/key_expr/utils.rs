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
use super::{DELIMITER, STAR_DSL};

/// Splits a key expression into its chunks.
pub(crate) fn chunks(ke: &[u8]) -> Vec<&[u8]> {
    ke.split(|c| *c == DELIMITER).collect()
}

/// A single element of a chunk, once `$*` has been singled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token {
    Star,
    Byte(u8),
}

/// Tokenizes a chunk, turning each `$*` into a [`Token::Star`].
pub(crate) fn tokens(chunk: &[u8]) -> Vec<Token> {
    let mut result = Vec::with_capacity(chunk.len());
    let mut rest = chunk;
    while let Some((&head, tail)) = rest.split_first() {
        if rest.starts_with(STAR_DSL) {
            result.push(Token::Star);
            rest = &rest[STAR_DSL.len()..];
        } else {
            result.push(Token::Byte(head));
            rest = tail;
        }
    }
    result
}

/// A `(rows + 1) x (cols + 1)` table of booleans, indexed by suffix positions.
///
/// Cell `(i, j)` answers the question for the suffixes starting at `i` and `j`.
pub(crate) struct Table {
    cols: usize,
    cells: Vec<bool>,
}

impl Table {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Table {
            cols: cols + 1,
            cells: vec![false; (rows + 1) * (cols + 1)],
        }
    }

    #[inline(always)]
    pub(crate) fn get(&self, i: usize, j: usize) -> bool {
        self.cells[i * self.cols + j]
    }

    #[inline(always)]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: bool) {
        self.cells[i * self.cols + j] = value;
    }
}

#[test]
fn tokenizer() {
    use Token::*;
    assert_eq!(tokens(b"a$*b"), [Byte(b'a'), Star, Byte(b'b')]);
    assert_eq!(tokens(b"$*x$*"), [Star, Byte(b'x'), Star]);
    assert!(tokens(b"").is_empty());
}
