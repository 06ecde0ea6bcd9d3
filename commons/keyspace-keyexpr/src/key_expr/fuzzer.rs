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
//! Random canon key expressions for property tests.
use super::OwnedKeyExpr;
use rand::{distributions::Uniform, Rng};

const MAX_CHUNKS: usize = 6;

/// Letters, with a `$*` between some of them. Never empty, never a lone `$*`.
fn word(rng: &mut impl Rng, out: &mut String) {
    let letters = Uniform::from(b'a'..=b'b');
    let pieces = rng.gen_range(1..=3);
    for piece in 0..pieces {
        if piece > 0 || rng.gen_bool(0.15) {
            out.push_str("$*");
        }
        out.push(rng.sample(letters) as char);
    }
    if rng.gen_bool(0.15) {
        out.push_str("$*");
    }
}

fn expression(rng: &mut impl Rng) -> String {
    let mut out = String::new();
    for i in 0..rng.gen_range(1..=MAX_CHUNKS) {
        if i > 0 {
            out.push('/');
        }
        match rng.gen_range(0u8..8) {
            0 | 1 => out.push('*'),
            2 => out.push_str("**"),
            _ => word(rng, &mut out),
        }
    }
    out
}

/// An endless iterator of random canon key expressions.
///
/// Chunks are drawn from a two-letter alphabet so that random pairs regularly intersect.
pub struct KeyExprFuzzer<R: Rng>(pub R);

impl<R: Rng> Iterator for KeyExprFuzzer<R> {
    type Item = OwnedKeyExpr;
    fn next(&mut self) -> Option<OwnedKeyExpr> {
        loop {
            if let Ok(ke) = OwnedKeyExpr::autocanonize(expression(&mut self.0)) {
                return Some(ke);
            }
        }
    }
}

#[test]
fn yields_canon_expressions() {
    use rand::SeedableRng;
    let rng = rand::rngs::StdRng::seed_from_u64(7);
    for ke in KeyExprFuzzer(rng).take(500) {
        let mut again = ke.to_string();
        super::canon::Canonize::canonize(&mut again);
        assert_eq!(ke.as_str(), again);
        assert!(!ke.contains("$*$*"));
    }
}
