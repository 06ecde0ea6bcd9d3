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
use std::convert::TryFrom;

use keyspace::key_expr::{keyexpr, KeyExpr, OwnedKeyExpr, SetIntersectionLevel};
use keyspace_keyexpr::fuzzer::KeyExprFuzzer;
use rand::SeedableRng;

fn ke(s: &str) -> KeyExpr<'_> {
    KeyExpr::try_from(s).unwrap()
}

#[test]
fn validation() {
    assert!(KeyExpr::try_from("example/*/test").is_ok());
    assert!(KeyExpr::try_from("example/!*/test").is_err());
    assert!(KeyExpr::try_from("example/**/**/test").is_err());
    assert!(KeyExpr::try_from("").is_err());
    assert!(KeyExpr::try_from("a//b").is_err());
}

#[test]
fn autocanonize_merges_double_wilds() {
    assert_eq!(
        KeyExpr::autocanonize("example/**/test").unwrap(),
        KeyExpr::autocanonize("example/**/**/test").unwrap()
    );
    assert_eq!(
        KeyExpr::autocanonize("a/**/*/$*/b").unwrap().as_str(),
        "a/*/*/**/b"
    );
}

#[test]
fn relations() {
    assert!(ke("example/*/test").intersects(&ke("example/B/test")));
    assert!(!ke("example/*/test").intersects(&ke("example/B/C/test")));
    assert!(ke("example/**").includes(&ke("example/A/B/C/D")));
    assert!(!ke("example/**").includes(&ke("C/D")));

    assert_eq!(
        ke("a/b").relation_to(&ke("a/b")),
        SetIntersectionLevel::Equals
    );
    assert_eq!(
        ke("a/**").relation_to(&ke("a/*/c")),
        SetIntersectionLevel::Includes
    );
    assert_eq!(
        ke("a/*/c").relation_to(&ke("a/**")),
        SetIntersectionLevel::Intersects
    );
    assert_eq!(
        ke("a/**").relation_to(&ke("b/**")),
        SetIntersectionLevel::Disjoint
    );
}

#[test]
fn join_and_concat() {
    let prefix = ke("some/prefix/**");
    assert_eq!(prefix.join("**/x").unwrap().as_str(), "some/prefix/**/x");
    assert_eq!((&prefix / keyexpr::new("x").unwrap()).as_str(), "some/prefix/**/x");
    assert!(prefix.concat("*").is_err());
    assert_eq!(ke("a/b").concat("c/d").unwrap().as_str(), "a/bc/d");
}

#[test]
fn conversions() {
    let owned: KeyExpr<'static> = "a/b/c".parse().unwrap();
    let borrowed = owned.borrowing_clone();
    assert_eq!(owned, borrowed);
    let o: OwnedKeyExpr = borrowed.into_owned().into();
    assert_eq!(String::from(KeyExpr::from(o)), "a/b/c");

    let json = serde_json::to_string(&owned).unwrap();
    assert_eq!(json, "\"a/b/c\"");
    assert!(serde_json::from_str::<KeyExpr>("\"a/**/**\"").is_err());
}

#[test]
fn set_relation_properties() {
    let rng = rand::rngs::StdRng::seed_from_u64(7);
    let exprs: Vec<OwnedKeyExpr> = KeyExprFuzzer(rng).take(300).collect();
    let all = keyexpr::new("**").unwrap();
    for a in &exprs {
        assert_eq!(a.relation_to(a), SetIntersectionLevel::Equals);
        assert!(all.includes(a) && all.intersects(a));
        let again = KeyExpr::autocanonize(a.to_string()).unwrap();
        assert_eq!(again.as_str(), a.as_str());
        for b in exprs.iter().take(60) {
            let level = a.relation_to(b);
            if level == SetIntersectionLevel::Equals {
                assert!(a.includes(b) && b.includes(a) && a.intersects(b));
            }
            if a.includes(b) {
                assert!(a.intersects(b), "{a} includes {b} but doesn't intersect it");
                assert!(level >= SetIntersectionLevel::Includes);
            }
            assert_eq!(a.intersects(b), b.intersects(a));
        }
    }
}
