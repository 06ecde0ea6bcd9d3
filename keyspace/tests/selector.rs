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

use keyspace::{
    config::{Config, SelectorConfig},
    key_expr::KeyExpr,
    parameters::Parameters,
    selector::{EmptySelector, Selector},
    ErrNo,
};
use keyspace_keyexpr::fuzzer::KeyExprFuzzer;
use rand::SeedableRng;

#[test]
fn split_on_first_question_mark() {
    let selector = Selector::try_from("a/b/c?arg1=val1").unwrap();
    assert_eq!(selector.key_expr().as_str(), "a/b/c");
    assert_eq!(selector.parameters().as_str(), "arg1=val1");

    let selector = Selector::try_from("a/b/c").unwrap();
    assert!(selector.parameters().is_empty());
    assert_eq!(selector.to_string(), "a/b/c");

    let selector = Selector::try_from("a/*?q=what?;x").unwrap();
    assert_eq!(selector.parameters().get("q"), Some("what?"));
    assert_eq!(format!("{selector:?}"), "sel\"a/*?q=what?;x\"");
}

#[test]
fn empty_selector() {
    let e = Selector::try_from("").unwrap_err();
    assert_eq!(e.errno().get(), EmptySelector::ERRNO);
    assert!(e
        .downcast_ref::<keyspace_result::ZError>()
        .and_then(|z| z.downcast_ref::<EmptySelector>())
        .is_some());
}

#[test]
fn key_expr_part_is_canonized() {
    let selector = Selector::try_from("a/**/**/b?x=1").unwrap();
    assert_eq!(selector.to_string(), "a/**/b?x=1");

    let mut strict = SelectorConfig::default();
    strict.set_autocanonize(false);
    assert!(Selector::try_from_with("a/**/**/b?x=1", &strict).is_err());
    assert!(Selector::try_from_with("a/**/b?x=1", &strict).is_ok());

    assert!(Selector::try_from("a/#?x=1").is_err());
    assert!(Selector::try_from("a/b?x=1;x=2").is_err());
}

#[test]
fn selector_config_from_json5() {
    let config =
        Config::from_json5("{ parameters: { duplicates: 'last_wins' }, selector: { autocanonize: false } }")
            .unwrap();
    let selector = Selector::try_from_with("a/b?x=1;x=2", &config.selector()).unwrap();
    assert_eq!(selector.parameters().get("x"), Some("2"));
    assert!(Selector::try_from_with("a/**/**", &config.selector()).is_err());
}

#[test]
fn display_round_trips() {
    let rng = rand::rngs::StdRng::seed_from_u64(42);
    let params = ["", "a=1", "a=1;b", "x=y=z;list=1|2"];
    for (i, ke) in KeyExprFuzzer(rng).take(200).enumerate() {
        let parameters = Parameters::try_from(params[i % params.len()]).unwrap();
        let selector = Selector::from((KeyExpr::from(ke), parameters));
        let s = selector.to_string();
        let parsed: Selector<'static> = s.parse().unwrap();
        assert_eq!(parsed, selector);
        assert_eq!(parsed.to_string(), s);
    }
}
