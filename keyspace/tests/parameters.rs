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
use std::{collections::HashMap, convert::TryFrom};

use keyspace::{
    config::{Config, DuplicatePolicy},
    parameters::{self, Parameters, ParametersError},
};

#[test]
fn parse_and_print() {
    let p = Parameters::try_from("arg1=val1;flag;list=a|b|c;eq=x=y").unwrap();
    assert_eq!(p.get("arg1"), Some("val1"));
    assert_eq!(p.get("flag"), Some(""));
    assert_eq!(p.get("missing"), None);
    assert_eq!(p.values("list").collect::<Vec<_>>(), ["a", "b", "c"]);
    assert_eq!(p.get("eq"), Some("x=y"));
    assert_eq!(p.to_string(), "arg1=val1;flag;list=a|b|c;eq=x=y");

    let map: HashMap<&str, &str> = HashMap::from(&p);
    assert_eq!(map.len(), 4);
}

#[test]
fn duplicates_follow_config() {
    let e = Parameters::try_from("a=1;b=2;a=3").unwrap_err();
    assert_eq!(
        keyspace_result_downcast(&*e),
        Some(&ParametersError::DuplicateName("a".into()))
    );

    let config = Config::from_json5("{ parameters: { duplicates: 'last_wins' } }").unwrap();
    assert_eq!(config.parameters().duplicates(), DuplicatePolicy::LastWins);
    let p = Parameters::try_from_with("a=1;b=2;a=3", config.parameters()).unwrap();
    assert_eq!(p.as_str(), "a=3;b=2");
}

fn keyspace_result_downcast<'a>(
    e: &'a (dyn std::error::Error + Send + Sync + 'static),
) -> Option<&'a ParametersError> {
    e.downcast_ref::<keyspace_result::ZError>()
        .and_then(|z| z.downcast_ref::<ParametersError>())
}

#[test]
fn string_helpers() {
    let (s, old) = parameters::insert("a=1;b=2", "a", "3").unwrap();
    assert_eq!((s.as_str(), old), ("b=2;a=3", Some("1")));
    let (s, old) = parameters::remove("a=1;b=2", "b");
    assert_eq!((s.as_str(), old), ("a=1", Some("2")));
    assert_eq!(parameters::get("a=1;b", "b"), Some(""));
    assert_eq!(
        parameters::from_iter(parameters::join(
            parameters::iter("a=1;b=2"),
            parameters::iter("b=3;c")
        ))
        .unwrap(),
        "a=1;b=3;c"
    );
}

#[test]
fn built_parameters_reparse_to_themselves() {
    assert!(parameters::from_iter(vec![("a", "1;a=2")].into_iter()).is_err());
    assert!(parameters::insert("x=1", "y", "2;x=3").is_err());

    let e = Parameters::try_from_iter([("k=v", "w")]).unwrap_err();
    assert!(matches!(
        keyspace_result_downcast(&*e),
        Some(ParametersError::Separator { .. })
    ));

    let mut p = Parameters::try_from("x=1").unwrap();
    assert!(p.insert("y", "2;x=3").is_err());
    assert_eq!(p.insert("y", "2=3|4").unwrap(), None);
    let map = HashMap::from([("z", "")]);
    p.extend_from_iter(map.iter()).unwrap();
    assert_eq!(p.as_str(), "x=1;y=2=3|4;z");

    let reparsed = Parameters::try_from(p.to_string()).unwrap();
    assert_eq!(reparsed, p);
    assert_eq!(reparsed.get("y"), Some("2=3|4"));
    assert_eq!(reparsed.get("z"), Some(""));
}
