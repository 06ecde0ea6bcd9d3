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
use criterion::{criterion_group, criterion_main, Criterion};

use keyspace_keyexpr::{
    intersect::{ClassicIntersector, Intersector, DEFAULT_INTERSECTOR},
    keyexpr, OwnedKeyExpr,
};
use rand::SeedableRng;

fn run_intersections<const N: usize>(pool: [(&keyexpr, &keyexpr); N]) {
    for (l, r) in pool {
        l.intersects(r);
    }
}

fn run_inclusions<const N: usize>(pool: [(&keyexpr, &keyexpr); N]) {
    for (l, r) in pool {
        l.includes(r);
    }
}

fn double_wild_chain(n: usize, last: &str) -> OwnedKeyExpr {
    let mut ke = String::new();
    for _ in 0..n {
        ke.push_str("**/a/");
    }
    ke.push_str(last);
    OwnedKeyExpr::new(ke).unwrap()
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("bench_key_expr_same_str_with_seps", |b| {
        let data = [(
            "a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a",
            "a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a",
        )]
        .map(|(l, r)| (keyexpr::new(l).unwrap(), keyexpr::new(r).unwrap()));
        b.iter(|| run_intersections(data))
    });
    c.bench_function("bench_key_expr_double_star", |b| {
        let data = [(
            "**",
            "a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a/a",
        )]
        .map(|(l, r)| (keyexpr::new(l).unwrap(), keyexpr::new(r).unwrap()));
        b.iter(|| run_intersections(data))
    });
    c.bench_function("bench_key_expr_many_exprs", |b| {
        let data = [
            ("a", "a"),
            ("a/b", "a/b"),
            ("*", "abc"),
            ("ab$*", "abcd"),
            ("ab$*d", "abcd"),
            ("a/*/c/*/e", "a/b/c/d/e"),
            ("a/$*b/c/$*d/e", "a/xb/c/xd/e"),
            ("ab$*cd", "abxxcxxcd"),
            ("**", "a/b/c"),
            ("a/**", "a"),
            ("**/xyz", "a/b/xyz/d/e/f/xyz"),
            ("**/xyz$*xyz", "a/b/xyz/d/e/f/xyz"),
            ("a/**/c/**/e", "a/b/b/b/c/d/d/d/e"),
            ("a/**/c/*/e/*", "a/b/b/b/c/d/d/c/d/e/f"),
            ("x/a$*d$*e", "x/a$*c$*e"),
            ("x/$*d", "x/$*e"),
        ]
        .map(|(l, r)| (keyexpr::new(l).unwrap(), keyexpr::new(r).unwrap()));
        b.iter(|| run_intersections(data));
    });
    c.bench_function("bench_key_expr_many_exprs_includes", |b| {
        let data = [
            ("*", "abc"),
            ("ab$*", "abcd"),
            ("a/*/c/*/e", "a/b/c/d/e"),
            ("ab$*cd", "abxxcxxcd"),
            ("**", "a/b/c"),
            ("**/xyz", "a/b/xyz/d/e/f/xyz"),
            ("a/**/c/**/e", "a/b/b/b/c/d/d/d/e"),
            ("x/a$*e", "x/a$*d$*e"),
            ("x/$*c$*", "x/abc$*"),
        ]
        .map(|(l, r)| (keyexpr::new(l).unwrap(), keyexpr::new(r).unwrap()));
        b.iter(|| run_inclusions(data));
    });
    for n in [4, 8, 10] {
        let left = double_wild_chain(n, "c");
        let right = double_wild_chain(n, "d");
        c.bench_function(&format!("bench_double_wild_chain_{n}_table"), |b| {
            b.iter(|| DEFAULT_INTERSECTOR.intersect(&*left, &*right))
        });
        c.bench_function(&format!("bench_double_wild_chain_{n}_classic"), |b| {
            b.iter(|| ClassicIntersector.intersect(&*left, &*right))
        });
        c.bench_function(&format!("bench_double_wild_chain_{n}_includes"), |b| {
            b.iter(|| left.includes(&right))
        });
    }
    c.bench_function("bench_keyexpr_matching", |b| {
        use rand::Rng;
        let sites = (1..10).map(|n| format!("site_{}", n)).collect::<Vec<_>>();
        let robots = (1..10).map(|n| format!("robot_{}", n)).collect::<Vec<_>>();
        let sensors = ["temperature", "battery", "position"];
        let mut all_existing = Vec::new();
        for site in &sites {
            for robot in &robots {
                for sensor in sensors {
                    all_existing.push(
                        OwnedKeyExpr::new(format!("{}/{}/{}", site, robot, sensor)).unwrap(),
                    );
                }
            }
        }
        let mut rng = rand::rngs::StdRng::from_seed([32; 32]);
        let mut routes: Vec<OwnedKeyExpr> = ["**", "*/**", "**/site_1/**", "**/battery"]
            .into_iter()
            .map(|s| OwnedKeyExpr::new(s).unwrap())
            .collect();
        for _ in 0..100 {
            let selected = &all_existing[rng.gen_range(0..all_existing.len())];
            routes.push(selected.clone());
            routes.push(selected.join("**").unwrap());
        }
        b.iter(|| {
            for route in &all_existing {
                routes.iter().filter(|r| r.intersects(route)).count();
            }
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
