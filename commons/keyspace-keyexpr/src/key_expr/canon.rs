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
use super::{DELIMITER, DOUBLE_WILD, SINGLE_WILD, STAR_DSL};
use std::str;

/// Rewrites a string-like value into the canon form of the key expression it denotes.
///
/// Canonization never fixes an invalid expression: empty chunks and forbidden characters are kept,
/// so that validation still rejects them afterwards.
pub trait Canonize {
    fn canonize(&mut self);
}

const DOLLAR_STAR: &str = "$*";
const DOLLAR_STAR_TWICE: &str = "$*$*";

/// Collapses every run of contiguous `$*` into a single `$*`.
fn collapse_dollar_stars(s: &str) -> Option<String> {
    let first = s.find(DOLLAR_STAR_TWICE)?;
    let mut out = String::with_capacity(s.len());
    out.push_str(&s[..first]);
    let mut rest = &s[first..];
    while let Some(position) = rest.find(DOLLAR_STAR) {
        out.push_str(&rest[..position]);
        out.push_str(DOLLAR_STAR);
        rest = &rest[position..];
        while let Some(tail) = rest.strip_prefix(DOLLAR_STAR) {
            rest = tail;
        }
    }
    out.push_str(rest);
    Some(out)
}

struct ChunkWriter {
    out: String,
    first: bool,
}

impl ChunkWriter {
    fn write(&mut self, chunk: &[u8]) {
        if !self.first {
            self.out.push(DELIMITER as char);
        }
        self.first = false;
        // Chunks are only ever cut on ASCII `/`, so they remain valid UTF-8.
        self.out.push_str(unsafe { str::from_utf8_unchecked(chunk) });
    }
}

/// Applies the chunk-level rewrites: lone `$*` chunks become `*`, runs of `**` merge into one,
/// and `*` chunks following a `**` are moved in front of it.
fn rewrite_chunks(s: &str) -> String {
    let mut writer = ChunkWriter {
        out: String::with_capacity(s.len()),
        first: true,
    };
    let mut in_big_wild = false;
    for chunk in s.as_bytes().split(|c| *c == DELIMITER) {
        match chunk {
            DOUBLE_WILD => in_big_wild = true,
            [SINGLE_WILD] => writer.write(&[SINGLE_WILD]),
            _ if chunk == STAR_DSL => writer.write(&[SINGLE_WILD]),
            _ => {
                if in_big_wild {
                    writer.write(DOUBLE_WILD);
                    in_big_wild = false;
                }
                writer.write(chunk);
            }
        }
    }
    if in_big_wild {
        writer.write(DOUBLE_WILD);
    }
    writer.out
}

impl Canonize for String {
    fn canonize(&mut self) {
        let collapsed = collapse_dollar_stars(self);
        let source = collapsed.as_deref().unwrap_or(self.as_str());
        let canon = rewrite_chunks(source);
        if canon != *self {
            tracing::trace!("Canonized key expression `{}` into `{}`", self, canon);
            *self = canon;
        }
    }
}

#[test]
fn canonizer() {
    use super::OwnedKeyExpr;
    dbg!(OwnedKeyExpr::autocanonize(String::from("/a/b/")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("/a/b")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a//b")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/*$*")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/$**")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/**$*")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/*$**")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/*$***")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/**$**")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b/**$***")).unwrap_err());
    dbg!(OwnedKeyExpr::autocanonize(String::from("a/b#c")).unwrap_err());

    // Any contiguous sequence of $*s is replaced by a single $*
    let mut s = String::from("hello/foo$*$*/bar");
    s.canonize();
    assert_eq!(s, "hello/foo$*/bar");
    let mut s = String::from("hello/foo$*$*$*bar$*$*");
    s.canonize();
    assert_eq!(s, "hello/foo$*bar$*");

    // Any contiguous sequence of ** chunks is replaced by a single ** chunk
    let mut s = String::from("hello/**/**/bye");
    s.canonize();
    assert_eq!(s, "hello/**/bye");
    let mut s = String::from("**/**/**");
    s.canonize();
    assert_eq!(s, "**");

    // Any $* chunk is replaced by a * chunk
    let mut s = String::from("hello/$*/bye");
    s.canonize();
    assert_eq!(s, "hello/*/bye");
    let mut s = String::from("hello/$*$*/bye");
    s.canonize();
    assert_eq!(s, "hello/*/bye");
    let mut s = String::from("$*/hello/$*/bye");
    s.canonize();
    assert_eq!(s, "*/hello/*/bye");
    let mut s = String::from("$*$*$*/hello/$*/bye/$*");
    s.canonize();
    assert_eq!(s, "*/hello/*/bye/*");
    let mut s = String::from("$*$*$*/hello/$*$*/bye/$*$*");
    s.canonize();
    assert_eq!(s, "*/hello/*/bye/*");

    // **/* is replaced by */**
    let mut s = String::from("hello/**/*");
    s.canonize();
    assert_eq!(s, "hello/*/**");
    let mut s = String::from("**/*/**/$*/b");
    s.canonize();
    assert_eq!(s, "*/*/**/b");

    // Canon expressions are left untouched
    let mut s = String::from("a/*/**/b$*c");
    s.canonize();
    assert_eq!(s, "a/*/**/b$*c");
}
