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
use std::{
    ffi::{CStr, CString},
    ptr,
};

use keyspace_ffi::*;

unsafe fn take_string(s: *mut libc::c_char) -> String {
    assert!(!s.is_null());
    let owned = CStr::from_ptr(s).to_str().unwrap().to_owned();
    ks_string_free(s);
    owned
}

unsafe fn keyexpr(s: &str) -> *mut KsKeyExpr {
    let s = CString::new(s).unwrap();
    let mut out = ptr::null_mut();
    assert_eq!(ks_keyexpr_try_from(s.as_ptr(), &mut out), 0);
    out
}

#[test]
fn keyexpr_lifecycle() {
    unsafe {
        let raw = CString::new("example/**/**/test").unwrap();
        let mut ke = ptr::null_mut();
        assert!(ks_keyexpr_try_from(raw.as_ptr(), &mut ke) < 0);
        assert!(ke.is_null());
        assert_eq!(ks_keyexpr_autocanonize(raw.as_ptr(), &mut ke), 0);
        assert_eq!(take_string(ks_keyexpr_to_string(ke)), "example/**/test");

        let concrete = keyexpr("example/A/B/test");
        assert_eq!(ks_keyexpr_intersects(ke, concrete), 1);
        assert_eq!(ks_keyexpr_includes(ke, concrete), 1);
        assert_eq!(ks_keyexpr_includes(concrete, ke), 0);
        assert_eq!(ks_keyexpr_relation_to(ke, concrete), KS_INCLUDES);
        assert_eq!(ks_keyexpr_relation_to(concrete, concrete), KS_EQUALS);
        assert_eq!(ks_keyexpr_intersects(ke, ptr::null()), KS_EINVAL);

        let suffix = CString::new("**/x").unwrap();
        let mut joined = ptr::null_mut();
        assert_eq!(ks_keyexpr_join(ke, suffix.as_ptr(), &mut joined), 0);
        assert_eq!(take_string(ks_keyexpr_to_string(joined)), "example/**/test/**/x");

        ks_keyexpr_free(joined);
        ks_keyexpr_free(concrete);
        ks_keyexpr_free(ke);
        ks_keyexpr_free(ptr::null_mut());
    }
}

#[test]
fn invalid_key_expr_reports_its_kind() {
    unsafe {
        let raw = CString::new("a/#").unwrap();
        let mut ke = ptr::null_mut();
        let status = ks_keyexpr_try_from(raw.as_ptr(), &mut ke);
        assert!(status < 0 && status != KS_EINVAL);
        assert_eq!(ks_keyexpr_try_from(ptr::null(), &mut ke), KS_EINVAL);
        assert_eq!(ks_keyexpr_try_from(raw.as_ptr(), ptr::null_mut()), KS_EINVAL);
    }
}

#[test]
fn selector_and_parameters() {
    unsafe {
        let raw = CString::new("a/b/c?arg1=val1;flag").unwrap();
        let mut selector = ptr::null_mut();
        assert_eq!(ks_selector_try_from(raw.as_ptr(), &mut selector), 0);
        assert_eq!(take_string(ks_selector_to_string(selector)), "a/b/c?arg1=val1;flag");

        let mut ke = ptr::null_mut();
        assert_eq!(ks_selector_key_expr(selector, &mut ke), 0);
        assert_eq!(take_string(ks_keyexpr_to_string(ke)), "a/b/c");

        let mut parameters = ptr::null_mut();
        assert_eq!(ks_selector_parameters(selector, &mut parameters), 0);
        let key = CString::new("arg1").unwrap();
        let mut value = ptr::null_mut();
        assert_eq!(ks_parameters_get(parameters, key.as_ptr(), &mut value), 1);
        assert_eq!(take_string(value), "val1");
        let key = CString::new("missing").unwrap();
        assert_eq!(ks_parameters_get(parameters, key.as_ptr(), &mut value), 0);
        assert!(value.is_null());
        assert_eq!(take_string(ks_parameters_to_string(parameters)), "arg1=val1;flag");

        ks_parameters_free(parameters);
        ks_keyexpr_free(ke);
        ks_selector_free(selector);

        let empty = CString::new("").unwrap();
        assert_eq!(ks_selector_try_from(empty.as_ptr(), &mut selector), -11);
        assert!(selector.is_null());

        let duplicated = CString::new("a=1;a=2").unwrap();
        assert_eq!(ks_parameters_try_from(duplicated.as_ptr(), &mut parameters), -9);
    }
}
