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

//! C bindings over keyspace's key expressions, selectors and parameters.
//!
//! Values cross the boundary as opaque boxed handles which must be released with the matching
//! `ks_*_free` function. Fallible functions return `0` on success and a negative error number
//! otherwise, writing their result through an out-pointer. Strings returned to C are
//! NUL-terminated and must be released with [`ks_string_free`].
use std::{
    convert::TryFrom,
    ffi::{CStr, CString},
    ptr,
};

use keyspace::{
    bail,
    key_expr::{OwnedKeyExpr, SetIntersectionLevel},
    parameters::Parameters,
    selector::Selector,
    ErrNo, LogRecord, ZResult,
};
use libc::{c_char, c_int, c_void};

/// Returned when a pointer argument is null or a string isn't valid UTF-8.
pub const KS_EINVAL: c_int = i8::MIN as c_int;

#[no_mangle]
pub static KS_DISJOINT: c_int = SetIntersectionLevel::Disjoint as c_int;
#[no_mangle]
pub static KS_INTERSECTS: c_int = SetIntersectionLevel::Intersects as c_int;
#[no_mangle]
pub static KS_INCLUDES: c_int = SetIntersectionLevel::Includes as c_int;
#[no_mangle]
pub static KS_EQUALS: c_int = SetIntersectionLevel::Equals as c_int;

pub struct KsKeyExpr(OwnedKeyExpr);

pub struct KsSelector(Selector<'static>);

pub struct KsParameters(Parameters<'static>);

unsafe fn to_str<'a>(s: *const c_char) -> ZResult<&'a str> {
    if s.is_null() {
        bail!("Null string")
    }
    Ok(CStr::from_ptr(s).to_str()?)
}

fn to_c_string(op: &str, s: String) -> *mut c_char {
    match CString::new(s) {
        Ok(s) => s.into_raw(),
        Err(e) => {
            tracing::error!("{op}: {e}");
            ptr::null_mut()
        }
    }
}

/// Boxes `result` into `out`, or logs the error and returns its error number.
unsafe fn emit<T>(op: &str, result: ZResult<T>, out: *mut *mut T) -> c_int {
    if out.is_null() {
        tracing::error!("{op}: null output pointer");
        return KS_EINVAL;
    }
    match result {
        Ok(value) => {
            *out = Box::into_raw(Box::new(value));
            0
        }
        Err(e) => {
            tracing::error!("{op}: {e}");
            *out = ptr::null_mut();
            e.errno().get() as c_int
        }
    }
}

unsafe fn pair<'a>(
    op: &str,
    left: *const KsKeyExpr,
    right: *const KsKeyExpr,
) -> Option<(&'a KsKeyExpr, &'a KsKeyExpr)> {
    match (left.as_ref(), right.as_ref()) {
        (Some(l), Some(r)) => Some((l, r)),
        _ => {
            tracing::error!("{op}: null key expression");
            None
        }
    }
}

/// Initializes logging from the `RUST_LOG` environment variable, if it is set.
#[no_mangle]
pub extern "C" fn ks_init_log_from_env() {
    keyspace::try_init_log_from_env();
}

/// Receives the level (`1` for errors up to `5` for traces), the target, the message with the
/// event's fields appended as `name=value`, and the context given at installation.
/// The strings are only valid during the call.
pub type KsLogCallback = extern "C" fn(
    level: c_int,
    target: *const c_char,
    message: *const c_char,
    context: *mut c_void,
);

struct LogContext(*mut c_void);

// The host owns the context and promised it may be used from any thread.
unsafe impl Send for LogContext {}
unsafe impl Sync for LogContext {}

impl LogContext {
    fn get(&self) -> *mut c_void {
        self.0
    }
}

fn level_number(level: &tracing::Level) -> c_int {
    match *level {
        tracing::Level::ERROR => 1,
        tracing::Level::WARN => 2,
        tracing::Level::INFO => 3,
        tracing::Level::DEBUG => 4,
        tracing::Level::TRACE => 5,
    }
}

fn log_line(record: &LogRecord) -> String {
    let mut line = record.message.clone();
    for (name, value) in &record.fields {
        line.push_str(&format!(" {name}={value}"));
    }
    line
}

/// Forwards every event up to `max_level` (same numbering as [`KsLogCallback`]) to `callback`.
/// Returns [`KS_EINVAL`] if `callback` is null or `max_level` is out of range. Has no effect if
/// logging was already initialized.
///
/// # Safety
/// `context` must stay valid, and usable from any thread, for the rest of the process.
#[no_mangle]
pub unsafe extern "C" fn ks_init_log_with_callback(
    max_level: c_int,
    callback: Option<KsLogCallback>,
    context: *mut c_void,
) -> c_int {
    let Some(callback) = callback else {
        return KS_EINVAL;
    };
    if !(1..=5).contains(&max_level) {
        return KS_EINVAL;
    }
    let context = LogContext(context);
    keyspace::init_log_with_callback(
        move |metadata| level_number(metadata.level()) <= max_level,
        move |record| {
            let target = CString::new(record.target.replace('\0', "")).unwrap_or_default();
            let message = CString::new(log_line(&record).replace('\0', "")).unwrap_or_default();
            callback(
                level_number(&record.level),
                target.as_ptr(),
                message.as_ptr(),
                context.get(),
            );
        },
    );
    0
}

/// Validates `s` as a canon key expression.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated string, `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_try_from(s: *const c_char, out: *mut *mut KsKeyExpr) -> c_int {
    let result = to_str(s).and_then(|s| OwnedKeyExpr::try_from(s).map(KsKeyExpr));
    emit("ks_keyexpr_try_from", result, out)
}

/// Canonizes `s`, then validates it as a key expression.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated string, `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_autocanonize(
    s: *const c_char,
    out: *mut *mut KsKeyExpr,
) -> c_int {
    let result =
        to_str(s).and_then(|s| OwnedKeyExpr::autocanonize(s.to_owned()).map(KsKeyExpr));
    emit("ks_keyexpr_autocanonize", result, out)
}

/// Returns `1` if both key expressions intersect, `0` if they don't, a negative error number if either is null.
///
/// # Safety
/// Both pointers must be null or handles returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_intersects(
    left: *const KsKeyExpr,
    right: *const KsKeyExpr,
) -> c_int {
    match pair("ks_keyexpr_intersects", left, right) {
        Some((l, r)) => l.0.intersects(&r.0) as c_int,
        None => KS_EINVAL,
    }
}

/// Returns `1` if `left` includes `right`, `0` if it doesn't, a negative error number if either is null.
///
/// # Safety
/// Both pointers must be null or handles returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_includes(
    left: *const KsKeyExpr,
    right: *const KsKeyExpr,
) -> c_int {
    match pair("ks_keyexpr_includes", left, right) {
        Some((l, r)) => l.0.includes(&r.0) as c_int,
        None => KS_EINVAL,
    }
}

/// Returns one of `KS_DISJOINT`, `KS_INTERSECTS`, `KS_INCLUDES` or `KS_EQUALS`,
/// or a negative error number if either key expression is null.
///
/// # Safety
/// Both pointers must be null or handles returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_relation_to(
    left: *const KsKeyExpr,
    right: *const KsKeyExpr,
) -> c_int {
    match pair("ks_keyexpr_relation_to", left, right) {
        Some((l, r)) => l.0.relation_to(&r.0) as c_int,
        None => KS_EINVAL,
    }
}

/// Joins `suffix` to `ke` with a `/`, canonizing the result.
///
/// # Safety
/// `ke` must be null or a handle returned by this library, `suffix` null or a valid NUL-terminated
/// string, `out` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_join(
    ke: *const KsKeyExpr,
    suffix: *const c_char,
    out: *mut *mut KsKeyExpr,
) -> c_int {
    let result = match ke.as_ref() {
        Some(ke) => to_str(suffix).and_then(|suffix| ke.0.join(suffix).map(KsKeyExpr)),
        None => Err("Null key expression".into()),
    };
    emit("ks_keyexpr_join", result, out)
}

/// Returns a copy of the key expression's string, or null if `ke` is null.
///
/// # Safety
/// `ke` must be null or a handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_to_string(ke: *const KsKeyExpr) -> *mut c_char {
    match ke.as_ref() {
        Some(ke) => to_c_string("ks_keyexpr_to_string", ke.0.to_string()),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `ke` must be null or a handle returned by this library, not freed yet.
#[no_mangle]
pub unsafe extern "C" fn ks_keyexpr_free(ke: *mut KsKeyExpr) {
    if !ke.is_null() {
        drop(Box::from_raw(ke));
    }
}

/// Parses `s` as `key_expr?parameters`.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated string, `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_selector_try_from(
    s: *const c_char,
    out: *mut *mut KsSelector,
) -> c_int {
    let result = to_str(s).and_then(|s| Selector::try_from(s.to_owned()).map(KsSelector));
    emit("ks_selector_try_from", result, out)
}

/// Writes a new handle on the selector's key expression into `out`.
///
/// # Safety
/// `selector` must be null or a handle returned by this library, `out` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_selector_key_expr(
    selector: *const KsSelector,
    out: *mut *mut KsKeyExpr,
) -> c_int {
    let result = match selector.as_ref() {
        Some(selector) => Ok(KsKeyExpr(selector.0.key_expr().clone().into())),
        None => Err("Null selector".into()),
    };
    emit("ks_selector_key_expr", result, out)
}

/// Writes a new handle on the selector's parameters into `out`.
///
/// # Safety
/// `selector` must be null or a handle returned by this library, `out` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_selector_parameters(
    selector: *const KsSelector,
    out: *mut *mut KsParameters,
) -> c_int {
    let result = match selector.as_ref() {
        Some(selector) => Ok(KsParameters(selector.0.parameters().clone())),
        None => Err("Null selector".into()),
    };
    emit("ks_selector_parameters", result, out)
}

/// # Safety
/// `selector` must be null or a handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ks_selector_to_string(selector: *const KsSelector) -> *mut c_char {
    match selector.as_ref() {
        Some(selector) => to_c_string("ks_selector_to_string", selector.0.to_string()),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `selector` must be null or a handle returned by this library, not freed yet.
#[no_mangle]
pub unsafe extern "C" fn ks_selector_free(selector: *mut KsSelector) {
    if !selector.is_null() {
        drop(Box::from_raw(selector));
    }
}

/// Parses `s` as `name=value;name=value`.
///
/// # Safety
/// `s` must be null or a valid NUL-terminated string, `out` must be null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_parameters_try_from(
    s: *const c_char,
    out: *mut *mut KsParameters,
) -> c_int {
    let result = to_str(s).and_then(|s| Parameters::try_from(s.to_owned()).map(KsParameters));
    emit("ks_parameters_try_from", result, out)
}

/// Looks `key` up. Returns `1` and writes a copy of the value into `out` if it is present,
/// `0` if it isn't, and a negative error number on invalid arguments.
///
/// # Safety
/// `parameters` must be null or a handle returned by this library, `key` null or a valid
/// NUL-terminated string, `out` null or valid for writes.
#[no_mangle]
pub unsafe extern "C" fn ks_parameters_get(
    parameters: *const KsParameters,
    key: *const c_char,
    out: *mut *mut c_char,
) -> c_int {
    let (Some(parameters), Ok(key), false) = (parameters.as_ref(), to_str(key), out.is_null())
    else {
        tracing::error!("ks_parameters_get: invalid arguments");
        return KS_EINVAL;
    };
    match parameters.0.get(key) {
        Some(value) => {
            *out = to_c_string("ks_parameters_get", value.to_owned());
            1
        }
        None => {
            *out = ptr::null_mut();
            0
        }
    }
}

/// # Safety
/// `parameters` must be null or a handle returned by this library.
#[no_mangle]
pub unsafe extern "C" fn ks_parameters_to_string(parameters: *const KsParameters) -> *mut c_char {
    match parameters.as_ref() {
        Some(parameters) => to_c_string("ks_parameters_to_string", parameters.0.to_string()),
        None => ptr::null_mut(),
    }
}

/// # Safety
/// `parameters` must be null or a handle returned by this library, not freed yet.
#[no_mangle]
pub unsafe extern "C" fn ks_parameters_free(parameters: *mut KsParameters) {
    if !parameters.is_null() {
        drop(Box::from_raw(parameters));
    }
}

/// Releases a string returned by this library.
///
/// # Safety
/// `s` must be null or a string returned by this library, not freed yet.
#[no_mangle]
pub unsafe extern "C" fn ks_string_free(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
