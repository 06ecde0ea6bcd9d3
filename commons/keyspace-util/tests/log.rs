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
use std::sync::{Arc, Mutex};

use keyspace_util::{init_log_with_callback, LogRecord};

#[test]
fn callback_receives_events_and_span_fields() {
    let records: Arc<Mutex<Vec<LogRecord>>> = Arc::default();
    let sink = records.clone();
    init_log_with_callback(
        |metadata| *metadata.level() <= tracing::Level::DEBUG,
        move |record| sink.lock().unwrap().push(record),
    );

    let span = tracing::debug_span!("selector", raw = "a/b?x=1", length = tracing::field::Empty);
    span.record("length", 7);
    let _guard = span.enter();
    tracing::debug!(kind = "duplicate", errno = -9, "Rejected parameters");
    tracing::trace!("filtered out");
    drop(_guard);

    let records = records.lock().unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.level, tracing::Level::DEBUG);
    assert_eq!(record.message, "Rejected parameters");
    assert_eq!(record.target, module_path!());
    assert!(record.location.is_some());
    assert_eq!(record.field("raw"), Some("a/b?x=1"));
    assert_eq!(record.field("length"), Some("7"));
    assert_eq!(record.field("kind"), Some("duplicate"));
    assert_eq!(record.field("errno"), Some("-9"));
    assert_eq!(record.field("message"), None);
}
