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
/// The environment variable holding the path of the configuration file read by [`Config::from_env`](super::Config::from_env).
pub const ENV: &str = "KEYSPACE_CONFIG";

#[allow(non_upper_case_globals)]
pub mod parameters {
    use crate::DuplicatePolicy;
    pub const duplicates: DuplicatePolicy = DuplicatePolicy::Reject;
}

#[allow(non_upper_case_globals)]
pub mod selector {
    pub const autocanonize: bool = true;
}
