// Copyright (c) 2024 The Strand Project Authors.
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Connection pooling.
//!
//! Connections are grouped by scheme and authority. Each group holds the
//! dispatchers of its live connections; leasing sweeps out condemned ones
//! first, so a connection that was marked shut down is never handed out
//! again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use strand_http::request::uri::{Scheme, Uri};

use crate::util::dispatcher::{Conn, ConnDispatcher};

/// Identity of a connection group: scheme plus `host:port`.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub(crate) struct PoolKey(Scheme, String);

impl PoolKey {
    /// Builds the key of `uri`. The URI must be normalized so the authority
    /// carries an explicit port.
    pub(crate) fn new(uri: &Uri) -> Option<Self> {
        let scheme = *uri.scheme()?;
        let authority = uri.authority()?;
        Some(Self(scheme, authority.to_string()))
    }
}

pub(crate) struct ConnPool<S> {
    pool: Arc<Mutex<HashMap<PoolKey, Conns<S>>>>,
    max_idle_per_host: usize,
}

impl<S> ConnPool<S> {
    pub(crate) fn new(max_idle_per_host: usize) -> Self {
        Self {
            pool: Arc::new(Mutex::new(HashMap::new())),
            max_idle_per_host,
        }
    }

    /// Gets the connection group of `key`, creating it if absent.
    pub(crate) fn get(&self, key: PoolKey) -> Conns<S> {
        let mut pool = self.pool.lock().unwrap();
        pool.entry(key)
            .or_insert_with(|| Conns::new(self.max_idle_per_host))
            .clone()
    }
}

pub(crate) struct Conns<S> {
    list: Arc<Mutex<Vec<ConnDispatcher<S>>>>,
    max_idle: usize,
}

impl<S> Clone for Conns<S> {
    fn clone(&self) -> Self {
        Self {
            list: self.list.clone(),
            max_idle: self.max_idle,
        }
    }
}

impl<S> Conns<S> {
    fn new(max_idle: usize) -> Self {
        Self {
            list: Arc::new(Mutex::new(Vec::new())),
            max_idle,
        }
    }

    /// Leases an existing connection, sweeping out condemned ones first.
    pub(crate) fn exist_conn(&self) -> Option<Conn<S>> {
        let mut list = self.list.lock().unwrap();
        list.retain(|dispatcher| !dispatcher.is_shutdown());
        list.iter().find_map(|dispatcher| dispatcher.dispatch())
    }

    /// Adds a new connection to the group, evicting idle ones past the
    /// per-group cap.
    pub(crate) fn insert(&self, dispatcher: ConnDispatcher<S>) {
        let mut list = self.list.lock().unwrap();
        list.retain(|dispatcher| !dispatcher.is_shutdown());
        while idle_count(&list) >= self.max_idle {
            let Some(pos) = list.iter().position(|d| !d.is_occupied()) else {
                break;
            };
            list.remove(pos);
        }
        list.push(dispatcher);
    }
}

fn idle_count<S>(list: &[ConnDispatcher<S>]) -> usize {
    list.iter().filter(|d| !d.is_occupied()).count()
}
