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

//! Connection dispatching.
//!
//! A [`ConnDispatcher`] owns one transport stream and leases it to at most
//! one user at a time as a [`Conn`] handle. Dropping the handle returns the
//! lease; marking the handle shut down condemns the stream so the pool will
//! discard it instead of leasing it again.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) struct ConnDispatcher<S> {
    inner: Arc<Inner<S>>,
}

pub(crate) struct Inner<S> {
    io: UnsafeCell<S>,
    // `occupied` indicates that the connection is occupied. Only one user
    // can get the handle at the same time. Once the handle is fetched, the
    // flag position is true.
    occupied: AtomicBool,
    // `shutdown` indicates that the connection needs to be shut down.
    shutdown: AtomicBool,
}

unsafe impl<S> Sync for Inner<S> {}

impl<S> ConnDispatcher<S> {
    pub(crate) fn new(io: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                io: UnsafeCell::new(io),
                occupied: AtomicBool::new(false),
                shutdown: AtomicBool::new(false),
            }),
        }
    }

    /// Leases the stream. Returns `None` if another handle is live.
    pub(crate) fn dispatch(&self) -> Option<Conn<S>> {
        self.inner
            .occupied
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| Conn {
                inner: self.inner.clone(),
            })
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.inner.shutdown.load(Ordering::Relaxed)
    }

    pub(crate) fn is_occupied(&self) -> bool {
        self.inner.occupied.load(Ordering::Relaxed)
    }
}

impl<S> Clone for ConnDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Handle leased to a user for I/O operations.
pub(crate) struct Conn<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Conn<S> {
    pub(crate) fn raw_mut(&mut self) -> &mut S {
        // SAFETY: `occupied` guarantees only one handle exists at a time.
        unsafe { &mut *self.inner.io.get() }
    }

    pub(crate) fn shutdown(&self) {
        self.inner.shutdown.store(true, Ordering::Release);
    }
}

impl<S> Drop for Conn<S> {
    fn drop(&mut self) {
        self.inner.occupied.store(false, Ordering::Release)
    }
}

#[cfg(test)]
mod ut_dispatch {
    use super::ConnDispatcher;

    /// UT test cases for `ConnDispatcher` leasing.
    ///
    /// # Brief
    /// 1. Creates a `ConnDispatcher`.
    /// 2. Dispatches a handle and tries to dispatch a second one.
    /// 3. Drops the first handle and dispatches again.
    /// 4. Checks that at most one handle is live at a time.
    #[test]
    fn ut_dispatch_exclusive() {
        let dispatcher = ConnDispatcher::new(b"Data");
        assert!(!dispatcher.is_shutdown());
        assert!(!dispatcher.is_occupied());

        let conn = dispatcher.dispatch();
        assert!(conn.is_some());
        assert!(dispatcher.is_occupied());
        assert!(dispatcher.dispatch().is_none());

        drop(conn);
        assert!(!dispatcher.is_occupied());
        assert!(dispatcher.dispatch().is_some());
    }

    /// UT test cases for `Conn::shutdown`.
    ///
    /// # Brief
    /// 1. Dispatches a handle and marks it shut down.
    /// 2. Checks that the dispatcher observes the condemned state.
    #[test]
    fn ut_dispatch_shutdown() {
        let dispatcher = ConnDispatcher::new(b"Data");
        let conn = dispatcher.dispatch().unwrap();
        conn.shutdown();
        drop(conn);
        assert!(dispatcher.is_shutdown());
    }
}
