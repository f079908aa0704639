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

//! Configuration value objects used by `ClientBuilder`.

use core::time::Duration;

use crate::error::{ErrorKind, HttpClientError};

/// An optional duration limit.
///
/// `Timeout::none()` disables the limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Timeout(Option<Duration>);

impl Timeout {
    /// Creates a `Timeout` without a limit.
    pub fn none() -> Self {
        Self(None)
    }

    /// Creates a `Timeout` of the given number of seconds.
    pub fn from_secs(secs: u64) -> Self {
        Self(Some(Duration::from_secs(secs)))
    }

    /// Creates a `Timeout` of the given number of milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(Some(Duration::from_millis(millis)))
    }

    pub(crate) fn inner(&self) -> Option<Duration> {
        self.0
    }
}

const MAX_RETRIES: usize = 3;

/// A transparent re-send count for whole requests.
///
/// A retried request is re-sent from the start; only requests whose body
/// can be replayed are eligible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Retry(Option<usize>);

impl Retry {
    /// Creates a `Retry` that never re-sends.
    pub fn none() -> Self {
        Self(None)
    }

    /// Creates a `Retry` with the maximum supported count.
    pub fn max() -> Self {
        Self(Some(MAX_RETRIES))
    }

    /// Creates a `Retry` of `times` re-sends. Returns `Err` if `times` is
    /// zero or exceeds the supported maximum.
    pub fn new(times: usize) -> Result<Self, HttpClientError> {
        if times == 0 || times > MAX_RETRIES {
            return Err(HttpClientError::new_with_message(
                ErrorKind::Build,
                "Invalid retry times",
            ));
        }
        Ok(Self(Some(times)))
    }

    pub(crate) fn times(&self) -> Option<usize> {
        self.0
    }
}

/// Settings shared by every request a `Client` sends.
#[derive(Clone)]
pub(crate) struct ClientConfig {
    pub(crate) request_timeout: Timeout,
    pub(crate) connect_timeout: Timeout,
    pub(crate) retry: Retry,
    pub(crate) max_idle_per_host: usize,
}

impl ClientConfig {
    pub(crate) fn new() -> Self {
        Self {
            request_timeout: Timeout::none(),
            connect_timeout: Timeout::none(),
            retry: Retry::none(),
            max_idle_per_host: 6,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod ut_settings {
    use super::{Retry, Timeout};

    /// UT test cases for `Timeout` constructors.
    ///
    /// # Brief
    /// 1. Builds timeouts with and without limits.
    /// 2. Checks the wrapped durations.
    #[test]
    fn ut_settings_timeout() {
        assert_eq!(Timeout::none().inner(), None);
        assert_eq!(
            Timeout::from_secs(9).inner(),
            Some(core::time::Duration::from_secs(9))
        );
        assert_eq!(
            Timeout::from_millis(300).inner(),
            Some(core::time::Duration::from_millis(300))
        );
    }

    /// UT test cases for `Retry` constructors.
    ///
    /// # Brief
    /// 1. Builds retry counts at and outside the supported bounds.
    /// 2. Checks acceptance and rejection.
    #[test]
    fn ut_settings_retry() {
        assert_eq!(Retry::none().times(), None);
        assert_eq!(Retry::max().times(), Some(3));
        assert_eq!(Retry::new(1).unwrap().times(), Some(1));
        assert!(Retry::new(0).is_err());
        assert!(Retry::new(4).is_err());
    }
}
