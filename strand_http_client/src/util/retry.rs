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

//! Retry policies for resumable downloads.
//!
//! A policy is a pure decision function: given the number of attempts made
//! so far and the error that ended the last one, it either names the delay
//! before the next attempt or declines. A policy with `max_retries` of `K`
//! permits `K + 1` attempts in total.

use core::time::Duration;

use crate::error::{ErrorKind, HttpClientError};

/// A bounded backoff schedule for retrying failed transfers.
#[derive(Clone, Debug)]
pub struct RetryPolicy {
    backoff: Backoff,
    max_retries: u32,
    classifier: fn(&HttpClientError) -> bool,
}

#[derive(Clone, Debug)]
enum Backoff {
    /// The same delay before every retry.
    Fixed(Duration),

    /// A delay that doubles after each retry, up to a cap.
    Exponential { base: Duration, cap: Duration },
}

impl RetryPolicy {
    /// Creates a policy that waits `delay` before each of up to
    /// `max_retries` retries.
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self {
            backoff: Backoff::Fixed(delay),
            max_retries,
            classifier: is_retriable,
        }
    }

    /// Creates a policy whose delay starts at `base` and doubles after each
    /// retry, never exceeding `cap`.
    pub fn exponential(max_retries: u32, base: Duration, cap: Duration) -> Self {
        Self {
            backoff: Backoff::Exponential { base, cap },
            max_retries,
            classifier: is_retriable,
        }
    }

    /// Replaces the retriability classifier. The default treats connect
    /// failures, interrupted transfers and timeouts as retriable and
    /// everything else as final.
    pub fn with_classifier(mut self, classifier: fn(&HttpClientError) -> bool) -> Self {
        self.classifier = classifier;
        self
    }

    /// Gets the maximum number of retries.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Decides whether to retry after `attempts_made` attempts have failed,
    /// the last one with `error`. Returns the delay before the next attempt,
    /// or `None` to give up.
    pub fn check(&self, attempts_made: u32, error: &HttpClientError) -> Option<Duration> {
        if !(self.classifier)(error) {
            return None;
        }
        if attempts_made > self.max_retries {
            return None;
        }
        Some(self.delay(attempts_made))
    }

    fn delay(&self, attempts_made: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base, cap } => {
                let shift = attempts_made.saturating_sub(1).min(31);
                base.checked_mul(1u32 << shift).unwrap_or(cap).min(cap)
            }
        }
    }
}

/// Returns `true` for errors that a fresh attempt could plausibly cure:
/// connect failures, interrupted transfers and timeouts. Malformed
/// responses and user aborts are final.
pub(crate) fn is_retriable(error: &HttpClientError) -> bool {
    matches!(
        error.error_kind(),
        ErrorKind::Connect | ErrorKind::BodyTransfer | ErrorKind::Timeout
    )
}

#[cfg(test)]
mod ut_retry {
    use core::time::Duration;

    use super::RetryPolicy;
    use crate::error::{ErrorKind, HttpClientError};

    fn transfer_error() -> HttpClientError {
        HttpClientError::new_with_message(ErrorKind::BodyTransfer, "connection reset")
    }

    /// UT test cases for `RetryPolicy::check` attempt accounting.
    ///
    /// # Brief
    /// 1. Builds a fixed policy with two retries.
    /// 2. Checks the decision after each of three failed attempts.
    #[test]
    fn ut_retry_budget() {
        let policy = RetryPolicy::fixed(2, Duration::from_millis(10));
        let err = transfer_error();
        assert_eq!(policy.check(1, &err), Some(Duration::from_millis(10)));
        assert_eq!(policy.check(2, &err), Some(Duration::from_millis(10)));
        assert_eq!(policy.check(3, &err), None);
    }

    /// UT test cases for `RetryPolicy::check` with zero retries.
    ///
    /// # Brief
    /// 1. Builds a policy with no retry budget.
    /// 2. Checks that the first failure is final.
    #[test]
    fn ut_retry_zero_budget() {
        let policy = RetryPolicy::fixed(0, Duration::from_millis(10));
        assert_eq!(policy.check(1, &transfer_error()), None);
    }

    /// UT test cases for `RetryPolicy::check` error classification.
    ///
    /// # Brief
    /// 1. Submits retriable and non-retriable error kinds.
    /// 2. Checks that only retriable ones yield a delay.
    #[test]
    fn ut_retry_classification() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(10));
        let connect = HttpClientError::new_with_message(ErrorKind::Connect, "refused");
        let timeout = HttpClientError::new_with_message(ErrorKind::Timeout, "deadline");
        let decode = HttpClientError::new_with_message(ErrorKind::BodyDecode, "bad chunk");
        let aborted = HttpClientError::user_aborted();
        assert!(policy.check(1, &connect).is_some());
        assert!(policy.check(1, &timeout).is_some());
        assert!(policy.check(1, &decode).is_none());
        assert!(policy.check(1, &aborted).is_none());
    }

    /// UT test cases for a caller-supplied retriability classifier.
    ///
    /// # Brief
    /// 1. Replaces the default classifier with one that only retries
    ///    decode failures.
    /// 2. Checks that the custom classification overrides the default.
    #[test]
    fn ut_retry_custom_classifier() {
        let policy = RetryPolicy::fixed(5, Duration::from_millis(10))
            .with_classifier(|e| e.error_kind() == ErrorKind::BodyDecode);
        let decode = HttpClientError::new_with_message(ErrorKind::BodyDecode, "bad chunk");
        assert!(policy.check(1, &decode).is_some());
        assert!(policy.check(1, &transfer_error()).is_none());
    }

    /// UT test cases for the exponential backoff schedule.
    ///
    /// # Brief
    /// 1. Builds an exponential policy with a cap.
    /// 2. Checks the delay after successive failed attempts.
    #[test]
    fn ut_retry_exponential_delay() {
        let policy =
            RetryPolicy::exponential(10, Duration::from_millis(100), Duration::from_millis(350));
        let err = transfer_error();
        assert_eq!(policy.check(1, &err), Some(Duration::from_millis(100)));
        assert_eq!(policy.check(2, &err), Some(Duration::from_millis(200)));
        assert_eq!(policy.check(3, &err), Some(Duration::from_millis(350)));
        assert_eq!(policy.check(4, &err), Some(Duration::from_millis(350)));
    }
}
