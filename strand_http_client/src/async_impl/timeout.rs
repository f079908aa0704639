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

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::Sleep;

/// A future bounded by an optional deadline. The deadline winning the race
/// yields a `Timeout` error.
pub(crate) struct TimeoutFuture<T> {
    timeout: Option<Pin<Box<Sleep>>>,
    future: T,
}

impl<T> TimeoutFuture<T> {
    pub(crate) fn new(future: T, timeout: Option<Pin<Box<Sleep>>>) -> Self {
        Self { timeout, future }
    }
}

impl<T, O> Future for TimeoutFuture<T>
where
    T: Future<Output = Result<O, HttpClientError>> + Unpin,
{
    type Output = Result<O, HttpClientError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(timeout) = this.timeout.as_mut() {
            if timeout.as_mut().poll(cx).is_ready() {
                return Poll::Ready(Err(HttpClientError::new_with_message(
                    ErrorKind::Timeout,
                    "Request reached timeout",
                )));
            }
        }
        Pin::new(&mut this.future).poll(cx)
    }
}
