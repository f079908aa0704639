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

//! Body traits and helpers.
//!
//! [`Body`] is the pull interface every streamed body implements: the
//! consumer hands in a buffer and suspends until bytes arrive or the body
//! reaches its terminal state. A read of `0` bytes signals a complete body;
//! an error is a failed terminal state.

mod chunk;
mod text;

pub use chunk::{ChunkBodyDecoder, ChunkBodyEncoder, ChunkState};
pub use text::{Text, TextBodyDecoder};

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::error::Error;
use std::io::{Cursor, Read};

/// An asynchronous, pull-based byte stream.
pub trait Body {
    /// Errors that occur while pulling data from this body.
    type Error: Into<Box<dyn Error + Send + Sync>>;

    /// Attempts to read body data into `buf`. `Ok(0)` means the body is
    /// complete; an error is terminal.
    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, Self::Error>>;

    /// Reads body data into `buf`, suspending until bytes arrive or the body
    /// terminates.
    fn data<'a>(&'a mut self, buf: &'a mut [u8]) -> BodyData<'a, Self>
    where
        Self: Unpin + Sized,
    {
        BodyData { body: self, buf }
    }
}

/// Future returned by [`Body::data`].
pub struct BodyData<'a, T> {
    body: &'a mut T,
    buf: &'a mut [u8],
}

impl<T: Body + Unpin> Future for BodyData<'_, T> {
    type Output = Result<usize, T::Error>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        Pin::new(&mut *this.body).poll_data(cx, this.buf)
    }
}

impl<T: Body + Unpin + ?Sized> Body for Box<T> {
    type Error = T::Error;

    fn poll_data(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, Self::Error>> {
        Pin::new(&mut **self).poll_data(cx, buf)
    }
}

/// A body with no content.
pub struct EmptyBody;

impl Body for EmptyBody {
    type Error = std::io::Error;

    fn poll_data(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut [u8],
    ) -> Poll<Result<usize, Self::Error>> {
        Poll::Ready(Ok(0))
    }
}

/// A body backed by an in-memory byte buffer.
pub struct TextBody {
    content: Cursor<Vec<u8>>,
}

impl TextBody {
    /// Creates a `TextBody` from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            content: Cursor::new(bytes.to_vec()),
        }
    }
}

impl Body for TextBody {
    type Error = std::io::Error;

    fn poll_data(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, Self::Error>> {
        Poll::Ready(Read::read(&mut self.content, buf))
    }
}

#[cfg(test)]
mod ut_body {
    use super::{Body, EmptyBody, TextBody};

    /// UT test cases for `TextBody` and `EmptyBody` data pulls.
    ///
    /// # Brief
    /// 1. Creates a `TextBody` and reads it through a small buffer.
    /// 2. Checks that the chunks concatenate to the content and end with 0.
    #[tokio::test]
    async fn ut_body_data() {
        let mut body = TextBody::from_bytes(b"hello world");
        let mut buf = [0u8; 4];
        let mut out = Vec::new();
        loop {
            let size = body.data(&mut buf).await.unwrap();
            if size == 0 {
                break;
            }
            out.extend_from_slice(&buf[..size]);
        }
        assert_eq!(out, b"hello world");

        let mut empty = EmptyBody;
        assert_eq!(empty.data(&mut buf).await.unwrap(), 0);
    }
}
