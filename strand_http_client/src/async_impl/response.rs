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

use strand_http::body::Body;
use strand_http::headers::Headers;
use strand_http::response::status::StatusCode;
use strand_http::version::Version;

use crate::async_impl::collector::{self, BodySink, PipedBody};
use crate::async_impl::http_body::HttpBody;
use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::Handle;

const CHUNK_SIZE: usize = 8 * 1024;

/// A received response: the parsed head plus a streaming body.
///
/// The head is available immediately; the body can be pulled directly with
/// [`Response::data`], collected in memory, or moved onto a task with one
/// of the channel-backed strategies.
pub struct Response {
    inner: strand_http::response::Response<HttpBody>,
}

impl Response {
    pub(crate) fn new(inner: strand_http::response::Response<HttpBody>) -> Self {
        Self { inner }
    }

    /// Gets the status code.
    pub fn status(&self) -> StatusCode {
        self.inner.status()
    }

    /// Gets the HTTP version.
    pub fn version(&self) -> Version {
        self.inner.version()
    }

    /// Gets the headers.
    pub fn headers(&self) -> &Headers {
        self.inner.headers()
    }

    /// Reads body data into `buf`, suspending until bytes arrive or the
    /// body terminates. Returns `0` once the body is complete.
    pub async fn data(&mut self, buf: &mut [u8]) -> Result<usize, HttpClientError> {
        self.inner.body_mut().data(buf).await
    }

    /// Collects the whole body in memory.
    pub async fn bytes(mut self) -> Result<Vec<u8>, HttpClientError> {
        let mut out = Vec::new();
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let size = self.data(&mut buf).await?;
            if size == 0 {
                return Ok(out);
            }
            out.extend_from_slice(&buf[..size]);
        }
    }

    /// Collects the whole body and decodes it as UTF-8.
    pub async fn text(self) -> Result<String, HttpClientError> {
        let bytes = self.bytes().await?;
        String::from_utf8(bytes)
            .map_err(|e| HttpClientError::new_with_cause(ErrorKind::BodyDecode, Some(e)))
    }

    /// Moves the body onto a task spawned on `handle` and returns a bounded
    /// pipe of at most `capacity` in-flight chunks. A slow consumer
    /// backpressures the transfer.
    pub fn into_pipe(self, handle: &Handle, capacity: usize) -> PipedBody {
        collector::pipe(self.inner.into_body(), handle, capacity)
    }

    /// Moves the body onto a task spawned on `handle` and returns an
    /// unbounded sink. The transfer proceeds at full speed; a slow consumer
    /// lets chunks accumulate in memory without bound.
    pub fn into_sink(self, handle: &Handle) -> BodySink {
        collector::sink(self.inner.into_body(), handle)
    }

    /// Consumes the response and returns the streaming body.
    pub fn into_body(self) -> HttpBody {
        self.inner.into_body()
    }
}
