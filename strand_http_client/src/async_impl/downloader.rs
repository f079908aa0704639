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

//! Resumable downloads.
//!
//! A [`DownloadSession`] presents one contiguous byte stream to its
//! consumer while transparently reopening the underlying transfer after
//! retriable failures. The session tracks how many bytes it has delivered;
//! each reopen asks its [`BodySource`] for a stream starting at that
//! offset, so the consumer never observes duplicated or missing bytes.
//! A [`RetryPolicy`] bounds the attempts and spaces them out.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::sync::Arc;

use strand_http::body::Body;
use strand_http::response::status::StatusCode;

use crate::async_impl::connector::Connector;
use crate::async_impl::{Client, RequestBuilder, UploadBody};
use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::{sleep, AsyncWrite, AsyncWriteExt, Sleep};
use crate::util::retry::RetryPolicy;

/// A boxed streaming body.
pub type BoxBody = Box<dyn Body<Error = HttpClientError> + Send + Sync + Unpin>;

/// The future returned by [`BodySource::open`].
pub type OpenFuture = Pin<Box<dyn Future<Output = Result<BoxBody, HttpClientError>> + Send>>;

/// Supplies the byte stream of a download, restartable at any offset.
///
/// `open(0, None)` starts the transfer from the beginning; `open(n, ..)`
/// after a failure must yield a stream whose first byte is byte `n` of
/// the resource.
pub trait BodySource {
    /// Opens the stream at `offset` bytes into the resource. `error` is
    /// the failure that ended the previous attempt, `None` on the first.
    fn open(&mut self, offset: u64, error: Option<&HttpClientError>) -> OpenFuture;
}

/// A builder for download sessions.
///
/// # Examples
///
/// ```no_run
/// use core::time::Duration;
/// use std::sync::Arc;
///
/// use strand_http_client::{Client, Downloader, RetryPolicy};
///
/// # fn example() -> Result<(), strand_http_client::HttpClientError> {
/// let client = Arc::new(Client::new());
/// let session = Downloader::new()
///     .ranged(client, "http://example.com/large.bin")
///     .retry_policy(RetryPolicy::exponential(
///         5,
///         Duration::from_millis(200),
///         Duration::from_secs(5),
///     ))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct Downloader {
    source: Option<Box<dyn BodySource + Send>>,
    policy: RetryPolicy,
    start_offset: u64,
}

impl Downloader {
    /// Creates a `Downloader` with no source and a policy that never
    /// retries.
    pub fn new() -> Self {
        Self {
            source: None,
            policy: RetryPolicy::fixed(0, core::time::Duration::ZERO),
            start_offset: 0,
        }
    }

    /// Sets a custom body source.
    pub fn source<S>(mut self, source: S) -> Self
    where
        S: BodySource + Send + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets an HTTP source: `GET url` for the initial attempt, `GET` with
    /// `Range: bytes=<offset>-` for resumes. A resume requires the server
    /// to answer `206 Partial Content`.
    pub fn ranged<C>(self, client: Arc<Client<C>>, url: &str) -> Self
    where
        C: Connector + Send + Sync + 'static,
    {
        self.source(RangedSource {
            client,
            url: url.to_string(),
        })
    }

    /// Sets the retry policy.
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the byte offset the first attempt opens at. Defaults to `0`.
    pub fn start_offset(mut self, offset: u64) -> Self {
        self.start_offset = offset;
        self
    }

    /// Constructs the session. Returns `Err` if no source was set.
    pub fn build(self) -> Result<DownloadSession, HttpClientError> {
        let source = self.source.ok_or_else(|| {
            HttpClientError::new_with_message(ErrorKind::Build, "Downloader misses a body source")
        })?;
        Ok(DownloadSession {
            source,
            policy: self.policy,
            state: State::Starting,
            start: self.start_offset,
            offset: self.start_offset,
            attempts: 0,
            last_error: None,
        })
    }
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

/// One download in progress, presented as a contiguous [`Body`].
///
/// After a non-retriable failure, or once the retry budget is spent, the
/// error is surfaced exactly once; later pulls report the session as
/// failed.
pub struct DownloadSession {
    source: Box<dyn BodySource + Send>,
    policy: RetryPolicy,
    state: State,
    // The offset the first attempt opened at.
    start: u64,
    // The current position in the resource; resumes reopen here.
    offset: u64,
    // Attempts made so far, the running one included.
    attempts: u32,
    // The failure behind a pending retry, lent to the next reopen.
    last_error: Option<HttpClientError>,
}

enum State {
    Starting,
    Connecting(OpenFuture),
    Streaming(BoxBody),
    Waiting(Pin<Box<Sleep>>),
    Completed,
    Failed,
}

impl DownloadSession {
    /// Gets the number of bytes delivered so far.
    pub fn bytes_received(&self) -> u64 {
        self.offset - self.start
    }

    /// Gets the number of attempts made so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Streams the rest of the download into `writer`, returning the number
    /// of bytes written.
    pub async fn write_to<W>(&mut self, writer: &mut W) -> Result<u64, HttpClientError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut total = 0u64;
        let mut buf = vec![0u8; 8 * 1024];
        loop {
            let size = self.data(&mut buf).await?;
            if size == 0 {
                return Ok(total);
            }
            writer
                .write_all(&buf[..size])
                .await
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Other, Some(e)))?;
            total += size as u64;
        }
    }

    // Decides between waiting for another attempt and failing the session.
    // Returns the error when it is final.
    fn handle_failure(&mut self, error: HttpClientError) -> Option<HttpClientError> {
        match self.policy.check(self.attempts, &error) {
            Some(delay) => {
                self.last_error = Some(error);
                self.state = State::Waiting(Box::pin(sleep(delay)));
                None
            }
            None => {
                self.state = State::Failed;
                Some(error)
            }
        }
    }
}

impl Body for DownloadSession {
    type Error = HttpClientError;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, Self::Error>> {
        let this = self.get_mut();
        loop {
            match &mut this.state {
                State::Starting => {
                    this.attempts = 1;
                    let future = this.source.open(this.offset, None);
                    this.state = State::Connecting(future);
                }
                State::Connecting(future) => match future.as_mut().poll(cx) {
                    Poll::Ready(Ok(body)) => this.state = State::Streaming(body),
                    Poll::Ready(Err(e)) => {
                        if let Some(error) = this.handle_failure(e) {
                            return Poll::Ready(Err(error));
                        }
                    }
                    Poll::Pending => return Poll::Pending,
                },
                State::Streaming(body) => match Pin::new(body).poll_data(cx, buf) {
                    Poll::Ready(Ok(0)) => {
                        this.state = State::Completed;
                        return Poll::Ready(Ok(0));
                    }
                    Poll::Ready(Ok(size)) => {
                        this.offset += size as u64;
                        return Poll::Ready(Ok(size));
                    }
                    Poll::Ready(Err(e)) => {
                        if let Some(error) = this.handle_failure(e) {
                            return Poll::Ready(Err(error));
                        }
                    }
                    Poll::Pending => return Poll::Pending,
                },
                State::Waiting(sleep) => match sleep.as_mut().poll(cx) {
                    Poll::Ready(()) => {
                        this.attempts += 1;
                        let error = this.last_error.take();
                        let future = this.source.open(this.offset, error.as_ref());
                        this.state = State::Connecting(future);
                    }
                    Poll::Pending => return Poll::Pending,
                },
                State::Completed => return Poll::Ready(Ok(0)),
                State::Failed => {
                    return Poll::Ready(Err(HttpClientError::new_with_message(
                        ErrorKind::Other,
                        "Download session already failed",
                    )))
                }
            }
        }
    }
}

struct RangedSource<C: Connector> {
    client: Arc<Client<C>>,
    url: String,
}

impl<C> BodySource for RangedSource<C>
where
    C: Connector + Send + Sync + 'static,
{
    fn open(&mut self, offset: u64, _error: Option<&HttpClientError>) -> OpenFuture {
        let client = self.client.clone();
        let url = self.url.clone();
        Box::pin(async move {
            let mut builder = RequestBuilder::new().url(&url);
            if offset > 0 {
                builder = builder.header("Range", &format!("bytes={offset}-"));
            }
            let request = builder.body(UploadBody::Empty)?;
            let response = client.request(request).await?;

            let status = response.status();
            if offset == 0 {
                if !status.is_success() {
                    return Err(HttpClientError::new_with_message(
                        ErrorKind::Request,
                        "Download request was not successful",
                    ));
                }
            } else if status != StatusCode::PARTIAL_CONTENT {
                // A 200 here would replay the resource from the start and
                // duplicate delivered bytes.
                return Err(HttpClientError::new_with_message(
                    ErrorKind::Request,
                    "Server did not honor the range resume",
                ));
            }
            Ok(Box::new(response.into_body()) as BoxBody)
        })
    }
}
