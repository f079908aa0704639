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

use std::sync::Arc;

use strand_http::request::method::Method;
use strand_http::request::uri::Uri;
use strand_http::request::Request;

use crate::async_impl::conn;
use crate::async_impl::connector::{Connector, HttpConnector};
use crate::async_impl::pool::{ConnPool, PoolKey};
use crate::async_impl::{Response, TimeoutFuture, UploadBody};
use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::{sleep_until, Instant};
use crate::util::config::{ClientConfig, Retry, Timeout};
use crate::util::dispatcher::{Conn, ConnDispatcher};
use crate::util::normalizer::RequestFormatter;
use crate::util::retry::is_retriable;

/// An asynchronous HTTP/1.1 client with a connection pool.
///
/// Connections are pooled by scheme and authority and reused across
/// requests whenever the previous exchange on them ended cleanly. The
/// client is cheap to share behind an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use strand_http_client::{Client, RequestBuilder, UploadBody};
///
/// # async fn example() -> Result<(), strand_http_client::HttpClientError> {
/// let client = Client::new();
/// let request = RequestBuilder::new()
///     .url("http://example.com/data")
///     .body(UploadBody::Empty)?;
/// let response = client.request(request).await?;
/// let content = response.bytes().await?;
/// # Ok(())
/// # }
/// ```
pub struct Client<C: Connector = HttpConnector> {
    connector: Arc<C>,
    config: ClientConfig,
    pool: ConnPool<C::Stream>,
}

impl Client<HttpConnector> {
    /// Creates a `Client` with default settings.
    pub fn new() -> Self {
        ClientBuilder::new().build()
    }

    /// Creates a `ClientBuilder`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }
}

impl Default for Client<HttpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> Client<C> {
    /// Creates a `Client` with default settings and a custom connector.
    pub fn with_connector(connector: C) -> Self {
        let config = ClientConfig::new();
        Self {
            connector: Arc::new(connector),
            pool: ConnPool::new(config.max_idle_per_host),
            config,
        }
    }

    /// Sends a request and returns its response once the head has been
    /// received. The body streams afterwards.
    ///
    /// When a retry count is configured, requests whose body can be
    /// replayed are transparently re-sent on retriable failures.
    pub async fn request(
        &self,
        mut request: Request<UploadBody>,
    ) -> Result<Response, HttpClientError> {
        RequestFormatter::new(&mut request).format()?;
        apply_body_headers(&mut request)?;

        let mut remaining = self.config.retry.times().unwrap_or(0);
        loop {
            match self.send_request(&mut request).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if remaining > 0 && is_retriable(&e) && request.body().is_replayable() {
                        remaining -= 1;
                        continue;
                    }
                    return Err(e);
                }
            }
        }
    }

    async fn send_request(
        &self,
        request: &mut Request<UploadBody>,
    ) -> Result<Response, HttpClientError> {
        let deadline = self
            .config
            .request_timeout
            .inner()
            .map(|timeout| Instant::now() + timeout);

        let uri = request.uri().clone();
        let connect_sleep = self
            .config
            .connect_timeout
            .inner()
            .map(|timeout| Box::pin(sleep_until(Instant::now() + timeout)));
        let conn =
            TimeoutFuture::new(Box::pin(self.connect_to(&uri)), connect_sleep).await?;

        // The same deadline bounds the exchange and the body streaming
        // that follows it.
        let body_sleep = deadline.map(|at| Box::pin(sleep_until(at)));
        let exchange_sleep = deadline.map(|at| Box::pin(sleep_until(at)));
        let response = TimeoutFuture::new(
            Box::pin(conn::exchange(conn, request, body_sleep)),
            exchange_sleep,
        )
        .await?;
        Ok(Response::new(response))
    }

    async fn connect_to(&self, uri: &Uri) -> Result<Conn<C::Stream>, HttpClientError> {
        let key = PoolKey::new(uri).ok_or_else(|| {
            HttpClientError::new_with_message(ErrorKind::Connect, "Request uri misses authority")
        })?;
        let conns = self.pool.get(key);
        if let Some(conn) = conns.exist_conn() {
            return Ok(conn);
        }

        let stream = self
            .connector
            .connect(uri)
            .await
            .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Connect, Some(e)))?;
        let dispatcher = ConnDispatcher::new(stream);
        let conn = dispatcher.dispatch().ok_or_else(|| {
            HttpClientError::new_with_message(ErrorKind::Connect, "Connection lease failed")
        })?;
        conns.insert(dispatcher);
        Ok(conn)
    }
}

// Frames the request body on the wire: `Content-Length` when the size is
// known, chunked transfer coding otherwise. Bodiless methods with an empty
// body carry neither header. A caller-supplied `Content-Length` is honored
// verbatim and never recomputed.
fn apply_body_headers(request: &mut Request<UploadBody>) -> Result<(), HttpClientError> {
    let method = *request.method();
    let content_length = request.body().content_length();
    let headers = request.headers_mut();
    if headers.get("Content-Length").is_some() {
        return Ok(());
    }
    match content_length {
        Some(0) => {
            if matches!(method, Method::Post | Method::Put | Method::Patch) {
                headers
                    .insert("Content-Length", "0")
                    .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Request, Some(e)))?;
            }
        }
        Some(len) => {
            headers
                .insert("Content-Length", len.to_string())
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Request, Some(e)))?;
        }
        None => {
            headers
                .insert("Transfer-Encoding", "chunked")
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Request, Some(e)))?;
        }
    }
    Ok(())
}

/// A builder which is used to construct a `Client`.
///
/// # Examples
///
/// ```
/// use strand_http_client::{Client, Retry, Timeout};
///
/// let client = Client::builder()
///     .connect_timeout(Timeout::from_secs(9))
///     .request_timeout(Timeout::from_secs(30))
///     .retry(Retry::max())
///     .build();
/// ```
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            config: ClientConfig::new(),
        }
    }

    /// Sets the limit on the whole of a request: connection setup excluded,
    /// body streaming included.
    pub fn request_timeout(mut self, timeout: Timeout) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Sets the limit on opening a new connection.
    pub fn connect_timeout(mut self, timeout: Timeout) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Sets the transparent re-send count for replayable requests.
    pub fn retry(mut self, retry: Retry) -> Self {
        self.config.retry = retry;
        self
    }

    /// Sets how many idle connections each `scheme://host:port` group may
    /// keep.
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.config.max_idle_per_host = max;
        self
    }

    /// Constructs the `Client`.
    pub fn build(self) -> Client<HttpConnector> {
        Client {
            connector: Arc::new(HttpConnector),
            pool: ConnPool::new(self.config.max_idle_per_host),
            config: self.config,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
