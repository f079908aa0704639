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

use strand_http::request::uri::Uri;

use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::{AsyncRead, AsyncWrite, TcpStream};

/// `Connector` opens the transport stream for a target URI.
///
/// The default connector opens plain TCP; implement this trait to supply
/// TLS, Unix sockets or an in-memory transport for tests.
pub trait Connector {
    /// The transport stream this connector produces.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static;

    /// Errors while opening the stream.
    type Error: Into<Box<dyn std::error::Error + Send + Sync>>;

    /// The future returned by `connect`.
    type Future: Future<Output = Result<Self::Stream, Self::Error>> + Send + Unpin;

    /// Attempts to open a stream to the authority of `uri`.
    fn connect(&self, uri: &Uri) -> Self::Future;
}

/// A `Connector` that opens plain TCP streams with `TCP_NODELAY` set.
#[derive(Default)]
pub struct HttpConnector;

impl Connector for HttpConnector {
    type Stream = TcpStream;
    type Error = HttpClientError;
    type Future =
        Pin<Box<dyn Future<Output = Result<Self::Stream, Self::Error>> + Send + Sync>>;

    fn connect(&self, uri: &Uri) -> Self::Future {
        let authority = match (uri.host(), uri.port()) {
            (Some(host), Some(port)) => Ok(format!("{host}:{port}")),
            _ => Err(HttpClientError::new_with_message(
                ErrorKind::Connect,
                "Missing host or port in request uri",
            )),
        };
        Box::pin(async move {
            let stream = TcpStream::connect(authority?)
                .await
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Connect, Some(e)))?;
            let _ = stream.set_nodelay(true);
            Ok(stream)
        })
    }
}
