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

//! `strand_http_client` is an asynchronous HTTP/1.1 transport built on
//! `tokio`: a client with a connection pool keyed by scheme and authority,
//! an incremental request sender, a streaming response body with several
//! collection strategies, and a resumable download controller driven by a
//! pluggable retry policy.
//!
//! # Supported HTTP Version
//! - HTTP/1.1

pub mod async_impl;
pub mod util;

mod error;

pub(crate) mod runtime;

pub use async_impl::{
    BodySink, BodySource, BoxBody, Client, ClientBuilder, Connector, DownloadSession, Downloader,
    HttpBody, HttpConnector, OpenFuture, PipedBody, RequestBuilder, Response, UploadBody,
};
pub use error::{ErrorKind, HttpClientError};
pub use util::config::{Retry, Timeout};
pub use util::retry::RetryPolicy;

pub use strand_http::body::Body;
pub use strand_http::headers::{HeaderName, HeaderValue, Headers};
pub use strand_http::request::method::Method;
pub use strand_http::request::uri::{Scheme, Uri};
pub use strand_http::request::{Request, RequestPart};
pub use strand_http::response::status::StatusCode;
pub use strand_http::version::Version;
