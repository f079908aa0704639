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

use strand_http::request::method::Method;
use strand_http::request::uri::Uri;
use strand_http::request::{Request, RequestPart};
use strand_http::version::Version;

use crate::async_impl::UploadBody;
use crate::error::{ErrorKind, HttpClientError};

/// A builder for requests sent by a `Client`.
///
/// Errors raised by any step are deferred to `body`, so calls can be
/// chained freely.
///
/// # Examples
///
/// ```
/// use strand_http_client::{Method, RequestBuilder, UploadBody};
///
/// let request = RequestBuilder::new()
///     .method(Method::Post)
///     .url("http://example.com/upload")
///     .header("Content-Type", "application/octet-stream")
///     .body(UploadBody::bytes(b"data"))
///     .unwrap();
/// ```
pub struct RequestBuilder {
    part: Result<RequestPart, HttpClientError>,
}

impl RequestBuilder {
    /// Creates a builder for a `GET` request.
    pub fn new() -> Self {
        Self {
            part: Ok(RequestPart::default()),
        }
    }

    /// Sets the target URL.
    pub fn url(mut self, url: &str) -> Self {
        self.part = self.part.and_then(|mut part| {
            part.uri = Uri::from_bytes(url.as_bytes())
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Build, Some(e)))?;
            Ok(part)
        });
        self
    }

    /// Sets the request method.
    pub fn method(mut self, method: Method) -> Self {
        self.part = self.part.map(|mut part| {
            part.method = method;
            part
        });
        self
    }

    /// Sets the HTTP version.
    pub fn version(mut self, version: Version) -> Self {
        self.part = self.part.map(|mut part| {
            part.version = version;
            part
        });
        self
    }

    /// Sets a header, replacing previous values under the same name.
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.part = self.part.and_then(|mut part| {
            part.headers
                .insert(name, value)
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Build, Some(e)))?;
            Ok(part)
        });
        self
    }

    /// Appends a header value, keeping previous values under the same name.
    pub fn append_header(mut self, name: &str, value: &str) -> Self {
        self.part = self.part.and_then(|mut part| {
            part.headers
                .append(name, value)
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Build, Some(e)))?;
            Ok(part)
        });
        self
    }

    /// Finishes the builder with the given body.
    pub fn body(self, body: UploadBody) -> Result<Request<UploadBody>, HttpClientError> {
        Ok(Request::from_raw_parts(self.part?, body))
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod ut_request_builder {
    use strand_http::request::method::Method;

    use super::RequestBuilder;
    use crate::async_impl::UploadBody;

    /// UT test cases for `RequestBuilder`.
    ///
    /// # Brief
    /// 1. Builds a request with method, URL and headers.
    /// 2. Checks the assembled part.
    #[test]
    fn ut_request_builder() {
        let request = RequestBuilder::new()
            .method(Method::Post)
            .url("http://example.com:8080/upload?fast=1")
            .header("Content-Type", "text/plain")
            .body(UploadBody::bytes(b"data"))
            .unwrap();
        assert_eq!(*request.method(), Method::Post);
        assert_eq!(request.uri().host(), Some("example.com"));
        assert_eq!(request.uri().port(), Some(8080));
        assert_eq!(
            request
                .headers()
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap(),
            "text/plain"
        );
    }

    /// UT test cases for deferred builder errors.
    ///
    /// # Brief
    /// 1. Supplies an invalid URL and an invalid header after it.
    /// 2. Checks that the first error surfaces at `body`.
    #[test]
    fn ut_request_builder_error() {
        let result = RequestBuilder::new()
            .url("not a url")
            .header("ok", "fine")
            .body(UploadBody::Empty);
        assert!(result.is_err());
    }
}
