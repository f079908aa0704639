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

//! Request normalization and response body length classification.

use strand_http::request::method::Method;
use strand_http::request::Request;
use strand_http::response::ResponsePart;
use strand_http::response::status::StatusCode;

use crate::error::{ErrorKind, HttpClientError};

/// Normalizes a request before transmission.
///
/// The target URI gets an explicit port, the `Host` header is rewritten
/// from the target authority regardless of what the caller set, and a
/// default `Accept` header is added when absent. Deriving `Host` from the
/// URI keeps the header and the connection pool key consistent.
pub(crate) struct RequestFormatter<'a, T> {
    request: &'a mut Request<T>,
}

impl<'a, T> RequestFormatter<'a, T> {
    pub(crate) fn new(request: &'a mut Request<T>) -> Self {
        Self { request }
    }

    pub(crate) fn format(&mut self) -> Result<(), HttpClientError> {
        self.request
            .uri_mut()
            .normalize()
            .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Request, Some(e)))?;

        let host = host_header_value(self.request.uri());
        let headers = self.request.headers_mut();
        headers
            .insert("Host", host)
            .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Request, Some(e)))?;
        if headers.get("Accept").is_none() {
            headers
                .insert("Accept", "*/*")
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::Request, Some(e)))?;
        }
        Ok(())
    }
}

// The port is written only when it differs from the scheme default. Callers
// must normalize the URI first.
fn host_header_value(uri: &strand_http::request::uri::Uri) -> String {
    let host = uri.host().unwrap_or_default();
    match (uri.scheme(), uri.port()) {
        (Some(scheme), Some(port)) if port != scheme.default_port() => {
            format!("{host}:{port}")
        }
        _ => host.to_string(),
    }
}

/// How many body bytes a response carries and how they are framed.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum BodyLength {
    /// No body bytes follow the head.
    Empty,

    /// A `Content-Length` body of the given size.
    Fixed(u64),

    /// A `Transfer-Encoding: chunked` body.
    Chunked,

    /// A body delimited by connection close.
    UntilClose,
}

/// Classifies the body framing of a response per RFC 9112 message body
/// length rules.
pub(crate) struct BodyLengthParser<'a> {
    method: &'a Method,
    part: &'a ResponsePart,
}

impl<'a> BodyLengthParser<'a> {
    pub(crate) fn new(method: &'a Method, part: &'a ResponsePart) -> Self {
        Self { method, part }
    }

    pub(crate) fn parse(&self) -> Result<BodyLength, HttpClientError> {
        if *self.method == Method::Head
            || self.part.status.is_informational()
            || self.part.status == StatusCode::NO_CONTENT
            || self.part.status == StatusCode::NOT_MODIFIED
        {
            return Ok(BodyLength::Empty);
        }

        if let Some(value) = self.part.headers.get("Transfer-Encoding") {
            let value = value
                .to_str()
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::BodyDecode, Some(e)))?;
            if value.split(',').any(|c| c.trim() == "chunked") {
                return Ok(BodyLength::Chunked);
            }
        }

        if let Some(value) = self.part.headers.get("Content-Length") {
            let value = value
                .to_str()
                .map_err(|e| HttpClientError::new_with_cause(ErrorKind::BodyDecode, Some(e)))?;
            let len = value.parse::<u64>().map_err(|e| {
                HttpClientError::new_with_cause(ErrorKind::BodyDecode, Some(e))
            })?;
            if len == 0 {
                return Ok(BodyLength::Empty);
            }
            return Ok(BodyLength::Fixed(len));
        }

        Ok(BodyLength::UntilClose)
    }
}
