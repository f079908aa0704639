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

//! HTTP request types.

pub mod method;
pub mod uri;

use crate::headers::Headers;
use crate::version::Version;

use method::Method;
use uri::Uri;

/// The non-body parts of a `Request`: method, target URI, version and
/// headers.
#[derive(Clone, Debug, Default)]
pub struct RequestPart {
    /// HTTP method of this request.
    pub method: Method,

    /// Target URI of this request.
    pub uri: Uri,

    /// HTTP version of this request.
    pub version: Version,

    /// Headers of this request.
    pub headers: Headers,
}

/// An HTTP request: a `RequestPart` plus a body of type `T`.
///
/// The request is immutable once handed to the sender; mutation methods
/// exist for the normalization step that runs before transmission.
pub struct Request<T> {
    part: RequestPart,
    body: T,
}

impl<T> Request<T> {
    /// Creates a `GET` request for `/` with the given body.
    pub fn new(body: T) -> Self {
        Self {
            part: RequestPart::default(),
            body,
        }
    }

    /// Assembles a `Request` from a `RequestPart` and a body.
    pub fn from_raw_parts(part: RequestPart, body: T) -> Self {
        Self { part, body }
    }

    /// Splits the request into its part and body.
    pub fn into_parts(self) -> (RequestPart, T) {
        (self.part, self.body)
    }

    /// Gets a reference to the non-body part.
    pub fn part(&self) -> &RequestPart {
        &self.part
    }

    /// Gets the method.
    pub fn method(&self) -> &Method {
        &self.part.method
    }

    /// Gets the target URI.
    pub fn uri(&self) -> &Uri {
        &self.part.uri
    }

    /// Gets a mutable reference to the target URI.
    pub fn uri_mut(&mut self) -> &mut Uri {
        &mut self.part.uri
    }

    /// Gets the headers.
    pub fn headers(&self) -> &Headers {
        &self.part.headers
    }

    /// Gets a mutable reference to the headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.part.headers
    }

    /// Gets a reference to the body.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Gets a mutable reference to the body.
    pub fn body_mut(&mut self) -> &mut T {
        &mut self.body
    }
}
