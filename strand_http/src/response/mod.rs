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

//! HTTP response types.

pub mod status;

use crate::headers::Headers;
use crate::version::Version;

use status::StatusCode;

/// The non-body parts of a `Response`: version, status and headers.
///
/// The part is available as soon as the status line and header block have
/// been parsed, before any of the body has arrived.
#[derive(Clone, Debug)]
pub struct ResponsePart {
    /// HTTP version of this response.
    pub version: Version,

    /// Status code of this response.
    pub status: StatusCode,

    /// Headers of this response.
    pub headers: Headers,
}

/// An HTTP response: a `ResponsePart` plus a body of type `T`.
pub struct Response<T> {
    part: ResponsePart,
    body: T,
}

impl<T> Response<T> {
    /// Assembles a `Response` from a `ResponsePart` and a body.
    pub fn from_raw_parts(part: ResponsePart, body: T) -> Self {
        Self { part, body }
    }

    /// Splits the response into its part and body.
    pub fn into_parts(self) -> (ResponsePart, T) {
        (self.part, self.body)
    }

    /// Gets the status code.
    pub fn status(&self) -> StatusCode {
        self.part.status
    }

    /// Gets the HTTP version.
    pub fn version(&self) -> Version {
        self.part.version
    }

    /// Gets the headers.
    pub fn headers(&self) -> &Headers {
        &self.part.headers
    }

    /// Gets a reference to the non-body part.
    pub fn part(&self) -> &ResponsePart {
        &self.part
    }

    /// Gets a reference to the body.
    pub fn body(&self) -> &T {
        &self.body
    }

    /// Gets a mutable reference to the body.
    pub fn body_mut(&mut self) -> &mut T {
        &mut self.body
    }

    /// Consumes the response and returns the body.
    pub fn into_body(self) -> T {
        self.body
    }
}
