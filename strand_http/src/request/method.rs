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

use crate::error::{ErrorKind, HttpError};

/// HTTP request method.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// The `GET` method.
    Get,

    /// The `HEAD` method.
    Head,

    /// The `POST` method.
    Post,

    /// The `PUT` method.
    Put,

    /// The `DELETE` method.
    Delete,

    /// The `OPTIONS` method.
    Options,

    /// The `PATCH` method.
    Patch,
}

impl Method {
    /// Gets the wire representation of this `Method`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
        }
    }

    /// Parses a `Method` from its wire representation.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        match bytes {
            b"GET" => Ok(Self::Get),
            b"HEAD" => Ok(Self::Head),
            b"POST" => Ok(Self::Post),
            b"PUT" => Ok(Self::Put),
            b"DELETE" => Ok(Self::Delete),
            b"OPTIONS" => Ok(Self::Options),
            b"PATCH" => Ok(Self::Patch),
            _ => Err(ErrorKind::InvalidMethod.into()),
        }
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::Get
    }
}
