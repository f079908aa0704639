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

//! `strand_http` provides the HTTP/1.1 protocol building blocks used by
//! `strand_http_client`: request and response types, case-insensitive
//! headers, body traits and the incremental wire codecs.
//!
//! # Supported HTTP Version
//! - HTTP/1.1

pub mod body;
pub mod error;
pub mod h1;
pub mod headers;
pub mod request;
pub mod response;
pub mod version;

pub use error::HttpError;
