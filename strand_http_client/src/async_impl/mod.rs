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

//! Asynchronous HTTP client implementation.

mod client;
mod collector;
mod connector;
mod downloader;
mod http_body;
mod pool;
mod request;
mod response;
mod timeout;
mod upload;

pub(crate) mod conn;

pub use client::{Client, ClientBuilder};
pub use collector::{BodySink, PipedBody};
pub use connector::{Connector, HttpConnector};
pub use downloader::{BodySource, BoxBody, DownloadSession, Downloader, OpenFuture};
pub use http_body::HttpBody;
pub use request::RequestBuilder;
pub use response::Response;
pub use upload::UploadBody;

pub(crate) use timeout::TimeoutFuture;
