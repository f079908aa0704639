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

//! HTTP/1.1 wire codecs.
//!
//! [`RequestEncoder`] serializes a request head incrementally into
//! caller-provided buffers. [`ResponseDecoder`] assembles a response head
//! from arbitrarily-split input slices and hands back the bytes that belong
//! to the body.

mod request_encoder;
mod response_decoder;

pub use request_encoder::RequestEncoder;
pub use response_decoder::ResponseDecoder;
