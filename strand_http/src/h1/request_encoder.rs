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

use crate::request::RequestPart;

/// Incremental serializer for an HTTP/1.1 request head.
///
/// The head is serialized once at construction; each `encode` call drains
/// as much of it as fits into the caller's buffer. A return of `0` means
/// the head has been written completely.
pub struct RequestEncoder {
    head: Vec<u8>,
    written: usize,
}

impl RequestEncoder {
    /// Creates a `RequestEncoder` for the given request part.
    ///
    /// The request line uses the origin-form target (path and query); each
    /// header value is written as its own header line.
    pub fn new(part: RequestPart) -> Self {
        let mut head = Vec::with_capacity(128);
        head.extend_from_slice(part.method.as_str().as_bytes());
        head.push(b' ');
        head.extend_from_slice(part.uri.path_and_query().as_bytes());
        head.push(b' ');
        head.extend_from_slice(part.version.as_str().as_bytes());
        head.extend_from_slice(b"\r\n");
        for (name, value) in part.headers.iter() {
            for v in value.iter() {
                head.extend_from_slice(name.as_str().as_bytes());
                head.extend_from_slice(b": ");
                head.extend_from_slice(v.as_slice());
                head.extend_from_slice(b"\r\n");
            }
        }
        head.extend_from_slice(b"\r\n");
        Self { head, written: 0 }
    }

    /// Writes the next portion of the head into `buf`, returning the number
    /// of bytes written. `0` means the head is complete.
    pub fn encode(&mut self, buf: &mut [u8]) -> usize {
        let rest = &self.head[self.written..];
        let size = rest.len().min(buf.len());
        buf[..size].copy_from_slice(&rest[..size]);
        self.written += size;
        size
    }

    /// Returns `true` once the whole head has been written.
    pub fn is_finished(&self) -> bool {
        self.written == self.head.len()
    }
}

#[cfg(test)]
mod ut_request_encoder {
    use super::RequestEncoder;
    use crate::request::uri::Uri;
    use crate::request::RequestPart;

    /// UT test cases for `RequestEncoder::encode`.
    ///
    /// # Brief
    /// 1. Encodes a request head through a small buffer.
    /// 2. Checks the request line, header lines and terminating blank line.
    #[test]
    fn ut_request_encode() {
        let mut part = RequestPart::default();
        part.uri = Uri::from_bytes(b"http://example.com:8080/data?x=1").unwrap();
        part.headers.insert("Host", "example.com:8080").unwrap();

        let mut encoder = RequestEncoder::new(part);
        let mut out = Vec::new();
        let mut buf = [0u8; 7];
        loop {
            let size = encoder.encode(&mut buf);
            if size == 0 {
                break;
            }
            out.extend_from_slice(&buf[..size]);
        }
        assert!(encoder.is_finished());

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("GET /data?x=1 HTTP/1.1\r\n"));
        assert!(text.contains("host: example.com:8080\r\n"));
        assert!(text.ends_with("\r\n\r\n"));
    }

    /// UT test cases for `RequestEncoder::encode` with repeated headers.
    ///
    /// # Brief
    /// 1. Appends two values under one header name.
    /// 2. Checks that each value is written as its own line.
    #[test]
    fn ut_request_encode_repeated_header() {
        let mut part = RequestPart::default();
        part.uri = Uri::from_bytes(b"http://example.com/").unwrap();
        part.headers.append("Accept", "text/html").unwrap();
        part.headers.append("Accept", "text/plain").unwrap();

        let mut encoder = RequestEncoder::new(part);
        let mut buf = [0u8; 256];
        let size = encoder.encode(&mut buf);
        assert!(encoder.is_finished());

        let text = std::str::from_utf8(&buf[..size]).unwrap();
        assert!(text.contains("accept: text/html\r\n"));
        assert!(text.contains("accept: text/plain\r\n"));
    }
}
