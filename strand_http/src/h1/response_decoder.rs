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
use crate::headers::Headers;
use crate::response::status::StatusCode;
use crate::response::ResponsePart;
use crate::version::Version;

const CRLF: &[u8] = b"\r\n";
const HEAD_END: &[u8] = b"\r\n\r\n";

/// Incremental parser for an HTTP/1.1 response head.
///
/// Input slices are accumulated until the blank line ending the head has
/// arrived. The decoder then parses the status line and header block and
/// returns the unconsumed tail of the last input slice, which belongs to
/// the body.
pub struct ResponseDecoder {
    buf: Vec<u8>,
}

impl ResponseDecoder {
    /// Creates a new `ResponseDecoder`.
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feeds one input slice.
    ///
    /// Returns `Ok(None)` while the head is still incomplete. Once the
    /// terminating blank line arrives, returns the parsed part together
    /// with the remainder of `input` past the head.
    pub fn decode<'a>(
        &mut self,
        input: &'a [u8],
    ) -> Result<Option<(ResponsePart, &'a [u8])>, HttpError> {
        let prev = self.buf.len();
        self.buf.extend_from_slice(input);

        // The terminator may straddle the previous feed boundary.
        let from = prev.saturating_sub(HEAD_END.len() - 1);
        let end = match find(&self.buf[from..], HEAD_END) {
            Some(idx) => from + idx + HEAD_END.len(),
            None => return Ok(None),
        };

        let part = parse_head(&self.buf[..end])?;
        Ok(Some((part, &input[end - prev..])))
    }
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_head(head: &[u8]) -> Result<ResponsePart, HttpError> {
    let mut lines = split_lines(head);
    let status_line = lines.next().ok_or(ErrorKind::InvalidResponse)?;
    let (version, status) = parse_status_line(status_line)?;

    let mut headers = Headers::new();
    for line in lines {
        if line.is_empty() {
            break;
        }
        let colon = find(line, b":").ok_or(ErrorKind::InvalidResponse)?;
        let name = &line[..colon];
        let value = trim_ows(&line[colon + 1..]);
        headers.append(name, value)?;
    }

    Ok(ResponsePart {
        version,
        status,
        headers,
    })
}

fn parse_status_line(line: &[u8]) -> Result<(Version, StatusCode), HttpError> {
    let mut tokens = line.split(|&b| b == b' ').filter(|t| !t.is_empty());
    let version = tokens.next().ok_or(ErrorKind::InvalidResponse)?;
    let version = Version::from_bytes(version)?;
    let status = tokens.next().ok_or(ErrorKind::InvalidResponse)?;
    let status = StatusCode::from_bytes(status)?;
    // The reason phrase, if any, is ignored.
    Ok((version, status))
}

fn split_lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    let mut rest = buf;
    core::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        match find(rest, CRLF) {
            Some(idx) => {
                let line = &rest[..idx];
                rest = &rest[idx + CRLF.len()..];
                Some(line)
            }
            None => {
                let line = rest;
                rest = &[];
                Some(line)
            }
        }
    })
}

fn trim_ows(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
