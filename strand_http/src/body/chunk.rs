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

//! Codecs for `Transfer-Encoding: chunked` body framing.
//!
//! Each chunk is a hex size line, the payload and a CRLF; a zero-size chunk
//! followed by an empty line terminates the body. Chunk extensions are
//! accepted and ignored; trailer lines are consumed and discarded.

use crate::error::{ErrorKind, HttpError};

// Guards against absurd chunk-size lines.
const MAX_SIZE_DIGITS: u8 = 8;

/// Decoder state, advanced one byte class at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkState {
    /// Reading hex digits of the chunk-size line.
    Size,

    /// Skipping a chunk extension up to CR.
    Ext,

    /// Expecting the LF that ends the chunk-size line.
    SizeLf,

    /// Reading payload bytes.
    Data,

    /// Expecting the CR after the payload.
    DataCr,

    /// Expecting the LF after the payload.
    DataLf,

    /// Reading a trailer line after the zero-size chunk.
    Trailer,

    /// Expecting the LF that ends a trailer line.
    TrailerCr,

    /// The terminator has been consumed; the body is complete.
    Finish,
}

/// Incremental decoder for a chunked transfer coding.
///
/// Payload bytes are appended to the caller's output buffer; framing bytes
/// are consumed silently. After the terminator, decoding stops and the
/// unconsumed remainder of the input is reported through the consumed
/// count.
pub struct ChunkBodyDecoder {
    state: ChunkState,
    size: usize,
    digits: u8,
    trailer_empty: bool,
}

impl ChunkBodyDecoder {
    /// Creates a new `ChunkBodyDecoder` positioned before the first
    /// chunk-size line.
    pub fn new() -> Self {
        Self {
            state: ChunkState::Size,
            size: 0,
            digits: 0,
            trailer_empty: true,
        }
    }

    /// Gets the current decoder state.
    pub fn state(&self) -> ChunkState {
        self.state
    }

    /// Returns `true` once the terminating chunk has been consumed.
    pub fn is_finished(&self) -> bool {
        self.state == ChunkState::Finish
    }

    /// Decodes one input slice, appending payload bytes to `dst`.
    ///
    /// Returns `(finished, consumed)`: `finished` is `true` once the
    /// terminator has been seen, and `consumed` is the number of input
    /// bytes used. `consumed < buf.len()` only happens after the
    /// terminator.
    pub fn decode(&mut self, buf: &[u8], dst: &mut Vec<u8>) -> Result<(bool, usize), HttpError> {
        let mut pos = 0;
        while pos < buf.len() {
            match self.state {
                ChunkState::Size => {
                    let b = buf[pos];
                    if let Some(v) = hex_value(b) {
                        if self.digits >= MAX_SIZE_DIGITS {
                            return Err(ErrorKind::InvalidChunk.into());
                        }
                        self.size = (self.size << 4) | v as usize;
                        self.digits += 1;
                        pos += 1;
                    } else if self.digits == 0 {
                        return Err(ErrorKind::InvalidChunk.into());
                    } else if b == b';' {
                        self.state = ChunkState::Ext;
                        pos += 1;
                    } else if b == b'\r' {
                        self.state = ChunkState::SizeLf;
                        pos += 1;
                    } else {
                        return Err(ErrorKind::InvalidChunk.into());
                    }
                }
                ChunkState::Ext => {
                    if buf[pos] == b'\r' {
                        self.state = ChunkState::SizeLf;
                    }
                    pos += 1;
                }
                ChunkState::SizeLf => {
                    if buf[pos] != b'\n' {
                        return Err(ErrorKind::InvalidChunk.into());
                    }
                    pos += 1;
                    if self.size == 0 {
                        self.trailer_empty = true;
                        self.state = ChunkState::Trailer;
                    } else {
                        self.state = ChunkState::Data;
                    }
                }
                ChunkState::Data => {
                    let take = self.size.min(buf.len() - pos);
                    dst.extend_from_slice(&buf[pos..pos + take]);
                    self.size -= take;
                    pos += take;
                    if self.size == 0 {
                        self.state = ChunkState::DataCr;
                    }
                }
                ChunkState::DataCr => {
                    if buf[pos] != b'\r' {
                        return Err(ErrorKind::InvalidChunk.into());
                    }
                    self.state = ChunkState::DataLf;
                    pos += 1;
                }
                ChunkState::DataLf => {
                    if buf[pos] != b'\n' {
                        return Err(ErrorKind::InvalidChunk.into());
                    }
                    self.state = ChunkState::Size;
                    self.digits = 0;
                    pos += 1;
                }
                ChunkState::Trailer => {
                    if buf[pos] == b'\r' {
                        self.state = ChunkState::TrailerCr;
                    } else {
                        self.trailer_empty = false;
                    }
                    pos += 1;
                }
                ChunkState::TrailerCr => {
                    if buf[pos] != b'\n' {
                        return Err(ErrorKind::InvalidChunk.into());
                    }
                    pos += 1;
                    if self.trailer_empty {
                        self.state = ChunkState::Finish;
                    } else {
                        self.trailer_empty = true;
                        self.state = ChunkState::Trailer;
                    }
                }
                ChunkState::Finish => break,
            }
        }
        Ok((self.is_finished(), pos))
    }
}

impl Default for ChunkBodyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Encoder for chunked transfer coding. Stateless; each call frames one
/// chunk.
pub struct ChunkBodyEncoder;

impl ChunkBodyEncoder {
    /// Appends one framed chunk to `dst`. `data` must not be empty: a
    /// zero-size chunk is the terminator, written by [`Self::finish`].
    pub fn encode(data: &[u8], dst: &mut Vec<u8>) {
        debug_assert!(!data.is_empty());
        dst.extend_from_slice(format!("{:x}\r\n", data.len()).as_bytes());
        dst.extend_from_slice(data);
        dst.extend_from_slice(b"\r\n");
    }

    /// Appends the terminating zero-size chunk to `dst`.
    pub fn finish(dst: &mut Vec<u8>) {
        dst.extend_from_slice(b"0\r\n\r\n");
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod ut_chunk {
    use super::{ChunkBodyDecoder, ChunkBodyEncoder};

    /// UT test cases for `ChunkBodyDecoder::decode`.
    ///
    /// # Brief
    /// 1. Decodes a body of two chunks with an extension and trailers.
    /// 2. Checks the reassembled payload and the finished flag.
    #[test]
    fn ut_chunk_decode() {
        let mut decoder = ChunkBodyDecoder::new();
        let mut out = Vec::new();
        let input = b"5\r\nhello\r\nC ; type = text\r\nhello world!\r\n0\r\naccept: text/html\r\n\r\n";
        let (finished, consumed) = decoder.decode(input, &mut out).unwrap();
        assert!(finished);
        assert_eq!(consumed, input.len());
        assert_eq!(out, b"hellohello world!");
    }

    /// UT test cases for `ChunkBodyDecoder::decode` across split inputs.
    ///
    /// # Brief
    /// 1. Feeds a chunked body one byte at a time.
    /// 2. Checks that the payload and terminator are recognized anyway.
    #[test]
    fn ut_chunk_decode_split() {
        let mut decoder = ChunkBodyDecoder::new();
        let mut out = Vec::new();
        let input = b"3\r\nabc\r\n2\r\nde\r\n0\r\n\r\n";
        let mut finished = false;
        for b in input.iter() {
            let (f, consumed) = decoder.decode(core::slice::from_ref(b), &mut out).unwrap();
            assert_eq!(consumed, 1);
            finished = f;
        }
        assert!(finished);
        assert_eq!(out, b"abcde");
    }

    /// UT test cases for `ChunkBodyDecoder::decode` error and junk handling.
    ///
    /// # Brief
    /// 1. Feeds malformed size lines and bytes past the terminator.
    /// 2. Checks that errors and short consumption are reported.
    #[test]
    fn ut_chunk_decode_invalid() {
        let mut decoder = ChunkBodyDecoder::new();
        let mut out = Vec::new();
        assert!(decoder.decode(b"xyz\r\n", &mut out).is_err());

        let mut decoder = ChunkBodyDecoder::new();
        let mut out = Vec::new();
        let input = b"1\r\na\r\n0\r\n\r\njunk";
        let (finished, consumed) = decoder.decode(input, &mut out).unwrap();
        assert!(finished);
        assert_eq!(consumed, input.len() - 4);
        assert_eq!(out, b"a");
    }

    /// UT test cases for `ChunkBodyEncoder`.
    ///
    /// # Brief
    /// 1. Frames two chunks and the terminator.
    /// 2. Checks the wire bytes against the expected framing.
    #[test]
    fn ut_chunk_encode() {
        let mut dst = Vec::new();
        ChunkBodyEncoder::encode(b"hello", &mut dst);
        ChunkBodyEncoder::encode(&[0u8; 16], &mut dst);
        ChunkBodyEncoder::finish(&mut dst);
        let mut expected = Vec::new();
        expected.extend_from_slice(b"5\r\nhello\r\n10\r\n");
        expected.extend_from_slice(&[0u8; 16]);
        expected.extend_from_slice(b"\r\n0\r\n\r\n");
        assert_eq!(dst, expected);
    }
}
