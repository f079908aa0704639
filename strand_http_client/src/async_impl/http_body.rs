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

//! Streaming response body.
//!
//! [`HttpBody`] owns the leased connection while body bytes remain. Bytes
//! that arrived together with the response head are replayed first, then
//! reads go to the connection. When the body reaches its end cleanly the
//! connection lease is released and the connection returns to the pool;
//! on any framing or transfer failure, and when an incomplete body is
//! dropped, the connection is condemned instead.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::io::Cursor;
use std::io::Read;

use strand_http::body::{Body, ChunkBodyDecoder, TextBodyDecoder};

use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::{AsyncRead, ReadBuf, Sleep};
use crate::util::normalizer::BodyLength;

const TEMP_BUF_SIZE: usize = 4096;

/// The leased connection as seen by a body: a readable stream that can be
/// condemned.
pub(crate) trait StreamData: AsyncRead + Unpin + Send + Sync {
    fn shutdown(&self);
}

pub(crate) type BoxStreamData = Box<dyn StreamData>;

/// The streamed body of a received response.
pub struct HttpBody {
    kind: Kind,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl core::fmt::Debug for HttpBody {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HttpBody").finish_non_exhaustive()
    }
}

enum Kind {
    Empty,
    Text(TextBody),
    Chunk(ChunkBody),
    UntilClose(UntilClose),
}

struct TextBody {
    pre: Cursor<Vec<u8>>,
    decoder: TextBodyDecoder,
    io: Option<BoxStreamData>,
}

struct ChunkBody {
    pre: Cursor<Vec<u8>>,
    decoder: ChunkBodyDecoder,
    scratch: Vec<u8>,
    scratch_pos: usize,
    io: Option<BoxStreamData>,
}

struct UntilClose {
    pre: Cursor<Vec<u8>>,
    io: Option<BoxStreamData>,
}

impl HttpBody {
    pub(crate) fn new(
        body_length: BodyLength,
        pre: &[u8],
        io: BoxStreamData,
        sleep: Option<Pin<Box<Sleep>>>,
    ) -> Result<Self, HttpClientError> {
        let kind = match body_length {
            BodyLength::Empty => {
                if !pre.is_empty() {
                    // Unexpected bytes after an empty body; the stream is
                    // out of sync.
                    io.shutdown();
                    return Err(HttpClientError::new_with_message(
                        ErrorKind::Request,
                        "Unexpected bytes after response",
                    ));
                }
                Kind::Empty
            }
            BodyLength::Fixed(len) => Kind::Text(TextBody {
                pre: Cursor::new(pre.to_vec()),
                decoder: TextBodyDecoder::new(len as usize),
                io: Some(io),
            }),
            BodyLength::Chunked => Kind::Chunk(ChunkBody {
                pre: Cursor::new(pre.to_vec()),
                decoder: ChunkBodyDecoder::new(),
                scratch: Vec::new(),
                scratch_pos: 0,
                io: Some(io),
            }),
            BodyLength::UntilClose => Kind::UntilClose(UntilClose {
                pre: Cursor::new(pre.to_vec()),
                io: Some(io),
            }),
        };
        Ok(Self { kind, sleep })
    }

    fn io(&self) -> Option<&BoxStreamData> {
        match &self.kind {
            Kind::Empty => None,
            Kind::Text(text) => text.io.as_ref(),
            Kind::Chunk(chunk) => chunk.io.as_ref(),
            Kind::UntilClose(until_close) => until_close.io.as_ref(),
        }
    }
}

impl Body for HttpBody {
    type Error = HttpClientError;

    fn poll_data(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, Self::Error>> {
        let this = self.get_mut();

        if let Some(sleep) = this.sleep.as_mut() {
            if sleep.as_mut().poll(cx).is_ready() {
                if let Some(io) = this.io() {
                    io.shutdown();
                }
                return Poll::Ready(Err(HttpClientError::new_with_message(
                    ErrorKind::Timeout,
                    "Request reached timeout",
                )));
            }
        }

        match &mut this.kind {
            Kind::Empty => Poll::Ready(Ok(0)),
            Kind::Text(text) => text.poll_data(cx, buf),
            Kind::Chunk(chunk) => chunk.poll_data(cx, buf),
            Kind::UntilClose(until_close) => until_close.poll_data(cx, buf),
        }
    }
}

impl Drop for HttpBody {
    fn drop(&mut self) {
        // An incomplete body leaves unread bytes on the stream, so the
        // connection must not be reused.
        if let Some(io) = self.io() {
            io.shutdown();
        }
    }
}

// Reads the next raw input slice: replayed head-remainder bytes first, the
// connection afterwards. `Ok(0)` means the connection reported EOF (the
// replay buffer being empty falls through to the connection).
fn poll_raw(
    pre: &mut Cursor<Vec<u8>>,
    io: &mut Option<BoxStreamData>,
    cx: &mut Context<'_>,
    buf: &mut [u8],
) -> Poll<Result<Option<usize>, std::io::Error>> {
    if (pre.position() as usize) < pre.get_ref().len() {
        let read = Read::read(pre, buf).unwrap_or(0);
        return Poll::Ready(Ok(Some(read)));
    }
    match io {
        Some(stream) => {
            let mut read_buf = ReadBuf::new(buf);
            match Pin::new(stream).poll_read(cx, &mut read_buf) {
                Poll::Ready(Ok(())) => Poll::Ready(Ok(Some(read_buf.filled().len()))),
                Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
                Poll::Pending => Poll::Pending,
            }
        }
        None => Poll::Ready(Ok(None)),
    }
}

impl TextBody {
    fn poll_data(
        &mut self,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, HttpClientError>> {
        let read = match poll_raw(&mut self.pre, &mut self.io, cx, buf) {
            Poll::Ready(Ok(Some(read))) => read,
            Poll::Ready(Ok(None)) => return Poll::Ready(Ok(0)),
            Poll::Ready(Err(e)) => {
                return Poll::Ready(Err(self.fail(HttpClientError::new_with_cause(
                    ErrorKind::BodyTransfer,
                    Some(e),
                ))))
            }
            Poll::Pending => return Poll::Pending,
        };
        if read == 0 {
            return Poll::Ready(Err(self.fail(HttpClientError::new_with_message(
                ErrorKind::BodyTransfer,
                "Response body incomplete",
            ))));
        }

        let (data_len, complete, junk) = {
            let (text, rem) = self.decoder.decode(&buf[..read]);
            (text.data().len(), text.is_complete(), !rem.is_empty())
        };
        if junk {
            return Poll::Ready(Err(self.fail(HttpClientError::new_with_message(
                ErrorKind::BodyDecode,
                "Unexpected bytes after response body",
            ))));
        }
        if complete {
            // Clean end: release the lease so the connection can be reused.
            self.io = None;
        }
        Poll::Ready(Ok(data_len))
    }

    fn fail(&mut self, error: HttpClientError) -> HttpClientError {
        if let Some(io) = self.io.take() {
            io.shutdown();
        }
        error
    }
}

impl ChunkBody {
    fn poll_data(
        &mut self,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, HttpClientError>> {
        loop {
            if self.scratch_pos < self.scratch.len() {
                let rest = &self.scratch[self.scratch_pos..];
                let size = rest.len().min(buf.len());
                buf[..size].copy_from_slice(&rest[..size]);
                self.scratch_pos += size;
                return Poll::Ready(Ok(size));
            }
            if self.decoder.is_finished() {
                return Poll::Ready(Ok(0));
            }

            let mut tmp = [0u8; TEMP_BUF_SIZE];
            let read = match poll_raw(&mut self.pre, &mut self.io, cx, &mut tmp) {
                Poll::Ready(Ok(Some(read))) => read,
                Poll::Ready(Ok(None)) => return Poll::Ready(Ok(0)),
                Poll::Ready(Err(e)) => {
                    return Poll::Ready(Err(self.fail(HttpClientError::new_with_cause(
                        ErrorKind::BodyTransfer,
                        Some(e),
                    ))))
                }
                Poll::Pending => return Poll::Pending,
            };
            if read == 0 {
                return Poll::Ready(Err(self.fail(HttpClientError::new_with_message(
                    ErrorKind::BodyTransfer,
                    "Response body incomplete",
                ))));
            }

            self.scratch.clear();
            self.scratch_pos = 0;
            let (finished, consumed) = match self.decoder.decode(&tmp[..read], &mut self.scratch) {
                Ok(step) => step,
                Err(e) => {
                    return Poll::Ready(Err(self.fail(HttpClientError::new_with_cause(
                        ErrorKind::BodyDecode,
                        Some(e),
                    ))))
                }
            };
            if finished {
                if consumed < read {
                    return Poll::Ready(Err(self.fail(HttpClientError::new_with_message(
                        ErrorKind::BodyDecode,
                        "Unexpected bytes after chunked body",
                    ))));
                }
                self.io = None;
            }
        }
    }

    fn fail(&mut self, error: HttpClientError) -> HttpClientError {
        if let Some(io) = self.io.take() {
            io.shutdown();
        }
        error
    }
}

impl UntilClose {
    fn poll_data(
        &mut self,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<Result<usize, HttpClientError>> {
        let read = match poll_raw(&mut self.pre, &mut self.io, cx, buf) {
            Poll::Ready(Ok(Some(read))) => read,
            Poll::Ready(Ok(None)) => return Poll::Ready(Ok(0)),
            Poll::Ready(Err(e)) => {
                let error = HttpClientError::new_with_cause(ErrorKind::BodyTransfer, Some(e));
                if let Some(io) = self.io.take() {
                    io.shutdown();
                }
                return Poll::Ready(Err(error));
            }
            Poll::Pending => return Poll::Pending,
        };
        if read == 0 {
            // The peer closing the connection is this body's terminator.
            if let Some(io) = self.io.take() {
                io.shutdown();
            }
        }
        Poll::Ready(Ok(read))
    }
}
