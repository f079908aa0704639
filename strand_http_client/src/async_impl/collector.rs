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

//! Channel-backed body collection.
//!
//! Both collectors move the body onto a task spawned on a caller-supplied
//! runtime handle and deliver its chunks through a channel. [`PipedBody`]
//! uses a bounded channel, so a slow consumer backpressures the producer
//! and, through it, the socket. [`BodySink`] uses an unbounded channel: the
//! producer drains the body at full speed and a slow consumer lets chunks
//! accumulate in memory without bound.

use strand_http::body::Body;

use crate::async_impl::http_body::HttpBody;
use crate::error::HttpClientError;
use crate::runtime::{channel, unbounded_channel, Handle, Receiver, UnboundedReceiver};

const CHUNK_SIZE: usize = 8 * 1024;

/// The receiving end of a bounded body pipe.
pub struct PipedBody {
    receiver: Receiver<Result<Vec<u8>, HttpClientError>>,
}

impl PipedBody {
    /// Receives the next body chunk. `None` means the body ended cleanly;
    /// an `Err` chunk is terminal.
    pub async fn recv(&mut self) -> Option<Result<Vec<u8>, HttpClientError>> {
        self.receiver.recv().await
    }
}

/// The receiving end of an unbounded body sink.
pub struct BodySink {
    receiver: UnboundedReceiver<Result<Vec<u8>, HttpClientError>>,
}

impl BodySink {
    /// Receives the next body chunk. `None` means the body ended cleanly;
    /// an `Err` chunk is terminal.
    pub async fn recv(&mut self) -> Option<Result<Vec<u8>, HttpClientError>> {
        self.receiver.recv().await
    }
}

pub(crate) fn pipe(body: HttpBody, handle: &Handle, capacity: usize) -> PipedBody {
    let (tx, rx) = channel(capacity.max(1));
    handle.spawn(async move {
        let mut body = body;
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match body.data(&mut buf).await {
                Ok(0) => break,
                Ok(size) => {
                    // A dropped receiver cancels the transfer; dropping the
                    // body condemns the connection.
                    if tx.send(Ok(buf[..size].to_vec())).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e)).await;
                    break;
                }
            }
        }
    });
    PipedBody { receiver: rx }
}

pub(crate) fn sink(body: HttpBody, handle: &Handle) -> BodySink {
    let (tx, rx) = unbounded_channel();
    handle.spawn(async move {
        let mut body = body;
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            match body.data(&mut buf).await {
                Ok(0) => break,
                Ok(size) => {
                    if tx.send(Ok(buf[..size].to_vec())).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let _ = tx.send(Err(e));
                    break;
                }
            }
        }
    });
    BodySink { receiver: rx }
}
