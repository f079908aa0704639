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

use tokio::fs::File;

use crate::runtime::AsyncRead;

/// The body of an outgoing request.
///
/// This is a closed set: the sender matches on it exhaustively to choose
/// the framing, so every variant has a defined wire behavior. A streamed
/// body without a known length is sent with chunked transfer coding.
pub enum UploadBody {
    /// No body bytes.
    Empty,

    /// An in-memory body, sent with `Content-Length`.
    Bytes(Vec<u8>),

    /// A file body of known size, sent with `Content-Length`.
    File {
        /// The opened file to read from.
        file: File,

        /// Number of bytes to send.
        len: u64,
    },

    /// An arbitrary byte stream. With a known length it is sent with
    /// `Content-Length`, otherwise with chunked transfer coding.
    Stream {
        /// The reader supplying body bytes.
        reader: Box<dyn AsyncRead + Send + Sync + Unpin>,

        /// Total length, if known in advance.
        len: Option<u64>,
    },
}

impl UploadBody {
    /// Creates an in-memory body from a byte slice.
    pub fn bytes(content: &[u8]) -> Self {
        Self::Bytes(content.to_vec())
    }

    /// Creates a file body. `len` is the number of bytes to send from the
    /// file's current position.
    pub fn file(file: File, len: u64) -> Self {
        Self::File { file, len }
    }

    /// Creates a streamed body. Pass `len` when the total size is known so
    /// the body can be sent with `Content-Length`.
    pub fn stream<R>(reader: R, len: Option<u64>) -> Self
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        Self::Stream {
            reader: Box::new(reader),
            len,
        }
    }

    /// Gets the declared length, `None` for a chunked stream.
    pub(crate) fn content_length(&self) -> Option<u64> {
        match self {
            Self::Empty => Some(0),
            Self::Bytes(content) => Some(content.len() as u64),
            Self::File { len, .. } => Some(*len),
            Self::Stream { len, .. } => *len,
        }
    }

    /// Returns `true` if this body can be sent again from the start, which
    /// makes the request eligible for transparent re-sends.
    pub(crate) fn is_replayable(&self) -> bool {
        matches!(self, Self::Empty | Self::Bytes(_))
    }
}

impl Default for UploadBody {
    fn default() -> Self {
        Self::Empty
    }
}
