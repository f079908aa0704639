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

//! Decoder for fixed-length (`Content-Length`) bodies.

/// Incremental decoder for a body with a declared byte length.
///
/// Feed it raw input slices; it splits each slice into body bytes and the
/// remainder past the declared length, and reports when the body is
/// complete.
pub struct TextBodyDecoder {
    remaining: usize,
}

/// One decode step: the body bytes taken from the input and the completion
/// flag.
pub struct Text<'a> {
    data: &'a [u8],
    complete: bool,
}

impl<'a> Text<'a> {
    /// Gets the body bytes of this step.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Returns `true` once the declared length has been consumed.
    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

impl TextBodyDecoder {
    /// Creates a decoder for a body of `len` bytes.
    pub fn new(len: usize) -> Self {
        Self { remaining: len }
    }

    /// Decodes one input slice. Returns the body portion and the unconsumed
    /// remainder of `buf` (non-empty only when `buf` extends past the
    /// declared length).
    pub fn decode<'a>(&mut self, buf: &'a [u8]) -> (Text<'a>, &'a [u8]) {
        let take = self.remaining.min(buf.len());
        self.remaining -= take;
        (
            Text {
                data: &buf[..take],
                complete: self.remaining == 0,
            },
            &buf[take..],
        )
    }
}
