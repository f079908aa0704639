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

//! Case-insensitive header collection.
//!
//! Header names are normalized to lowercase on construction, so `get` and
//! `insert` behave identically for `Content-Length` and `content-length`.
//! A name can map to one or more values.

use std::collections::hash_map::{Entry, HashMap};
use std::collections::hash_map::Iter as MapIter;

use crate::error::{ErrorKind, HttpError};

/// A validated, lowercase HTTP header name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HeaderName {
    name: String,
}

impl HeaderName {
    /// Creates a `HeaderName` from a byte slice, normalizing to lowercase.
    /// Returns `Err` if the slice is empty or contains non-token characters.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if bytes.is_empty() {
            return Err(ErrorKind::InvalidHeader.into());
        }
        let mut name = String::with_capacity(bytes.len());
        for &b in bytes {
            if !is_token_byte(b) {
                return Err(ErrorKind::InvalidHeader.into());
            }
            name.push(b.to_ascii_lowercase() as char);
        }
        Ok(Self { name })
    }

    /// Gets the lowercase name as a string slice.
    pub fn as_str(&self) -> &str {
        self.name.as_str()
    }
}

/// One or more values associated with a single header name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderValue {
    inner: Vec<Vec<u8>>,
}

impl HeaderValue {
    /// Creates a `HeaderValue` from a byte slice. Returns `Err` if the slice
    /// contains CR, LF or NUL.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        if bytes.iter().any(|&b| b == b'\r' || b == b'\n' || b == 0) {
            return Err(ErrorKind::InvalidHeader.into());
        }
        Ok(Self {
            inner: vec![bytes.to_vec()],
        })
    }

    /// Appends another value to this header.
    pub fn append(&mut self, bytes: &[u8]) -> Result<(), HttpError> {
        let value = Self::from_bytes(bytes)?;
        self.inner.extend(value.inner);
        Ok(())
    }

    /// Joins all values with `", "` and returns the result as a `String`.
    /// Returns `Err` if any value is not valid UTF-8.
    pub fn to_str(&self) -> Result<String, HttpError> {
        let mut parts = Vec::with_capacity(self.inner.len());
        for value in self.inner.iter() {
            let s = std::str::from_utf8(value).map_err(|_| ErrorKind::InvalidHeader)?;
            parts.push(s);
        }
        Ok(parts.join(", "))
    }

    /// Iterates over each individual value.
    pub fn iter(&self) -> core::slice::Iter<'_, Vec<u8>> {
        self.inner.iter()
    }
}

/// A case-insensitive map from header names to values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers {
    map: HashMap<HeaderName, HeaderValue>,
}

impl Headers {
    /// Creates a new, empty `Headers`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the value of a header. The name is matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
        self.map.get(&name)
    }

    /// Inserts a header, replacing any previous values under the same name.
    pub fn insert<N, V>(&mut self, name: N, value: V) -> Result<Option<HeaderValue>, HttpError>
    where
        N: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let name = HeaderName::from_bytes(name.as_ref())?;
        let value = HeaderValue::from_bytes(value.as_ref())?;
        Ok(self.map.insert(name, value))
    }

    /// Appends a header value, keeping any previous values under the same
    /// name.
    pub fn append<N, V>(&mut self, name: N, value: V) -> Result<(), HttpError>
    where
        N: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let name = HeaderName::from_bytes(name.as_ref())?;
        match self.map.entry(name) {
            Entry::Occupied(mut entry) => entry.get_mut().append(value.as_ref())?,
            Entry::Vacant(entry) => {
                entry.insert(HeaderValue::from_bytes(value.as_ref())?);
            }
        }
        Ok(())
    }

    /// Removes a header and returns its values if present.
    pub fn remove(&mut self, name: &str) -> Option<HeaderValue> {
        let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
        self.map.remove(&name)
    }

    /// Returns the number of distinct header names.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if no headers are present.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> MapIter<'_, HeaderName, HeaderValue> {
        self.map.iter()
    }
}

fn is_token_byte(b: u8) -> bool {
    matches!(b,
        b'0'..=b'9'
        | b'a'..=b'z'
        | b'A'..=b'Z'
        | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+'
        | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~')
}
