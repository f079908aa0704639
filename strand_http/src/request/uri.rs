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

//! URI component types used to address a request target.
//!
//! Only the subset needed by an HTTP/1.1 client is modeled: scheme,
//! authority (host and optional port), path and query.

use core::fmt::{Display, Formatter};

use crate::error::{ErrorKind, HttpError};

/// URI scheme. Only `http` and `https` are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// The `http` scheme.
    Http,

    /// The `https` scheme.
    Https,
}

impl Scheme {
    /// Gets the scheme as a string slice.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }

    /// Gets the default port of this scheme.
    pub fn default_port(&self) -> u16 {
        match self {
            Self::Http => 80,
            Self::Https => 443,
        }
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        match bytes {
            b"http" => Ok(Self::Http),
            b"https" => Ok(Self::Https),
            _ => Err(ErrorKind::InvalidUri.into()),
        }
    }
}

/// Host and optional port of a URI.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Authority {
    host: String,
    port: Option<u16>,
}

impl Authority {
    fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        let s = std::str::from_utf8(bytes).map_err(|_| ErrorKind::InvalidUri)?;
        if s.is_empty() {
            return Err(ErrorKind::InvalidUri.into());
        }
        match s.rsplit_once(':') {
            Some((host, port)) => {
                if host.is_empty() {
                    return Err(ErrorKind::InvalidUri.into());
                }
                let port = port.parse::<u16>().map_err(|_| ErrorKind::InvalidUri)?;
                Ok(Self {
                    host: host.to_string(),
                    port: Some(port),
                })
            }
            None => Ok(Self {
                host: s.to_string(),
                port: None,
            }),
        }
    }

    /// Gets the host part.
    pub fn host(&self) -> &str {
        self.host.as_str()
    }

    /// Gets the explicit port, if any.
    pub fn port(&self) -> Option<u16> {
        self.port
    }
}

impl Display for Authority {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{}", self.host, port),
            None => f.write_str(self.host.as_str()),
        }
    }
}

/// A parsed request target: `scheme://host[:port][/path][?query]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Uri {
    scheme: Option<Scheme>,
    authority: Option<Authority>,
    path: Option<String>,
    query: Option<String>,
}

impl Uri {
    /// Parses a `Uri` from a byte slice. The scheme and host are required.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HttpError> {
        let s = std::str::from_utf8(bytes).map_err(|_| ErrorKind::InvalidUri)?;
        let (scheme, rest) = match s.split_once("://") {
            Some((scheme, rest)) => (Scheme::from_bytes(scheme.as_bytes())?, rest),
            None => return Err(ErrorKind::InvalidUri.into()),
        };

        let (authority, rest) = match rest.find(['/', '?']) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let authority = Authority::from_bytes(authority.as_bytes())?;

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        let path = (!path.is_empty()).then(|| path.to_string());

        Ok(Self {
            scheme: Some(scheme),
            authority: Some(authority),
            path,
            query,
        })
    }

    /// Gets the scheme.
    pub fn scheme(&self) -> Option<&Scheme> {
        self.scheme.as_ref()
    }

    /// Gets the authority.
    pub fn authority(&self) -> Option<&Authority> {
        self.authority.as_ref()
    }

    /// Gets the host part of the authority.
    pub fn host(&self) -> Option<&str> {
        self.authority.as_ref().map(|a| a.host())
    }

    /// Gets the port, falling back to the scheme's default port.
    pub fn port(&self) -> Option<u16> {
        match self.authority.as_ref().and_then(|a| a.port()) {
            Some(port) => Some(port),
            None => self.scheme.as_ref().map(|s| s.default_port()),
        }
    }

    /// Gets the path.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Gets the query.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Formats the request target written on the wire: the path (defaulting
    /// to `/`) followed by the query, if any.
    pub fn path_and_query(&self) -> String {
        let mut target = String::from(self.path.as_deref().unwrap_or("/"));
        if let Some(query) = self.query.as_deref() {
            target.push('?');
            target.push_str(query);
        }
        target
    }

    pub(crate) fn set_authority_port(&mut self, port: u16) {
        if let Some(authority) = self.authority.as_mut() {
            if authority.port.is_none() {
                authority.port = Some(port);
            }
        }
    }

    /// Normalizes the URI in place: fills in the explicit port from the
    /// scheme's default when absent. Returns `Err` if scheme or host is
    /// missing.
    pub fn normalize(&mut self) -> Result<(), HttpError> {
        let scheme = *self.scheme.as_ref().ok_or(ErrorKind::InvalidUri)?;
        if self.authority.is_none() {
            return Err(ErrorKind::InvalidUri.into());
        }
        self.set_authority_port(scheme.default_port());
        Ok(())
    }
}

impl Display for Uri {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        if let Some(scheme) = self.scheme.as_ref() {
            write!(f, "{}://", scheme.as_str())?;
        }
        if let Some(authority) = self.authority.as_ref() {
            write!(f, "{authority}")?;
        }
        f.write_str(self.path_and_query().as_str())
    }
}

#[cfg(test)]
mod ut_uri {
    use super::{Scheme, Uri};

    /// UT test cases for `Uri::from_bytes`.
    ///
    /// # Brief
    /// 1. Parses URIs with and without port, path and query.
    /// 2. Checks each accessor against the expected component.
    #[test]
    fn ut_uri_from_bytes() {
        let uri = Uri::from_bytes(b"http://example.com:8080/index?a=1").unwrap();
        assert_eq!(uri.scheme(), Some(&Scheme::Http));
        assert_eq!(uri.host(), Some("example.com"));
        assert_eq!(uri.port(), Some(8080));
        assert_eq!(uri.path(), Some("/index"));
        assert_eq!(uri.query(), Some("a=1"));
        assert_eq!(uri.path_and_query(), "/index?a=1");

        let uri = Uri::from_bytes(b"https://example.com").unwrap();
        assert_eq!(uri.port(), Some(443));
        assert_eq!(uri.path_and_query(), "/");

        assert!(Uri::from_bytes(b"example.com").is_err());
        assert!(Uri::from_bytes(b"ftp://example.com").is_err());
        assert!(Uri::from_bytes(b"http://:80").is_err());
    }

    /// UT test cases for `Uri::normalize`.
    ///
    /// # Brief
    /// 1. Normalizes a URI without an explicit port.
    /// 2. Checks that the authority carries the scheme default afterwards.
    #[test]
    fn ut_uri_normalize() {
        let mut uri = Uri::from_bytes(b"http://example.com/x").unwrap();
        uri.normalize().unwrap();
        assert_eq!(uri.authority().unwrap().to_string(), "example.com:80");
        assert_eq!(uri.to_string(), "http://example.com:80/x");
    }
}
