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

//! One HTTP/1.1 exchange on a leased connection.
//!
//! `exchange` writes the request head and body, reads the response head and
//! hands the connection to the response body. The connection is condemned
//! on every failure path; it only survives for reuse when the body it is
//! handed to ends cleanly.

use core::pin::Pin;
use core::task::{Context, Poll};

use strand_http::body::ChunkBodyEncoder;
use strand_http::h1::{RequestEncoder, ResponseDecoder};
use strand_http::request::Request;
use strand_http::response::Response;

use crate::async_impl::http_body::{HttpBody, StreamData};
use crate::async_impl::UploadBody;
use crate::error::{ErrorKind, HttpClientError};
use crate::runtime::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf, Sleep};
use crate::util::dispatcher::Conn;
use crate::util::normalizer::BodyLengthParser;

const TEMP_BUF_SIZE: usize = 4096;

impl<S: AsyncRead + Unpin> AsyncRead for Conn<S> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(self.get_mut().raw_mut()).poll_read(cx, buf)
    }
}

impl<S> StreamData for Conn<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    fn shutdown(&self) {
        Conn::shutdown(self);
    }
}

/// Performs one request/response exchange. `sleep` bounds the rest of the
/// exchange, body streaming included.
pub(crate) async fn exchange<S>(
    mut conn: Conn<S>,
    request: &mut Request<UploadBody>,
    sleep: Option<Pin<Box<Sleep>>>,
) -> Result<Response<HttpBody>, HttpClientError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync + 'static,
{
    let mut buf = vec![0u8; TEMP_BUF_SIZE];

    let mut encoder = RequestEncoder::new(request.part().clone());
    loop {
        let size = encoder.encode(&mut buf);
        if size == 0 {
            break;
        }
        if let Err(e) = conn.raw_mut().write_all(&buf[..size]).await {
            conn.shutdown();
            return Err(HttpClientError::new_with_cause(ErrorKind::Request, Some(e)));
        }
    }

    if let Err(e) = send_body(&mut conn, request.body_mut(), &mut buf).await {
        conn.shutdown();
        return Err(e);
    }
    if let Err(e) = conn.raw_mut().flush().await {
        conn.shutdown();
        return Err(HttpClientError::new_with_cause(ErrorKind::Request, Some(e)));
    }

    let mut decoder = ResponseDecoder::new();
    let (part, pre) = loop {
        let size = match conn.raw_mut().read(&mut buf).await {
            Ok(0) => {
                conn.shutdown();
                return Err(HttpClientError::new_with_message(
                    ErrorKind::Request,
                    "Connection closed before response arrived",
                ));
            }
            Ok(size) => size,
            Err(e) => {
                conn.shutdown();
                return Err(HttpClientError::new_with_cause(ErrorKind::Request, Some(e)));
            }
        };
        match decoder.decode(&buf[..size]) {
            Ok(Some((part, rem))) => break (part, rem.to_vec()),
            Ok(None) => continue,
            Err(e) => {
                conn.shutdown();
                return Err(HttpClientError::new_with_cause(ErrorKind::Request, Some(e)));
            }
        }
    };

    let body_length = match BodyLengthParser::new(request.method(), &part).parse() {
        Ok(body_length) => body_length,
        Err(e) => {
            conn.shutdown();
            return Err(e);
        }
    };
    let body = HttpBody::new(body_length, &pre, Box::new(conn), sleep)?;
    Ok(Response::from_raw_parts(part, body))
}

async fn send_body<S>(
    conn: &mut Conn<S>,
    body: &mut UploadBody,
    buf: &mut [u8],
) -> Result<(), HttpClientError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
{
    match body {
        UploadBody::Empty => Ok(()),
        UploadBody::Bytes(content) => conn
            .raw_mut()
            .write_all(content)
            .await
            .map_err(transfer_error),
        UploadBody::File { file, len } => copy_sized(conn, file, *len, buf).await,
        UploadBody::Stream {
            reader,
            len: Some(len),
        } => copy_sized(conn, reader, *len, buf).await,
        UploadBody::Stream { reader, len: None } => {
            let mut framed = Vec::with_capacity(TEMP_BUF_SIZE + 16);
            loop {
                let size = reader.read(buf).await.map_err(transfer_error)?;
                if size == 0 {
                    break;
                }
                framed.clear();
                ChunkBodyEncoder::encode(&buf[..size], &mut framed);
                conn.raw_mut()
                    .write_all(&framed)
                    .await
                    .map_err(transfer_error)?;
            }
            framed.clear();
            ChunkBodyEncoder::finish(&mut framed);
            conn.raw_mut()
                .write_all(&framed)
                .await
                .map_err(transfer_error)
        }
    }
}

async fn copy_sized<S, R>(
    conn: &mut Conn<S>,
    reader: &mut R,
    len: u64,
    buf: &mut [u8],
) -> Result<(), HttpClientError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + Sync,
    R: AsyncRead + Unpin + ?Sized,
{
    let mut remaining = len;
    while remaining > 0 {
        let cap = (buf.len() as u64).min(remaining) as usize;
        let size = reader.read(&mut buf[..cap]).await.map_err(transfer_error)?;
        if size == 0 {
            return Err(HttpClientError::new_with_message(
                ErrorKind::BodyTransfer,
                "Request body ended before its declared length",
            ));
        }
        conn.raw_mut()
            .write_all(&buf[..size])
            .await
            .map_err(transfer_error)?;
        remaining -= size as u64;
    }
    Ok(())
}

fn transfer_error(error: std::io::Error) -> HttpClientError {
    HttpClientError::new_with_cause(ErrorKind::BodyTransfer, Some(error))
}
