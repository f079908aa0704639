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

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use strand_http_client::{Client, ErrorKind, Method, RequestBuilder, StatusCode, UploadBody};
use tokio::io::AsyncWriteExt;

/// SDV test cases for connection reuse across sequential requests.
///
/// # Brief
/// 1. Starts a server that answers two requests on one connection.
/// 2. Sends two requests with one client and drains both bodies.
/// 3. Checks both responses and that exactly one connection was accepted.
#[tokio::test]
async fn sdv_client_connection_reuse() {
    let (listener, addr) = common::bind().await;
    let accepts = Arc::new(AtomicUsize::new(0));
    let server_accepts = accepts.clone();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = listener.accept().await.unwrap();
            server_accepts.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                while let Some(head) = common::read_head(&mut stream).await {
                    assert!(head.starts_with("GET /data "));
                    stream
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nhello")
                        .await
                        .unwrap();
                }
            });
        }
    });

    let client = Client::new();
    for _ in 0..2 {
        let request = RequestBuilder::new()
            .url(&format!("http://{addr}/data"))
            .body(UploadBody::Empty)
            .unwrap();
        let response = client.request(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.bytes().await.unwrap(), b"hello");
    }
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
}

/// SDV test cases for discarding a connection after a truncated body.
///
/// # Brief
/// 1. Starts a server that closes mid-body on the first connection and
///    answers correctly on the second.
/// 2. Sends a request, observes the transfer error, then sends another.
/// 3. Checks that the second request succeeds on a fresh connection.
#[tokio::test]
async fn sdv_client_discard_truncated() {
    let (listener, addr) = common::bind().await;
    let accepts = Arc::new(AtomicUsize::new(0));
    let server_accepts = accepts.clone();

    tokio::spawn(async move {
        loop {
            let (mut stream, _) = listener.accept().await.unwrap();
            let accept = server_accepts.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                while let Some(_head) = common::read_head(&mut stream).await {
                    if accept == 0 {
                        stream
                            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nhello")
                            .await
                            .unwrap();
                        // Close mid-body.
                        return;
                    }
                    stream
                        .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nok")
                        .await
                        .unwrap();
                }
            });
        }
    });

    let client = Client::new();
    let request = RequestBuilder::new()
        .url(&format!("http://{addr}/file"))
        .body(UploadBody::Empty)
        .unwrap();
    let err = client
        .request(request)
        .await
        .unwrap()
        .bytes()
        .await
        .unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::BodyTransfer);

    let request = RequestBuilder::new()
        .url(&format!("http://{addr}/file"))
        .body(UploadBody::Empty)
        .unwrap();
    let response = client.request(request).await.unwrap();
    assert_eq!(response.bytes().await.unwrap(), b"ok");
    assert_eq!(accepts.load(Ordering::SeqCst), 2);
}

/// SDV test cases for receiving a chunked response body.
///
/// # Brief
/// 1. Starts a server that answers with a chunked body split over several
///    writes.
/// 2. Collects the body as text.
/// 3. Checks the reassembled content and the rewritten `Host` header.
#[tokio::test]
async fn sdv_client_chunked_response() {
    let (listener, addr) = common::bind().await;
    let host = addr.clone();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let head = common::read_head(&mut stream).await.unwrap();
        assert_eq!(common::header_value(&head, "Host").unwrap(), host);
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n")
            .await
            .unwrap();
        stream.write_all(b"6\r\nstrand\r\n").await.unwrap();
        stream.write_all(b"5\r\n http\r\n0\r\n\r\n").await.unwrap();
    });

    let client = Client::new();
    let request = RequestBuilder::new()
        .url(&format!("http://{addr}/chunked"))
        .body(UploadBody::Empty)
        .unwrap();
    let response = client.request(request).await.unwrap();
    assert_eq!(response.text().await.unwrap(), "strand http");
}

/// SDV test cases for sending a request body.
///
/// # Brief
/// 1. Starts a server that checks the received head and body.
/// 2. Sends a `POST` with an in-memory body.
/// 3. Checks the echoed length and the `204` response handling.
#[tokio::test]
async fn sdv_client_post_body() {
    let (listener, addr) = common::bind().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let head = common::read_head(&mut stream).await.unwrap();
        assert!(head.starts_with("POST /upload "));
        let len = common::header_value(&head, "Content-Length")
            .unwrap()
            .parse::<usize>()
            .unwrap();
        let body = common::read_body(&mut stream, len).await;
        assert_eq!(body, b"request payload");
        stream
            .write_all(b"HTTP/1.1 204 No Content\r\n\r\n")
            .await
            .unwrap();
    });

    let client = Client::new();
    let request = RequestBuilder::new()
        .method(Method::Post)
        .url(&format!("http://{addr}/upload"))
        .body(UploadBody::bytes(b"request payload"))
        .unwrap();
    let response = client.request(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.bytes().await.unwrap().is_empty());
}

/// SDV test cases for the piped body collection strategy.
///
/// # Brief
/// 1. Starts a server that answers with a fixed-length body.
/// 2. Moves the body into a bounded pipe and drains it chunk by chunk.
/// 3. Checks the reassembled content.
#[tokio::test]
async fn sdv_client_piped_body() {
    let (listener, addr) = common::bind().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _head = common::read_head(&mut stream).await.unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\n\r\npipe data")
            .await
            .unwrap();
    });

    let client = Client::new();
    let request = RequestBuilder::new()
        .url(&format!("http://{addr}/pipe"))
        .body(UploadBody::Empty)
        .unwrap();
    let response = client.request(request).await.unwrap();

    let handle = tokio::runtime::Handle::current();
    let mut pipe = response.into_pipe(&handle, 2);
    let mut out = Vec::new();
    while let Some(chunk) = pipe.recv().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(out, b"pipe data");
}

/// SDV test cases for the unbounded sink collection strategy.
///
/// # Brief
/// 1. Starts a server that answers with a fixed-length body.
/// 2. Moves the body into an unbounded sink and drains it chunk by chunk.
/// 3. Checks the reassembled content.
#[tokio::test]
async fn sdv_client_body_sink() {
    let (listener, addr) = common::bind().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _head = common::read_head(&mut stream).await.unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 9\r\n\r\nsink data")
            .await
            .unwrap();
    });

    let client = Client::new();
    let request = RequestBuilder::new()
        .url(&format!("http://{addr}/sink"))
        .body(UploadBody::Empty)
        .unwrap();
    let response = client.request(request).await.unwrap();

    let handle = tokio::runtime::Handle::current();
    let mut sink = response.into_sink(&handle);
    let mut out = Vec::new();
    while let Some(chunk) = sink.recv().await {
        out.extend_from_slice(&chunk.unwrap());
    }
    assert_eq!(out, b"sink data");
}

/// SDV test cases for a failing body observed through a sink.
///
/// # Brief
/// 1. Starts a server that closes the connection mid-body.
/// 2. Moves the body into an unbounded sink and drains it.
/// 3. Checks that the delivered bytes arrive, the transfer error is the
///    last chunk and the sink then ends.
#[tokio::test]
async fn sdv_client_body_sink_error() {
    let (listener, addr) = common::bind().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _head = common::read_head(&mut stream).await.unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nhello")
            .await
            .unwrap();
        // Close mid-body.
    });

    let client = Client::new();
    let request = RequestBuilder::new()
        .url(&format!("http://{addr}/sink"))
        .body(UploadBody::Empty)
        .unwrap();
    let response = client.request(request).await.unwrap();

    let handle = tokio::runtime::Handle::current();
    let mut sink = response.into_sink(&handle);
    let mut out = Vec::new();
    let mut error = None;
    while let Some(chunk) = sink.recv().await {
        match chunk {
            Ok(data) => {
                assert!(error.is_none());
                out.extend_from_slice(&data);
            }
            Err(e) => error = Some(e),
        }
    }
    assert_eq!(out, b"hello");
    assert_eq!(error.unwrap().error_kind(), ErrorKind::BodyTransfer);
}
