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

use core::time::Duration;
use std::sync::Arc;

use strand_http_client::{Client, Downloader, ErrorKind, RetryPolicy};
use tokio::io::AsyncWriteExt;

/// SDV test cases for resuming an interrupted download over HTTP.
///
/// # Brief
/// 1. Starts a server that truncates the first response mid-body and
///    honors a range resume on the second connection.
/// 2. Downloads through a session with a retry budget.
/// 3. Checks the spliced content and the `Range` header of the resume.
#[tokio::test]
async fn sdv_downloader_range_resume() {
    let (listener, addr) = common::bind().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let head = common::read_head(&mut stream).await.unwrap();
        assert!(common::header_value(&head, "Range").is_none());
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n01234")
            .await
            .unwrap();
        drop(stream);

        let (mut stream, _) = listener.accept().await.unwrap();
        let head = common::read_head(&mut stream).await.unwrap();
        assert_eq!(common::header_value(&head, "Range").unwrap(), "bytes=5-");
        stream
            .write_all(b"HTTP/1.1 206 Partial Content\r\nContent-Length: 5\r\n\r\n56789")
            .await
            .unwrap();
    });

    let client = Arc::new(Client::new());
    let mut session = Downloader::new()
        .ranged(client, &format!("http://{addr}/large"))
        .retry_policy(RetryPolicy::fixed(3, Duration::from_millis(1)))
        .build()
        .unwrap();

    let mut out = Vec::new();
    let written = session.write_to(&mut out).await.unwrap();
    assert_eq!(written, 10);
    assert_eq!(out, b"0123456789");
    assert_eq!(session.bytes_received(), 10);
    assert_eq!(session.attempts(), 2);
}

/// SDV test cases for a server that ignores the range resume.
///
/// # Brief
/// 1. Starts a server that truncates the first response and answers the
///    resume with `200` instead of `206`.
/// 2. Checks that the session fails instead of duplicating bytes.
#[tokio::test]
async fn sdv_downloader_resume_not_honored() {
    let (listener, addr) = common::bind().await;

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let _head = common::read_head(&mut stream).await.unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n01234")
            .await
            .unwrap();
        drop(stream);

        let (mut stream, _) = listener.accept().await.unwrap();
        let _head = common::read_head(&mut stream).await.unwrap();
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\n0123456789")
            .await
            .unwrap();
    });

    let client = Arc::new(Client::new());
    let mut session = Downloader::new()
        .ranged(client, &format!("http://{addr}/large"))
        .retry_policy(RetryPolicy::fixed(3, Duration::from_millis(1)))
        .build()
        .unwrap();

    let mut out = Vec::new();
    let err = session.write_to(&mut out).await.unwrap_err();
    assert_eq!(err.error_kind(), ErrorKind::Request);
    assert_eq!(out, b"01234");
}
